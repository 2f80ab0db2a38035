//! Fixed image cleanup applied before OCR: grayscale, 1% autocontrast, sharpen.

use crate::{Error, Result};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, RgbImage};
use std::io::Cursor;

/// Share of the histogram (in percent) clipped from each tail by [`autocontrast`].
pub const AUTOCONTRAST_CUTOFF: f32 = 1.0;

/// 3x3 sharpen kernel, normalized by [`SHARPEN_SCALE`].
const SHARPEN_KERNEL: [i32; 9] = [-2, -2, -2, -2, 32, -2, -2, -2, -2];
const SHARPEN_SCALE: i32 = 16;

/// Decodes `image_bytes`, runs the cleanup pipeline and re-encodes as PNG.
pub fn preprocess(image_bytes: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(image_bytes)?;

    let gray = match img {
        DynamicImage::ImageLuma8(gray) => gray,
        DynamicImage::ImageRgb8(rgb) => grayscale(&rgb),
        other => grayscale(&other.to_rgb8()),
    };

    let gray = autocontrast(&gray, AUTOCONTRAST_CUTOFF);
    let gray = sharpen(&gray);

    encode_png(&DynamicImage::ImageLuma8(gray))
}

/// Decodes without any cleanup and re-encodes as PNG.
pub fn reencode(image_bytes: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(image_bytes)?;
    encode_png(&img)
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| Error::decode(format!("PNG encoding failed: {}", e)))?;
    Ok(buf.into_inner())
}

/// ITU-R 601-2 luma, `L = R * 299/1000 + G * 587/1000 + B * 114/1000`,
/// in 16-bit fixed point with rounding.
pub fn grayscale(img: &RgbImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b] = img.get_pixel(x, y).0;
        let l = (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16;
        Luma([l as u8])
    })
}

/// Stretches intensities so the darkest/lightest `cutoff` percent map to 0/255.
pub fn autocontrast(img: &GrayImage, cutoff: f32) -> GrayImage {
    let lut = autocontrast_lut(&histogram(img), cutoff);
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = lut[pixel.0[0] as usize];
    }
    out
}

/// Applies the sharpen kernel to interior pixels; the one-pixel border is copied as-is.
pub fn sharpen(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut out = img.clone();
    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut acc = 0i32;
            for (k, weight) in SHARPEN_KERNEL.iter().enumerate() {
                let px = x + k as u32 % 3 - 1;
                let py = y + k as u32 / 3 - 1;
                acc += weight * img.get_pixel(px, py).0[0] as i32;
            }
            let v = (acc + SHARPEN_SCALE / 2).div_euclid(SHARPEN_SCALE);
            out.put_pixel(x, y, Luma([v.clamp(0, 255) as u8]));
        }
    }
    out
}

fn histogram(img: &GrayImage) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for pixel in img.pixels() {
        hist[pixel.0[0] as usize] += 1;
    }
    hist
}

fn autocontrast_lut(hist: &[u64; 256], cutoff: f32) -> [u8; 256] {
    let mut h = *hist;
    let total: u64 = h.iter().sum();
    let cut = (total as f64 * cutoff as f64 / 100.0) as u64;

    clip_tail(h.iter_mut(), cut);
    clip_tail(h.iter_mut().rev(), cut);

    let lo = h.iter().position(|&n| n > 0);
    let hi = h.iter().rposition(|&n| n > 0);

    let mut lut = [0u8; 256];
    match (lo, hi) {
        (Some(lo), Some(hi)) if hi > lo => {
            for (ix, slot) in lut.iter_mut().enumerate() {
                let v = (ix as i64 - lo as i64) * 255 / (hi - lo) as i64;
                *slot = v.clamp(0, 255) as u8;
            }
        }
        _ => {
            for (ix, slot) in lut.iter_mut().enumerate() {
                *slot = ix as u8;
            }
        }
    }
    lut
}

fn clip_tail<'a>(bins: impl Iterator<Item = &'a mut u64>, mut cut: u64) {
    for bin in bins {
        if cut == 0 {
            break;
        }
        if cut > *bin {
            cut -= *bin;
            *bin = 0;
        } else {
            *bin -= cut;
            cut = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};
    use pretty_assertions::assert_eq;

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        encode_png(&img).unwrap()
    }

    #[test]
    fn test_grayscale_uses_601_weights() {
        let mut img = RgbImage::new(4, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));
        img.put_pixel(2, 0, Rgb([0, 0, 255]));
        img.put_pixel(3, 0, Rgb([255, 255, 255]));

        let gray = grayscale(&img);
        let values: Vec<u8> = gray.pixels().map(|p| p.0[0]).collect();
        assert_eq!(values, vec![76, 150, 29, 255]);
    }

    #[test]
    fn test_preprocess_red_page_keeps_601_level() {
        // Flat image: autocontrast and sharpen leave the luma untouched.
        let rgb = RgbImage::from_pixel(3, 3, Rgb([255, 0, 0]));
        let out = preprocess(&png_bytes(DynamicImage::ImageRgb8(rgb))).unwrap();

        let decoded = image::load_from_memory(&out).unwrap().to_luma8();
        assert!(decoded.pixels().all(|p| p.0[0] == 76));
    }

    #[test]
    fn test_autocontrast_stretches_range() {
        let mut img = GrayImage::new(2, 1);
        img.put_pixel(0, 0, Luma([100]));
        img.put_pixel(1, 0, Luma([150]));

        let out = autocontrast(&img, 0.0);
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(1, 0).0[0], 255);
    }

    #[test]
    fn test_autocontrast_flat_image_unchanged() {
        let img = GrayImage::from_pixel(4, 4, Luma([77]));
        let out = autocontrast(&img, AUTOCONTRAST_CUTOFF);
        assert!(out.pixels().all(|p| p.0[0] == 77));
    }

    #[test]
    fn test_autocontrast_clips_outliers() {
        // 1 bright outlier in 200 pixels falls inside the 1% cutoff.
        let mut img = GrayImage::from_fn(20, 10, |x, _| Luma([if x < 10 { 50 } else { 100 }]));
        img.put_pixel(0, 0, Luma([255]));

        let out = autocontrast(&img, AUTOCONTRAST_CUTOFF);
        assert_eq!(out.get_pixel(1, 0).0[0], 0);
        assert_eq!(out.get_pixel(15, 0).0[0], 255);
    }

    #[test]
    fn test_sharpen_keeps_flat_regions_and_border() {
        let img = GrayImage::from_pixel(5, 5, Luma([120]));
        let out = sharpen(&img);
        assert!(out.pixels().all(|p| p.0[0] == 120));
    }

    #[test]
    fn test_sharpen_boosts_center_contrast() {
        let mut img = GrayImage::from_pixel(3, 3, Luma([100]));
        img.put_pixel(1, 1, Luma([132]));

        // (32 * 132 - 16 * 100) / 16 = 164
        let out = sharpen(&img);
        assert_eq!(out.get_pixel(1, 1).0[0], 164);
        assert_eq!(out.get_pixel(0, 0).0[0], 100);
    }

    #[test]
    fn test_preprocess_outputs_grayscale_png() {
        let rgba = RgbaImage::from_pixel(3, 3, Rgba([200, 10, 10, 255]));
        let out = preprocess(&png_bytes(DynamicImage::ImageRgba8(rgba))).unwrap();

        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Png);
        let decoded = image::load_from_memory(&out).unwrap();
        assert!(matches!(decoded, DynamicImage::ImageLuma8(_)));
        assert_eq!((decoded.width(), decoded.height()), (3, 3));
    }

    #[test]
    fn test_preprocess_rejects_garbage() {
        let result = preprocess(b"definitely not an image");
        assert!(matches!(result, Err(Error::Decode(_))));
    }
}
