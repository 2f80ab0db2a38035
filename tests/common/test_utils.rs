use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ocr_scribe::config::{Config, InferenceConfig, LogsConfig, OcrConfig, ServerConfig};
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

/// Create a test configuration with sensible defaults
pub fn create_test_config(endpoint_url: &str, upload_dir: &Path) -> Config {
    Config {
        inference: InferenceConfig {
            endpoint_url: endpoint_url.to_string(),
            api_key: Some("test-api-key".to_string()),
            model: "openai-gpt-4o".to_string(),
            timeout_secs: 5,
        },
        ocr: OcrConfig {
            tesseract_cmd: "tesseract".to_string(),
            language: None,
            upload_dir: Some(upload_dir.to_path_buf()),
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            max_upload_bytes: 1024 * 1024,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
        },
    }
}

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Encode an RGB image as PNG bytes
pub fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb(color));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .expect("PNG encoding failed");
    buf.into_inner()
}

/// 1x1 white pixel
pub fn blank_pixel_png() -> Vec<u8> {
    png_bytes(1, 1, [255, 255, 255])
}

pub const BOUNDARY: &str = "----ocrscribetestboundary";

/// A single part of a hand-built multipart body
pub enum FormPart<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

/// Build a multipart/form-data body using [`BOUNDARY`]
pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            FormPart::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            FormPart::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// Assert that a page contains every expected fragment
pub fn assert_contains_all(page: &str, fragments: &[&str]) {
    for fragment in fragments {
        assert!(
            page.contains(fragment),
            "Expected page to contain '{}', got:\n{}",
            fragment,
            page
        );
    }
}
