mod engine;
mod preprocess;
mod types;

pub use engine::*;
pub use preprocess::*;
pub use types::*;

use crate::Result;
use tracing::{debug, warn};

/// Best-effort OCR over raw upload bytes.
///
/// Preprocessing failures fall back to the untouched image; input that cannot be
/// decoded at all yields empty text with a degraded summary. Only a failure of
/// the engine's full-text pass is returned as an error. Structured-data failures
/// degrade the summary instead.
pub async fn run_ocr(
    engine: &dyn OcrEngine,
    image_bytes: &[u8],
    language: Option<&str>,
) -> Result<(String, OcrSummary)> {
    let owned = image_bytes.to_vec();
    let prepared = tokio::task::spawn_blocking(move || prepare_image(&owned, preprocess)).await?;

    let Some(image) = prepared else {
        return Ok((String::new(), OcrSummary::from_plain_text("")));
    };

    let text = engine.image_to_string(&image, language).await?;

    let summary = match engine.image_to_data(&image, language).await {
        Ok(tokens) => OcrSummary::from_tokens(&tokens),
        Err(e) => {
            warn!("Structured OCR data unavailable, degrading summary: {}", e);
            OcrSummary::from_plain_text(&text)
        }
    };

    debug!(
        "OCR produced {} words (avg confidence {:?}, degraded {})",
        summary.word_count, summary.average_confidence, summary.degraded
    );

    Ok((text, summary))
}

/// Runs `cleanup` over the bytes, falling back to a plain re-encode of the
/// original. `None` when the bytes are not an image at all.
///
/// The fallback fires when decoding succeeds but the cleaned image cannot be
/// produced or encoded.
fn prepare_image(image_bytes: &[u8], cleanup: fn(&[u8]) -> Result<Vec<u8>>) -> Option<Vec<u8>> {
    let err = match cleanup(image_bytes) {
        Ok(png) => return Some(png),
        Err(e) => e,
    };
    warn!("Preprocessing failed, using original image: {}", err);

    match reencode(image_bytes) {
        Ok(png) => Some(png),
        Err(e) => {
            warn!("Image could not be decoded, skipping OCR: {}", e);
            None
        }
    }
}
