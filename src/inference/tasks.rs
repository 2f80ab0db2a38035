//! Canned prompts for the two things the web UI asks the model to do.

use super::{CompletionRequest, InferenceClient};
use crate::Result;
use tracing::debug;

pub const CLEAN_SYSTEM_PROMPT: &str = "You are an assistant that cleans OCR text. \
Fix OCR mistakes, spelling, and formatting. \
Preserve the original meaning and style. \
Output only the cleaned text without extra commentary.";

pub const STRUCTURE_SYSTEM_PROMPT: &str = "You are an assistant that structures OCR output. \
Reply with a single JSON object with these keys: \
\"clean_text\" (the text with OCR mistakes fixed), \
\"notable_lines\" (array of the most important lines), \
\"summary\" (two or three sentences), and \
\"fields\" (object of any structured fields you can detect, such as dates, names, amounts or IDs; \
use an empty object if none). Output only the JSON.";

/// Fixes OCR noise in `raw_text` and returns the model's plain-text answer.
pub async fn clean_ocr_text(client: &dyn InferenceClient, raw_text: &str) -> Result<String> {
    debug!("Cleaning {} chars of OCR text", raw_text.len());

    let request = CompletionRequest::new(format!("Clean and format this OCR text:\n\n{raw_text}"))
        .with_system(CLEAN_SYSTEM_PROMPT);

    Ok(client.complete(request).await?.text())
}

/// Asks for a JSON summary of `extracted_text`. The answer is returned verbatim.
pub async fn structure_text(client: &dyn InferenceClient, extracted_text: &str) -> Result<String> {
    debug!("Structuring {} chars of extracted text", extracted_text.len());

    let request = CompletionRequest::new(format!(
        "Structure this OCR-extracted text:\n\n{extracted_text}"
    ))
    .with_system(STRUCTURE_SYSTEM_PROMPT);

    Ok(client.complete(request).await?.text())
}
