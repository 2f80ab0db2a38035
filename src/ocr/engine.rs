//! OCR engine seam and the Tesseract command-line implementation.

use super::types::OcrToken;
use crate::{Error, Result, config::OcrConfig};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Full-text extraction from an encoded image.
    async fn image_to_string(&self, image: &[u8], language: Option<&str>) -> Result<String>;

    /// Word-level extraction with per-token confidence.
    async fn image_to_data(&self, image: &[u8], language: Option<&str>) -> Result<Vec<OcrToken>>;
}

/// Runs the `tesseract` binary as a child process.
pub struct TesseractEngine {
    command: String,
}

impl TesseractEngine {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(config.tesseract_cmd.clone())
    }

    async fn run(&self, image: &[u8], language: Option<&str>, config: Option<&str>) -> Result<String> {
        // Removed when `file` drops at the end of this call.
        let file = tokio::task::spawn_blocking(|| {
            tempfile::Builder::new().prefix("ocr-").suffix(".png").tempfile()
        })
        .await??;
        tokio::fs::write(file.path(), image).await?;

        let mut cmd = Command::new(&self.command);
        cmd.arg(file.path()).arg("stdout");
        if let Some(lang) = language {
            cmd.args(["-l", lang]);
        }
        if let Some(config) = config {
            cmd.arg(config);
        }

        debug!("Running {:?}", cmd.as_std());

        let output = match cmd.output().await {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ocr(format!(
                    "{} not found (install tesseract-ocr)",
                    self.command
                )));
            }
            Err(e) => return Err(e.into()),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::ocr(format!("tesseract failed: {}", stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn image_to_string(&self, image: &[u8], language: Option<&str>) -> Result<String> {
        self.run(image, language, None).await
    }

    async fn image_to_data(&self, image: &[u8], language: Option<&str>) -> Result<Vec<OcrToken>> {
        let tsv = self.run(image, language, Some("tsv")).await?;
        parse_tsv(&tsv)
    }
}

const TSV_CONF_COLUMN: usize = 10;
const TSV_TEXT_COLUMN: usize = 11;

/// Parses Tesseract's TSV output (header row plus 12 tab-separated columns).
/// Rows for pages, blocks and lines carry confidence `-1` and no text.
pub fn parse_tsv(tsv: &str) -> Result<Vec<OcrToken>> {
    let mut lines = tsv.lines();

    match lines.next() {
        Some(header) if header.starts_with("level") => {}
        Some(other) => {
            return Err(Error::ocr(format!("Unexpected TSV header: {}", other)));
        }
        None => return Ok(Vec::new()),
    }

    let mut tokens = Vec::new();
    for (row, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let columns: Vec<&str> = line.split('\t').collect();
        let conf = columns
            .get(TSV_CONF_COLUMN)
            .ok_or_else(|| Error::ocr(format!("TSV row {} is missing columns", row + 1)))?;
        let confidence: f32 = conf
            .trim()
            .parse()
            .map_err(|_| Error::ocr(format!("TSV row {} has bad confidence '{}'", row + 1, conf)))?;
        let text = columns.get(TSV_TEXT_COLUMN).copied().unwrap_or("");

        tokens.push(OcrToken::new(text, confidence));
    }

    Ok(tokens)
}
