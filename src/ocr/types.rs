use serde::{Deserialize, Serialize};

/// One token from the engine's structured pass. Negative confidence marks
/// non-word rows (pages, blocks, lines) and is ignored when averaging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrToken {
    pub text: String,
    pub confidence: f32,
}

impl OcrToken {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// Quality summary for one OCR run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OcrSummary {
    /// Mean of the non-negative token confidences, 0..=100.
    pub average_confidence: Option<f32>,
    pub word_count: usize,
    /// Metadata did not come from the structured pass.
    pub degraded: bool,
}

impl OcrSummary {
    pub fn from_tokens(tokens: &[OcrToken]) -> Self {
        let confidences: Vec<f32> = tokens
            .iter()
            .map(|t| t.confidence)
            .filter(|c| *c >= 0.0)
            .collect();

        let average_confidence = if confidences.is_empty() {
            None
        } else {
            let mean = confidences.iter().sum::<f32>() / confidences.len() as f32;
            Some(mean.clamp(0.0, 100.0))
        };

        let word_count = tokens.iter().filter(|t| !t.text.trim().is_empty()).count();

        Self {
            average_confidence,
            word_count,
            degraded: false,
        }
    }

    /// Used when structured data is unavailable: no confidence, whitespace word count.
    pub fn from_plain_text(text: &str) -> Self {
        Self {
            average_confidence: None,
            word_count: text.split_whitespace().count(),
            degraded: true,
        }
    }
}
