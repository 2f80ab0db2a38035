use serde::Deserialize;

/// `POST /process` body.
#[derive(Debug, Deserialize)]
pub struct ProcessForm {
    pub raw_text: String,
}

/// `POST /clean` body.
#[derive(Debug, Deserialize)]
pub struct CleanForm {
    pub extracted_text: String,
}
