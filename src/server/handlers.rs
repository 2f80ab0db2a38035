use super::templates;
use super::types::{CleanForm, ProcessForm};
use super::uploads::UploadedDocument;
use crate::{
    Error, Result,
    config::Config,
    inference::{self, InferenceClient},
    ocr::{self, OcrEngine},
};
use axum::{
    extract::{Form, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub inference: Arc<dyn InferenceClient>,
    pub ocr: Arc<dyn OcrEngine>,
    pub config: Arc<Config>,
}

/// What a multipart submission to `/upload` carried.
enum UploadForm {
    Image {
        document: UploadedDocument,
        language: Option<String>,
    },
    Text(String),
}

pub async fn index() -> Html<String> {
    Html(templates::index_page())
}

pub async fn process_text(
    State(state): State<AppState>,
    Form(form): Form<ProcessForm>,
) -> Html<String> {
    Html(clean_pipeline(&state, &form.raw_text).await)
}

pub async fn upload(State(state): State<AppState>, multipart: Multipart) -> Response {
    let form = match read_upload_form(multipart).await {
        Ok(form) => form,
        Err(e) => {
            error!("Rejected upload: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Html(templates::error_page("Upload failed", &e, None)),
            )
                .into_response();
        }
    };

    match form {
        UploadForm::Image { document, language } => {
            Html(ocr_pipeline(&state, document, language).await).into_response()
        }
        UploadForm::Text(raw_text) => Html(clean_pipeline(&state, &raw_text).await).into_response(),
    }
}

pub async fn clean(State(state): State<AppState>, Form(form): Form<CleanForm>) -> Html<String> {
    info!("Structuring {} chars of extracted text", form.extracted_text.len());

    match inference::structure_text(state.inference.as_ref(), &form.extracted_text).await {
        Ok(response) => Html(templates::structured_page(&form.extracted_text, &response)),
        Err(e) => {
            error!("Structuring failed: {}", e);
            Html(templates::error_page(
                "Cleaning failed",
                &e,
                Some(&form.extracted_text),
            ))
        }
    }
}

async fn clean_pipeline(state: &AppState, raw_text: &str) -> String {
    info!("Cleaning {} chars of submitted text", raw_text.len());

    match inference::clean_ocr_text(state.inference.as_ref(), raw_text).await {
        Ok(cleaned) => templates::cleaned_page(raw_text, &cleaned),
        Err(e) => {
            error!("Text cleaning failed: {}", e);
            templates::error_page("Cleaning failed", &e, Some(raw_text))
        }
    }
}

async fn ocr_pipeline(
    state: &AppState,
    document: UploadedDocument,
    language: Option<String>,
) -> String {
    let language = language.or_else(|| state.config.ocr.language.clone());

    match run_upload_ocr(state, &document, language.as_deref()).await {
        Ok((text, summary)) => templates::ocr_page(&document.filename, &text, &summary),
        Err(e) => {
            error!("OCR failed for {}: {}", document.filename, e);
            templates::error_page("OCR failed", &e, None)
        }
    }
}

async fn run_upload_ocr(
    state: &AppState,
    document: &UploadedDocument,
    language: Option<&str>,
) -> Result<(String, ocr::OcrSummary)> {
    let staged = document.persist(&state.config.ocr.upload_dir()).await?;
    info!(
        "Running OCR for upload {} ({}) from {}",
        staged.request_id,
        document.filename,
        staged.path().display()
    );

    let bytes = staged.read().await?;
    ocr::run_ocr(state.ocr.as_ref(), &bytes, language).await
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm> {
    let mut document = None;
    let mut language = None;
    let mut raw_text = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::upload(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let raw_bytes = field
                    .bytes()
                    .await
                    .map_err(|e| Error::upload(format!("Failed to read file data: {}", e)))?;

                // Browsers send an empty, unnamed part when no file was chosen.
                if !raw_bytes.is_empty() || !filename.is_empty() {
                    document = Some(UploadedDocument {
                        filename: if filename.is_empty() {
                            "upload".to_string()
                        } else {
                            filename
                        },
                        content_type,
                        raw_bytes: raw_bytes.to_vec(),
                    });
                }
            }
            "lang" => {
                let value = field.text().await.map_err(|e| Error::upload(e.to_string()))?;
                let value = value.trim();
                if !value.is_empty() {
                    language = Some(value.to_string());
                }
            }
            "raw_text" => {
                raw_text = Some(field.text().await.map_err(|e| Error::upload(e.to_string()))?);
            }
            _ => {}
        }
    }

    match (document, raw_text) {
        (Some(document), _) => Ok(UploadForm::Image { document, language }),
        (None, Some(text)) => Ok(UploadForm::Text(text)),
        (None, None) => Err(Error::upload("No file or raw_text provided")),
    }
}
