use super::types::*;
use crate::{Error, Result, config::InferenceConfig};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<InferenceResponse>;
}

/// Chat-completions client speaking JSON, or multipart when an attachment is present.
pub struct HttpInferenceClient {
    client: reqwest::Client,
    config: InferenceConfig,
}

impl HttpInferenceClient {
    pub fn new(config: InferenceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn multipart_form(payload: &ChatCompletionRequest, attachment: Attachment) -> Result<Form> {
        let payload_part = Part::text(serde_json::to_string(payload)?)
            .mime_str("application/json")
            .map_err(|e| Error::internal(format!("Invalid payload media type: {}", e)))?;

        let file_part = Part::bytes(attachment.bytes)
            .file_name(attachment.filename)
            .mime_str(&attachment.media_type)
            .map_err(|e| {
                Error::internal(format!(
                    "Invalid attachment media type '{}': {}",
                    attachment.media_type, e
                ))
            })?;

        Ok(Form::new()
            .part("payload", payload_part)
            .part("file", file_part))
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn complete(&self, request: CompletionRequest) -> Result<InferenceResponse> {
        // Checked before anything touches the network.
        let api_key = self.config.validated_api_key()?;

        let payload = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: request.messages(),
        };
        let timeout = request.timeout.unwrap_or_else(|| self.config.timeout());

        debug!(
            "Sending chat completion with {} messages to {} (timeout {:?})",
            payload.messages.len(),
            self.config.endpoint_url,
            timeout
        );

        let builder = self
            .client
            .post(&self.config.endpoint_url)
            .bearer_auth(api_key)
            .timeout(timeout);

        let builder = match request.attachment {
            Some(attachment) => {
                debug!(
                    "Attaching {} bytes as {} ({})",
                    attachment.bytes.len(),
                    attachment.filename,
                    attachment.media_type
                );
                builder.multipart(Self::multipart_form(&payload, attachment)?)
            }
            None => builder.json(&payload),
        };

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Inference endpoint returned {}: {}", status, body);
            return Err(Error::upstream(Some(status.as_u16()), body));
        }

        let body = response.text().await?;
        let value = serde_json::from_str(&body).map_err(|e| {
            Error::upstream(
                Some(status.as_u16()),
                format!("Response was not valid JSON ({}): {}", e, body),
            )
        })?;

        debug!("Received {} byte response from inference endpoint", body.len());

        Ok(InferenceResponse(value))
    }
}
