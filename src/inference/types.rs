use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Wire payload for the chat-completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// Binary file sent alongside the payload as a multipart part.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub bytes: Vec<u8>,
    pub media_type: String,
    pub filename: String,
}

impl Attachment {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
            filename: "attachment".to_string(),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }
}

/// One call's worth of input: prompt, optional system instruction and attachment.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub system: Option<String>,
    pub attachment: Option<Attachment>,
    /// Overrides the configured timeout for this call only.
    pub timeout: Option<Duration>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            attachment: None,
            timeout: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// System message first (if any), then exactly one user message.
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(ref system) = self.system {
            messages.push(ChatMessage::system(system.clone()));
        }
        messages.push(ChatMessage::user(self.prompt.clone()));
        messages
    }
}

/// Raw JSON returned by the endpoint. No schema is imposed on it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InferenceResponse(pub Value);

impl InferenceResponse {
    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Plain-text content of the response, see [`ResponseShape`].
    pub fn text(&self) -> String {
        ResponseShape::decode(&self.0).into_text()
    }
}

impl From<Value> for InferenceResponse {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Known response layouts, tried in priority order by [`ResponseShape::decode`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// `choices[0].message.content`
    Chat(Value),
    /// `choices[0].text`
    Legacy(Value),
    /// `output`, either a list or a scalar
    Output(Value),
    /// `response`
    Response(Value),
    /// Anything else, stringified whole.
    Raw(Value),
    /// `null`, `{}`, `[]` or `""`.
    Empty,
}

impl ResponseShape {
    pub fn decode(value: &Value) -> Self {
        if is_empty(value) {
            return Self::Empty;
        }

        let Value::Object(map) = value else {
            return Self::Raw(value.clone());
        };

        if let Some(Value::Object(choice)) = map
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
        {
            return match choice.get("message") {
                Some(Value::Object(message)) => {
                    Self::Chat(message.get("content").cloned().unwrap_or(Value::Null))
                }
                _ => Self::Legacy(choice.get("text").cloned().unwrap_or(Value::Null)),
            };
        }

        if let Some(output) = map.get("output") {
            return Self::Output(output.clone());
        }

        if let Some(response) = map.get("response") {
            return Self::Response(response.clone());
        }

        Self::Raw(value.clone())
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Chat(content) | Self::Legacy(content) => stringify(&content),
            Self::Output(Value::Array(items)) => items
                .iter()
                .map(stringify)
                .collect::<Vec<_>>()
                .join(" "),
            Self::Output(value) | Self::Response(value) | Self::Raw(value) => stringify(&value),
            Self::Empty => String::new(),
        }
    }
}

/// Normalizes any endpoint response to plain text. Never fails.
pub fn extract_text(response: &Value) -> String {
    ResponseShape::decode(response).into_text()
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
