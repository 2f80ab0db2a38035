use async_trait::async_trait;
use ocr_scribe::{
    Error, Result,
    inference::{CompletionRequest, InferenceClient, InferenceResponse},
    ocr::{OcrEngine, OcrToken},
};
use std::sync::{Arc, Mutex};

/// Mock inference client for testing
#[derive(Debug)]
pub struct MockInferenceClient {
    pub responses: Arc<Mutex<Vec<InferenceResponse>>>,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
    pub error: Option<String>,
}

impl MockInferenceClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            error: None,
        }
    }

    pub fn with_responses(self, responses: Vec<InferenceResponse>) -> Self {
        *self.responses.lock().unwrap() = responses;
        self
    }

    pub fn with_error(mut self, error: String) -> Self {
        self.error = Some(error);
        self
    }

    pub fn get_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceClient for MockInferenceClient {
    async fn complete(&self, request: CompletionRequest) -> Result<InferenceResponse> {
        self.requests.lock().unwrap().push(request);

        if let Some(ref error) = self.error {
            return Err(Error::upstream(Some(500), error.clone()));
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::internal("No more mock responses available"));
        }

        Ok(responses.remove(0))
    }
}

impl Default for MockInferenceClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Stub OCR engine returning canned text and tokens
#[derive(Debug, Default)]
pub struct StubOcrEngine {
    pub text: String,
    /// `None` makes the structured pass fail.
    pub tokens: Option<Vec<OcrToken>>,
    pub text_error: Option<String>,
    pub images: Arc<Mutex<Vec<Vec<u8>>>>,
    pub languages: Arc<Mutex<Vec<Option<String>>>>,
    pub data_languages: Arc<Mutex<Vec<Option<String>>>>,
}

impl StubOcrEngine {
    pub fn new(text: &str, tokens: Vec<OcrToken>) -> Self {
        Self {
            text: text.to_string(),
            tokens: Some(tokens),
            ..Self::default()
        }
    }

    /// Engine whose structured pass always fails.
    pub fn without_data(text: &str) -> Self {
        Self {
            text: text.to_string(),
            tokens: None,
            ..Self::default()
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            text_error: Some(error.to_string()),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.images.lock().unwrap().len()
    }

    pub fn seen_images(&self) -> Vec<Vec<u8>> {
        self.images.lock().unwrap().clone()
    }

    pub fn seen_languages(&self) -> Vec<Option<String>> {
        self.languages.lock().unwrap().clone()
    }

    /// Languages passed to the structured pass.
    pub fn seen_data_languages(&self) -> Vec<Option<String>> {
        self.data_languages.lock().unwrap().clone()
    }
}

#[async_trait]
impl OcrEngine for StubOcrEngine {
    async fn image_to_string(&self, image: &[u8], language: Option<&str>) -> Result<String> {
        self.images.lock().unwrap().push(image.to_vec());
        self.languages
            .lock()
            .unwrap()
            .push(language.map(str::to_string));

        match self.text_error {
            Some(ref error) => Err(Error::ocr(error.clone())),
            None => Ok(self.text.clone()),
        }
    }

    async fn image_to_data(&self, _image: &[u8], language: Option<&str>) -> Result<Vec<OcrToken>> {
        self.data_languages
            .lock()
            .unwrap()
            .push(language.map(str::to_string));

        self.tokens
            .clone()
            .ok_or_else(|| Error::ocr("structured data unavailable"))
    }
}
