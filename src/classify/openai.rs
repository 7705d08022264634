use super::{Classifier, chat};
use crate::error::Result;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Hosted chat-completions API, authenticated with a bearer key.
pub struct OpenAiClassifier {
    http: reqwest::blocking::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClassifier {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Classifier for OpenAiClassifier {
    fn provider(&self) -> &str {
        "openai"
    }

    fn classify(&self, body: &str) -> Result<String> {
        chat::complete(
            &self.http,
            self.provider(),
            &self.base_url,
            Some(&self.api_key),
            &self.model,
            body,
        )
    }
}
