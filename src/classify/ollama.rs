use super::{Classifier, chat};
use crate::error::Result;

/// Self-hosted OpenAI-compatible endpoint (e.g. Ollama's `/v1`).
pub struct OllamaClassifier {
    http: reqwest::blocking::Client,
    base_url: String,
    model: String,
}

impl OllamaClassifier {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

impl Classifier for OllamaClassifier {
    fn provider(&self) -> &str {
        "ollama"
    }

    fn classify(&self, body: &str) -> Result<String> {
        chat::complete(
            &self.http,
            self.provider(),
            &self.base_url,
            None,
            &self.model,
            body,
        )
    }
}
