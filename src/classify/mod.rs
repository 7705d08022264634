//! Language-model backends that turn an email body into a free-form verdict.
//!
//! Both backends speak the chat-completions shape: a system instruction plus
//! the body as the user turn, answer taken from the first choice.

mod chat;
pub mod ollama;
pub mod openai;

pub use ollama::OllamaClassifier;
pub use openai::OpenAiClassifier;

use crate::config::Config;
use crate::error::{Error, Result};

pub const SYSTEM_PROMPT: &str = "You're a spam detection system. Classify the following email content as 'Spam' or 'Not Spam' and explain briefly why.";

pub trait Classifier {
    /// Short backend name used in logs and errors.
    fn provider(&self) -> &str;

    /// Raw model answer for `body`, trimmed.
    fn classify(&self, body: &str) -> Result<String>;
}

/// Pick the backend once, from `use_openai`.
pub fn from_config(cfg: &Config) -> Result<Box<dyn Classifier>> {
    if cfg.use_openai {
        let key = required(cfg.openai_api_key.as_deref(), "openai_api_key")?;
        log::info!("Using OpenAI (model: {})", cfg.openai_model);
        Ok(Box::new(OpenAiClassifier::new(key, &cfg.openai_model)))
    } else {
        let base = required(cfg.ollama_base_url.as_deref(), "ollama_base_url")?;
        log::info!("Using Ollama at {} (model: {})", base, cfg.ollama_model);
        Ok(Box::new(OllamaClassifier::new(base, &cfg.ollama_model)))
    }
}

fn required<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Config(format!("{key} is not set")))
}
