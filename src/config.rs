use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub email: String,
    pub app_password: String,
    #[serde(default = "default_true")]
    pub use_openai: bool,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub ollama_base_url: Option<String>,
    #[serde(default)]
    pub delete_processed: bool,
    #[serde(default)]
    pub recipients: Option<Vec<String>>,

    #[serde(default = "default_imap_server")]
    pub imap_server: String,
    #[serde(default = "default_smtp_server")]
    pub smtp_server: String,
    #[serde(default = "default_folder")]
    pub folder: String,
    #[serde(default = "default_results_path")]
    pub results_path: PathBuf,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,
}

fn default_true() -> bool {
    true
}

fn default_imap_server() -> String {
    "imap.gmail.com".to_string()
}

fn default_smtp_server() -> String {
    "smtp.gmail.com".to_string()
}

fn default_folder() -> String {
    "[Gmail]/Spam".to_string()
}

fn default_results_path() -> PathBuf {
    PathBuf::from("spam_analysis_results.jsonl")
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Config {
    /// Report recipients; the account itself when none are configured.
    pub fn recipients(&self) -> Vec<String> {
        match &self.recipients {
            Some(list) if !list.is_empty() => list.clone(),
            _ => vec![self.email.clone()],
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(Error::Config("email is empty".into()));
        }
        if self.app_password.trim().is_empty() {
            return Err(Error::Config("app_password is empty".into()));
        }
        if self.use_openai {
            if self.openai_api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
                return Err(Error::Config(
                    "openai_api_key is required when use_openai = true".into(),
                ));
            }
        } else if self
            .ollama_base_url
            .as_deref()
            .is_none_or(|u| u.trim().is_empty())
        {
            return Err(Error::Config(
                "ollama_base_url is required when use_openai = false".into(),
            ));
        }
        if self.recipients().iter().any(|r| r.trim().is_empty()) {
            return Err(Error::Config("recipients contains an empty address".into()));
        }
        Ok(())
    }
}

fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| Error::Config("no config dir available".into()))?
        .join("spam_triage"))
}

pub fn default_config_path() -> Result<PathBuf> {
    let p = config_dir()?;
    fs::create_dir_all(&p).map_err(|e| Error::Config(format!("{}: {e}", p.display())))?;
    Ok(p.join("config.toml"))
}

/// Load and validate the configuration.
///
/// Without an explicit path the per-user default is used, and a template is
/// written there on first run.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let path = default_config_path()?;
            if !path.exists() {
                write_template(&path)?;
                return Err(Error::Config(format!(
                    "Created template config at {} — edit it and run again",
                    path.display()
                )));
            }
            path
        }
    };

    let s = fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
    let cfg = parse_config(&path, &s)?;
    cfg.validate()?;
    log::debug!("loaded config from {}", path.display());
    Ok(cfg)
}

fn parse_config(path: &Path, s: &str) -> Result<Config> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(s).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    } else {
        toml::from_str(s).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }
}

fn write_template(path: &Path) -> Result<()> {
    let sample = Config {
        email: "you@gmail.com".to_string(),
        app_password: "your-app-password".to_string(),
        use_openai: true,
        openai_api_key: Some("sk-...".to_string()),
        ollama_base_url: Some("http://localhost:11434/v1".to_string()),
        delete_processed: false,
        recipients: None,
        imap_server: default_imap_server(),
        smtp_server: default_smtp_server(),
        folder: default_folder(),
        results_path: default_results_path(),
        openai_model: default_openai_model(),
        ollama_model: default_ollama_model(),
    };
    let tom = toml::to_string_pretty(&sample).map_err(|e| Error::Config(e.to_string()))?;
    fs::write(path, tom).map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
    Ok(())
}
