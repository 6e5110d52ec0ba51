use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::models::datasheet::CompletionModel;

const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TEMPLATE_PATH: &str = "templates/datasheet_template.docx";

/// Application configuration loaded from environment variables.
/// Fails at startup if the API credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub default_model: CompletionModel,
    /// Total attempts per completion call. 1 means no retry.
    pub llm_max_attempts: u32,
    pub llm_timeout_secs: u64,
    /// Word template used for DOCX export. Ignored when the file does not exist.
    pub template_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm_api_key: require_env("LLM_API_KEY")?,
            llm_base_url: std::env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string()),
            default_model: std::env::var("LLM_DEFAULT_MODEL")
                .unwrap_or_else(|_| CompletionModel::default().as_str().to_string())
                .parse::<CompletionModel>()
                .context("LLM_DEFAULT_MODEL must be 'gpt-3.5-turbo' or 'gpt-4'")?,
            llm_max_attempts: parse_env("LLM_MAX_ATTEMPTS", 1)?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            template_path: std::env::var("DATASHEET_TEMPLATE_PATH")
                .unwrap_or_else(|_| DEFAULT_TEMPLATE_PATH.to_string())
                .into(),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Returns the template path only if the file is present on disk.
    pub fn existing_template(&self) -> Option<&PathBuf> {
        self.template_path.is_file().then_some(&self.template_path)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        llm_api_key: "test-key".to_string(),
        llm_base_url: "http://127.0.0.1:9".to_string(),
        default_model: CompletionModel::default(),
        llm_max_attempts: 1,
        llm_timeout_secs: 5,
        template_path: PathBuf::from("does/not/exist.docx"),
        port: 0,
        rust_log: "debug".to_string(),
    }
}
