//! Endpoint and sampling configuration for [`crate::OpenAiClient`].

use crate::error::LlmError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    /// Base URL without a trailing slash, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var            | Required | Default                      |
    /// |--------------------|----------|------------------------------|
    /// | `OPENAI_API_KEY`   | **yes**  | --                           |
    /// | `OPENAI_BASE_URL`  | no       | `https://api.openai.com/v1`  |
    /// | `OPENAI_MODEL`     | no       | `gpt-4o`                     |
    /// | `LLM_TEMPERATURE`  | no       | `0.7`                        |
    /// | `LLM_TIMEOUT_SECS` | no       | `120`                        |
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LlmError> {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::Config("OPENAI_API_KEY must be set".into()))?;

        let base_url = lookup("OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let model = lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into());

        let temperature = match lookup("LLM_TEMPERATURE") {
            Some(raw) => raw
                .parse::<f32>()
                .ok()
                .filter(|t| (0.0..=2.0).contains(t))
                .ok_or_else(|| {
                    LlmError::Config(format!("LLM_TEMPERATURE must be between 0 and 2, got '{raw}'"))
                })?,
            None => DEFAULT_TEMPERATURE,
        };

        let timeout_secs = match lookup("LLM_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                LlmError::Config(format!("LLM_TIMEOUT_SECS must be a valid u64, got '{raw}'"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            base_url,
            model,
            temperature,
            timeout_secs,
        })
    }
}
