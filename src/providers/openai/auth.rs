use anyhow::{Context, Result};

/// Default base URL for OpenAI-compatible APIs.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for the completion client.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key, if one is configured. Absence is not fatal here: the caller
    /// surfaces it in the transcript and requests fail through the normal
    /// error path.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
}

impl OpenAiConfig {
    /// Creates a new config from environment.
    ///
    /// Environment variables:
    /// - `OPENAI_API_KEY` (optional, see `api_key`)
    /// - `OPENAI_BASE_URL` (optional)
    ///
    /// Base URL resolution order:
    /// 1. `OPENAI_BASE_URL` env var (if set and non-empty)
    /// 2. `config_base_url` parameter (if Some and non-empty)
    /// 3. Default: `https://api.openai.com/v1`
    pub fn from_env(
        model: String,
        temperature: f64,
        config_base_url: Option<&str>,
    ) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let base_url = resolve_base_url(config_base_url)?;

        Ok(Self {
            api_key,
            base_url,
            model,
            temperature,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

fn resolve_base_url(config_base_url: Option<&str>) -> Result<String> {
    if let Ok(env_url) = std::env::var("OPENAI_BASE_URL") {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    if let Some(config_url) = config_base_url {
        let trimmed = config_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    Ok(DEFAULT_BASE_URL.to_string())
}

fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid base URL: {}", url))?;
    Ok(())
}
