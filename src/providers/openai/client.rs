use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::auth::{DEFAULT_BASE_URL, OpenAiConfig};
use super::errors::ProviderError;
use super::types::{ApiMessage, ChatCompletionRequest, ChatCompletionResponse};
use crate::session::{CompletionBackend, ConversationTurn};

/// Credential placeholder used when no API key is configured.
///
/// The request still goes out so the provider's own auth failure surfaces
/// through the normal error path instead of a startup crash.
const PLACEHOLDER_API_KEY: &str = "unset";

/// OpenAI-compatible API client.
pub struct OpenAiClient {
    config: OpenAiConfig,
    /// Persona instruction, constant for the session.
    instruction: String,
    http: reqwest::Client,
}

impl OpenAiClient {
    /// Creates a new client with the given configuration and persona
    /// instruction.
    ///
    /// # Panics
    /// - In test builds (`#[cfg(test)]`), panics if `base_url` is the
    ///   production API.
    /// - At runtime, panics if `GOATTERM_BLOCK_REAL_API=1` and `base_url`
    ///   is the production API.
    ///
    /// This prevents tests from accidentally making real network requests.
    /// Use `OPENAI_BASE_URL` or config to point at a mock server.
    pub fn new(config: OpenAiConfig, instruction: impl Into<String>) -> Self {
        #[cfg(test)]
        if config.base_url == DEFAULT_BASE_URL {
            panic!(
                "Tests must not use the production API!\n\
                 Set OPENAI_BASE_URL to a mock server (e.g., wiremock).\n\
                 Found base_url: {}",
                config.base_url
            );
        }

        #[cfg(not(test))]
        if std::env::var("GOATTERM_BLOCK_REAL_API").is_ok_and(|v| v == "1")
            && config.base_url == DEFAULT_BASE_URL
        {
            panic!(
                "GOATTERM_BLOCK_REAL_API=1 but trying to use the production API!\n\
                 Set OPENAI_BASE_URL to a mock server.\n\
                 Found base_url: {}",
                config.base_url
            );
        }

        Self {
            config,
            instruction: instruction.into(),
            http: reqwest::Client::new(),
        }
    }
}

impl CompletionBackend for OpenAiClient {
    /// Sends the persona instruction plus the full turn history, returning
    /// the first choice's text.
    ///
    /// Non-streaming, no retry, no explicit timeout. Every failure mode
    /// (transport, status, parse) comes back as one error with a
    /// human-readable message.
    async fn complete(&self, turns: &[ConversationTurn]) -> Result<String> {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(ApiMessage::system(&self.instruction));
        messages.extend(turns.iter().map(ApiMessage::from_turn));

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        let api_key = self
            .config
            .api_key
            .as_deref()
            .unwrap_or(PLACEHOLDER_API_KEY);

        debug!(model = %self.config.model, turns = turns.len(), "sending completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .context("completion request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "completion request rejected");
            return Err(ProviderError::http_status(status.as_u16(), &body).into());
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::parse(format!("invalid completion response: {e}")))?;

        parsed
            .first_text()
            .ok_or_else(|| ProviderError::parse("completion response contained no choices").into())
    }
}
