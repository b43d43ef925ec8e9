//! Client for an OpenAI-compatible chat-completion endpoint
//!
//! Used by the chat endpoint and by the chapter generator. Every call is a
//! single request bounded by the configured timeout; nothing is retried or
//! cached.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Default base URL of the completion service
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model requested from the completion service
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Everything that can go wrong talking to the completion service
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("no API key configured for the completion service")]
    MissingApiKey,
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("completion service returned status {0}")]
    Status(StatusCode),
    #[error("completion response was malformed: {0}")]
    Malformed(String),
}

/// Settings for [`CompletionClient`]
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    /// Base URL; `/chat/completions` is appended
    pub base_url: String,
    /// Model name sent with each request
    pub model: String,
    /// Bearer token; checked at request time, not at construction
    pub api_key: Option<String>,
    /// Upper bound on a whole request, including reading the body
    pub timeout: Duration,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}

/// HTTP client wrapper for the completion service
#[derive(Debug, Clone)]
pub struct CompletionClient {
    settings: CompletionSettings,
    client: Client,
}

impl CompletionClient {
    /// Creates a new client
    ///
    /// ### Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(settings: CompletionSettings) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self { settings, client })
    }

    /// The configured model name
    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'))
    }

    /// Sends a single user message and returns the assistant's reply text
    ///
    /// ### Errors
    ///
    /// Returns an `UpstreamError` if no API key is configured, the request
    /// fails or times out, the service answers with a non-success status, or
    /// the body does not contain `choices[0].message.content`.
    #[instrument(skip(self, prompt), fields(model = %self.settings.model, prompt_len = prompt.len()))]
    pub async fn complete(&self, prompt: &str) -> Result<String, UpstreamError> {
        let api_key = self.settings.api_key.as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(UpstreamError::MissingApiKey)?;

        let body = ChatCompletionRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
        };

        debug!("Sending completion request");
        let response = self.client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Completion service answered with {}", status);
            return Err(UpstreamError::Status(status));
        }

        let parsed: ChatCompletionResponse = response.json().await
            .map_err(|e| UpstreamError::Malformed(e.to_string()))?;

        let content = parsed.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| UpstreamError::Malformed("missing choices[0].message.content".to_string()))?;

        debug!("Received {} bytes of completion text", content.len());
        Ok(content)
    }
}
