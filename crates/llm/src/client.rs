//! HTTP client for the chat completion endpoint.

use std::time::Duration;

use async_trait::async_trait;

use guardian_core::generation::{GenerationError, GenerationRequest, TextGenerator};

use crate::config::LlmConfig;
use crate::messages::{ChatCompletionRequest, ChatCompletionResponse};

/// Errors from the chat completion HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("LLM API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// A 2xx response with no usable message content.
    #[error("LLM returned no content")]
    EmptyResponse,

    /// `OPENAI_API_KEY` is not set.
    #[error("OPENAI_API_KEY is not configured")]
    MissingApiKey,
}

/// Client for one OpenAI-compatible backend.
pub struct ChatCompletionClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl ChatCompletionClient {
    /// Build a client with the configured per-request timeout.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Reuse an existing [`reqwest::Client`] (shares its connection pool).
    pub fn with_client(client: reqwest::Client, config: LlmConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Send one completion request and return the first choice's content.
    pub async fn complete(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let api_key = self.config.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let body = ChatCompletionRequest::from_generation(&self.config.model, request);

        tracing::debug!(
            model = %self.config.model,
            temperature = request.temperature,
            prompt_len = request.prompt.len(),
            "Sending chat completion request",
        );

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: ChatCompletionResponse = Self::parse_response(response).await?;
        parsed.into_content().ok_or(LlmError::EmptyResponse)
    }

    // ---- private helpers ----

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, LlmError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    fn to_generation_error(&self, err: LlmError) -> GenerationError {
        match err {
            LlmError::Request(e) if e.is_timeout() => {
                GenerationError::Timeout(self.config.request_timeout_secs)
            }
            LlmError::Request(e) => GenerationError::Transport(e.to_string()),
            LlmError::ApiError { status, body } => GenerationError::Api { status, body },
            LlmError::EmptyResponse => GenerationError::EmptyResponse,
            LlmError::MissingApiKey => {
                GenerationError::NotConfigured("OPENAI_API_KEY is not set".to_string())
            }
        }
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.complete(request).await.map_err(|e| {
            tracing::warn!(error = %e, "Chat completion failed");
            self.to_generation_error(e)
        })
    }
}
