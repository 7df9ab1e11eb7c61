//! The seam between the agents and the large-language-model backend.
//!
//! Agents format prompts and hand them to a [`TextGenerator`]; whatever comes
//! back is passed through untouched. No retries happen on this side of the
//! trait. Retry policy, if any, belongs to the implementation.

use async_trait::async_trait;
use serde::Serialize;

/// A single completion request: an optional persona prompt, the user prompt,
/// and the sampling temperature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub system_prompt: Option<String>,
    pub prompt: String,
    pub temperature: f32,
}

impl GenerationRequest {
    /// Create a request with no system prompt.
    pub fn new(prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            system_prompt: None,
            prompt: prompt.into(),
            temperature,
        }
    }

    /// Attach a persona/system prompt.
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}

/// Failures from the narrative backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// The request never produced an HTTP response (network, DNS, TLS).
    #[error("Generation transport failure: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("Generation backend error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The backend answered successfully but without any content.
    #[error("Generation backend returned an empty response")]
    EmptyResponse,

    /// The caller's time budget ran out before the backend answered.
    #[error("Generation timed out after {0}s")]
    Timeout(u64),

    /// No backend credentials are configured.
    #[error("Generation backend not configured: {0}")]
    NotConfigured(String),
}

/// Anything that can turn a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}
