//! Chat completion client for OpenAI-compatible backends.
//!
//! [`ChatCompletionClient`] implements [`guardian_core::generation::TextGenerator`]
//! so the agents never see HTTP details.

pub mod client;
pub mod config;
pub mod messages;

pub use client::{ChatCompletionClient, LlmError};
pub use config::LlmConfig;
