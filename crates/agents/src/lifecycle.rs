//! Common agent lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AgentError;

/// Lifecycle shared by all agents.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Stable registry key, e.g. `"vital_signs_monitor"`.
    fn key(&self) -> &'static str;

    /// Display name from configuration.
    fn name(&self) -> &str;

    fn enabled(&self) -> bool;

    async fn initialize(&self) -> Result<(), AgentError>;

    async fn shutdown(&self);

    fn is_healthy(&self) -> bool;

    fn status(&self) -> AgentStatus {
        AgentStatus {
            key: self.key(),
            name: self.name().to_string(),
            enabled: self.enabled(),
            healthy: self.is_healthy(),
        }
    }
}

/// Point-in-time view of one agent, as reported by the status endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentStatus {
    pub key: &'static str,
    pub name: String,
    pub enabled: bool,
    pub healthy: bool,
}

/// Initialized flag plus the identity every agent logs with.
#[derive(Debug)]
pub(crate) struct Lifecycle {
    key: &'static str,
    name: String,
    enabled: bool,
    initialized: AtomicBool,
}

impl Lifecycle {
    pub(crate) fn new(key: &'static str, name: String, enabled: bool) -> Self {
        Self {
            key,
            name,
            enabled,
            initialized: AtomicBool::new(false),
        }
    }

    pub(crate) fn key(&self) -> &'static str {
        self.key
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub(crate) fn mark_initialized(&self) {
        self.initialized.store(true, Ordering::Release);
        tracing::info!(agent = self.key, name = %self.name, "Agent initialized");
    }

    pub(crate) fn mark_shut_down(&self) {
        if self.initialized.swap(false, Ordering::AcqRel) {
            tracing::info!(agent = self.key, name = %self.name, "Agent shut down");
        }
    }

    /// Refuse work until the agent is initialized.
    pub(crate) fn ensure_ready(&self) -> Result<(), AgentError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(AgentError::Unavailable(self.key))
        }
    }
}
