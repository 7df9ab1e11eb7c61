//! The four HealthGuardian agents and the registry that owns them.
//!
//! Every agent formats prompts from typed inputs and sends them through a
//! shared [`guardian_core::generation::TextGenerator`]. Lifecycle
//! (initialize, shutdown, health) is common to all of them via [`Agent`].

pub mod advisor;
pub mod config;
pub mod error;
pub mod intake;
pub mod lifecycle;
pub mod medication;
pub mod registry;
pub mod vitals;

pub use advisor::HealthAdvisor;
pub use config::AgentsConfig;
pub use error::AgentError;
pub use intake::IntakeAgent;
pub use lifecycle::{Agent, AgentStatus};
pub use medication::MedicationManager;
pub use registry::AgentRegistry;
pub use vitals::VitalSignsMonitor;
