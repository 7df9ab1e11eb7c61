//! Domain logic for the HealthGuardian assistant.
//!
//! Everything in this crate is pure: no database access and no network I/O.
//! The LLM is reached only through the [`generation::TextGenerator`] trait so
//! callers can plug in a real client or a test double.

pub mod agent_names;
pub mod alert;
pub mod error;
pub mod generation;
pub mod intake;
pub mod medication;
pub mod prompts;
pub mod types;
pub mod vitals;
