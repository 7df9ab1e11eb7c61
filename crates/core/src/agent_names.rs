//! Canonical agent identifiers.
//!
//! Used as configuration keys, status map keys, and in triage
//! recommendations. Keep in sync with the agent registry.

pub const AGENT_INTAKE: &str = "intake";
pub const AGENT_MEDICATION_MANAGER: &str = "medication_manager";
pub const AGENT_VITAL_SIGNS_MONITOR: &str = "vital_signs_monitor";
pub const AGENT_HEALTH_ADVISOR: &str = "health_advisor";

/// Every agent, in startup order.
pub const ALL_AGENTS: &[&str] = &[
    AGENT_INTAKE,
    AGENT_MEDICATION_MANAGER,
    AGENT_VITAL_SIGNS_MONITOR,
    AGENT_HEALTH_ADVISOR,
];
