//! Agent configuration loaded from a YAML file.
//!
//! ```yaml
//! agents:
//!   intake:
//!     name: Intake Agent
//!     enabled: true
//!     temperature: 0.7
//!   medication_manager:
//!     reminder_interval_secs: 60
//!   vital_signs_monitor:
//!     thresholds:
//!       blood_pressure:
//!         systolic: [90, 140]
//!       heart_rate: [60, 100]
//!     retention:
//!       max_readings: 1000
//!   health_advisor:
//!     enabled: false
//! ```
//!
//! Every key is optional. A missing file yields the defaults.

use std::path::Path;

use serde::Deserialize;

use guardian_core::vitals::{RetentionConfig, RetentionPolicy, ThresholdConfig};

/// Highest sampling temperature accepted by chat completion backends.
const MAX_TEMPERATURE: f32 = 2.0;

/// Default reminder scheduler tick.
pub const DEFAULT_REMINDER_INTERVAL_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum AgentConfigError {
    #[error("Failed to read agent config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse agent config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid agent config: {0}")]
    Invalid(String),
}

/// Settings shared by every agent.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Display name. Each agent has its own default.
    pub name: Option<String>,
    pub enabled: bool,
    /// Sampling temperature. Each agent has its own default.
    pub temperature: Option<f32>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            name: None,
            enabled: true,
            temperature: None,
        }
    }
}

impl AgentSettings {
    pub fn display_name(&self, default: &str) -> String {
        self.name.clone().unwrap_or_else(|| default.to_string())
    }

    pub fn temperature_or(&self, default: f32) -> f32 {
        self.temperature.unwrap_or(default)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MedicationSettings {
    #[serde(flatten)]
    pub agent: AgentSettings,
    pub reminder_interval_secs: u64,
}

impl Default for MedicationSettings {
    fn default() -> Self {
        Self {
            agent: AgentSettings::default(),
            reminder_interval_secs: DEFAULT_REMINDER_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VitalsSettings {
    #[serde(flatten)]
    pub agent: AgentSettings,
    pub thresholds: ThresholdConfig,
    pub retention: RetentionConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentsSection {
    pub intake: AgentSettings,
    pub medication_manager: MedicationSettings,
    pub vital_signs_monitor: VitalsSettings,
    pub health_advisor: AgentSettings,
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    pub agents: AgentsSection,
}

impl AgentsConfig {
    /// Load from `path`. A file that does not exist yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AgentConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_yaml_str(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Agent config not found, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(AgentConfigError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, AgentConfigError> {
        // An empty document deserializes as unit; treat it as all defaults.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AgentConfigError> {
        let a = &self.agents;
        for (key, temperature) in [
            ("intake", a.intake.temperature),
            ("medication_manager", a.medication_manager.agent.temperature),
            ("vital_signs_monitor", a.vital_signs_monitor.agent.temperature),
            ("health_advisor", a.health_advisor.temperature),
        ] {
            if let Some(t) = temperature {
                if !(0.0..=MAX_TEMPERATURE).contains(&t) {
                    return Err(AgentConfigError::Invalid(format!(
                        "{key}.temperature must be between 0 and {MAX_TEMPERATURE}, got {t}"
                    )));
                }
            }
        }
        if a.medication_manager.reminder_interval_secs == 0 {
            return Err(AgentConfigError::Invalid(
                "medication_manager.reminder_interval_secs must be at least 1".to_string(),
            ));
        }
        RetentionPolicy::from_config(&a.vital_signs_monitor.retention).map_err(|e| {
            AgentConfigError::Invalid(format!("vital_signs_monitor: {e}"))
        })?;
        Ok(())
    }
}
