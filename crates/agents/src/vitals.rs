//! Vital signs monitor: threshold alerts and trend summaries.

use std::sync::Arc;

use async_trait::async_trait;

use guardian_core::agent_names::AGENT_VITAL_SIGNS_MONITOR;
use guardian_core::alert::Alert;
use guardian_core::generation::TextGenerator;
use guardian_core::vitals::{
    AlertResult, RetentionPolicy, Thresholds, TrendSummary, VitalReading, VitalSignsEvaluator,
};

use crate::config::VitalsSettings;
use crate::error::AgentError;
use crate::lifecycle::{Agent, Lifecycle};

const DEFAULT_NAME: &str = "Vital Signs Monitor";
const DEFAULT_TEMPERATURE: f32 = 0.3;

pub struct VitalSignsMonitor {
    lifecycle: Lifecycle,
    temperature: f32,
    evaluator: VitalSignsEvaluator,
    generator: Arc<dyn TextGenerator>,
}

impl VitalSignsMonitor {
    /// Fails when a configured threshold band or retention bound is malformed.
    pub fn new(
        settings: &VitalsSettings,
        generator: Arc<dyn TextGenerator>,
    ) -> Result<Self, AgentError> {
        let thresholds = Thresholds::from_config(&settings.thresholds)?;
        let retention = RetentionPolicy::from_config(&settings.retention)?;
        Ok(Self {
            lifecycle: Lifecycle::new(
                AGENT_VITAL_SIGNS_MONITOR,
                settings.agent.display_name(DEFAULT_NAME),
                settings.agent.enabled,
            ),
            temperature: settings.agent.temperature_or(DEFAULT_TEMPERATURE),
            evaluator: VitalSignsEvaluator::new(thresholds, retention),
            generator,
        })
    }

    pub fn thresholds(&self) -> &Thresholds {
        self.evaluator.thresholds()
    }

    /// Record a reading and return any threshold violations.
    pub fn record_vital_signs(&self, reading: VitalReading) -> Result<AlertResult, AgentError> {
        let alerts = self.check_vital_signs(&reading)?;
        let recorded_at = reading.timestamp;
        self.commit_vital_signs(reading);
        Ok(AlertResult {
            recorded: true,
            alerts,
            recorded_at,
        })
    }

    /// Check a reading against the thresholds without adding it to history.
    ///
    /// Callers that persist readings elsewhere commit only once that
    /// succeeds.
    pub fn check_vital_signs(&self, reading: &VitalReading) -> Result<Vec<Alert>, AgentError> {
        self.lifecycle.ensure_ready()?;
        let alerts = self.evaluator.evaluate(reading)?;

        if alerts.is_empty() {
            tracing::debug!(patient_id = %reading.patient_id, "Vital signs within thresholds");
        } else {
            tracing::warn!(
                patient_id = %reading.patient_id,
                alert_count = alerts.len(),
                alerts = ?alerts,
                "Vital signs outside threshold",
            );
        }
        Ok(alerts)
    }

    /// Append a checked reading to the patient's trend history.
    pub fn commit_vital_signs(&self, reading: VitalReading) {
        tracing::debug!(patient_id = %reading.patient_id, "Vital signs recorded");
        self.evaluator.commit(reading);
    }

    /// Summarize the last `window_days` of readings.
    pub async fn analyze_trends(
        &self,
        patient_id: &str,
        window_days: u32,
    ) -> Result<TrendSummary, AgentError> {
        self.lifecycle.ensure_ready()?;
        tracing::info!(patient_id, window_days, "Analyzing vital sign trends");
        Ok(self
            .evaluator
            .analyze_trends(self.generator.as_ref(), patient_id, window_days, self.temperature)
            .await?)
    }

    /// Readings held in memory for a patient.
    pub fn history_len(&self, patient_id: &str) -> usize {
        self.evaluator.history_len(patient_id)
    }
}

#[async_trait]
impl Agent for VitalSignsMonitor {
    fn key(&self) -> &'static str {
        self.lifecycle.key()
    }

    fn name(&self) -> &str {
        self.lifecycle.name()
    }

    fn enabled(&self) -> bool {
        self.lifecycle.enabled()
    }

    async fn initialize(&self) -> Result<(), AgentError> {
        self.lifecycle.mark_initialized();
        Ok(())
    }

    async fn shutdown(&self) {
        self.lifecycle.mark_shut_down();
    }

    fn is_healthy(&self) -> bool {
        self.lifecycle.is_initialized()
    }
}
