//! Intake agent: patient registration and triage.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;

use guardian_core::agent_names::AGENT_INTAKE;
use guardian_core::generation::{GenerationRequest, TextGenerator};
use guardian_core::intake::{NewPatientIntake, PatientIntake, TriageAssessment};
use guardian_core::prompts;

use crate::config::AgentSettings;
use crate::error::AgentError;
use crate::lifecycle::{Agent, Lifecycle};

const DEFAULT_NAME: &str = "Intake Agent";
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// A completed intake and the acknowledgement generated for it.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeOutcome {
    pub patient: PatientIntake,
    pub acknowledgement: String,
}

pub struct IntakeAgent {
    lifecycle: Lifecycle,
    temperature: f32,
    generator: Arc<dyn TextGenerator>,
}

impl IntakeAgent {
    pub fn new(settings: &AgentSettings, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            lifecycle: Lifecycle::new(
                AGENT_INTAKE,
                settings.display_name(DEFAULT_NAME),
                settings.enabled,
            ),
            temperature: settings.temperature_or(DEFAULT_TEMPERATURE),
            generator,
        }
    }

    /// Validate the form, assign a patient id if needed, and generate an
    /// acknowledgement. Persisting the record is up to the caller.
    pub async fn collect_patient_data(
        &self,
        intake: NewPatientIntake,
    ) -> Result<IntakeOutcome, AgentError> {
        self.lifecycle.ensure_ready()?;
        intake.validate()?;

        let patient = PatientIntake::from_new(intake, Utc::now());
        tracing::info!(patient_id = %patient.patient_id, "Starting patient intake");

        let acknowledgement = self.generate(prompts::intake(&patient)).await?;

        tracing::info!(patient_id = %patient.patient_id, "Patient intake completed");
        Ok(IntakeOutcome {
            patient,
            acknowledgement,
        })
    }

    /// Route a patient to follow-up agents. The narrative backend supplies
    /// the notes; priority and routing are the standard chronic-care ones.
    pub async fn perform_triage(
        &self,
        patient: &PatientIntake,
    ) -> Result<TriageAssessment, AgentError> {
        self.lifecycle.ensure_ready()?;
        tracing::info!(patient_id = %patient.patient_id, "Performing triage");

        let notes = self.generate(prompts::triage(patient)).await?;
        Ok(TriageAssessment::standard(notes))
    }

    async fn generate(&self, prompt: String) -> Result<String, AgentError> {
        let request = GenerationRequest::new(prompt, self.temperature)
            .with_system_prompt(prompts::INTAKE_SYSTEM_PROMPT);
        Ok(self.generator.generate(&request).await?)
    }
}

#[async_trait]
impl Agent for IntakeAgent {
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
