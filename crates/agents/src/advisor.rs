//! Health advisor: personalized advice, symptom guidance, wellness plans,
//! and patient education.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;

use guardian_core::agent_names::AGENT_HEALTH_ADVISOR;
use guardian_core::error::CoreError;
use guardian_core::generation::{GenerationRequest, TextGenerator};
use guardian_core::intake::PatientProfile;
use guardian_core::prompts;
use guardian_core::types::{PatientId, Timestamp};

use crate::config::AgentSettings;
use crate::error::AgentError;
use crate::lifecycle::{Agent, Lifecycle};

const DEFAULT_NAME: &str = "Health Advisor";
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Length of every generated wellness plan.
pub const WELLNESS_PLAN_DAYS: u32 = 30;

/// Education level used when the caller does not name one.
pub const DEFAULT_EDUCATION_LEVEL: &str = "basic";

#[derive(Debug, Clone, Serialize)]
pub struct PersonalizedAdvice {
    pub patient_id: PatientId,
    pub generated_at: Timestamp,
    pub advice: String,
    pub follow_up_recommended: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Routine,
    Urgent,
    Emergency,
}

#[derive(Debug, Clone, Serialize)]
pub struct SymptomAssessment {
    pub symptom: String,
    pub assessment: String,
    pub urgency_level: UrgencyLevel,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct WellnessPlan {
    pub patient_id: PatientId,
    pub goals: Vec<String>,
    pub plan: String,
    pub duration_days: u32,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct EducationContent {
    pub topic: String,
    pub level: String,
    pub content: String,
    pub generated_at: Timestamp,
}

pub struct HealthAdvisor {
    lifecycle: Lifecycle,
    temperature: f32,
    generator: Arc<dyn TextGenerator>,
}

impl HealthAdvisor {
    pub fn new(settings: &AgentSettings, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            lifecycle: Lifecycle::new(
                AGENT_HEALTH_ADVISOR,
                settings.display_name(DEFAULT_NAME),
                settings.enabled,
            ),
            temperature: settings.temperature_or(DEFAULT_TEMPERATURE),
            generator,
        }
    }

    pub async fn get_personalized_advice(
        &self,
        profile: &PatientProfile,
    ) -> Result<PersonalizedAdvice, AgentError> {
        self.lifecycle.ensure_ready()?;
        tracing::info!(patient_id = %profile.patient_id, "Generating personalized advice");

        let advice = self.generate(prompts::personalized_advice(profile)).await?;
        Ok(PersonalizedAdvice {
            patient_id: profile.patient_id.clone(),
            generated_at: Utc::now(),
            advice,
            follow_up_recommended: true,
        })
    }

    /// Guidance for a reported symptom. Urgency is always `routine`; the
    /// narrative itself lists the warning signs that need attention.
    pub async fn assess_symptom(
        &self,
        description: &str,
        conditions: &[String],
    ) -> Result<SymptomAssessment, AgentError> {
        self.lifecycle.ensure_ready()?;
        let description = description.trim();
        if description.is_empty() {
            return Err(CoreError::Validation("symptom description is required".to_string()).into());
        }
        tracing::info!(conditions = conditions.len(), "Assessing symptom");

        let assessment = self
            .generate(prompts::symptom_assessment(description, conditions))
            .await?;
        Ok(SymptomAssessment {
            symptom: description.to_string(),
            assessment,
            urgency_level: UrgencyLevel::Routine,
            timestamp: Utc::now(),
        })
    }

    pub async fn generate_wellness_plan(
        &self,
        patient_id: &str,
        goals: Vec<String>,
    ) -> Result<WellnessPlan, AgentError> {
        self.lifecycle.ensure_ready()?;
        let goals: Vec<String> = goals
            .into_iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect();
        if goals.is_empty() {
            return Err(CoreError::Validation("at least one goal is required".to_string()).into());
        }
        tracing::info!(patient_id, goals = goals.len(), "Creating wellness plan");

        let plan = self
            .generate(prompts::wellness_plan(WELLNESS_PLAN_DAYS, &goals))
            .await?;
        Ok(WellnessPlan {
            patient_id: patient_id.to_string(),
            goals,
            plan,
            duration_days: WELLNESS_PLAN_DAYS,
            created_at: Utc::now(),
        })
    }

    pub async fn provide_education(
        &self,
        topic: &str,
        level: Option<&str>,
    ) -> Result<EducationContent, AgentError> {
        self.lifecycle.ensure_ready()?;
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(CoreError::Validation("topic is required".to_string()).into());
        }
        let level = level
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_EDUCATION_LEVEL);
        tracing::info!(topic, level, "Providing education");

        let content = self.generate(prompts::education(topic, level)).await?;
        Ok(EducationContent {
            topic: topic.to_string(),
            level: level.to_string(),
            content,
            generated_at: Utc::now(),
        })
    }

    async fn generate(&self, prompt: String) -> Result<String, AgentError> {
        let request = GenerationRequest::new(prompt, self.temperature)
            .with_system_prompt(prompts::ADVISOR_SYSTEM_PROMPT);
        Ok(self.generator.generate(&request).await?)
    }
}

#[async_trait]
impl Agent for HealthAdvisor {
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
