//! Patient intake records, validation, and triage types.

use serde::{Deserialize, Serialize};

use crate::agent_names::{AGENT_MEDICATION_MANAGER, AGENT_VITAL_SIGNS_MONITOR};
use crate::error::CoreError;
use crate::types::{PatientId, Timestamp};

/// Oldest age accepted at intake.
const MAX_AGE: i32 = 150;

/// Longest free-text field accepted at intake.
const MAX_TEXT_LEN: usize = 2_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
}

/// Intake form as submitted. `patient_id` is generated when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPatientIntake {
    #[serde(default)]
    pub patient_id: Option<PatientId>,
    pub name: String,
    pub age: i32,
    pub gender: String,
    #[serde(default)]
    pub chronic_conditions: Vec<String>,
    #[serde(default)]
    pub current_medications: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub emergency_contact: Option<EmergencyContact>,
    pub primary_concern: String,
}

impl NewPatientIntake {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("name is required".to_string()));
        }
        if !(0..=MAX_AGE).contains(&self.age) {
            return Err(CoreError::Validation(format!(
                "age must be between 0 and {MAX_AGE}, got {}",
                self.age
            )));
        }
        if self.primary_concern.trim().is_empty() {
            return Err(CoreError::Validation(
                "primary_concern is required".to_string(),
            ));
        }
        if self.primary_concern.len() > MAX_TEXT_LEN {
            return Err(CoreError::Validation(format!(
                "primary_concern must be at most {MAX_TEXT_LEN} characters"
            )));
        }
        if let Some(id) = &self.patient_id {
            if id.trim().is_empty() {
                return Err(CoreError::Validation(
                    "patient_id must not be blank when provided".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// A completed intake record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientIntake {
    pub patient_id: PatientId,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub chronic_conditions: Vec<String>,
    pub current_medications: Vec<String>,
    pub allergies: Vec<String>,
    pub emergency_contact: Option<EmergencyContact>,
    pub primary_concern: String,
    pub intake_date: Timestamp,
}

impl PatientIntake {
    /// Build the record from a validated form, assigning an id if needed.
    pub fn from_new(new: NewPatientIntake, now: Timestamp) -> Self {
        let patient_id = new
            .patient_id
            .map(|id| id.trim().to_string())
            .unwrap_or_else(|| generate_patient_id(now));
        Self {
            patient_id,
            name: new.name.trim().to_string(),
            age: new.age,
            gender: new.gender,
            chronic_conditions: new.chronic_conditions,
            current_medications: new.current_medications,
            allergies: new.allergies,
            emergency_contact: new.emergency_contact,
            primary_concern: new.primary_concern,
            intake_date: now,
        }
    }
}

/// `PT` followed by the UTC timestamp down to milliseconds.
pub fn generate_patient_id(now: Timestamp) -> PatientId {
    format!("PT{}", now.format("%Y%m%d%H%M%S%3f"))
}

// ---------------------------------------------------------------------------
// Advisory profile
// ---------------------------------------------------------------------------

/// The slice of a patient record the advisor needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub patient_id: PatientId,
    pub age: Option<i32>,
    #[serde(default)]
    pub chronic_conditions: Vec<String>,
    #[serde(default)]
    pub current_medications: Vec<String>,
    #[serde(default)]
    pub recent_concern: Option<String>,
}

impl PatientProfile {
    pub fn from_intake(intake: &PatientIntake, recent_concern: Option<String>) -> Self {
        Self {
            patient_id: intake.patient_id.clone(),
            age: Some(intake.age),
            chronic_conditions: intake.chronic_conditions.clone(),
            current_medications: intake.current_medications.clone(),
            recent_concern,
        }
    }
}

// ---------------------------------------------------------------------------
// Triage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriagePriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageAssessment {
    pub priority: TriagePriority,
    pub recommended_agents: Vec<String>,
    /// Free-text assessment from the narrative backend.
    pub notes: String,
}

impl TriageAssessment {
    /// Standard routing for chronic-care intake: medium priority, handed to
    /// medication management and vital-signs monitoring.
    pub fn standard(notes: String) -> Self {
        Self {
            priority: TriagePriority::Medium,
            recommended_agents: vec![
                AGENT_MEDICATION_MANAGER.to_string(),
                AGENT_VITAL_SIGNS_MONITOR.to_string(),
            ],
            notes,
        }
    }
}
