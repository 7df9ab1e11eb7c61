//! Patient records created at intake.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use guardian_core::intake::{EmergencyContact, PatientProfile};
use guardian_core::types::{DbId, PatientId, Timestamp};

/// A row from the `patients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Patient {
    pub id: DbId,
    pub patient_id: PatientId,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub chronic_conditions: Json<Vec<String>>,
    pub current_medications: Json<Vec<String>>,
    pub allergies: Json<Vec<String>>,
    pub emergency_contact: Option<Json<EmergencyContact>>,
    pub primary_concern: String,
    pub intake_date: Timestamp,
    pub created_at: Timestamp,
}

impl Patient {
    /// The advisory view of this patient. `recent_concern` falls back to the
    /// concern recorded at intake.
    pub fn profile(&self, recent_concern: Option<String>) -> PatientProfile {
        PatientProfile {
            patient_id: self.patient_id.clone(),
            age: Some(self.age),
            chronic_conditions: self.chronic_conditions.0.clone(),
            current_medications: self.current_medications.0.clone(),
            recent_concern: recent_concern.or_else(|| Some(self.primary_concern.clone())),
        }
    }
}
