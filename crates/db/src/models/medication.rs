//! Medication and dose models.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use guardian_core::medication::ReminderTime;
use guardian_core::types::{DbId, PatientId, Timestamp};

/// A row from the `medications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Medication {
    pub id: DbId,
    pub patient_id: PatientId,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub times: Json<Vec<ReminderTime>>,
    pub instructions: String,
    pub refill_date: Option<Timestamp>,
    pub is_active: bool,
    /// Adherence is measured from this instant.
    pub started_at: Timestamp,
    pub created_at: Timestamp,
}

/// One dose the patient reported taking.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MedicationDose {
    pub id: DbId,
    pub medication_id: DbId,
    pub taken_at: Timestamp,
    pub created_at: Timestamp,
}
