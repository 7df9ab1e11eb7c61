use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use guardian_core::alert::Alert;
use guardian_core::types::{DbId, PatientId, Timestamp};

/// A persisted reading plus the alerts computed when it was recorded.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StoredVitalReading {
    pub id: DbId,
    pub patient_id: PatientId,
    pub recorded_at: Timestamp,
    pub systolic: i32,
    pub diastolic: i32,
    pub heart_rate: i32,
    pub temperature: f64,
    pub blood_glucose: Option<i32>,
    pub oxygen_saturation: Option<i32>,
    pub alerts: Json<Vec<Alert>>,
    pub created_at: Timestamp,
}
