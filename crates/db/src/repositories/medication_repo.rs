//! Repository for the `medications` and `medication_doses` tables.

use sqlx::types::Json;
use sqlx::SqlitePool;
use guardian_core::medication::NewMedication;
use guardian_core::types::{DbId, Timestamp};

use crate::models::medication::{Medication, MedicationDose};

/// Column list for `medications` SELECT queries.
const COLUMNS: &str = "\
    id, patient_id, name, dosage, frequency, times, instructions, \
    refill_date, is_active, started_at, created_at";

const DOSE_COLUMNS: &str = "id, medication_id, taken_at, created_at";

/// Provides query operations for medications and their doses.
pub struct MedicationRepo;

impl MedicationRepo {
    /// Start tracking a medication. A patient cannot track two medications
    /// with the same name (unique violation).
    pub async fn create(
        pool: &SqlitePool,
        patient_id: &str,
        medication: &NewMedication,
        started_at: Timestamp,
    ) -> Result<Medication, sqlx::Error> {
        let query = format!(
            "INSERT INTO medications \
                (patient_id, name, dosage, frequency, times, instructions, refill_date, started_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Medication>(&query)
            .bind(patient_id)
            .bind(medication.name.trim())
            .bind(&medication.dosage)
            .bind(&medication.frequency)
            .bind(Json(&medication.times))
            .bind(&medication.instructions)
            .bind(medication.refill_date)
            .bind(started_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Medication>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM medications WHERE id = ?1");
        sqlx::query_as::<_, Medication>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All medications for a patient, oldest first.
    pub async fn list_for_patient(
        pool: &SqlitePool,
        patient_id: &str,
    ) -> Result<Vec<Medication>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM medications WHERE patient_id = ?1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, Medication>(&query)
            .bind(patient_id)
            .fetch_all(pool)
            .await
    }

    /// Every active medication across all patients (for the reminder scheduler).
    pub async fn list_active(pool: &SqlitePool) -> Result<Vec<Medication>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM medications WHERE is_active = 1 ORDER BY id ASC");
        sqlx::query_as::<_, Medication>(&query).fetch_all(pool).await
    }

    /// Record that a dose was taken.
    pub async fn record_dose(
        pool: &SqlitePool,
        medication_id: DbId,
        taken_at: Timestamp,
    ) -> Result<MedicationDose, sqlx::Error> {
        let query = format!(
            "INSERT INTO medication_doses (medication_id, taken_at) \
             VALUES (?1, ?2) \
             RETURNING {DOSE_COLUMNS}"
        );
        sqlx::query_as::<_, MedicationDose>(&query)
            .bind(medication_id)
            .bind(taken_at)
            .fetch_one(pool)
            .await
    }

    /// Doses taken at or after `since`, oldest first.
    pub async fn list_doses(
        pool: &SqlitePool,
        medication_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<MedicationDose>, sqlx::Error> {
        let query = format!(
            "SELECT {DOSE_COLUMNS} FROM medication_doses \
             WHERE medication_id = ?1 AND taken_at >= ?2 \
             ORDER BY taken_at ASC, id ASC"
        );
        sqlx::query_as::<_, MedicationDose>(&query)
            .bind(medication_id)
            .bind(since)
            .fetch_all(pool)
            .await
    }
}
