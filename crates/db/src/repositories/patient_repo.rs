//! Repository for the `patients` table.

use sqlx::types::Json;
use sqlx::SqlitePool;
use guardian_core::intake::PatientIntake;

use crate::models::patient::Patient;

/// Column list for `patients` SELECT queries.
const COLUMNS: &str = "\
    id, patient_id, name, age, gender, \
    chronic_conditions, current_medications, allergies, emergency_contact, \
    primary_concern, intake_date, created_at";

/// Provides query operations for patients.
pub struct PatientRepo;

impl PatientRepo {
    /// Insert a completed intake. Fails with a unique violation when the
    /// `patient_id` is already registered.
    pub async fn create(pool: &SqlitePool, intake: &PatientIntake) -> Result<Patient, sqlx::Error> {
        let query = format!(
            "INSERT INTO patients \
                (patient_id, name, age, gender, chronic_conditions, current_medications, \
                 allergies, emergency_contact, primary_concern, intake_date) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Patient>(&query)
            .bind(&intake.patient_id)
            .bind(&intake.name)
            .bind(intake.age)
            .bind(&intake.gender)
            .bind(Json(&intake.chronic_conditions))
            .bind(Json(&intake.current_medications))
            .bind(Json(&intake.allergies))
            .bind(intake.emergency_contact.as_ref().map(Json))
            .bind(&intake.primary_concern)
            .bind(intake.intake_date)
            .fetch_one(pool)
            .await
    }

    /// Find a patient by its external identifier.
    pub async fn find_by_patient_id(
        pool: &SqlitePool,
        patient_id: &str,
    ) -> Result<Option<Patient>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM patients WHERE patient_id = ?1");
        sqlx::query_as::<_, Patient>(&query)
            .bind(patient_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &SqlitePool, patient_id: &str) -> Result<bool, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM patients WHERE patient_id = ?1)")
                .bind(patient_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0 != 0)
    }

    /// List patients, newest intake first.
    pub async fn list(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<Patient>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM patients \
             ORDER BY intake_date DESC, id DESC \
             LIMIT ?1 OFFSET ?2"
        );
        sqlx::query_as::<_, Patient>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
