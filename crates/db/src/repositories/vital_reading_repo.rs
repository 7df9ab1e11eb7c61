//! Repository for the `vital_readings` table (append-only time-series).

use sqlx::types::Json;
use sqlx::SqlitePool;
use guardian_core::alert::Alert;
use guardian_core::types::Timestamp;
use guardian_core::vitals::VitalReading;

use crate::models::vital::StoredVitalReading;

/// Column list for `vital_readings` SELECT queries.
const COLUMNS: &str = "\
    id, patient_id, recorded_at, systolic, diastolic, heart_rate, temperature, \
    blood_glucose, oxygen_saturation, alerts, created_at";

/// Provides query operations for vital readings.
pub struct VitalReadingRepo;

impl VitalReadingRepo {
    /// Persist a reading together with the alerts it raised.
    pub async fn insert(
        pool: &SqlitePool,
        reading: &VitalReading,
        alerts: &[Alert],
    ) -> Result<StoredVitalReading, sqlx::Error> {
        let query = format!(
            "INSERT INTO vital_readings \
                (patient_id, recorded_at, systolic, diastolic, heart_rate, temperature, \
                 blood_glucose, oxygen_saturation, alerts) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StoredVitalReading>(&query)
            .bind(&reading.patient_id)
            .bind(reading.timestamp)
            .bind(reading.systolic)
            .bind(reading.diastolic)
            .bind(reading.heart_rate)
            .bind(reading.temperature)
            .bind(reading.blood_glucose)
            .bind(reading.oxygen_saturation)
            .bind(Json(alerts))
            .fetch_one(pool)
            .await
    }

    /// The most recent readings for a patient, newest first.
    pub async fn list_for_patient(
        pool: &SqlitePool,
        patient_id: &str,
        limit: i64,
    ) -> Result<Vec<StoredVitalReading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vital_readings \
             WHERE patient_id = ?1 \
             ORDER BY recorded_at DESC, id DESC \
             LIMIT ?2"
        );
        sqlx::query_as::<_, StoredVitalReading>(&query)
            .bind(patient_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_patient(pool: &SqlitePool, patient_id: &str) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vital_readings WHERE patient_id = ?1")
            .bind(patient_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Delete readings recorded before `cutoff`. Returns the number removed.
    pub async fn delete_older_than(pool: &SqlitePool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vital_readings WHERE recorded_at < ?1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
