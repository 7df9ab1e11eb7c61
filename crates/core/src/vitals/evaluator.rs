//! The vital signs evaluator: record, check, and summarize trends.

use serde::Serialize;

use crate::alert::Alert;
use crate::error::CoreError;
use crate::generation::{GenerationRequest, TextGenerator};
use crate::prompts;
use crate::types::{PatientId, Timestamp};
use crate::vitals::history::{HistoryStore, RetentionPolicy};
use crate::vitals::reading::VitalReading;
use crate::vitals::thresholds::{check_thresholds, Thresholds};

/// Readings assumed per day when sizing the trend window.
///
/// The window is `days * READINGS_PER_DAY` most recent readings, not a
/// calendar range.
pub const READINGS_PER_DAY: usize = 3;

/// Trend window used when the caller does not pass one.
pub const DEFAULT_TREND_WINDOW_DAYS: u32 = 7;

/// Outcome of recording one reading.
#[derive(Debug, Clone, Serialize)]
pub struct AlertResult {
    pub recorded: bool,
    pub alerts: Vec<Alert>,
    pub recorded_at: Timestamp,
}

/// Narrative summary over a trend window.
#[derive(Debug, Clone, Serialize)]
pub struct TrendSummary {
    pub patient_id: PatientId,
    pub period_days: u32,
    pub readings_analyzed: usize,
    pub analysis: String,
}

/// Owns the threshold bands and the per-patient history.
#[derive(Debug)]
pub struct VitalSignsEvaluator {
    thresholds: Thresholds,
    history: HistoryStore,
}

impl VitalSignsEvaluator {
    pub fn new(thresholds: Thresholds, retention: RetentionPolicy) -> Self {
        Self {
            thresholds,
            history: HistoryStore::new(retention),
        }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Validate a reading and return the threshold violations it carries.
    /// History is left untouched.
    pub fn evaluate(&self, reading: &VitalReading) -> Result<Vec<Alert>, CoreError> {
        reading.validate()?;
        Ok(check_thresholds(reading, &self.thresholds))
    }

    /// Append an already evaluated reading to the patient's history.
    pub fn commit(&self, reading: VitalReading) {
        self.history.append(reading);
    }

    /// [`evaluate`](Self::evaluate) then [`commit`](Self::commit).
    pub fn record(&self, reading: VitalReading) -> Result<AlertResult, CoreError> {
        let alerts = self.evaluate(&reading)?;
        let recorded_at = reading.timestamp;
        self.commit(reading);

        Ok(AlertResult {
            recorded: true,
            alerts,
            recorded_at,
        })
    }

    /// Every reading held for a patient, oldest first.
    pub fn history(&self, patient_id: &str) -> Vec<VitalReading> {
        self.history.snapshot(patient_id)
    }

    pub fn history_len(&self, patient_id: &str) -> usize {
        self.history.len(patient_id)
    }

    /// The most recent `window_days * READINGS_PER_DAY` readings.
    pub fn trend_window(
        &self,
        patient_id: &str,
        window_days: u32,
    ) -> Result<Vec<VitalReading>, CoreError> {
        if patient_id.trim().is_empty() {
            return Err(CoreError::Validation(
                "patient_id must not be empty".to_string(),
            ));
        }
        if window_days == 0 {
            return Err(CoreError::Validation(
                "window_days must be at least 1".to_string(),
            ));
        }

        let count = (window_days as usize).saturating_mul(READINGS_PER_DAY);
        let window = self.history.recent(patient_id, count);
        if window.is_empty() {
            return Err(CoreError::NoData(format!(
                "no vital signs recorded for patient {patient_id}"
            )));
        }
        Ok(window)
    }

    /// Summarize the trend window through the narrative generator.
    ///
    /// Generator failures come back as [`CoreError::Generation`] unchanged.
    pub async fn analyze_trends(
        &self,
        generator: &dyn TextGenerator,
        patient_id: &str,
        window_days: u32,
        temperature: f32,
    ) -> Result<TrendSummary, CoreError> {
        let window = self.trend_window(patient_id, window_days)?;
        let Some(latest) = window.last() else {
            return Err(CoreError::NoData(format!(
                "no vital signs recorded for patient {patient_id}"
            )));
        };

        let prompt = prompts::vital_trends(window.len(), latest);
        let analysis = generator
            .generate(&GenerationRequest::new(prompt, temperature))
            .await?;

        Ok(TrendSummary {
            patient_id: patient_id.to_string(),
            period_days: window_days,
            readings_analyzed: window.len(),
            analysis,
        })
    }
}

impl Default for VitalSignsEvaluator {
    fn default() -> Self {
        Self::new(Thresholds::default(), RetentionPolicy::default())
    }
}
