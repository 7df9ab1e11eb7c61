//! Per-patient reading history with a retention bound.
//!
//! Appends for the same patient serialize on that patient's mutex; appends
//! for different patients only share a brief read lock on the outer map.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use chrono::Duration;
use serde::Deserialize;

use crate::error::CoreError;
use crate::types::PatientId;
use crate::vitals::reading::VitalReading;

/// Default cap on readings kept per patient.
pub const DEFAULT_MAX_READINGS: usize = 1_000;

/// Upper bound on `max_age_hours`, one hundred years.
pub const MAX_RETENTION_AGE_HOURS: i64 = 24 * 365 * 100;

/// How much history to keep per patient. Oldest readings are evicted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Keep at most this many readings.
    pub max_readings: Option<usize>,
    /// Drop readings older than this, measured from the newest reading.
    pub max_age: Option<Duration>,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_readings: Some(DEFAULT_MAX_READINGS),
            max_age: None,
        }
    }
}

impl RetentionPolicy {
    /// No eviction at all.
    pub fn unbounded() -> Self {
        Self {
            max_readings: None,
            max_age: None,
        }
    }
}

/// Retention section of the agent configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    pub max_readings: Option<usize>,
    pub max_age_hours: Option<i64>,
}

impl RetentionPolicy {
    /// Resolve the configured retention, filling in defaults.
    pub fn from_config(config: &RetentionConfig) -> Result<Self, CoreError> {
        if config.max_readings == Some(0) {
            return Err(CoreError::Validation(
                "retention.max_readings must be at least 1".to_string(),
            ));
        }
        let max_age = match config.max_age_hours {
            None => None,
            Some(hours) if (1..=MAX_RETENTION_AGE_HOURS).contains(&hours) => {
                Some(Duration::hours(hours))
            }
            Some(hours) => {
                return Err(CoreError::Validation(format!(
                    "retention.max_age_hours must be between 1 and {MAX_RETENTION_AGE_HOURS}, got {hours}"
                )));
            }
        };
        Ok(Self {
            max_readings: config.max_readings.or(Some(DEFAULT_MAX_READINGS)),
            max_age,
        })
    }
}

// ---------------------------------------------------------------------------
// PatientHistory
// ---------------------------------------------------------------------------

/// Insertion-ordered readings for one patient.
#[derive(Debug, Default)]
pub struct PatientHistory {
    readings: VecDeque<VitalReading>,
}

impl PatientHistory {
    /// Append a reading, then evict from the front per `policy`.
    ///
    /// Returns how many readings were evicted.
    pub fn push(&mut self, reading: VitalReading, policy: &RetentionPolicy) -> usize {
        let newest = reading.timestamp;
        self.readings.push_back(reading);

        let before = self.readings.len();

        // Non-positive ages, and cutoffs before the earliest representable
        // instant, evict nothing.
        if let Some(cutoff) = policy
            .max_age
            .filter(|max_age| *max_age > Duration::zero())
            .and_then(|max_age| newest.checked_sub_signed(max_age))
        {
            while self
                .readings
                .front()
                .is_some_and(|oldest| oldest.timestamp < cutoff)
            {
                self.readings.pop_front();
            }
        }

        if let Some(max) = policy.max_readings {
            while self.readings.len() > max {
                self.readings.pop_front();
            }
        }

        before - self.readings.len()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// The last `n` readings, oldest first.
    pub fn recent(&self, n: usize) -> Vec<VitalReading> {
        let skip = self.readings.len().saturating_sub(n);
        self.readings.iter().skip(skip).cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VitalReading> {
        self.readings.iter()
    }
}

// ---------------------------------------------------------------------------
// HistoryStore
// ---------------------------------------------------------------------------

type SharedHistory = Arc<Mutex<PatientHistory>>;

/// Map of patient id to history. Safe to share across request handlers.
#[derive(Debug, Default)]
pub struct HistoryStore {
    patients: RwLock<HashMap<PatientId, SharedHistory>>,
    retention: RetentionPolicy,
}

impl HistoryStore {
    pub fn new(retention: RetentionPolicy) -> Self {
        Self {
            patients: RwLock::new(HashMap::new()),
            retention,
        }
    }

    pub fn retention(&self) -> &RetentionPolicy {
        &self.retention
    }

    /// Append a reading to its patient's history, creating it if absent.
    ///
    /// Returns the history length after the append and any eviction.
    pub fn append(&self, reading: VitalReading) -> usize {
        let history = self.get_or_create(&reading.patient_id);
        let mut guard = lock(&history);
        guard.push(reading, &self.retention);
        guard.len()
    }

    /// Number of readings held for a patient.
    pub fn len(&self, patient_id: &str) -> usize {
        self.get(patient_id).map_or(0, |h| lock(&h).len())
    }

    /// All readings for a patient, oldest first.
    pub fn snapshot(&self, patient_id: &str) -> Vec<VitalReading> {
        self.get(patient_id)
            .map(|h| lock(&h).iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The last `n` readings for a patient, oldest first.
    pub fn recent(&self, patient_id: &str, n: usize) -> Vec<VitalReading> {
        self.get(patient_id)
            .map(|h| lock(&h).recent(n))
            .unwrap_or_default()
    }

    /// Number of patients with at least one recorded reading.
    pub fn patient_count(&self) -> usize {
        self.patients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn get(&self, patient_id: &str) -> Option<SharedHistory> {
        self.patients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(patient_id)
            .cloned()
    }

    fn get_or_create(&self, patient_id: &str) -> SharedHistory {
        if let Some(existing) = self.get(patient_id) {
            return existing;
        }
        let mut patients = self
            .patients
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(patients.entry(patient_id.to_string()).or_default())
    }
}

/// A poisoned patient lock still guards a structurally valid deque.
fn lock(history: &SharedHistory) -> MutexGuard<'_, PatientHistory> {
    history.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn reading_at(patient: &str, hour: u32, heart_rate: i32) -> VitalReading {
        VitalReading {
            patient_id: patient.to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap(),
            systolic: 120,
            diastolic: 80,
            heart_rate,
            temperature: 36.8,
            blood_glucose: None,
            oxygen_saturation: None,
        }
    }

    #[test]
    fn appends_preserve_insertion_order() {
        let store = HistoryStore::new(RetentionPolicy::unbounded());
        for hr in 60..70 {
            store.append(reading_at("PT1", 8, hr));
        }
        let rates: Vec<i32> = store.snapshot("PT1").iter().map(|r| r.heart_rate).collect();
        assert_eq!(rates, (60..70).collect::<Vec<_>>());
        assert_eq!(store.len("PT1"), 10);
    }

    #[test]
    fn patients_are_isolated() {
        let store = HistoryStore::default();
        store.append(reading_at("PT1", 8, 70));
        store.append(reading_at("PT2", 8, 71));
        store.append(reading_at("PT2", 9, 72));
        assert_eq!(store.len("PT1"), 1);
        assert_eq!(store.len("PT2"), 2);
        assert_eq!(store.len("PT3"), 0);
        assert_eq!(store.patient_count(), 2);
    }

    #[test]
    fn max_readings_evicts_oldest() {
        let store = HistoryStore::new(RetentionPolicy {
            max_readings: Some(3),
            max_age: None,
        });
        for hr in 60..65 {
            store.append(reading_at("PT1", 8, hr));
        }
        let rates: Vec<i32> = store.snapshot("PT1").iter().map(|r| r.heart_rate).collect();
        assert_eq!(rates, vec![62, 63, 64]);
    }

    #[test]
    fn max_age_evicts_relative_to_newest() {
        let store = HistoryStore::new(RetentionPolicy {
            max_readings: None,
            max_age: Some(Duration::hours(2)),
        });
        store.append(reading_at("PT1", 6, 60));
        store.append(reading_at("PT1", 8, 61));
        store.append(reading_at("PT1", 9, 62));
        // 06:00 is older than 09:00 - 2h; 08:00 is not.
        let rates: Vec<i32> = store.snapshot("PT1").iter().map(|r| r.heart_rate).collect();
        assert_eq!(rates, vec![61, 62]);
    }

    #[test]
    fn recent_returns_tail_oldest_first() {
        let store = HistoryStore::default();
        for hr in 60..66 {
            store.append(reading_at("PT1", 8, hr));
        }
        let rates: Vec<i32> = store.recent("PT1", 2).iter().map(|r| r.heart_rate).collect();
        assert_eq!(rates, vec![64, 65]);
        assert_eq!(store.recent("PT1", 100).len(), 6);
        assert!(store.recent("nobody", 5).is_empty());
    }

    #[test]
    fn concurrent_appends_for_one_patient_are_all_kept() {
        let store = Arc::new(HistoryStore::new(RetentionPolicy::unbounded()));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        store.append(reading_at("PT1", 8, t * 100 + i));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.len("PT1"), 400);

        // Each thread's own readings stay in the order it appended them.
        let snapshot = store.snapshot("PT1");
        for t in 0..8 {
            let mine: Vec<i32> = snapshot
                .iter()
                .map(|r| r.heart_rate)
                .filter(|hr| hr / 100 == t)
                .collect();
            assert_eq!(mine, (t * 100..t * 100 + 50).collect::<Vec<_>>());
        }
    }

    #[test]
    fn retention_config_defaults_to_capped() {
        let policy = RetentionPolicy::from_config(&RetentionConfig::default()).unwrap();
        assert_eq!(policy.max_readings, Some(DEFAULT_MAX_READINGS));
        assert_eq!(policy.max_age, None);

        let policy = RetentionPolicy::from_config(&RetentionConfig {
            max_readings: Some(10),
            max_age_hours: Some(48),
        })
        .unwrap();
        assert_eq!(policy.max_readings, Some(10));
        assert_eq!(policy.max_age, Some(Duration::hours(48)));
    }

    #[test]
    fn retention_config_rejects_out_of_range_values() {
        for max_age_hours in [-1, 0, MAX_RETENTION_AGE_HOURS + 1, i64::MAX] {
            let config = RetentionConfig {
                max_readings: None,
                max_age_hours: Some(max_age_hours),
            };
            assert_matches!(
                RetentionPolicy::from_config(&config),
                Err(CoreError::Validation(_)),
                "{max_age_hours}"
            );
        }
        let config = RetentionConfig {
            max_readings: Some(0),
            max_age_hours: None,
        };
        assert_matches!(
            RetentionPolicy::from_config(&config),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn negative_max_age_never_evicts_the_new_reading() {
        let store = HistoryStore::new(RetentionPolicy {
            max_readings: None,
            max_age: Some(Duration::hours(-1)),
        });
        for hour in 8..11 {
            store.append(reading_at("PT1", hour, 70));
        }
        assert_eq!(store.len("PT1"), 3);
    }

    #[test]
    fn max_age_near_earliest_timestamp_keeps_readings() {
        let store = HistoryStore::new(RetentionPolicy {
            max_readings: None,
            max_age: Some(Duration::hours(MAX_RETENTION_AGE_HOURS)),
        });
        let mut reading = reading_at("PT1", 8, 70);
        reading.timestamp = chrono::DateTime::<Utc>::MIN_UTC;
        store.append(reading.clone());
        store.append(reading);
        assert_eq!(store.len("PT1"), 2);
    }
}
