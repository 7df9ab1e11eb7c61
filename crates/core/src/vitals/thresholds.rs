//! Threshold bands and the single-pass range check.
//!
//! Pure logic. Bands are inclusive on both ends: a value equal to `low` or
//! `high` is within range. At most one [`Alert`] is produced per vital type
//! per reading.

use serde::{Deserialize, Serialize};

use crate::alert::{Alert, Severity, VitalType};
use crate::error::CoreError;
use crate::vitals::reading::VitalReading;

/// Default systolic band, mmHg.
pub const DEFAULT_SYSTOLIC: ThresholdBand = ThresholdBand::new(90.0, 140.0);

/// Default diastolic band, mmHg.
pub const DEFAULT_DIASTOLIC: ThresholdBand = ThresholdBand::new(60.0, 90.0);

/// Default heart rate band, bpm.
pub const DEFAULT_HEART_RATE: ThresholdBand = ThresholdBand::new(60.0, 100.0);

/// Default body temperature band, degrees Celsius.
pub const DEFAULT_TEMPERATURE: ThresholdBand = ThresholdBand::new(36.1, 37.8);

/// Inclusive `[low, high]` range. Serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct ThresholdBand {
    pub low: f64,
    pub high: f64,
}

impl ThresholdBand {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// `low <= value <= high`.
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    /// Severity of a value relative to this band, or `None` when in range.
    pub fn classify(&self, value: f64) -> Option<Severity> {
        if value > self.high {
            Some(Severity::High)
        } else if value < self.low {
            Some(Severity::Low)
        } else {
            None
        }
    }

    /// Bounds must be finite and ordered.
    pub fn validate(&self, name: &str) -> Result<(), CoreError> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(CoreError::Validation(format!(
                "{name} threshold bounds must be finite numbers"
            )));
        }
        if self.low > self.high {
            return Err(CoreError::Validation(format!(
                "{name} threshold low bound ({}) must not exceed high bound ({})",
                self.low, self.high
            )));
        }
        Ok(())
    }
}

impl From<[f64; 2]> for ThresholdBand {
    fn from([low, high]: [f64; 2]) -> Self {
        Self { low, high }
    }
}

impl From<ThresholdBand> for [f64; 2] {
    fn from(band: ThresholdBand) -> Self {
        [band.low, band.high]
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Blood pressure bands nest under `blood_pressure` in the agent config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BloodPressureBands {
    pub systolic: Option<ThresholdBand>,
    pub diastolic: Option<ThresholdBand>,
}

/// Threshold section as it appears in the agent configuration file.
///
/// ```yaml
/// thresholds:
///   blood_pressure:
///     systolic: [90, 140]
///     diastolic: [60, 90]
///   heart_rate: [60, 100]
///   temperature: [36.1, 37.8]
///   evaluate_diastolic: false
/// ```
///
/// Absent bands fall back to the `DEFAULT_*` constants.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub blood_pressure: BloodPressureBands,
    pub heart_rate: Option<ThresholdBand>,
    pub temperature: Option<ThresholdBand>,
    /// Diastolic pressure is configured but not checked unless this is set.
    pub evaluate_diastolic: bool,
}

/// Fully resolved bands used by the evaluator. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    pub systolic: ThresholdBand,
    pub diastolic: ThresholdBand,
    pub heart_rate: ThresholdBand,
    pub temperature: ThresholdBand,
    pub evaluate_diastolic: bool,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            systolic: DEFAULT_SYSTOLIC,
            diastolic: DEFAULT_DIASTOLIC,
            heart_rate: DEFAULT_HEART_RATE,
            temperature: DEFAULT_TEMPERATURE,
            evaluate_diastolic: false,
        }
    }
}

impl Thresholds {
    /// Resolve a config section against the defaults, validating every band.
    pub fn from_config(config: &ThresholdConfig) -> Result<Self, CoreError> {
        let thresholds = Self {
            systolic: config.blood_pressure.systolic.unwrap_or(DEFAULT_SYSTOLIC),
            diastolic: config.blood_pressure.diastolic.unwrap_or(DEFAULT_DIASTOLIC),
            heart_rate: config.heart_rate.unwrap_or(DEFAULT_HEART_RATE),
            temperature: config.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            evaluate_diastolic: config.evaluate_diastolic,
        };
        for vital in [
            VitalType::Systolic,
            VitalType::Diastolic,
            VitalType::HeartRate,
            VitalType::Temperature,
        ] {
            thresholds.band(vital).validate(vital.as_str())?;
        }
        Ok(thresholds)
    }

    /// The band configured for a vital type.
    pub fn band(&self, vital: VitalType) -> ThresholdBand {
        match vital {
            VitalType::Systolic => self.systolic,
            VitalType::Diastolic => self.diastolic,
            VitalType::HeartRate => self.heart_rate,
            VitalType::Temperature => self.temperature,
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Check a reading against the bands and return any violations.
///
/// Order is fixed: systolic, diastolic (only when enabled), heart rate,
/// temperature.
pub fn check_thresholds(reading: &VitalReading, thresholds: &Thresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();

    check_band(
        VitalType::Systolic,
        f64::from(reading.systolic),
        thresholds,
        &mut alerts,
    );

    if thresholds.evaluate_diastolic {
        check_band(
            VitalType::Diastolic,
            f64::from(reading.diastolic),
            thresholds,
            &mut alerts,
        );
    }

    check_band(
        VitalType::HeartRate,
        f64::from(reading.heart_rate),
        thresholds,
        &mut alerts,
    );

    check_band(
        VitalType::Temperature,
        reading.temperature,
        thresholds,
        &mut alerts,
    );

    alerts
}

/// Compare one value against its band and push an alert if outside.
fn check_band(vital: VitalType, value: f64, thresholds: &Thresholds, alerts: &mut Vec<Alert>) {
    let band = thresholds.band(vital);
    let Some(severity) = band.classify(value) else {
        return;
    };
    alerts.push(Alert {
        vital_type: vital,
        value,
        threshold: band,
        severity,
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn make_reading(systolic: i32, diastolic: i32, heart_rate: i32, temperature: f64) -> VitalReading {
        VitalReading {
            patient_id: "PT1".to_string(),
            timestamp: Utc::now(),
            systolic,
            diastolic,
            heart_rate,
            temperature,
            blood_glucose: None,
            oxygen_saturation: None,
        }
    }

    fn kinds(alerts: &[Alert]) -> Vec<(VitalType, Severity)> {
        alerts.iter().map(|a| (a.vital_type, a.severity)).collect()
    }

    #[test]
    fn no_alerts_when_within_bands() {
        let alerts = check_thresholds(&make_reading(120, 80, 72, 36.8), &Thresholds::default());
        assert!(alerts.is_empty());
    }

    #[test]
    fn band_edges_are_inclusive() {
        let t = Thresholds::default();
        assert!(check_thresholds(&make_reading(90, 80, 60, 36.1), &t).is_empty());
        assert!(check_thresholds(&make_reading(140, 80, 100, 37.8), &t).is_empty());
    }

    #[test]
    fn hypertensive_tachycardic_reading_yields_two_high_alerts() {
        let alerts = check_thresholds(&make_reading(150, 95, 110, 37.0), &Thresholds::default());
        assert_eq!(
            kinds(&alerts),
            vec![
                (VitalType::Systolic, Severity::High),
                (VitalType::HeartRate, Severity::High),
            ]
        );
        assert_eq!(alerts[0].value, 150.0);
        assert_eq!(alerts[0].threshold, DEFAULT_SYSTOLIC);
    }

    #[test]
    fn everything_low_yields_three_low_alerts_in_order() {
        let alerts = check_thresholds(&make_reading(85, 70, 55, 35.5), &Thresholds::default());
        assert_eq!(
            kinds(&alerts),
            vec![
                (VitalType::Systolic, Severity::Low),
                (VitalType::HeartRate, Severity::Low),
                (VitalType::Temperature, Severity::Low),
            ]
        );
    }

    #[test]
    fn diastolic_ignored_by_default() {
        let alerts = check_thresholds(&make_reading(120, 120, 72, 36.8), &Thresholds::default());
        assert!(alerts.is_empty());
    }

    #[test]
    fn diastolic_checked_when_enabled() {
        let t = Thresholds {
            evaluate_diastolic: true,
            ..Thresholds::default()
        };
        let alerts = check_thresholds(&make_reading(150, 95, 110, 37.0), &t);
        assert_eq!(
            kinds(&alerts),
            vec![
                (VitalType::Systolic, Severity::High),
                (VitalType::Diastolic, Severity::High),
                (VitalType::HeartRate, Severity::High),
            ]
        );
    }

    #[test]
    fn config_overrides_only_named_bands() {
        let config: ThresholdConfig = serde_yaml::from_str(
            "blood_pressure:\n  systolic: [100, 130]\nheart_rate: [50, 90]\n",
        )
        .unwrap();
        let t = Thresholds::from_config(&config).unwrap();
        assert_eq!(t.systolic, ThresholdBand::new(100.0, 130.0));
        assert_eq!(t.heart_rate, ThresholdBand::new(50.0, 90.0));
        assert_eq!(t.diastolic, DEFAULT_DIASTOLIC);
        assert_eq!(t.temperature, DEFAULT_TEMPERATURE);
        assert!(!t.evaluate_diastolic);
    }

    #[test]
    fn inverted_band_is_rejected() {
        let config = ThresholdConfig {
            heart_rate: Some(ThresholdBand::new(100.0, 60.0)),
            ..ThresholdConfig::default()
        };
        assert_matches!(
            Thresholds::from_config(&config),
            Err(CoreError::Validation(msg)) if msg.contains("heart_rate")
        );
    }

    #[test]
    fn alert_serializes_with_wire_names() {
        let alerts = check_thresholds(&make_reading(120, 80, 55, 36.8), &Thresholds::default());
        let json = serde_json::to_value(&alerts[0]).unwrap();
        assert_eq!(json["type"], "heart_rate");
        assert_eq!(json["severity"], "low");
        assert_eq!(json["threshold"], serde_json::json!([60.0, 100.0]));
    }
}
