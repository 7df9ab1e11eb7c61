use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{PatientId, Timestamp};

/// One recorded observation for a patient. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalReading {
    pub patient_id: PatientId,
    /// When the observation was taken. Defaults to receipt time.
    #[serde(default = "chrono::Utc::now")]
    pub timestamp: Timestamp,
    /// Systolic blood pressure, mmHg.
    #[serde(alias = "blood_pressure_systolic")]
    pub systolic: i32,
    /// Diastolic blood pressure, mmHg.
    #[serde(alias = "blood_pressure_diastolic")]
    pub diastolic: i32,
    /// Beats per minute.
    pub heart_rate: i32,
    /// Body temperature, degrees Celsius.
    pub temperature: f64,
    #[serde(default)]
    pub blood_glucose: Option<i32>,
    /// Peripheral oxygen saturation, percent.
    #[serde(default)]
    pub oxygen_saturation: Option<i32>,
}

impl VitalReading {
    /// Reject readings that cannot describe a real observation.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.patient_id.trim().is_empty() {
            return Err(CoreError::Validation(
                "patient_id must not be empty".to_string(),
            ));
        }
        for (name, value) in [
            ("systolic", self.systolic),
            ("diastolic", self.diastolic),
            ("heart_rate", self.heart_rate),
        ] {
            if value <= 0 {
                return Err(CoreError::Validation(format!(
                    "{name} must be greater than 0, got {value}"
                )));
            }
        }
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(CoreError::Validation(format!(
                "temperature must be a positive number, got {}",
                self.temperature
            )));
        }
        if let Some(glucose) = self.blood_glucose {
            if glucose <= 0 {
                return Err(CoreError::Validation(format!(
                    "blood_glucose must be greater than 0, got {glucose}"
                )));
            }
        }
        if let Some(spo2) = self.oxygen_saturation {
            if !(0..=100).contains(&spo2) {
                return Err(CoreError::Validation(format!(
                    "oxygen_saturation must be between 0 and 100, got {spo2}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn reading() -> VitalReading {
        VitalReading {
            patient_id: "PT1".to_string(),
            timestamp: Utc::now(),
            systolic: 120,
            diastolic: 80,
            heart_rate: 72,
            temperature: 36.8,
            blood_glucose: None,
            oxygen_saturation: Some(98),
        }
    }

    #[test]
    fn accepts_normal_reading() {
        assert!(reading().validate().is_ok());
    }

    #[test]
    fn rejects_blank_patient_id() {
        let r = VitalReading {
            patient_id: "   ".to_string(),
            ..reading()
        };
        assert_matches!(r.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_nan_temperature() {
        let r = VitalReading {
            temperature: f64::NAN,
            ..reading()
        };
        assert_matches!(r.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_oxygen_above_hundred() {
        let r = VitalReading {
            oxygen_saturation: Some(101),
            ..reading()
        };
        assert_matches!(r.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn deserializes_long_blood_pressure_names() {
        let r: VitalReading = serde_json::from_value(serde_json::json!({
            "patient_id": "PT1",
            "blood_pressure_systolic": 130,
            "blood_pressure_diastolic": 85,
            "heart_rate": 70,
            "temperature": 36.6
        }))
        .unwrap();
        assert_eq!(r.systolic, 130);
        assert_eq!(r.diastolic, 85);
        assert_eq!(r.blood_glucose, None);
    }
}
