//! Vital-sign alert types produced when a reading leaves its threshold band.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vitals::thresholds::ThresholdBand;

/// The vital signs that carry a threshold band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalType {
    Systolic,
    Diastolic,
    HeartRate,
    Temperature,
}

impl VitalType {
    /// Canonical wire name, e.g. `"heart_rate"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Systolic => "systolic",
            Self::Diastolic => "diastolic",
            Self::HeartRate => "heart_rate",
            Self::Temperature => "temperature",
        }
    }
}

impl fmt::Display for VitalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the band the observed value fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Value was above the upper bound.
    High,
    /// Value was below the lower bound.
    Low,
}

/// A single out-of-band vital observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Which vital sign violated its band.
    #[serde(rename = "type")]
    pub vital_type: VitalType,
    /// The observed value.
    pub value: f64,
    /// The band that was violated.
    pub threshold: ThresholdBand,
    /// Direction of the violation.
    pub severity: Severity,
}
