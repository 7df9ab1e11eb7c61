//! Vital-signs monitoring domain logic.
//!
//! Readings are validated, checked against inclusive threshold bands, and
//! appended to a bounded per-patient history. Trend analysis selects a
//! window of the most recent readings and hands a summary prompt to a
//! [`TextGenerator`](crate::generation::TextGenerator).

pub mod evaluator;
pub mod history;
pub mod reading;
pub mod thresholds;

pub use evaluator::{AlertResult, TrendSummary, VitalSignsEvaluator};
pub use history::{HistoryStore, RetentionConfig, RetentionPolicy};
pub use reading::VitalReading;
pub use thresholds::{check_thresholds, ThresholdBand, ThresholdConfig, Thresholds};
