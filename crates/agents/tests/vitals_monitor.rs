mod common;

use assert_matches::assert_matches;
use chrono::Utc;
use guardian_agents::AgentError;
use guardian_core::alert::{Severity, VitalType};
use guardian_core::error::CoreError;
use guardian_core::generation::GenerationError;
use guardian_core::vitals::VitalReading;

use common::{started_registry, ScriptedGenerator};

fn reading(patient: &str, systolic: i32, heart_rate: i32, temperature: f64) -> VitalReading {
    VitalReading {
        patient_id: patient.to_string(),
        timestamp: Utc::now(),
        systolic,
        diastolic: 95,
        heart_rate,
        temperature,
        blood_glucose: None,
        oxygen_saturation: Some(97),
    }
}

#[tokio::test]
async fn hypertensive_reading_raises_two_high_alerts() {
    let (registry, _pool) = started_registry(ScriptedGenerator::ok("unused")).await;
    let monitor = registry.vital_signs_monitor();

    let result = monitor.record_vital_signs(reading("PT1", 150, 110, 37.0)).unwrap();
    let kinds: Vec<_> = result.alerts.iter().map(|a| (a.vital_type, a.severity)).collect();
    assert_eq!(
        kinds,
        vec![
            (VitalType::Systolic, Severity::High),
            (VitalType::HeartRate, Severity::High)
        ]
    );
    assert_eq!(monitor.history_len("PT1"), 1);
    registry.shutdown_all().await;
}

#[tokio::test]
async fn checked_reading_joins_history_only_on_commit() {
    let (registry, _pool) = started_registry(ScriptedGenerator::ok("unused")).await;
    let monitor = registry.vital_signs_monitor();

    let r = reading("PT1", 150, 72, 36.8);
    let alerts = monitor.check_vital_signs(&r).unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(monitor.history_len("PT1"), 0);

    monitor.commit_vital_signs(r);
    assert_eq!(monitor.history_len("PT1"), 1);
    registry.shutdown_all().await;
}

#[tokio::test]
async fn trends_use_monitor_temperature_and_no_system_prompt() {
    let generator = ScriptedGenerator::ok("Blood pressure trending down.");
    let (registry, _pool) = started_registry(generator.clone()).await;
    let monitor = registry.vital_signs_monitor();

    for systolic in [135, 130, 125] {
        monitor.record_vital_signs(reading("PT1", systolic, 72, 36.8)).unwrap();
    }
    let summary = monitor.analyze_trends("PT1", 1).await.unwrap();
    assert_eq!(summary.readings_analyzed, 3);
    assert_eq!(summary.period_days, 1);
    assert_eq!(summary.analysis, "Blood pressure trending down.");

    let request = generator.last_request();
    assert_eq!(request.temperature, 0.3);
    assert!(request.system_prompt.is_none());
    assert!(request.prompt.contains("Latest BP: 125/95"));
    registry.shutdown_all().await;
}

#[tokio::test]
async fn trends_without_history_is_no_data() {
    let generator = ScriptedGenerator::ok("unused");
    let (registry, _pool) = started_registry(generator.clone()).await;

    let result = registry.vital_signs_monitor().analyze_trends("PT9", 7).await;
    assert_matches!(result, Err(AgentError::Core(CoreError::NoData(_))));
    assert_eq!(generator.request_count(), 0);
    registry.shutdown_all().await;
}

#[tokio::test]
async fn generation_failure_propagates_unchanged() {
    let (registry, _pool) =
        started_registry(ScriptedGenerator::failing(GenerationError::EmptyResponse)).await;
    let monitor = registry.vital_signs_monitor();
    monitor.record_vital_signs(reading("PT1", 120, 70, 36.8)).unwrap();

    let result = monitor.analyze_trends("PT1", 7).await;
    assert_matches!(
        result,
        Err(AgentError::Core(CoreError::Generation(GenerationError::EmptyResponse)))
    );
    registry.shutdown_all().await;
}
