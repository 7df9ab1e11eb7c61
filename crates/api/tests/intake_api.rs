//! Integration tests for patient intake and lookup.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, intake_form, post_json, ScriptedGenerator};
use guardian_core::generation::GenerationError;

#[tokio::test]
async fn intake_registers_patient_with_triage() {
    let generator = ScriptedGenerator::ok("Welcome to HealthGuardian.");
    let (app, _state) = build_test_app(generator.clone()).await;

    let response = post_json(app.clone(), "/api/v1/intake", intake_form("PT100")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["patient"]["patient_id"], "PT100");
    assert_eq!(data["patient"]["emergency_contact"]["phone"], "555-0100");
    assert_eq!(data["acknowledgement"], "Welcome to HealthGuardian.");
    assert_eq!(data["triage"]["priority"], "medium");
    assert_eq!(
        data["triage"]["recommended_agents"],
        serde_json::json!(["medication_manager", "vital_signs_monitor"])
    );
    // Acknowledgement and triage notes.
    assert_eq!(generator.request_count(), 2);

    let json = body_json(get(app, "/api/v1/patients/PT100").await).await;
    assert_eq!(json["data"]["name"], "Sample Patient");
    assert_eq!(
        json["data"]["chronic_conditions"],
        serde_json::json!(["Type 2 Diabetes", "Hypertension"])
    );
}

#[tokio::test]
async fn intake_without_id_generates_one() {
    let (app, _state) = build_test_app(ScriptedGenerator::ok("ok")).await;
    let mut form = intake_form("unused");
    form.as_object_mut().unwrap().remove("patient_id");

    let json = body_json(post_json(app, "/api/v1/intake", form).await).await;
    let id = json["data"]["patient"]["patient_id"].as_str().unwrap();
    assert!(id.starts_with("PT"), "got {id}");
    assert_eq!(id.len(), 2 + 17);
}

#[tokio::test]
async fn duplicate_patient_id_conflicts_before_generation() {
    let generator = ScriptedGenerator::ok("ok");
    let (app, _state) = build_test_app(generator.clone()).await;
    post_json(app.clone(), "/api/v1/intake", intake_form("PT100")).await;

    let response = post_json(app, "/api/v1/intake", intake_form("PT100")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
    assert_eq!(generator.request_count(), 2);
}

#[tokio::test]
async fn invalid_intake_is_rejected() {
    let (app, _state) = build_test_app(ScriptedGenerator::ok("ok")).await;
    let mut form = intake_form("PT100");
    form["age"] = serde_json::json!(200);

    let response = post_json(app, "/api/v1/intake", form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn generation_failure_stores_nothing() {
    let (app, _state) =
        build_test_app(ScriptedGenerator::failing(GenerationError::EmptyResponse)).await;

    let response = post_json(app.clone(), "/api/v1/intake", intake_form("PT100")).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let response = get(app, "/api/v1/patients/PT100").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_patients_pages_results() {
    let (app, _state) = build_test_app(ScriptedGenerator::ok("ok")).await;
    for id in ["PT1", "PT2", "PT3"] {
        common::register_patient(&app, id).await;
    }

    let json = body_json(get(app.clone(), "/api/v1/patients?limit=2").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let json = body_json(get(app, "/api/v1/patients?limit=2&offset=2").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}
