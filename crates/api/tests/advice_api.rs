//! Integration tests for the health advisor endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with, post_json, register_patient,
    ScriptedGenerator,
};
use guardian_agents::AgentsConfig;
use serde_json::json;

#[tokio::test]
async fn advice_uses_stored_profile() {
    let (app, _state) = build_test_app(ScriptedGenerator::ok("Keep active.")).await;
    register_patient(&app, "PT1").await;

    let response = post_json(
        app,
        "/api/v1/advice",
        json!({ "patient_id": "PT1", "query": "How do I lower my blood sugar?" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["patient_id"], "PT1");
    assert_eq!(json["data"]["advice"], "Keep active.");
    assert_eq!(json["data"]["follow_up_recommended"], true);
}

#[tokio::test]
async fn advice_for_unknown_patient_is_404() {
    let generator = ScriptedGenerator::ok("unused");
    let (app, _state) = build_test_app(generator.clone()).await;

    let response = post_json(app, "/api/v1/advice", json!({ "patient_id": "PT404" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(generator.request_count(), 0);
}

#[tokio::test]
async fn symptom_assessment_is_routine() {
    let (app, _state) = build_test_app(ScriptedGenerator::ok("Rest and hydrate.")).await;
    register_patient(&app, "PT1").await;

    let response = post_json(
        app.clone(),
        "/api/v1/advice/symptoms",
        json!({ "description": "mild headache", "patient_id": "PT1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["symptom"], "mild headache");
    assert_eq!(json["data"]["urgency_level"], "routine");

    let response = post_json(app, "/api/v1/advice/symptoms", json!({ "description": " " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wellness_plan_lasts_thirty_days() {
    let (app, _state) = build_test_app(ScriptedGenerator::ok("Week 1: walk.")).await;
    register_patient(&app, "PT1").await;

    let response = post_json(
        app.clone(),
        "/api/v1/advice/wellness-plan",
        json!({ "patient_id": "PT1", "goals": ["Walk 30 minutes daily", "Sleep 8 hours"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["duration_days"], 30);
    assert_eq!(json["data"]["goals"].as_array().unwrap().len(), 2);

    let response = post_json(
        app,
        "/api/v1/advice/wellness-plan",
        json!({ "patient_id": "PT1", "goals": [] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn education_defaults_to_basic_level() {
    let (app, _state) = build_test_app(ScriptedGenerator::ok("Insulin helps...")).await;

    let response = post_json(
        app,
        "/api/v1/advice/education",
        json!({ "topic": "Managing Type 2 Diabetes" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["level"], "basic");
    assert_eq!(json["data"]["content"], "Insulin helps...");
}

#[tokio::test]
async fn disabled_advisor_returns_503() {
    let config =
        AgentsConfig::from_yaml_str("agents:\n  health_advisor:\n    enabled: false\n").unwrap();
    let (app, _state) = build_test_app_with(&config, ScriptedGenerator::ok("ok")).await;

    let response = post_json(app, "/api/v1/advice/education", json!({ "topic": "Sleep" })).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "SERVICE_UNAVAILABLE");
}
