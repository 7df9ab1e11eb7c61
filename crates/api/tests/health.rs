//! Integration tests for the root banner, health check, and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, build_test_app, build_test_app_with, get, ScriptedGenerator};
use guardian_agents::AgentsConfig;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: GET /health reports database and agent health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_agents() {
    let (app, _state) = build_test_app(ScriptedGenerator::ok("ok")).await;
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    let agents = json["agents"].as_array().unwrap();
    assert_eq!(agents.len(), 4);
    assert!(agents.iter().all(|a| a["healthy"] == true));
}

#[tokio::test]
async fn health_is_degraded_after_agents_shut_down() {
    let (app, state) = build_test_app(ScriptedGenerator::ok("ok")).await;
    state.agents.shutdown_all().await;

    let json = body_json(get(app, "/health").await).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], true);
}

// ---------------------------------------------------------------------------
// Test: GET / lists enabled agents
// ---------------------------------------------------------------------------

#[tokio::test]
async fn banner_lists_enabled_agents() {
    let config =
        AgentsConfig::from_yaml_str("agents:\n  health_advisor:\n    enabled: false\n").unwrap();
    let (app, _state) = build_test_app_with(&config, ScriptedGenerator::ok("ok")).await;

    let json = body_json(get(app, "/").await).await;
    assert_eq!(json["service"], "HealthGuardian");
    assert_eq!(json["status"], "running");
    assert_eq!(
        json["agents"],
        serde_json::json!(["intake", "medication_manager", "vital_signs_monitor"])
    );
}

#[tokio::test]
async fn agent_status_endpoint_reports_each_agent() {
    let (app, _state) = build_test_app(ScriptedGenerator::ok("ok")).await;
    let json = body_json(get(app, "/api/v1/agents/status").await).await;

    let keys: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["key"].as_str().unwrap())
        .collect();
    assert_eq!(
        keys,
        vec!["intake", "medication_manager", "vital_signs_monitor", "health_advisor"]
    );
    assert_eq!(json["data"][1]["name"], "Medication Manager");
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let (app, _state) = build_test_app(ScriptedGenerator::ok("ok")).await;
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let (app, _state) = build_test_app(ScriptedGenerator::ok("ok")).await;
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

// ---------------------------------------------------------------------------
// Test: CORS preflight OPTIONS request returns correct headers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_returns_correct_headers() {
    let (app, _state) = build_test_app(ScriptedGenerator::ok("ok")).await;

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/intake")
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .expect("Missing Access-Control-Allow-Origin header")
            .to_str()
            .unwrap(),
        "http://localhost:3000"
    );
    let allow_methods = headers
        .get("access-control-allow-methods")
        .expect("Missing Access-Control-Allow-Methods header")
        .to_str()
        .unwrap();
    assert!(allow_methods.contains("POST"), "got: {allow_methods}");
}
