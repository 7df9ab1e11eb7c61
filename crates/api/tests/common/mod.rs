#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use guardian_agents::{AgentRegistry, AgentsConfig};
use guardian_api::config::ServerConfig;
use guardian_api::router::build_app_router;
use guardian_api::state::AppState;
use guardian_core::generation::{GenerationError, GenerationRequest, TextGenerator};

/// Answers every prompt with a fixed reply and remembers what it was asked.
pub struct ScriptedGenerator {
    reply: Result<String, GenerationError>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn ok(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: GenerationError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(err),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.clone()
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        database_url: "sqlite::memory:".to_string(),
        agents_config: PathBuf::from("config.yaml"),
        vitals_retention_days: 90,
    }
}

/// Full application router over a fresh in-memory database, with every
/// agent initialized against `generator`.
pub async fn build_test_app(generator: Arc<ScriptedGenerator>) -> (Router, AppState) {
    build_test_app_with(&AgentsConfig::default(), generator).await
}

pub async fn build_test_app_with(
    agents_config: &AgentsConfig,
    generator: Arc<ScriptedGenerator>,
) -> (Router, AppState) {
    let config = test_config();
    let pool = guardian_db::create_pool(&config.database_url).await.unwrap();
    guardian_db::run_migrations(&pool).await.unwrap();

    let agents = AgentRegistry::build(agents_config, pool.clone(), generator).unwrap();
    agents.initialize_enabled().await.unwrap();

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        agents: Arc::new(agents),
    };
    (build_app_router(state.clone(), &config), state)
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A complete intake form for `patient_id`.
pub fn intake_form(patient_id: &str) -> serde_json::Value {
    serde_json::json!({
        "patient_id": patient_id,
        "name": "Sample Patient",
        "age": 45,
        "gender": "Female",
        "chronic_conditions": ["Type 2 Diabetes", "Hypertension"],
        "current_medications": ["Metformin 500mg"],
        "allergies": ["Penicillin"],
        "emergency_contact": {"name": "Jane Doe", "phone": "555-0100"},
        "primary_concern": "Blood sugar management"
    })
}

/// Register a patient through the intake endpoint.
pub async fn register_patient(app: &Router, patient_id: &str) {
    let response = post_json(app.clone(), "/api/v1/intake", intake_form(patient_id)).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
}
