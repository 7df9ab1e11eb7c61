use axum::extract::State;
use axum::{routing::get, Json, Router};
use guardian_agents::AgentStatus;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the database and every enabled agent are healthy.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    pub agents: Vec<AgentStatus>,
}

/// GET /health -- returns service, database, and agent health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = guardian_db::health_check(&state.pool).await.is_ok();
    let agents = state.agents.statuses();
    let agents_healthy = agents.iter().all(|a| !a.enabled || a.healthy);

    let status = if db_healthy && agents_healthy {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        agents,
    })
}

/// Mount health check routes (root level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
