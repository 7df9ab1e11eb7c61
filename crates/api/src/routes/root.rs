use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct ServiceBanner {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    /// Registry keys of the enabled agents.
    pub agents: Vec<&'static str>,
}

/// GET / -- service banner.
async fn banner(State(state): State<AppState>) -> Json<ServiceBanner> {
    Json(ServiceBanner {
        service: "HealthGuardian",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        agents: state.agents.enabled_keys(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(banner))
}
