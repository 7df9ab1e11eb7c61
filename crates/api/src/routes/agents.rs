use axum::routing::get;
use axum::Router;

use crate::handlers::agents;
use crate::state::AppState;

/// Agent routes mounted at `/agents`.
pub fn router() -> Router<AppState> {
    Router::new().route("/status", get(agents::agent_status))
}
