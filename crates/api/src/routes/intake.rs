use axum::routing::post;
use axum::Router;

use crate::handlers::intake;
use crate::state::AppState;

/// ```text
/// POST   /intake                 -> create_intake
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/intake", post(intake::create_intake))
}
