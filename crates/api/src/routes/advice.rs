use axum::routing::post;
use axum::Router;

use crate::handlers::advice;
use crate::state::AppState;

/// Advisor routes mounted at `/advice`.
///
/// ```text
/// POST   /                 -> personalized_advice
/// POST   /symptoms         -> assess_symptom
/// POST   /wellness-plan    -> wellness_plan
/// POST   /education        -> education
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(advice::personalized_advice))
        .route("/symptoms", post(advice::assess_symptom))
        .route("/wellness-plan", post(advice::wellness_plan))
        .route("/education", post(advice::education))
}
