use axum::routing::{get, post};
use axum::Router;

use crate::handlers::vitals;
use crate::state::AppState;

/// ```text
/// POST   /vital-signs                                 -> record_vital_signs
/// GET    /patients/{patient_id}/vital-signs           -> list_vital_signs
/// GET    /patients/{patient_id}/vital-signs/trends    -> vital_sign_trends
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vital-signs", post(vitals::record_vital_signs))
        .route(
            "/patients/{patient_id}/vital-signs",
            get(vitals::list_vital_signs),
        )
        .route(
            "/patients/{patient_id}/vital-signs/trends",
            get(vitals::vital_sign_trends),
        )
}
