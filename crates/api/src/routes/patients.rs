use axum::routing::get;
use axum::Router;

use crate::handlers::patients;
use crate::state::AppState;

/// ```text
/// GET    /patients               -> list_patients
/// GET    /patients/{patient_id}  -> get_patient
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/patients", get(patients::list_patients))
        .route("/patients/{patient_id}", get(patients::get_patient))
}
