use axum::routing::{get, post};
use axum::Router;

use crate::handlers::medications;
use crate::state::AppState;

/// Medication routes, all scoped to a patient.
///
/// ```text
/// GET    /patients/{patient_id}/medications                          -> list_medications
/// POST   /patients/{patient_id}/medications                          -> add_medication
/// POST   /patients/{patient_id}/medications/{medication_id}/doses    -> record_dose
/// GET    /patients/{patient_id}/medications/adherence                -> check_adherence
/// GET    /patients/{patient_id}/medications/refills                  -> check_refills
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/patients/{patient_id}/medications",
            get(medications::list_medications).post(medications::add_medication),
        )
        .route(
            "/patients/{patient_id}/medications/{medication_id}/doses",
            post(medications::record_dose),
        )
        .route(
            "/patients/{patient_id}/medications/adherence",
            get(medications::check_adherence),
        )
        .route(
            "/patients/{patient_id}/medications/refills",
            get(medications::check_refills),
        )
}
