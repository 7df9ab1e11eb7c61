pub mod advice;
pub mod agents;
pub mod health;
pub mod intake;
pub mod medications;
pub mod patients;
pub mod root;
pub mod vitals;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /intake                                                 register a patient (POST)
///
/// /patients                                               list
/// /patients/{patient_id}                                  get
///
/// /vital-signs                                            record a reading (POST)
/// /patients/{patient_id}/vital-signs                      stored history
/// /patients/{patient_id}/vital-signs/trends               trend summary
///
/// /patients/{patient_id}/medications                      list, add
/// /patients/{patient_id}/medications/{id}/doses           record a dose (POST)
/// /patients/{patient_id}/medications/adherence            adherence report
/// /patients/{patient_id}/medications/refills              refills due
///
/// /advice                                                 personalized advice (POST)
/// /advice/symptoms                                        symptom assessment (POST)
/// /advice/wellness-plan                                   wellness plan (POST)
/// /advice/education                                       education content (POST)
///
/// /agents/status                                          per-agent status
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(intake::router())
        .merge(patients::router())
        .merge(vitals::router())
        .merge(medications::router())
        .nest("/advice", advice::router())
        .nest("/agents", agents::router())
}
