//! Patient intake: validation, acknowledgement, triage, and persistence.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use guardian_core::error::CoreError;
use guardian_core::intake::{NewPatientIntake, TriageAssessment};
use guardian_db::models::patient::Patient;
use guardian_db::repositories::PatientRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct IntakeResponse {
    pub patient: Patient,
    pub acknowledgement: String,
    pub triage: TriageAssessment,
}

/// POST /api/v1/intake
///
/// Runs intake and triage, then stores the patient. Nothing is stored when
/// either generation step fails.
pub async fn create_intake(
    State(state): State<AppState>,
    Json(input): Json<NewPatientIntake>,
) -> AppResult<impl IntoResponse> {
    if let Some(patient_id) = input.patient_id.as_deref().map(str::trim) {
        if !patient_id.is_empty() && PatientRepo::exists(&state.pool, patient_id).await? {
            return Err(CoreError::Conflict(format!("patient {patient_id} already exists")).into());
        }
    }

    let intake = state.agents.intake();
    let outcome = intake.collect_patient_data(input).await?;
    let triage = intake.perform_triage(&outcome.patient).await?;

    let patient = PatientRepo::create(&state.pool, &outcome.patient).await?;
    tracing::info!(
        patient_id = %patient.patient_id,
        priority = ?triage.priority,
        "Patient registered",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: IntakeResponse {
                patient,
                acknowledgement: outcome.acknowledgement,
                triage,
            },
        }),
    ))
}
