//! Medication tracking, dose recording, adherence, and refills.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use guardian_core::medication::{NewMedication, DEFAULT_ADHERENCE_WINDOW_DAYS};
use guardian_core::types::{DbId, Timestamp};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RecordDoseRequest {
    /// Defaults to the time the request is handled.
    #[serde(default)]
    pub taken_at: Option<Timestamp>,
}

#[derive(Debug, Deserialize)]
pub struct AdherenceParams {
    pub days: Option<u32>,
}

/// POST /api/v1/patients/{patient_id}/medications
pub async fn add_medication(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    Json(input): Json<NewMedication>,
) -> AppResult<impl IntoResponse> {
    let medication = state
        .agents
        .medication_manager()
        .add_medication(&patient_id, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: medication })))
}

/// GET /api/v1/patients/{patient_id}/medications
pub async fn list_medications(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let medications = state
        .agents
        .medication_manager()
        .list_medications(&patient_id)
        .await?;
    Ok(Json(DataResponse { data: medications }))
}

/// POST /api/v1/patients/{patient_id}/medications/{medication_id}/doses
pub async fn record_dose(
    State(state): State<AppState>,
    Path((patient_id, medication_id)): Path<(String, DbId)>,
    Json(input): Json<RecordDoseRequest>,
) -> AppResult<impl IntoResponse> {
    let dose = state
        .agents
        .medication_manager()
        .record_dose(&patient_id, medication_id, input.taken_at)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: dose })))
}

/// GET /api/v1/patients/{patient_id}/medications/adherence?days=
pub async fn check_adherence(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    Query(params): Query<AdherenceParams>,
) -> AppResult<impl IntoResponse> {
    let days = params.days.unwrap_or(DEFAULT_ADHERENCE_WINDOW_DAYS);
    let summary = state
        .agents
        .medication_manager()
        .check_adherence(&patient_id, days)
        .await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/patients/{patient_id}/medications/refills
pub async fn check_refills(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let notices = state
        .agents
        .medication_manager()
        .check_refills(&patient_id)
        .await?;
    Ok(Json(DataResponse { data: notices }))
}
