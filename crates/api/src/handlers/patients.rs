use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use guardian_core::error::CoreError;
use guardian_db::models::patient::Patient;
use guardian_db::repositories::PatientRepo;
use guardian_db::DbPool;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct ListPatientsParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/patients
///
/// Most recent intakes first.
pub async fn list_patients(
    State(state): State<AppState>,
    Query(params): Query<ListPatientsParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = params.offset.unwrap_or(0).max(0);

    let patients = PatientRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: patients }))
}

/// GET /api/v1/patients/{patient_id}
pub async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let patient = load_patient(&state.pool, &patient_id).await?;
    Ok(Json(DataResponse { data: patient }))
}

/// Fetch a patient or fail with `NotFound`.
pub(crate) async fn load_patient(pool: &DbPool, patient_id: &str) -> AppResult<Patient> {
    PatientRepo::find_by_patient_id(pool, patient_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Patient", patient_id).into())
}
