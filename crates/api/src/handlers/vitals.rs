//! Vital sign recording, history, and trend summaries.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use guardian_core::alert::Alert;
use guardian_core::types::{DbId, Timestamp};
use guardian_core::vitals::evaluator::DEFAULT_TREND_WINDOW_DAYS;
use guardian_core::vitals::VitalReading;
use guardian_db::repositories::VitalReadingRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: i64 = 100;
const MAX_HISTORY_LIMIT: i64 = 1_000;

#[derive(Debug, Serialize)]
pub struct RecordedVitals {
    pub id: DbId,
    pub patient_id: String,
    pub recorded_at: Timestamp,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TrendParams {
    pub days: Option<u32>,
}

/// POST /api/v1/vital-signs
///
/// Checks the reading against the configured thresholds and stores it with
/// whatever alerts it raised. The reading joins the trend history only after
/// the row is written.
pub async fn record_vital_signs(
    State(state): State<AppState>,
    Json(reading): Json<VitalReading>,
) -> AppResult<impl IntoResponse> {
    let monitor = state.agents.vital_signs_monitor();
    let alerts = monitor.check_vital_signs(&reading)?;

    let stored = VitalReadingRepo::insert(&state.pool, &reading, &alerts).await?;
    monitor.commit_vital_signs(reading);

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: RecordedVitals {
                id: stored.id,
                patient_id: stored.patient_id,
                recorded_at: stored.recorded_at,
                alerts,
            },
        }),
    ))
}

/// GET /api/v1/patients/{patient_id}/vital-signs
///
/// Stored readings, newest first.
pub async fn list_vital_signs(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    let readings = VitalReadingRepo::list_for_patient(&state.pool, &patient_id, limit).await?;
    Ok(Json(DataResponse { data: readings }))
}

/// GET /api/v1/patients/{patient_id}/vital-signs/trends?days=
pub async fn vital_sign_trends(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    Query(params): Query<TrendParams>,
) -> AppResult<impl IntoResponse> {
    let days = params.days.unwrap_or(DEFAULT_TREND_WINDOW_DAYS);
    let summary = state
        .agents
        .vital_signs_monitor()
        .analyze_trends(&patient_id, days)
        .await?;
    Ok(Json(DataResponse { data: summary }))
}
