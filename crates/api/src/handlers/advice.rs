//! Health advisor endpoints.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::patients::load_patient;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AdviceRequest {
    pub patient_id: String,
    /// What the patient is asking about. Falls back to the intake concern.
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SymptomRequest {
    pub description: String,
    /// When set and `conditions` is empty, the stored conditions are used.
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct WellnessPlanRequest {
    pub patient_id: String,
    pub goals: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EducationRequest {
    pub topic: String,
    #[serde(default)]
    pub level: Option<String>,
}

/// POST /api/v1/advice
///
/// Advice built from the stored patient profile plus the caller's query.
pub async fn personalized_advice(
    State(state): State<AppState>,
    Json(input): Json<AdviceRequest>,
) -> AppResult<impl IntoResponse> {
    let patient = load_patient(&state.pool, &input.patient_id).await?;
    let query = input
        .query
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty());

    let advice = state
        .agents
        .health_advisor()
        .get_personalized_advice(&patient.profile(query))
        .await?;
    Ok(Json(DataResponse { data: advice }))
}

/// POST /api/v1/advice/symptoms
pub async fn assess_symptom(
    State(state): State<AppState>,
    Json(input): Json<SymptomRequest>,
) -> AppResult<impl IntoResponse> {
    let conditions = match input.patient_id.as_deref() {
        Some(patient_id) if input.conditions.is_empty() => {
            load_patient(&state.pool, patient_id)
                .await?
                .chronic_conditions
                .0
        }
        _ => input.conditions,
    };

    let assessment = state
        .agents
        .health_advisor()
        .assess_symptom(&input.description, &conditions)
        .await?;
    Ok(Json(DataResponse { data: assessment }))
}

/// POST /api/v1/advice/wellness-plan
pub async fn wellness_plan(
    State(state): State<AppState>,
    Json(input): Json<WellnessPlanRequest>,
) -> AppResult<impl IntoResponse> {
    let patient = load_patient(&state.pool, &input.patient_id).await?;
    let plan = state
        .agents
        .health_advisor()
        .generate_wellness_plan(&patient.patient_id, input.goals)
        .await?;
    Ok(Json(DataResponse { data: plan }))
}

/// POST /api/v1/advice/education
pub async fn education(
    State(state): State<AppState>,
    Json(input): Json<EducationRequest>,
) -> AppResult<impl IntoResponse> {
    let content = state
        .agents
        .health_advisor()
        .provide_education(&input.topic, input.level.as_deref())
        .await?;
    Ok(Json(DataResponse { data: content }))
}
