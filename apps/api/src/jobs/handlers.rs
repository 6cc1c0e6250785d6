//! Axum route handlers for the job analysis API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::jobs::JobAnalyzer;
use crate::models::JobAnalysis;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeJobRequest {
    pub job_description: String,
    /// Overrides the server-side key for this request.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// POST /api/v1/jobs/analyze
///
/// Goes through the analysis cache, the rate limiter and the analyzer timeout.
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeJobRequest>,
) -> Result<Json<JobAnalysis>, AppError> {
    let analysis = state
        .analyzer
        .analyze(&request.job_description, request.api_key.as_deref())
        .await?;
    Ok(Json(analysis))
}
