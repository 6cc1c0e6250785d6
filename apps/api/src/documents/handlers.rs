//! Axum route handlers for document generation.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::documents::pipeline::{generate_documents, FormatOutcome, GenerationJob};
use crate::documents::DocumentFormat;
use crate::errors::AppError;
use crate::layout::DocumentStyle;
use crate::models::{JobAnalysis, Profile};
use crate::state::AppState;
use crate::tailoring::handlers::{resolve_max_pages, tailor_and_fit};

#[derive(Debug, Deserialize)]
pub struct GenerateDocumentsRequest {
    pub job_analysis: JobAnalysis,
    #[serde(default)]
    pub profile: Option<Profile>,
    /// Format names; parsed here so an unknown one is a 400, not a 422.
    pub formats: Vec<String>,
    #[serde(default)]
    pub style: Option<DocumentStyle>,
    #[serde(default)]
    pub max_pages: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct GenerateDocumentsResponse {
    pub match_score: u8,
    pub max_pages: u32,
    /// Page-limit warnings from fitting the content.
    pub warnings: Vec<String>,
    pub documents: Vec<FormatOutcome>,
}

pub fn parse_formats(names: &[String]) -> Result<Vec<DocumentFormat>, AppError> {
    if names.is_empty() {
        return Err(AppError::Validation(
            "formats must name at least one of pdf, docx".to_string(),
        ));
    }
    names
        .iter()
        .map(|name| {
            name.parse::<DocumentFormat>()
                .map_err(|e| AppError::Validation(format!("formats: {e}")))
        })
        .collect()
}

/// POST /api/v1/documents/compliance
///
/// Tailors, fits and renders every requested format concurrently, then scores each
/// document. Per-format failures are reported inline; the request itself succeeds.
pub async fn handle_generate_documents(
    State(state): State<AppState>,
    Json(request): Json<GenerateDocumentsRequest>,
) -> Result<Json<GenerateDocumentsResponse>, AppError> {
    let formats = parse_formats(&request.formats)?;
    let max_pages = resolve_max_pages(request.max_pages, state.config.max_pages)?;
    let fit = tailor_and_fit(&state, &request.job_analysis, request.profile, max_pages).await?;

    let job = GenerationJob {
        profile: fit.profile,
        content: fit.content,
        style: request.style.unwrap_or_default(),
        language: request.job_analysis.language_requirement,
        max_pages,
    };
    let documents = generate_documents(
        state.renderer.clone(),
        state.compliance.clone(),
        &job,
        &formats,
    )
    .await;

    Ok(Json(GenerateDocumentsResponse {
        match_score: job.content.match_score,
        max_pages,
        warnings: fit.warnings,
        documents,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        let formats = parse_formats(&["pdf".to_string(), "DOCX".to_string()]).unwrap();
        assert_eq!(formats, vec![DocumentFormat::Pdf, DocumentFormat::Docx]);
        assert!(matches!(parse_formats(&[]), Err(AppError::Validation(_))));
        let err = parse_formats(&["odt".to_string()]).unwrap_err();
        assert!(err.to_string().contains("odt"));
    }
}
