//! Axum route handlers for the tailoring API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::layout::{enforce, PageFit};
use crate::models::{JobAnalysis, Profile};
use crate::profile::handlers::{stored_profile, validate_profile};
use crate::state::AppState;
use crate::tailoring::synonyms::SynonymTable;
use crate::tailoring::{tailor, KeywordMatcher, TailorOptions, TailoredContent};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    pub job_analysis: JobAnalysis,
    /// Tailor this profile instead of the stored one.
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub max_pages: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct TailorResponse {
    pub profile: Profile,
    pub content: TailoredContent,
    pub match_score: u8,
    pub max_pages: u32,
    pub warnings: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Shared flow
// ────────────────────────────────────────────────────────────────────────────

/// Resolves the page budget; zero is a validation error.
pub fn resolve_max_pages(requested: Option<u32>, default: u32) -> Result<u32, AppError> {
    match requested {
        Some(0) => Err(AppError::Validation(
            "max_pages must be at least 1".to_string(),
        )),
        Some(pages) => Ok(pages),
        None => Ok(default.max(1)),
    }
}

/// Tailors the given (or stored) profile to `job` and fits it to the page budget.
pub async fn tailor_and_fit(
    state: &AppState,
    job: &JobAnalysis,
    profile: Option<Profile>,
    max_pages: u32,
) -> Result<PageFit, AppError> {
    let profile = match profile {
        Some(profile) => {
            validate_profile(&profile)?;
            profile
        }
        None => stored_profile(state).await?,
    };

    let options = TailorOptions {
        enhance_bullets: state.config.enable_bullet_enhancement,
    };
    let matcher = KeywordMatcher::new(SynonymTable::builtin());
    let content = tailor(&profile, job, options, &matcher);
    Ok(enforce(&profile, &content, max_pages))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/tailor
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    let max_pages = resolve_max_pages(request.max_pages, state.config.max_pages)?;
    let fit = tailor_and_fit(&state, &request.job_analysis, request.profile, max_pages).await?;

    Ok(Json(TailorResponse {
        match_score: fit.content.match_score,
        profile: fit.profile,
        content: fit.content,
        max_pages,
        warnings: fit.warnings,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_max_pages() {
        assert_eq!(resolve_max_pages(None, 2).unwrap(), 2);
        assert_eq!(resolve_max_pages(Some(3), 2).unwrap(), 3);
        assert_eq!(resolve_max_pages(None, 0).unwrap(), 1);
        assert!(matches!(
            resolve_max_pages(Some(0), 2),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_request_accepts_analyzer_field_names() {
        let json = r#"{
            "job_analysis": {
                "jobTitle": "ML Engineer",
                "mustHaveKeywords": ["Python", "GPU"],
                "preferredKeywords": ["Docker"],
                "niceToHaveKeywords": ["AWS"]
            }
        }"#;
        let request: TailorRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.job_analysis.must_have_keywords, vec!["Python", "GPU"]);
        assert!(request.profile.is_none());
        assert!(request.max_pages.is_none());
    }
}
