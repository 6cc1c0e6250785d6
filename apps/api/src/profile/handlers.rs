//! Axum route handlers for the profile API.

use std::collections::HashSet;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::models::Profile;
use crate::profile::import::{import_cv, validate_cv_upload};
use crate::profile::ProfileEnvelope;
use crate::state::AppState;
use uuid::Uuid;

/// Checks the fields a saved profile cannot do without.
pub fn validate_profile(profile: &Profile) -> Result<(), AppError> {
    if profile.header.name.trim().is_empty() {
        return Err(AppError::Validation(
            "header.name cannot be empty".to_string(),
        ));
    }
    for (i, exp) in profile.experiences.iter().enumerate() {
        if exp.job_title.trim().is_empty() || exp.company.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "experiences[{i}] needs a job_title and a company"
            )));
        }
    }
    check_unique_ids(profile)
}

/// Scores and selections are keyed by entry id, so ids must be unique within each list.
/// Bullet ids must be unique across all experiences.
fn check_unique_ids(profile: &Profile) -> Result<(), AppError> {
    fn unique<'a>(
        field: &str,
        ids: impl Iterator<Item = (String, &'a Uuid)>,
    ) -> Result<(), AppError> {
        let mut seen = HashSet::new();
        for (path, id) in ids {
            if !seen.insert(*id) {
                return Err(AppError::Validation(format!(
                    "{path}.id duplicates another {field} id ({id})"
                )));
            }
        }
        Ok(())
    }

    unique(
        "experience",
        profile
            .experiences
            .iter()
            .enumerate()
            .map(|(i, e)| (format!("experiences[{i}]"), &e.id)),
    )?;
    unique(
        "bullet",
        profile.experiences.iter().enumerate().flat_map(|(i, e)| {
            e.bullets
                .iter()
                .enumerate()
                .map(move |(j, b)| (format!("experiences[{i}].bullets[{j}]"), &b.id))
        }),
    )?;
    unique(
        "education",
        profile
            .education
            .iter()
            .enumerate()
            .map(|(i, e)| (format!("education[{i}]"), &e.id)),
    )?;
    unique(
        "skill category",
        profile
            .skill_categories
            .iter()
            .enumerate()
            .map(|(i, c)| (format!("skill_categories[{i}]"), &c.id)),
    )?;
    unique(
        "language",
        profile
            .languages
            .iter()
            .enumerate()
            .map(|(i, l)| (format!("languages[{i}]"), &l.id)),
    )?;
    unique(
        "reference",
        profile
            .references
            .iter()
            .enumerate()
            .map(|(i, r)| (format!("references[{i}]"), &r.id)),
    )
}

/// Loads the stored profile, or 404 when nothing usable is stored.
pub async fn stored_profile(state: &AppState) -> Result<Profile, AppError> {
    state
        .profiles
        .load()
        .await?
        .map(|envelope| envelope.profile)
        .ok_or_else(|| AppError::NotFound("No profile has been saved yet".to_string()))
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
) -> Result<Json<ProfileEnvelope>, AppError> {
    let envelope = state
        .profiles
        .load()
        .await?
        .ok_or_else(|| AppError::NotFound("No profile has been saved yet".to_string()))?;
    Ok(Json(envelope))
}

/// PUT /api/v1/profile
///
/// Entries without an id get a fresh one during deserialization.
pub async fn handle_put_profile(
    State(state): State<AppState>,
    Json(profile): Json<Profile>,
) -> Result<Json<Profile>, AppError> {
    validate_profile(&profile)?;
    state.profiles.save(&profile).await?;
    Ok(Json(profile))
}

/// DELETE /api/v1/profile
pub async fn handle_delete_profile(
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.profiles.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/profile/import
///
/// Multipart fields: `file` (PDF, required) and `api_key` (optional).
/// Returns a preview; nothing is saved.
pub async fn handle_import_profile(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Profile>, AppError> {
    let mut file: Option<Vec<u8>> = None;
    let mut api_key: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("could not read file: {e}")))?;
                file = Some(bytes.to_vec());
            }
            "api_key" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("could not read api_key: {e}")))?;
                api_key = Some(text);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("file is required".to_string()))?;
    validate_cv_upload(&file).map_err(AppError::Validation)?;

    let profile = import_cv(file, &state.llm, api_key.as_deref()).await?;
    Ok(Json(profile))
}
