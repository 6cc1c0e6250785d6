//! Axum route handlers for validating externally rendered documents.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::compliance::{generate_compliance_report, ComplianceScore};
use crate::documents::DocumentFormat;
use crate::errors::AppError;
use crate::layout::{estimate_page_count, DocumentStyle};
use crate::models::Profile;
use crate::profile::handlers::stored_profile;
use crate::state::AppState;
use crate::tailoring::TailoredContent;

#[derive(Debug, Serialize)]
pub struct ValidateDocumentResponse {
    pub format: DocumentFormat,
    pub estimated_pages: u32,
    pub compliance: ComplianceScore,
    pub report: String,
}

fn invalid_field(field: &str, err: impl std::fmt::Display) -> AppError {
    AppError::Validation(format!("{field}: {err}"))
}

/// POST /api/v1/documents/validate
///
/// Multipart fields: `document` (file), `format` (pdf|docx), `tailored` (JSON
/// `TailoredContent` the document was rendered from), and optionally `profile` and
/// `style` (JSON). The stored profile is used when `profile` is absent.
pub async fn handle_validate_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ValidateDocumentResponse>, AppError> {
    let mut document: Option<Vec<u8>> = None;
    let mut format: Option<DocumentFormat> = None;
    let mut tailored: Option<TailoredContent> = None;
    let mut profile: Option<Profile> = None;
    let mut style = DocumentStyle::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| invalid_field("multipart", e))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "document" => {
                let bytes = field.bytes().await.map_err(|e| invalid_field("document", e))?;
                document = Some(bytes.to_vec());
            }
            "format" => {
                let text = field.text().await.map_err(|e| invalid_field("format", e))?;
                format = Some(text.parse().map_err(|e| invalid_field("format", e))?);
            }
            "tailored" => {
                let text = field.text().await.map_err(|e| invalid_field("tailored", e))?;
                tailored =
                    Some(serde_json::from_str(&text).map_err(|e| invalid_field("tailored", e))?);
            }
            "profile" => {
                let text = field.text().await.map_err(|e| invalid_field("profile", e))?;
                profile =
                    Some(serde_json::from_str(&text).map_err(|e| invalid_field("profile", e))?);
            }
            "style" => {
                let text = field.text().await.map_err(|e| invalid_field("style", e))?;
                style = serde_json::from_str(&text).map_err(|e| invalid_field("style", e))?;
            }
            _ => {}
        }
    }

    let document = document.ok_or_else(|| invalid_field("document", "is required"))?;
    let format = format.ok_or_else(|| invalid_field("format", "is required"))?;
    let tailored = tailored.ok_or_else(|| invalid_field("tailored", "is required"))?;
    let profile = match profile {
        Some(profile) => profile,
        None => stored_profile(&state).await?,
    };

    let compliance = state
        .compliance
        .validate_document(&document, format, &profile, &tailored, &style)
        .await;
    let report = generate_compliance_report(&compliance);

    Ok(Json(ValidateDocumentResponse {
        format,
        estimated_pages: estimate_page_count(&document),
        compliance,
        report,
    }))
}
