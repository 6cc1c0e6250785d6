//! Document renderer boundary. Rendering itself happens in an external service; this
//! side only ships the content tree and checks the byte signature of what comes back.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::documents::DocumentFormat;
use crate::layout::DocumentStyle;
use crate::models::{LanguageRequirement, Profile};
use crate::tailoring::TailoredContent;

const RENDER_TIMEOUT: Duration = Duration::from_secs(60);

/// Rendering failures. Both variants are worth retrying once the cause is fixed.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No document renderer is configured")]
    Unavailable,

    #[error("{format} rendering failed: {message}")]
    Failed {
        format: DocumentFormat,
        message: String,
    },
}

impl RenderError {
    fn failed(format: DocumentFormat, message: impl Into<String>) -> Self {
        RenderError::Failed {
            format,
            message: message.into(),
        }
    }

    /// Document-type-scoped message without transport details.
    pub fn user_message(&self) -> String {
        match self {
            RenderError::Unavailable => "Document generation is not available".to_string(),
            RenderError::Failed { format, .. } => {
                format!("{} generation failed", format.as_str().to_uppercase())
            }
        }
    }

    pub fn remediation(&self) -> &'static str {
        match self {
            RenderError::Unavailable => "Configure RENDERER_URL and try again.",
            RenderError::Failed { .. } => "Try generating the document again.",
        }
    }
}

/// Everything the renderer needs for one document.
#[derive(Debug, Clone, Serialize)]
pub struct RenderRequest {
    pub profile: Profile,
    pub content: TailoredContent,
    pub style: DocumentStyle,
    pub format: DocumentFormat,
    pub language: LanguageRequirement,
}

#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, request: &RenderRequest) -> Result<Vec<u8>, RenderError>;
}

/// Rejects output that does not start with the signature of the requested format.
pub fn check_signature(document: &[u8], format: DocumentFormat) -> Result<(), RenderError> {
    if document.starts_with(format.signature()) {
        Ok(())
    } else {
        Err(RenderError::failed(
            format,
            format!("output does not start with the {format} signature"),
        ))
    }
}

/// Posts the request as JSON to `RENDERER_URL` and returns the raw response body.
#[derive(Clone)]
pub struct HttpDocumentRenderer {
    client: Client,
    url: Option<String>,
}

impl HttpDocumentRenderer {
    pub fn new(url: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(RENDER_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            url: url.filter(|u| !u.trim().is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }
}

#[async_trait]
impl DocumentRenderer for HttpDocumentRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<Vec<u8>, RenderError> {
        let url = self.url.as_deref().ok_or(RenderError::Unavailable)?;
        let format = request.format;

        let response = self
            .client
            .post(url)
            .header("accept", format.mime_type())
            .json(request)
            .send()
            .await
            .map_err(|e| RenderError::failed(format, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RenderError::failed(
                format,
                format!("renderer returned {status}: {body}"),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RenderError::failed(format, e.to_string()))?
            .to_vec();
        check_signature(&bytes, format)?;
        debug!("Rendered {} ({} bytes)", format, bytes.len());
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(format: DocumentFormat) -> RenderRequest {
        RenderRequest {
            profile: Profile::default(),
            content: TailoredContent {
                summary: String::new(),
                experiences: vec![],
                top_bullets: vec![],
                skill_categories: vec![],
                scores: Default::default(),
                match_score: 0,
                enhanced_bullets: vec![],
            },
            style: DocumentStyle::default(),
            format,
            language: LanguageRequirement::English,
        }
    }

    #[tokio::test]
    async fn test_unconfigured_renderer_is_unavailable() {
        let renderer = HttpDocumentRenderer::new(Some("  ".to_string()));
        assert!(!renderer.is_configured());
        let err = renderer.render(&request(DocumentFormat::Pdf)).await.unwrap_err();
        assert!(matches!(err, RenderError::Unavailable));
    }

    #[test]
    fn test_signature_check() {
        assert!(check_signature(b"%PDF-1.7", DocumentFormat::Pdf).is_ok());
        assert!(check_signature(b"PK\x03\x04", DocumentFormat::Docx).is_ok());
        let err = check_signature(b"<html>", DocumentFormat::Docx).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Failed {
                format: DocumentFormat::Docx,
                ..
            }
        ));
    }

    #[test]
    fn test_user_message_is_scoped_to_format() {
        let err = RenderError::failed(DocumentFormat::Docx, "connection reset");
        assert_eq!(err.user_message(), "DOCX generation failed");
        assert!(!err.user_message().contains("reset"));
    }

    #[test]
    fn test_request_serializes_format_lowercase() {
        let json = serde_json::to_value(request(DocumentFormat::Docx)).unwrap();
        assert_eq!(json["format"], "docx");
        assert_eq!(json["style"]["font_family"], "Helvetica");
    }
}
