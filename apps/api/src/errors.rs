use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::documents::RenderError;
use crate::jobs::AnalyzerError;
use crate::profile::StorageError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String, Option<&'static str>) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::Analyzer(e) => {
                let (status, code) = match e {
                    AnalyzerError::MissingApiKey => (StatusCode::BAD_REQUEST, "MISSING_API_KEY"),
                    AnalyzerError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
                    AnalyzerError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
                    AnalyzerError::Server { .. } | AnalyzerError::Network(_) => {
                        (StatusCode::BAD_GATEWAY, "ANALYZER_UNAVAILABLE")
                    }
                    AnalyzerError::Parse(_) => (StatusCode::BAD_GATEWAY, "PARSE_ERROR"),
                    AnalyzerError::Rejected { status, message } => {
                        tracing::warn!("Job analyzer rejected request ({status}): {message}");
                        (StatusCode::BAD_GATEWAY, "ANALYZER_REJECTED")
                    }
                    AnalyzerError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
                    AnalyzerError::InvalidInput(_) => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
                    }
                };
                if status.is_server_error() {
                    tracing::error!("Job analyzer error: {e}");
                }
                (status, code, e.to_string(), Some(e.remediation()))
            }
            AppError::Storage(e) => match e {
                StorageError::QuotaExceeded { .. } => (
                    StatusCode::INSUFFICIENT_STORAGE,
                    "QUOTA_EXCEEDED",
                    e.to_string(),
                    Some(e.remediation()),
                ),
                _ => {
                    tracing::error!("Storage error: {e}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORAGE_ERROR",
                        "A storage error occurred".to_string(),
                        Some(e.remediation()),
                    )
                }
            },
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                let status = match e {
                    RenderError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                    RenderError::Failed { .. } => StatusCode::BAD_GATEWAY,
                };
                (status, "RENDER_ERROR", e.user_message(), Some(e.remediation()))
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, hint) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "hint": hint
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_errors_map_to_statuses() {
        let cases = [
            (AnalyzerError::MissingApiKey, StatusCode::BAD_REQUEST),
            (AnalyzerError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AnalyzerError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (AnalyzerError::Server { status: 500 }, StatusCode::BAD_GATEWAY),
            (AnalyzerError::Timeout, StatusCode::GATEWAY_TIMEOUT),
            (
                AnalyzerError::InvalidInput("short".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AnalyzerError::Rejected {
                    status: 400,
                    message: "bad request".to_string(),
                },
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_quota_error_carries_hint() {
        let err = AppError::from(StorageError::QuotaExceeded {
            size: 10,
            quota: 5,
        });
        let (status, code, _, hint) = err.parts();
        assert_eq!(status, StatusCode::INSUFFICIENT_STORAGE);
        assert_eq!(code, "QUOTA_EXCEEDED");
        assert!(hint.is_some());
    }

    #[test]
    fn test_internal_details_are_not_leaked() {
        let err = AppError::from(anyhow::anyhow!("secret connection string"));
        let (status, _, message, _) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("secret"));
    }
}
