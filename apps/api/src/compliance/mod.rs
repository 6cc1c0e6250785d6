//! ATS compliance scoring of rendered documents.

pub mod ats_service;
pub mod extraction;
pub mod font;
pub mod handlers;
pub mod models;
pub mod report;
pub mod scorer;

use thiserror::Error;

pub use models::ComplianceScore;
pub use report::generate_compliance_report;
pub use scorer::ComplianceScorer;

/// Failure inside a validation collaborator. The scorer turns any of these into a
/// degraded result instead of surfacing it.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("text extraction failed: {0}")]
    Extraction(String),

    #[error("font validation failed: {0}")]
    Font(String),

    #[error("ATS scoring service failed: {0}")]
    AtsService(String),

    #[error("validator task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
