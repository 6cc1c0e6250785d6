//! Multi-format generation: every requested format is rendered, retried and validated
//! in its own task, from its own copy of the content.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::compliance::{generate_compliance_report, ComplianceScore, ComplianceScorer};
use crate::documents::{DocumentFormat, DocumentRenderer, RenderError, RenderRequest};
use crate::layout::page_limit::page_count_warning;
use crate::layout::{estimate_page_count, DocumentStyle};
use crate::models::{LanguageRequirement, Profile};
use crate::tailoring::TailoredContent;

const MAX_RENDER_ATTEMPTS: u32 = 3;
const RENDER_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Inputs shared by every format of one generation run.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub profile: Profile,
    pub content: TailoredContent,
    pub style: DocumentStyle,
    pub language: LanguageRequirement,
    pub max_pages: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDocument {
    pub format: DocumentFormat,
    pub size_bytes: usize,
    pub estimated_pages: u32,
    pub attempts: u32,
    pub compliance: ComplianceScore,
    pub report: String,
    pub warnings: Vec<String>,
}

/// Result for one format. A failed format never affects its siblings.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FormatOutcome {
    Generated(GeneratedDocument),
    Failed {
        format: DocumentFormat,
        message: String,
        hint: &'static str,
    },
}

impl FormatOutcome {
    pub fn format(&self) -> DocumentFormat {
        match self {
            FormatOutcome::Generated(doc) => doc.format,
            FormatOutcome::Failed { format, .. } => *format,
        }
    }

    fn failed(err: &RenderError, format: DocumentFormat) -> Self {
        FormatOutcome::Failed {
            format,
            message: err.user_message(),
            hint: err.remediation(),
        }
    }
}

/// Renders with exponential backoff (1s, 2s). Returns the bytes and the attempt count.
///
/// `Unavailable` is returned at once; no amount of retrying configures a renderer.
pub async fn render_with_retry(
    renderer: &dyn DocumentRenderer,
    request: &RenderRequest,
) -> Result<(Vec<u8>, u32), RenderError> {
    let mut last_error = RenderError::Unavailable;

    for attempt in 0..MAX_RENDER_ATTEMPTS {
        if attempt > 0 {
            let delay = RENDER_RETRY_BASE_DELAY * (1 << (attempt - 1));
            warn!(
                "{} render attempt {} failed, retrying after {}ms: {}",
                request.format,
                attempt,
                delay.as_millis(),
                last_error
            );
            tokio::time::sleep(delay).await;
        }

        match renderer.render(request).await {
            Ok(bytes) => return Ok((bytes, attempt + 1)),
            Err(RenderError::Unavailable) => return Err(RenderError::Unavailable),
            Err(e) => last_error = e,
        }
    }

    Err(last_error)
}

async fn generate_one(
    renderer: Arc<dyn DocumentRenderer>,
    scorer: ComplianceScorer,
    job: GenerationJob,
    format: DocumentFormat,
) -> FormatOutcome {
    let request = RenderRequest {
        profile: job.profile,
        content: job.content,
        style: job.style,
        format,
        language: job.language,
    };

    let (bytes, attempts) = match render_with_retry(renderer.as_ref(), &request).await {
        Ok(rendered) => rendered,
        Err(e) => {
            error!("Giving up on {}: {}", format, e);
            return FormatOutcome::failed(&e, format);
        }
    };

    let compliance = scorer
        .validate_document(
            &bytes,
            format,
            &request.profile,
            &request.content,
            &request.style,
        )
        .await;
    let report = generate_compliance_report(&compliance);
    let warnings = page_count_warning(&bytes, job.max_pages)
        .into_iter()
        .collect();

    FormatOutcome::Generated(GeneratedDocument {
        format,
        size_bytes: bytes.len(),
        estimated_pages: estimate_page_count(&bytes),
        attempts,
        compliance,
        report,
        warnings,
    })
}

/// Generates every distinct format in `formats` concurrently.
///
/// Outcomes come back in request order, duplicates removed.
pub async fn generate_documents(
    renderer: Arc<dyn DocumentRenderer>,
    scorer: ComplianceScorer,
    job: &GenerationJob,
    formats: &[DocumentFormat],
) -> Vec<FormatOutcome> {
    let mut distinct: Vec<DocumentFormat> = Vec::new();
    for format in formats {
        if !distinct.contains(format) {
            distinct.push(*format);
        }
    }

    let handles: Vec<_> = distinct
        .iter()
        .map(|&format| {
            let task = generate_one(renderer.clone(), scorer.clone(), job.clone(), format);
            (format, tokio::spawn(task))
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (format, handle) in handles {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("{} generation task failed: {}", format, e);
                FormatOutcome::failed(
                    &RenderError::Failed {
                        format,
                        message: e.to_string(),
                    },
                    format,
                )
            }
        };
        outcomes.push(outcome);
    }

    let generated = outcomes
        .iter()
        .filter(|o| matches!(o, FormatOutcome::Generated(_)))
        .count();
    info!(
        "Generated {}/{} document formats",
        generated,
        outcomes.len()
    );
    outcomes
}
