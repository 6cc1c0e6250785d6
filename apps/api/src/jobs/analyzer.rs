//! Job Analyzer: turns a raw job description into tiered keyword lists via the LLM.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::jobs::prompts::{JOB_ANALYSIS_PROMPT_TEMPLATE, JOB_ANALYSIS_SYSTEM};
use crate::llm_client::prompts::NO_INVENTION_INSTRUCTION;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::JobAnalysis;

pub const MIN_DESCRIPTION_CHARS: usize = 50;
pub const MAX_DESCRIPTION_CHARS: usize = 20_000;

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Typed failures surfaced to the caller, who decides between retry and a message.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("No API key provided")]
    MissingApiKey,

    #[error("The API key was rejected")]
    Unauthorized,

    #[error("The job analyzer is rate limited")]
    RateLimited,

    #[error("The job analyzer returned a server error (status {status})")]
    Server { status: u16 },

    #[error("Could not reach the job analyzer: {0}")]
    Network(String),

    #[error("Job analysis timed out")]
    Timeout,

    #[error("Could not parse the analyzer response: {0}")]
    Parse(String),

    /// Any other non-success reply from the provider. `message` is logged, not shown.
    #[error("The job analyzer rejected the request (status {status})")]
    Rejected { status: u16, message: String },

    #[error("{0}")]
    InvalidInput(String),
}

impl AnalyzerError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AnalyzerError::RateLimited
                | AnalyzerError::Server { .. }
                | AnalyzerError::Network(_)
                | AnalyzerError::Timeout
        )
    }

    /// Human-readable hint shown next to the error.
    pub fn remediation(&self) -> &'static str {
        match self {
            AnalyzerError::MissingApiKey => "Provide a valid API key in the settings.",
            AnalyzerError::Unauthorized => {
                "Check that your API key is valid and has not been revoked."
            }
            AnalyzerError::RateLimited => "Wait a moment and try again.",
            AnalyzerError::Server { .. } => {
                "The analysis service is having problems. Try again in a few minutes."
            }
            AnalyzerError::Network(_) => "Check your internet connection and try again.",
            AnalyzerError::Timeout => {
                "Try again. If this keeps happening, shorten the job description."
            }
            AnalyzerError::Parse(_) => "Try again, or enter your details manually.",
            AnalyzerError::Rejected { .. } => {
                "The analysis service could not handle this request. Try again later."
            }
            AnalyzerError::InvalidInput(_) => {
                "Paste the complete job description (50 to 20,000 characters)."
            }
        }
    }
}

impl From<LlmError> for AnalyzerError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => AnalyzerError::MissingApiKey,
            LlmError::Http(e) if e.is_timeout() => AnalyzerError::Timeout,
            LlmError::Http(e) => AnalyzerError::Network(e.to_string()),
            LlmError::Api { status: 401 | 403, .. } => AnalyzerError::Unauthorized,
            LlmError::Api { status: 429, .. } | LlmError::RateLimited { .. } => {
                AnalyzerError::RateLimited
            }
            LlmError::Api { status, .. } if status >= 500 => AnalyzerError::Server { status },
            LlmError::Api { status, message } => AnalyzerError::Rejected { status, message },
            LlmError::Parse(e) => AnalyzerError::Parse(e.to_string()),
            LlmError::EmptyContent => AnalyzerError::Parse("empty response".to_string()),
        }
    }
}

/// Trims `text` and checks its length in characters.
pub fn validate_job_description(text: &str) -> Result<&str, AnalyzerError> {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    if len < MIN_DESCRIPTION_CHARS {
        return Err(AnalyzerError::InvalidInput(format!(
            "job_description must be at least {MIN_DESCRIPTION_CHARS} characters (got {len})"
        )));
    }
    if len > MAX_DESCRIPTION_CHARS {
        return Err(AnalyzerError::InvalidInput(format!(
            "job_description must be at most {MAX_DESCRIPTION_CHARS} characters (got {len})"
        )));
    }
    Ok(trimmed)
}

// ────────────────────────────────────────────────────────────────────────────
// Analyzer
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait JobAnalyzer: Send + Sync {
    /// `api_key` overrides the configured key for this call.
    async fn analyze(
        &self,
        description: &str,
        api_key: Option<&str>,
    ) -> Result<JobAnalysis, AnalyzerError>;
}

/// LLM-backed analyzer. Uncached and unthrottled; wrap it in `JobAnalyzerClient`.
#[derive(Clone)]
pub struct LlmJobAnalyzer {
    llm: LlmClient,
}

impl LlmJobAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl JobAnalyzer for LlmJobAnalyzer {
    async fn analyze(
        &self,
        description: &str,
        api_key: Option<&str>,
    ) -> Result<JobAnalysis, AnalyzerError> {
        let description = validate_job_description(description)?;
        let prompt = JOB_ANALYSIS_PROMPT_TEMPLATE
            .replace("{rules}", NO_INVENTION_INSTRUCTION)
            .replace("{job_description}", description);

        let analysis: JobAnalysis = self
            .llm
            .call_json(&prompt, JOB_ANALYSIS_SYSTEM, api_key)
            .await?;
        let analysis = normalize(analysis);

        info!(
            "Analyzed job '{}': {} must-have, {} preferred, {} nice-to-have keywords",
            analysis.job_title,
            analysis.must_have_keywords.len(),
            analysis.preferred_keywords.len(),
            analysis.nice_to_have_keywords.len()
        );
        Ok(analysis)
    }
}

/// Trims every field and drops blank keywords. Overlap between tiers is kept.
pub fn normalize(mut analysis: JobAnalysis) -> JobAnalysis {
    analysis.job_title = analysis.job_title.trim().to_string();
    analysis.company_name = analysis.company_name.trim().to_string();
    for list in [
        &mut analysis.must_have_keywords,
        &mut analysis.preferred_keywords,
        &mut analysis.nice_to_have_keywords,
    ] {
        *list = list
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
    }
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::parse_json_reply;
    use crate::models::LanguageRequirement;

    #[test]
    fn test_analyzer_schema_deserializes() {
        let reply = r#"```json
        {
          "jobTitle": "ML Engineer",
          "companyName": "ACME",
          "mustHaveKeywords": ["Python", "GPU"],
          "preferredKeywords": ["Docker"],
          "niceToHaveKeywords": ["AWS"],
          "languageRequirement": "both"
        }
        ```"#;
        let analysis: JobAnalysis = parse_json_reply(reply).unwrap();
        assert_eq!(analysis.job_title, "ML Engineer");
        assert_eq!(analysis.must_have_keywords, vec!["Python", "GPU"]);
        assert_eq!(analysis.language_requirement, LanguageRequirement::Both);
    }

    #[test]
    fn test_normalize_trims_and_drops_blanks() {
        let analysis = normalize(JobAnalysis {
            job_title: "  Dev ".to_string(),
            must_have_keywords: vec![" Rust ".to_string(), "".to_string(), "  ".to_string()],
            preferred_keywords: vec!["Rust".to_string()],
            ..Default::default()
        });
        assert_eq!(analysis.job_title, "Dev");
        assert_eq!(analysis.must_have_keywords, vec!["Rust"]);
        assert_eq!(analysis.preferred_keywords, vec!["Rust"], "tier overlap is kept");
    }

    #[test]
    fn test_description_length_validation() {
        assert!(matches!(
            validate_job_description("too short"),
            Err(AnalyzerError::InvalidInput(_))
        ));
        assert!(validate_job_description(&"x".repeat(MAX_DESCRIPTION_CHARS + 1)).is_err());
        let ok = format!("  {}  ", "y".repeat(MIN_DESCRIPTION_CHARS));
        assert_eq!(validate_job_description(&ok).unwrap().len(), MIN_DESCRIPTION_CHARS);
    }

    #[test]
    fn test_llm_error_mapping() {
        let unauthorized: AnalyzerError = LlmError::Api {
            status: 401,
            message: "invalid x-api-key".to_string(),
        }
        .into();
        assert!(matches!(unauthorized, AnalyzerError::Unauthorized));
        assert!(!unauthorized.is_retryable());

        let server: AnalyzerError = LlmError::Api {
            status: 529,
            message: "overloaded".to_string(),
        }
        .into();
        assert!(matches!(server, AnalyzerError::Server { status: 529 }));
        assert!(server.is_retryable());

        let limited: AnalyzerError = LlmError::RateLimited { retries: 3 }.into();
        assert!(limited.is_retryable());

        let parse: AnalyzerError = LlmError::EmptyContent.into();
        assert!(matches!(parse, AnalyzerError::Parse(_)));
        assert!(!parse.is_retryable());

        let missing: AnalyzerError = LlmError::MissingApiKey.into();
        assert!(matches!(missing, AnalyzerError::MissingApiKey));
    }

    #[test]
    fn test_provider_bad_request_is_not_blamed_on_the_description() {
        let rejected: AnalyzerError = LlmError::Api {
            status: 400,
            message: "max_tokens: exceeds model limit".to_string(),
        }
        .into();
        assert!(matches!(rejected, AnalyzerError::Rejected { status: 400, .. }));
        assert!(!rejected.is_retryable());
        assert!(!rejected.to_string().contains("max_tokens"));
        assert!(!rejected.remediation().contains("job description"));
    }

    #[test]
    fn test_every_error_has_a_remediation() {
        let errors = [
            AnalyzerError::MissingApiKey,
            AnalyzerError::Unauthorized,
            AnalyzerError::RateLimited,
            AnalyzerError::Server { status: 500 },
            AnalyzerError::Network("down".to_string()),
            AnalyzerError::Timeout,
            AnalyzerError::Parse("bad".to_string()),
            AnalyzerError::Rejected {
                status: 400,
                message: "bad request".to_string(),
            },
            AnalyzerError::InvalidInput("short".to_string()),
        ];
        assert!(errors.iter().all(|e| !e.remediation().is_empty()));
    }

    #[tokio::test]
    async fn test_short_description_rejected_before_llm_call() {
        let analyzer = LlmJobAnalyzer::new(LlmClient::new(None));
        let err = analyzer.analyze("short", None).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_missing_key_surfaces_as_missing_api_key() {
        let analyzer = LlmJobAnalyzer::new(LlmClient::new(None));
        let description = "We are hiring a backend engineer with strong Python and Docker skills.";
        let err = analyzer.analyze(description, None).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::MissingApiKey));
    }
}
