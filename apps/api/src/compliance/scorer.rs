//! Compliance Scorer: weighted five-factor ATS score for a rendered document.
//!
//! Sub-scores are computed independently by pure functions below, then combined:
//! text extraction 30%, font 25%, structure 20%, keywords 15%, format 10%.
//! Collaborator failures never propagate: they degrade to an all-zero score with
//! one critical issue.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::compliance::ats_service::{blend_scores, AtsScoringService};
use crate::compliance::extraction::{expected_text, TextExtractionValidator};
use crate::compliance::font::FontValidator;
use crate::compliance::models::{
    ComplianceFactor, ComplianceIssue, ComplianceScore, ExtractionReport, FontIssueSeverity,
    FontReport, IssueSeverity, IssueType, ScoreBreakdown,
};
use crate::compliance::CollaboratorError;
use crate::documents::DocumentFormat;
use crate::layout::DocumentStyle;
use crate::models::Profile;
use crate::tailoring::TailoredContent;

// ────────────────────────────────────────────────────────────────────────────
// Thresholds
// ────────────────────────────────────────────────────────────────────────────

const TARGET_EXTRACTION_RATE: f64 = 0.95;
const MIN_EXTRACTION_RATE: f64 = 0.85;
/// Ceiling for the text-extraction score once the rate drops below the minimum.
const LOW_EXTRACTION_CEILING: i32 = 84;
const GARBLED_TEXT_PENALTY: i32 = 30;

const REQUIRED_SECTIONS: [&str; 3] = ["experience", "education", "skills"];
const MISSING_SECTION_PENALTY: i32 = 15;
const MISSING_EMAIL_PENALTY: i32 = 10;

const MIN_KEYWORD_SCORE: u8 = 70;
const BAD_SIGNATURE_PENALTY: i32 = 20;

/// Overall scores below this get the generic regenerate recommendation.
const RECOMMEND_REGENERATE_BELOW: u8 = 85;

pub const GENERIC_RECOMMENDATION: &str =
    "Regenerate the document with ATS-optimized settings (standard font, black text, simple layout).";

fn factor_recommendation(factor: ComplianceFactor) -> &'static str {
    match factor {
        ComplianceFactor::TextExtraction => {
            "Improve text extraction: avoid images of text, text boxes and multi-column layouts."
        }
        ComplianceFactor::FontCompliance => {
            "Switch to a standard font (Helvetica, Times-Roman or Courier) in black at 10-12pt."
        }
        ComplianceFactor::StructureCompliance => {
            "Use standard section headings (Experience, Education, Skills) and show your email as plain text."
        }
        ComplianceFactor::KeywordOptimization => {
            "Work more of the job's must-have keywords into your summary, skills and experience bullets."
        }
        ComplianceFactor::FormatCompliance => {
            "Re-export the document; the file does not look like a valid PDF or DOCX."
        }
    }
}

fn clamp_score(score: i32) -> u8 {
    score.clamp(0, 100) as u8
}

// ────────────────────────────────────────────────────────────────────────────
// Sub-scores
// ────────────────────────────────────────────────────────────────────────────

pub fn text_extraction_score(rate: f64, garbled: bool) -> (u8, Vec<ComplianceIssue>) {
    let mut score: i32 = 100;
    let mut issues = Vec::new();

    if rate < TARGET_EXTRACTION_RATE {
        score -= ((TARGET_EXTRACTION_RATE - rate) * 100.0).round() as i32;
    }
    if rate < MIN_EXTRACTION_RATE {
        score = score.min(LOW_EXTRACTION_CEILING);
        issues.push(ComplianceIssue::new(
            IssueSeverity::Critical,
            IssueType::Content,
            format!(
                "Low text extraction rate: only {:.0}% of your content could be read",
                rate * 100.0
            ),
            "ATS parsers will miss parts of your experience and skills",
            "Avoid images, text boxes and complex layouts; regenerate with a standard template",
        ));
    }
    if garbled {
        score -= GARBLED_TEXT_PENALTY;
        issues.push(ComplianceIssue::new(
            IssueSeverity::Critical,
            IssueType::Font,
            "Garbled text found when extracting the document",
            "Parsed fields will contain unreadable characters",
            "Use a standard font with a proper text encoding",
        ));
    }
    (clamp_score(score), issues)
}

pub fn font_compliance_score(report: &FontReport) -> (u8, Vec<ComplianceIssue>) {
    let mut issues: Vec<ComplianceIssue> = report
        .issues
        .iter()
        .map(|issue| {
            let severity = match issue.severity {
                FontIssueSeverity::Error => IssueSeverity::Critical,
                FontIssueSeverity::Warning => IssueSeverity::Warning,
            };
            ComplianceIssue::new(
                severity,
                IssueType::Font,
                issue.message.clone(),
                "ATS parsers may misread or drop text in this font configuration",
                issue.remediation.clone(),
            )
        })
        .collect();
    let score = report.score.min(100);
    if score < 70 && issues.is_empty() {
        issues.push(ComplianceIssue::new(
            IssueSeverity::Warning,
            IssueType::Font,
            format!("Font configuration scored {score}/100"),
            "ATS parsers may misread text in this font configuration",
            "Use a standard font in black at 10-12pt",
        ));
    }
    (score, issues)
}

pub fn structure_compliance_score(extracted: &str, email: &str) -> (u8, Vec<ComplianceIssue>) {
    let lowered = extracted.to_lowercase();
    let mut score: i32 = 100;
    let mut issues = Vec::new();

    for section in REQUIRED_SECTIONS {
        if !lowered.contains(section) {
            score -= MISSING_SECTION_PENALTY;
            issues.push(
                ComplianceIssue::new(
                    IssueSeverity::Warning,
                    IssueType::Structure,
                    format!("Missing '{section}' section heading"),
                    "ATS parsers rely on standard headings to split your CV into fields",
                    format!("Add a section titled '{}'", capitalize(section)),
                )
                .at(capitalize(section)),
            );
        }
    }

    if !extracted.contains(email) {
        score -= MISSING_EMAIL_PENALTY;
        issues.push(
            ComplianceIssue::new(
                IssueSeverity::Warning,
                IssueType::Structure,
                "Email address not found in the extracted text",
                "Recruiters may not be able to contact you from the parsed profile",
                "Show your email as plain text in the header",
            )
            .at("Header"),
        );
    }

    (clamp_score(score), issues)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn keyword_optimization_score(match_score: u8) -> (u8, Vec<ComplianceIssue>) {
    let score = match_score.min(100);
    let mut issues = Vec::new();
    if score < MIN_KEYWORD_SCORE {
        issues.push(ComplianceIssue::new(
            IssueSeverity::Warning,
            IssueType::Keywords,
            format!("Only {score}% of the job keywords appear in your profile"),
            "ATS keyword filters may rank your application low",
            "Add missing keywords where they truthfully describe your experience",
        ));
    }
    (score, issues)
}

pub fn format_compliance_score(document: &[u8], format: DocumentFormat) -> (u8, Vec<ComplianceIssue>) {
    if document.is_empty() {
        return (
            0,
            vec![ComplianceIssue::new(
                IssueSeverity::Critical,
                IssueType::Format,
                "The document is empty",
                "Nothing can be parsed",
                "Regenerate the document",
            )],
        );
    }

    let mut score: i32 = 100;
    let mut issues = Vec::new();
    if !document.starts_with(format.signature()) {
        score -= BAD_SIGNATURE_PENALTY;
        issues.push(ComplianceIssue::new(
            IssueSeverity::Critical,
            IssueType::Format,
            format!("The file does not start with a valid {} signature", format.as_str().to_uppercase()),
            "ATS systems may reject the upload as corrupt",
            "Regenerate the document in the selected format",
        ));
    }
    (clamp_score(score), issues)
}

/// Generic recommendation below 85 overall, then one for the weakest factor below 100.
pub fn recommendations(overall: u8, breakdown: &ScoreBreakdown) -> Vec<String> {
    let mut recs = Vec::new();
    if overall < RECOMMEND_REGENERATE_BELOW {
        recs.push(GENERIC_RECOMMENDATION.to_string());
    }
    let (weakest, score) = breakdown.weakest();
    if score < 100 {
        recs.push(factor_recommendation(weakest).to_string());
    }
    recs
}

/// Combines collaborator reports into a final score. Pure.
pub fn score_document(
    document: &[u8],
    format: DocumentFormat,
    profile: &Profile,
    content: &TailoredContent,
    extraction: &ExtractionReport,
    fonts: &FontReport,
    external: Option<u8>,
) -> ComplianceScore {
    let (text_extraction, mut issues) =
        text_extraction_score(extraction.extraction_rate, extraction.garbled);
    let (font_compliance, font_issues) = font_compliance_score(fonts);
    let (structure_compliance, structure_issues) =
        structure_compliance_score(&extraction.text, &profile.header.email);
    let (keyword_optimization, keyword_issues) = keyword_optimization_score(content.match_score);
    let (format_compliance, format_issues) = format_compliance_score(document, format);
    issues.extend(font_issues);
    issues.extend(structure_issues);
    issues.extend(keyword_issues);
    issues.extend(format_issues);

    let breakdown = ScoreBreakdown {
        text_extraction,
        font_compliance,
        structure_compliance,
        keyword_optimization,
        format_compliance,
    };
    let internal = breakdown.weighted_total();
    let overall = match external {
        Some(ext) => blend_scores(internal, ext),
        None => internal,
    };

    ComplianceScore {
        overall,
        recommendations: recommendations(overall, &breakdown),
        breakdown,
        issues,
        timestamp: Utc::now(),
    }
}

/// All-zero result used when validation itself fails.
pub fn degraded_score() -> ComplianceScore {
    ComplianceScore {
        overall: 0,
        breakdown: ScoreBreakdown::default(),
        issues: vec![ComplianceIssue::new(
            IssueSeverity::Critical,
            IssueType::Format,
            "Document validation failed",
            "The document could not be checked for ATS compatibility",
            "Regenerate the document and validate again",
        )],
        recommendations: vec![GENERIC_RECOMMENDATION.to_string()],
        timestamp: Utc::now(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scorer
// ────────────────────────────────────────────────────────────────────────────

/// Runs the validators for a document and scores it.
#[derive(Clone)]
pub struct ComplianceScorer {
    extractor: Arc<dyn TextExtractionValidator>,
    fonts: Arc<dyn FontValidator>,
    ats_service: Option<Arc<dyn AtsScoringService>>,
}

impl ComplianceScorer {
    pub fn new(
        extractor: Arc<dyn TextExtractionValidator>,
        fonts: Arc<dyn FontValidator>,
        ats_service: Option<Arc<dyn AtsScoringService>>,
    ) -> Self {
        Self {
            extractor,
            fonts,
            ats_service,
        }
    }

    /// Never fails: validator errors yield [`degraded_score`].
    pub async fn validate_document(
        &self,
        document: &[u8],
        format: DocumentFormat,
        profile: &Profile,
        content: &TailoredContent,
        style: &DocumentStyle,
    ) -> ComplianceScore {
        match self.try_validate(document, format, profile, content, style).await {
            Ok(score) => {
                info!(
                    "Compliance score for {}: {} ({} issues)",
                    format,
                    score.overall,
                    score.issues.len()
                );
                score
            }
            Err(e) => {
                warn!("Compliance validation of {} failed: {}", format, e);
                degraded_score()
            }
        }
    }

    async fn try_validate(
        &self,
        document: &[u8],
        format: DocumentFormat,
        profile: &Profile,
        content: &TailoredContent,
        style: &DocumentStyle,
    ) -> Result<ComplianceScore, CollaboratorError> {
        let expected = expected_text(profile, content);
        let (extraction, fonts) = tokio::join!(
            self.extractor.validate(document, format, &expected),
            self.fonts.validate(style)
        );
        let extraction = extraction?;
        let fonts = fonts?;

        let external = match &self.ats_service {
            Some(service) => match service.score(document, format).await {
                Ok(score) => Some(score),
                Err(e) => {
                    warn!("External ATS scoring ignored: {}", e);
                    None
                }
            },
            None => None,
        };

        Ok(score_document(
            document,
            format,
            profile,
            content,
            &extraction,
            &fonts,
            external,
        ))
    }
}
