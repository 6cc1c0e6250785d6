//! Text-extraction validator: a "copy-paste" simulation of what a naive ATS parser
//! recovers from a rendered document.
//!
//! PDF text comes from `pdf-extract`; DOCX text from `word/document.xml` inside the
//! ZIP container with the markup stripped. The extraction rate is the share of
//! expected characters (tokens of the content the document was rendered from)
//! found again in the extracted text.

use std::collections::HashSet;
use std::io::{Cursor, Read};
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use crate::compliance::models::ExtractionReport;
use crate::compliance::CollaboratorError;
use crate::documents::DocumentFormat;
use crate::models::Profile;
use crate::tailoring::TailoredContent;

/// Above this share of control characters the text counts as garbled.
const MAX_CONTROL_CHAR_RATIO: f64 = 0.05;

#[async_trait]
pub trait TextExtractionValidator: Send + Sync {
    async fn validate(
        &self,
        document: &[u8],
        format: DocumentFormat,
        expected_text: &str,
    ) -> Result<ExtractionReport, CollaboratorError>;
}

/// Extracts text in-process. Parsing runs on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentTextExtractor;

#[async_trait]
impl TextExtractionValidator for DocumentTextExtractor {
    async fn validate(
        &self,
        document: &[u8],
        format: DocumentFormat,
        expected_text: &str,
    ) -> Result<ExtractionReport, CollaboratorError> {
        let bytes = document.to_vec();
        let report = match tokio::task::spawn_blocking(move || extract_text(&bytes, format)).await? {
            Ok(text) => build_report(text, expected_text),
            Err(e) => {
                // Unparseable documents are a finding, not a validator failure.
                let mut report = build_report(String::new(), expected_text);
                report.issues.push(e.to_string());
                report
            }
        };
        debug!(
            "Extracted {} chars from {} (rate {:.2}, garbled: {})",
            report.char_count, format, report.extraction_rate, report.garbled
        );
        Ok(report)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Extraction
// ────────────────────────────────────────────────────────────────────────────

pub fn extract_text(document: &[u8], format: DocumentFormat) -> Result<String, CollaboratorError> {
    match format {
        DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(document)
            .map_err(|e| CollaboratorError::Extraction(format!("PDF text extraction failed: {e}"))),
        DocumentFormat::Docx => extract_docx_text(document),
    }
}

fn extract_docx_text(document: &[u8]) -> Result<String, CollaboratorError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(document))
        .map_err(|e| CollaboratorError::Extraction(format!("Invalid DOCX container: {e}")))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| CollaboratorError::Extraction(format!("DOCX has no document body: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| CollaboratorError::Extraction(format!("Unreadable DOCX body: {e}")))?;
    Ok(xml_to_text(&xml))
}

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// WordprocessingML → plain text: paragraphs become lines, tabs stay tabs.
fn xml_to_text(xml: &str) -> String {
    let text = xml
        .replace("</w:p>", "\n")
        .replace("<w:tab/>", "\t")
        .replace("<w:br/>", "\n");
    let stripped = TAG_RE.replace_all(&text, "");
    stripped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// ────────────────────────────────────────────────────────────────────────────
// Report
// ────────────────────────────────────────────────────────────────────────────

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Share of expected token characters present in `extracted`. 1.0 when nothing is expected.
pub fn extraction_rate(extracted: &str, expected: &str) -> f64 {
    let found: HashSet<String> = tokens(extracted).collect();
    let (total, recovered) = tokens(expected).fold((0usize, 0usize), |(total, recovered), tok| {
        let len = tok.chars().count();
        let hit = if found.contains(&tok) { len } else { 0 };
        (total + len, recovered + hit)
    });
    if total == 0 {
        return 1.0;
    }
    recovered as f64 / total as f64
}

/// Replacement characters, `(cid:` glyph placeholders or too many control characters.
pub fn is_garbled(text: &str) -> bool {
    if text.contains('\u{FFFD}') || text.contains("(cid:") {
        return true;
    }
    let total = text.chars().count();
    if total == 0 {
        return false;
    }
    let control = text
        .chars()
        .filter(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t' | '\u{0C}'))
        .count();
    control as f64 / total as f64 > MAX_CONTROL_CHAR_RATIO
}

pub fn build_report(text: String, expected: &str) -> ExtractionReport {
    let success = !text.trim().is_empty();
    let extraction_rate = if success {
        extraction_rate(&text, expected)
    } else {
        0.0
    };
    let garbled = is_garbled(&text);

    let mut issues = Vec::new();
    if !success {
        issues.push("No text could be extracted from the document".to_string());
    }
    if garbled {
        issues.push("Garbled characters found in the extracted text".to_string());
    }
    if success && extraction_rate < 0.95 {
        issues.push(format!(
            "Only {:.0}% of the expected content was recovered",
            extraction_rate * 100.0
        ));
    }

    ExtractionReport {
        word_count: text.split_whitespace().count(),
        char_count: text.chars().count(),
        text,
        extraction_rate,
        success,
        garbled,
        issues,
    }
}

/// Text a parser should be able to recover from a document rendered from
/// `profile` and `content`.
pub fn expected_text(profile: &Profile, content: &TailoredContent) -> String {
    let mut parts: Vec<&str> = vec![
        profile.header.name.as_str(),
        profile.header.title.as_str(),
        profile.header.email.as_str(),
        content.summary.as_str(),
    ];
    for exp in &content.experiences {
        parts.push(&exp.job_title);
        parts.push(&exp.company);
        parts.extend(exp.bullets.iter().map(|b| b.description.as_str()));
    }
    for category in &content.skill_categories {
        parts.push(&category.name);
        parts.extend(category.skills.iter().map(|s| s.name.as_str()));
    }
    for edu in &profile.education {
        parts.push(&edu.degree);
        parts.push(&edu.institution);
    }
    parts.retain(|p| !p.trim().is_empty());
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_with_body(xml: &str) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            let options = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Stored);
            writer.start_file("word/document.xml", options).unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buf.into_inner()
    }

    const BODY: &str = r#"<?xml version="1.0"?><w:document><w:body><w:p><w:r><w:t>Experience</w:t></w:r></w:p><w:p><w:r><w:t>Built Python &amp; Rust services</w:t></w:r></w:p></w:body></w:document>"#;

    #[test]
    fn test_docx_text_is_extracted() {
        let doc = docx_with_body(BODY);
        let text = extract_text(&doc, DocumentFormat::Docx).unwrap();
        assert_eq!(text, "Experience\nBuilt Python & Rust services");
    }

    #[test]
    fn test_docx_without_body_is_an_error() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            let options = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Stored);
            writer.start_file("other.xml", options).unwrap();
            writer.write_all(b"<x/>").unwrap();
            writer.finish().unwrap();
        }
        let err = extract_text(&buf.into_inner(), DocumentFormat::Docx).unwrap_err();
        assert!(matches!(err, CollaboratorError::Extraction(_)));
    }

    #[test]
    fn test_not_a_zip_is_an_error() {
        assert!(extract_text(b"definitely not a zip", DocumentFormat::Docx).is_err());
    }

    #[test]
    fn test_extraction_rate_counts_characters() {
        // expected: "python"(6) + "rust"(4) = 10 chars; only python recovered
        let rate = extraction_rate("Python developer", "Python Rust");
        assert!((rate - 0.6).abs() < 1e-9, "rate was {rate}");
        assert_eq!(extraction_rate("anything", ""), 1.0);
    }

    #[test]
    fn test_garbled_detection() {
        assert!(is_garbled("Hello \u{FFFD} world"));
        assert!(is_garbled("(cid:12)(cid:34)"));
        assert!(is_garbled("ab\u{01}\u{02}"));
        assert!(!is_garbled("Plain text\nwith lines\tand tabs"));
        assert!(!is_garbled(""));
    }

    #[test]
    fn test_build_report_for_empty_text() {
        let report = build_report(String::new(), "Python");
        assert!(!report.success);
        assert_eq!(report.extraction_rate, 0.0);
        assert_eq!(report.issues.len(), 1);
    }

    #[tokio::test]
    async fn test_validator_on_docx() {
        let doc = docx_with_body(BODY);
        let report = DocumentTextExtractor
            .validate(&doc, DocumentFormat::Docx, "Experience Python Rust")
            .await
            .unwrap();
        assert!(report.success);
        assert!(!report.garbled);
        assert_eq!(report.extraction_rate, 1.0);
        assert_eq!(report.word_count, 6);
    }

    #[tokio::test]
    async fn test_validator_reports_unparseable_docx() {
        let report = DocumentTextExtractor
            .validate(b"%PDF-1.4 not a docx", DocumentFormat::Docx, "Python")
            .await
            .unwrap();
        assert!(!report.success);
        assert_eq!(report.extraction_rate, 0.0);
        assert!(report
            .issues
            .iter()
            .any(|issue| issue.contains("Invalid DOCX container")));
    }
}
