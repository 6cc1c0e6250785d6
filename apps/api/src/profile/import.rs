//! CV import: PDF upload → extracted text → LLM → profile preview.
//!
//! The result is never saved here; the caller reviews it and saves through the store.

use tracing::{info, warn};

use crate::jobs::AnalyzerError;
use crate::llm_client::prompts::NO_INVENTION_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::models::Profile;
use crate::profile::prompts::{CV_IMPORT_PROMPT_TEMPLATE, CV_IMPORT_SYSTEM};

pub const MAX_CV_BYTES: usize = 10 * 1024 * 1024;
/// Longer CVs are cut before prompting; nothing useful lives past this point.
const MAX_CV_TEXT_CHARS: usize = 30_000;

/// Checks an upload before any parsing. The message is shown to the user as-is.
pub fn validate_cv_upload(bytes: &[u8]) -> Result<(), String> {
    if bytes.is_empty() {
        return Err("file is empty".to_string());
    }
    if bytes.len() > MAX_CV_BYTES {
        return Err(format!(
            "file is {} bytes; use a smaller file (max {} MB)",
            bytes.len(),
            MAX_CV_BYTES / (1024 * 1024)
        ));
    }
    if !bytes.starts_with(b"%PDF") {
        return Err("file is not a PDF".to_string());
    }
    Ok(())
}

/// Extracts the text of a PDF on the blocking pool.
///
/// A PDF that yields no text (scanned images, broken encoding) is a parse failure.
pub async fn extract_cv_text(pdf: Vec<u8>) -> Result<String, AnalyzerError> {
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
        .await
        .map_err(|e| AnalyzerError::Parse(format!("PDF reader crashed: {e}")))?
        .map_err(|e| AnalyzerError::Parse(format!("could not read PDF: {e}")))?;

    let text = clean_text(&extracted);
    if text.is_empty() {
        return Err(AnalyzerError::Parse(
            "no text could be extracted from the PDF".to_string(),
        ));
    }
    Ok(text)
}

/// Trims every line and collapses runs of blank lines to one.
fn clean_text(raw: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in raw.lines().map(str::trim) {
        if line.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Full import. Every list entry gets a fresh id; ids from the model are discarded.
pub async fn import_cv(
    pdf: Vec<u8>,
    llm: &LlmClient,
    api_key: Option<&str>,
) -> Result<Profile, AnalyzerError> {
    let text = extract_cv_text(pdf).await?;
    let cv_text = truncate_chars(&text, MAX_CV_TEXT_CHARS);
    if cv_text.len() < text.len() {
        warn!(
            "CV text truncated to {} characters for import",
            MAX_CV_TEXT_CHARS
        );
    }

    let prompt = CV_IMPORT_PROMPT_TEMPLATE
        .replace("{rules}", NO_INVENTION_INSTRUCTION)
        .replace("{cv_text}", cv_text);
    let mut profile: Profile = llm.call_json(&prompt, CV_IMPORT_SYSTEM, api_key).await?;
    profile.reassign_ids();

    info!(
        "Imported CV for '{}': {} experiences, {} skill categories",
        profile.header.name,
        profile.experiences.len(),
        profile.skill_categories.len()
    );
    Ok(profile)
}
