//! Plain-text rendering of a [`ComplianceScore`].

use std::fmt::Write;

use crate::compliance::models::{ComplianceFactor, ComplianceScore};

const RULE: &str = "========================================";

fn banner(overall: u8) -> &'static str {
    match overall {
        85..=u8::MAX => "EXCELLENT: This document should pass most ATS parsers without problems.",
        70..=84 => "GOOD: This document is ATS compatible with minor improvements possible.",
        50..=69 => "MODERATE: Several issues may reduce how well ATS parsers read this document.",
        _ => "POOR: ATS parsers are likely to misread or reject this document.",
    }
}

/// Deterministic report: header, timestamp, overall, breakdown, banner, then issues
/// and recommendations when present.
pub fn generate_compliance_report(score: &ComplianceScore) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, score);
    out
}

fn write_report(out: &mut String, score: &ComplianceScore) -> std::fmt::Result {
    writeln!(out, "ATS COMPLIANCE REPORT")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Generated: {}", score.timestamp.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(out)?;
    writeln!(out, "Overall Score: {}/100", score.overall)?;
    writeln!(out)?;

    writeln!(out, "Score Breakdown:")?;
    for factor in ComplianceFactor::ALL {
        writeln!(
            out,
            "  {:<22} {:>3}/100",
            format!("{}:", factor.label()),
            score.breakdown.get(factor)
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{}", banner(score.overall))?;

    if !score.issues.is_empty() {
        writeln!(out)?;
        writeln!(out, "Issues Found ({}):", score.issues.len())?;
        for (i, issue) in score.issues.iter().enumerate() {
            writeln!(out, "  {}. [{}] {}", i + 1, issue.severity.label(), issue.message)?;
            writeln!(out, "     Impact: {}", issue.impact)?;
            writeln!(out, "     Solution: {}", issue.solution)?;
            if let Some(location) = &issue.location {
                writeln!(out, "     Location: {location}")?;
            }
        }
    }

    if !score.recommendations.is_empty() {
        writeln!(out)?;
        writeln!(out, "Recommendations:")?;
        for (i, rec) in score.recommendations.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, rec)?;
        }
    }

    Ok(())
}
