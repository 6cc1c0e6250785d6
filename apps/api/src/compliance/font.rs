//! Font compliance: checks the style a document was rendered with against the
//! standard PDF font families ATS parsers handle reliably.

use async_trait::async_trait;

use crate::compliance::models::{FontIssue, FontIssueSeverity, FontReport};
use crate::compliance::CollaboratorError;
use crate::layout::DocumentStyle;

/// Canonical standard families and the normalised spellings accepted for each.
const STANDARD_FONTS: &[(&str, &[&str])] = &[
    ("Helvetica", &["helvetica"]),
    ("Times-Roman", &["timesroman", "times", "timesnewroman"]),
    ("Courier", &["courier", "couriernew"]),
];

/// Weight/slant suffixes stripped before the family lookup.
const STYLE_SUFFIXES: &[&str] = &["boldoblique", "bolditalic", "bold", "oblique", "italic", "regular"];

const NON_STANDARD_FONT_PENALTY: u8 = 30;
const NON_BLACK_COLOR_PENALTY: u8 = 10;
const UNREADABLE_SIZE_PENALTY: u8 = 25;
const SUBOPTIMAL_SIZE_PENALTY: u8 = 5;

const READABLE_SIZE_PT: std::ops::RangeInclusive<f32> = 8.0..=20.0;
const RECOMMENDED_SIZE_PT: std::ops::RangeInclusive<f32> = 9.0..=18.0;

#[async_trait]
pub trait FontValidator: Send + Sync {
    async fn validate(&self, style: &DocumentStyle) -> Result<FontReport, CollaboratorError>;
}

/// Rule-based validator over the three standard families.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFontValidator;

#[async_trait]
impl FontValidator for StandardFontValidator {
    async fn validate(&self, style: &DocumentStyle) -> Result<FontReport, CollaboratorError> {
        if !style.font_size_pt.is_finite() {
            return Err(CollaboratorError::Font(format!(
                "font size {} is not a number",
                style.font_size_pt
            )));
        }
        Ok(check_style(style))
    }
}

/// Canonical standard family for `family`, if it is one.
pub fn standard_family(family: &str) -> Option<&'static str> {
    let mut normalized: String = family
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    if let Some(suffix) = STYLE_SUFFIXES.iter().find(|s| normalized.ends_with(*s)) {
        normalized.truncate(normalized.len() - suffix.len());
    }
    STANDARD_FONTS
        .iter()
        .find(|(_, aliases)| aliases.contains(&normalized.as_str()))
        .map(|(canonical, _)| *canonical)
}

fn is_black(color: &str) -> bool {
    matches!(
        color.trim().to_ascii_lowercase().as_str(),
        "#000000" | "#000" | "black"
    )
}

pub fn check_style(style: &DocumentStyle) -> FontReport {
    let mut score: u8 = 100;
    let mut issues = Vec::new();

    if standard_family(&style.font_family).is_none() {
        score = score.saturating_sub(NON_STANDARD_FONT_PENALTY);
        issues.push(FontIssue {
            severity: FontIssueSeverity::Error,
            message: format!("Font '{}' is not a standard PDF font", style.font_family),
            remediation: "Use Helvetica, Times-Roman or Courier".to_string(),
        });
    }

    if !is_black(&style.color) {
        score = score.saturating_sub(NON_BLACK_COLOR_PENALTY);
        issues.push(FontIssue {
            severity: FontIssueSeverity::Warning,
            message: format!("Text colour {} is not pure black", style.color),
            remediation: "Set the text colour to #000000".to_string(),
        });
    }

    let size = style.font_size_pt;
    if !READABLE_SIZE_PT.contains(&size) {
        score = score.saturating_sub(UNREADABLE_SIZE_PENALTY);
        issues.push(FontIssue {
            severity: FontIssueSeverity::Error,
            message: format!("Font size {size}pt is outside the 8-20pt range parsers handle"),
            remediation: "Use a body font size between 10 and 12pt".to_string(),
        });
    } else if !RECOMMENDED_SIZE_PT.contains(&size) {
        score = score.saturating_sub(SUBOPTIMAL_SIZE_PENALTY);
        issues.push(FontIssue {
            severity: FontIssueSeverity::Warning,
            message: format!("Font size {size}pt is outside the recommended 9-18pt range"),
            remediation: "Use a body font size between 10 and 12pt".to_string(),
        });
    }

    FontReport { score, issues }
}
