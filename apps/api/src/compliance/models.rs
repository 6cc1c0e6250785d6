use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Issues
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Critical,
    Warning,
    Suggestion,
}

impl IssueSeverity {
    pub fn label(self) -> &'static str {
        match self {
            IssueSeverity::Critical => "CRITICAL",
            IssueSeverity::Warning => "WARNING",
            IssueSeverity::Suggestion => "SUGGESTION",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Font,
    Structure,
    Content,
    Format,
    Keywords,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceIssue {
    pub severity: IssueSeverity,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub message: String,
    /// What goes wrong in an ATS because of this.
    pub impact: String,
    /// What the user can do about it.
    pub solution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ComplianceIssue {
    pub fn new(
        severity: IssueSeverity,
        issue_type: IssueType,
        message: impl Into<String>,
        impact: impl Into<String>,
        solution: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            issue_type,
            message: message.into(),
            impact: impact.into(),
            solution: solution.into(),
            location: None,
        }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Score
// ────────────────────────────────────────────────────────────────────────────

/// The five sub-factors, in breakdown order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceFactor {
    TextExtraction,
    FontCompliance,
    StructureCompliance,
    KeywordOptimization,
    FormatCompliance,
}

impl ComplianceFactor {
    pub const ALL: [ComplianceFactor; 5] = [
        ComplianceFactor::TextExtraction,
        ComplianceFactor::FontCompliance,
        ComplianceFactor::StructureCompliance,
        ComplianceFactor::KeywordOptimization,
        ComplianceFactor::FormatCompliance,
    ];

    pub fn weight(self) -> f64 {
        match self {
            ComplianceFactor::TextExtraction => 0.30,
            ComplianceFactor::FontCompliance => 0.25,
            ComplianceFactor::StructureCompliance => 0.20,
            ComplianceFactor::KeywordOptimization => 0.15,
            ComplianceFactor::FormatCompliance => 0.10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComplianceFactor::TextExtraction => "Text Extraction",
            ComplianceFactor::FontCompliance => "Font Compliance",
            ComplianceFactor::StructureCompliance => "Structure Compliance",
            ComplianceFactor::KeywordOptimization => "Keyword Optimization",
            ComplianceFactor::FormatCompliance => "Format Compliance",
        }
    }
}

/// Sub-scores, each 0–100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub text_extraction: u8,
    pub font_compliance: u8,
    pub structure_compliance: u8,
    pub keyword_optimization: u8,
    pub format_compliance: u8,
}

impl ScoreBreakdown {
    pub fn get(&self, factor: ComplianceFactor) -> u8 {
        match factor {
            ComplianceFactor::TextExtraction => self.text_extraction,
            ComplianceFactor::FontCompliance => self.font_compliance,
            ComplianceFactor::StructureCompliance => self.structure_compliance,
            ComplianceFactor::KeywordOptimization => self.keyword_optimization,
            ComplianceFactor::FormatCompliance => self.format_compliance,
        }
    }

    /// Lowest sub-score; the first factor in breakdown order wins ties.
    pub fn weakest(&self) -> (ComplianceFactor, u8) {
        ComplianceFactor::ALL
            .iter()
            .map(|f| (*f, self.get(*f)))
            .fold((ComplianceFactor::TextExtraction, u8::MAX), |best, cur| {
                if cur.1 < best.1 {
                    cur
                } else {
                    best
                }
            })
    }

    /// Weighted composite, rounded and clamped to 0–100.
    pub fn weighted_total(&self) -> u8 {
        let total: f64 = ComplianceFactor::ALL
            .iter()
            .map(|f| f.weight() * f64::from(self.get(*f)))
            .sum();
        total.round().clamp(0.0, 100.0) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceScore {
    pub overall: u8,
    pub breakdown: ScoreBreakdown,
    pub issues: Vec<ComplianceIssue>,
    pub recommendations: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Collaborator reports
// ────────────────────────────────────────────────────────────────────────────

/// Output of a text-extraction ("copy-paste") simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub text: String,
    pub word_count: usize,
    pub char_count: usize,
    /// Share of expected characters recovered, 0–1.
    pub extraction_rate: f64,
    pub success: bool,
    pub garbled: bool,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontIssueSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontIssue {
    pub severity: FontIssueSeverity,
    pub message: String,
    pub remediation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontReport {
    pub score: u8,
    pub issues: Vec<FontIssue>,
}
