use serde::{Deserialize, Serialize};

/// Which language(s) the posting asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageRequirement {
    German,
    #[default]
    English,
    Both,
}

/// Keyword priority tier. Drives bullet scoring weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordTier {
    MustHave,
    Preferred,
    NiceToHave,
}

impl KeywordTier {
    pub const ALL: [KeywordTier; 3] = [
        KeywordTier::MustHave,
        KeywordTier::Preferred,
        KeywordTier::NiceToHave,
    ];

    /// Points per full-confidence bullet match.
    pub fn weight(self) -> f64 {
        match self {
            KeywordTier::MustHave => 10.0,
            KeywordTier::Preferred => 5.0,
            KeywordTier::NiceToHave => 2.0,
        }
    }
}

/// Structured output of the job analyzer. Field names follow the analyzer's JSON schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAnalysis {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub must_have_keywords: Vec<String>,
    #[serde(default)]
    pub preferred_keywords: Vec<String>,
    #[serde(default)]
    pub nice_to_have_keywords: Vec<String>,
    #[serde(default)]
    pub language_requirement: LanguageRequirement,
}

impl JobAnalysis {
    pub fn keywords(&self, tier: KeywordTier) -> &[String] {
        match tier {
            KeywordTier::MustHave => &self.must_have_keywords,
            KeywordTier::Preferred => &self.preferred_keywords,
            KeywordTier::NiceToHave => &self.nice_to_have_keywords,
        }
    }

    /// All keywords in tier order (must-have first), de-duplicated case-insensitively.
    /// The first spelling seen wins.
    pub fn all_keywords(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        KeywordTier::ALL
            .iter()
            .flat_map(|tier| self.keywords(*tier).iter())
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .filter(|k| seen.insert(k.to_lowercase()))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_analysis_deserializes_analyzer_schema() {
        let json = r#"{
            "jobTitle": "ML Engineer",
            "companyName": "ACME",
            "mustHaveKeywords": ["Python", "GPU"],
            "preferredKeywords": ["Docker"],
            "niceToHaveKeywords": ["AWS"],
            "languageRequirement": "both"
        }"#;
        let analysis: JobAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.job_title, "ML Engineer");
        assert_eq!(analysis.must_have_keywords, vec!["Python", "GPU"]);
        assert_eq!(analysis.language_requirement, LanguageRequirement::Both);
    }

    #[test]
    fn test_all_keywords_dedupes_across_tiers() {
        let analysis = JobAnalysis {
            must_have_keywords: vec!["Python".to_string()],
            preferred_keywords: vec!["python".to_string(), "Docker".to_string()],
            nice_to_have_keywords: vec!["  ".to_string()],
            ..Default::default()
        };
        assert_eq!(analysis.all_keywords(), vec!["Python", "Docker"]);
    }

    #[test]
    fn test_tier_weights_are_strictly_ordered() {
        assert!(KeywordTier::MustHave.weight() > KeywordTier::Preferred.weight());
        assert!(KeywordTier::Preferred.weight() > KeywordTier::NiceToHave.weight());
    }
}
