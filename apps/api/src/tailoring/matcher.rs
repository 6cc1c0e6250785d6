//! Keyword Matcher: synonym-aware, confidence-weighted matching of free text
//! against a keyword list.
//!
//! Rules per keyword, all case-insensitive:
//! - 1.0  the keyword itself occurs in the text
//! - 0.8  a synonym of the keyword occurs in the text
//! - 0.7  a head term that lists the keyword as its synonym occurs in the text
//! - 0.6  a token of the text is a substring of the keyword or vice versa
//!        (both longer than 3 characters, only when the keyword is not already an exact hit)
//!
//! Each rule contributes at most one entry per keyword; the list is not collapsed.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::tailoring::synonyms::SynonymTable;

/// Tokens and keywords must be longer than this for the partial rule.
const PARTIAL_MIN_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Synonym,
    ReverseSynonym,
    Partial,
}

impl MatchKind {
    pub fn confidence(self) -> f64 {
        match self {
            MatchKind::Exact => 1.0,
            MatchKind::Synonym => 0.8,
            MatchKind::ReverseSynonym => 0.7,
            MatchKind::Partial => 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    /// The keyword as supplied by the caller.
    pub keyword: String,
    pub confidence: f64,
    /// The text fragment that triggered the match (lowercase).
    pub matched_term: String,
    pub kind: MatchKind,
}

/// Pure matcher over a synonym table. Cheap to copy.
#[derive(Debug, Clone, Copy)]
pub struct KeywordMatcher<'t> {
    synonyms: &'t SynonymTable,
}

impl Default for KeywordMatcher<'static> {
    fn default() -> Self {
        Self::new(SynonymTable::builtin())
    }
}

impl<'t> KeywordMatcher<'t> {
    pub fn new(synonyms: &'t SynonymTable) -> Self {
        Self { synonyms }
    }

    /// Returns every match of `keywords` in `text`, uncollapsed, in keyword order.
    pub fn find_matches<S: AsRef<str>>(&self, text: &str, keywords: &[S]) -> Vec<KeywordMatch> {
        let haystack = text.to_lowercase();
        let tokens: Vec<&str> = haystack
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|t| t.chars().count() > PARTIAL_MIN_LEN)
            .collect();

        let mut matches = Vec::new();
        for keyword in keywords {
            let original = keyword.as_ref().trim();
            if original.is_empty() {
                continue;
            }
            let needle = original.to_lowercase();
            let push = |matches: &mut Vec<KeywordMatch>, kind: MatchKind, term: &str| {
                matches.push(KeywordMatch {
                    keyword: original.to_string(),
                    confidence: kind.confidence(),
                    matched_term: term.to_string(),
                    kind,
                });
            };

            let exact = haystack.contains(&needle);
            if exact {
                push(&mut matches, MatchKind::Exact, &needle);
            }

            if let Some(term) = self
                .synonyms
                .synonyms_of(&needle)
                .iter()
                .find(|s| haystack.contains(s.as_str()))
            {
                push(&mut matches, MatchKind::Synonym, term);
            }

            if let Some(head) = self
                .synonyms
                .heads_listing(&needle)
                .iter()
                .find(|h| haystack.contains(h.as_str()))
            {
                push(&mut matches, MatchKind::ReverseSynonym, head);
            }

            if !exact && needle.chars().count() > PARTIAL_MIN_LEN {
                if let Some(token) = tokens
                    .iter()
                    .find(|t| needle.contains(**t) || t.contains(needle.as_str()))
                {
                    push(&mut matches, MatchKind::Partial, token);
                }
            }
        }
        matches
    }

    /// Highest confidence per keyword (lowercased), for callers that only need the max.
    pub fn best_confidence<S: AsRef<str>>(&self, text: &str, keywords: &[S]) -> HashMap<String, f64> {
        let mut best: HashMap<String, f64> = HashMap::new();
        for m in self.find_matches(text, keywords) {
            let slot = best.entry(m.keyword.to_lowercase()).or_insert(0.0);
            if m.confidence > *slot {
                *slot = m.confidence;
            }
        }
        best
    }

    /// Distinct keywords (lowercased) with at least one match of any kind.
    pub fn matched_keywords<S: AsRef<str>>(&self, text: &str, keywords: &[S]) -> HashSet<String> {
        self.find_matches(text, keywords)
            .into_iter()
            .map(|m| m.keyword.to_lowercase())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> KeywordMatcher<'static> {
        KeywordMatcher::default()
    }

    fn kinds_for(matches: &[KeywordMatch], keyword: &str) -> Vec<MatchKind> {
        matches
            .iter()
            .filter(|m| m.keyword == keyword)
            .map(|m| m.kind)
            .collect()
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let matches = matcher().find_matches("Built PYTHON services", &["python"]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].kind, MatchKind::Exact);
        assert_eq!(matches[0].confidence, 1.0);
    }

    #[test]
    fn test_synonym_match_scores_0_8() {
        let matches = matcher().find_matches("Wrote CUDA kernels for inference", &["GPU"]);
        assert_eq!(kinds_for(&matches, "GPU"), vec![MatchKind::Synonym]);
        assert_eq!(matches[0].matched_term, "cuda");
        assert!((matches[0].confidence - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reverse_synonym_match_scores_0_7() {
        // "cuda" is listed under "gpu"; text mentions only the head term.
        let matches = matcher().find_matches("Optimised GPU workloads", &["CUDA"]);
        let kinds = kinds_for(&matches, "CUDA");
        assert!(kinds.contains(&MatchKind::ReverseSynonym), "got {kinds:?}");
        let reverse = matches
            .iter()
            .find(|m| m.kind == MatchKind::ReverseSynonym)
            .unwrap();
        assert_eq!(reverse.matched_term, "gpu");
        assert!((reverse.confidence - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_token_match_scores_0_6() {
        let matches = matcher().find_matches("Deployed microservice architecture", &["microservices"]);
        assert_eq!(kinds_for(&matches, "microservices"), vec![MatchKind::Partial]);
        assert_eq!(matches[0].matched_term, "microservice");
    }

    #[test]
    fn test_partial_rule_ignores_short_words() {
        // "it" must not partially match "IT security"; "data" (4 chars) is long enough.
        let matches = matcher().find_matches("it is what it is", &["IT security"]);
        assert!(matches.is_empty(), "short tokens must not trigger partial matches");

        let short_keyword = matcher().find_matches("Kubernetes operators", &["k8"]);
        assert!(short_keyword.is_empty());
    }

    #[test]
    fn test_partial_rule_skipped_when_exact() {
        let matches = matcher().find_matches("Built Python services", &["Python"]);
        assert_eq!(kinds_for(&matches, "Python"), vec![MatchKind::Exact]);
    }

    #[test]
    fn test_multiple_tiers_for_one_keyword_are_kept() {
        // "docker" exact plus synonym "container" in the same text.
        let matches = matcher().find_matches("Docker container images", &["Docker"]);
        let kinds = kinds_for(&matches, "Docker");
        assert_eq!(kinds, vec![MatchKind::Exact, MatchKind::Synonym]);
    }

    #[test]
    fn test_no_matches_for_unrelated_text() {
        let matches = matcher().find_matches("Managed a bakery", &["Kubernetes", "AWS"]);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_empty_keywords_yield_nothing() {
        let none: [&str; 0] = [];
        assert!(matcher().find_matches("anything", &none).is_empty());
        assert!(matcher().find_matches("anything", &["", "   "]).is_empty());
    }

    #[test]
    fn test_best_confidence_keeps_max() {
        let best = matcher().best_confidence("Docker container images", &["Docker"]);
        assert_eq!(best.get("docker"), Some(&1.0));
    }

    #[test]
    fn test_matched_keywords_are_distinct() {
        let set = matcher().matched_keywords("Docker container", &["Docker", "docker"]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_custom_table() {
        let table = SynonymTable::from_pairs([("rust", ["ferris"])]);
        let matcher = KeywordMatcher::new(&table);
        let matches = matcher.find_matches("Ferris fan", &["Rust"]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].kind, MatchKind::Synonym);
    }

    #[test]
    fn test_deterministic() {
        let text = "Python, Docker and CUDA on AWS";
        let keywords = ["GPU", "Python", "cloud"];
        assert_eq!(
            matcher().find_matches(text, &keywords),
            matcher().find_matches(text, &keywords)
        );
    }
}
