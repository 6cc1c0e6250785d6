//! Summary rewriting: appends up to three sentences built from job keywords that
//! the original summary does not yet mention.

use serde::{Deserialize, Serialize};

const MAX_EXTRA_SENTENCES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordGroup {
    Technical,
    Optimization,
    Infrastructure,
    Models,
}

struct GroupSpec {
    group: KeywordGroup,
    vocabulary: &'static [&'static str],
    max_keywords: usize,
    template: &'static str,
}

/// Fixed order of evaluation. A keyword joins the first group whose vocabulary
/// contains one of its terms.
#[rustfmt::skip]
const GROUPS: &[GroupSpec] = &[
    GroupSpec {
        group: KeywordGroup::Technical,
        vocabulary: &["python", "c++", "java", "rust", "golang", "javascript", "typescript",
                      "sql", "cuda", "gpu", "api", "linux", "scala", "programming"],
        max_keywords: 3,
        template: "Proficient in {keywords}.",
    },
    GroupSpec {
        group: KeywordGroup::Optimization,
        vocabulary: &["optimization", "optimisation", "performance", "latency", "throughput",
                      "profiling", "parallel", "scalab", "efficien", "benchmark"],
        max_keywords: 2,
        template: "Experienced in {keywords} for high-performance systems.",
    },
    GroupSpec {
        group: KeywordGroup::Infrastructure,
        vocabulary: &["docker", "kubernetes", "aws", "azure", "gcp", "cloud", "ci/cd",
                      "devops", "terraform", "infrastructure", "deployment", "mlops"],
        max_keywords: 2,
        template: "Skilled with {keywords} for reliable deployment.",
    },
    GroupSpec {
        group: KeywordGroup::Models,
        vocabulary: &["machine learning", "deep learning", "llm", "model", "neural", "pytorch",
                      "tensorflow", "nlp", "computer vision", "transformer", "inference"],
        max_keywords: 2,
        template: "Hands-on experience with {keywords}.",
    },
];

/// Which group a keyword belongs to, if any.
pub fn classify(keyword: &str) -> Option<KeywordGroup> {
    let lower = keyword.to_lowercase();
    GROUPS
        .iter()
        .find(|g| g.vocabulary.iter().any(|term| lower.contains(term)))
        .map(|g| g.group)
}

/// Returns `summary` with up to three appended keyword sentences.
///
/// `keywords` must be in priority order (must-have first) and de-duplicated; only
/// keywords absent from the original summary are used.
pub fn tailor_summary(summary: &str, keywords: &[String]) -> String {
    let summary_lower = summary.to_lowercase();
    let unmatched: Vec<&String> = keywords
        .iter()
        .filter(|k| !summary_lower.contains(&k.to_lowercase()))
        .collect();

    let mut sentences = Vec::new();
    for spec in GROUPS {
        if sentences.len() == MAX_EXTRA_SENTENCES {
            break;
        }
        let picked: Vec<&str> = unmatched
            .iter()
            .filter(|k| classify(k) == Some(spec.group))
            .take(spec.max_keywords)
            .map(|k| k.as_str())
            .collect();
        if picked.is_empty() {
            continue;
        }
        sentences.push(spec.template.replace("{keywords}", &picked.join(", ")));
    }

    if sentences.is_empty() {
        return summary.to_string();
    }

    let base = summary.trim_end();
    if base.is_empty() {
        sentences.join(" ")
    } else {
        format!("{} {}", base, sentences.join(" "))
    }
}
