//! Optional bullet enhancement: inserts at most one missing job keyword into a
//! bullet description through a fixed context → insertion rule table.
//!
//! Off by default (`ENABLE_BULLET_ENHANCEMENT`). Scoring never depends on it; the
//! engine simply re-scores a bullet after a rewrite.

use crate::models::Bullet;

struct EnhancementRule {
    /// Word that must already appear in the description (lowercase).
    context: &'static str,
    /// Keyword fragments this rule knows how to introduce (lowercase).
    triggers: &'static [&'static str],
    /// Replacement for the context word; `{keyword}` is the missing keyword.
    template: &'static str,
}

#[rustfmt::skip]
const RULES: &[EnhancementRule] = &[
    EnhancementRule { context: "python", triggers: &["gpu", "cuda"], template: "Python with {keyword} acceleration" },
    EnhancementRule { context: "python", triggers: &["pytorch", "tensorflow", "numpy", "pandas"], template: "Python ({keyword})" },
    EnhancementRule { context: "system", triggers: &["distributed", "scalable", "real-time", "embedded"], template: "{keyword} system" },
    EnhancementRule { context: "performance", triggers: &["optimization", "latency", "throughput", "profiling"], template: "performance {keyword}" },
    EnhancementRule { context: "deployed", triggers: &["docker", "kubernetes", "aws", "azure", "gcp"], template: "deployed on {keyword}" },
    EnhancementRule { context: "pipeline", triggers: &["ci/cd", "airflow", "kafka", "spark"], template: "{keyword} pipeline" },
];

/// Rewrites `bullet` in place with the first applicable rule. Returns the inserted
/// keyword, or `None` when nothing changed.
///
/// `missing` must list job keywords that do not already match the bullet, in
/// priority order.
pub fn enhance_bullet(bullet: &mut Bullet, missing: &[String]) -> Option<String> {
    for keyword in missing {
        let kw_lower = keyword.to_lowercase();
        for rule in RULES {
            if !rule.triggers.iter().any(|t| kw_lower.contains(t)) {
                continue;
            }
            if let Some(pos) = find_word(&bullet.description, rule.context) {
                let replacement = rule.template.replace("{keyword}", keyword);
                let end = pos + rule.context.len();
                bullet.description.replace_range(pos..end, &replacement);
                return Some(keyword.clone());
            }
        }
    }
    None
}

/// Byte offset of the first case-insensitive whole-word occurrence of `word`.
///
/// `word` must be ASCII so offsets in the lowered copy line up with the original.
fn find_word(text: &str, word: &str) -> Option<usize> {
    let lowered = text.to_ascii_lowercase();
    let bytes = lowered.as_bytes();
    let mut from = 0;
    while let Some(rel) = lowered[from..].find(word) {
        let start = from + rel;
        let end = start + word.len();
        let before_ok = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
        let after_ok = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
        if before_ok && after_ok {
            return Some(start);
        }
        from = end;
    }
    None
}
