//! Page-Limit Enforcer: trims tailored content to fixed per-section budgets.
//!
//! This is deterministic truncation, not pagination. Every step that removes or
//! shortens something records a warning; steps that change nothing stay silent.
//!
//! # Budgets
//! - Bullets per experience by position: 4, 3, 3, 2, then 2 for any further entry
//! - Experiences: 4 most recent (profile order is recency order)
//! - Summary: 300 characters
//! - Skill categories: 3, skills per category: 4
//! - Education: 2, languages: 2, references: 1

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Experience, Profile};
use crate::tailoring::TailoredContent;

// ────────────────────────────────────────────────────────────────────────────
// Budgets
// ────────────────────────────────────────────────────────────────────────────

const BULLET_BUDGET: [usize; 4] = [4, 3, 3, 2];
const DEFAULT_BULLET_BUDGET: usize = 2;
pub const MAX_EXPERIENCES: usize = 4;
pub const MAX_SUMMARY_CHARS: usize = 300;
/// A sentence break is only used when it keeps at least this share of the limit.
const SENTENCE_BREAK_MIN_RATIO: f64 = 0.7;
pub const MAX_SKILL_CATEGORIES: usize = 3;
pub const MAX_SKILLS_PER_CATEGORY: usize = 4;
pub const MAX_EDUCATION: usize = 2;
pub const MAX_LANGUAGES: usize = 2;
pub const MAX_REFERENCES: usize = 1;

/// Rough size of one rendered page.
const BYTES_PER_PAGE: usize = 50 * 1024;
const MAX_ESTIMATED_PAGES: u32 = 3;

/// Bullet budget for the experience at `position`.
pub fn bullet_budget(position: usize) -> usize {
    BULLET_BUDGET
        .get(position)
        .copied()
        .unwrap_or(DEFAULT_BULLET_BUDGET)
}

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

/// Result of fitting content to the page budget. Both halves are derived copies.
///
/// `profile.experiences` mirrors `content.experiences` after trimming, so a renderer
/// reading either one sees the same entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFit {
    pub profile: Profile,
    pub content: TailoredContent,
    pub warnings: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Enforcement
// ────────────────────────────────────────────────────────────────────────────

/// Fits `profile` and `content` to the section budgets. Never fails.
///
/// `max_pages` (at least 1) only shows up in warnings; budgets do not scale with it.
pub fn enforce(profile: &Profile, content: &TailoredContent, max_pages: u32) -> PageFit {
    let max_pages = max_pages.max(1);
    let mut profile = profile.clone();
    let mut content = content.clone();
    let mut warnings = Vec::new();

    // Bullets per experience
    for (position, exp) in content.experiences.iter_mut().enumerate() {
        let budget = bullet_budget(position);
        if exp.bullets.len() <= budget {
            continue;
        }
        let before = exp.bullets.len();
        exp.bullets
            .sort_by(|a, b| content.scores.bullet(&b.id).cmp(&content.scores.bullet(&a.id)));
        exp.bullets.truncate(budget);
        warnings.push(format!(
            "Reduced bullets for \"{}\" from {} to {}",
            experience_label(exp),
            before,
            budget
        ));
    }

    // Experiences
    if content.experiences.len() > MAX_EXPERIENCES {
        let removed = content.experiences.len() - MAX_EXPERIENCES;
        content.experiences.truncate(MAX_EXPERIENCES);
        warnings.push(format!(
            "Removed {} older experience{} to fit {} page{}",
            removed,
            plural(removed),
            max_pages,
            plural(max_pages as usize)
        ));
    }
    profile.experiences = content.experiences.clone();

    let kept: HashSet<_> = content
        .experiences
        .iter()
        .flat_map(|e| e.bullets.iter().map(|b| b.id))
        .collect();
    content.top_bullets.retain(|rb| kept.contains(&rb.bullet.id));

    // Summary
    let summary_len = content.summary.chars().count();
    if summary_len > MAX_SUMMARY_CHARS {
        content.summary = truncate_summary(&content.summary, MAX_SUMMARY_CHARS);
        warnings.push(format!(
            "Shortened summary from {} to {} characters",
            summary_len,
            content.summary.chars().count()
        ));
    }

    // Skills
    if content.skill_categories.len() > MAX_SKILL_CATEGORIES {
        warnings.push(format!(
            "Reduced skill categories from {} to {}",
            content.skill_categories.len(),
            MAX_SKILL_CATEGORIES
        ));
        content.skill_categories.truncate(MAX_SKILL_CATEGORIES);
    }
    for category in &mut content.skill_categories {
        if category.skills.len() > MAX_SKILLS_PER_CATEGORY {
            warnings.push(format!(
                "Reduced skills in \"{}\" from {} to {}",
                category.name,
                category.skills.len(),
                MAX_SKILLS_PER_CATEGORY
            ));
            category.skills.truncate(MAX_SKILLS_PER_CATEGORY);
        }
    }
    profile.skill_categories = content.skill_categories.clone();

    // Remaining profile sections
    trim_section(&mut profile.education, MAX_EDUCATION, "education entries", &mut warnings);
    trim_section(&mut profile.languages, MAX_LANGUAGES, "languages", &mut warnings);
    trim_section(&mut profile.references, MAX_REFERENCES, "references", &mut warnings);

    debug!("Page-limit enforcement produced {} warning(s)", warnings.len());

    PageFit {
        profile,
        content,
        warnings,
    }
}

fn trim_section<T>(items: &mut Vec<T>, max: usize, label: &str, warnings: &mut Vec<String>) {
    if items.len() > max {
        warnings.push(format!("Reduced {} from {} to {}", label, items.len(), max));
        items.truncate(max);
    }
}

fn experience_label(exp: &Experience) -> String {
    if exp.company.trim().is_empty() {
        exp.job_title.clone()
    } else {
        format!("{} at {}", exp.job_title, exp.company)
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Cuts `summary` to at most `limit` characters.
///
/// Breaks after the last `". "` inside the limit when that keeps more than 70% of
/// it; otherwise hard-cuts to `limit - 3` characters and appends `"..."`.
pub fn truncate_summary(summary: &str, limit: usize) -> String {
    if summary.chars().count() <= limit {
        return summary.to_string();
    }

    let head: String = summary.chars().take(limit).collect();
    let threshold = (limit as f64 * SENTENCE_BREAK_MIN_RATIO) as usize;
    if let Some(byte_pos) = head.rfind(". ") {
        let char_pos = head[..byte_pos].chars().count();
        if char_pos > threshold {
            return head[..=byte_pos].to_string();
        }
    }

    let cut: String = summary.chars().take(limit.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

// ────────────────────────────────────────────────────────────────────────────
// Page-count estimate
// ────────────────────────────────────────────────────────────────────────────

/// `ceil(len / 50 KiB)` clamped to 1..=3. A heuristic on byte size only.
pub fn estimate_page_count(document: &[u8]) -> u32 {
    let pages = document.len().div_ceil(BYTES_PER_PAGE) as u32;
    pages.clamp(1, MAX_ESTIMATED_PAGES)
}

/// Warning text when the estimated page count of `document` exceeds `max_pages`.
pub fn page_count_warning(document: &[u8], max_pages: u32) -> Option<String> {
    let max_pages = max_pages.max(1);
    let estimated = estimate_page_count(document);
    (estimated > max_pages).then(|| {
        format!(
            "Document is estimated at {} page{} but the limit is {}",
            estimated,
            plural(estimated as usize),
            max_pages
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bullet, Education, Language, Reference, Skill, SkillCategory};
    use crate::tailoring::{tailor, KeywordMatcher, TailorOptions};
    use crate::models::JobAnalysis;
    use uuid::Uuid;

    fn experience(title: &str, bullets: usize) -> Experience {
        Experience {
            id: Uuid::new_v4(),
            job_title: title.to_string(),
            subtitle: None,
            company: "ACME".to_string(),
            location: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            bullets: (0..bullets)
                .map(|i| Bullet::new("", format!("Task number {i}")))
                .collect(),
        }
    }

    fn skill_category(name: &str, skills: usize) -> SkillCategory {
        SkillCategory {
            id: Uuid::new_v4(),
            name: name.to_string(),
            skills: (0..skills)
                .map(|i| Skill {
                    name: format!("{name} skill {i}"),
                    description: String::new(),
                    keywords: vec![],
                })
                .collect(),
        }
    }

    fn education(n: usize) -> Vec<Education> {
        (0..n)
            .map(|i| Education {
                id: Uuid::new_v4(),
                degree: format!("Degree {i}"),
                institution: "Uni".to_string(),
                location: String::new(),
                start_date: String::new(),
                end_date: String::new(),
                details: String::new(),
            })
            .collect()
    }

    fn big_profile() -> Profile {
        Profile {
            summary: "Engineer. ".repeat(40),
            experiences: (0..6).map(|i| experience(&format!("Role {i}"), 6)).collect(),
            education: education(3),
            skill_categories: (0..5).map(|i| skill_category(&format!("Cat {i}"), 6)).collect(),
            languages: (0..3)
                .map(|i| Language {
                    id: Uuid::new_v4(),
                    name: format!("Lang {i}"),
                    level: String::new(),
                })
                .collect(),
            references: (0..2)
                .map(|i| Reference {
                    id: Uuid::new_v4(),
                    name: format!("Ref {i}"),
                    title: String::new(),
                    company: String::new(),
                    contact: String::new(),
                })
                .collect(),
            ..Default::default()
        }
    }

    fn tailored(profile: &Profile, job: &JobAnalysis) -> TailoredContent {
        tailor(profile, job, TailorOptions::default(), &KeywordMatcher::default())
    }

    #[test]
    fn test_bullet_budget_by_position() {
        assert_eq!(bullet_budget(0), 4);
        assert_eq!(bullet_budget(1), 3);
        assert_eq!(bullet_budget(2), 3);
        assert_eq!(bullet_budget(3), 2);
        assert_eq!(bullet_budget(9), 2);
    }

    #[test]
    fn test_enforce_respects_every_budget() {
        let profile = big_profile();
        let content = tailored(&profile, &JobAnalysis::default());
        let fit = enforce(&profile, &content, 2);

        assert!(fit.content.experiences.len() <= MAX_EXPERIENCES);
        for (i, exp) in fit.content.experiences.iter().enumerate() {
            assert!(exp.bullets.len() <= bullet_budget(i), "experience {i} over budget");
        }
        assert!(fit.content.skill_categories.len() <= MAX_SKILL_CATEGORIES);
        assert!(fit
            .content
            .skill_categories
            .iter()
            .all(|c| c.skills.len() <= MAX_SKILLS_PER_CATEGORY));
        assert!(fit.content.summary.chars().count() <= MAX_SUMMARY_CHARS);
        assert!(fit.profile.education.len() <= MAX_EDUCATION);
        assert!(fit.profile.languages.len() <= MAX_LANGUAGES);
        assert!(fit.profile.references.len() <= MAX_REFERENCES);
        assert_eq!(fit.profile.experiences, fit.content.experiences);
    }

    #[test]
    fn test_one_warning_per_changed_step() {
        let profile = big_profile();
        let content = tailored(&profile, &JobAnalysis::default());
        let fit = enforce(&profile, &content, 2);

        // 6 experiences each trimmed, experiences cut, summary, categories,
        // 3 kept categories with too many skills, education, languages, references
        assert_eq!(fit.warnings.len(), 6 + 1 + 1 + 1 + 3 + 3, "{:#?}", fit.warnings);
        assert!(fit
            .warnings
            .iter()
            .any(|w| w == "Removed 2 older experiences to fit 2 pages"));
    }

    #[test]
    fn test_small_input_is_a_no_op() {
        let profile = Profile {
            summary: "Short summary.".to_string(),
            experiences: vec![experience("Solo", 2)],
            education: education(1),
            skill_categories: vec![skill_category("Rust", 2)],
            ..Default::default()
        };
        let content = tailored(&profile, &JobAnalysis::default());
        let fit = enforce(&profile, &content, 1);
        assert!(fit.warnings.is_empty(), "{:?}", fit.warnings);
        assert_eq!(fit.content, content);
        assert_eq!(fit.profile.education, profile.education);
    }

    #[test]
    fn test_highest_scoring_bullets_survive() {
        let mut profile = Profile {
            experiences: vec![experience("Dev", 0)],
            ..Default::default()
        };
        profile.experiences[0].bullets = vec![
            Bullet::new("", "Wrote docs"),
            Bullet::new("", "Ran meetings"),
            Bullet::new("", "Built Python tools"),
            Bullet::new("", "Filed reports"),
            Bullet::new("", "Planned roadmaps"),
        ];
        let job = JobAnalysis {
            must_have_keywords: vec!["Python".to_string()],
            ..Default::default()
        };
        let content = tailored(&profile, &job);
        let fit = enforce(&profile, &content, 2);
        let bullets = &fit.content.experiences[0].bullets;
        assert_eq!(bullets.len(), 4);
        assert_eq!(bullets[0].description, "Built Python tools");
        assert!(fit
            .content
            .top_bullets
            .iter()
            .all(|rb| bullets.iter().any(|b| b.id == rb.bullet.id)));
    }

    #[test]
    fn test_truncate_summary_prefers_sentence_break() {
        let first = "a".repeat(250);
        let summary = format!("{first}. {}", "b".repeat(100));
        let out = truncate_summary(&summary, 300);
        assert_eq!(out, format!("{first}."));
    }

    #[test]
    fn test_truncate_summary_hard_cut_when_break_too_early() {
        let summary = format!("Intro. {}", "x".repeat(400));
        let out = truncate_summary(&summary, 300);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 300);
    }

    #[test]
    fn test_truncate_summary_counts_chars_not_bytes() {
        let summary = "ü".repeat(310);
        let out = truncate_summary(&summary, 300);
        assert_eq!(out.chars().count(), 300);
    }

    #[test]
    fn test_estimate_page_count() {
        assert_eq!(estimate_page_count(&[]), 1);
        assert_eq!(estimate_page_count(&vec![0u8; 50 * 1024]), 1);
        assert_eq!(estimate_page_count(&vec![0u8; 50 * 1024 + 1]), 2);
        assert_eq!(estimate_page_count(&vec![0u8; 1024 * 1024]), 3);
    }

    #[test]
    fn test_page_count_warning() {
        let doc = vec![0u8; 120 * 1024];
        assert!(page_count_warning(&doc, 3).is_none());
        let warning = page_count_warning(&doc, 2).unwrap();
        assert!(warning.contains("3 pages"), "{warning}");
    }
}
