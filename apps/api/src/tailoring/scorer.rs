//! Bullet and skill-category relevance scoring against a job analysis.
//!
//! Bullets are scored per tier: `round(tier_weight * confidence)` summed over every
//! match entry. Skill categories use flat points regardless of tier. Scores are not
//! capped or normalised; downstream ranking relies on this raw scale.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Bullet, JobAnalysis, KeywordTier, SkillCategory};
use crate::tailoring::matcher::KeywordMatcher;

/// Points per match entry of a job keyword in the category name.
pub const CATEGORY_NAME_POINTS: u32 = 5;
/// Points per match entry of a job keyword in a skill's name + description.
pub const SKILL_TEXT_POINTS: u32 = 3;
/// Points per (skill keyword, job keyword) pair overlapping as substrings.
pub const SKILL_KEYWORD_POINTS: u32 = 2;

/// Per-job relevance scores, keyed by entity id.
///
/// Kept apart from the profile so job-specific numbers are never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelevanceScores {
    pub bullets: HashMap<Uuid, u32>,
    pub skill_categories: HashMap<Uuid, u32>,
}

impl RelevanceScores {
    pub fn bullet(&self, id: &Uuid) -> u32 {
        self.bullets.get(id).copied().unwrap_or(0)
    }

    pub fn skill_category(&self, id: &Uuid) -> u32 {
        self.skill_categories.get(id).copied().unwrap_or(0)
    }
}

/// Scores arbitrary bullet text against all three keyword tiers.
pub fn score_text(text: &str, job: &JobAnalysis, matcher: &KeywordMatcher<'_>) -> u32 {
    KeywordTier::ALL
        .iter()
        .map(|tier| {
            let weight = tier.weight();
            matcher
                .find_matches(text, job.keywords(*tier))
                .iter()
                .map(|m| (weight * m.confidence).round() as u32)
                .sum::<u32>()
        })
        .sum()
}

pub fn score_bullet(bullet: &Bullet, job: &JobAnalysis, matcher: &KeywordMatcher<'_>) -> u32 {
    score_text(&bullet.text(), job, matcher)
}

pub fn score_skill_category(
    category: &SkillCategory,
    job: &JobAnalysis,
    matcher: &KeywordMatcher<'_>,
) -> u32 {
    let keywords = job.all_keywords();
    if keywords.is_empty() {
        return 0;
    }

    let name_hits = matcher.find_matches(&category.name, &keywords).len() as u32;
    let mut score = name_hits * CATEGORY_NAME_POINTS;

    let lowered: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    for skill in &category.skills {
        let text = format!("{} {}", skill.name, skill.description);
        score += matcher.find_matches(&text, &keywords).len() as u32 * SKILL_TEXT_POINTS;

        for skill_kw in &skill.keywords {
            let skill_kw = skill_kw.trim().to_lowercase();
            if skill_kw.is_empty() {
                continue;
            }
            let overlaps = lowered
                .iter()
                .filter(|job_kw| skill_kw.contains(job_kw.as_str()) || job_kw.contains(&skill_kw))
                .count() as u32;
            score += overlaps * SKILL_KEYWORD_POINTS;
        }
    }
    score
}
