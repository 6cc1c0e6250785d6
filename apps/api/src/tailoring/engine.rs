//! Content Tailoring Engine: re-ranks and rewrites a profile for one job analysis.
//!
//! Works on a derived copy; the input profile is never touched. Scores live in a
//! side table (`RelevanceScores`) instead of on the entities.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{Bullet, Experience, JobAnalysis, KeywordTier, Profile, SkillCategory};
use crate::tailoring::enhance::enhance_bullet;
use crate::tailoring::matcher::KeywordMatcher;
use crate::tailoring::scorer::{score_bullet, score_skill_category, RelevanceScores};
use crate::tailoring::summary::tailor_summary;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A bullet chosen for the cross-experience highlight list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedBullet {
    pub experience_id: Uuid,
    pub bullet: Bullet,
    pub score: u32,
}

/// Job-specific view of a profile. Ephemeral, recomputed per job analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredContent {
    pub summary: String,
    /// Experiences in profile order, each with its bullets ranked and trimmed.
    pub experiences: Vec<Experience>,
    /// Best bullets across all experiences, highest score first.
    pub top_bullets: Vec<RankedBullet>,
    /// Skill categories, most relevant first.
    pub skill_categories: Vec<SkillCategory>,
    pub scores: RelevanceScores,
    /// Share of distinct job keywords found anywhere in the profile, 0–100.
    pub match_score: u8,
    /// Bullets rewritten by the enhancement stage.
    #[serde(default)]
    pub enhanced_bullets: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TailorOptions {
    /// Insert one missing keyword into matching bullets. Off by default.
    pub enhance_bullets: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Tailoring algorithm
// ────────────────────────────────────────────────────────────────────────────

const MIN_BULLETS_PER_EXPERIENCE: usize = 4;
const MAX_BULLETS_PER_EXPERIENCE: usize = 6;
const TOP_BULLETS: usize = 20;

/// Tailors `profile` to `job`.
///
/// Algorithm:
/// 1. Score every bullet (optionally enhance, then re-score)
/// 2. Per experience: stable sort by score descending, keep `min(6, max(4, n))`
/// 3. Append keyword-group sentences to the summary
/// 4. Stable sort skill categories by relevance descending
/// 5. Collect the top 20 bullets across experiences
/// 6. Compute the overall match score from the untailored profile text
pub fn tailor(
    profile: &Profile,
    job: &JobAnalysis,
    options: TailorOptions,
    matcher: &KeywordMatcher<'_>,
) -> TailoredContent {
    let mut scores = RelevanceScores::default();
    let mut enhanced_bullets = Vec::new();

    // Steps 1–2
    let experiences: Vec<Experience> = profile
        .experiences
        .iter()
        .map(|exp| {
            let mut exp = exp.clone();
            for bullet in &mut exp.bullets {
                let mut score = score_bullet(bullet, job, matcher);
                if options.enhance_bullets {
                    let missing = missing_keywords(bullet, job, matcher);
                    if let Some(keyword) = enhance_bullet(bullet, &missing) {
                        debug!("Enhanced bullet {} with keyword '{}'", bullet.id, keyword);
                        enhanced_bullets.push(bullet.id);
                        score = score_bullet(bullet, job, matcher);
                    }
                }
                scores.bullets.insert(bullet.id, score);
            }
            exp.bullets.sort_by(|a, b| scores.bullet(&b.id).cmp(&scores.bullet(&a.id)));
            let keep = MAX_BULLETS_PER_EXPERIENCE
                .min(MIN_BULLETS_PER_EXPERIENCE.max(exp.bullets.len()));
            exp.bullets.truncate(keep);
            exp
        })
        .collect();

    // Step 3
    let summary = tailor_summary(&profile.summary, &job.all_keywords());

    // Step 4
    let mut skill_categories = profile.skill_categories.clone();
    for category in &skill_categories {
        scores
            .skill_categories
            .insert(category.id, score_skill_category(category, job, matcher));
    }
    skill_categories.sort_by(|a, b| {
        scores
            .skill_category(&b.id)
            .cmp(&scores.skill_category(&a.id))
    });

    // Step 5
    let top_bullets = collect_top_bullets(&experiences, &scores);

    // Step 6
    let match_score = compute_match_score(profile, job, matcher);

    info!(
        "Tailored profile for '{}': match={}%, {} top bullets, {} enhanced",
        job.job_title,
        match_score,
        top_bullets.len(),
        enhanced_bullets.len()
    );

    TailoredContent {
        summary,
        experiences,
        top_bullets,
        skill_categories,
        scores,
        match_score,
        enhanced_bullets,
    }
}

/// Must-have and preferred keywords with no match in the bullet, in tier order.
fn missing_keywords(bullet: &Bullet, job: &JobAnalysis, matcher: &KeywordMatcher<'_>) -> Vec<String> {
    let text = bullet.text();
    [KeywordTier::MustHave, KeywordTier::Preferred]
        .iter()
        .flat_map(|tier| job.keywords(*tier).iter())
        .filter(|kw| matcher.find_matches(&text, std::slice::from_ref(*kw)).is_empty())
        .cloned()
        .collect()
}

fn collect_top_bullets(experiences: &[Experience], scores: &RelevanceScores) -> Vec<RankedBullet> {
    let mut seen = HashSet::new();
    let mut ranked: Vec<RankedBullet> = experiences
        .iter()
        .flat_map(|exp| {
            exp.bullets.iter().map(move |bullet| RankedBullet {
                experience_id: exp.id,
                bullet: bullet.clone(),
                score: scores.bullet(&bullet.id),
            })
        })
        .filter(|rb| seen.insert(rb.bullet.id))
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(TOP_BULLETS);
    ranked
}

/// `round(100 * distinct_matched / total)` over the de-duplicated union of all tiers.
pub fn compute_match_score(profile: &Profile, job: &JobAnalysis, matcher: &KeywordMatcher<'_>) -> u8 {
    let keywords = job.all_keywords();
    if keywords.is_empty() {
        return 0;
    }
    let blob = profile_blob(profile);
    let matched = matcher.matched_keywords(&blob, &keywords).len();
    ((100.0 * matched as f64 / keywords.len() as f64).round() as u8).min(100)
}

/// Summary, bullets, skills (with their keywords) and education as one lowercase blob.
fn profile_blob(profile: &Profile) -> String {
    let mut parts: Vec<String> = vec![profile.summary.clone()];
    parts.extend(profile.all_bullets().map(Bullet::text));
    for category in &profile.skill_categories {
        parts.push(category.name.clone());
        for skill in &category.skills {
            parts.push(format!("{} {}", skill.name, skill.description));
            parts.extend(skill.keywords.iter().cloned());
        }
    }
    parts.extend(profile.education.iter().map(|e| e.text()));
    parts.join(" ").to_lowercase()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
