use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinels accepted as "still ongoing" end dates.
pub const ONGOING_END_DATES: &[&str] = &["Present", "Heute"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileHeader {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub links: Vec<ProfileLink>,
    /// Data URL or storage key of the photo. The renderer decides how to embed it.
    #[serde(default)]
    pub photo: Option<String>,
}

/// A single bullet point under an experience.
///
/// Relevance scores are never stored here: they live in `RelevanceScores`,
/// keyed by `id`, so job-specific data cannot leak into the persisted profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Short free-text tag, e.g. "Backend" or "Leadership".
    #[serde(default)]
    pub category: String,
    pub description: String,
}

impl Bullet {
    pub fn new(category: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.into(),
            description: description.into(),
        }
    }

    /// Category label and description joined into one matchable blob.
    pub fn text(&self) -> String {
        format!("{} {}", self.category, self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub job_title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub bullets: Vec<Bullet>,
}

impl Experience {
    pub fn is_ongoing(&self) -> bool {
        ONGOING_END_DATES
            .iter()
            .any(|s| self.end_date.trim().eq_ignore_ascii_case(s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub details: String,
}

impl Education {
    pub fn text(&self) -> String {
        format!("{} {} {}", self.degree, self.institution, self.details)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    /// Free-form proficiency, e.g. "C1" or "Native".
    #[serde(default)]
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub contact: String,
}

/// The user's professional profile. Persisted as one versioned record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub header: ProfileHeader,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skill_categories: Vec<SkillCategory>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub references: Vec<Reference>,
}

impl Profile {
    /// Replaces every list-entry id with a fresh one.
    ///
    /// Used for imported profiles, whose ids come from an LLM and cannot be trusted
    /// to be unique.
    pub fn reassign_ids(&mut self) {
        for exp in &mut self.experiences {
            exp.id = Uuid::new_v4();
            for bullet in &mut exp.bullets {
                bullet.id = Uuid::new_v4();
            }
        }
        for edu in &mut self.education {
            edu.id = Uuid::new_v4();
        }
        for cat in &mut self.skill_categories {
            cat.id = Uuid::new_v4();
        }
        for lang in &mut self.languages {
            lang.id = Uuid::new_v4();
        }
        for reference in &mut self.references {
            reference.id = Uuid::new_v4();
        }
    }

    /// All bullets across all experiences, in profile order.
    pub fn all_bullets(&self) -> impl Iterator<Item = &Bullet> {
        self.experiences.iter().flat_map(|e| e.bullets.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_ids_are_generated_on_deserialize() {
        let json = r#"{
            "header": {"name": "Ada", "title": "Engineer"},
            "experiences": [{
                "job_title": "Engineer",
                "company": "ACME",
                "bullets": [{"description": "Built things"}, {"description": "Fixed things"}]
            }]
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        let bullets: Vec<_> = profile.all_bullets().collect();
        assert_eq!(bullets.len(), 2);
        assert_ne!(bullets[0].id, bullets[1].id, "generated ids must be unique");
    }

    #[test]
    fn test_ongoing_sentinels() {
        let mut exp = Experience {
            id: Uuid::new_v4(),
            job_title: "Dev".to_string(),
            subtitle: None,
            company: "X".to_string(),
            location: String::new(),
            start_date: "2020".to_string(),
            end_date: "heute".to_string(),
            bullets: vec![],
        };
        assert!(exp.is_ongoing());
        exp.end_date = "2022".to_string();
        assert!(!exp.is_ongoing());
    }

    #[test]
    fn test_reassign_ids_changes_every_id() {
        let mut profile = Profile::default();
        profile.skill_categories.push(SkillCategory {
            id: Uuid::nil(),
            name: "Languages".to_string(),
            skills: vec![],
        });
        profile.reassign_ids();
        assert_ne!(profile.skill_categories[0].id, Uuid::nil());
    }

    #[test]
    fn test_bullet_text_joins_category_and_description() {
        let bullet = Bullet::new("Backend", "Built Python services");
        assert_eq!(bullet.text(), "Backend Built Python services");
    }
}
