pub mod job;
pub mod profile;

pub use job::{JobAnalysis, KeywordTier, LanguageRequirement};
pub use profile::{
    Bullet, Education, Experience, Language, Profile, ProfileHeader, Reference, Skill,
    SkillCategory,
};
