// Keyword-driven tailoring: matcher → scorer → engine.
// Everything here is pure and synchronous; only `handlers` touches app state.

pub mod engine;
pub mod enhance;
pub mod handlers;
pub mod matcher;
pub mod scorer;
pub mod summary;
pub mod synonyms;

pub use engine::{tailor, RankedBullet, TailorOptions, TailoredContent};
pub use matcher::{KeywordMatch, KeywordMatcher, MatchKind};
pub use scorer::RelevanceScores;
