pub mod analyzer;
pub mod cache;
pub mod client;
pub mod handlers;
pub mod prompts;
pub mod rate_limiter;

pub use analyzer::{AnalyzerError, JobAnalyzer, LlmJobAnalyzer};
pub use client::{AnalyzerStats, JobAnalyzerClient};
