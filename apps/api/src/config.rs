use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if a set variable cannot be parsed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Default LLM key. Requests may bring their own.
    pub anthropic_api_key: Option<String>,
    /// Profiles go to Redis when set, else to `profile_path`.
    pub redis_url: Option<String>,
    pub profile_path: String,
    pub profile_quota_bytes: usize,
    pub analysis_cache_ttl: Duration,
    pub analyzer_min_interval: Duration,
    pub analyzer_timeout: Duration,
    pub renderer_url: Option<String>,
    pub ats_scoring_url: Option<String>,
    pub max_pages: u32,
    pub enable_bullet_enhancement: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            redis_url: optional_env("REDIS_URL"),
            profile_path: std::env::var("PROFILE_PATH")
                .unwrap_or_else(|_| "data/profile.json".to_string()),
            profile_quota_bytes: parse_env("PROFILE_QUOTA_BYTES", 5 * 1024 * 1024)?,
            analysis_cache_ttl: Duration::from_secs(parse_env("ANALYSIS_CACHE_TTL_SECS", 1800)?),
            analyzer_min_interval: Duration::from_millis(parse_env(
                "ANALYZER_MIN_INTERVAL_MS",
                1000,
            )?),
            analyzer_timeout: Duration::from_secs(parse_env("ANALYZER_TIMEOUT_SECS", 60)?),
            renderer_url: optional_env("RENDERER_URL"),
            ats_scoring_url: optional_env("ATS_SCORING_URL"),
            max_pages: parse_env("MAX_PAGES", 2)?,
            enable_bullet_enhancement: parse_env("ENABLE_BULLET_ENHANCEMENT", false)?,
        })
    }
}

/// Set and non-blank, else `None`.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
