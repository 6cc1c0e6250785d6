use std::sync::Arc;

use crate::compliance::ComplianceScorer;
use crate::config::Config;
use crate::documents::DocumentRenderer;
use crate::jobs::JobAnalyzerClient;
use crate::llm_client::LlmClient;
use crate::profile::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Used directly only by CV import; job analysis goes through `analyzer`.
    pub llm: LlmClient,
    /// Cached, rate-limited, time-bounded job analyzer.
    pub analyzer: Arc<JobAnalyzerClient>,
    /// File store by default, Redis when `REDIS_URL` is set.
    pub profiles: Arc<dyn ProfileStore>,
    pub renderer: Arc<dyn DocumentRenderer>,
    pub compliance: ComplianceScorer,
}
