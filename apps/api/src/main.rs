mod compliance;
mod config;
mod documents;
mod errors;
mod jobs;
mod layout;
mod llm_client;
mod models;
mod profile;
mod routes;
mod state;
mod tailoring;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::compliance::ats_service::{AtsScoringService, HttpAtsScoringService};
use crate::compliance::extraction::DocumentTextExtractor;
use crate::compliance::font::StandardFontValidator;
use crate::compliance::ComplianceScorer;
use crate::config::Config;
use crate::documents::HttpDocumentRenderer;
use crate::jobs::{JobAnalyzerClient, LlmJobAnalyzer};
use crate::llm_client::LlmClient;
use crate::profile::{FileProfileStore, ProfileStore, RedisProfileStore};
use crate::routes::build_router;
use crate::state::AppState;

const ATS_SCORING_TIMEOUT: Duration = Duration::from_secs(30);
const MIN_CACHE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!(
        "LLM client initialized (model: {}, default key: {})",
        llm_client::MODEL,
        llm.has_default_key()
    );

    // Job analyzer: cache → rate limiter → timeout → LLM
    let analyzer = Arc::new(JobAnalyzerClient::new(
        Arc::new(LlmJobAnalyzer::new(llm.clone())),
        config.analysis_cache_ttl,
        config.analyzer_min_interval,
        config.analyzer_timeout,
    ));
    spawn_cache_sweeper(analyzer.clone(), config.analysis_cache_ttl);
    info!(
        "Job analyzer initialized (cache TTL {}s, min interval {}ms)",
        config.analysis_cache_ttl.as_secs(),
        config.analyzer_min_interval.as_millis()
    );

    // Initialize profile storage
    let profiles: Arc<dyn ProfileStore> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!("Profile store: Redis");
            Arc::new(RedisProfileStore::new(client, config.profile_quota_bytes))
        }
        None => {
            info!("Profile store: file {}", config.profile_path);
            Arc::new(FileProfileStore::new(
                &config.profile_path,
                config.profile_quota_bytes,
            ))
        }
    };

    // Initialize renderer and compliance validators
    let renderer = HttpDocumentRenderer::new(config.renderer_url.clone());
    if !renderer.is_configured() {
        info!("RENDERER_URL not set; document generation is disabled");
    }
    let ats_service = config.ats_scoring_url.clone().map(|url| {
        info!("External ATS scoring enabled");
        Arc::new(HttpAtsScoringService::new(url, ATS_SCORING_TIMEOUT)) as Arc<dyn AtsScoringService>
    });
    let compliance = ComplianceScorer::new(
        Arc::new(DocumentTextExtractor),
        Arc::new(StandardFontValidator),
        ats_service,
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        llm,
        analyzer,
        profiles,
        renderer: Arc::new(renderer),
        compliance,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drops expired job analyses so the cache cannot grow without bound.
fn spawn_cache_sweeper(analyzer: Arc<JobAnalyzerClient>, ttl: Duration) {
    let period = ttl.max(MIN_CACHE_SWEEP_INTERVAL);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let purged = analyzer.cache().purge_expired();
            if purged > 0 {
                debug!("Purged {} expired job analyses", purged);
            }
        }
    });
}
