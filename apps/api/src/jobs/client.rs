//! Job analyzer client: cache lookup, then the rate limiter, then a time-bounded call
//! to the underlying analyzer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::jobs::analyzer::{validate_job_description, AnalyzerError, JobAnalyzer};
use crate::jobs::cache::AnalysisCache;
use crate::jobs::rate_limiter::RateLimiter;
use crate::models::JobAnalysis;

/// Counters exposed on the health endpoint.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct AnalyzerStats {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub failures: u64,
}

pub struct JobAnalyzerClient {
    inner: Arc<dyn JobAnalyzer>,
    cache: AnalysisCache,
    limiter: RateLimiter,
    timeout: Duration,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    failures: AtomicU64,
}

impl JobAnalyzerClient {
    pub fn new(
        inner: Arc<dyn JobAnalyzer>,
        cache_ttl: Duration,
        min_interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            inner,
            cache: AnalysisCache::new(cache_ttl),
            limiter: RateLimiter::new(min_interval),
            timeout,
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    pub fn stats(&self) -> AnalyzerStats {
        AnalyzerStats {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }
}

#[async_trait]
impl JobAnalyzer for JobAnalyzerClient {
    /// The timeout covers the wait in the rate-limiter queue as well as the call.
    /// Failed analyses are never cached.
    async fn analyze(
        &self,
        description: &str,
        api_key: Option<&str>,
    ) -> Result<JobAnalysis, AnalyzerError> {
        let description = validate_job_description(description)?;

        if let Some(hit) = self.cache.get(description) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            debug!("Job analysis cache hit for '{}'", hit.job_title);
            return Ok(hit);
        }
        self.cache_misses.fetch_add(1, Ordering::Relaxed);

        let call = self.limiter.run(self.inner.analyze(description, api_key));
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(AnalyzerError::Timeout),
        };

        match result {
            Ok(analysis) => {
                self.cache.insert(description, analysis.clone());
                info!("Cached job analysis for '{}'", analysis.job_title);
                Ok(analysis)
            }
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                warn!("Job analysis failed (retryable: {}): {}", e.is_retryable(), e);
                Err(e)
            }
        }
    }
}
