//! Time-bounded cache of job analyses keyed by a SHA-256 of the description.
//!
//! Uses `tokio::time::Instant` so paused-clock tests can step past the TTL.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::time::Instant;

use crate::models::JobAnalysis;

#[derive(Debug, Clone)]
struct CachedAnalysis {
    analysis: JobAnalysis,
    stored_at: Instant,
}

#[derive(Debug)]
pub struct AnalysisCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedAnalysis>>,
}

/// Hex SHA-256 of the trimmed description.
pub fn cache_key(description: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(description.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

impl AnalysisCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fresh entry for `description`, if any. Expired entries are evicted on read.
    pub fn get(&self, description: &str) -> Option<JobAnalysis> {
        let key = cache_key(description);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(&key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.analysis.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, description: &str, analysis: JobAnalysis) {
        let entry = CachedAnalysis {
            analysis,
            stored_at: Instant::now(),
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(cache_key(description), entry);
    }

    /// Drops every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, e| e.stored_at.elapsed() < self.ttl);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
