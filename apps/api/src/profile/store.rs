//! Versioned single-record profile persistence.
//!
//! The stored record is `{version, lastUpdated, profile}` under one fixed key. Reads
//! never fail on bad data: a missing, corrupt or wrong-version record loads as `None`.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::Profile;

pub const STORAGE_VERSION: u32 = 1;
pub const PROFILE_KEY: &str = "cv-tailor:profile";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Profile is {size} bytes, over the {quota} byte storage quota")]
    QuotaExceeded { size: usize, quota: usize },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not serialize profile: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn remediation(&self) -> &'static str {
        match self {
            StorageError::QuotaExceeded { .. } => {
                "Free up space: remove the photo or use a smaller file, then save again."
            }
            StorageError::Io(_) | StorageError::Backend(_) => {
                "Saving failed. Try again in a moment."
            }
            StorageError::Serialize(_) => "The profile contains data that cannot be saved.",
        }
    }
}

impl From<redis::RedisError> for StorageError {
    fn from(err: redis::RedisError) -> Self {
        StorageError::Backend(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEnvelope {
    pub version: u32,
    pub last_updated: DateTime<Utc>,
    pub profile: Profile,
}

/// Serializes `profile` into a fresh envelope, enforcing `quota` on the encoded size.
pub fn encode_envelope(profile: &Profile, quota: usize) -> Result<String, StorageError> {
    let envelope = ProfileEnvelope {
        version: STORAGE_VERSION,
        last_updated: Utc::now(),
        profile: profile.clone(),
    };
    let json = serde_json::to_string(&envelope)?;
    if json.len() > quota {
        return Err(StorageError::QuotaExceeded {
            size: json.len(),
            quota,
        });
    }
    Ok(json)
}

/// Decodes a stored record. Anything unreadable is logged and treated as absent.
pub fn decode_envelope(raw: &str) -> Option<ProfileEnvelope> {
    match serde_json::from_str::<ProfileEnvelope>(raw) {
        Ok(envelope) if envelope.version == STORAGE_VERSION => Some(envelope),
        Ok(envelope) => {
            warn!(
                "Ignoring stored profile with unsupported version {}",
                envelope.version
            );
            None
        }
        Err(e) => {
            warn!("Ignoring corrupt stored profile: {}", e);
            None
        }
    }
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn save(&self, profile: &Profile) -> Result<(), StorageError>;

    /// `Ok(None)` when nothing usable is stored. Errors only for backend failures.
    async fn load(&self) -> Result<Option<ProfileEnvelope>, StorageError>;

    async fn clear(&self) -> Result<(), StorageError>;
}

// ────────────────────────────────────────────────────────────────────────────
// File store
// ────────────────────────────────────────────────────────────────────────────

/// JSON file on local disk. Writes go to a sibling `.tmp` file and are renamed in place.
pub struct FileProfileStore {
    path: PathBuf,
    quota: usize,
}

impl FileProfileStore {
    pub fn new(path: impl Into<PathBuf>, quota: usize) -> Self {
        Self {
            path: path.into(),
            quota,
        }
    }
}

#[async_trait]
impl ProfileStore for FileProfileStore {
    async fn save(&self, profile: &Profile) -> Result<(), StorageError> {
        let json = encode_envelope(profile, self.quota)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &json).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        info!("Saved profile ({} bytes) to {}", json.len(), self.path.display());
        Ok(())
    }

    async fn load(&self) -> Result<Option<ProfileEnvelope>, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(decode_envelope(&raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No stored profile at {}", self.path.display());
                Ok(None)
            }
            // Non-UTF-8 content is corrupt data, not a backend failure.
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Ignoring unreadable stored profile: {}", e);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                info!("Cleared stored profile");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Redis store
// ────────────────────────────────────────────────────────────────────────────

/// Single Redis string key holding the JSON envelope.
pub struct RedisProfileStore {
    client: redis::Client,
    key: String,
    quota: usize,
}

impl RedisProfileStore {
    pub fn new(client: redis::Client, quota: usize) -> Self {
        Self {
            client,
            key: PROFILE_KEY.to_string(),
            quota,
        }
    }
}

#[async_trait]
impl ProfileStore for RedisProfileStore {
    async fn save(&self, profile: &Profile) -> Result<(), StorageError> {
        let json = encode_envelope(profile, self.quota)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(&self.key, &json).await?;
        info!("Saved profile ({} bytes) to Redis key {}", json.len(), self.key);
        Ok(())
    }

    async fn load(&self) -> Result<Option<ProfileEnvelope>, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(&self.key).await?;
        Ok(raw.as_deref().and_then(decode_envelope))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(&self.key).await?;
        info!("Cleared stored profile");
        Ok(())
    }
}
