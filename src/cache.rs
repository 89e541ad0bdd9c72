// ABOUTME: Durable snapshot cache for the merged trick view
// ABOUTME: Pre-populates the view on cold start; superseded by the first successful fetch
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trickline Contributors

use std::path::PathBuf;

use tokio::fs;
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::errors::{AppError, AppResult};
use crate::models::Trick;

/// Fixed cache namespace; the snapshot lives in `<dir>/trick-storage.json`
pub const CACHE_NAMESPACE: &str = "trick-storage";

/// JSON snapshot of the merged trick list on durable storage
///
/// No expiry: stale data is an acceptable placeholder until the next
/// successful fetch overwrites it.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    path: PathBuf,
}

impl SnapshotCache {
    /// Cache rooted at the given directory
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self {
            path: dir.join(format!("{CACHE_NAMESPACE}.json")),
        }
    }

    /// Cache rooted at the configured directory, falling back to the
    /// platform data dir
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when no cache directory is configured and
    /// the platform data dir cannot be determined.
    pub fn from_config(config: &SyncConfig) -> AppResult<Self> {
        let dir = match &config.cache_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .ok_or_else(|| AppError::config("No platform data dir for the snapshot cache"))?
                .join("trickline"),
        };
        Ok(Self::new(dir))
    }

    /// Snapshot file location
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Persist the merged view
    ///
    /// Written to a temp file and renamed so a crash mid-write never leaves a
    /// truncated snapshot behind.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem operation fails.
    pub async fn save(&self, tricks: &[Trick]) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::internal(format!("Failed to create cache dir: {e}")))?;
        }
        let json = serde_json::to_vec(tricks)
            .map_err(|e| AppError::internal(format!("Failed to serialize snapshot: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json)
            .await
            .map_err(|e| AppError::internal(format!("Failed to write snapshot: {e}")))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| AppError::internal(format!("Failed to commit snapshot: {e}")))?;
        debug!(tricks = tricks.len(), path = %self.path.display(), "snapshot saved");
        Ok(())
    }

    /// Load the last snapshot, if any
    ///
    /// A missing or unreadable snapshot is a cache miss, not an error; only
    /// the fetch path determines correctness.
    ///
    /// # Errors
    ///
    /// Currently infallible; returns `AppResult` to match the save side.
    pub async fn load(&self) -> AppResult<Option<Vec<Trick>>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(_) => return Ok(None),
        };
        match serde_json::from_slice(&bytes) {
            Ok(tricks) => Ok(Some(tricks)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "discarding corrupt snapshot");
                Ok(None)
            }
        }
    }
}
