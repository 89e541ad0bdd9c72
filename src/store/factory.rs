// ABOUTME: Document store factory with backend selection by connection URL
// ABOUTME: Wraps SQLite and REST backends behind a single delegating enum
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trickline Contributors

use async_trait::async_trait;
use tracing::info;

use super::rest::{RestStore, RestStoreConfig};
use super::sqlite::SqliteStore;
use super::DocumentStore;
use crate::config::SyncConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{NewTrick, ProgressPatch, RawTrickDoc, UserTrickProgress};

/// Document store instance that delegates to the backend selected at runtime
#[derive(Clone)]
pub enum Store {
    /// Embedded SQLite backend
    Sqlite(SqliteStore),
    /// Hosted REST backend
    Rest(RestStore),
}

impl Store {
    /// Connect to the backend named by the configured connection URL
    ///
    /// `sqlite:` URLs select the embedded backend; `http:`/`https:` URLs
    /// select the hosted REST backend (which requires an API key).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for unrecognized URL schemes or a missing
    /// API key, and backend-specific errors for connection failures.
    pub async fn connect(config: &SyncConfig) -> AppResult<Self> {
        let store = if config.database_url.starts_with("sqlite:") {
            Self::Sqlite(SqliteStore::connect(&config.database_url).await?)
        } else if config.database_url.starts_with("http://")
            || config.database_url.starts_with("https://")
        {
            let api_key = config.api_key.clone().ok_or_else(|| {
                AppError::config("TRICKLINE_API_KEY is required for the REST backend")
            })?;
            Self::Rest(RestStore::new(RestStoreConfig {
                base_url: config.database_url.clone(),
                api_key,
            })?)
        } else {
            return Err(AppError::config(format!(
                "Unrecognized document store URL: {}",
                config.database_url
            )));
        };
        info!(backend = store.backend_info(), "document store connected");
        Ok(store)
    }

    /// Descriptive name of the active backend
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "SQLite (embedded)",
            Self::Rest(_) => "REST (hosted)",
        }
    }
}

#[async_trait]
impl DocumentStore for Store {
    async fn list_public_tricks(&self) -> AppResult<Vec<RawTrickDoc>> {
        match self {
            Self::Sqlite(s) => s.list_public_tricks().await,
            Self::Rest(s) => s.list_public_tricks().await,
        }
    }

    async fn list_tricks_by_owner(&self, owner_id: &str) -> AppResult<Vec<RawTrickDoc>> {
        match self {
            Self::Sqlite(s) => s.list_tricks_by_owner(owner_id).await,
            Self::Rest(s) => s.list_tricks_by_owner(owner_id).await,
        }
    }

    async fn get_trick(&self, trick_id: &str) -> AppResult<Option<RawTrickDoc>> {
        match self {
            Self::Sqlite(s) => s.get_trick(trick_id).await,
            Self::Rest(s) => s.get_trick(trick_id).await,
        }
    }

    async fn create_trick(&self, trick: &NewTrick) -> AppResult<String> {
        match self {
            Self::Sqlite(s) => s.create_trick(trick).await,
            Self::Rest(s) => s.create_trick(trick).await,
        }
    }

    async fn list_progress_for_user(&self, user_id: &str) -> AppResult<Vec<UserTrickProgress>> {
        match self {
            Self::Sqlite(s) => s.list_progress_for_user(user_id).await,
            Self::Rest(s) => s.list_progress_for_user(user_id).await,
        }
    }

    async fn upsert_progress(&self, patch: &ProgressPatch) -> AppResult<()> {
        match self {
            Self::Sqlite(s) => s.upsert_progress(patch).await,
            Self::Rest(s) => s.upsert_progress(patch).await,
        }
    }

    async fn delete_progress(&self, user_id: &str, trick_id: &str) -> AppResult<()> {
        match self {
            Self::Sqlite(s) => s.delete_progress(user_id, trick_id).await,
            Self::Rest(s) => s.delete_progress(user_id, trick_id).await,
        }
    }

    async fn replace_catalog(&self, tricks: &[NewTrick]) -> AppResult<usize> {
        match self {
            Self::Sqlite(s) => s.replace_catalog(tricks).await,
            Self::Rest(s) => s.replace_catalog(tricks).await,
        }
    }
}
