// ABOUTME: Environment-driven configuration for the Trickline engine
// ABOUTME: Reads connection URL, API credentials, and cache location from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trickline Contributors

use std::env;
use std::path::PathBuf;

use crate::errors::AppResult;

/// Default embedded database when no connection URL is configured
pub const DEFAULT_DATABASE_URL: &str = "sqlite:trickline.db";

/// Engine configuration, sourced from environment variables
///
/// - `TRICKLINE_DATABASE_URL` — document store connection URL (`sqlite:` or
///   `http(s):`); defaults to a local SQLite file
/// - `TRICKLINE_API_KEY` — bearer key for the hosted REST backend
/// - `TRICKLINE_CACHE_DIR` — directory for the merged-view snapshot cache
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Document store connection URL
    pub database_url: String,
    /// Bearer key for the hosted backend, when using the REST store
    pub api_key: Option<String>,
    /// Snapshot cache directory; falls back to the platform data dir
    pub cache_dir: Option<PathBuf>,
}

impl SyncConfig {
    /// Load configuration from the environment
    ///
    /// # Errors
    ///
    /// Currently infallible; returns `AppResult` so future validation can
    /// reject malformed values without changing call sites.
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            database_url: env::var("TRICKLINE_DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned()),
            api_key: env::var("TRICKLINE_API_KEY").ok(),
            cache_dir: env::var("TRICKLINE_CACHE_DIR").ok().map(PathBuf::from),
        })
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            api_key: None,
            cache_dir: None,
        }
    }
}
