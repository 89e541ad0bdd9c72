// ABOUTME: Document store abstraction over the remote backend
// ABOUTME: Defines the trait consumed by the accessors plus SQLite and REST backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trickline Contributors

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::models::{NewTrick, ProgressPatch, RawTrickDoc, UserTrickProgress};

/// Backend selection by connection URL
pub mod factory;

/// Hosted document-store REST client
pub mod rest;

/// Embedded SQLite backend for local development and tests
pub mod sqlite;

pub use factory::Store;
pub use rest::{RestStore, RestStoreConfig};
pub use sqlite::SqliteStore;

/// The document-store seam the synchronization layer is a client of
///
/// Implementations provide the handful of operations the engine needs:
/// query-by-field over the `tricks` and `user_tricks` collections, get-by-id,
/// create, merge-upsert, idempotent delete, and an atomic catalog replace for
/// seeding.
#[async_trait]
pub trait DocumentStore: Send + Sync + Clone {
    /// List catalog records flagged public
    async fn list_public_tricks(&self) -> AppResult<Vec<RawTrickDoc>>;

    /// List catalog records owned by the given user
    async fn list_tricks_by_owner(&self, owner_id: &str) -> AppResult<Vec<RawTrickDoc>>;

    /// Fetch a single catalog record by id
    async fn get_trick(&self, trick_id: &str) -> AppResult<Option<RawTrickDoc>>;

    /// Create a catalog record, returning the generated document id
    async fn create_trick(&self, trick: &NewTrick) -> AppResult<String>;

    /// List progress records for the given user
    async fn list_progress_for_user(&self, user_id: &str) -> AppResult<Vec<UserTrickProgress>>;

    /// Merge-upsert a progress record: fields marked `Keep` in the patch
    /// retain their stored values (including the attempt counter)
    async fn upsert_progress(&self, patch: &ProgressPatch) -> AppResult<()>;

    /// Delete the progress record for (user, trick); succeeds when no record
    /// exists
    async fn delete_progress(&self, user_id: &str, trick_id: &str) -> AppResult<()>;

    /// Atomically replace the entire catalog with the given records,
    /// returning the number inserted. A record failing validation aborts
    /// the whole batch, leaving the previous catalog intact
    async fn replace_catalog(&self, tricks: &[NewTrick]) -> AppResult<usize>;
}
