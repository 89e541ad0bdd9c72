// ABOUTME: Status transition manager with optimistic updates and rollback-via-refetch
// ABOUTME: Owns the single shared merged view and serializes mutations per (user, trick)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trickline Contributors

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::cache::SnapshotCache;
use crate::catalog::fetch_catalog;
use crate::errors::{AppError, AppResult};
use crate::merge::merge;
use crate::models::{progress_doc_id, NewTrick, ProgressPatch, Trick, TrickStatus, UserSession};
use crate::progress::fetch_progress;
use crate::store::DocumentStore;

/// Result of a status transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The optimistic value was persisted and stands
    Committed,
    /// Persistence failed; the view was replaced with the authoritative
    /// re-fetched state
    RolledBack,
    /// Anonymous session; mutations are a guarded no-op
    NotAuthenticated,
}

/// Synchronization manager for the merged trick view
///
/// The merged list is the single shared mutable resource. All writes go
/// through two entry points (`replace` and `apply_status`), and mutations for
/// the same (user, trick) pair are serialized through a per-key lock so a
/// slow network round-trip can never overwrite a later transition.
pub struct SyncManager<S: DocumentStore> {
    store: S,
    cache: SnapshotCache,
    state: RwLock<Vec<Trick>>,
    transition_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<S: DocumentStore> SyncManager<S> {
    /// Build a manager over the given store and snapshot cache
    pub fn new(store: S, cache: SnapshotCache) -> Self {
        Self {
            store,
            cache,
            state: RwLock::new(Vec::new()),
            transition_locks: DashMap::new(),
        }
    }

    /// Snapshot of the current merged view
    pub async fn tricks(&self) -> Vec<Trick> {
        self.state.read().await.clone()
    }

    /// Pre-populate the view from the snapshot cache on cold start
    ///
    /// Returns whether a snapshot was found. The cached data is a placeholder
    /// only; the first successful [`fetch_tricks`](Self::fetch_tricks)
    /// supersedes it.
    ///
    /// # Errors
    ///
    /// Propagates cache read failures.
    pub async fn load_cached(&self) -> AppResult<bool> {
        match self.cache.load().await? {
            Some(tricks) => {
                info!(tricks = tricks.len(), "cold start from snapshot cache");
                self.replace(tricks).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Fetch catalog and progress, merge, and replace the view
    ///
    /// The two accessors run concurrently and are joined before merging; the
    /// merged result does not depend on their completion order. A fresh
    /// snapshot is written best-effort after the view is replaced.
    ///
    /// # Errors
    ///
    /// Propagates accessor failures; on failure the existing view (possibly
    /// cached data) is left untouched.
    pub async fn fetch_tricks(&self, session: &UserSession) -> AppResult<Vec<Trick>> {
        let (catalog, progress) = tokio::try_join!(
            fetch_catalog(&self.store, session.user_id()),
            fetch_progress(&self.store, session)
        )?;
        let merged = merge(catalog, &progress);
        self.replace(merged.clone()).await;
        if let Err(e) = self.cache.save(&merged).await {
            warn!(error = %e, "failed to snapshot merged view");
        }
        Ok(merged)
    }

    /// Apply a status transition for the session's user
    ///
    /// The new status is applied to the in-memory view before any network
    /// call, then persisted: transitions to `NOT_STARTED` delete the progress
    /// record (discarding its timestamps), anything else merge-upserts it.
    /// On persistence failure the optimistic value is discarded by re-running
    /// the canonical fetch — no partial local correction. Only the re-fetch
    /// itself failing surfaces an error.
    ///
    /// # Errors
    ///
    /// Returns an error only when rollback re-fetching fails.
    pub async fn set_status(
        &self,
        session: &UserSession,
        trick_id: &str,
        new_status: TrickStatus,
    ) -> AppResult<TransitionOutcome> {
        let Some(user_id) = session.user_id() else {
            debug!(trick_id, "ignoring transition from anonymous session");
            return Ok(TransitionOutcome::NotAuthenticated);
        };

        // Serialize transitions per (user, trick) so an earlier in-flight
        // round-trip settles before the next optimistic update lands.
        let key = progress_doc_id(user_id, trick_id);
        let lock = self
            .transition_locks
            .entry(key.clone())
            .or_default()
            .value()
            .clone();
        let guard = lock.lock().await;

        self.apply_status(trick_id, new_status).await;

        let result = match self.persist_transition(user_id, trick_id, new_status).await {
            Ok(()) => {
                let snapshot = self.tricks().await;
                if let Err(e) = self.cache.save(&snapshot).await {
                    warn!(error = %e, "failed to snapshot merged view");
                }
                debug!(user_id, trick_id, status = new_status.as_str(), "transition committed");
                Ok(TransitionOutcome::Committed)
            }
            Err(e) => {
                warn!(
                    user_id,
                    trick_id,
                    error = %e,
                    "transition failed; re-fetching authoritative state"
                );
                self.fetch_tricks(session)
                    .await
                    .map(|_| TransitionOutcome::RolledBack)
            }
        };

        drop(guard);
        drop(lock);
        // Release the lock entry once nothing else waits on it; a waiter
        // holds its own Arc clone, which keeps the count above one.
        self.transition_locks
            .remove_if(&key, |_, entry| Arc::strong_count(entry) == 1);
        result
    }

    /// Create a user-submitted trick and refresh the view
    ///
    /// Validation happens before any network call; the owner is stamped from
    /// the session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::AuthRequired` for anonymous sessions,
    /// `AppError::InvalidInput` for blank fields, and store errors otherwise.
    pub async fn add_trick(&self, session: &UserSession, mut trick: NewTrick) -> AppResult<String> {
        let Some(user_id) = session.user_id() else {
            return Err(AppError::auth_required("Adding a trick requires signing in"));
        };
        trick.validate()?;
        trick.owner_id = Some(user_id.to_owned());
        let trick_id = self.store.create_trick(&trick).await?;
        info!(user_id, trick_id = %trick_id, name = %trick.name, "trick added");
        self.fetch_tricks(session).await?;
        Ok(trick_id)
    }

    /// State entry point: replace the whole merged view
    async fn replace(&self, tricks: Vec<Trick>) {
        *self.state.write().await = tricks;
    }

    /// State entry point: set one trick's status in the merged view
    async fn apply_status(&self, trick_id: &str, status: TrickStatus) {
        let mut state = self.state.write().await;
        if let Some(trick) = state.iter_mut().find(|t| t.meta.id == trick_id) {
            trick.status = status;
        }
    }

    async fn persist_transition(
        &self,
        user_id: &str,
        trick_id: &str,
        new_status: TrickStatus,
    ) -> AppResult<()> {
        if new_status == TrickStatus::NotStarted {
            self.store.delete_progress(user_id, trick_id).await
        } else {
            let patch = ProgressPatch::for_transition(user_id, trick_id, new_status, Utc::now());
            self.store.upsert_progress(&patch).await
        }
    }
}
