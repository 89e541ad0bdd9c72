// ABOUTME: Shared test fixtures for Trickline integration tests
// ABOUTME: In-memory store builders, canned catalog stubs, and a failure-injecting store wrapper
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trickline Contributors

#![allow(dead_code, clippy::unwrap_used)]

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use trickline::cache::SnapshotCache;
use trickline::errors::{AppError, AppResult};
use trickline::models::{
    NewTrick, ProgressPatch, RawTrickDoc, TrickCategory, UserTrickProgress,
};
use trickline::store::{DocumentStore, SqliteStore};

/// Fresh in-memory SQLite store with schema applied
pub async fn memory_store() -> SqliteStore {
    SqliteStore::connect("sqlite::memory:").await.unwrap()
}

/// Snapshot cache rooted in a fresh temp dir; keep the guard alive for the test
pub fn temp_cache() -> (TempDir, SnapshotCache) {
    let dir = TempDir::new().unwrap();
    let cache = SnapshotCache::new(dir.path().to_path_buf());
    (dir, cache)
}

/// Fully-specified public catalog entry
pub fn public_trick(name: &str, category: TrickCategory) -> NewTrick {
    NewTrick {
        name: name.to_owned(),
        description: format!("How to {name}"),
        image_url: None,
        difficulty: None,
        category: Some(category),
        video_url: None,
        points: None,
        prerequisites: Vec::new(),
        owner_id: None,
        is_public: true,
    }
}

/// Raw catalog document for stub-store scenarios
pub fn raw_doc(id: &str, name: &str, owner: Option<&str>, is_public: bool) -> RawTrickDoc {
    RawTrickDoc {
        id: id.to_owned(),
        name: name.to_owned(),
        description: None,
        image_url: None,
        difficulty: None,
        category: None,
        video_url: None,
        points: None,
        prerequisites: None,
        owner_id: owner.map(str::to_owned),
        is_public,
    }
}

/// Store stub returning canned catalog partitions; progress is always empty
#[derive(Clone, Default)]
pub struct StubStore {
    pub public: Vec<RawTrickDoc>,
    pub owned: Vec<RawTrickDoc>,
}

#[async_trait]
impl DocumentStore for StubStore {
    async fn list_public_tricks(&self) -> AppResult<Vec<RawTrickDoc>> {
        Ok(self.public.clone())
    }

    async fn list_tricks_by_owner(&self, _owner_id: &str) -> AppResult<Vec<RawTrickDoc>> {
        Ok(self.owned.clone())
    }

    async fn get_trick(&self, trick_id: &str) -> AppResult<Option<RawTrickDoc>> {
        Ok(self
            .public
            .iter()
            .chain(self.owned.iter())
            .find(|doc| doc.id == trick_id)
            .cloned())
    }

    async fn create_trick(&self, _trick: &NewTrick) -> AppResult<String> {
        Err(AppError::internal("StubStore does not support writes"))
    }

    async fn list_progress_for_user(&self, _user_id: &str) -> AppResult<Vec<UserTrickProgress>> {
        Ok(Vec::new())
    }

    async fn upsert_progress(&self, _patch: &ProgressPatch) -> AppResult<()> {
        Err(AppError::internal("StubStore does not support writes"))
    }

    async fn delete_progress(&self, _user_id: &str, _trick_id: &str) -> AppResult<()> {
        Err(AppError::internal("StubStore does not support writes"))
    }

    async fn replace_catalog(&self, _tricks: &[NewTrick]) -> AppResult<usize> {
        Err(AppError::internal("StubStore does not support writes"))
    }
}

/// Wrapper that injects failures into selected operations of a real store
#[derive(Clone)]
pub struct FlakyStore {
    pub inner: SqliteStore,
    /// Fail progress upserts and deletes
    pub fail_mutations: Arc<AtomicBool>,
    /// Fail catalog and progress reads
    pub fail_reads: Arc<AtomicBool>,
    /// Hold every mutation for this long, simulating a slow round-trip
    pub mutation_delay_ms: Arc<AtomicU64>,
}

impl FlakyStore {
    pub fn new(inner: SqliteStore) -> Self {
        Self {
            inner,
            fail_mutations: Arc::new(AtomicBool::new(false)),
            fail_reads: Arc::new(AtomicBool::new(false)),
            mutation_delay_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn delay_mutations(&self, ms: u64) {
        self.mutation_delay_ms.store(ms, Ordering::SeqCst);
    }

    async fn mutation_gate(&self) -> AppResult<()> {
        let delay = self.mutation_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_mutations.load(Ordering::SeqCst) {
            Err(AppError::external_service("injected mutation failure"))
        } else {
            Ok(())
        }
    }

    fn read_gate(&self) -> AppResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(AppError::external_service("injected read failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn list_public_tricks(&self) -> AppResult<Vec<RawTrickDoc>> {
        self.read_gate()?;
        self.inner.list_public_tricks().await
    }

    async fn list_tricks_by_owner(&self, owner_id: &str) -> AppResult<Vec<RawTrickDoc>> {
        self.read_gate()?;
        self.inner.list_tricks_by_owner(owner_id).await
    }

    async fn get_trick(&self, trick_id: &str) -> AppResult<Option<RawTrickDoc>> {
        self.read_gate()?;
        self.inner.get_trick(trick_id).await
    }

    async fn create_trick(&self, trick: &NewTrick) -> AppResult<String> {
        self.mutation_gate().await?;
        self.inner.create_trick(trick).await
    }

    async fn list_progress_for_user(&self, user_id: &str) -> AppResult<Vec<UserTrickProgress>> {
        self.read_gate()?;
        self.inner.list_progress_for_user(user_id).await
    }

    async fn upsert_progress(&self, patch: &ProgressPatch) -> AppResult<()> {
        self.mutation_gate().await?;
        self.inner.upsert_progress(patch).await
    }

    async fn delete_progress(&self, user_id: &str, trick_id: &str) -> AppResult<()> {
        self.mutation_gate().await?;
        self.inner.delete_progress(user_id, trick_id).await
    }

    async fn replace_catalog(&self, tricks: &[NewTrick]) -> AppResult<usize> {
        self.mutation_gate().await?;
        self.inner.replace_catalog(tricks).await
    }
}
