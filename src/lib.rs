// ABOUTME: Main library entry point for the Trickline sync engine
// ABOUTME: Merges remote trick catalogs with per-user progress and keeps them in sync
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trickline Contributors

#![deny(unsafe_code)]

//! # Trickline
//!
//! A client-side synchronization engine for tracking skateboarding tricks
//! through a personal learning pipeline (not started → in progress → completed).
//!
//! The engine merges two remote collections — the trick catalog (public and
//! user-owned records) and per-user progress records — into a unified view,
//! applies status changes optimistically, and reconciles with the backend by
//! re-fetching the authoritative state whenever a mutation fails. A local JSON
//! snapshot pre-populates the view on cold start before the first network
//! round-trip completes.
//!
//! ## Architecture
//!
//! - **Store**: `DocumentStore` trait over the remote document database, with
//!   SQLite (embedded, local development and tests) and REST (hosted) backends
//! - **Catalog**: public + owned catalog fetch with deduplication and
//!   default backfill for drifted records
//! - **Progress**: per-user progress lookup keyed by trick id
//! - **Merge**: pure catalog × progress projection into the `Trick` view model
//! - **Sync**: optimistic status transitions with rollback-via-refetch
//! - **Cache**: durable snapshot of the merged view for instant cold starts
//!
//! ## Example
//!
//! ```rust,no_run
//! use trickline::cache::SnapshotCache;
//! use trickline::errors::AppResult;
//! use trickline::models::{TrickStatus, UserSession};
//! use trickline::store::sqlite::SqliteStore;
//! use trickline::sync::SyncManager;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let store = SqliteStore::connect("sqlite:tricks.db").await?;
//!     let cache = SnapshotCache::new(std::path::PathBuf::from(".cache"));
//!     let manager = SyncManager::new(store, cache);
//!
//!     let session = UserSession::authenticated("user-1");
//!     manager.fetch_tricks(&session).await?;
//!     manager.set_status(&session, "trick-1", TrickStatus::InProgress).await?;
//!     Ok(())
//! }
//! ```

/// Error types and result alias shared across the crate
pub mod errors;

/// Environment-driven configuration
pub mod config;

/// Core data models: catalog records, progress records, and the merged view
pub mod models;

/// Document store abstraction with SQLite and REST backends
pub mod store;

/// Remote trick catalog accessor (public + owned partitions)
pub mod catalog;

/// Per-user progress accessor
pub mod progress;

/// Pure merge of catalog and progress into the view model
pub mod merge;

/// Status transition manager and shared view state
pub mod sync;

/// Durable snapshot cache for cold-start rendering
pub mod cache;

/// Curated initial catalog and bulk reset
pub mod seed;
