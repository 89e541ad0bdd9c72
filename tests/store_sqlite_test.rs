// ABOUTME: Integration tests for the SQLite document store backend
// ABOUTME: Covers catalog CRUD, merge-upsert semantics, idempotent deletes, and bulk replace
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trickline Contributors

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use anyhow::Result;
use chrono::Utc;
use common::{memory_store, public_trick};
use trickline::models::{
    progress_doc_id, Patch, ProgressPatch, TrickCategory, TrickStatus,
};
use trickline::store::DocumentStore;

#[tokio::test]
async fn create_and_get_round_trip() {
    let store = memory_store().await;
    let mut trick = public_trick("Kickflip", TrickCategory::Flip);
    trick.points = Some(30);
    trick.prerequisites = vec!["Ollie".to_owned()];

    let id = store.create_trick(&trick).await.unwrap();
    let doc = store.get_trick(&id).await.unwrap().unwrap();
    assert_eq!(doc.name, "Kickflip");
    assert_eq!(doc.category, Some(TrickCategory::Flip));
    assert_eq!(doc.points, Some(30));
    assert_eq!(doc.prerequisites.as_deref(), Some(&["Ollie".to_owned()][..]));
    assert!(doc.is_public);
}

#[tokio::test]
async fn get_missing_trick_is_none() {
    let store = memory_store().await;
    assert!(store.get_trick("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn public_and_owner_queries_partition_the_catalog() {
    let store = memory_store().await;
    store
        .create_trick(&public_trick("Ollie", TrickCategory::Basics))
        .await
        .unwrap();
    let mut private = public_trick("Secret", TrickCategory::Grind);
    private.is_public = false;
    private.owner_id = Some("u1".to_owned());
    store.create_trick(&private).await.unwrap();

    let public = store.list_public_tricks().await.unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].name, "Ollie");

    let owned = store.list_tricks_by_owner("u1").await.unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].name, "Secret");

    assert!(store.list_tricks_by_owner("u2").await.unwrap().is_empty());
}

#[tokio::test]
async fn drifted_fields_come_back_as_none() {
    let store = memory_store().await;
    let mut sparse = public_trick("Old Record", TrickCategory::Basics);
    sparse.category = None;
    let id = store.create_trick(&sparse).await.unwrap();

    let doc = store.get_trick(&id).await.unwrap().unwrap();
    assert_eq!(doc.category, None);
    assert_eq!(doc.difficulty, None);
    assert_eq!(doc.points, None);
    assert_eq!(doc.image_url, None);
}

#[tokio::test]
async fn upsert_creates_then_merges_progress() {
    let store = memory_store().await;
    let t0 = Utc::now();
    store
        .upsert_progress(&ProgressPatch::for_transition(
            "u1",
            "t1",
            TrickStatus::InProgress,
            t0,
        ))
        .await
        .unwrap();

    let records = store.list_progress_for_user("u1").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, TrickStatus::InProgress);
    assert_eq!(records[0].started_at, Some(t0));
    assert_eq!(records[0].mastered_at, None);

    // Completing later stamps mastered_at but keeps the original started_at.
    let t1 = Utc::now();
    store
        .upsert_progress(&ProgressPatch::for_transition(
            "u1",
            "t1",
            TrickStatus::Completed,
            t1,
        ))
        .await
        .unwrap();

    let records = store.list_progress_for_user("u1").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, TrickStatus::Completed);
    assert_eq!(records[0].started_at, Some(t0));
    assert_eq!(records[0].mastered_at, Some(t1));
}

#[tokio::test]
async fn returning_to_in_progress_clears_mastered_at() {
    let store = memory_store().await;
    let t0 = Utc::now();
    store
        .upsert_progress(&ProgressPatch::for_transition(
            "u1",
            "t1",
            TrickStatus::Completed,
            t0,
        ))
        .await
        .unwrap();

    let t1 = Utc::now();
    store
        .upsert_progress(&ProgressPatch::for_transition(
            "u1",
            "t1",
            TrickStatus::InProgress,
            t1,
        ))
        .await
        .unwrap();

    let records = store.list_progress_for_user("u1").await.unwrap();
    assert_eq!(records[0].status, TrickStatus::InProgress);
    assert_eq!(records[0].started_at, Some(t1));
    assert_eq!(records[0].mastered_at, None);
}

#[tokio::test]
async fn keep_patch_preserves_attempt_counter() {
    let store = memory_store().await;
    let now = Utc::now();
    // Seed a record with a nonzero attempt counter directly.
    sqlx::query(
        "INSERT INTO user_tricks (doc_id, user_id, trick_id, status, attempts, updated_at)
         VALUES ($1, 'u1', 't1', 'IN_PROGRESS', 4, $2)",
    )
    .bind(progress_doc_id("u1", "t1"))
    .bind(now)
    .execute(store.pool())
    .await
    .unwrap();

    store
        .upsert_progress(&ProgressPatch {
            user_id: "u1".to_owned(),
            trick_id: "t1".to_owned(),
            status: TrickStatus::Completed,
            started_at: Patch::Keep,
            mastered_at: Patch::Set(now),
            updated_at: now,
        })
        .await
        .unwrap();

    let records = store.list_progress_for_user("u1").await.unwrap();
    assert_eq!(records[0].attempts, 4);
}

#[tokio::test]
async fn delete_progress_is_idempotent() {
    let store = memory_store().await;
    store
        .upsert_progress(&ProgressPatch::for_transition(
            "u1",
            "t1",
            TrickStatus::InProgress,
            Utc::now(),
        ))
        .await
        .unwrap();

    store.delete_progress("u1", "t1").await.unwrap();
    assert!(store.list_progress_for_user("u1").await.unwrap().is_empty());

    // Second delete finds nothing and still succeeds.
    store.delete_progress("u1", "t1").await.unwrap();
}

#[tokio::test]
async fn replace_catalog_wipes_previous_records() {
    let store = memory_store().await;
    store
        .create_trick(&public_trick("Stale", TrickCategory::Basics))
        .await
        .unwrap();

    let fresh = vec![
        public_trick("Ollie", TrickCategory::Basics),
        public_trick("Kickflip", TrickCategory::Flip),
    ];
    let inserted = store.replace_catalog(&fresh).await.unwrap();
    assert_eq!(inserted, 2);

    let names: Vec<String> = store
        .list_public_tricks()
        .await
        .unwrap()
        .into_iter()
        .map(|doc| doc.name)
        .collect();
    assert_eq!(names, ["Ollie", "Kickflip"]);
}

#[tokio::test]
async fn failed_replace_leaves_previous_catalog_intact() -> Result<()> {
    let store = memory_store().await;
    store
        .create_trick(&public_trick("Ollie", TrickCategory::Basics))
        .await?;

    // The second entry fails validation partway through the batch; the
    // transaction must roll back the delete and the first insert.
    let blank = public_trick("", TrickCategory::Flip);
    let batch = vec![public_trick("Kickflip", TrickCategory::Flip), blank];
    assert!(store.replace_catalog(&batch).await.is_err());

    let names: Vec<String> = store
        .list_public_tricks()
        .await?
        .into_iter()
        .map(|doc| doc.name)
        .collect();
    assert_eq!(names, ["Ollie"]);
    Ok(())
}
