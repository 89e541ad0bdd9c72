// ABOUTME: Embedded SQLite backend for the document store abstraction
// ABOUTME: Stores tricks and user_tricks with nullable columns to model schema drift
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trickline Contributors

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::DocumentStore;
use crate::errors::{AppError, AppResult};
use crate::models::{
    NewTrick, ProgressPatch, RawTrickDoc, TrickCategory, TrickDifficulty, TrickStatus,
    UserTrickProgress,
};
use async_trait::async_trait;

/// SQLite-backed document store
///
/// The embedded stand-in for the hosted backend: local development, offline
/// use, and tests. Schema is created on connect.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect and run schema setup
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or schema setup fails.
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        // In-memory databases are per-connection; a pool with more than one
        // connection would see a different empty database on each checkout.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to {database_url}: {e}")))?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Underlying connection pool, for test fixtures
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS tricks (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                image_url TEXT,
                difficulty TEXT,
                category TEXT,
                video_url TEXT,
                points INTEGER,
                prerequisites TEXT,
                owner_id TEXT,
                is_public INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create tricks table: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_tricks (
                doc_id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                trick_id TEXT NOT NULL,
                status TEXT NOT NULL,
                started_at TEXT,
                mastered_at TEXT,
                attempts INTEGER NOT NULL DEFAULT 0,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create user_tricks table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_user_tricks_user ON user_tricks(user_id)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create index: {e}")))?;

        debug!("SQLite schema ready");
        Ok(())
    }
}

fn row_to_trick(row: &SqliteRow) -> AppResult<RawTrickDoc> {
    let prerequisites = match row.try_get::<Option<String>, _>("prerequisites")? {
        Some(json) => Some(
            serde_json::from_str(&json)
                .map_err(|e| AppError::database(format!("Corrupt prerequisites list: {e}")))?,
        ),
        None => None,
    };
    Ok(RawTrickDoc {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        image_url: row.try_get("image_url")?,
        difficulty: row
            .try_get::<Option<String>, _>("difficulty")?
            .map(|s| TrickDifficulty::parse(&s)),
        category: row
            .try_get::<Option<String>, _>("category")?
            .map(|s| TrickCategory::parse(&s)),
        video_url: row.try_get("video_url")?,
        points: row
            .try_get::<Option<i64>, _>("points")?
            .and_then(|p| u32::try_from(p).ok()),
        prerequisites,
        owner_id: row.try_get("owner_id")?,
        is_public: row.try_get("is_public")?,
    })
}

fn row_to_progress(row: &SqliteRow) -> AppResult<UserTrickProgress> {
    Ok(UserTrickProgress {
        user_id: row.try_get("user_id")?,
        trick_id: row.try_get("trick_id")?,
        status: TrickStatus::parse(&row.try_get::<String, _>("status")?),
        started_at: row.try_get("started_at")?,
        mastered_at: row.try_get("mastered_at")?,
        attempts: u32::try_from(row.try_get::<i64, _>("attempts")?).unwrap_or_default(),
        updated_at: row.try_get("updated_at")?,
    })
}

async fn insert_trick(
    conn: &mut sqlx::SqliteConnection,
    id: &str,
    trick: &NewTrick,
    created_at: DateTime<Utc>,
) -> AppResult<()> {
    let prerequisites = serde_json::to_string(&trick.prerequisites)
        .map_err(|e| AppError::internal(format!("Failed to serialize prerequisites: {e}")))?;
    sqlx::query(
        r"
        INSERT INTO tricks (id, name, description, image_url, difficulty, category,
                            video_url, points, prerequisites, owner_id, is_public, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ",
    )
    .bind(id)
    .bind(&trick.name)
    .bind(&trick.description)
    .bind(&trick.image_url)
    .bind(trick.difficulty.map(|d| d.as_str()))
    .bind(trick.category.map(|c| c.as_str()))
    .bind(&trick.video_url)
    .bind(trick.points.map(i64::from))
    .bind(prerequisites)
    .bind(&trick.owner_id)
    .bind(trick.is_public)
    .bind(created_at)
    .execute(conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to insert trick: {e}")))?;
    Ok(())
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn list_public_tricks(&self) -> AppResult<Vec<RawTrickDoc>> {
        let rows = sqlx::query("SELECT * FROM tricks WHERE is_public = 1 ORDER BY rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list public tricks: {e}")))?;
        rows.iter().map(row_to_trick).collect()
    }

    async fn list_tricks_by_owner(&self, owner_id: &str) -> AppResult<Vec<RawTrickDoc>> {
        let rows = sqlx::query("SELECT * FROM tricks WHERE owner_id = $1 ORDER BY rowid")
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list owned tricks: {e}")))?;
        rows.iter().map(row_to_trick).collect()
    }

    async fn get_trick(&self, trick_id: &str) -> AppResult<Option<RawTrickDoc>> {
        let row = sqlx::query("SELECT * FROM tricks WHERE id = $1")
            .bind(trick_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get trick: {e}")))?;
        row.as_ref().map(row_to_trick).transpose()
    }

    async fn create_trick(&self, trick: &NewTrick) -> AppResult<String> {
        let id = Uuid::new_v4().to_string();
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;
        insert_trick(&mut *conn, &id, trick, Utc::now()).await?;
        debug!(trick_id = %id, "trick created");
        Ok(id)
    }

    async fn list_progress_for_user(&self, user_id: &str) -> AppResult<Vec<UserTrickProgress>> {
        let rows = sqlx::query("SELECT * FROM user_tricks WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list progress: {e}")))?;
        rows.iter().map(row_to_progress).collect()
    }

    async fn upsert_progress(&self, patch: &ProgressPatch) -> AppResult<()> {
        let doc_id = patch.doc_id();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        // Merge semantics: fields marked Keep retain their stored values, so
        // read the current row before writing.
        let existing =
            sqlx::query("SELECT started_at, mastered_at, attempts FROM user_tricks WHERE doc_id = $1")
                .bind(&doc_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to read progress: {e}")))?;
        let (current_started, current_mastered, attempts) = match existing {
            Some(row) => (
                row.try_get::<Option<DateTime<Utc>>, _>("started_at")?,
                row.try_get::<Option<DateTime<Utc>>, _>("mastered_at")?,
                row.try_get::<i64, _>("attempts")?,
            ),
            None => (None, None, 0),
        };

        sqlx::query(
            r"
            INSERT INTO user_tricks (doc_id, user_id, trick_id, status, started_at,
                                     mastered_at, attempts, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT(doc_id) DO UPDATE SET
                status = excluded.status,
                started_at = excluded.started_at,
                mastered_at = excluded.mastered_at,
                attempts = excluded.attempts,
                updated_at = excluded.updated_at
            ",
        )
        .bind(&doc_id)
        .bind(&patch.user_id)
        .bind(&patch.trick_id)
        .bind(patch.status.as_str())
        .bind(patch.started_at.apply(current_started))
        .bind(patch.mastered_at.apply(current_mastered))
        .bind(attempts)
        .bind(patch.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert progress: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit progress upsert: {e}")))?;
        Ok(())
    }

    async fn delete_progress(&self, user_id: &str, trick_id: &str) -> AppResult<()> {
        let doc_id = crate::models::progress_doc_id(user_id, trick_id);
        // Idempotent: deleting a missing record is not an error.
        sqlx::query("DELETE FROM user_tricks WHERE doc_id = $1")
            .bind(&doc_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete progress: {e}")))?;
        Ok(())
    }

    async fn replace_catalog(&self, tricks: &[NewTrick]) -> AppResult<usize> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query("DELETE FROM tricks")
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear catalog: {e}")))?;

        for trick in tricks {
            // An invalid record aborts the whole batch; the transaction
            // rollback leaves the previous catalog intact.
            trick.validate()?;
            let id = Uuid::new_v4().to_string();
            insert_trick(&mut *tx, &id, trick, now).await?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit catalog replace: {e}")))?;
        debug!(inserted = tricks.len(), "catalog replaced");
        Ok(tricks.len())
    }
}
