// ABOUTME: Core data models for trick catalog records, user progress, and the merged view
// ABOUTME: Handles default backfill for drifted catalog documents at the fetch boundary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trickline Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Points awarded for a trick when the stored document carries none
pub const DEFAULT_POINTS: u32 = 10;

/// Trick category taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TrickCategory {
    /// Fundamental flat-ground maneuvers
    #[default]
    Basics,
    /// Flip tricks (kickflip family)
    Flip,
    /// Truck grinds on ledges and rails
    Grind,
    /// Deck slides on ledges and rails
    Slide,
    /// Ramp, bowl, and coping tricks
    Transition,
}

impl TrickCategory {
    /// Stored string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Basics => "Basics",
            Self::Flip => "Flip",
            Self::Grind => "Grind",
            Self::Slide => "Slide",
            Self::Transition => "Transition",
        }
    }

    /// Parse from the stored string representation; unknown values fall back
    /// to `Basics`, matching the backfill policy for drifted records
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "Flip" => Self::Flip,
            "Grind" => Self::Grind,
            "Slide" => Self::Slide,
            "Transition" => Self::Transition,
            _ => Self::Basics,
        }
    }
}

/// Trick difficulty rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TrickDifficulty {
    /// Beginner-friendly
    #[default]
    Easy,
    /// Requires solid fundamentals
    Intermediate,
    /// Expert territory
    Advanced,
}

impl TrickDifficulty {
    /// Stored string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    /// Parse from the stored string representation; unknown values fall back
    /// to `Easy`
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "Intermediate" => Self::Intermediate,
            "Advanced" => Self::Advanced,
            _ => Self::Easy,
        }
    }
}

/// Per-user learning status for a trick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrickStatus {
    /// No progress record exists for this (user, trick) pair
    #[default]
    NotStarted,
    /// Actively learning
    InProgress,
    /// Mastered
    Completed,
}

impl TrickStatus {
    /// Stored string representation (wire-compatible with the original
    /// document schema)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        }
    }

    /// Parse from the stored string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "IN_PROGRESS" => Self::InProgress,
            "COMPLETED" => Self::Completed,
            _ => Self::NotStarted,
        }
    }
}

/// A catalog document exactly as stored in the backend
///
/// Older records predate the `category`/`difficulty`/`points` fields, so
/// everything beyond the name is optional here. Only the store layer produces
/// this type; the catalog accessor converts it to a fully-populated
/// [`TrickMeta`] before anything downstream sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTrickDoc {
    /// Document id
    pub id: String,
    /// Trick name
    pub name: String,
    /// Description, if present
    #[serde(default)]
    pub description: Option<String>,
    /// Image URL, if present
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    /// Difficulty rating, if present
    #[serde(default)]
    pub difficulty: Option<TrickDifficulty>,
    /// Category, if present
    #[serde(default)]
    pub category: Option<TrickCategory>,
    /// Video URL, if present
    #[serde(default)]
    pub video_url: Option<String>,
    /// Point value, if present
    #[serde(default)]
    pub points: Option<u32>,
    /// Prerequisite trick names, if present
    #[serde(default)]
    pub prerequisites: Option<Vec<String>>,
    /// Owning user, for user-submitted tricks
    #[serde(rename = "ownerId", default)]
    pub owner_id: Option<String>,
    /// Whether the trick is visible to everyone
    #[serde(rename = "isPublic", default)]
    pub is_public: bool,
}

impl RawTrickDoc {
    /// Fill defaults for fields absent in storage, producing a record all
    /// downstream code can rely on being fully populated
    #[must_use]
    pub fn into_meta(self) -> TrickMeta {
        TrickMeta {
            id: self.id,
            name: self.name,
            description: self.description.unwrap_or_default(),
            image_url: self.image_url.unwrap_or_default(),
            difficulty: self.difficulty.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            video_url: self.video_url.unwrap_or_default(),
            points: self.points.unwrap_or(DEFAULT_POINTS),
            prerequisites: self.prerequisites.unwrap_or_default(),
            owner_id: self.owner_id,
            is_public: self.is_public,
        }
    }
}

/// A fully-populated catalog record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickMeta {
    /// Document id
    pub id: String,
    /// Trick name
    pub name: String,
    /// Description
    pub description: String,
    /// Image URL (empty string when absent in storage)
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    /// Difficulty rating
    pub difficulty: TrickDifficulty,
    /// Category
    pub category: TrickCategory,
    /// Video URL (empty string when absent in storage)
    pub video_url: String,
    /// Point value
    pub points: u32,
    /// Prerequisite trick names
    pub prerequisites: Vec<String>,
    /// Owning user, for user-submitted tricks
    #[serde(rename = "ownerId")]
    pub owner_id: Option<String>,
    /// Whether the trick is visible to everyone
    #[serde(rename = "isPublic")]
    pub is_public: bool,
}

/// Payload for creating a catalog record (user-submitted trick or seed entry)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrick {
    /// Trick name
    pub name: String,
    /// Description
    pub description: String,
    /// Image URL
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    /// Difficulty rating; absent entries rely on backfill at fetch time
    #[serde(default)]
    pub difficulty: Option<TrickDifficulty>,
    /// Category; absent entries rely on backfill at fetch time
    #[serde(default)]
    pub category: Option<TrickCategory>,
    /// Video URL
    #[serde(default)]
    pub video_url: Option<String>,
    /// Point value; absent entries rely on backfill at fetch time
    #[serde(default)]
    pub points: Option<u32>,
    /// Prerequisite trick names
    #[serde(default)]
    pub prerequisites: Vec<String>,
    /// Owning user; stamped by the sync manager for user submissions
    #[serde(rename = "ownerId", default)]
    pub owner_id: Option<String>,
    /// Whether the trick is visible to everyone
    #[serde(rename = "isPublic", default)]
    pub is_public: bool,
}

impl NewTrick {
    /// Validate required fields before any network call
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` when the name or description is blank.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::invalid_input("Trick name must not be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::invalid_input(
                "Trick description must not be empty",
            ));
        }
        Ok(())
    }
}

/// Per-user learning progress for a single trick
///
/// Exists only while the status is not `NOT_STARTED`; reverting a trick to
/// `NOT_STARTED` deletes the record and its timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTrickProgress {
    /// Owning user
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Trick the progress applies to
    #[serde(rename = "trickId")]
    pub trick_id: String,
    /// Current learning status
    pub status: TrickStatus,
    /// When the user started learning the trick
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    /// When the user mastered the trick
    #[serde(rename = "masteredAt")]
    pub mastered_at: Option<DateTime<Utc>>,
    /// Practice attempt counter
    #[serde(default)]
    pub attempts: u32,
    /// Last modification time
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Progress document id convention: `<userId>_<trickId>`
#[must_use]
pub fn progress_doc_id(user_id: &str, trick_id: &str) -> String {
    format!("{user_id}_{trick_id}")
}

/// Tri-state field write for merge-upserts
///
/// `Keep` leaves the stored value untouched, `Clear` nulls it, `Set` replaces
/// it — the typed equivalent of a partial document write with merge semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch<T> {
    /// Leave the stored value as-is
    Keep,
    /// Null the stored value
    Clear,
    /// Replace the stored value
    Set(T),
}

impl<T: Copy> Patch<T> {
    /// Resolve the patch against the currently stored value
    #[must_use]
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Keep => current,
            Self::Clear => None,
            Self::Set(value) => Some(value),
        }
    }
}

/// Merge-upsert payload for a progress record
#[derive(Debug, Clone)]
pub struct ProgressPatch {
    /// Owning user
    pub user_id: String,
    /// Trick the progress applies to
    pub trick_id: String,
    /// Destination status
    pub status: TrickStatus,
    /// Started-at write
    pub started_at: Patch<DateTime<Utc>>,
    /// Mastered-at write
    pub mastered_at: Patch<DateTime<Utc>>,
    /// Modification time to record
    pub updated_at: DateTime<Utc>,
}

impl ProgressPatch {
    /// Build the patch for a status transition at time `now`
    ///
    /// Transitioning to `IN_PROGRESS` stamps `started_at` and clears
    /// `mastered_at`; transitioning to `COMPLETED` stamps `mastered_at` and
    /// preserves `started_at`. Transitions to `NOT_STARTED` are deletions, not
    /// upserts, so they never build a patch.
    #[must_use]
    pub fn for_transition(
        user_id: &str,
        trick_id: &str,
        status: TrickStatus,
        now: DateTime<Utc>,
    ) -> Self {
        debug_assert!(
            status != TrickStatus::NotStarted,
            "NOT_STARTED is a deletion, not an upsert"
        );
        let (started_at, mastered_at) = match status {
            TrickStatus::InProgress => (Patch::Set(now), Patch::Clear),
            TrickStatus::Completed => (Patch::Keep, Patch::Set(now)),
            TrickStatus::NotStarted => (Patch::Keep, Patch::Keep),
        };
        Self {
            user_id: user_id.to_owned(),
            trick_id: trick_id.to_owned(),
            status,
            started_at,
            mastered_at,
            updated_at: now,
        }
    }

    /// Progress document id for this patch
    #[must_use]
    pub fn doc_id(&self) -> String {
        progress_doc_id(&self.user_id, &self.trick_id)
    }
}

/// The merged view model: catalog record plus resolved learning status
///
/// A projection recomputed on every fetch and after every local mutation;
/// never persisted directly except as a whole-list cache snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    /// Catalog record
    #[serde(flatten)]
    pub meta: TrickMeta,
    /// Resolved learning status
    pub status: TrickStatus,
}

/// Auth-provider seam: a stable user identifier plus authenticated flag
///
/// Anonymous sessions operate in read-only mode and see every trick as
/// `NOT_STARTED`.
#[derive(Debug, Clone, Default)]
pub struct UserSession {
    user_id: Option<String>,
}

impl UserSession {
    /// Session for a signed-in user
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    /// Anonymous session
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user_id: None }
    }

    /// Stable user identifier, when signed in
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Whether the session belongs to a signed-in user
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}
