// ABOUTME: Per-user progress accessor building a lookup keyed by trick id
// ABOUTME: Anonymous sessions get an empty mapping and see everything as NOT_STARTED
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trickline Contributors

use std::collections::HashMap;

use tracing::debug;

use crate::errors::AppResult;
use crate::models::{UserSession, UserTrickProgress};
use crate::store::DocumentStore;

/// Fetch the progress records for the session's user, keyed by trick id
///
/// Anonymous sessions return an empty mapping without touching the store.
///
/// # Errors
///
/// Propagates any store failure.
pub async fn fetch_progress<S: DocumentStore>(
    store: &S,
    session: &UserSession,
) -> AppResult<HashMap<String, UserTrickProgress>> {
    let Some(user_id) = session.user_id() else {
        return Ok(HashMap::new());
    };
    let records = store.list_progress_for_user(user_id).await?;
    debug!(user_id, records = records.len(), "progress fetched");
    Ok(records
        .into_iter()
        .map(|record| (record.trick_id.clone(), record))
        .collect())
}
