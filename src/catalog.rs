// ABOUTME: Remote trick catalog accessor merging public and user-owned partitions
// ABOUTME: Deduplicates by id with owned records taking precedence, then backfills defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trickline Contributors

use std::collections::HashMap;

use tracing::debug;

use crate::errors::AppResult;
use crate::models::{RawTrickDoc, TrickMeta};
use crate::store::DocumentStore;

/// Fetch the trick catalog visible to the given user
///
/// The public and owned partitions are queried concurrently and joined before
/// merging. Duplicate ids are collapsed to a single record with the
/// owned-record version winning — an explicit policy: a user's own copy of a
/// trick shadows the public one. Defaults for drifted optional fields are
/// filled here, at the fetch boundary, so downstream code always sees
/// fully-populated records.
///
/// # Errors
///
/// Propagates any store failure; the caller decides whether to fall back to
/// cached data.
pub async fn fetch_catalog<S: DocumentStore>(
    store: &S,
    owner_id: Option<&str>,
) -> AppResult<Vec<TrickMeta>> {
    let owned_fut = async {
        match owner_id {
            Some(id) => store.list_tricks_by_owner(id).await,
            None => Ok(Vec::new()),
        }
    };
    let (public, owned) = tokio::try_join!(store.list_public_tricks(), owned_fut)?;
    debug!(
        public = public.len(),
        owned = owned.len(),
        "catalog partitions fetched"
    );
    Ok(dedupe_owned_wins(public, owned)
        .into_iter()
        .map(RawTrickDoc::into_meta)
        .collect())
}

/// Collapse the two partitions by id, owned records winning on collision
///
/// Output order follows the public partition, with owned-only records
/// appended — an owned record that shadows a public one keeps the public
/// record's position.
fn dedupe_owned_wins(public: Vec<RawTrickDoc>, owned: Vec<RawTrickDoc>) -> Vec<RawTrickDoc> {
    let mut docs: Vec<RawTrickDoc> = Vec::with_capacity(public.len() + owned.len());
    let mut index_by_id: HashMap<String, usize> = HashMap::with_capacity(public.len());
    for doc in public {
        index_by_id.insert(doc.id.clone(), docs.len());
        docs.push(doc);
    }
    for doc in owned {
        match index_by_id.get(&doc.id) {
            Some(&i) => docs[i] = doc,
            None => {
                index_by_id.insert(doc.id.clone(), docs.len());
                docs.push(doc);
            }
        }
    }
    docs
}
