// ABOUTME: Pure merge of catalog records and progress lookup into the Trick view model
// ABOUTME: Deterministic projection preserving catalog iteration order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trickline Contributors

use std::collections::HashMap;

use crate::models::{Trick, TrickMeta, TrickStatus, UserTrickProgress};

/// Combine catalog and progress into the merged view
///
/// Pure and deterministic: one `Trick` per catalog entry, in catalog order,
/// with the status taken from the progress lookup or defaulting to
/// `NOT_STARTED`. No sorting happens here; presentation ordering belongs to
/// the consuming layer.
#[must_use]
pub fn merge(catalog: Vec<TrickMeta>, progress: &HashMap<String, UserTrickProgress>) -> Vec<Trick> {
    catalog
        .into_iter()
        .map(|meta| {
            let status = progress
                .get(&meta.id)
                .map_or(TrickStatus::NotStarted, |record| record.status);
            Trick { meta, status }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawTrickDoc, TrickCategory, TrickDifficulty, DEFAULT_POINTS};
    use chrono::Utc;

    fn meta(id: &str) -> TrickMeta {
        RawTrickDoc {
            id: id.to_owned(),
            name: format!("Trick {id}"),
            description: None,
            image_url: None,
            difficulty: None,
            category: None,
            video_url: None,
            points: None,
            prerequisites: None,
            owner_id: None,
            is_public: true,
        }
        .into_meta()
    }

    fn record(trick_id: &str, status: TrickStatus) -> UserTrickProgress {
        UserTrickProgress {
            user_id: "u1".to_owned(),
            trick_id: trick_id.to_owned(),
            status,
            started_at: Some(Utc::now()),
            mastered_at: None,
            attempts: 0,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn one_output_per_catalog_entry() {
        let catalog = vec![meta("t1"), meta("t2"), meta("t3")];
        let mut progress = HashMap::new();
        progress.insert("t2".to_owned(), record("t2", TrickStatus::InProgress));
        progress.insert("missing".to_owned(), record("missing", TrickStatus::Completed));

        let merged = merge(catalog, &progress);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].status, TrickStatus::NotStarted);
        assert_eq!(merged[1].status, TrickStatus::InProgress);
        assert_eq!(merged[2].status, TrickStatus::NotStarted);
    }

    #[test]
    fn preserves_catalog_order() {
        let catalog = vec![meta("z"), meta("a"), meta("m")];
        let merged = merge(catalog, &HashMap::new());
        let ids: Vec<&str> = merged.iter().map(|t| t.meta.id.as_str()).collect();
        assert_eq!(ids, ["z", "a", "m"]);
    }

    #[test]
    fn empty_progress_yields_all_not_started() {
        let merged = merge(vec![meta("t1"), meta("t2")], &HashMap::new());
        assert!(merged.iter().all(|t| t.status == TrickStatus::NotStarted));
    }

    #[test]
    fn drifted_records_carry_backfilled_defaults_through_merge() {
        let merged = merge(vec![meta("t1")], &HashMap::new());
        assert_eq!(merged[0].meta.category, TrickCategory::Basics);
        assert_eq!(merged[0].meta.difficulty, TrickDifficulty::Easy);
        assert_eq!(merged[0].meta.points, DEFAULT_POINTS);
    }
}
