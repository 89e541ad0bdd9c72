// ABOUTME: Curated initial trick catalog and destructive bulk reset
// ABOUTME: Seed entries carry only name, description, and category; backfill supplies the rest
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trickline Contributors

use tracing::info;

use crate::errors::AppResult;
use crate::models::{NewTrick, TrickCategory};
use crate::store::DocumentStore;

fn entry(name: &str, description: &str, category: TrickCategory) -> NewTrick {
    NewTrick {
        name: name.to_owned(),
        description: description.to_owned(),
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

/// The curated starter catalog
///
/// Difficulty and points are intentionally left unset; the fetch-boundary
/// backfill resolves them, the same path drifted production records take.
#[must_use]
pub fn initial_tricks() -> Vec<NewTrick> {
    use TrickCategory::{Basics, Flip, Grind, Slide, Transition};
    vec![
        entry(
            "Ollie",
            "The fundamental jump. Popping the tail and sliding the front foot up to level the board.",
            Basics,
        ),
        entry("Manual", "Balancing on the back two wheels while rolling.", Basics),
        entry("Kickturn", "Lifting the front wheels to pivot and turn.", Basics),
        entry("Tic-Tac", "Consecutive kickturns to generate speed.", Basics),
        entry("Fakie Riding", "Riding backwards in your normal stance.", Basics),
        entry("Switch Riding", "Riding in your opposite stance.", Basics),
        entry(
            "Shuvit",
            "Rotating the board 180 degrees horizontally without popping the tail.",
            Basics,
        ),
        entry(
            "Pop Shuvit",
            "Popping the tail to rotate the board 180 degrees horizontally in the air.",
            Basics,
        ),
        entry(
            "Frontside 180",
            "Rotating yourself and the board 180 degrees facing forward.",
            Basics,
        ),
        entry(
            "Backside 180",
            "Rotating yourself and the board 180 degrees facing backward.",
            Basics,
        ),
        entry(
            "Kickflip",
            "Flipping the board 360 degrees along its axis with your toe.",
            Flip,
        ),
        entry(
            "Heelflip",
            "Flipping the board 360 degrees in the opposite direction with your heel.",
            Flip,
        ),
        entry(
            "Varial Kickflip",
            "A combination of a backside pop shuvit and a kickflip.",
            Flip,
        ),
        entry("Hardflip", "A frontside pop shuvit combined with a kickflip.", Flip),
        entry(
            "360 Flip (Tre Flip)",
            "A 360 shove-it combined with a kickflip.",
            Flip,
        ),
        entry(
            "Impossible",
            "Wrapping the board vertically around the back foot.",
            Flip,
        ),
        entry("50-50 Grind", "Grinding on both trucks equally.", Grind),
        entry("5-0 Grind", "Grinding only on the back truck.", Grind),
        entry("Nose Grind", "Grinding only on the front truck.", Grind),
        entry(
            "Crooked Grind",
            "Grinding on the front truck with the nose angled out.",
            Grind,
        ),
        entry(
            "Boardslide",
            "Sliding the middle of the board between the trucks.",
            Slide,
        ),
        entry("Noseslide", "Sliding on the nose of the deck.", Slide),
        entry("Tailslide", "Sliding on the tail of the deck.", Slide),
        entry(
            "Rock to Fakie",
            "Hooking the front truck over the coping and rolling back fakie.",
            Transition,
        ),
        entry("Drop In", "Entering a bowl or ramp from the top coping.", Transition),
    ]
}

/// Destructively replace the catalog with the curated starter list
///
/// Runs as a single atomic batch on the store, so a failure mid-reset leaves
/// the previous catalog intact.
///
/// # Errors
///
/// Propagates store failures.
pub async fn reset_catalog<S: DocumentStore>(store: &S) -> AppResult<usize> {
    let tricks = initial_tricks();
    let inserted = store.replace_catalog(&tricks).await?;
    info!(inserted, "catalog reset to curated list");
    Ok(inserted)
}
