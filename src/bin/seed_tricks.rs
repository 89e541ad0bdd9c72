// ABOUTME: Catalog seeding utility for the Trickline engine
// ABOUTME: Destructively resets the tricks collection to the curated starter list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trickline Contributors

//! # Trick Catalog Seeder
//!
//! Replaces the entire `tricks` collection with the curated starter catalog
//! in a single atomic batch.
//!
//! ## Usage
//!
//! ```bash
//! # Seed against the configured store
//! cargo run --bin seed-tricks
//!
//! # Override the store URL
//! cargo run --bin seed-tricks -- --database-url sqlite:./data/tricks.db
//!
//! # Show what would be done
//! cargo run --bin seed-tricks -- --dry-run
//! ```

use clap::Parser;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trickline::config::SyncConfig;
use trickline::errors::AppError;
use trickline::seed::{initial_tricks, reset_catalog};
use trickline::store::{DocumentStore, Store};

#[derive(Error, Debug)]
enum SeedError {
    #[error("{0}")]
    App(#[from] AppError),
}

#[derive(Parser)]
#[command(
    name = "seed-tricks",
    about = "Trickline catalog seeder",
    long_about = "Reset the trick catalog to the curated starter list"
)]
struct SeedArgs {
    /// Document store URL override (sqlite: or http(s):)
    #[arg(long)]
    database_url: Option<String>,

    /// Show what would be done without making changes
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), SeedError> {
    let args = SeedArgs::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = SyncConfig::from_env()?;
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    let tricks = initial_tricks();
    if args.dry_run {
        info!(
            count = tricks.len(),
            url = %config.database_url,
            "dry run: would replace the catalog with the curated list"
        );
        for trick in &tricks {
            let category = trick.category.map_or("-", |c| c.as_str());
            println!("{category:<12} {}", trick.name);
        }
        return Ok(());
    }

    let store = Store::connect(&config).await?;
    let inserted = reset_catalog(&store).await?;
    let total = store.list_public_tricks().await?.len();
    info!(inserted, total, "catalog seeded");
    Ok(())
}
