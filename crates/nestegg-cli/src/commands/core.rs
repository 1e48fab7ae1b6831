//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_engine` - Recommendation engine with the resolved policy
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use nestegg_core::{Database, RecommendationEngine, RecommendationPolicy};

pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Build the engine from `--policy`, the user override file, or the built-in policy
pub fn load_engine(policy_path: Option<&Path>) -> Result<RecommendationEngine> {
    let policy =
        RecommendationPolicy::load(policy_path).context("Failed to load recommendation policy")?;
    Ok(RecommendationEngine::with_policy(policy))
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;

    let user = db
        .ensure_default_user()
        .context("Failed to create default user")?;
    println!("   User: {} <{}> (id {})", user.display_name(), user.email, user.id);

    let seeded = db
        .seed_default_categories(user.id)
        .context("Failed to seed default categories")?;
    println!("   Seeded {} default categories", seeded);

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record income: nestegg transactions add income 50000 salary");
    println!("  2. Set a goal:    nestegg goals add \"Vacation\" 100000");
    println!("  3. Get advice:    nestegg goals advise 1");

    Ok(())
}
