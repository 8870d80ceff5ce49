//! Database initialization module
//!
//! Provides one-time database setup functionality for the airpg_init tool.

use std::path::Path;

use anyhow::{bail, Result};
use tracing::info;

use crate::db::Database;
use crate::store::{GameStore, MonsterSpec};

/// Initialize a new game database
///
/// # Arguments
/// * `path` - Path to the SQLite database file (must not exist)
/// * `monster` - Optional first monster to queue
///
/// # Errors
/// * Database file already exists
/// * Path is not valid UTF-8
/// * Database creation fails
pub async fn init_database(path: &Path, monster: Option<&MonsterSpec>) -> Result<()> {
    // Fail if database already exists
    if path.exists() {
        bail!(
            "Database file already exists: {}. Remove it first or use a different path.",
            path.display()
        );
    }

    let Some(path_str) = path.to_str() else {
        bail!("Database path is not valid UTF-8: {}", path.display());
    };

    info!("Creating new database at {}", path.display());

    // Create the database (runs migrations)
    let db = Database::new(Some(path_str)).await?;

    if let Some(spec) = monster {
        let store = GameStore::new(db.pool().clone());
        let spawned = store.spawn_monster(spec).await?;
        info!("Queued first monster '{}' ({})", spawned.name, spawned.id);
    }

    info!("Database initialization complete");
    Ok(())
}
