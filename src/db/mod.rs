//! Database module - SQLite schema for characters, monsters and battle participation

#[cfg(test)]
pub mod test_utils;

use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use tracing::info;

/// How long a writer waits for SQLite's write lock before giving up
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Database handle wrapping SQLite connection pool
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection
    /// If path is None, uses in-memory database (for testing)
    pub async fn new(path: Option<&str>) -> Result<Self> {
        Self::with_max_connections(path, 10).await
    }

    /// Create a database connection with a bounded pool size.
    ///
    /// An in-memory database lives inside a single connection, so the pool is
    /// pinned to one connection that is never recycled.
    pub async fn with_max_connections(path: Option<&str>, max_connections: u32) -> Result<Self> {
        let conn_str = match path {
            Some(p) => format!("sqlite:{}?mode=rwc", p),
            None => "sqlite::memory:".to_string(),
        };

        let options = SqliteConnectOptions::from_str(&conn_str)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT)
            .foreign_keys(true);

        let pool_options = match path {
            Some(_) => SqlitePoolOptions::new().max_connections(max_connections.max(1)),
            None => SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
        };

        let pool = pool_options.connect_with(options).await?;

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Open an existing database file
    pub async fn open(path: &str) -> Result<Self> {
        Self::new(Some(path)).await
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations...");

        // Characters are keyed by the player's chat identity
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS characters (
                id INTEGER PRIMARY KEY,
                class TEXT NOT NULL,
                experience INTEGER NOT NULL DEFAULT 0 CHECK (experience >= 0),
                level INTEGER NOT NULL DEFAULT 1 CHECK (level >= 1),
                strength INTEGER NOT NULL,
                agility INTEGER NOT NULL,
                wisdom INTEGER NOT NULL,
                constitution INTEGER NOT NULL,
                skill_points INTEGER NOT NULL DEFAULT 0 CHECK (skill_points >= 0),
                current_hp INTEGER NOT NULL,
                stamina INTEGER NOT NULL DEFAULT 100,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Monster queue; the id doubles as spawn order
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS monsters (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                experience INTEGER NOT NULL,
                strength INTEGER NOT NULL,
                agility INTEGER NOT NULL,
                wisdom INTEGER NOT NULL,
                constitution INTEGER NOT NULL,
                current_hp INTEGER NOT NULL,
                spawned_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Append-only: one row per attack
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS battle_participation (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                monster_id INTEGER NOT NULL REFERENCES monsters(id),
                character_id INTEGER NOT NULL REFERENCES characters(id),
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Create indexes
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_monsters_current_hp ON monsters(current_hp)")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_participation_monster ON battle_participation(monster_id)",
        )
        .execute(&self.pool)
        .await?;

        info!("Database migrations complete");
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check if database is healthy
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Begin a transaction that holds SQLite's write lock from the first statement.
///
/// A deferred transaction that reads before it writes cannot be upgraded once
/// another writer has committed, so read-modify-write sequences start here.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}
