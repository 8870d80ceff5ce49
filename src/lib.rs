//! airpg - chat-bot game master
//!
//! Keeps player characters and a queue of monsters in SQLite and resolves
//! turn-based combat when a player attacks.

pub mod config;
pub mod db;
pub mod game;
pub mod init;
pub mod store;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

pub use config::Config;
pub use db::Database;
pub use game::{BattleEngine, BattleError, BattleReport};
pub use store::{GameStore, StoreError};

/// The game master instance: database, store and battle engine
pub struct GameMaster {
    config: Config,
    db: Arc<Database>,
    store: GameStore,
    engine: BattleEngine,
}

impl GameMaster {
    /// Open the configured database and build the engine
    pub async fn new(config: Config) -> Result<Self> {
        let db = Database::with_max_connections(config.db_path.as_deref(), config.max_connections)
            .await?;
        let pool = db.pool().clone();

        let engine = match config.rng_seed {
            Some(seed) => BattleEngine::with_seed(pool.clone(), seed),
            None => BattleEngine::new(pool.clone()),
        };

        info!(
            "Game master ready (database: {})",
            config.db_path.as_deref().unwrap_or(":memory:")
        );

        Ok(Self {
            config,
            db: Arc::new(db),
            store: GameStore::new(pool),
            engine,
        })
    }

    /// Get the database handle
    pub fn db(&self) -> Arc<Database> {
        self.db.clone()
    }

    /// Non-combat game operations
    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// The battle engine
    pub fn engine(&self) -> &BattleEngine {
        &self.engine
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
