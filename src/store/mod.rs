//! Character/Monster store
//!
//! Two layers:
//! - Free functions over `&mut SqliteConnection` that compose inside a single
//!   transaction (used by the battle engine)
//! - [`GameStore`], pool-level operations for joining, spawning and stat allocation

mod character;
mod monster;
mod participation;

pub use character::{
    get_character, get_participants, insert_character, list_characters, save_attributes,
    save_progress, Character, CharacterClass, Stat, FIGHTER_TAG,
};
pub use monster::{
    get_current_monster, get_monster, insert_monster, parse_monster_spec, save_monster_hp,
    Monster, MonsterSpec,
};
pub use participation::{count_participation, insert_participation};

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use crate::db::begin_write;
use crate::game::report::mention;

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("character {0} already exists")]
    CharacterExists(i64),

    #[error("character {0} not found")]
    CharacterNotFound(i64),

    #[error("not enough skill points ({available} available, {requested} requested)")]
    NotEnoughSkillPoints { available: i64, requested: i64 },

    #[error("amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Pool-level game operations outside of combat
#[derive(Clone)]
pub struct GameStore {
    pool: SqlitePool,
}

impl GameStore {
    /// Create a new game store
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a default fighter for a player joining the adventure
    pub async fn create_character(&self, id: i64) -> Result<Character, StoreError> {
        let mut tx = begin_write(&self.pool).await?;

        if get_character(&mut tx, id).await?.is_some() {
            return Err(StoreError::CharacterExists(id));
        }

        let character = Character::new(id);
        insert_character(&mut tx, &character).await?;
        tx.commit().await?;

        info!("Character {} joined the adventure", id);
        Ok(character)
    }

    /// Get a character by player identity
    pub async fn character(&self, id: i64) -> Result<Option<Character>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(get_character(&mut conn, id).await?)
    }

    /// All characters in identity order
    pub async fn characters(&self) -> Result<Vec<Character>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(list_characters(&mut conn).await?)
    }

    /// Roster line: each character's mention and level
    pub async fn roster(&self) -> Result<String, StoreError> {
        let characters = self.characters().await?;
        Ok(characters
            .iter()
            .map(|c| format!("{} (niv. {}) ", mention(c.id), c.level))
            .collect())
    }

    /// The monster currently targeted by attacks
    pub async fn current_monster(&self) -> Result<Option<Monster>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(get_current_monster(&mut conn).await?)
    }

    /// Queue a monster behind any surviving ones
    pub async fn spawn_monster(&self, spec: &MonsterSpec) -> Result<Monster, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let monster = insert_monster(&mut conn, spec).await?;

        info!(
            "Spawned monster {} '{}' ({} HP, {} XP)",
            monster.id, monster.name, monster.current_hp, monster.experience
        );
        Ok(monster)
    }

    /// Spend skill points on an attribute
    pub async fn allocate_skill_points(
        &self,
        id: i64,
        stat: Stat,
        amount: i64,
    ) -> Result<Character, StoreError> {
        if amount <= 0 {
            return Err(StoreError::InvalidAmount(amount));
        }

        let mut tx = begin_write(&self.pool).await?;

        let mut character = get_character(&mut tx, id)
            .await?
            .ok_or(StoreError::CharacterNotFound(id))?;

        if amount > character.skill_points {
            return Err(StoreError::NotEnoughSkillPoints {
                available: character.skill_points,
                requested: amount,
            });
        }

        character.spend_skill_points(stat, amount);
        save_attributes(&mut tx, &character).await?;
        tx.commit().await?;

        info!(
            "Character {} put {} point(s) into {} ({} left)",
            id, amount, stat, character.skill_points
        );
        Ok(character)
    }
}
