//! Common test utilities - file-backed game database for end-to-end tests

#![allow(dead_code)]

use airpg::store::{Character, CharacterClass, MonsterSpec};
use airpg::Database;
use anyhow::Result;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// A game database in a temporary directory
///
/// File-backed so that concurrent attacks use separate connections.
pub struct TestGame {
    pub db: Database,
    _dir: TempDir,
}

impl TestGame {
    /// Create a fresh database
    pub async fn start() -> Result<Self> {
        let dir = TempDir::new()?;
        let path = dir.path().join("game.db");
        let path = path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("temp path is not UTF-8"))?
            .to_string();

        let db = Database::new(Some(&path)).await?;
        Ok(Self { db, _dir: dir })
    }

    pub fn pool(&self) -> SqlitePool {
        self.db.pool().clone()
    }

    /// Insert a fighter with the given progress and combat stats
    pub async fn fighter(&self, id: i64, experience: i64, strength: i64, agility: i64) -> Character {
        let mut c = Character::new(id);
        c.class = CharacterClass::Fighter;
        c.experience = experience;
        c.level = airpg::game::level_for_experience(experience);
        c.strength = strength;
        c.agility = agility;

        let mut conn = self.db.pool().acquire().await.expect("acquire");
        airpg::store::insert_character(&mut conn, &c)
            .await
            .expect("Failed to insert character");
        c
    }

    /// Insert a monster with an explicit current hp, returning its id
    pub async fn monster(&self, name: &str, experience: i64, agility: i64, current_hp: i64) -> i64 {
        let spec = MonsterSpec {
            name: name.to_string(),
            experience,
            strength: 1,
            agility,
            wisdom: 1,
            constitution: 1,
        };

        let mut conn = self.db.pool().acquire().await.expect("acquire");
        let monster = airpg::store::insert_monster(&mut conn, &spec)
            .await
            .expect("Failed to insert monster");
        airpg::store::save_monster_hp(&mut conn, monster.id, current_hp)
            .await
            .expect("Failed to set monster hp");
        monster.id
    }

    pub async fn character(&self, id: i64) -> Character {
        let mut conn = self.db.pool().acquire().await.expect("acquire");
        airpg::store::get_character(&mut conn, id)
            .await
            .expect("query")
            .expect("character exists")
    }

    pub async fn monster_hp(&self, id: i64) -> i64 {
        let mut conn = self.db.pool().acquire().await.expect("acquire");
        airpg::store::get_monster(&mut conn, id)
            .await
            .expect("query")
            .expect("monster exists")
            .current_hp
    }

    pub async fn participation_count(&self, monster_id: i64) -> i64 {
        let mut conn = self.db.pool().acquire().await.expect("acquire");
        airpg::store::count_participation(&mut conn, monster_id)
            .await
            .expect("query")
    }

    /// Make every statement of the given kind fail inside SQLite
    pub async fn inject_failure(&self, name: &str, event: &str, table: &str) {
        let sql = format!(
            "CREATE TRIGGER {} BEFORE {} ON {} BEGIN SELECT RAISE(ABORT, 'injected failure'); END",
            name, event, table
        );
        sqlx::query(&sql)
            .execute(self.db.pool())
            .await
            .expect("Failed to create trigger");
    }
}
