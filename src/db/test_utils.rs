//! Shared test utilities for database operations
//!
//! Provides a common test_pool() function that creates an in-memory
//! database with the full schema, plus seeding helpers for game records.

use sqlx::SqlitePool;

use super::Database;
use crate::store::{Character, CharacterClass, MonsterSpec};

/// Create an in-memory test database pool with full schema
///
/// Uses Database::new(None) to create a complete database with all
/// migrations applied, ensuring tests run against the same schema
/// as production.
pub async fn test_pool() -> SqlitePool {
    let db = Database::new(None)
        .await
        .expect("Failed to create test database");
    db.pool().clone()
}

/// Build a fighter with the given experience and attributes
pub fn fighter(id: i64, experience: i64, strength: i64, agility: i64) -> Character {
    let mut c = Character::new(id);
    c.class = CharacterClass::Fighter;
    c.experience = experience;
    c.level = crate::game::level_for_experience(experience);
    c.strength = strength;
    c.agility = agility;
    c
}

/// Insert a character row exactly as given
pub async fn insert_character(pool: &SqlitePool, c: &Character) {
    sqlx::query(
        r#"
        INSERT INTO characters (id, class, experience, level, strength, agility, wisdom,
                                constitution, skill_points, current_hp, stamina)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(c.id)
    .bind(c.class.as_str())
    .bind(c.experience)
    .bind(c.level)
    .bind(c.strength)
    .bind(c.agility)
    .bind(c.wisdom)
    .bind(c.constitution)
    .bind(c.skill_points)
    .bind(c.current_hp)
    .bind(c.stamina)
    .execute(pool)
    .await
    .expect("Failed to insert character");
}

/// Insert a monster with an explicit current hp, returning its id
pub async fn insert_monster(pool: &SqlitePool, spec: &MonsterSpec, current_hp: i64) -> i64 {
    let result = sqlx::query(
        r#"
        INSERT INTO monsters (name, experience, strength, agility, wisdom, constitution, current_hp)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&spec.name)
    .bind(spec.experience)
    .bind(spec.strength)
    .bind(spec.agility)
    .bind(spec.wisdom)
    .bind(spec.constitution)
    .bind(current_hp)
    .execute(pool)
    .await
    .expect("Failed to insert monster");
    result.last_insert_rowid()
}
