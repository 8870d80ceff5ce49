//! Monster queue records and their persistence

use std::fmt;
use std::str::FromStr;

use sqlx::SqliteConnection;

use crate::game::progression;

/// A combat target; spawn order is its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monster {
    pub id: i64,
    pub name: String,
    /// Reward shared among participants on defeat
    pub experience: i64,
    pub strength: i64,
    pub agility: i64,
    pub wisdom: i64,
    pub constitution: i64,
    /// Zero or below means retired
    pub current_hp: i64,
}

impl Monster {
    pub fn max_hp(&self) -> i64 {
        progression::monster_max_hp(self.constitution)
    }

    /// Whether this monster can still be targeted
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }
}

impl fmt::Display for Monster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} - {} / {} HP", self.name, self.current_hp, self.max_hp())
    }
}

/// Parameters of a monster to spawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterSpec {
    pub name: String,
    pub experience: i64,
    pub strength: i64,
    pub agility: i64,
    pub wisdom: i64,
    pub constitution: i64,
}

impl MonsterSpec {
    /// Hit points the monster starts with
    pub fn max_hp(&self) -> i64 {
        progression::monster_max_hp(self.constitution)
    }
}

impl FromStr for MonsterSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_monster_spec(s)
    }
}

impl fmt::Display for MonsterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}_{}_{}",
            self.name, self.experience, self.strength, self.agility, self.wisdom, self.constitution
        )
    }
}

/// Parse spawn notation `Name_XP_str_agi_wis_con`
///
/// The name may itself contain underscores; the last five fields are numbers.
pub fn parse_monster_spec(notation: &str) -> Result<MonsterSpec, String> {
    let notation = notation.trim();
    let parts: Vec<&str> = notation.rsplitn(6, '_').collect();
    if parts.len() < 6 {
        return Err("Expected Name_XP_str_agi_wis_con".to_string());
    }

    let name = parts[5].trim();
    if name.is_empty() {
        return Err("Monster name must not be empty".to_string());
    }

    let mut values = [0i64; 5];
    // rsplitn yields fields right to left
    for (slot, raw) in values.iter_mut().zip(parts[..5].iter().rev()) {
        let value: i64 = raw
            .trim()
            .parse()
            .map_err(|_| format!("Invalid number: {}", raw))?;
        if value < 0 {
            return Err(format!("Value must not be negative: {}", value));
        }
        *slot = value;
    }

    let [experience, strength, agility, wisdom, constitution] = values;
    Ok(MonsterSpec {
        name: name.to_string(),
        experience,
        strength,
        agility,
        wisdom,
        constitution,
    })
}

/// Row type for SQLite queries
#[derive(sqlx::FromRow)]
struct MonsterRow {
    id: i64,
    name: String,
    experience: i64,
    strength: i64,
    agility: i64,
    wisdom: i64,
    constitution: i64,
    current_hp: i64,
}

impl From<MonsterRow> for Monster {
    fn from(r: MonsterRow) -> Self {
        Monster {
            id: r.id,
            name: r.name,
            experience: r.experience,
            strength: r.strength,
            agility: r.agility,
            wisdom: r.wisdom,
            constitution: r.constitution,
            current_hp: r.current_hp,
        }
    }
}

/// The oldest surviving monster, if any
pub async fn get_current_monster(
    conn: &mut SqliteConnection,
) -> Result<Option<Monster>, sqlx::Error> {
    let row: Option<MonsterRow> = sqlx::query_as(
        r#"
        SELECT id, name, experience, strength, agility, wisdom, constitution, current_hp
        FROM monsters
        WHERE current_hp > 0
        ORDER BY id
        LIMIT 1
        "#,
    )
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(Monster::from))
}

/// Load any monster by id, retired or not
pub async fn get_monster(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Monster>, sqlx::Error> {
    let row: Option<MonsterRow> = sqlx::query_as(
        r#"
        SELECT id, name, experience, strength, agility, wisdom, constitution, current_hp
        FROM monsters WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(Monster::from))
}

/// Write a monster's hit points
pub async fn save_monster_hp(
    conn: &mut SqliteConnection,
    monster_id: i64,
    current_hp: i64,
) -> Result<(), sqlx::Error> {
    let result = sqlx::query("UPDATE monsters SET current_hp = ? WHERE id = ?")
        .bind(current_hp)
        .bind(monster_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(sqlx::Error::RowNotFound);
    }
    Ok(())
}

/// Queue a new monster at full health
pub async fn insert_monster(
    conn: &mut SqliteConnection,
    spec: &MonsterSpec,
) -> Result<Monster, sqlx::Error> {
    let spawned_at = chrono::Utc::now().to_rfc3339();
    let current_hp = spec.max_hp();

    let result = sqlx::query(
        r#"
        INSERT INTO monsters (name, experience, strength, agility, wisdom, constitution, current_hp, spawned_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&spec.name)
    .bind(spec.experience)
    .bind(spec.strength)
    .bind(spec.agility)
    .bind(spec.wisdom)
    .bind(spec.constitution)
    .bind(current_hp)
    .bind(&spawned_at)
    .execute(&mut *conn)
    .await?;

    Ok(Monster {
        id: result.last_insert_rowid(),
        name: spec.name.clone(),
        experience: spec.experience,
        strength: spec.strength,
        agility: spec.agility,
        wisdom: spec.wisdom,
        constitution: spec.constitution,
        current_hp,
    })
}
