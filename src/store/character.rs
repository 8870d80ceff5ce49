//! Character records and their persistence

use std::fmt;
use std::str::FromStr;

use sqlx::SqliteConnection;

use crate::game::progression;
use crate::game::report::mention;

/// Storage tag of the fighter archetype
pub const FIGHTER_TAG: &str = "Fighter";

/// Character archetype
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CharacterClass {
    /// Melee attacker using strength and agility
    Fighter,
    /// A tag with no implementation yet
    Other(String),
}

impl CharacterClass {
    /// Map a stored tag to a class
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            FIGHTER_TAG => CharacterClass::Fighter,
            other => CharacterClass::Other(other.to_string()),
        }
    }

    /// Tag written to the store
    pub fn as_str(&self) -> &str {
        match self {
            CharacterClass::Fighter => FIGHTER_TAG,
            CharacterClass::Other(tag) => tag,
        }
    }

    /// Player-facing name
    pub fn label(&self) -> &str {
        match self {
            CharacterClass::Fighter => "Combattant",
            CharacterClass::Other(tag) => tag,
        }
    }
}

/// Base attribute that skill points can be spent on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Strength,
    Agility,
    Wisdom,
    Constitution,
}

impl Stat {
    /// Column holding this attribute
    pub fn column(&self) -> &'static str {
        match self {
            Stat::Strength => "strength",
            Stat::Agility => "agility",
            Stat::Wisdom => "wisdom",
            Stat::Constitution => "constitution",
        }
    }
}

impl FromStr for Stat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strength" | "str" | "force" => Ok(Stat::Strength),
            "agility" | "agi" | "agilité" | "agilite" => Ok(Stat::Agility),
            "wisdom" | "wis" | "sagesse" => Ok(Stat::Wisdom),
            "constitution" | "con" => Ok(Stat::Constitution),
            other => Err(format!("Unknown stat: {}", other)),
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// A player's avatar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    /// Chat identity of the player
    pub id: i64,
    pub class: CharacterClass,
    /// Cumulative, never decreases
    pub experience: i64,
    /// Always `level_for_experience(experience)`
    pub level: i64,
    pub strength: i64,
    pub agility: i64,
    pub wisdom: i64,
    pub constitution: i64,
    /// Unallocated points awarded on level-up
    pub skill_points: i64,
    pub current_hp: i64,
    /// 0..=100, not spent yet
    pub stamina: i64,
}

impl Character {
    /// A freshly joined fighter with default stats
    pub fn new(id: i64) -> Self {
        let mut c = Self {
            id,
            class: CharacterClass::Fighter,
            experience: 0,
            level: 1,
            strength: 1,
            agility: 1,
            wisdom: 1,
            constitution: 1,
            skill_points: 5,
            current_hp: 0,
            stamina: 100,
        };
        c.current_hp = c.max_hp();
        c
    }

    pub fn max_hp(&self) -> i64 {
        progression::character_max_hp(self.constitution, self.level)
    }

    /// Current value of an attribute
    pub fn stat(&self, stat: Stat) -> i64 {
        match stat {
            Stat::Strength => self.strength,
            Stat::Agility => self.agility,
            Stat::Wisdom => self.wisdom,
            Stat::Constitution => self.constitution,
        }
    }

    fn stat_mut(&mut self, stat: Stat) -> &mut i64 {
        match stat {
            Stat::Strength => &mut self.strength,
            Stat::Agility => &mut self.agility,
            Stat::Wisdom => &mut self.wisdom,
            Stat::Constitution => &mut self.constitution,
        }
    }

    /// Move `amount` skill points into `stat`; the caller checks the balance
    pub(crate) fn spend_skill_points(&mut self, stat: Stat, amount: i64) {
        *self.stat_mut(stat) += amount;
        self.skill_points -= amount;
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({}) - {} / {} HP",
            mention(self.id),
            self.class.label(),
            self.current_hp,
            self.max_hp()
        )?;
        writeln!(f, "Endurance : {} / 100", self.stamina)?;
        writeln!(f, "Niveau {} ({} XP)", self.level, self.experience)?;
        writeln!(f, "Force : {}", self.strength)?;
        writeln!(f, "Agilité : {}", self.agility)?;
        writeln!(f, "Sagesse : {}", self.wisdom)?;
        writeln!(f, "Constitution : {}", self.constitution)?;

        if self.skill_points > 0 {
            let plural = if self.skill_points > 1 { "s" } else { "" };
            writeln!(
                f,
                "\nIl vous reste {} point{} à répartir.",
                self.skill_points, plural
            )?;
        }
        Ok(())
    }
}

/// Row type for SQLite queries
#[derive(sqlx::FromRow)]
struct CharacterRow {
    id: i64,
    class: String,
    experience: i64,
    level: i64,
    strength: i64,
    agility: i64,
    wisdom: i64,
    constitution: i64,
    skill_points: i64,
    current_hp: i64,
    stamina: i64,
}

impl CharacterRow {
    fn into_character(self) -> Character {
        Character {
            id: self.id,
            class: CharacterClass::from_tag(&self.class),
            experience: self.experience,
            level: self.level,
            strength: self.strength,
            agility: self.agility,
            wisdom: self.wisdom,
            constitution: self.constitution,
            skill_points: self.skill_points,
            current_hp: self.current_hp,
            stamina: self.stamina,
        }
    }
}

const CHARACTER_COLUMNS: &str = "c.id, c.class, c.experience, c.level, c.strength, c.agility, \
     c.wisdom, c.constitution, c.skill_points, c.current_hp, c.stamina";

/// Load a character by player identity
pub async fn get_character(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Character>, sqlx::Error> {
    let sql = format!("SELECT {} FROM characters c WHERE c.id = ?", CHARACTER_COLUMNS);
    let row: Option<CharacterRow> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.map(CharacterRow::into_character))
}

/// All characters in identity order
pub async fn list_characters(conn: &mut SqliteConnection) -> Result<Vec<Character>, sqlx::Error> {
    let sql = format!("SELECT {} FROM characters c ORDER BY c.id", CHARACTER_COLUMNS);
    let rows: Vec<CharacterRow> = sqlx::query_as(&sql).fetch_all(&mut *conn).await?;

    Ok(rows.into_iter().map(CharacterRow::into_character).collect())
}

/// Distinct characters with at least one participation row against a monster
pub async fn get_participants(
    conn: &mut SqliteConnection,
    monster_id: i64,
) -> Result<Vec<Character>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT DISTINCT {}
        FROM characters c
        INNER JOIN battle_participation bp ON bp.character_id = c.id
        WHERE bp.monster_id = ?
        ORDER BY c.id
        "#,
        CHARACTER_COLUMNS
    );
    let rows: Vec<CharacterRow> = sqlx::query_as(&sql)
        .bind(monster_id)
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows.into_iter().map(CharacterRow::into_character).collect())
}

/// Insert a new character record
pub async fn insert_character(
    conn: &mut SqliteConnection,
    c: &Character,
) -> Result<(), sqlx::Error> {
    let created_at = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO characters (id, class, experience, level, strength, agility, wisdom,
                                constitution, skill_points, current_hp, stamina, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
    .bind(&created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Persist experience, level and skill points
pub async fn save_progress(conn: &mut SqliteConnection, c: &Character) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE characters SET experience = ?, level = ?, skill_points = ? WHERE id = ?")
        .bind(c.experience)
        .bind(c.level)
        .bind(c.skill_points)
        .bind(c.id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Persist the four attributes and skill points
pub async fn save_attributes(
    conn: &mut SqliteConnection,
    c: &Character,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE characters
        SET strength = ?, agility = ?, wisdom = ?, constitution = ?, skill_points = ?
        WHERE id = ?
        "#,
    )
    .bind(c.strength)
    .bind(c.agility)
    .bind(c.wisdom)
    .bind(c.constitution)
    .bind(c.skill_points)
    .bind(c.id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
