//! Attack resolution
//!
//! Each character class resolves its attack through an [`AttackStrategy`]
//! looked up in a [`StrategyTable`]. Only the fighter is implemented.

use std::collections::HashMap;
use std::sync::Arc;

use rand::{Rng, RngCore};

use super::report::ReportLine;
use crate::store::{Character, CharacterClass, Monster};

/// Result of one attack against a monster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackOutcome {
    /// Hit points removed from the monster, at least 1
    pub damage: i64,
    /// Random part of the hit
    pub agility_bonus: i64,
    /// Whether the monster's hit points reached zero or below
    pub defeated: bool,
    pub line: ReportLine,
}

/// Per-class attack behavior
pub trait AttackStrategy: Send + Sync {
    /// Resolve one attack, decrementing `monster.current_hp`
    fn resolve(
        &self,
        attacker: &Character,
        monster: &mut Monster,
        rng: &mut dyn RngCore,
    ) -> AttackOutcome;
}

/// Strength plus a random agility bonus, reduced by the target's agility
#[derive(Debug, Clone, Copy, Default)]
pub struct FighterStrategy;

impl AttackStrategy for FighterStrategy {
    fn resolve(
        &self,
        attacker: &Character,
        monster: &mut Monster,
        rng: &mut dyn RngCore,
    ) -> AttackOutcome {
        resolve_attack(attacker, monster, rng)
    }
}

/// Draw the agility bonus, uniform over `0..=2*agility`
pub fn roll_agility_bonus<R: Rng + ?Sized>(agility: i64, rng: &mut R) -> i64 {
    rng.random_range(0..=2 * agility.max(0))
}

/// Damage of a hit; never below 1
pub fn damage_for(strength: i64, agility_bonus: i64, monster_agility: i64) -> i64 {
    (strength + agility_bonus - monster_agility).max(1)
}

/// Fighter attack: roll, apply damage to the monster and narrate
pub fn resolve_attack<R: Rng + ?Sized>(
    attacker: &Character,
    monster: &mut Monster,
    rng: &mut R,
) -> AttackOutcome {
    let agility_bonus = roll_agility_bonus(attacker.agility, rng);
    let damage = damage_for(attacker.strength, agility_bonus, monster.agility);

    monster.current_hp -= damage;

    AttackOutcome {
        damage,
        agility_bonus,
        defeated: monster.current_hp <= 0,
        line: ReportLine::Attack {
            attacker_id: attacker.id,
            damage,
            strength: attacker.strength,
            agility_bonus,
            monster_agility: monster.agility,
            monster_name: monster.name.clone(),
        },
    }
}

/// Dispatch table from class to attack strategy
#[derive(Clone)]
pub struct StrategyTable {
    strategies: HashMap<CharacterClass, Arc<dyn AttackStrategy>>,
}

impl StrategyTable {
    /// A table with every implemented class registered
    pub fn new() -> Self {
        let mut table = Self::empty();
        table.register(CharacterClass::Fighter, Arc::new(FighterStrategy));
        table
    }

    /// A table with no classes
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Register or replace the strategy for a class
    pub fn register(&mut self, class: CharacterClass, strategy: Arc<dyn AttackStrategy>) {
        self.strategies.insert(class, strategy);
    }

    /// Strategy for a class, if one is implemented
    pub fn get(&self, class: &CharacterClass) -> Option<&dyn AttackStrategy> {
        self.strategies.get(class).map(|s| s.as_ref())
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::new()
    }
}
