//! Combat and progression engine
//!
//! - Progression rules: experience to level, hit points, skill points
//! - Attack resolution with per-class strategies
//! - Victory settlement: experience sharing and level-ups
//! - The battle transaction tying them together

pub mod battle;
pub mod combat;
pub mod progression;
pub mod report;
pub mod settlement;

pub use battle::{BattleEngine, BattleError};
pub use combat::{resolve_attack, AttackOutcome, AttackStrategy, FighterStrategy, StrategyTable};
pub use progression::{
    character_max_hp, experience_for_level, level_for_experience, monster_max_hp,
    skill_points_granted,
};
pub use report::{mention, BattleReport, ReportLine};
pub use settlement::{distribute_experience, settle_victory, Settlement};
