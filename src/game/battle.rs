//! Battle transaction
//!
//! One attack command is one database transaction:
//! - Fetch the attacker and the current monster
//! - Resolve the attack through the attacker's class strategy
//! - Record participation
//! - Settle the victory if the monster fell
//! - Commit
//!
//! The transaction is opened with `BEGIN IMMEDIATE`, so concurrent attacks on
//! the same monster run one after the other and no hit point decrement is lost.
//! Any error drops the transaction, which rolls every step back.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::combat::StrategyTable;
use super::report::BattleReport;
use super::settlement::settle_victory;
use crate::db::begin_write;
use crate::store;

/// Errors from an attack; none of them leave partial state behind
#[derive(Debug, Error)]
pub enum BattleError {
    #[error("character {0} not found")]
    CharacterNotFound(i64),

    #[error("no monster available")]
    NoMonsterAvailable,

    #[error("monster {0} defeated without recorded participants")]
    EmptyParticipants(i64),

    #[error("store failure: {0}")]
    Store(#[from] sqlx::Error),
}

/// Runs attack transactions against the monster queue
pub struct BattleEngine {
    pool: SqlitePool,
    strategies: StrategyTable,
    rng: Mutex<StdRng>,
}

impl BattleEngine {
    /// Create an engine with an OS-seeded random source
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_rng(pool, StdRng::from_os_rng())
    }

    /// Create an engine whose rolls are reproducible
    pub fn with_seed(pool: SqlitePool, seed: u64) -> Self {
        Self::with_rng(pool, StdRng::seed_from_u64(seed))
    }

    fn with_rng(pool: SqlitePool, rng: StdRng) -> Self {
        Self {
            pool,
            strategies: StrategyTable::new(),
            rng: Mutex::new(rng),
        }
    }

    /// Replace the class dispatch table
    pub fn with_strategies(mut self, strategies: StrategyTable) -> Self {
        self.strategies = strategies;
        self
    }

    /// Attack the current monster on behalf of a character
    pub async fn attack(&self, character_id: i64) -> Result<BattleReport, BattleError> {
        let mut tx = begin_write(&self.pool).await?;

        // Fetch attacker and target
        let attacker = store::get_character(&mut tx, character_id)
            .await?
            .ok_or(BattleError::CharacterNotFound(character_id))?;
        let mut monster = store::get_current_monster(&mut tx)
            .await?
            .ok_or(BattleError::NoMonsterAvailable)?;

        debug!(
            "Character {} attacks monster {} '{}' ({} HP)",
            attacker.id, monster.id, monster.name, monster.current_hp
        );

        // Resolve through the class strategy
        let outcome = match self.strategies.get(&attacker.class) {
            Some(strategy) => {
                let mut rng = self.rng.lock();
                Some(strategy.resolve(&attacker, &mut monster, &mut *rng))
            }
            None => None,
        };

        let mut report = BattleReport::new();
        let mut defeated = false;
        match outcome {
            Some(outcome) => {
                store::save_monster_hp(&mut tx, monster.id, monster.current_hp).await?;
                info!(
                    "Character {} dealt {} damage to monster {} ({} HP left)",
                    attacker.id, outcome.damage, monster.id, monster.current_hp
                );
                defeated = outcome.defeated;
                report.push(outcome.line);
            }
            None => warn!(
                "Character {} has class '{}' with no attack; recording participation only",
                attacker.id,
                attacker.class.as_str()
            ),
        }

        // Every attack counts as participation, even one without effect
        store::insert_participation(&mut tx, monster.id, attacker.id).await?;

        if defeated {
            let settlement = settle_victory(&mut tx, &monster).await?;
            report.extend(settlement.lines);
        }

        tx.commit().await?;
        Ok(report)
    }
}
