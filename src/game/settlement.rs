//! Victory settlement: sharing a defeated monster's experience

use sqlx::SqliteConnection;
use tracing::{debug, info};

use super::battle::BattleError;
use super::progression::{level_for_experience, skill_points_granted};
use super::report::ReportLine;
use crate::store::{self, Character, Monster};

/// Outcome of sharing experience among participants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Experience each participant received
    pub shared_experience: i64,
    /// Participants with their updated progress, in input order
    pub participants: Vec<Character>,
    /// Victory line followed by one line per participant
    pub lines: Vec<ReportLine>,
}

impl Settlement {
    /// Experience actually handed out; the division remainder is dropped
    pub fn total_distributed(&self) -> i64 {
        self.shared_experience * self.participants.len() as i64
    }
}

/// Split `monster.experience` evenly and apply level-ups
pub fn distribute_experience(
    monster: &Monster,
    participants: Vec<Character>,
) -> Result<Settlement, BattleError> {
    if participants.is_empty() {
        return Err(BattleError::EmptyParticipants(monster.id));
    }

    let shared_experience = monster.experience / participants.len() as i64;
    let mut lines = Vec::with_capacity(participants.len() + 1);
    lines.push(ReportLine::Victory {
        experience: monster.experience,
    });

    let participants: Vec<Character> = participants
        .into_iter()
        .map(|mut participant| {
            participant.experience += shared_experience;
            let new_level = level_for_experience(participant.experience);

            let mut levels_gained = 0;
            if new_level > participant.level {
                levels_gained = new_level - participant.level;
                participant.level = new_level;
                participant.skill_points += skill_points_granted(levels_gained);
                info!(
                    "Character {} reached level {} (+{} skill points)",
                    participant.id,
                    new_level,
                    skill_points_granted(levels_gained)
                );
            }

            lines.push(ReportLine::Participant {
                character_id: participant.id,
                levels_gained,
            });
            participant
        })
        .collect();

    Ok(Settlement {
        shared_experience,
        participants,
        lines,
    })
}

/// Share a defeated monster's experience among everyone who attacked it.
///
/// Runs on the caller's transaction; every participant is saved exactly once.
pub async fn settle_victory(
    conn: &mut SqliteConnection,
    monster: &Monster,
) -> Result<Settlement, BattleError> {
    let participants = store::get_participants(conn, monster.id).await?;
    let settlement = distribute_experience(monster, participants)?;

    for participant in &settlement.participants {
        store::save_progress(conn, participant).await?;
        debug!(
            "Saved progress for {}: {} XP, level {}, {} skill points",
            participant.id, participant.experience, participant.level, participant.skill_points
        );
    }

    info!(
        "Monster {} '{}' defeated: {} XP shared by {} participant(s), {} each",
        monster.id,
        monster.name,
        monster.experience,
        settlement.participants.len(),
        settlement.shared_experience
    );
    Ok(settlement)
}
