//! Combat narration
//!
//! Combat and settlement produce structured lines; the text is only joined
//! when the report is displayed.

use std::fmt;

/// Render a player identity as a chat mention
pub fn mention(id: i64) -> String {
    format!("<@{}>", id)
}

/// One line of narration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine {
    /// Damage dealt by an attacker and its breakdown
    Attack {
        attacker_id: i64,
        damage: i64,
        strength: i64,
        agility_bonus: i64,
        monster_agility: i64,
        monster_name: String,
    },
    /// The monster fell and its reward is being shared
    Victory { experience: i64 },
    /// One participant's share, with the number of levels gained
    Participant { character_id: i64, levels_gained: i64 },
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportLine::Attack {
                attacker_id,
                damage,
                strength,
                agility_bonus,
                monster_agility,
                monster_name,
            } => write!(
                f,
                "**{}** inflige {} ({}+{}-{}) points de dégâts à **{}**.",
                mention(*attacker_id),
                damage,
                strength,
                agility_bonus,
                monster_agility,
                monster_name
            ),
            ReportLine::Victory { experience } => write!(
                f,
                "L'adversaire est vaincu ! Le combat rapporte {} points d'expérience partagés entre :",
                experience
            ),
            ReportLine::Participant {
                character_id,
                levels_gained,
            } => {
                write!(f, "- {}", mention(*character_id))?;
                if *levels_gained > 0 {
                    write!(f, ": Gain de niveau ! ")?;
                    if *levels_gained > 1 {
                        write!(f, " x{}", levels_gained)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Narration of one attack command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BattleReport {
    lines: Vec<ReportLine>,
}

impl BattleReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: ReportLine) {
        self.lines.push(line);
    }

    pub fn extend(&mut self, lines: impl IntoIterator<Item = ReportLine>) {
        self.lines.extend(lines);
    }

    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the narrated attack defeated the monster
    pub fn is_victory(&self) -> bool {
        self.lines
            .iter()
            .any(|l| matches!(l, ReportLine::Victory { .. }))
    }
}

impl fmt::Display for BattleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
