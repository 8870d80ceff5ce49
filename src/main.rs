//! airpg - game master command line
//!
//! Runs one game command and prints the text the chat bot would send.

use std::path::PathBuf;

use airpg::store::{MonsterSpec, Stat};
use airpg::{BattleError, Config, GameMaster, StoreError};
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// airpg game master
#[derive(Parser, Debug)]
#[command(name = "airpg", version, about = "Chat-bot game master")]
struct Cli {
    /// Configuration file (defaults to airpg.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a character for a player
    Join { id: i64 },
    /// List every character with its level
    Characters,
    /// Show a character sheet
    Character { id: i64 },
    /// Show the current monster
    Watch,
    /// Attack the current monster
    Hit { id: i64 },
    /// Queue a monster: Name_XP_str_agi_wis_con
    Spawn { spec: String },
    /// Spend skill points on a stat
    Up { id: i64, stat: String, amount: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let gm = GameMaster::new(config).await?;
    let reply = run(&gm, cli.command).await?;
    println!("{}", reply.trim_end());

    Ok(())
}

/// Execute a command, translating game errors into player-facing text
async fn run(gm: &GameMaster, command: Command) -> Result<String> {
    let store = gm.store();

    let reply = match command {
        Command::Join { id } => match store.create_character(id).await {
            Ok(_) => format!("{} a rejoint l'aventure !", airpg::game::mention(id)),
            Err(StoreError::CharacterExists(_)) => "Vous avez déjà rejoint l'aventure.".to_string(),
            Err(e) => {
                error!("cannot create character: {}", e);
                "Impossible de créer le personnage...".to_string()
            }
        },
        Command::Characters => store.roster().await?,
        Command::Character { id } => match store.character(id).await? {
            Some(c) => c.to_string(),
            None => "Vous devez d'abord rejoindre l'aventure en tapant !join_adventure".to_string(),
        },
        Command::Watch => match store.current_monster().await? {
            Some(m) => m.to_string(),
            None => "Il n'y a plus de monstre... pour l'instant !".to_string(),
        },
        Command::Hit { id } => match gm.engine().attack(id).await {
            Ok(report) => report.to_string(),
            Err(BattleError::CharacterNotFound(_)) => {
                "Vous devez d'abord rejoindre l'aventure en tapant !join_adventure".to_string()
            }
            Err(BattleError::NoMonsterAvailable) => {
                "Il n'y a plus de monstre... pour l'instant !".to_string()
            }
            Err(e) => {
                error!("cannot attack monster: {}", e);
                "Impossible d'attaquer.".to_string()
            }
        },
        Command::Spawn { spec } => {
            let spec: MonsterSpec = spec.parse().map_err(|e: String| anyhow!(e))?;
            store.spawn_monster(&spec).await?;
            "Monster spawned".to_string()
        }
        Command::Up { id, stat, amount } => {
            let stat: Stat = stat.parse().map_err(|e: String| anyhow!(e))?;
            match store.allocate_skill_points(id, stat, amount).await {
                Ok(_) => "Répartition effectuée !".to_string(),
                Err(StoreError::InvalidAmount(_)) => {
                    "Mauvaise syntaxe, essayez un nombre positif".to_string()
                }
                Err(e) => {
                    error!("cannot upgrade stat: {}", e);
                    "Répartition impossible.".to_string()
                }
            }
        }
    };

    Ok(reply)
}
