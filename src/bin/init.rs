//! airpg_init - One-time database initialization tool
//!
//! Creates a fresh game database, optionally with a first monster queued.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use airpg::store::MonsterSpec;

/// airpg database initialization tool
#[derive(Parser, Debug)]
#[command(name = "airpg_init", version, about = "Initialize a new airpg database")]
struct Args {
    /// Path to SQLite database file to create (must not exist)
    #[arg(short, long)]
    database: PathBuf,

    /// First monster to spawn, as Name_XP_str_agi_wis_con
    #[arg(long)]
    monster: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "airpg=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI arguments
    let args = Args::parse();

    let monster = args
        .monster
        .as_deref()
        .map(|s| s.parse::<MonsterSpec>().map_err(|e| anyhow!(e)))
        .transpose()?;

    airpg::init::init_database(&args.database, monster.as_ref()).await?;

    Ok(())
}
