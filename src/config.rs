//! Configuration
//!
//! Layered with figment: built-in defaults, then an optional TOML file, then
//! `AIRPG_`-prefixed environment variables (e.g. `AIRPG_DB_PATH`).

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "airpg.toml";

/// Game master configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file; None = in-memory
    pub db_path: Option<String>,
    /// Tracing filter used when RUST_LOG is unset
    pub log_filter: String,
    /// Fixed seed for combat rolls
    pub rng_seed: Option<u64>,
    /// Connection pool size for file databases
    pub max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None, // None = in-memory
            log_filter: "airpg=info".to_string(),
            rng_seed: None,
            max_connections: 10,
        }
    }
}

impl Config {
    /// Build the layered figment for a config file
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("AIRPG_"))
    }

    /// Load configuration; a missing file is not an error
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Self::figment(path).extract()
    }
}
