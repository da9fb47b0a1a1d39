//! Front end configuration.
//!
//! Values come from command line flags first, then `IMPOSTOR_*` environment
//! variables (a `.env` file is loaded beforehand), then defaults.

use impostor::{
    ConfigError as GameConfigError, GameConfig, KnowledgeLevel,
    constants::{DEFAULT_IMPOSTORS, DEFAULT_PLAYERS},
};
use std::{env, path::PathBuf, str::FromStr};

/// Save directory used when none is configured.
pub const DEFAULT_SAVE_DIR: &str = ".impostor";

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub players: Option<usize>,
    pub impostors: Option<usize>,
    pub knowledge: Option<String>,
    pub words: Option<PathBuf>,
    pub save_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub resume: bool,
}

/// Complete front end configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Players at the table
    pub players: usize,
    /// Impostors among them
    pub impostors: usize,
    /// Word category
    pub knowledge: KnowledgeLevel,
    /// JSON word list; built-in words if unset
    pub words: Option<PathBuf>,
    /// Directory holding the save file
    pub save_dir: PathBuf,
    /// Seed for a reproducible game
    pub seed: Option<u64>,
    /// Continue the saved game instead of starting a new one
    pub resume: bool,
}

impl CliConfig {
    /// Merge `args` with the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable can't be parsed or the
    /// resulting game settings are out of range.
    pub fn from_env(args: CliArgs) -> Result<Self, ConfigError> {
        let players = match args.players {
            Some(players) => players,
            None => parse_env_or("IMPOSTOR_PLAYERS", DEFAULT_PLAYERS)?,
        };
        let impostors = match args.impostors {
            Some(impostors) => impostors,
            None => parse_env_or("IMPOSTOR_IMPOSTORS", DEFAULT_IMPOSTORS)?,
        };

        let knowledge = match args.knowledge.or_else(|| env_value("IMPOSTOR_KNOWLEDGE")) {
            Some(raw) => raw
                .parse::<KnowledgeLevel>()
                .map_err(|err| ConfigError::Invalid {
                    var: "IMPOSTOR_KNOWLEDGE".to_string(),
                    reason: err.to_string(),
                })?,
            None => KnowledgeLevel::default(),
        };

        let words = args
            .words
            .or_else(|| env_value("IMPOSTOR_WORDS").map(PathBuf::from));
        let save_dir = args
            .save_dir
            .or_else(|| env_value("IMPOSTOR_SAVE_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_DIR));

        let seed = match args.seed {
            Some(seed) => Some(seed),
            None => parse_env("IMPOSTOR_SEED")?,
        };

        let config = Self {
            players,
            impostors,
            knowledge,
            words,
            save_dir,
            seed,
            resume: args.resume,
        };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending variable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game_config().map(|_| ())
    }

    /// The game settings, range-checked.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending variable.
    pub fn game_config(&self) -> Result<GameConfig, ConfigError> {
        GameConfig::new(self.players, self.impostors, self.knowledge).map_err(|err| {
            let var = match err {
                GameConfigError::InvalidImpostorCount { .. } => "IMPOSTOR_IMPOSTORS",
                _ => "IMPOSTOR_PLAYERS",
            };
            ConfigError::Invalid {
                var: var.to_string(),
                reason: err.to_string(),
            }
        })
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Value of `key`, treating an empty variable as unset.
fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
{
    env_value(key)
        .map(|value| {
            value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: key.to_string(),
                reason: format!("'{value}' is not a valid number"),
            })
        })
        .transpose()
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
{
    Ok(parse_env(key)?.unwrap_or(default))
}
