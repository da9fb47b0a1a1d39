//! Game configuration, fixed once roles are handed out.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::constants::{
    DEFAULT_IMPOSTORS, DEFAULT_PLAYERS, MAX_PLAYERS, MIN_IMPOSTORS, MIN_PLAYERS, max_impostors,
};
use super::errors::ConfigError;

/// How much the impostors are allowed to know. Picks the word category the
/// secret word is drawn from.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeLevel {
    #[default]
    #[serde(alias = "nothing")]
    None,
    Little,
    Some,
}

impl KnowledgeLevel {
    pub const ALL: [Self; 3] = [Self::None, Self::Little, Self::Some];
}

impl fmt::Display for KnowledgeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::None => "none",
            Self::Little => "little",
            Self::Some => "some",
        };
        write!(f, "{repr}")
    }
}

impl FromStr for KnowledgeLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "nothing" => Ok(Self::None),
            "little" => Ok(Self::Little),
            "some" => Ok(Self::Some),
            other => Err(ConfigError::UnknownKnowledgeLevel(other.to_string())),
        }
    }
}

/// Table size, impostor count and knowledge level for one game.
///
/// Only constructible through [`GameConfig::new`], which enforces
/// `3 <= player_count <= 20` and `1 <= impostor_count <= player_count / 2`.
/// A deserialized config is re-checked with [`GameConfig::validate`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameConfig {
    player_count: usize,
    impostor_count: usize,
    knowledge: KnowledgeLevel,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: DEFAULT_PLAYERS,
            impostor_count: DEFAULT_IMPOSTORS,
            knowledge: KnowledgeLevel::default(),
        }
    }
}

impl GameConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either count is out of range.
    pub fn new(
        player_count: usize,
        impostor_count: usize,
        knowledge: KnowledgeLevel,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            player_count,
            impostor_count,
            knowledge,
        };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] if either count is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(ConfigError::InvalidPlayerCount {
                count: self.player_count,
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
            });
        }

        let max = max_impostors(self.player_count);
        if !(MIN_IMPOSTORS..=max).contains(&self.impostor_count) {
            return Err(ConfigError::InvalidImpostorCount {
                count: self.impostor_count,
                min: MIN_IMPOSTORS,
                max,
                players: self.player_count,
            });
        }

        Ok(())
    }

    #[must_use]
    pub const fn player_count(&self) -> usize {
        self.player_count
    }

    #[must_use]
    pub const fn impostor_count(&self) -> usize {
        self.impostor_count
    }

    #[must_use]
    pub const fn crewmate_count(&self) -> usize {
        self.player_count - self.impostor_count
    }

    #[must_use]
    pub const fn knowledge(&self) -> KnowledgeLevel {
        self.knowledge
    }
}
