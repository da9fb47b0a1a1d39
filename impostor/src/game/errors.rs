//! Engine error types.

use thiserror::Error;

/// Rejected game configuration. Raised before any role is handed out.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConfigError {
    #[error("need {min} to {max} players, got {count}")]
    InvalidPlayerCount { count: usize, min: usize, max: usize },
    #[error("need {min} to {max} impostors for {players} players, got {count}")]
    InvalidImpostorCount {
        count: usize,
        min: usize,
        max: usize,
        players: usize,
    },
    #[error("unknown knowledge level '{0}' (expected none, little or some)")]
    UnknownKnowledgeLevel(String),
}

/// Rejected player name.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum NameError {
    #[error("name can't be empty")]
    Empty,
    #[error("name is longer than {max} characters")]
    TooLong { max: usize },
}

/// Errors raised by engine operations. None of these leave the record
/// half-modified: every check runs before the first mutation.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GameError {
    #[error("game has already ended")]
    GameEnded,
    #[error("roles have already been assigned")]
    RolesAlreadyAssigned,
    #[error("roles haven't been assigned yet")]
    RolesNotAssigned,
    #[error("{0} is not in the game")]
    PlayerNotFound(String),
    #[error("player index {0} out of bounds")]
    InvalidPlayerIndex(usize),
    #[error("need {expected} player names, got {got}")]
    PlayerCountMismatch { expected: usize, got: usize },
    #[error("player {position}: {source}")]
    InvalidPlayerName { position: usize, source: NameError },
    #[error("no players left")]
    NoPlayersRemaining,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid game state: {0}")]
    InconsistentState(String),
}

impl GameError {
    /// Whether the error comes from calling an operation at the wrong point
    /// in the game (as opposed to bad input or a corrupt record).
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::GameEnded
                | Self::RolesAlreadyAssigned
                | Self::RolesNotAssigned
                | Self::PlayerNotFound(_)
                | Self::InvalidPlayerIndex(_)
                | Self::NoPlayersRemaining
        )
    }
}

/// Result type for engine operations
pub type GameResult<T> = Result<T, GameError>;
