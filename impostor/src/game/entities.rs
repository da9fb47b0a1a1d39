use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::MAX_NAME_LENGTH;
use super::errors::NameError;

/// A player's display name. Trimmed, non-empty and at most
/// [`MAX_NAME_LENGTH`] characters. Names are not required to be unique.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for PlayerName {
    type Error = NameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let name = value.trim();
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(NameError::TooLong {
                max: MAX_NAME_LENGTH,
            });
        }
        Ok(Self(name.to_string()))
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq<str> for PlayerName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Doesn't know the secret word.
    Impostor,
    /// Knows the secret word.
    Crewmate,
}

impl Role {
    #[must_use]
    pub const fn is_impostor(self) -> bool {
        matches!(self, Self::Impostor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Impostor => "impostor",
            Self::Crewmate => "crewmate",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Crewmates,
    Impostors,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Crewmates => "the crewmates win",
            Self::Impostors => "the impostors win",
        };
        write!(f, "{repr}")
    }
}

/// Outcome of the most recent elimination.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct VoteResult {
    pub voted_player: PlayerName,
    pub was_impostor: bool,
}

impl fmt::Display for VoteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.was_impostor {
            write!(f, "{} was an impostor", self.voted_player)
        } else {
            write!(f, "{} was a crewmate", self.voted_player)
        }
    }
}

/// What a single player is shown when the device is handed to them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RoleReveal {
    Impostor,
    Crewmate { secret_word: String },
}

impl fmt::Display for RoleReveal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Impostor => write!(f, "You are the impostor. You don't know the word."),
            Self::Crewmate { secret_word } => {
                write!(f, "You are not the impostor. The word is: {secret_word}")
            }
        }
    }
}

/// Read-only snapshot of a game for the presentation layer.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameStatus {
    pub round: u32,
    pub turn_index: usize,
    pub current_player: Option<PlayerName>,
    pub players: Vec<PlayerName>,
    pub remaining_impostors: usize,
    pub remaining_crewmates: usize,
    pub last_vote: Option<VoteResult>,
    pub winner: Option<Winner>,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "round {}", self.round)?;
        writeln!(
            f,
            "{} players left: {} impostor(s), {} crewmate(s)",
            self.players.len(),
            self.remaining_impostors,
            self.remaining_crewmates
        )?;
        if let Some(vote) = &self.last_vote {
            writeln!(f, "last vote: {vote}")?;
        }
        match (&self.winner, &self.current_player) {
            (Some(winner), _) => write!(f, "game over, {winner}"),
            (None, Some(player)) => write!(f, "{player}'s turn"),
            (None, None) => write!(f, "waiting for players"),
        }
    }
}
