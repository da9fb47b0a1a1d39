use std::fmt;

/// Something typed at the game prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Pass the device to the next player.
    Next,
    /// Vote a player out.
    Vote(String),
    /// Start the next round after a vote.
    Continue,
    Status,
    /// Retry a failed save.
    Save,
    /// Play again with the same players.
    Replay,
    /// Start over with new settings and names.
    New,
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Vote command without a name.
    VoteMissingName,
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VoteMissingName => write!(f, "Who? Type 'vote' and a name (e.g., 'vote alice')"),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{cmd}'. Type 'help' to see available commands"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a line typed at the game prompt.
///
/// Keywords are case-insensitive. Everything after `vote` is the name, so
/// names may contain spaces.
///
/// # Examples
///
/// ```
/// use impostor_cli::commands::{Command, parse_command};
///
/// assert_eq!(parse_command("next"), Ok(Command::Next));
/// assert_eq!(parse_command("vote Anna Lee"), Ok(Command::Vote("Anna Lee".to_string())));
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();
    let (keyword, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (trimmed, ""),
    };

    match keyword.to_lowercase().as_str() {
        "vote" | "v" if rest.is_empty() => Err(ParseError::VoteMissingName),
        "vote" | "v" => Ok(Command::Vote(rest.to_string())),
        _ if !rest.is_empty() => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
        "next" | "n" | "" => Ok(Command::Next),
        "continue" | "c" => Ok(Command::Continue),
        "status" | "s" => Ok(Command::Status),
        "save" => Ok(Command::Save),
        "replay" => Ok(Command::Replay),
        "new" => Ok(Command::New),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}
