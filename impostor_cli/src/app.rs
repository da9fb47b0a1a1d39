//! Pass-the-device game loop.
//!
//! Reads lines from any [`BufRead`] and writes to any [`Write`], so a whole
//! game can be scripted in tests.

use anyhow::{Result, bail};
use impostor::{
    GameConfig, GameRecord, GameSession, GameStore, KnowledgeLevel, PlayerName, SessionResult,
    WordSource,
};
use log::{debug, warn};
use rand::Rng;
use std::{
    fmt::Display,
    io::{BufRead, Write},
};

use crate::commands::{Command, parse_command};

/// Blank lines printed to push a revealed role off screen.
const HIDE_LINES: usize = 40;

pub const COMMANDS_HELP: &str = "\
COMMANDS:
  next, n, <Enter>  Hand the device to the next player
  vote NAME         Vote NAME out of the game
  continue, c       Start the next round after a vote
  status, s         Show who is left
  save              Retry after a failed save
  replay            Play again with the same players (after the game)
  new               Start over with new settings and names
  help              Show this help
  quit, q           Leave; the game stays saved
";

/// Line-based terminal.
pub struct Terminal<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Terminal<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> O {
        self.output
    }

    fn say(&mut self, message: impl Display) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    /// `None` once input is exhausted.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn hide(&mut self) -> Result<()> {
        self.say("\n".repeat(HIDE_LINES))
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Play until the players quit or input runs out.
///
/// Starts a game with `config` when the session has none. A resumed
/// session picks up where it left off. Before the first turn the save can't
/// tell whether every role was seen, so the reveal is offered again.
///
/// # Errors
///
/// Fails on terminal I/O errors.
pub fn run<S, W, R, I, O>(
    session: &mut GameSession<S, W, R>,
    config: GameConfig,
    term: &mut Terminal<I, O>,
) -> Result<()>
where
    S: GameStore,
    W: WordSource,
    R: Rng,
    I: BufRead,
    O: Write,
{
    if session.record().is_some_and(before_first_turn) {
        let Some(answer) = term.prompt("Show everyone their role again? [y/N] ")? else {
            return Ok(());
        };
        if matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes") {
            if let Flow::Quit = reveal_roles(session, term)? {
                return Ok(());
            }
        }
    }

    let mut config = config;
    loop {
        if session.record().is_none() {
            settle(session.configure(config), term)?;
        }

        let has_roles = session.record().is_some_and(|record| record.has_roles());
        if !has_roles {
            if let Flow::Quit = setup(session, term)? {
                return Ok(());
            }
            term.say(COMMANDS_HELP)?;
        }

        match play(session, term)? {
            Flow::Quit => return Ok(()),
            Flow::Continue => {}
        }

        if session.record().is_none() {
            match ask_config(config, term)? {
                Some(next) => config = next,
                None => return Ok(()),
            }
        }
    }
}

fn before_first_turn(record: &GameRecord) -> bool {
    record.has_roles()
        && !record.is_ended()
        && record.round() == 1
        && record.turn_index() == 0
        && record.last_vote_result().is_none()
}

/// Collect names, hand out roles and show each player theirs.
fn setup<S, W, R, I, O>(session: &mut GameSession<S, W, R>, term: &mut Terminal<I, O>) -> Result<Flow>
where
    S: GameStore,
    W: WordSource,
    R: Rng,
    I: BufRead,
    O: Write,
{
    let Some(count) = session
        .record()
        .map(|record| record.config().player_count())
    else {
        bail!("no game to set up");
    };

    let mut names = Vec::with_capacity(count);
    while names.len() < count {
        let question = format!("Name of player {}: ", names.len() + 1);
        let Some(line) = term.prompt(&question)? else {
            return Ok(Flow::Quit);
        };
        match PlayerName::try_from(line.as_str()) {
            Ok(name) => names.push(name),
            Err(err) => term.say(format!("Invalid name: {err}"))?,
        }
    }

    settle(session.set_players(names.iter().map(PlayerName::as_str)), term)?;
    settle(session.assign_roles(), term)?;
    if !session.record().is_some_and(|record| record.has_roles()) {
        bail!("couldn't hand out roles");
    }

    reveal_roles(session, term)
}

fn reveal_roles<S, W, R, I, O>(
    session: &GameSession<S, W, R>,
    term: &mut Terminal<I, O>,
) -> Result<Flow>
where
    S: GameStore,
    W: WordSource,
    R: Rng,
    I: BufRead,
    O: Write,
{
    let players: Vec<String> = session
        .record()
        .map(|record| record.players().iter().map(ToString::to_string).collect())
        .unwrap_or_default();

    for (idx, name) in players.iter().enumerate() {
        let handoff = format!("Pass the device to {name} and press Enter ");
        if term.prompt(&handoff)?.is_none() {
            return Ok(Flow::Quit);
        }
        term.say(session.reveal_role(idx)?)?;
        if term.prompt("Press Enter to hide ")?.is_none() {
            return Ok(Flow::Quit);
        }
        term.hide()?;
    }

    debug!("all {} roles revealed", players.len());
    Ok(Flow::Continue)
}

/// The turn and vote loop, through the end screen.
fn play<S, W, R, I, O>(session: &mut GameSession<S, W, R>, term: &mut Terminal<I, O>) -> Result<Flow>
where
    S: GameStore,
    W: WordSource,
    R: Rng,
    I: BufRead,
    O: Write,
{
    loop {
        let Some(record) = session.record() else {
            return Ok(Flow::Continue);
        };
        if record.is_ended() {
            return end_screen(session, term);
        }

        let player = record
            .current_player()
            .map_or_else(String::new, ToString::to_string);
        let round = record.round();
        let left = record.players().len();

        let Some(line) = term.prompt(&format!("[round {round}] {player}'s turn> "))? else {
            return Ok(Flow::Quit);
        };
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                term.say(err)?;
                continue;
            }
        };

        match command {
            Command::Next => {
                settle(session.advance_turn(), term)?;
                if let Some(record) = session.record() {
                    if record.round() != round {
                        term.say(format!("Everyone had a turn. Round {} starts.", record.round()))?;
                    }
                }
            }
            Command::Vote(name) => {
                settle(session.resolve_vote(&name), term)?;
                if let Some(record) = session.record() {
                    if record.players().len() < left {
                        if let Some(vote) = record.last_vote_result() {
                            term.say(format!("{vote}."))?;
                        }
                        if !record.is_ended() {
                            term.say("Type 'continue' for the next round.")?;
                        }
                    }
                }
            }
            Command::Continue => {
                settle(session.start_next_round(), term)?;
            }
            Command::Status => show_status(session, term)?,
            Command::Save => save(session, term)?,
            Command::Replay => term.say("Finish this game first, or type 'new'.")?,
            Command::New => {
                settle(session.replay_new(), term)?;
                return Ok(Flow::Continue);
            }
            Command::Help => term.say(COMMANDS_HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
    }
}

fn end_screen<S, W, R, I, O>(
    session: &mut GameSession<S, W, R>,
    term: &mut Terminal<I, O>,
) -> Result<Flow>
where
    S: GameStore,
    W: WordSource,
    R: Rng,
    I: BufRead,
    O: Write,
{
    if let Some(record) = session.record() {
        if let Some(winner) = record.winner() {
            term.say(format!("Game over: {winner}!"))?;
        }
        term.say(format!("The word was {}.", record.secret_word()))?;
        for (name, role) in record.final_roles() {
            term.say(format!("  {name}: {role}"))?;
        }
    }

    loop {
        let Some(line) = term.prompt("Play again? [replay/new/quit] ")? else {
            return Ok(Flow::Quit);
        };
        match parse_command(&line) {
            Ok(Command::Replay) => {
                if settle(session.replay_same_players(), term)?.is_some()
                    || session.record().is_some_and(|record| !record.is_ended())
                {
                    return reveal_roles(session, term);
                }
            }
            Ok(Command::New) => {
                settle(session.replay_new(), term)?;
                return Ok(Flow::Continue);
            }
            Ok(Command::Quit) => return Ok(Flow::Quit),
            Ok(Command::Status) => show_status(session, term)?,
            Ok(Command::Save) => save(session, term)?,
            Ok(_) => term.say("The game is over.")?,
            Err(err) => term.say(err)?,
        }
    }
}

/// Ask for settings for a fresh game. Blank answers keep `current`.
fn ask_config<I: BufRead, O: Write>(
    current: GameConfig,
    term: &mut Terminal<I, O>,
) -> Result<Option<GameConfig>> {
    loop {
        let Some(players) = ask(term, "Players", current.player_count())? else {
            return Ok(None);
        };
        let Some(impostors) = ask(term, "Impostors", current.impostor_count())? else {
            return Ok(None);
        };
        let Some(knowledge) = ask::<KnowledgeLevel, _, _>(
            term,
            "Knowledge (none/little/some)",
            current.knowledge(),
        )?
        else {
            return Ok(None);
        };

        match GameConfig::new(players, impostors, knowledge) {
            Ok(config) => return Ok(Some(config)),
            Err(err) => term.say(err)?,
        }
    }
}

/// Prompt until the answer parses. `None` once input runs out.
fn ask<T, I, O>(term: &mut Terminal<I, O>, label: &str, default: T) -> Result<Option<T>>
where
    T: std::str::FromStr + Display + Copy,
    I: BufRead,
    O: Write,
{
    loop {
        let Some(line) = term.prompt(&format!("{label} [{default}]: "))? else {
            return Ok(None);
        };
        if line.is_empty() {
            return Ok(Some(default));
        }
        match line.parse() {
            Ok(value) => return Ok(Some(value)),
            Err(_) => term.say(format!("'{line}' isn't a valid answer"))?,
        }
    }
}

fn show_status<S, W, R, I, O>(
    session: &GameSession<S, W, R>,
    term: &mut Terminal<I, O>,
) -> Result<()>
where
    S: GameStore,
    W: WordSource,
    R: Rng,
    I: BufRead,
    O: Write,
{
    match session.status() {
        Ok(status) => {
            term.say(&status)?;
            let names: Vec<&str> = status.players.iter().map(PlayerName::as_str).collect();
            term.say(format!("players: {}", names.join(", ")))?;
        }
        Err(err) => term.say(err.client_message())?,
    }
    if session.has_unsaved_changes() {
        term.say("(not saved yet, type 'save' to retry)")?;
    }
    Ok(())
}

fn save<S, W, R, I, O>(session: &mut GameSession<S, W, R>, term: &mut Terminal<I, O>) -> Result<()>
where
    S: GameStore,
    W: WordSource,
    R: Rng,
    I: BufRead,
    O: Write,
{
    if settle(session.save(), term)?.is_some() {
        term.say("Saved.")?;
    }
    Ok(())
}

/// Report a failed operation to the players. Moves that went through but
/// couldn't be saved stay in play.
fn settle<T, I: BufRead, O: Write>(
    result: SessionResult<T>,
    term: &mut Terminal<I, O>,
) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            if err.is_recoverable() {
                warn!("{err}");
            }
            term.say(err.client_message())?;
            Ok(None)
        }
    }
}
