//! Pass-the-device impostor game for the terminal.
//!
//! Everyone shares one screen. The device goes round the table so each
//! player can see their role in private, then the table plays out loud and
//! types in the votes.

use anyhow::{Context, Result};
use impostor::{FileStore, GameSession, WordBank};
use impostor_cli::{
    app::{self, COMMANDS_HELP, Terminal},
    config::{CliArgs, CliConfig},
};
use log::info;
use pico_args::Arguments;
use rand::{SeedableRng, rngs::StdRng};
use std::io;

const HELP: &str = "\
Play the impostor word game on one shared device

USAGE:
  impostor_cli [OPTIONS]

OPTIONS:
  --players    N          Players at the table (3-20)  [default: env IMPOSTOR_PLAYERS or 5]
  --impostors  N          Impostors among them          [default: env IMPOSTOR_IMPOSTORS or 1]
  --knowledge  LEVEL      none, little or some          [default: env IMPOSTOR_KNOWLEDGE or none]
  --words      PATH       JSON word list                [default: env IMPOSTOR_WORDS or built-in]
  --save-dir   DIR        Where the game is saved       [default: env IMPOSTOR_SAVE_DIR or .impostor]
  --seed       N          Seed for a reproducible game  [default: env IMPOSTOR_SEED or random]

FLAGS:
  --resume                Continue the saved game
  -h, --help              Print help information

ENVIRONMENT:
  RUST_LOG                Log level  [default: warn]
";

fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}\n{COMMANDS_HELP}");
        std::process::exit(0);
    }

    let args = CliArgs {
        players: pargs.opt_value_from_str("--players")?,
        impostors: pargs.opt_value_from_str("--impostors")?,
        knowledge: pargs.opt_value_from_str("--knowledge")?,
        words: pargs.opt_value_from_str("--words")?,
        save_dir: pargs.opt_value_from_str("--save-dir")?,
        seed: pargs.opt_value_from_str("--seed")?,
        resume: pargs.contains("--resume"),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_target(false)
        .init();

    let config = CliConfig::from_env(args)?;
    let game_config = config.game_config()?;

    let words = match &config.words {
        Some(path) => WordBank::load_or_builtin(path),
        None => WordBank::builtin(),
    };
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let store = FileStore::new(&config.save_dir);
    info!("saving to {}", store.path().display());

    let mut session = if config.resume {
        GameSession::resume(store, words, rng).context("couldn't resume")?
    } else {
        GameSession::new(store, words, rng)
    };

    let stdin = io::stdin();
    let mut term = Terminal::new(stdin.lock(), io::stdout());
    app::run(&mut session, game_config, &mut term)
}
