//! # Impostor
//!
//! Engine for a pass-the-device word game. Everyone at the table except the
//! impostors learns a secret word; players take turns saying something
//! about it, then vote someone out.
//!
//! The crewmates win once every impostor is voted out. The impostors win
//! as soon as they are at least as many as the crewmates left.
//!
//! ## Core Modules
//!
//! - [`game`]: configuration, the [`GameRecord`] and its operations
//! - [`words`]: where the secret word comes from
//! - [`storage`]: saving and loading the current game
//! - [`session`]: ties a record to a store, a word source and an RNG
//!
//! ## Example
//!
//! ```
//! use impostor::{GameConfig, GameRecord, KnowledgeLevel};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let config = GameConfig::new(3, 1, KnowledgeLevel::Little).unwrap();
//! let mut game = GameRecord::new(config, "BOEK");
//! game.set_players(["ann", "ben", "cas"]).unwrap();
//! game.assign_roles(&mut StdRng::seed_from_u64(1)).unwrap();
//!
//! assert_eq!(game.round(), 1);
//! assert_eq!(game.remaining_impostor_count(), 1);
//! ```

/// Game configuration, entities and the engine.
pub mod game;
pub use game::{
    ConfigError, GameConfig, GameError, GameRecord, GameResult, GameStatus, KnowledgeLevel,
    NameError, PlayerName, Role, RoleReveal, VoteResult, Winner, constants,
};

pub mod session;
pub use session::{GameSession, SessionError, SessionResult};

/// Persistence of the current game.
pub mod storage;
pub use storage::{FileStore, GameStore, MemoryStore, StoreError};

pub mod words;
pub use words::{FixedWord, WordBank, WordSource};
