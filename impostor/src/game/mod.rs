//! Game engine: configuration, role assignment, turns, votes and win
//! conditions.
//!
//! - [`config`]: table size, impostor count and knowledge level
//! - [`entities`]: names, roles, vote outcomes and status views
//! - [`engine`]: the [`GameRecord`] and its operations
//! - [`errors`]: configuration and precondition errors

pub mod config;
pub mod constants;
pub mod engine;
pub mod entities;
pub mod errors;

pub use config::{GameConfig, KnowledgeLevel};
pub use engine::{GameRecord, shuffled_roles};
pub use entities::{GameStatus, PlayerName, Role, RoleReveal, VoteResult, Winner};
pub use errors::{ConfigError, GameError, GameResult, NameError};
