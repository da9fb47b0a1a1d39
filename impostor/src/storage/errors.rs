//! Storage error types.

use std::io;
use thiserror::Error;

use crate::game::GameError;

/// Storage errors. Always recoverable: the in-memory game is untouched
/// and the caller may retry or tell the players.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("stored game is invalid: {0}")]
    InvalidRecord(GameError),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;
