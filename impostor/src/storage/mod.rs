//! Persistence for the current game.
//!
//! A [`GameStore`] keeps one serialized [`GameRecord`] under a fixed key.
//! The engine never talks to a store directly; the session persists after
//! each mutation.

pub mod errors;
pub mod file;
pub mod memory;

pub use errors::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::game::GameRecord;

/// Key the current game is stored under.
pub const GAME_STATE_KEY: &str = "game_state";

/// Load/store/clear of the single current game.
pub trait GameStore {
    /// `Ok(None)` if nothing is stored.
    fn load(&self) -> StoreResult<Option<GameRecord>>;

    /// Replace whatever is stored. Either the whole record is stored or
    /// nothing changes.
    fn store(&mut self, record: &GameRecord) -> StoreResult<()>;

    /// Remove the stored record. Clearing an empty store succeeds.
    fn clear(&mut self) -> StoreResult<()>;
}

impl<T: GameStore + ?Sized> GameStore for Box<T> {
    fn load(&self) -> StoreResult<Option<GameRecord>> {
        (**self).load()
    }

    fn store(&mut self, record: &GameRecord) -> StoreResult<()> {
        (**self).store(record)
    }

    fn clear(&mut self) -> StoreResult<()> {
        (**self).clear()
    }
}

pub(crate) fn encode(record: &GameRecord) -> StoreResult<String> {
    Ok(serde_json::to_string(record)?)
}

/// Parse a stored blob and make sure it describes a game the engine can
/// continue.
pub(crate) fn decode(blob: &str) -> StoreResult<GameRecord> {
    let record: GameRecord = serde_json::from_str(blob)?;
    record
        .check_invariants()
        .map_err(StoreError::InvalidRecord)?;
    Ok(record)
}
