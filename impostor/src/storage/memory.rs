//! In-memory store.

use log::debug;
use std::{collections::HashMap, io};

use super::{GAME_STATE_KEY, GameStore, StoreResult, decode, encode};
use crate::game::GameRecord;

/// Keeps serialized records in a map, so loads go through the same
/// decoding and validation as a real store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `store`/`clear` fail, to simulate a full or
    /// read-only backend.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// The raw stored blob, if any.
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        self.blobs.get(GAME_STATE_KEY).map(String::as_str)
    }

    /// Put an arbitrary blob in place of the stored record.
    pub fn insert_raw(&mut self, blob: impl Into<String>) {
        self.blobs.insert(GAME_STATE_KEY.to_string(), blob.into());
    }

    fn check_writable(&self) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::other("memory store is rejecting writes"));
        }
        Ok(())
    }
}

impl GameStore for MemoryStore {
    fn load(&self) -> StoreResult<Option<GameRecord>> {
        self.raw().map(decode).transpose()
    }

    fn store(&mut self, record: &GameRecord) -> StoreResult<()> {
        self.check_writable()?;
        let blob = encode(record)?;
        debug!("storing {} bytes under {GAME_STATE_KEY}", blob.len());
        self.blobs.insert(GAME_STATE_KEY.to_string(), blob);
        Ok(())
    }

    fn clear(&mut self) -> StoreResult<()> {
        self.check_writable()?;
        self.blobs.remove(GAME_STATE_KEY);
        Ok(())
    }
}
