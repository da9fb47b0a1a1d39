//! JSON file store.

use log::debug;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use super::{GAME_STATE_KEY, GameStore, StoreResult, decode, encode};
use crate::game::GameRecord;

/// Stores the game as `<dir>/game_state.json`.
///
/// Writes go to a sibling temp file that is renamed over the real one, so
/// a reader never sees a half-written record.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let path = dir.join(format!("{GAME_STATE_KEY}.json"));
        Self { dir, path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl GameStore for FileStore {
    fn load(&self) -> StoreResult<Option<GameRecord>> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => decode(&blob).map(Some),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn store(&mut self, record: &GameRecord) -> StoreResult<()> {
        let blob = encode(record)?;
        fs::create_dir_all(&self.dir)?;

        let temp = self.temp_path();
        fs::write(&temp, blob.as_bytes())?;
        fs::rename(&temp, &self.path)?;

        debug!("saved game to {}", self.path.display());
        Ok(())
    }

    fn clear(&mut self) -> StoreResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("removed {}", self.path.display());
                Ok(())
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}
