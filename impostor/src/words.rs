//! Secret word selection.
//!
//! A [`WordSource`] hands out a secret word for a knowledge level. The
//! default [`WordBank`] is loaded from a JSON file with one array per
//! category and falls back to built-in lists when the file is missing,
//! unreadable or has empty categories, so drawing a word never fails.

use log::{debug, warn};
use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use thiserror::Error;

use crate::game::config::KnowledgeLevel;

/// Word used when nothing else is available.
pub const FALLBACK_WORD: &str = "APPEL";

/// Drawn from whenever the requested category is empty.
pub const DEFAULT_WORDS: [&str; 5] = ["APPEL", "BOEK", "HUIS", "AUTO", "BED"];

const BUILTIN_LITTLE: [&str; 10] = [
    "APPEL", "BOEK", "HUIS", "AUTO", "BED", "DEUR", "TAS", "STOEL", "TAFEL", "FIETS",
];

const BUILTIN_SOME: [&str; 20] = [
    "APPEL", "BOEK", "HUIS", "AUTO", "BED", "DEUR", "TAS", "STOEL", "TAFEL", "FIETS", "HOND",
    "KAT", "BLOEM", "BOOM", "WATER", "MELK", "BROOD", "KAAS", "VLEES", "VIS",
];

/// Supplies the secret word for a new game.
pub trait WordSource {
    /// Must return a non-empty word for every level.
    fn word_for<R: Rng + ?Sized>(&self, level: KnowledgeLevel, rng: &mut R) -> String;
}

/// Errors that can occur while loading a word file
#[derive(Debug, Error)]
pub enum WordsError {
    #[error("can't read word file: {0}")]
    Io(#[from] io::Error),
    #[error("can't parse word file: {0}")]
    Parse(#[from] serde_json::Error),
}

fn default_words() -> Vec<String> {
    DEFAULT_WORDS.iter().map(ToString::to_string).collect()
}

/// Word lists per knowledge level.
///
/// The JSON keys are `none`, `little` and `some`. Older files using
/// `niets`, `heel_klein_beetje` and `een_beetje` are read as well. A
/// missing `none` list is empty, missing `little`/`some` lists get
/// [`DEFAULT_WORDS`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct WordBank {
    #[serde(default, alias = "niets")]
    none: Vec<String>,
    #[serde(default = "default_words", alias = "heel_klein_beetje")]
    little: Vec<String>,
    #[serde(default = "default_words", alias = "een_beetje")]
    some: Vec<String>,
}

impl Default for WordBank {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WordBank {
    /// Word lists compiled into the crate.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            none: Vec::new(),
            little: BUILTIN_LITTLE.iter().map(ToString::to_string).collect(),
            some: BUILTIN_SOME.iter().map(ToString::to_string).collect(),
        }
    }

    /// # Errors
    ///
    /// Returns [`WordsError::Parse`] if `json` isn't an object of word
    /// arrays.
    pub fn from_json(json: &str) -> Result<Self, WordsError> {
        let mut bank: Self = serde_json::from_str(json)?;
        for list in [&mut bank.none, &mut bank.little, &mut bank.some] {
            list.retain(|word| !word.trim().is_empty());
        }
        Ok(bank)
    }

    /// # Errors
    ///
    /// Returns [`WordsError`] if the file can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WordsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Like [`WordBank::load`], but falls back to [`WordBank::builtin`].
    #[must_use]
    pub fn load_or_builtin(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(bank) => {
                debug!("loaded word bank from {}", path.display());
                bank
            }
            Err(error) => {
                warn!("{error}; using built-in words");
                Self::builtin()
            }
        }
    }

    #[must_use]
    pub fn words(&self, level: KnowledgeLevel) -> &[String] {
        match level {
            KnowledgeLevel::None => &self.none,
            KnowledgeLevel::Little => &self.little,
            KnowledgeLevel::Some => &self.some,
        }
    }
}

impl WordSource for WordBank {
    fn word_for<R: Rng + ?Sized>(&self, level: KnowledgeLevel, rng: &mut R) -> String {
        if let Some(word) = self.words(level).choose(rng) {
            return word.clone();
        }

        warn!("no words for knowledge level {level}; using default words");
        DEFAULT_WORDS
            .choose(rng)
            .copied()
            .unwrap_or(FALLBACK_WORD)
            .to_string()
    }
}

/// Always hands out the same word. Used when no word file is configured
/// at all, and handy in tests.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FixedWord(pub String);

impl Default for FixedWord {
    fn default() -> Self {
        Self(FALLBACK_WORD.to_string())
    }
}

impl WordSource for FixedWord {
    fn word_for<R: Rng + ?Sized>(&self, _level: KnowledgeLevel, _rng: &mut R) -> String {
        self.0.clone()
    }
}
