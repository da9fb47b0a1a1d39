//! The current game plus the collaborators it needs.
//!
//! [`GameSession`] is what a front end holds on to. Every mutating call
//! runs the engine operation to completion and then persists the whole
//! record. A failed save doesn't undo the move: the session remembers it
//! has unsaved changes and [`GameSession::save`] can be retried.

use log::{info, warn};
use rand::Rng;
use thiserror::Error;

use crate::game::{
    ConfigError, GameConfig, GameError, GameRecord, GameStatus, RoleReveal, VoteResult,
};
use crate::storage::{GameStore, StoreError};
use crate::words::WordSource;

/// Errors surfaced to the front end
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no game in progress")]
    NoActiveGame,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("couldn't save the game: {0}")]
    Store(#[from] StoreError),
    #[error("couldn't load the saved game: {0}")]
    Load(StoreError),
}

impl SessionError {
    /// Storage failures can be retried with [`GameSession::save`]; the game
    /// itself is fine.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// Message safe to show on the shared screen. Storage details stay in
    /// the log.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Store(_) => "Couldn't save the game. Try again.".to_string(),
            Self::Load(_) => "Couldn't load the saved game.".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

pub struct GameSession<S, W, R> {
    store: S,
    words: W,
    rng: R,
    record: Option<GameRecord>,
    unsaved: bool,
}

impl<S, W, R> GameSession<S, W, R>
where
    S: GameStore,
    W: WordSource,
    R: Rng,
{
    /// A session with no game yet. Whatever is in `store` is left alone
    /// until the first save.
    pub fn new(store: S, words: W, rng: R) -> Self {
        Self {
            store,
            words,
            rng,
            record: None,
            unsaved: false,
        }
    }

    /// Pick up the stored game, if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Load`] if the stored game can't be read or
    /// is invalid.
    pub fn resume(store: S, words: W, rng: R) -> SessionResult<Self> {
        let record = store.load().map_err(SessionError::Load)?;
        if let Some(record) = &record {
            info!(
                "resumed game in round {} with {} players",
                record.round(),
                record.players().len()
            );
        }
        Ok(Self {
            store,
            words,
            rng,
            record,
            unsaved: false,
        })
    }

    /// Start a new game with `config`, replacing any current one. Draws
    /// the secret word.
    ///
    /// # Errors
    ///
    /// [`SessionError::Config`] for an invalid config, in which case
    /// nothing changes.
    pub fn configure(&mut self, config: GameConfig) -> SessionResult<&GameRecord> {
        config.validate()?;
        let secret_word = self.words.word_for(config.knowledge(), &mut self.rng);
        self.record = Some(GameRecord::new(config, secret_word));
        self.unsaved = true;
        info!(
            "new game: {} players, {} impostor(s), knowledge {}",
            config.player_count(),
            config.impostor_count(),
            config.knowledge()
        );
        self.save()?;
        self.current()
    }

    /// # Errors
    ///
    /// See [`GameRecord::set_players`].
    pub fn set_players<I, T>(&mut self, names: I) -> SessionResult<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.mutate(|record, _, _| record.set_players(names))
    }

    /// # Errors
    ///
    /// See [`GameRecord::assign_roles`].
    pub fn assign_roles(&mut self) -> SessionResult<()> {
        self.mutate(|record, _, rng| record.assign_roles(rng))
    }

    /// # Errors
    ///
    /// See [`GameRecord::advance_turn`].
    pub fn advance_turn(&mut self) -> SessionResult<bool> {
        self.mutate(|record, _, _| record.advance_turn())
    }

    /// # Errors
    ///
    /// See [`GameRecord::resolve_vote`].
    pub fn resolve_vote(&mut self, voted_player: &str) -> SessionResult<VoteResult> {
        self.mutate(|record, _, _| record.resolve_vote(voted_player))
    }

    /// # Errors
    ///
    /// See [`GameRecord::start_next_round`].
    pub fn start_next_round(&mut self) -> SessionResult<()> {
        self.mutate(|record, _, _| record.start_next_round())
    }

    /// Play again with everyone from the last game.
    ///
    /// # Errors
    ///
    /// See [`GameRecord::replay_same_players`].
    pub fn replay_same_players(&mut self) -> SessionResult<&GameRecord> {
        self.mutate(|record, words, rng| {
            *record = record.replay_same_players(words, rng)?;
            Ok(())
        })?;
        self.current()
    }

    /// Throw the game away entirely. The caller collects a new config and
    /// names afterwards.
    ///
    /// # Errors
    ///
    /// [`SessionError::Store`] if the stored game couldn't be cleared. The
    /// in-memory game is gone either way.
    pub fn replay_new(&mut self) -> SessionResult<()> {
        self.record = None;
        self.unsaved = true;
        info!("game discarded");
        self.save()
    }

    /// Persist the current state (or clear the store if there's no game).
    ///
    /// # Errors
    ///
    /// [`SessionError::Store`] if the store rejects the write.
    pub fn save(&mut self) -> SessionResult<()> {
        let outcome = match &self.record {
            Some(record) => self.store.store(record),
            None => self.store.clear(),
        };
        if let Err(error) = outcome {
            warn!("save failed: {error}");
            return Err(error.into());
        }
        self.unsaved = false;
        Ok(())
    }

    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    #[must_use]
    pub fn record(&self) -> Option<&GameRecord> {
        self.record.as_ref()
    }

    /// # Errors
    ///
    /// [`SessionError::NoActiveGame`] if there's no game.
    pub fn status(&self) -> SessionResult<GameStatus> {
        Ok(self.current()?.status())
    }

    /// # Errors
    ///
    /// [`SessionError::NoActiveGame`], or see [`GameRecord::reveal_role`].
    pub fn reveal_role(&self, idx: usize) -> SessionResult<RoleReveal> {
        Ok(self.current()?.reveal_role(idx)?)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn current(&self) -> SessionResult<&GameRecord> {
        self.record.as_ref().ok_or(SessionError::NoActiveGame)
    }

    /// Run an engine operation, then persist. Engine errors leave both the
    /// record and the store untouched.
    fn mutate<T, F>(&mut self, op: F) -> SessionResult<T>
    where
        F: FnOnce(&mut GameRecord, &W, &mut R) -> Result<T, GameError>,
    {
        let record = self.record.as_mut().ok_or(SessionError::NoActiveGame)?;
        let output = op(record, &self.words, &mut self.rng)?;
        self.unsaved = true;
        self.save()?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::KnowledgeLevel;
    use crate::storage::MemoryStore;
    use crate::words::FixedWord;
    use rand::{SeedableRng, rngs::StdRng};

    type TestSession = GameSession<MemoryStore, FixedWord, StdRng>;

    fn session() -> TestSession {
        GameSession::new(
            MemoryStore::new(),
            FixedWord("HOND".to_string()),
            StdRng::seed_from_u64(12),
        )
    }

    fn started() -> TestSession {
        let mut session = session();
        session
            .configure(GameConfig::new(4, 1, KnowledgeLevel::Little).unwrap())
            .unwrap();
        session.set_players(["ann", "ben", "cas", "dex"]).unwrap();
        session.assign_roles().unwrap();
        session
    }

    #[test]
    fn test_no_game_yet() {
        let mut session = session();
        assert!(matches!(session.advance_turn(), Err(SessionError::NoActiveGame)));
        assert!(matches!(session.status(), Err(SessionError::NoActiveGame)));
    }

    #[test]
    fn test_configure_draws_word_and_persists() {
        let mut session = session();
        let record = session.configure(GameConfig::default()).unwrap();
        assert_eq!(record.secret_word(), "HOND");
        assert!(session.store().raw().is_some());
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let mut session = started();
        session.advance_turn().unwrap();
        let stored = session.store().load().unwrap().unwrap();
        assert_eq!(stored.turn_index(), 1);
        assert_eq!(Some(&stored), session.record());
    }

    #[test]
    fn test_engine_error_does_not_touch_store() {
        let mut session = started();
        let before = session.store().raw().map(str::to_string);
        let err = session.resolve_vote("zed").unwrap_err();
        assert!(matches!(err, SessionError::Game(GameError::PlayerNotFound(_))));
        assert!(!err.is_recoverable());
        assert_eq!(session.store().raw().map(str::to_string), before);
    }

    #[test]
    fn test_store_failure_keeps_mutation_and_can_retry() {
        let mut session = started();
        session.store_mut().set_fail_writes(true);

        let err = session.advance_turn().unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "Couldn't save the game. Try again.");
        assert!(session.has_unsaved_changes());
        assert_eq!(session.record().unwrap().turn_index(), 1);
        assert_eq!(session.store().load().unwrap().unwrap().turn_index(), 0);

        session.store_mut().set_fail_writes(false);
        session.save().unwrap();
        assert!(!session.has_unsaved_changes());
        assert_eq!(session.store().load().unwrap().unwrap().turn_index(), 1);
    }

    #[test]
    fn test_invalid_config_changes_nothing() {
        let mut session = started();
        let before = session.record().cloned();
        let config: GameConfig = serde_json::from_str(
            r#"{"player_count": 30, "impostor_count": 1, "knowledge": "none"}"#,
        )
        .unwrap();
        assert!(matches!(
            session.configure(config),
            Err(SessionError::Config(ConfigError::InvalidPlayerCount { .. }))
        ));
        assert_eq!(session.record().cloned(), before);
    }

    #[test]
    fn test_replay_new_clears_store() {
        let mut session = started();
        session.replay_new().unwrap();
        assert!(session.record().is_none());
        assert!(session.store().raw().is_none());
    }

    #[test]
    fn test_replay_same_players() {
        let mut session = started();
        let impostor = session
            .record()
            .unwrap()
            .final_roles()
            .find(|(_, role)| role.is_impostor())
            .map(|(name, _)| name.to_string())
            .unwrap();
        session.resolve_vote(&impostor).unwrap();
        assert!(session.record().unwrap().is_ended());

        let replay = session.replay_same_players().unwrap();
        assert_eq!(replay.players().len(), 4);
        assert!(!replay.is_ended());
        let stored = session.store().load().unwrap().unwrap();
        assert_eq!(stored.players().len(), 4);
    }

    #[test]
    fn test_resume_picks_up_stored_game() {
        let mut session = started();
        session.advance_turn().unwrap();
        let blob = session.store().raw().unwrap().to_string();

        let mut store = MemoryStore::new();
        store.insert_raw(blob);
        let resumed =
            GameSession::resume(store, FixedWord::default(), StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(resumed.record(), session.record());
    }

    #[test]
    fn test_resume_before_roles_are_assigned() {
        let mut session = session();
        session
            .configure(GameConfig::new(3, 1, KnowledgeLevel::None).unwrap())
            .unwrap();
        session.set_players(["ann", "ben", "cas"]).unwrap();
        let blob = session.store().raw().unwrap().to_string();

        let mut store = MemoryStore::new();
        store.insert_raw(blob);
        let resumed =
            GameSession::resume(store, FixedWord::default(), StdRng::seed_from_u64(0)).unwrap();
        let record = resumed.record().unwrap();
        assert_eq!(record.players().len(), 3);
        assert!(!record.has_roles());
        assert_eq!(resumed.record(), session.record());
    }

    #[test]
    fn test_resume_reports_unreadable_save_as_load_error() {
        let mut store = MemoryStore::new();
        store.insert_raw("{not json");
        let err = GameSession::resume(store, FixedWord::default(), StdRng::seed_from_u64(0))
            .err()
            .unwrap();
        assert!(matches!(err, SessionError::Load(StoreError::Serialization(_))));
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Couldn't load the saved game.");
    }

    #[test]
    fn test_reveal_role_through_session() {
        let session = started();
        let reveals: Vec<_> = (0..4).map(|idx| session.reveal_role(idx).unwrap()).collect();
        assert_eq!(
            reveals.iter().filter(|r| **r == RoleReveal::Impostor).count(),
            1
        );
    }
}
