//! The game record and every operation that mutates it.
//!
//! A [`GameRecord`] is a plain owned value. Operations check all of their
//! preconditions before touching any field, so a returned error always
//! means the record is unchanged.

use log::{debug, info, trace, warn};
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::config::GameConfig;
use super::entities::{GameStatus, PlayerName, Role, RoleReveal, VoteResult, Winner};
use super::errors::{GameError, GameResult};
use crate::words::WordSource;

/// Build the role multiset for a table and shuffle it uniformly, so every
/// distinct arrangement of impostors over seats is equally likely.
///
/// Deterministic for a given random stream.
pub fn shuffled_roles<R: Rng + ?Sized>(
    player_count: usize,
    impostor_count: usize,
    rng: &mut R,
) -> Vec<Role> {
    let mut roles = Vec::with_capacity(player_count);
    roles.extend(std::iter::repeat_n(Role::Impostor, impostor_count));
    roles.extend(std::iter::repeat_n(
        Role::Crewmate,
        player_count.saturating_sub(impostor_count),
    ));
    roles.shuffle(rng);
    roles
}

/// One game, from name entry to the final reveal.
///
/// `players[i]` has role `roles[i]`. `original_players`/`original_roles`
/// are a snapshot taken at role assignment and never change afterwards.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameRecord {
    config: GameConfig,
    players: Vec<PlayerName>,
    roles: Vec<Role>,
    original_players: Vec<PlayerName>,
    original_roles: Vec<Role>,
    secret_word: String,
    round: u32,
    turn_index: usize,
    remaining_impostor_count: usize,
    last_vote_result: Option<VoteResult>,
    /// Set exactly once, when the game ends.
    winner: Option<Winner>,
}

impl GameRecord {
    /// A fresh record with no players yet.
    #[must_use]
    pub fn new(config: GameConfig, secret_word: impl Into<String>) -> Self {
        Self {
            config,
            players: Vec::with_capacity(config.player_count()),
            roles: Vec::with_capacity(config.player_count()),
            original_players: Vec::new(),
            original_roles: Vec::new(),
            secret_word: secret_word.into(),
            round: 1,
            turn_index: 0,
            remaining_impostor_count: 0,
            last_vote_result: None,
            winner: None,
        }
    }

    /// Collect the player names for this game.
    ///
    /// Names are trimmed and must be non-empty. Duplicates are accepted;
    /// votes on a duplicated name only ever hit its first occurrence.
    ///
    /// # Errors
    ///
    /// - [`GameError::RolesAlreadyAssigned`] once roles are out.
    /// - [`GameError::PlayerCountMismatch`] if the number of names differs
    ///   from the configured player count.
    /// - [`GameError::InvalidPlayerName`] for a blank or over-long name.
    pub fn set_players<I, S>(&mut self, names: I) -> GameResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.has_roles() {
            return Err(GameError::RolesAlreadyAssigned);
        }

        let players = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                PlayerName::try_from(name.as_ref()).map_err(|source| {
                    GameError::InvalidPlayerName {
                        position: idx + 1,
                        source,
                    }
                })
            })
            .collect::<GameResult<Vec<_>>>()?;

        if players.len() != self.config.player_count() {
            return Err(GameError::PlayerCountMismatch {
                expected: self.config.player_count(),
                got: players.len(),
            });
        }

        let unique: HashSet<&PlayerName> = players.iter().collect();
        if unique.len() != players.len() {
            warn!("duplicate player names; votes will hit the first match");
        }

        debug!("collected {} player names", players.len());
        self.players = players;
        Ok(())
    }

    /// Hand out roles at random. Runs at most once per record.
    ///
    /// # Errors
    ///
    /// - [`GameError::Config`] if the configuration is out of range.
    /// - [`GameError::RolesAlreadyAssigned`] on a second call.
    /// - [`GameError::PlayerCountMismatch`] if names haven't been collected.
    pub fn assign_roles<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GameResult<()> {
        self.config.validate()?;
        if self.has_roles() {
            return Err(GameError::RolesAlreadyAssigned);
        }
        if self.players.len() != self.config.player_count() {
            return Err(GameError::PlayerCountMismatch {
                expected: self.config.player_count(),
                got: self.players.len(),
            });
        }

        self.roles = shuffled_roles(
            self.config.player_count(),
            self.config.impostor_count(),
            rng,
        );
        self.original_players = self.players.clone();
        self.original_roles = self.roles.clone();
        self.remaining_impostor_count = self.config.impostor_count();

        debug!(
            "assigned roles: {} impostor(s) among {} players",
            self.remaining_impostor_count,
            self.players.len()
        );
        trace!("roles: {:?}", self.roles);
        Ok(())
    }

    /// Pass the device to the next player. Wrapping past the last player
    /// starts a new round.
    ///
    /// Returns `true` if this call started a new round.
    ///
    /// # Errors
    ///
    /// Fails if the game has ended, roles aren't assigned or nobody is left.
    pub fn advance_turn(&mut self) -> GameResult<bool> {
        self.ensure_in_play()?;

        self.turn_index += 1;
        if self.turn_index >= self.players.len() {
            self.turn_index = 0;
            self.round += 1;
            debug!("round {} starts", self.round);
            return Ok(true);
        }

        debug!("turn {} of round {}", self.turn_index + 1, self.round);
        Ok(false)
    }

    /// Eliminate the player the group voted for, then check whether either
    /// side has won.
    ///
    /// Only the first player with a matching name is removed.
    ///
    /// # Errors
    ///
    /// - [`GameError::GameEnded`] once a winner is set.
    /// - [`GameError::PlayerNotFound`] if nobody in play has that name.
    pub fn resolve_vote(&mut self, voted_player: &str) -> GameResult<VoteResult> {
        self.ensure_in_play()?;
        let voted_player = voted_player.trim();
        let idx = self
            .players
            .iter()
            .position(|player| *player == *voted_player)
            .ok_or_else(|| GameError::PlayerNotFound(voted_player.to_string()))?;

        let name = self.players.remove(idx);
        let role = self.roles.remove(idx);
        let was_impostor = role.is_impostor();
        if was_impostor {
            self.remaining_impostor_count -= 1;
        }

        // Keep the turn pointer on the same player, or wrap if it fell off.
        if idx < self.turn_index {
            self.turn_index -= 1;
        }
        if self.turn_index >= self.players.len() {
            self.turn_index = 0;
        }

        let result = VoteResult {
            voted_player: name,
            was_impostor,
        };
        debug!("{result}");
        self.last_vote_result = Some(result.clone());

        if let Some(winner) = self.evaluate_win_condition() {
            info!("game over after round {}: {winner}", self.round);
            self.winner = Some(winner);
        }

        Ok(result)
    }

    /// Continue after a vote that didn't end the game.
    ///
    /// # Errors
    ///
    /// Fails if the game has ended or roles aren't assigned.
    pub fn start_next_round(&mut self) -> GameResult<()> {
        self.ensure_in_play()?;
        self.round += 1;
        self.turn_index = 0;
        debug!("round {} starts", self.round);
        Ok(())
    }

    /// A new game over the full original roster, with a freshly drawn word
    /// and freshly shuffled roles.
    ///
    /// # Errors
    ///
    /// [`GameError::RolesNotAssigned`] if this game never got going, since
    /// there's no roster to replay.
    pub fn replay_same_players<W, R>(&self, words: &W, rng: &mut R) -> GameResult<Self>
    where
        W: WordSource,
        R: Rng + ?Sized,
    {
        if !self.has_roles() {
            return Err(GameError::RolesNotAssigned);
        }

        let secret_word = words.word_for(self.config.knowledge(), rng);
        let mut record = Self::new(self.config, secret_word);
        record.players = self.original_players.clone();
        record.assign_roles(rng)?;

        info!(
            "replaying with the same {} players",
            record.original_players.len()
        );
        Ok(record)
    }

    /// What the player at `idx` sees when handed the device.
    ///
    /// # Errors
    ///
    /// Fails before roles are assigned or if `idx` is out of bounds.
    pub fn reveal_role(&self, idx: usize) -> GameResult<RoleReveal> {
        if !self.has_roles() {
            return Err(GameError::RolesNotAssigned);
        }
        let role = self
            .roles
            .get(idx)
            .ok_or(GameError::InvalidPlayerIndex(idx))?;

        Ok(match role {
            Role::Impostor => RoleReveal::Impostor,
            Role::Crewmate => RoleReveal::Crewmate {
                secret_word: self.secret_word.clone(),
            },
        })
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        GameStatus {
            round: self.round,
            turn_index: self.turn_index,
            current_player: self.current_player().cloned(),
            players: self.players.clone(),
            remaining_impostors: self.remaining_impostor_count,
            remaining_crewmates: self.remaining_crewmate_count(),
            last_vote: self.last_vote_result.clone(),
            winner: self.winner,
        }
    }

    /// Everyone who started the game, with their role, eliminated or not.
    pub fn final_roles(&self) -> impl Iterator<Item = (&PlayerName, Role)> {
        self.original_players
            .iter()
            .zip(self.original_roles.iter().copied())
    }

    /// Role of a player by name in the original roster, including
    /// eliminated players.
    #[must_use]
    pub fn role_in_original(&self, name: &str) -> Option<Role> {
        self.original_players
            .iter()
            .position(|player| *player == *name)
            .and_then(|idx| self.original_roles.get(idx).copied())
    }

    /// Re-check every structural invariant. Used on records that came
    /// from outside, e.g. a save file.
    ///
    /// # Errors
    ///
    /// [`GameError::Config`] for an out-of-range config,
    /// [`GameError::InconsistentState`] for anything else.
    pub fn check_invariants(&self) -> GameResult<()> {
        self.config.validate()?;

        let inconsistent = |msg: String| Err(GameError::InconsistentState(msg));

        if self.has_roles() {
            if self.players.len() != self.roles.len() {
                return inconsistent(format!(
                    "{} players but {} roles",
                    self.players.len(),
                    self.roles.len()
                ));
            }
        } else {
            // Names may be in, roles not yet handed out
            if !self.roles.is_empty() {
                return inconsistent("roles without an original roster".to_string());
            }
            if !self.players.is_empty() && self.players.len() != self.config.player_count() {
                return inconsistent(format!(
                    "{} names collected, expected {}",
                    self.players.len(),
                    self.config.player_count()
                ));
            }
            if self.winner.is_some() || self.last_vote_result.is_some() {
                return inconsistent("votes recorded before roles were assigned".to_string());
            }
        }
        if self.original_players.len() != self.original_roles.len() {
            return inconsistent("original roster and roles differ in length".to_string());
        }
        if self.has_roles() && self.original_players.len() != self.config.player_count() {
            return inconsistent(format!(
                "original roster has {} players, expected {}",
                self.original_players.len(),
                self.config.player_count()
            ));
        }
        if self.has_roles() && self.players.len() > self.original_players.len() {
            return inconsistent("more players than in the original roster".to_string());
        }
        if self.players.len() > self.config.player_count() {
            return inconsistent("more players than configured".to_string());
        }

        let impostors = self.roles.iter().filter(|role| role.is_impostor()).count();
        if impostors != self.remaining_impostor_count {
            return inconsistent(format!(
                "{impostors} impostors in play but {} counted",
                self.remaining_impostor_count
            ));
        }
        if self.round == 0 {
            return inconsistent("round must start at 1".to_string());
        }
        if !self.is_ended() && !self.players.is_empty() && self.turn_index >= self.players.len()
        {
            return inconsistent(format!("turn index {} out of bounds", self.turn_index));
        }
        if self.last_vote_result.is_some()
            && !self.is_ended()
            && self.evaluate_win_condition().is_some()
        {
            return inconsistent("game should have ended after the last vote".to_string());
        }
        if let Some(winner) = self.winner
            && self.evaluate_win_condition() != Some(winner)
        {
            return inconsistent(format!("stored winner doesn't match the table: {winner}"));
        }

        Ok(())
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn players(&self) -> &[PlayerName] {
        &self.players
    }

    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    #[must_use]
    pub fn original_players(&self) -> &[PlayerName] {
        &self.original_players
    }

    #[must_use]
    pub fn original_roles(&self) -> &[Role] {
        &self.original_roles
    }

    #[must_use]
    pub fn secret_word(&self) -> &str {
        &self.secret_word
    }

    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub const fn turn_index(&self) -> usize {
        self.turn_index
    }

    #[must_use]
    pub fn current_player(&self) -> Option<&PlayerName> {
        if self.is_ended() {
            return None;
        }
        self.players.get(self.turn_index)
    }

    #[must_use]
    pub const fn remaining_impostor_count(&self) -> usize {
        self.remaining_impostor_count
    }

    #[must_use]
    pub fn remaining_crewmate_count(&self) -> usize {
        self.players
            .len()
            .saturating_sub(self.remaining_impostor_count)
    }

    #[must_use]
    pub const fn last_vote_result(&self) -> Option<&VoteResult> {
        self.last_vote_result.as_ref()
    }

    #[must_use]
    pub const fn winner(&self) -> Option<Winner> {
        self.winner
    }

    #[must_use]
    pub const fn is_ended(&self) -> bool {
        self.winner.is_some()
    }

    #[must_use]
    pub fn has_roles(&self) -> bool {
        !self.original_roles.is_empty()
    }

    /// Impostors win ties.
    fn evaluate_win_condition(&self) -> Option<Winner> {
        if self.remaining_impostor_count == 0 {
            Some(Winner::Crewmates)
        } else if self.remaining_impostor_count >= self.remaining_crewmate_count() {
            Some(Winner::Impostors)
        } else {
            None
        }
    }

    fn ensure_in_play(&self) -> GameResult<()> {
        if self.is_ended() {
            return Err(GameError::GameEnded);
        }
        if !self.has_roles() {
            return Err(GameError::RolesNotAssigned);
        }
        if self.players.is_empty() {
            return Err(GameError::NoPlayersRemaining);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::KnowledgeLevel;
    use crate::game::errors::NameError;
    use crate::words::FixedWord;
    use rand::{SeedableRng, rngs::StdRng};

    const NAMES: [&str; 6] = ["alice", "bob", "carol", "dave", "erin", "frank"];

    fn started_game(players: usize, impostors: usize, seed: u64) -> GameRecord {
        let config = GameConfig::new(players, impostors, KnowledgeLevel::Little).unwrap();
        let mut record = GameRecord::new(config, "BOEK");
        record.set_players(&NAMES[..players]).unwrap();
        record.assign_roles(&mut StdRng::seed_from_u64(seed)).unwrap();
        record
    }

    fn names_with(record: &GameRecord, role: Role) -> Vec<String> {
        record
            .players()
            .iter()
            .zip(record.roles())
            .filter(|(_, r)| **r == role)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    #[test]
    fn test_new_record_is_empty() {
        let record = GameRecord::new(GameConfig::default(), "APPEL");
        assert!(record.players().is_empty());
        assert!(record.roles().is_empty());
        assert_eq!(record.round(), 1);
        assert_eq!(record.turn_index(), 0);
        assert!(!record.is_ended());
        assert!(!record.has_roles());
        assert!(record.check_invariants().is_ok());
    }

    #[test]
    fn test_set_players_validates_names() {
        let mut record = GameRecord::new(GameConfig::default(), "APPEL");
        assert_eq!(
            record.set_players(["a", "b", "c"]),
            Err(GameError::PlayerCountMismatch {
                expected: 5,
                got: 3
            })
        );
        assert_eq!(
            record.set_players(["a", "b", " ", "d", "e"]),
            Err(GameError::InvalidPlayerName {
                position: 3,
                source: NameError::Empty
            })
        );
        assert!(record.players().is_empty());

        record.set_players([" a ", "b", "c", "d", "e"]).unwrap();
        assert_eq!(record.players()[0].as_str(), "a");
    }

    #[test]
    fn test_set_players_allows_duplicates() {
        let mut record = GameRecord::new(GameConfig::default(), "APPEL");
        assert!(record.set_players(["sam", "sam", "c", "d", "e"]).is_ok());
    }

    #[test]
    fn test_assign_roles_counts() {
        let record = started_game(6, 2, 42);
        assert_eq!(record.roles().len(), 6);
        assert_eq!(names_with(&record, Role::Impostor).len(), 2);
        assert_eq!(names_with(&record, Role::Crewmate).len(), 4);
        assert_eq!(record.remaining_impostor_count(), 2);
        assert_eq!(record.original_players(), record.players());
        assert_eq!(record.original_roles(), record.roles());
        assert!(record.check_invariants().is_ok());
    }

    #[test]
    fn test_assign_roles_is_deterministic_per_seed() {
        let a = started_game(6, 2, 9);
        let b = started_game(6, 2, 9);
        assert_eq!(a.roles(), b.roles());
    }

    #[test]
    fn test_assign_roles_only_once() {
        let mut record = started_game(5, 1, 1);
        let roles = record.roles().to_vec();
        assert_eq!(
            record.assign_roles(&mut StdRng::seed_from_u64(2)),
            Err(GameError::RolesAlreadyAssigned)
        );
        assert_eq!(record.roles(), roles.as_slice());
        assert_eq!(
            record.set_players(&NAMES[..5]),
            Err(GameError::RolesAlreadyAssigned)
        );
    }

    #[test]
    fn test_assign_roles_needs_names() {
        let mut record = GameRecord::new(GameConfig::default(), "APPEL");
        assert_eq!(
            record.assign_roles(&mut StdRng::seed_from_u64(0)),
            Err(GameError::PlayerCountMismatch {
                expected: 5,
                got: 0
            })
        );
    }

    #[test]
    fn test_assign_roles_rejects_invalid_config() {
        let config: GameConfig = serde_json::from_str(
            r#"{"player_count": 4, "impostor_count": 3, "knowledge": "none"}"#,
        )
        .unwrap();
        let mut record = GameRecord::new(config, "APPEL");
        record.players = NAMES[..4]
            .iter()
            .map(|n| PlayerName::try_from(*n).unwrap())
            .collect();
        assert!(matches!(
            record.assign_roles(&mut StdRng::seed_from_u64(0)),
            Err(GameError::Config(_))
        ));
        assert!(record.roles().is_empty());
    }

    #[test]
    fn test_operations_need_roles() {
        let mut record = GameRecord::new(GameConfig::default(), "APPEL");
        assert_eq!(record.advance_turn(), Err(GameError::RolesNotAssigned));
        assert_eq!(record.resolve_vote("alice"), Err(GameError::RolesNotAssigned));
        assert_eq!(record.start_next_round(), Err(GameError::RolesNotAssigned));
        assert_eq!(record.reveal_role(0), Err(GameError::RolesNotAssigned));
    }

    #[test]
    fn test_full_pass_of_turns_starts_one_round() {
        let mut record = started_game(5, 1, 3);
        let mut wrapped = 0;
        for _ in 0..5 {
            if record.advance_turn().unwrap() {
                wrapped += 1;
            }
        }
        assert_eq!(wrapped, 1);
        assert_eq!(record.round(), 2);
        assert_eq!(record.turn_index(), 0);
    }

    #[test]
    fn test_current_player_follows_turns() {
        let mut record = started_game(4, 1, 3);
        assert_eq!(record.current_player().unwrap().as_str(), "alice");
        record.advance_turn().unwrap();
        assert_eq!(record.current_player().unwrap().as_str(), "bob");
    }

    #[test]
    fn test_voting_out_the_impostor_ends_the_game() {
        let mut record = started_game(5, 1, 11);
        let impostor = names_with(&record, Role::Impostor).remove(0);

        let result = record.resolve_vote(&impostor).unwrap();
        assert!(result.was_impostor);
        assert_eq!(result.voted_player.as_str(), impostor);
        assert_eq!(record.winner(), Some(Winner::Crewmates));
        assert!(record.is_ended());
        assert_eq!(record.players().len(), 4);
        assert_eq!(record.remaining_impostor_count(), 0);
        assert!(record.current_player().is_none());
        assert!(record.check_invariants().is_ok());
    }

    #[test]
    fn test_impostors_win_on_a_tie() {
        let mut record = started_game(4, 1, 5);
        let crew = names_with(&record, Role::Crewmate);

        record.resolve_vote(&crew[0]).unwrap();
        assert!(!record.is_ended());
        record.start_next_round().unwrap();

        let result = record.resolve_vote(&crew[1]).unwrap();
        assert!(!result.was_impostor);
        assert_eq!(record.remaining_impostor_count(), 1);
        assert_eq!(record.remaining_crewmate_count(), 1);
        assert_eq!(record.winner(), Some(Winner::Impostors));
    }

    #[test]
    fn test_wrong_vote_with_two_impostors_left_continues() {
        let mut record = started_game(6, 2, 8);
        let crew = names_with(&record, Role::Crewmate);
        record.resolve_vote(&crew[0]).unwrap();
        // 2 impostors vs 3 crewmates
        assert!(!record.is_ended());
        assert_eq!(record.status().remaining_crewmates, 3);
    }

    #[test]
    fn test_ended_game_rejects_everything() {
        let mut record = started_game(5, 1, 11);
        let impostor = names_with(&record, Role::Impostor).remove(0);
        record.resolve_vote(&impostor).unwrap();

        let snapshot = record.clone();
        let crew = names_with(&record, Role::Crewmate);
        assert_eq!(record.resolve_vote(&crew[0]), Err(GameError::GameEnded));
        assert_eq!(record.advance_turn(), Err(GameError::GameEnded));
        assert_eq!(record.start_next_round(), Err(GameError::GameEnded));
        assert_eq!(record, snapshot);
    }

    #[test]
    fn test_unknown_vote_leaves_record_untouched() {
        let mut record = started_game(5, 1, 11);
        let snapshot = record.clone();
        assert_eq!(
            record.resolve_vote("mallory"),
            Err(GameError::PlayerNotFound("mallory".to_string()))
        );
        assert_eq!(record, snapshot);
    }

    #[test]
    fn test_duplicate_names_vote_hits_first_match() {
        let config = GameConfig::new(5, 2, KnowledgeLevel::None).unwrap();
        let mut record = GameRecord::new(config, "BED");
        record.set_players(["sam", "sam", "c", "d", "e"]).unwrap();
        record.assign_roles(&mut StdRng::seed_from_u64(4)).unwrap();
        let second_sam_role = record.roles()[1];

        let result = record.resolve_vote("sam").unwrap();
        assert_eq!(result.was_impostor, record.original_roles()[0].is_impostor());
        assert_eq!(record.players()[0].as_str(), "sam");
        assert_eq!(record.roles()[0], second_sam_role);
    }

    #[test]
    fn test_vote_keeps_turn_on_same_player() {
        let mut record = started_game(6, 1, 21);
        record.advance_turn().unwrap();
        record.advance_turn().unwrap();
        assert_eq!(record.current_player().unwrap().as_str(), "carol");

        // Eliminate someone seated before the current player
        let target = if record.roles()[0].is_impostor() { "bob" } else { "alice" };
        record.resolve_vote(target).unwrap();
        if !record.is_ended() {
            assert_eq!(record.current_player().unwrap().as_str(), "carol");
        }
    }

    #[test]
    fn test_vote_on_last_seat_wraps_turn() {
        let mut record = started_game(6, 1, 21);
        for _ in 0..5 {
            record.advance_turn().unwrap();
        }
        assert_eq!(record.turn_index(), 5);
        let last = record.players()[5].to_string();
        record.resolve_vote(&last).unwrap();
        assert_eq!(record.turn_index(), 0);
        assert!(record.check_invariants().is_ok());
    }

    #[test]
    fn test_start_next_round() {
        let mut record = started_game(5, 1, 2);
        record.advance_turn().unwrap();
        record.start_next_round().unwrap();
        assert_eq!(record.round(), 2);
        assert_eq!(record.turn_index(), 0);
    }

    #[test]
    fn test_reveal_role() {
        let record = started_game(5, 2, 13);
        for (idx, role) in record.roles().iter().enumerate() {
            let reveal = record.reveal_role(idx).unwrap();
            match role {
                Role::Impostor => assert_eq!(reveal, RoleReveal::Impostor),
                Role::Crewmate => assert_eq!(
                    reveal,
                    RoleReveal::Crewmate {
                        secret_word: "BOEK".to_string()
                    }
                ),
            }
        }
        assert_eq!(record.reveal_role(5), Err(GameError::InvalidPlayerIndex(5)));
    }

    #[test]
    fn test_final_roles_include_eliminated_players() {
        let mut record = started_game(6, 2, 17);
        let crew = names_with(&record, Role::Crewmate);
        record.resolve_vote(&crew[0]).unwrap();

        let roster: Vec<_> = record.final_roles().collect();
        assert_eq!(roster.len(), 6);
        assert_eq!(record.role_in_original(&crew[0]), Some(Role::Crewmate));
        assert_eq!(record.role_in_original("nobody"), None);
    }

    #[test]
    fn test_replay_restores_roster_and_resets_progress() {
        let mut record = started_game(6, 2, 31);
        let crew = names_with(&record, Role::Crewmate);
        record.resolve_vote(&crew[0]).unwrap();
        record.start_next_round().unwrap();

        let mut rng = StdRng::seed_from_u64(99);
        let replay = record
            .replay_same_players(&FixedWord("KAAS".to_string()), &mut rng)
            .unwrap();
        assert_eq!(replay.players().len(), 6);
        assert_eq!(replay.players(), record.original_players());
        assert_eq!(replay.remaining_impostor_count(), 2);
        assert_eq!(replay.round(), 1);
        assert_eq!(replay.turn_index(), 0);
        assert_eq!(replay.secret_word(), "KAAS");
        assert!(replay.last_vote_result().is_none());
        assert!(!replay.is_ended());
        assert!(replay.check_invariants().is_ok());
    }

    #[test]
    fn test_replay_needs_a_started_game() {
        let record = GameRecord::new(GameConfig::default(), "APPEL");
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            record.replay_same_players(&FixedWord::default(), &mut rng),
            Err(GameError::RolesNotAssigned)
        );
    }

    #[test]
    fn test_check_invariants_catches_tampering() {
        let mut record = started_game(5, 1, 3);
        record.remaining_impostor_count = 2;
        assert!(matches!(
            record.check_invariants(),
            Err(GameError::InconsistentState(_))
        ));

        let mut record = started_game(5, 1, 3);
        record.roles.pop();
        assert!(record.check_invariants().is_err());

        let mut record = started_game(5, 1, 3);
        record.turn_index = 5;
        assert!(record.check_invariants().is_err());
    }

    #[test]
    fn test_check_invariants_accepts_names_before_roles() {
        let config = GameConfig::new(3, 1, KnowledgeLevel::None).unwrap();
        let mut record = GameRecord::new(config, "BOEK");
        assert!(record.check_invariants().is_ok());

        record.set_players(["ann", "ben", "cas"]).unwrap();
        assert!(!record.has_roles());
        assert!(record.check_invariants().is_ok());

        record.players.pop();
        assert!(matches!(
            record.check_invariants(),
            Err(GameError::InconsistentState(_))
        ));
    }

    #[test]
    fn test_check_invariants_rejects_wrong_winner() {
        let mut record = started_game(5, 1, 3);
        record.winner = Some(Winner::Crewmates);
        assert!(matches!(
            record.check_invariants(),
            Err(GameError::InconsistentState(_))
        ));

        let mut record = GameRecord::new(GameConfig::default(), "BOEK");
        record.winner = Some(Winner::Crewmates);
        assert!(record.check_invariants().is_err());
    }

    #[test]
    fn test_check_invariants_accepts_real_winner() {
        let mut record = started_game(3, 1, 3);
        let impostor = names_with(&record, Role::Impostor)[0].clone();
        record.resolve_vote(impostor.as_str()).unwrap();
        assert_eq!(record.winner(), Some(Winner::Crewmates));
        assert!(record.check_invariants().is_ok());
    }

    #[test]
    fn test_shuffled_roles_edge_counts() {
        let mut rng = StdRng::seed_from_u64(0);
        let roles = shuffled_roles(20, 10, &mut rng);
        assert_eq!(roles.iter().filter(|r| r.is_impostor()).count(), 10);
        assert_eq!(roles.len(), 20);
    }
}
