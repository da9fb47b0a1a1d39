//! Limits and defaults shared by the engine and its callers.

/// Fewest players a game can be configured with.
pub const MIN_PLAYERS: usize = 3;

/// Most players a game can be configured with.
pub const MAX_PLAYERS: usize = 20;

/// Every game needs at least one impostor.
pub const MIN_IMPOSTORS: usize = 1;

/// Longest accepted player name, counted in characters after trimming.
pub const MAX_NAME_LENGTH: usize = 20;

pub const DEFAULT_PLAYERS: usize = 5;
pub const DEFAULT_IMPOSTORS: usize = 1;

/// Upper bound on impostors for a given table size: half the players,
/// rounded down.
#[must_use]
pub const fn max_impostors(player_count: usize) -> usize {
    player_count / 2
}
