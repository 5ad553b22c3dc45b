//! Choosing the 13-tile hand to declare.
//!
//! Candidates come from four shapes: three groups with a pair and a two-tile
//! wait, four groups with a single tile, six pairs with a single tile, and
//! thirteen orphans. Each one is scored by the chance that the opponent
//! discards one of its valid waits and by what those waits pay.
mod calc;
mod candidate;
mod generate;

pub use calc::{TenpaiCalculator, build_not_win_prob_table, choose_tenpai, win_prob};
pub use candidate::{Candidate, CandidateColumn};
pub use generate::{candidates, choose_groups, full_groups, pairs};

/// Tiles the player cannot see: 136 minus its own 34 and the dora indicator.
pub const UNSEEN_TILES: usize = 101;
/// Discards the opponent makes over a game.
pub const OPPONENT_DISCARDS: usize = 17;
