use crate::algo::wait::WaitScore;
use crate::hand::tiles_to_string;
use crate::tile::Tile;
use std::cmp::Ordering;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateColumn {
    EV,
    WinProb,
    Waits,
}

/// An evaluated 13-tile hand.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Candidate {
    /// Sorted.
    pub hand: Vec<Tile>,
    /// Every structural wait, valid or not.
    pub waits: Vec<WaitScore>,
    /// Unseen copies per valid wait, aligned with `good_waits()`.
    pub counts: Vec<u8>,
    pub win_prob: f32,
    pub exp_value: f32,
}

impl Candidate {
    pub fn good_waits(&self) -> impl Iterator<Item = &WaitScore> {
        self.waits.iter().filter(|w| w.is_win())
    }

    #[inline]
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.exp_value > 0.
    }

    #[must_use]
    pub fn cmp(&self, other: &Self, by: CandidateColumn) -> Ordering {
        let primary = match by {
            CandidateColumn::EV => self
                .exp_value
                .total_cmp(&other.exp_value)
                .then_with(|| self.win_prob.total_cmp(&other.win_prob)),
            CandidateColumn::WinProb => self
                .win_prob
                .total_cmp(&other.win_prob)
                .then_with(|| self.exp_value.total_cmp(&other.exp_value)),
            CandidateColumn::Waits => self
                .waits
                .len()
                .cmp(&other.waits.len())
                .then_with(|| self.exp_value.total_cmp(&other.exp_value)),
        };
        // smaller hands rank higher
        primary.then_with(|| other.hand.cmp(&self.hand))
    }

    #[must_use]
    pub fn to_candidate_string(&self) -> String {
        format!(
            "{} {:>6} {:>6.2}% | {}",
            tiles_to_string(&self.hand),
            self.exp_value as i32,
            self.win_prob * 100.,
            self.good_waits()
                .zip(&self.counts)
                .map(|(w, c)| format!("{}[{}] {}", w.tile, c, w.score))
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}
