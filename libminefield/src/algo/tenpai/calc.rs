use super::candidate::{Candidate, CandidateColumn};
use super::generate::candidates;
use super::{OPPONENT_DISCARDS, UNSEEN_TILES};
use crate::algo::wait::structural_waits;
use crate::hand::{Counts, counts_of, tiles_to_string};
use crate::options::Options;
use crate::tile::Tile;
use std::sync::LazyLock;

use anyhow::{Result, ensure};
use log::{debug, warn};
use rayon::prelude::*;

/// Chance that none of `w` winning tiles shows up among the opponent's
/// discards, indexed by `w`.
static NOT_WIN_PROB_TABLE: LazyLock<[f32; UNSEEN_TILES + 1]> = LazyLock::new(build_not_win_prob_table);

#[must_use]
pub fn build_not_win_prob_table() -> [f32; UNSEEN_TILES + 1] {
    let mut table = [0.; UNSEEN_TILES + 1];
    for (w, v) in table.iter_mut().enumerate() {
        *v = (0..OPPONENT_DISCARDS)
            .map(|i| (1. - w as f32 / (UNSEEN_TILES - i) as f32).max(0.))
            .product();
    }
    table
}

#[inline]
#[must_use]
pub fn win_prob(wait_count: usize) -> f32 {
    1. - NOT_WIN_PROB_TABLE[wait_count.min(UNSEEN_TILES)]
}

#[derive(Debug, Clone, Copy)]
pub struct TenpaiCalculator<'a> {
    pub options: &'a Options,
    /// Copies of each kind this player has seen, its own tiles included.
    pub tiles_seen: &'a Counts,
}

impl TenpaiCalculator<'_> {
    /// Copies of `tile` that may still come out, with one less for the dora
    /// indicator.
    #[must_use]
    pub fn unseen(&self, tile: Tile) -> u8 {
        let ind = u8::from(self.options.dora_ind == Some(tile));
        4u8.saturating_sub(self.tiles_seen[tile.as_usize()]).saturating_sub(ind)
    }

    #[must_use]
    pub fn evaluate(&self, hand: Vec<Tile>) -> Candidate {
        let waits: Vec<_> = structural_waits(hand.clone(), self.options).collect();
        let good: Vec<_> = waits.iter().filter(|w| w.is_win()).collect();
        let counts: Vec<_> = good.iter().map(|w| self.unseen(w.tile)).collect();

        let total: u32 = counts.iter().map(|&c| u32::from(c)).sum();
        let (win_prob, exp_value) = if total == 0 {
            (0., 0.)
        } else {
            let points: u32 = good.iter().zip(&counts).map(|(w, &c)| w.points() * u32::from(c)).sum();
            let avg_points = points as f32 / total as f32;
            let good_ratio = good.len() as f32 / waits.len() as f32;
            let p = win_prob(total as usize);
            (p, p * avg_points * good_ratio)
        };

        Candidate {
            hand,
            waits,
            counts,
            win_prob,
            exp_value,
        }
    }

    /// Every candidate, evaluated and in lexicographic hand order.
    pub fn calc(&self, concealed: &[Tile]) -> Result<Vec<Candidate>> {
        ensure!(
            concealed.len() > 13,
            "need more than 13 tiles to choose from, got {}",
            concealed.len(),
        );
        let counts = counts_of(concealed)?;
        let hands: Vec<_> = candidates(&counts).into_iter().collect();
        debug!("{} tenpai candidates from {} tiles", hands.len(), concealed.len());

        Ok(hands.into_par_iter().map(|hand| self.evaluate(hand)).collect())
    }

    /// The candidate with the highest expected value, the smallest hand on
    /// ties.
    ///
    /// Without any positive candidate this falls back to the one with the
    /// most structural waits, and without any candidate at all to the 13
    /// lowest tiles.
    pub fn choose(&self, concealed: &[Tile]) -> Result<Candidate> {
        let all = self.calc(concealed)?;

        let mut best: Option<&Candidate> = None;
        for c in all.iter().filter(|c| c.is_positive()) {
            if best.is_none_or(|b| c.exp_value > b.exp_value) {
                best = Some(c);
            }
        }
        if let Some(best) = best {
            debug!("chose {}", best.to_candidate_string());
            return Ok(best.clone());
        }

        let chosen = match all.into_iter().reduce(|b, c| {
            if c.cmp(&b, CandidateColumn::Waits).is_gt() { c } else { b }
        }) {
            Some(c) => c,
            None => {
                let mut lowest = concealed.to_vec();
                lowest.sort_unstable();
                lowest.truncate(13);
                self.evaluate(lowest)
            }
        };
        warn!("no positive tenpai candidate, falling back to {}", tiles_to_string(&chosen.hand));
        Ok(chosen)
    }
}

/// Pick the hand to declare from `concealed`.
pub fn choose_tenpai(concealed: &[Tile], options: &Options, tiles_seen: &Counts) -> Result<Candidate> {
    TenpaiCalculator { options, tiles_seen }.choose(concealed)
}
