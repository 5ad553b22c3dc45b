//! A winning hand: one decomposition of 14 tiles, the tile that completed it
//! and the table options, with its yaku resolved at construction.
use super::decompose::Div;
use super::point::{Limit, Score, YAKUMAN_FAN};
use super::yaku::{self, Yaku};
use crate::hand::Counts;
use crate::meld::Meld;
use crate::options::Options;
use crate::tile::{KINDS, Tile};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    /// `wait_group` is the group of `div` (possibly the pair) the winning
    /// tile completed.
    Regular { div: Div, wait_group: Meld },
    Pairs,
    Kokushi,
}

#[derive(Debug, Clone, Serialize)]
pub struct Hand<'a> {
    /// Sorted, 14 tiles.
    pub tiles: Vec<Tile>,
    pub wait: Tile,
    pub shape: Shape,
    /// Table order, yakuman only when `is_yakuman`.
    pub yaku: Vec<Yaku>,
    pub is_yakuman: bool,
    #[serde(skip)]
    pub options: &'a Options,
    #[serde(skip)]
    pub(super) counts: Counts,
}

/// A two-sided completion of a run.
///
/// The wait must sit at either end of the run, except for the edge runs
/// 1-2-3 completed on 3 and 7-8-9 completed on 7.
#[must_use]
pub fn is_open_wait(wait: Tile, group: Meld) -> bool {
    let Meld::Chi(chi) = group else {
        return false;
    };
    if wait.suit() != chi.suit() {
        return false;
    }
    let (n, cn) = (wait.rank(), chi.rank());
    (n == cn || n == cn + 2) && !matches!((n, cn), (3, 1) | (7, 7))
}

impl<'a> Hand<'a> {
    /// `tiles` must be sorted.
    #[must_use]
    pub fn new(tiles: Vec<Tile>, wait: Tile, shape: Shape, options: &'a Options) -> Self {
        let mut counts = [0; KINDS];
        for t in &tiles {
            counts[t.as_usize()] += 1;
        }
        let mut hand = Self {
            tiles,
            wait,
            shape,
            yaku: vec![],
            is_yakuman: false,
            options,
            counts,
        };
        (hand.yaku, hand.is_yakuman) = yaku::classify(&hand);
        hand
    }

    #[inline]
    #[must_use]
    pub fn count(&self, tile: Tile) -> u8 {
        self.counts[tile.as_usize()]
    }

    /// Bonus tiles held, one per copy per indicator.
    #[must_use]
    pub fn dora(&self) -> u8 {
        [self.options.dora_ind, self.options.uradora_ind]
            .into_iter()
            .flatten()
            .map(|ind| self.count(ind.next_wrap()))
            .sum()
    }

    /// Yakuman hands sum their yakuman values without a cap. Everything else
    /// adds dora and caps at yakuman.
    #[must_use]
    pub fn fan(&self) -> u8 {
        let sum: u8 = self.yaku.iter().map(|y| y.value()).sum();
        if self.is_yakuman {
            sum
        } else {
            (sum + self.dora()).min(YAKUMAN_FAN)
        }
    }

    #[must_use]
    pub fn fu(&self) -> u8 {
        if self.yaku.contains(&Yaku::Pinfu) {
            return 30;
        }
        let (div, wait_group) = match &self.shape {
            Shape::Pairs => return 25,
            Shape::Kokushi => return 30,
            Shape::Regular { div, wait_group } => (div, *wait_group),
        };

        let mut fu = 30;
        if self.options.is_yakupai(div.pair) {
            fu += 2;
        }
        if !wait_group.is_pon() && !is_open_wait(self.wait, wait_group) {
            fu += 2;
        }
        fu += div
            .melds
            .iter()
            .filter(|m| m.is_pon())
            .map(|&m| {
                let base = if m.tile().is_yaochu() { 4 } else { 2 };
                // concealed before the winning tile arrived
                if m == wait_group { base } else { base * 2 }
            })
            .sum::<u8>();
        fu.div_ceil(10) * 10
    }

    #[inline]
    #[must_use]
    pub fn score(&self) -> Score {
        Score {
            fan: self.fan(),
            fu: self.fu(),
        }
    }

    #[inline]
    #[must_use]
    pub fn limit(&self) -> Limit {
        self.score().limit()
    }
}
