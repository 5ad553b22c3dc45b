//! The fixed yaku table and the predicates that classify a winning hand.
//!
//! Yaku are evaluated in the order of [`ALL_YAKU`]. Junchan excludes chanta
//! and ryanpeiko excludes iipeiko; both are spelled out in the predicates
//! instead of depending on evaluation order.
use super::agari::{Hand, Shape, is_open_wait};
use crate::meld::Meld;
use crate::tile::{DRAGONS, HONORS, Suit, TERMINALS, Tile, WINDS};
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Yaku {
    Pinfu,
    Iipeiko,
    Ryanpeiko,
    Tanyao,
    Wind,
    Haku,
    Hatsu,
    Chun,
    Sanshokudojun,
    Sanshokudoko,
    Itsuu,
    Chitoitsu,
    Chanta,
    Junchan,
    Honroto,
    Honitsu,
    Chinitsu,
    Toitoi,
    Sananko,
    Shosangen,
    Daisangen,
    Kokushi,
    Suuanko,
    Suushi,
    Chinroto,
    Tsuuiiso,
    Ryuuiiso,
    Chuuren,
    Ippatsu,
    Hotei,
}

pub const ALL_YAKU: [Yaku; 30] = [
    Yaku::Pinfu,
    Yaku::Iipeiko,
    Yaku::Ryanpeiko,
    Yaku::Tanyao,
    Yaku::Wind,
    Yaku::Haku,
    Yaku::Hatsu,
    Yaku::Chun,
    Yaku::Sanshokudojun,
    Yaku::Sanshokudoko,
    Yaku::Itsuu,
    Yaku::Chitoitsu,
    Yaku::Chanta,
    Yaku::Junchan,
    Yaku::Honroto,
    Yaku::Honitsu,
    Yaku::Chinitsu,
    Yaku::Toitoi,
    Yaku::Sananko,
    Yaku::Shosangen,
    Yaku::Daisangen,
    Yaku::Kokushi,
    Yaku::Suuanko,
    Yaku::Suushi,
    Yaku::Chinroto,
    Yaku::Tsuuiiso,
    Yaku::Ryuuiiso,
    Yaku::Chuuren,
    Yaku::Ippatsu,
    Yaku::Hotei,
];

const GREEN: [Tile; 6] = [Tile::S2, Tile::S3, Tile::S4, Tile::S6, Tile::S8, Tile::X6];

impl Yaku {
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Pinfu
            | Self::Iipeiko
            | Self::Tanyao
            | Self::Wind
            | Self::Haku
            | Self::Hatsu
            | Self::Chun
            | Self::Ippatsu
            | Self::Hotei => 1,
            Self::Sanshokudojun
            | Self::Sanshokudoko
            | Self::Itsuu
            | Self::Chitoitsu
            | Self::Chanta
            | Self::Honroto
            | Self::Toitoi
            | Self::Sananko
            | Self::Shosangen => 2,
            Self::Ryanpeiko | Self::Junchan | Self::Honitsu => 3,
            Self::Chinitsu => 6,
            Self::Daisangen
            | Self::Kokushi
            | Self::Suuanko
            | Self::Suushi
            | Self::Chinroto
            | Self::Tsuuiiso
            | Self::Ryuuiiso
            | Self::Chuuren => 13,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_yakuman(self) -> bool {
        self.value() >= 13
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pinfu => "pinfu",
            Self::Iipeiko => "iipeiko",
            Self::Ryanpeiko => "ryanpeiko",
            Self::Tanyao => "tanyao",
            Self::Wind => "wind",
            Self::Haku => "haku",
            Self::Hatsu => "hatsu",
            Self::Chun => "chun",
            Self::Sanshokudojun => "sanshokudojun",
            Self::Sanshokudoko => "sanshokudoko",
            Self::Itsuu => "itsuu",
            Self::Chitoitsu => "chitoitsu",
            Self::Chanta => "chanta",
            Self::Junchan => "junchan",
            Self::Honroto => "honroto",
            Self::Honitsu => "honitsu",
            Self::Chinitsu => "chinitsu",
            Self::Toitoi => "toitoi",
            Self::Sananko => "sananko",
            Self::Shosangen => "shosangen",
            Self::Daisangen => "daisangen",
            Self::Kokushi => "kokushi",
            Self::Suuanko => "suuanko",
            Self::Suushi => "suushi",
            Self::Chinroto => "chinroto",
            Self::Tsuuiiso => "tsuuiiso",
            Self::Ryuuiiso => "ryuuiiso",
            Self::Chuuren => "chuuren",
            Self::Ippatsu => "ippatsu",
            Self::Hotei => "hotei",
        }
    }
}

impl fmt::Display for Yaku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve the yaku of a hand, keeping only yakuman when any is present.
///
/// Returns the list in table order and whether it is a yakuman list.
#[must_use]
pub fn classify(hand: &Hand<'_>) -> (Vec<Yaku>, bool) {
    let found: Vec<_> = ALL_YAKU.into_iter().filter(|&y| hand.satisfies(y)).collect();
    if found.iter().any(|y| y.is_yakuman()) {
        (found.into_iter().filter(|y| y.is_yakuman()).collect(), true)
    } else {
        (found, false)
    }
}

impl Hand<'_> {
    fn has_kind(&self, tile: Tile) -> bool {
        self.counts[tile.as_usize()] > 0
    }

    fn kinds_within(&self, set: &[Tile]) -> bool {
        self.tiles.iter().all(|t| set.contains(t))
    }

    /// Bitmask over `Suit` of the suits present.
    fn suits(&self) -> u8 {
        self.tiles.iter().fold(0, |acc, t| acc | 1 << t.suit() as u8)
    }

    fn has_meld(&self, meld: Meld) -> bool {
        self.melds().contains(&meld)
    }

    fn melds(&self) -> &[Meld] {
        match &self.shape {
            Shape::Regular { div, .. } => &div.melds,
            _ => &[],
        }
    }

    fn pair_tile(&self) -> Option<Tile> {
        match &self.shape {
            Shape::Regular { div, .. } => Some(div.pair),
            _ => None,
        }
    }

    fn same_rank_in_all_suits(&self, make: fn(Tile) -> Meld, max_rank: u8) -> bool {
        (0..max_rank).any(|n| [Tile::M1, Tile::P1, Tile::S1].iter().all(|base| base.offset(n).is_some_and(|t| self.has_meld(make(t)))))
    }

    /// Whether this hand satisfies one yaku, before yakuman exclusivity.
    #[must_use]
    pub fn satisfies(&self, yaku: Yaku) -> bool {
        let regular = match &self.shape {
            Shape::Regular { div, wait_group } => Some((div, *wait_group)),
            _ => None,
        };
        let melds = self.melds();
        let suits = self.suits();
        let honor_suit = 1 << Suit::X as u8;

        match yaku {
            Yaku::Pinfu => regular.is_some_and(|(div, wait_group)| {
                !self.options.is_yakupai(div.pair)
                    && div.melds.iter().all(|m| m.is_chi())
                    && is_open_wait(self.wait, wait_group)
            }),
            Yaku::Iipeiko => {
                regular.is_some() && !self.satisfies(Yaku::Ryanpeiko) && melds.windows(2).any(|w| w[0] == w[1])
            }
            Yaku::Ryanpeiko => matches!(melds, [a, b, c, d] if a == b && c == d),
            Yaku::Tanyao => !self.tiles.iter().any(|t| t.is_yaochu()),
            Yaku::Wind => melds.iter().any(|m| matches!(m, Meld::Pon(t) if self.options.fanpai_winds.contains(t))),
            Yaku::Haku => self.has_meld(Meld::Pon(Tile::X5)),
            Yaku::Hatsu => self.has_meld(Meld::Pon(Tile::X6)),
            Yaku::Chun => self.has_meld(Meld::Pon(Tile::X7)),
            Yaku::Sanshokudojun => self.same_rank_in_all_suits(Meld::Chi, 7),
            Yaku::Sanshokudoko => self.same_rank_in_all_suits(Meld::Pon, 9),
            Yaku::Itsuu => [Tile::M1, Tile::P1, Tile::S1].iter().any(|base| {
                [0, 3, 6].iter().all(|&n| base.offset(n).is_some_and(|t| self.has_meld(Meld::Chi(t))))
            }),
            Yaku::Chitoitsu => matches!(self.shape, Shape::Pairs),
            Yaku::Chanta => {
                regular.is_some_and(|(div, _)| {
                    div.groups().all(Meld::is_chanta) && div.melds.iter().any(|m| m.is_chi())
                }) && !self.satisfies(Yaku::Junchan)
            }
            Yaku::Junchan => regular.is_some_and(|(div, _)| {
                div.groups().all(Meld::is_junchan) && div.melds.iter().any(|m| m.is_chi())
            }),
            Yaku::Honroto => self.tiles.iter().all(|t| t.is_yaochu()),
            Yaku::Honitsu => suits.count_ones() == 2 && suits & honor_suit != 0,
            Yaku::Chinitsu => suits.count_ones() == 1 && suits & honor_suit == 0,
            Yaku::Toitoi => !melds.is_empty() && melds.iter().all(|m| m.is_pon()),
            Yaku::Sananko => regular.is_some_and(|(div, wait_group)| {
                div.melds.iter().filter(|m| m.is_pon()).count() - usize::from(wait_group.is_pon()) == 3
            }),
            Yaku::Shosangen => {
                regular.is_some() && DRAGONS.iter().all(|&t| self.has_kind(t)) && self.pair_tile().is_some_and(Tile::is_dragon)
            }
            Yaku::Daisangen => {
                regular.is_some()
                    && DRAGONS.iter().all(|&t| self.has_kind(t))
                    && self.pair_tile().is_some_and(|t| !t.is_dragon())
            }
            Yaku::Kokushi => matches!(self.shape, Shape::Kokushi),
            Yaku::Suuanko => self.pair_tile() == Some(self.wait) && self.satisfies(Yaku::Toitoi),
            Yaku::Suushi => regular.is_some() && WINDS.iter().all(|&t| self.has_kind(t)),
            Yaku::Chinroto => self.kinds_within(&TERMINALS),
            Yaku::Tsuuiiso => self.kinds_within(&HONORS),
            Yaku::Ryuuiiso => self.kinds_within(&GREEN),
            Yaku::Chuuren => {
                self.satisfies(Yaku::Chinitsu)
                    && self.counts.iter().filter(|&&c| c > 0).count() == 9
                    && self.tiles[..3].iter().all(|&t| t == self.tiles[0])
                    && self.tiles[self.tiles.len() - 3..].iter().all(|&t| t == self.tiles[self.tiles.len() - 1])
            }
            Yaku::Ippatsu => self.options.ippatsu,
            Yaku::Hotei => self.options.hotei,
        }
    }
}
