use crate::tile::Tile;
use std::fmt;

use serde::Serialize;
use tinyvec::ArrayVec;

/// A group of tiles inside a decomposed hand.
///
/// For `Chi` the tile is the lowest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "type", content = "tile", rename_all = "snake_case")]
pub enum Meld {
    Pair(Tile),
    Pon(Tile),
    Chi(Tile),
}

impl Default for Meld {
    fn default() -> Self {
        Self::Pair(Tile::default())
    }
}

impl Meld {
    /// Build a run starting at `tile`, if that run exists.
    #[must_use]
    pub fn chi(tile: Tile) -> Option<Self> {
        (!tile.is_honor() && tile.rank() <= 7).then_some(Self::Chi(tile))
    }

    #[inline]
    #[must_use]
    pub const fn tile(self) -> Tile {
        match self {
            Self::Pair(t) | Self::Pon(t) | Self::Chi(t) => t,
        }
    }

    #[must_use]
    pub fn tiles(self) -> ArrayVec<[Tile; 3]> {
        let mut ret = ArrayVec::new();
        match self {
            Self::Pair(t) => ret.extend([t, t]),
            Self::Pon(t) => ret.extend([t, t, t]),
            Self::Chi(t) => ret.extend((0..3).filter_map(|i| t.offset(i))),
        }
        ret
    }

    #[must_use]
    pub fn contains(self, tile: Tile) -> bool {
        match self {
            Self::Pair(t) | Self::Pon(t) => t == tile,
            Self::Chi(t) => tile.suit() == t.suit() && (t.rank()..t.rank() + 3).contains(&tile.rank()),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_pon(self) -> bool {
        matches!(self, Self::Pon(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_chi(self) -> bool {
        matches!(self, Self::Chi(_))
    }

    /// Every tile of the group is a terminal, or the group is a terminal run.
    #[must_use]
    pub fn is_junchan(self) -> bool {
        match self {
            Self::Pair(t) | Self::Pon(t) => t.is_terminal(),
            Self::Chi(t) => matches!(t.rank(), 1 | 7),
        }
    }

    #[must_use]
    pub fn is_chanta(self) -> bool {
        self.is_junchan() || self.tile().is_honor()
    }
}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pair(t) => write!(f, "pair {t}"),
            Self::Pon(t) => write!(f, "pon {t}"),
            Self::Chi(t) => write!(f, "chi {t}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::t;

    #[test]
    fn expand() {
        assert_eq!(Meld::Pair(Tile::X5).tiles().as_slice(), t![X5, X5]);
        assert_eq!(Meld::Pon(Tile::M2).tiles().as_slice(), t![M2, M2, M2]);
        assert_eq!(Meld::Chi(Tile::S7).tiles().as_slice(), t![S7, S8, S9]);
        assert_eq!(Meld::chi(Tile::S8), None);
        assert_eq!(Meld::chi(Tile::X1), None);
    }

    #[test]
    fn membership() {
        let chi = Meld::Chi(Tile::P3);
        assert!(chi.contains(Tile::P3) && chi.contains(Tile::P5));
        assert!(!chi.contains(Tile::P6));
        assert!(!chi.contains(Tile::M4));
        assert!(Meld::Pon(Tile::X1).contains(Tile::X1));
    }

    #[test]
    fn terminal_groups() {
        assert!(Meld::Chi(Tile::M7).is_junchan());
        assert!(!Meld::Chi(Tile::M6).is_chanta());
        assert!(Meld::Pair(Tile::P9).is_junchan());
        assert!(!Meld::Pon(Tile::X2).is_junchan());
        assert!(Meld::Pon(Tile::X2).is_chanta());
    }
}
