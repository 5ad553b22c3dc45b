//! Tile kinds and their classification.
//!
//! There are 34 kinds: `M1`-`M9`, `P1`-`P9`, `S1`-`S9` and the honors
//! `X1`-`X7` (winds E S W N, then the dragons haku, hatsu and chun). The
//! numeric id of a tile follows that order, so deriving `Ord` on the id gives
//! the suit-then-rank ordering the decomposition relies on.
use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde_with::{DeserializeFromStr, SerializeDisplay};

pub const KINDS: usize = 34;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
#[repr(transparent)]
pub struct Tile(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    M,
    P,
    S,
    X,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTileError {
    Length(String),
    Suit(char),
    Rank(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBoundError(pub usize);

/// Build a `Tile` from an id that is known to be in range.
#[macro_export]
macro_rules! must_tile {
    ($id:expr) => {
        $crate::tile::Tile::try_from($id).expect("tile id out of range")
    };
}

/// `t![M1, X5]` expands to an array of tiles.
#[macro_export]
macro_rules! t {
    ($($name:ident),* $(,)?) => {
        [$($crate::tile::Tile::$name),*]
    };
}

macro_rules! tile_consts {
    ($($name:ident = $id:literal),* $(,)?) => {
        impl Tile {
            $(pub const $name: Tile = Tile($id);)*
        }
    };
}

tile_consts! {
    M1 = 0, M2 = 1, M3 = 2, M4 = 3, M5 = 4, M6 = 5, M7 = 6, M8 = 7, M9 = 8,
    P1 = 9, P2 = 10, P3 = 11, P4 = 12, P5 = 13, P6 = 14, P7 = 15, P8 = 16, P9 = 17,
    S1 = 18, S2 = 19, S3 = 20, S4 = 21, S5 = 22, S6 = 23, S7 = 24, S8 = 25, S9 = 26,
    X1 = 27, X2 = 28, X3 = 29, X4 = 30, X5 = 31, X6 = 32, X7 = 33,
}

pub const TERMINALS: [Tile; 6] = t![M1, M9, P1, P9, S1, S9];
pub const WINDS: [Tile; 4] = t![X1, X2, X3, X4];
pub const DRAGONS: [Tile; 3] = t![X5, X6, X7];
pub const HONORS: [Tile; 7] = t![X1, X2, X3, X4, X5, X6, X7];
pub const YAOCHU: [Tile; 13] = t![M1, M9, P1, P9, S1, S9, X1, X2, X3, X4, X5, X6, X7];

impl Tile {
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// All 34 kinds in order.
    pub fn all() -> impl DoubleEndedIterator<Item = Tile> + ExactSizeIterator + Clone {
        (0..KINDS as u8).map(Tile)
    }

    #[inline]
    #[must_use]
    pub const fn suit(self) -> Suit {
        match self.0 / 9 {
            0 => Suit::M,
            1 => Suit::P,
            2 => Suit::S,
            _ => Suit::X,
        }
    }

    /// 1-based rank within the suit; honors count 1 to 7.
    #[inline]
    #[must_use]
    pub const fn rank(self) -> u8 {
        self.0 % 9 + 1
    }

    #[inline]
    #[must_use]
    pub const fn is_honor(self) -> bool {
        self.0 >= 27
    }

    #[inline]
    #[must_use]
    pub const fn is_wind(self) -> bool {
        matches!(self.0, 27..=30)
    }

    #[inline]
    #[must_use]
    pub const fn is_dragon(self) -> bool {
        matches!(self.0, 31..=33)
    }

    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !self.is_honor() && matches!(self.rank(), 1 | 9)
    }

    #[inline]
    #[must_use]
    pub const fn is_yaochu(self) -> bool {
        self.is_honor() || self.is_terminal()
    }

    /// The tile `offset` ranks above this one in the same numbered suit.
    #[must_use]
    pub const fn offset(self, offset: u8) -> Option<Tile> {
        if self.is_honor() || self.rank() + offset > 9 {
            None
        } else {
            Some(Tile(self.0 + offset))
        }
    }

    /// The bonus tile for this dora indicator.
    ///
    /// Numbered tiles wrap within their suit, winds cycle E S W N and dragons
    /// cycle haku, hatsu, chun.
    #[must_use]
    pub const fn next_wrap(self) -> Tile {
        match self.0 {
            30 => Tile::X1,
            33 => Tile::X5,
            27..=32 => Tile(self.0 + 1),
            id => Tile(id / 9 * 9 + (id % 9 + 1) % 9),
        }
    }
}

impl TryFrom<u8> for Tile {
    type Error = OutOfBoundError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Self::try_from(v as usize)
    }
}

impl TryFrom<usize> for Tile {
    type Error = OutOfBoundError;

    fn try_from(v: usize) -> Result<Self, Self::Error> {
        if v < KINDS {
            Ok(Self(v as u8))
        } else {
            Err(OutOfBoundError(v))
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Suit::M => "M",
            Suit::P => "P",
            Suit::S => "S",
            Suit::X => "X",
        })
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.suit(), self.rank())
    }
}

impl FromStr for Tile {
    type Err = ParseTileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(suit), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ParseTileError::Length(s.to_owned()));
        };
        let (base, max_rank) = match suit.to_ascii_uppercase() {
            'M' => (0, 9),
            'P' => (9, 9),
            'S' => (18, 9),
            'X' => (27, 7),
            c => return Err(ParseTileError::Suit(c)),
        };
        match rank.to_digit(10) {
            Some(n @ 1..) if n <= max_rank => Ok(Tile(base + n as u8 - 1)),
            _ => Err(ParseTileError::Rank(s.to_owned())),
        }
    }
}

impl fmt::Display for ParseTileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length(s) => write!(f, "tile {s:?} must be a suit letter followed by a rank"),
            Self::Suit(c) => write!(f, "unknown suit {c:?}"),
            Self::Rank(s) => write!(f, "rank out of range in tile {s:?}"),
        }
    }
}

impl Error for ParseTileError {}

impl fmt::Display for OutOfBoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile id {} is out of bound [0, {KINDS})", self.0)
    }
}

impl Error for OutOfBoundError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_and_display() {
        for tile in Tile::all() {
            let s = tile.to_string();
            assert_eq!(s.parse::<Tile>().unwrap(), tile, "failed for {s}");
        }
        assert_eq!("x5".parse::<Tile>().unwrap(), Tile::X5);
        assert!("X8".parse::<Tile>().is_err());
        assert!("M0".parse::<Tile>().is_err());
        assert!("Q1".parse::<Tile>().is_err());
        assert!("M12".parse::<Tile>().is_err());
        assert!("".parse::<Tile>().is_err());
    }

    #[test]
    fn ordering() {
        assert!(Tile::M9 < Tile::P1);
        assert!(Tile::S9 < Tile::X1);
        let mut tiles = t![X5, S1, M3, P2, M1];
        tiles.sort_unstable();
        assert_eq!(tiles, t![M1, M3, P2, S1, X5]);
    }

    #[test]
    fn classification() {
        assert!(Tile::M1.is_terminal());
        assert!(!Tile::X1.is_terminal());
        assert!(Tile::X1.is_wind() && Tile::X1.is_yaochu());
        assert!(Tile::X7.is_dragon());
        assert!(!Tile::P5.is_yaochu());
        assert_eq!(Tile::S7.offset(2), Some(Tile::S9));
        assert_eq!(Tile::S8.offset(2), None);
        assert_eq!(Tile::X1.offset(1), None);
    }

    #[test]
    fn dora_wraparound() {
        let test_one = |ind: Tile, expected: Tile| {
            assert_eq!(ind.next_wrap(), expected, "failed for indicator {ind}");
        };
        test_one(Tile::M2, Tile::M3);
        test_one(Tile::P9, Tile::P1);
        test_one(Tile::S9, Tile::S1);
        test_one(Tile::X1, Tile::X2);
        test_one(Tile::X4, Tile::X1);
        test_one(Tile::X6, Tile::X7);
        test_one(Tile::X7, Tile::X5);
    }

    #[test]
    fn serde_as_string() {
        let json = serde_json::to_string(&t![M1, X7]).unwrap();
        assert_eq!(json, r#"["M1","X7"]"#);
        let tiles: Vec<Tile> = serde_json::from_str(r#"["P5","S9"]"#).unwrap();
        assert_eq!(tiles, t![P5, S9]);
    }
}
