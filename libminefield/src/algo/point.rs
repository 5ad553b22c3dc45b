use std::fmt;

use serde::{Deserialize, Serialize};

/// Payout per limit tier.
pub const BASE_POINTS: [u32; 7] = [0, 8000, 12000, 16000, 24000, 32000, 64000];

/// Fan at which a hand counts as yakuman. Ordinary fan is capped here.
pub const YAKUMAN_FAN: u8 = 13;

/// Payout tier of a hand. `None` means the hand is below the floor and is
/// not a valid win.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Limit {
    #[default]
    None,
    Mangan,
    Haneman,
    Baiman,
    Sanbaiman,
    Yakuman,
    DoubleYakuman,
}

/// Fan and fu of one evaluated hand, ordered by fan and then fu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Score {
    pub fan: u8,
    pub fu: u8,
}

impl Limit {
    /// Includes the mandatory +1 fan declaration bonus, which never lifts a
    /// hand past yakuman.
    #[must_use]
    pub const fn calc(fan: u8, fu: u8) -> Self {
        let fan = if fan < YAKUMAN_FAN { fan + 1 } else { fan };
        match fan {
            0..3 => Self::None,
            3 if fu < 60 => Self::None,
            4 if fu < 30 => Self::None,
            3..=5 => Self::Mangan,
            6..=7 => Self::Haneman,
            8..=10 => Self::Baiman,
            11..=12 => Self::Sanbaiman,
            13 => Self::Yakuman,
            _ => Self::DoubleYakuman,
        }
    }

    #[inline]
    #[must_use]
    pub const fn tier(self) -> u8 {
        self as u8
    }

    #[inline]
    #[must_use]
    pub const fn points(self) -> u32 {
        BASE_POINTS[self as usize]
    }

    #[inline]
    #[must_use]
    pub const fn is_win(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl Score {
    #[inline]
    #[must_use]
    pub const fn limit(self) -> Limit {
        Limit::calc(self.fan, self.fu)
    }

    #[inline]
    #[must_use]
    pub const fn points(self) -> u32 {
        self.limit().points()
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "no win",
            Self::Mangan => "mangan",
            Self::Haneman => "haneman",
            Self::Baiman => "baiman",
            Self::Sanbaiman => "sanbaiman",
            Self::Yakuman => "yakuman",
            Self::DoubleYakuman => "double yakuman",
        })
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}fan{}fu = {}", self.fan, self.fu, self.points())
    }
}
