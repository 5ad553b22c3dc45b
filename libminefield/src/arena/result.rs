use crate::algo::point::Limit;
use crate::algo::yaku::Yaku;
use crate::protocol::Event;
use crate::tile::Tile;
use std::fmt;

use derive_more::{Add, AddAssign, Sum};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameResult {
    Ron {
        player: usize,
        tile: Tile,
        yaku: Vec<Yaku>,
        limit: Limit,
        points: u32,
    },
    Draw,
    Aborted {
        culprit: Option<usize>,
        description: String,
    },
}

impl GameResult {
    /// The result an end-of-game event announces.
    #[must_use]
    pub fn from_event(event: &Event) -> Option<Self> {
        let ret = match event {
            Event::Ron {
                player,
                tile,
                yaku,
                limit,
                points,
                ..
            } => Self::Ron {
                player: *player,
                tile: *tile,
                yaku: yaku.clone(),
                limit: *limit,
                points: *points,
            },
            Event::Draw => Self::Draw,
            Event::Abort { culprit, description } => Self::Aborted {
                culprit: *culprit,
                description: description.clone(),
            },
            _ => return None,
        };
        Some(ret)
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ron {
                player,
                tile,
                yaku,
                limit,
                points,
            } => {
                let yaku = yaku.iter().map(|y| y.to_string()).collect::<Vec<_>>().join(", ");
                write!(f, "player {player} ron on {tile}: {yaku} ({limit}, {points})")
            }
            Self::Draw => f.write_str("draw"),
            Self::Aborted {
                culprit: Some(culprit),
                description,
            } => write!(f, "aborted by player {culprit}: {description}"),
            Self::Aborted {
                culprit: None,
                description,
            } => write!(f, "aborted: {description}"),
        }
    }
}

/// Summary of many games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Add, AddAssign, Sum, Serialize)]
pub struct Tally {
    pub games: u64,
    pub rons: u64,
    pub draws: u64,
    pub aborts: u64,
    pub yakuman: u64,
    pub points: u64,
}

impl From<&GameResult> for Tally {
    fn from(result: &GameResult) -> Self {
        let mut tally = Self {
            games: 1,
            ..Default::default()
        };
        match *result {
            GameResult::Ron { limit, points, .. } => {
                tally.rons = 1;
                tally.points = u64::from(points);
                tally.yakuman = u64::from(limit >= Limit::Yakuman);
            }
            GameResult::Draw => tally.draws = 1,
            GameResult::Aborted { .. } => tally.aborts = 1,
        }
        tally
    }
}

impl Tally {
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.
        } else {
            self.rons as f64 / self.games as f64
        }
    }

    #[must_use]
    pub fn avg_points(&self) -> f64 {
        if self.rons == 0 {
            0.
        } else {
            self.points as f64 / self.rons as f64
        }
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "games: {}, rons: {} ({:.2}%), draws: {}, aborts: {}, yakuman: {}, avg points: {:.0}",
            self.games,
            self.rons,
            self.win_rate() * 100.,
            self.draws,
            self.aborts,
            self.yakuman,
            self.avg_points(),
        )
    }
}
