//! JSON lines exchanged between a game server and a bot.
//!
//! Every message is a flat object tagged by `"type"`. The server sends
//! [`Event`]s and the bot answers a `start_move` with a [`Reaction`].
pub mod bot;

pub use bot::Bot;

use crate::algo::point::Limit;
use crate::algo::yaku::Yaku;
use crate::tile::Tile;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveType {
    Hand,
    Discard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Deal. `you` is the receiving seat.
    PhaseOne {
        tiles: Vec<Tile>,
        dora_ind: Tile,
        you: usize,
        east: usize,
    },
    /// The receiving seat must answer with a reaction of `move_type`.
    StartMove {
        move_type: MoveType,
        /// Seconds.
        time_limit: u32,
    },
    EndMove,
    /// Sent to a seat that declared its hand before the opponent did.
    WaitForPhaseTwo,
    /// Both hands are declared and discarding starts.
    PhaseTwo,
    Discarded {
        player: usize,
        tile: Tile,
    },
    Ron {
        player: usize,
        hand: Vec<Tile>,
        tile: Tile,
        yaku: Vec<Yaku>,
        #[serde(default)]
        dora: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        uradora_ind: Option<Tile>,
        limit: Limit,
        points: u32,
    },
    Draw,
    Abort {
        culprit: Option<usize>,
        description: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reaction {
    Hand { hand: Vec<Tile> },
    Discard { tile: Tile },
}

impl Event {
    /// Whether the game is over after this event.
    #[inline]
    #[must_use]
    pub const fn is_game_end(&self) -> bool {
        matches!(self, Self::Ron { .. } | Self::Draw | Self::Abort { .. })
    }

    /// The seat that acted, for events that have one.
    #[must_use]
    pub fn actor(&self) -> Option<usize> {
        match *self {
            Self::Discarded { player, .. } | Self::Ron { player, .. } => Some(player),
            Self::Abort { culprit, .. } => culprit,
            _ => None,
        }
    }
}
