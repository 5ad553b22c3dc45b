//! Danger of discarding each tile kind against the opponent's declared hand.
//!
//! The opponent never changes its 13 tiles after declaring, and discarding
//! one of its own waits makes it furiten for the rest of the game. Its
//! discards are therefore permanently safe, and anything else is judged from
//! the copies this player can see.
use crate::hand::Counts;
use crate::must_tile;
use crate::tile::{KINDS, Tile};
use std::fmt;
use std::sync::LazyLock;

use serde::Serialize;
use tinyvec::ArrayVec;

/// Coarse danger class of a tile, safest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WallDanger {
    /// The opponent already discarded it.
    Safe,
    /// Every run shape waiting on it needs a kind with no copy unseen, so
    /// only tanki and shanpon remain. Honors always land here.
    NoChance,
    /// Every run shape waiting on it needs a kind with at most one copy
    /// unseen.
    OneChance,
    #[default]
    Unknown,
}

impl WallDanger {
    #[must_use]
    pub const fn to_acronym(self) -> &'static str {
        match self {
            Self::Safe => "G",
            Self::NoChance => "NC",
            Self::OneChance => "OC",
            Self::Unknown => "",
        }
    }
}

impl fmt::Display for WallDanger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_acronym())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitKind {
    Ryanmen,
    Kanchan,
    Penchan,
    Tanki,
    Shanpon,
}

/// A wait shape independent of the board.
#[derive(Debug, Clone, Serialize)]
pub struct GeneralWait {
    pub tiles: ArrayVec<[Tile; 2]>,
    pub waits: ArrayVec<[Tile; 2]>,
    pub kind: WaitKind,
}

/// A wait shape the opponent might hold, weighted against the board.
#[derive(Debug, Clone, Serialize)]
pub struct Wait {
    pub wait: GeneralWait,
    pub genbutsu: bool,
    pub combinations: u8,
    pub dora_involved: bool,
    pub weight: f32,
}

#[derive(Debug, Clone)]
pub struct PlayerDanger {
    pub tile_weights: [f32; KINDS],
    pub waits: Vec<Wait>,
}

impl PlayerDanger {
    /// Most dangerous first.
    #[must_use]
    pub fn sorted_tile_weights(&self) -> Vec<(Tile, f32)> {
        let mut tile_weights: Vec<_> = self
            .tile_weights
            .iter()
            .enumerate()
            .map(|(tile, &weight)| (must_tile!(tile), weight))
            .collect();
        tile_weights.sort_by(|(_, a), (_, b)| b.total_cmp(a));
        tile_weights
    }

    pub fn tile_waits(&self, tile: Tile) -> impl Iterator<Item = &Wait> {
        self.waits.iter().filter(move |w| w.wait.waits.contains(&tile))
    }
}

fn general(tiles: &[Tile], waits: &[Tile], kind: WaitKind) -> GeneralWait {
    GeneralWait {
        tiles: tiles.iter().copied().collect(),
        waits: waits.iter().copied().collect(),
        kind,
    }
}

pub static POSSIBLE_WAITS: LazyLock<Vec<GeneralWait>> = LazyLock::new(|| {
    let mut all = vec![];
    for base in [Tile::M1, Tile::P1, Tile::S1] {
        let at = |n: u8| base.offset(n);
        for n in 1..7 {
            if let (Some(a), Some(b), Some(lo), Some(hi)) = (at(n), at(n + 1), at(n - 1), at(n + 2)) {
                all.push(general(&[a, b], &[lo, hi], WaitKind::Ryanmen));
            }
        }
        for n in 0..7 {
            if let (Some(lo), Some(mid), Some(hi)) = (at(n), at(n + 1), at(n + 2)) {
                all.push(general(&[lo, hi], &[mid], WaitKind::Kanchan));
            }
        }
        if let (Some(t1), Some(t2), Some(t3), Some(t7), Some(t8), Some(t9)) = (at(0), at(1), at(2), at(6), at(7), at(8)) {
            all.push(general(&[t1, t2], &[t3], WaitKind::Penchan));
            all.push(general(&[t8, t9], &[t7], WaitKind::Penchan));
        }
    }
    for t in Tile::all() {
        all.push(general(&[t], &[t], WaitKind::Shanpon));
        all.push(general(&[t], &[t], WaitKind::Tanki));
    }
    all
});

/// Weight every wait shape the opponent could hold.
///
/// `unseen` counts the copies this player cannot see. Shapes waiting on a
/// safe tile weigh nothing, since the opponent would be furiten.
#[must_use]
pub fn calculate_player_danger(safe: &[bool; KINDS], unseen: &Counts, dora: Option<Tile>) -> PlayerDanger {
    let mut waits = vec![];
    let mut tile_weights = [0.; KINDS];
    for wait in POSSIBLE_WAITS.iter() {
        let genbutsu = wait.waits.iter().any(|t| safe[t.as_usize()]);
        let combinations = if wait.kind == WaitKind::Shanpon {
            let n = unseen[wait.tiles[0].as_usize()];
            n * n.saturating_sub(1) / 2
        } else {
            wait.tiles.iter().map(|t| unseen[t.as_usize()]).product()
        };
        let dora_involved = dora.is_some_and(|d| wait.tiles.contains(&d) || wait.waits.contains(&d));

        let weight = if genbutsu {
            0.
        } else {
            let mut weight = f32::from(combinations);
            weight *= match wait.kind {
                WaitKind::Ryanmen => 3.5,
                WaitKind::Tanki | WaitKind::Shanpon if wait.tiles[0].is_honor() => 1.7,
                WaitKind::Tanki | WaitKind::Shanpon | WaitKind::Penchan => 1.,
                WaitKind::Kanchan => 0.21,
            };
            if dora_involved {
                weight *= 1.2;
            }
            weight
        };
        for t in &wait.waits {
            tile_weights[t.as_usize()] += weight;
        }
        waits.push(Wait {
            wait: wait.clone(),
            genbutsu,
            combinations,
            dora_involved,
            weight,
        });
    }
    PlayerDanger { tile_weights, waits }
}

/// Danger class of every kind, from the copies seen and the opponent's
/// discards.
#[must_use]
pub fn calculate_wall_danger(tiles_seen: &Counts, safe: &[bool; KINDS]) -> [WallDanger; KINDS] {
    let unseen = |t: Tile| 4u8.saturating_sub(tiles_seen[t.as_usize()]);
    let mut result = [WallDanger::Unknown; KINDS];
    for (tile, danger) in Tile::all().zip(&mut result) {
        if safe[tile.as_usize()] {
            *danger = WallDanger::Safe;
            continue;
        }
        if tile.is_honor() {
            *danger = WallDanger::NoChance;
            continue;
        }

        let n = tile.rank();
        let base = must_tile!(tile.as_u8() + 1 - n);
        let at = |rank: u8| (1..=9).contains(&rank).then(|| base.offset(rank - 1)).flatten();
        // two-tile shapes completed by `tile`: below it, around it, above it
        let shapes = [(n.wrapping_sub(2), n.wrapping_sub(1)), (n.wrapping_sub(1), n + 1), (n + 1, n + 2)];
        let thinnest: ArrayVec<[u8; 3]> = shapes
            .into_iter()
            .filter_map(|(a, b)| Some(unseen(at(a)?).min(unseen(at(b)?))))
            .collect();
        *danger = if thinnest.iter().all(|&c| c == 0) {
            WallDanger::NoChance
        } else if thinnest.iter().all(|&c| c <= 1) {
            WallDanger::OneChance
        } else {
            WallDanger::Unknown
        };
    }
    result
}
