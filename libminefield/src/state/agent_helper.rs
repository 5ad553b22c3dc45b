use super::PlayerState;
use crate::algo::danger::{PlayerDanger, WallDanger, calculate_player_danger, calculate_wall_danger};
use crate::algo::tenpai::choose_tenpai;
use crate::hand::tiles_of;
use crate::tile::{KINDS, Tile};
use std::cmp::Reverse;

use anyhow::{Context, Result, ensure};
use log::debug;

impl PlayerState {
    /// Pick the best tenpai hand from the concealed tiles and declare it.
    pub fn choose_hand(&mut self) -> Result<Vec<Tile>> {
        let candidate = choose_tenpai(&tiles_of(&self.concealed), &self.options, &self.tiles_seen)?;
        self.declare_hand(&candidate.hand)?;
        debug!("declared {}", candidate.to_candidate_string());
        self.tenpai = Some(candidate);
        Ok(self.hand.clone())
    }

    /// Danger class of every kind against the opponent.
    #[must_use]
    pub fn wall_danger(&self) -> [WallDanger; KINDS] {
        let mut seen = self.tiles_seen;
        if let Some(ind) = self.options.dora_ind {
            seen[ind.as_usize()] = seen[ind.as_usize()].saturating_add(1);
        }
        calculate_wall_danger(&seen, &self.safe_tiles)
    }

    #[must_use]
    pub fn player_danger(&self) -> PlayerDanger {
        let dora = self.options.dora_ind.map(Tile::next_wrap);
        calculate_player_danger(&self.safe_tiles, &self.unseen(), dora)
    }

    /// The tile to discard next.
    ///
    /// Among the kinds still held, prefer one the opponent already discarded,
    /// then one that is not our own wait, then the lowest danger class, then
    /// the kind held most often, then the lowest tile.
    pub fn discard(&self) -> Result<Tile> {
        ensure!(!self.hand.is_empty(), "no hand declared yet");
        let danger = self.wall_danger();
        Tile::all()
            .filter(|t| self.concealed[t.as_usize()] > 0)
            .min_by_key(|&t| {
                let i = t.as_usize();
                (!self.safe_tiles[i], self.is_wait(t), danger[i], Reverse(self.concealed[i]), t)
            })
            .context("no tiles left to discard")
    }
}
