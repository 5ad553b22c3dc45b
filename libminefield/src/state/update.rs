use super::{DISCARDS, PLAYER_TILES, PlayerState};
use crate::algo::wait::structural_waits;
use crate::hand::{counts_of, validate};
use crate::options::Options;
use crate::protocol::{Event, MoveType, Reaction};
use crate::tile::Tile;

use anyhow::{Context, Result, ensure};
use log::debug;

impl PlayerState {
    /// Apply `event` and return the reaction it asks for, if any.
    #[inline]
    pub fn update(&mut self, event: &Event) -> Result<Option<Reaction>> {
        self.update_inner(event).with_context(|| format!("on event {event:?}"))
    }

    fn update_inner(&mut self, event: &Event) -> Result<Option<Reaction>> {
        match *event {
            Event::PhaseOne {
                ref tiles,
                dora_ind,
                you,
                east,
            } => self.phase_one(tiles, dora_ind, you, east)?,
            Event::StartMove { move_type, .. } => return self.start_move(move_type).map(Some),
            Event::PhaseTwo => {
                ensure!(!self.hand.is_empty(), "phase two before declaring a hand");
                self.phase_two = true;
            }
            Event::Discarded { player, tile } => self.discarded(player, tile)?,
            Event::Ron { .. } | Event::Draw | Event::Abort { .. } => self.finished = true,
            Event::EndMove | Event::WaitForPhaseTwo => (),
        }
        Ok(None)
    }

    pub fn phase_one(&mut self, tiles: &[Tile], dora_ind: Tile, you: usize, east: usize) -> Result<()> {
        ensure!(you < 2 && east < 2, "seats must be 0 or 1, got you={you} east={east}");
        let counts = counts_of(&validate(tiles, PLAYER_TILES)?)?;
        ensure!(
            counts[dora_ind.as_usize()] < 4,
            "dora indicator {dora_ind} would be a fifth copy",
        );

        *self = Self {
            player_id: you,
            east,
            concealed: counts,
            tiles_seen: counts,
            ..Default::default()
        };
        self.options = Options::new(self.seat_wind(), dora_ind);
        Ok(())
    }

    pub fn start_move(&mut self, move_type: MoveType) -> Result<Reaction> {
        ensure!(!self.finished, "the game is over");
        let reaction = match move_type {
            MoveType::Hand => Reaction::Hand {
                hand: self.choose_hand()?,
            },
            MoveType::Discard => Reaction::Discard {
                tile: self.discard()?,
            },
        };
        Ok(reaction)
    }

    /// Take `hand` out of the concealed tiles and cache its waits.
    pub fn declare_hand(&mut self, hand: &[Tile]) -> Result<()> {
        ensure!(self.hand.is_empty(), "hand already declared");
        let hand = validate(hand, 13)?;

        let mut rest = self.concealed;
        for &tile in &hand {
            let c = &mut rest[tile.as_usize()];
            ensure!(*c > 0, "{tile} is not among the tiles to choose from");
            *c -= 1;
        }
        self.concealed = rest;
        self.waits = structural_waits(hand.clone(), &self.options).collect();
        self.hand = hand;
        Ok(())
    }

    pub fn discarded(&mut self, player: usize, tile: Tile) -> Result<()> {
        ensure!(player < 2, "seat {player} is out of range");
        ensure!(!self.hand.is_empty(), "discard before declaring a hand");

        if player == self.player_id {
            ensure!(self.discards.len() < DISCARDS, "more than {DISCARDS} discards");
            let c = &mut self.concealed[tile.as_usize()];
            ensure!(*c > 0, "discarded {tile} which is not held");
            *c -= 1;
            self.discards.push(tile);
            if self.is_wait(tile) && !self.at_furiten {
                debug!("discarded own wait {tile}, furiten from now on");
                self.at_furiten = true;
            }
        } else {
            ensure!(
                self.opponent_discards.len() < DISCARDS,
                "opponent made more than {DISCARDS} discards",
            );
            let seen = &mut self.tiles_seen[tile.as_usize()];
            ensure!(*seen < 4, "a fifth {tile} was discarded");
            *seen += 1;
            self.safe_tiles[tile.as_usize()] = true;
            self.opponent_discards.push(tile);
            // a wait that is passed on is furiten, a wait that wins ends the game
            if self.is_wait(tile) {
                self.at_furiten = true;
            }
        }
        Ok(())
    }
}
