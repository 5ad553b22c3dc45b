use crate::algo::tenpai::Candidate;
use crate::algo::wait::WaitScore;
use crate::hand::{Counts, tiles_of, tiles_to_string};
use crate::options::Options;
use crate::protocol::Reaction;
use crate::tile::{KINDS, Tile};

use anyhow::Result;
use derivative::Derivative;
use serde_json as json;

/// Tiles dealt to each seat.
pub const PLAYER_TILES: usize = 34;
/// Discards each seat makes before the game is drawn.
pub const DISCARDS: usize = 17;

/// Everything one seat can observe of a game, kept up to date from protocol
/// events, plus the decisions the bot makes from it.
///
/// The state is reset by every `phase_one`, so one value can follow any
/// number of consecutive games.
#[derive(Debug, Clone, Derivative)]
#[derivative(Default)]
pub struct PlayerState {
    pub player_id: usize,
    pub east: usize,
    /// Seat wind and dora indicator of the current game.
    pub options: Options,
    /// Tiles still available for discarding. The declared hand is not
    /// included once it is declared.
    #[derivative(Default(value = "[0; 34]"))]
    pub concealed: Counts,
    /// Sorted, empty until declared.
    pub hand: Vec<Tile>,
    /// Every structural wait of `hand` with its best score. Discarding any
    /// of them makes the seat furiten, whether it scores or not.
    pub waits: Vec<WaitScore>,
    /// The evaluation `hand` was picked from, when the bot picked it.
    pub tenpai: Option<Candidate>,
    /// Own 34 tiles plus the opponent's discards. The dora indicator is not
    /// counted.
    #[derivative(Default(value = "[0; 34]"))]
    pub tiles_seen: Counts,
    /// Kinds the opponent discarded.
    #[derivative(Default(value = "[false; 34]"))]
    pub safe_tiles: [bool; KINDS],
    pub discards: Vec<Tile>,
    pub opponent_discards: Vec<Tile>,
    pub at_furiten: bool,
    pub phase_two: bool,
    pub finished: bool,
}

impl PlayerState {
    /// Returns the reaction to send back, if any.
    pub fn update_json(&mut self, event_json: &str) -> Result<Option<Reaction>> {
        let event = json::from_str(event_json)?;
        self.update(&event)
    }

    #[inline]
    #[must_use]
    pub const fn is_east(&self) -> bool {
        self.player_id == self.east
    }

    #[must_use]
    pub const fn seat_wind(&self) -> Tile {
        if self.is_east() { Tile::X1 } else { Tile::X3 }
    }

    #[inline]
    #[must_use]
    pub fn is_wait(&self, tile: Tile) -> bool {
        self.waits.iter().any(|w| w.tile == tile)
    }

    /// Whether the opponent discarding `tile` would end the game in our win,
    /// not counting ippatsu and hotei.
    #[must_use]
    pub fn can_ron(&self, tile: Tile) -> bool {
        !self.at_furiten && self.waits.iter().any(|w| w.tile == tile && w.is_win())
    }

    /// Copies of each kind this seat cannot see, the dora indicator counted
    /// as seen.
    #[must_use]
    pub fn unseen(&self) -> Counts {
        let mut unseen = [0; KINDS];
        for (tile, n) in Tile::all().zip(&mut unseen) {
            let ind = u8::from(self.options.dora_ind == Some(tile));
            *n = 4u8.saturating_sub(self.tiles_seen[tile.as_usize()]).saturating_sub(ind);
        }
        unseen
    }

    /// For debug only.
    ///
    /// Return a human readable description of the current state.
    #[must_use]
    pub fn brief_info(&self) -> String {
        let waits = self
            .waits
            .iter()
            .map(|w| format!("{} ({})", w.tile, w.score))
            .collect::<Vec<_>>()
            .join(", ");
        let dora_ind = self.options.dora_ind.map_or_else(|| "?".to_owned(), |t| t.to_string());
        let tenpai = self
            .tenpai
            .as_ref()
            .map_or_else(|| "-".to_owned(), Candidate::to_candidate_string);

        format!(
            r#"player: {}
seat wind: {}
dora indicator: {dora_ind}
hand: {}
waits: {waits}
tenpai: {tenpai}
furiten: {}
concealed: {}
discards: {}
opponent discards: {}
finished: {}"#,
            self.player_id,
            self.seat_wind(),
            tiles_to_string(&self.hand),
            self.at_furiten,
            tiles_to_string(&tiles_of(&self.concealed)),
            tiles_to_string(&self.discards),
            tiles_to_string(&self.opponent_discards),
            self.finished,
        )
    }
}
