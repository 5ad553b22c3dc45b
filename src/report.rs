//! What a seat can work out about its own position beyond the raw state:
//! the value of each wait, the best hands still available to declare and the
//! danger of every tile it could discard.
use std::fmt;

use console::style;
use minefield::algo::danger::{PlayerDanger, WallDanger};
use minefield::algo::tenpai::{Candidate, CandidateColumn, TenpaiCalculator};
use minefield::algo::wait::{WaitScore, eval_hand};
use minefield::hand::tiles_of;
use minefield::options::Options;
use minefield::state::PlayerState;
use minefield::tile::{KINDS, Tile};

pub struct Report {
    state: PlayerState,
    /// Best hands to declare by expected value, only before declaring.
    candidates: Vec<Candidate>,
    /// Every structural wait of the declared hand, with its yaku.
    waits: Vec<(WaitScore, String)>,
    danger: [WallDanger; KINDS],
    player_danger: PlayerDanger,
}

fn yaku_string(hand: &[Tile], wait: Tile, options: &Options) -> String {
    let mut full = hand.to_vec();
    full.push(wait);
    eval_hand(&full, wait, options).map_or_else(String::new, |(yaku, dora, _)| {
        let mut names: Vec<_> = yaku.iter().map(|y| y.to_string()).collect();
        if dora > 0 {
            names.push(format!("dora {dora}"));
        }
        names.join(" ")
    })
}

impl Report {
    pub fn from_state(state: PlayerState, top: usize) -> Self {
        let mut candidates = vec![];
        let concealed = tiles_of(&state.concealed);
        if state.hand.is_empty() && concealed.len() > 13 {
            let calc = TenpaiCalculator {
                options: &state.options,
                tiles_seen: &state.tiles_seen,
            };
            // a malformed state just has nothing to suggest
            candidates = calc.calc(&concealed).unwrap_or_default();
            candidates.sort_by(|a, b| b.cmp(a, CandidateColumn::EV));
            candidates.truncate(top);
        }
        let waits = state
            .waits
            .iter()
            .map(|w| (*w, yaku_string(&state.hand, w.tile, &state.options)))
            .collect();

        Self {
            candidates,
            waits,
            danger: state.wall_danger(),
            player_danger: state.player_danger(),
            state,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = &self.state;
        writeln!(f, "{}", style(state.brief_info()).dim())?;

        if !self.waits.is_empty() {
            let waits = self
                .waits
                .iter()
                .map(|(w, yaku)| {
                    if w.is_win() {
                        format!("{} - {} {}", style(w.tile).green(), w.score, yaku)
                    } else {
                        format!("{} - {}", style(w.tile).red(), w.limit)
                    }
                })
                .collect::<Vec<_>>()
                .join(" | ");
            let furiten = if state.at_furiten {
                style(" (furiten)").red().to_string()
            } else {
                String::new()
            };
            writeln!(f, "waits{furiten}: {waits}")?;
        }

        if !self.candidates.is_empty() {
            writeln!(f, "{}", style("hand               EV    win% | waits").bold())?;
            for candidate in &self.candidates {
                writeln!(f, "{}", candidate.to_candidate_string())?;
            }
        }

        let total: f32 = self.player_danger.tile_weights.iter().sum();
        let danger = Tile::all()
            .filter(|t| state.concealed[t.as_usize()] > 0)
            .map(|t| {
                let class = self.danger[t.as_usize()];
                let weight = self.player_danger.tile_weights[t.as_usize()];
                let pct = if total > 0. { weight / total * 100. } else { 0. };
                match class {
                    WallDanger::Safe => format!("{t}{class}"),
                    _ => format!("{t}{class} {pct:.1}%"),
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        if !danger.is_empty() {
            write!(f, "danger: {danger}")?;
        }
        Ok(())
    }
}
