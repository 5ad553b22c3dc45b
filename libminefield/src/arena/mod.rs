//! Full games between two bots, refereed the way a server would.
pub mod game;
pub mod result;

pub use game::Game;
pub use result::{GameResult, Tally};

use crate::state::PlayerState;

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rayon::prelude::*;

/// Play one game with the wall shuffled from `seed`.
#[must_use]
pub fn play_seeded(seed: u64) -> GameResult {
    let mut rng = ChaCha12Rng::seed_from_u64(seed);
    let mut game = Game::new(&mut rng);
    let mut bots = [PlayerState::default(), PlayerState::default()];
    game.run(&mut bots)
}

/// Play `games` games in parallel, seeded from `seed` upwards, and tally
/// them. The tally does not depend on the thread count.
#[must_use]
pub fn run_games(games: u64, seed: u64, progress: bool) -> Tally {
    let bar = if progress {
        ProgressBar::new(games)
    } else {
        ProgressBar::hidden()
    };
    if let Ok(style) = ProgressStyle::with_template("[{elapsed_precise}] [{wide_bar}] {pos}/{len} {per_sec:>12}") {
        bar.set_style(style);
    }

    let tally: Tally = (0..games as usize)
        .into_par_iter()
        .progress_with(bar)
        .map(|i| {
            let game_seed = seed.wrapping_add(i as u64);
            let result = play_seeded(game_seed);
            info!("game {game_seed}: {result}");
            Tally::from(&result)
        })
        .sum();
    info!("{tally}");
    tally
}
