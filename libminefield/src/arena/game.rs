use super::GameResult;
use crate::algo::agari::Hand;
use crate::algo::wait::{all_hands, structural_waits};
use crate::hand::{tiles_to_string, validate};
use crate::options::Options;
use crate::protocol::{Event, MoveType, Reaction};
use crate::state::{DISCARDS, PLAYER_TILES, PlayerState};
use crate::tile::{KINDS, Tile};
use std::mem;

use anyhow::{Context, Result, ensure};
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

pub const HAND_TIME_LIMIT: u32 = 3 * 60;
pub const DISCARD_TIME_LIMIT: u32 = 15;
/// Tiles a game needs from the wall: both deals and the two indicators.
pub const WALL_TILES: usize = PLAYER_TILES * 2 + 2;

#[derive(Debug, Clone)]
struct Seat {
    /// Dealt tiles not yet declared or discarded.
    tiles: Vec<Tile>,
    is_east: bool,
    to_move: Option<MoveType>,
    hand: Vec<Tile>,
    /// Structural waits of `hand`.
    waits: Vec<Tile>,
    discards: Vec<Tile>,
    furiten: bool,
}

impl Seat {
    fn new(tiles: &[Tile], is_east: bool) -> Self {
        Self {
            tiles: tiles.to_vec(),
            is_east,
            to_move: None,
            hand: vec![],
            waits: vec![],
            discards: vec![],
            furiten: false,
        }
    }

    const fn wind(&self) -> Tile {
        if self.is_east { Tile::X1 } else { Tile::X3 }
    }

    fn take(&mut self, tile: Tile) -> Result<()> {
        let idx = self
            .tiles
            .iter()
            .position(|&t| t == tile)
            .with_context(|| format!("{tile} not found in choices"))?;
        self.tiles.remove(idx);
        Ok(())
    }

    fn set_hand(&mut self, hand: &[Tile], options: &Options) -> Result<()> {
        ensure!(
            self.to_move == Some(MoveType::Hand) && self.hand.is_empty(),
            "not expecting a hand",
        );
        let hand = validate(hand, 13)?;
        let before = self.tiles.clone();
        for &tile in &hand {
            if let Err(e) = self.take(tile) {
                self.tiles = before;
                return Err(e);
            }
        }
        self.waits = structural_waits(hand.clone(), options).map(|w| w.tile).collect();
        self.hand = hand;
        Ok(())
    }

    fn discard(&mut self, tile: Tile) -> Result<()> {
        ensure!(
            self.to_move == Some(MoveType::Discard) && !self.hand.is_empty(),
            "not expecting a discard",
        );
        ensure!(self.discards.len() < DISCARDS, "no discards left");
        self.take(tile)?;
        self.discards.push(tile);
        if self.waits.contains(&tile) {
            self.furiten = true;
        }
        Ok(())
    }

    fn finished(&self) -> bool {
        self.discards.len() == DISCARDS
    }
}

/// One game between two seats, as seen by the server.
///
/// Events for the seats pile up in an outbox that [`Game::take_events`]
/// drains. Rule violations end the game as aborted instead of returning
/// errors.
#[derive(Debug, Clone)]
pub struct Game {
    east: usize,
    seats: [Seat; 2],
    dora_ind: Tile,
    uradora_ind: Tile,
    result: Option<GameResult>,
    outbox: Vec<(usize, Event)>,
}

impl Game {
    /// Shuffle a full set and pick east at random.
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut wall: Vec<_> = Tile::all().flat_map(|t| [t; 4]).collect();
        wall.shuffle(rng);
        let east = rng.random_range(0..2);
        Self::deal(&wall, east)
    }

    /// Deal from the front of `wall` instead of shuffling.
    pub fn fixed(wall: &[Tile], east: usize) -> Result<Self> {
        ensure!(wall.len() >= WALL_TILES, "need {WALL_TILES} tiles, got {}", wall.len());
        ensure!(east < 2, "east must be 0 or 1, got {east}");
        let mut counts = [0u8; KINDS];
        for t in &wall[..WALL_TILES] {
            counts[t.as_usize()] += 1;
            ensure!(counts[t.as_usize()] <= 4, "more than four copies of {t}");
        }
        Ok(Self::deal(wall, east))
    }

    fn deal(wall: &[Tile], east: usize) -> Self {
        Self {
            east,
            seats: [
                Seat::new(&wall[..PLAYER_TILES], east == 0),
                Seat::new(&wall[PLAYER_TILES..PLAYER_TILES * 2], east == 1),
            ],
            dora_ind: wall[PLAYER_TILES * 2],
            uradora_ind: wall[PLAYER_TILES * 2 + 1],
            result: None,
            outbox: vec![],
        }
    }

    #[inline]
    #[must_use]
    pub const fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    #[inline]
    #[must_use]
    pub const fn east(&self) -> usize {
        self.east
    }

    pub fn take_events(&mut self) -> Vec<(usize, Event)> {
        mem::take(&mut self.outbox)
    }

    pub fn start(&mut self) {
        for i in 0..2 {
            self.send(
                i,
                Event::PhaseOne {
                    tiles: self.seats[i].tiles.clone(),
                    dora_ind: self.dora_ind,
                    you: i,
                    east: self.east,
                },
            );
            self.start_move(i, MoveType::Hand);
        }
    }

    /// Reactions that arrive after the game ended are dropped.
    pub fn on_reaction(&mut self, seat: usize, reaction: Reaction) {
        if self.result.is_some() {
            debug!("ignoring {reaction:?} from seat {seat} after the game ended");
            return;
        }
        if seat >= 2 {
            return self.abort(None, format!("unknown seat {seat}"));
        }
        match reaction {
            Reaction::Hand { hand } => self.on_hand(seat, &hand),
            Reaction::Discard { tile } => self.on_discard(seat, tile),
        }
    }

    /// Play the game to the end between `bots`, which are reset by the deal.
    ///
    /// A bot that fails to handle an event aborts the game as the culprit.
    pub fn run(&mut self, bots: &mut [PlayerState; 2]) -> GameResult {
        self.start();
        loop {
            let events = self.take_events();
            if events.is_empty() {
                break;
            }
            for (seat, event) in events {
                let reaction = bots[seat].update(&event);
                if self.result.is_some() {
                    continue;
                }
                match reaction {
                    Ok(Some(reaction)) => self.on_reaction(seat, reaction),
                    Ok(None) => (),
                    Err(e) => self.abort(Some(seat), format!("{e:#}")),
                }
            }
        }
        self.result.clone().unwrap_or_else(|| GameResult::Aborted {
            culprit: None,
            description: "game stalled".to_owned(),
        })
    }

    fn send(&mut self, seat: usize, event: Event) {
        self.outbox.push((seat, event));
    }

    fn send_both(&mut self, event: Event) {
        self.outbox.push((0, event.clone()));
        self.outbox.push((1, event));
    }

    fn finish(&mut self, event: Event) {
        self.result = GameResult::from_event(&event);
        self.send_both(event);
    }

    fn abort(&mut self, culprit: Option<usize>, description: String) {
        debug!("abort by {culprit:?}: {description}");
        self.finish(Event::Abort { culprit, description });
    }

    fn start_move(&mut self, seat: usize, move_type: MoveType) {
        self.seats[seat].to_move = Some(move_type);
        let time_limit = match move_type {
            MoveType::Hand => HAND_TIME_LIMIT,
            MoveType::Discard => DISCARD_TIME_LIMIT,
        };
        self.send(seat, Event::StartMove { move_type, time_limit });
    }

    fn end_move(&mut self, seat: usize) {
        self.seats[seat].to_move = None;
        self.send(seat, Event::EndMove);
    }

    fn is_phase_two(&self) -> bool {
        self.seats.iter().all(|s| !s.hand.is_empty())
    }

    fn options_for(&self, seat: usize) -> Options {
        Options::new(self.seats[seat].wind(), self.dora_ind)
    }

    fn on_hand(&mut self, seat: usize, hand: &[Tile]) {
        let options = self.options_for(seat);
        if let Err(e) = self.seats[seat].set_hand(hand, &options) {
            return self.abort(Some(seat), format!("{e:#}"));
        }
        self.end_move(seat);

        if self.is_phase_two() {
            self.send_both(Event::PhaseTwo);
            self.start_move(self.east, MoveType::Discard);
        } else {
            self.send(seat, Event::WaitForPhaseTwo);
        }
    }

    fn on_discard(&mut self, seat: usize, tile: Tile) {
        if !self.is_phase_two() {
            return self.abort(Some(seat), "discard too soon".to_owned());
        }
        if let Err(e) = self.seats[seat].discard(tile) {
            return self.abort(Some(seat), format!("{e:#}"));
        }
        self.end_move(seat);
        self.send_both(Event::Discarded { player: seat, tile });

        let other = 1 - seat;
        if let Some(ron) = self.check_ron(other, tile) {
            return self.finish(ron);
        }
        if self.seats.iter().all(Seat::finished) {
            return self.finish(Event::Draw);
        }
        self.start_move(other, MoveType::Discard);
    }

    /// Ron for `seat` on the opponent's `tile`, if it is a wait worth a win.
    /// A wait that falls short makes the seat furiten.
    fn check_ron(&mut self, seat: usize, tile: Tile) -> Option<Event> {
        let player = &self.seats[seat];
        if player.furiten || !player.waits.contains(&tile) {
            return None;
        }

        // east always discards first, so it is one discard ahead of the turn
        let turn = if player.is_east {
            player.discards.len().saturating_sub(1)
        } else {
            player.discards.len()
        };
        let mut options = self.options_for(seat);
        options.ippatsu = turn == 0;
        options.hotei = turn == DISCARDS - 1;
        let with_uradora = options.with_uradora(self.uradora_ind);

        let mut full = player.hand.clone();
        full.push(tile);
        full.sort_unstable();
        let best = all_hands(&full, tile, &options)
            .into_iter()
            .filter(|hand| hand.limit().is_win())
            .map(|hand| Hand::new(hand.tiles, tile, hand.shape, &with_uradora))
            .reduce(|best, hand| if hand.limit() > best.limit() { hand } else { best });

        let Some(best) = best else {
            debug!(
                "seat {seat} passes on {tile} with {}, furiten",
                tiles_to_string(&player.hand)
            );
            self.seats[seat].furiten = true;
            return None;
        };
        let limit = best.limit();
        Some(Event::Ron {
            player: seat,
            hand: player.hand.clone(),
            tile,
            yaku: best.yaku.clone(),
            dora: best.dora(),
            uradora_ind: Some(self.uradora_ind),
            limit,
            points: limit.points(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algo::point::Limit;
    use crate::algo::yaku::Yaku;
    use crate::hand::parse_tiles;
    use crate::t;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    /// Seat 0 gets M1 to M8 and two M9, seat 1 the other two M9 and P1 to
    /// P8, and both indicators are P9.
    fn sorted_wall() -> Vec<Tile> {
        Tile::all().flat_map(|t| [t; 4]).collect()
    }

    fn game() -> Game {
        Game::fixed(&sorted_wall(), 0).unwrap()
    }

    /// Both seats declare from a custom deal.
    fn start_game(tiles_0: &str, tiles_1: &str, hand_0: &str, hand_1: &str) -> Game {
        let mut wall = parse_tiles(tiles_0).unwrap();
        wall.extend(parse_tiles(tiles_1).unwrap());
        wall.extend(t![M1, M2]);
        let mut game = Game::fixed(&wall, 0).unwrap();
        game.start();
        game.take_events();

        game.on_reaction(0, Reaction::Hand {
            hand: parse_tiles(hand_0).unwrap(),
        });
        assert_eq!(game.take_events(), vec![(0, Event::EndMove), (0, Event::WaitForPhaseTwo)]);
        game.on_reaction(1, Reaction::Hand {
            hand: parse_tiles(hand_1).unwrap(),
        });
        let events = game.take_events();
        assert_eq!(&events[..3], [(1, Event::EndMove), (0, Event::PhaseTwo), (1, Event::PhaseTwo)]);
        game.outbox = events[3..].to_vec();
        game
    }

    fn discard(game: &mut Game, player: usize, tile: Tile) {
        assert_eq!(
            game.take_events(),
            vec![(player, Event::StartMove {
                move_type: MoveType::Discard,
                time_limit: DISCARD_TIME_LIMIT,
            })],
        );
        game.on_reaction(player, Reaction::Discard { tile });
        let events = game.take_events();
        assert_eq!(
            &events[..3],
            [
                (player, Event::EndMove),
                (0, Event::Discarded { player, tile }),
                (1, Event::Discarded { player, tile }),
            ],
        );
        game.outbox = events[3..].to_vec();
    }

    fn assert_aborted(game: &mut Game, culprit: usize, description: &str) {
        let events = game.take_events();
        let last = events.last().unwrap();
        let Event::Abort {
            culprit: Some(c),
            description: d,
        } = &last.1
        else {
            panic!("expected an abort, got {events:?}");
        };
        assert_eq!(*c, culprit);
        assert!(d.contains(description), "{d:?} does not mention {description:?}");
        assert!(matches!(game.result(), Some(GameResult::Aborted { .. })));
    }

    // seat 0: 13-sided kokushi, seat 1: three runs and a two-sided wait
    const KOKUSHI_DEAL: &str = "M1 M9 P1 P9 S1 S9 X1 X2 X3 X4 X5 X6 X7 \
        M2 M2 M2 M3 M3 M3 M4 M4 M4 M5 M5 M5 M6 M6 M6 M7 M7 M7 M8 M8 M8";
    const RUNS_DEAL: &str = "M6 M7 M8 P6 P7 P8 S2 S3 S4 S5 S6 S7 S8 \
        P1 P2 P2 P2 P3 P3 P3 P4 P4 P4 P5 P5 P5 S6 S6 S6 S7 S7 S7 S8 S8";

    #[test]
    fn init() {
        let mut game = game();
        game.start();
        let events = game.take_events();
        assert_eq!(events.len(), 4);
        let (seat, Event::PhaseOne { tiles, dora_ind, you, east }) = &events[0] else {
            panic!("expected a deal, got {:?}", events[0]);
        };
        assert_eq!((*seat, *you, *east), (0, 0, 0));
        assert_eq!(tiles.len(), PLAYER_TILES);
        assert_eq!(*dora_ind, sorted_wall()[PLAYER_TILES * 2]);
        assert_eq!(
            events[1],
            (0, Event::StartMove {
                move_type: MoveType::Hand,
                time_limit: HAND_TIME_LIMIT,
            }),
        );
        assert!(matches!(events[2], (1, Event::PhaseOne { you: 1, .. })));
    }

    #[test]
    fn draw() {
        let mut game = start_game(
            KOKUSHI_DEAL,
            RUNS_DEAL,
            // neither hand is tenpai
            "M1 M9 P1 P9 S1 S9 X1 X2 X3 X4 X5 X6 M2",
            "M6 M8 P1 P3 P5 P7 P8 S2 S4 S6 S6 S8 S8",
        );
        for _ in 0..DISCARDS {
            for player in 0..2 {
                let tile = game.seats[player].tiles[0];
                discard(&mut game, player, tile);
                if game.result().is_some() {
                    break;
                }
            }
        }
        assert_eq!(game.take_events(), vec![(0, Event::Draw), (1, Event::Draw)]);
        assert_eq!(game.result(), Some(&GameResult::Draw));
    }

    #[test]
    fn win() {
        let mut game = start_game(
            KOKUSHI_DEAL,
            RUNS_DEAL,
            "M1 M9 P1 P9 S1 S9 X1 X2 X3 X4 X5 X6 X7",
            "M6 M7 M8 P6 P7 P8 S2 S3 S4 S5 S6 S7 S8",
        );

        // seat 1 waits on S2, S5 and S8 and is not interested in M2
        discard(&mut game, 0, Tile::M2);
        assert!(!game.seats[1].furiten);

        // rising sun
        discard(&mut game, 1, Tile::P1);
        let ron = Event::Ron {
            player: 0,
            hand: parse_tiles("M1 M9 P1 P9 S1 S9 X1 X2 X3 X4 X5 X6 X7").unwrap(),
            tile: Tile::P1,
            yaku: vec![Yaku::Kokushi],
            dora: 0,
            uradora_ind: Some(Tile::M2),
            limit: Limit::Yakuman,
            points: 32000,
        };
        assert_eq!(game.take_events(), vec![(0, ron.clone()), (1, ron)]);
        assert!(matches!(game.result(), Some(GameResult::Ron { player: 0, points: 32000, .. })));
    }

    #[test]
    fn furiten() {
        // seat 1: tanyao sanshoku on S5, tanyao alone on S2 and S8
        let mut game = start_game(
            "M2 M9 P1 P9 S1 S9 X1 X2 X3 X4 X5 X6 X7 \
             M3 M3 M3 M4 M4 M4 M5 M5 M5 M6 M6 M6 M7 M7 M7 M8 M8 M8 S5 S8 S3",
            RUNS_DEAL,
            "M2 M9 P1 P9 S1 S9 X1 X2 X3 X4 X5 X6 X7",
            "M6 M7 M8 P6 P7 P8 S2 S3 S4 S5 S6 S7 S8",
        );
        assert_eq!(game.seats[1].waits, t![S2, S5, S8]);

        // tanyao and the declaration bonus stay below mangan
        discard(&mut game, 0, Tile::S8);
        assert!(game.result().is_none());
        assert!(game.seats[1].furiten);

        discard(&mut game, 1, Tile::P2);

        // seat 1 would win now, but it is furiten
        discard(&mut game, 0, Tile::S5);
        assert!(game.result().is_none());
    }

    #[test]
    fn ron_pays_the_highest_limit() {
        let mut game = start_game(
            "M2 M9 P1 P9 S1 S9 X1 X2 X3 X4 X5 X6 X7 \
             M3 M3 M3 M4 M4 M4 M5 M5 M5 M6 M6 M6 M7 M7 M7 M8 M8 M8 S5 S8 S3",
            RUNS_DEAL,
            "M2 M9 P1 P9 S1 S9 X1 X2 X3 X4 X5 X6 X7",
            "M6 M7 M8 P6 P7 P8 S2 S3 S4 S5 S6 S7 S8",
        );
        discard(&mut game, 0, Tile::S5);
        let events = game.take_events();
        let Some((_, Event::Ron { player: 1, yaku, limit, points, .. })) = events.first() else {
            panic!("expected a ron, got {events:?}");
        };
        assert!(yaku.contains(&Yaku::Sanshokudojun));

        let mut options = game.options_for(1);
        options.ippatsu = true;
        let options = options.with_uradora(game.uradora_ind);
        let mut full = game.seats[1].hand.clone();
        full.push(Tile::S5);
        full.sort_unstable();
        let best = all_hands(&full, Tile::S5, &options).iter().map(Hand::limit).max();
        assert_eq!(Some(*limit), best);
        assert_eq!(*points, limit.points());
    }

    #[test]
    fn own_discard_furiten() {
        let mut game = start_game(
            "M2 M9 P1 P9 S1 S9 X1 X2 X3 X4 X5 X6 X7 \
             M3 M3 M3 M4 M4 M4 M5 M5 M5 M6 M6 M6 M7 M7 M7 M8 M8 M8 S5 S8 S3",
            RUNS_DEAL,
            "M2 M9 P1 P9 S1 S9 X1 X2 X3 X4 X5 X6 X7",
            "M6 M7 M8 P6 P7 P8 S2 S3 S4 S5 S6 S7 S8",
        );
        discard(&mut game, 0, Tile::M3);
        discard(&mut game, 1, Tile::S8);
        assert!(game.seats[1].furiten);
        discard(&mut game, 0, Tile::S5);
        assert!(game.result().is_none());
    }

    #[test]
    fn short_hand() {
        let mut game = game();
        game.start();
        game.take_events();
        game.on_reaction(1, Reaction::Hand { hand: t![M1, M2, M3].to_vec() });
        assert_aborted(&mut game, 1, "expected 13 tiles");
    }

    #[test]
    fn tiles_outside_initial() {
        let mut game = game();
        game.start();
        game.take_events();
        game.on_reaction(1, Reaction::Hand {
            hand: t![X7, X7, X7, X7, X6, X6, X6, X6, X5, X5, X5, X5, X4].to_vec(),
        });
        assert_aborted(&mut game, 1, "not found in choices");
    }

    #[test]
    fn discard_too_soon() {
        let mut game = game();
        game.start();
        game.take_events();
        game.on_reaction(0, Reaction::Discard { tile: Tile::M1 });
        assert_aborted(&mut game, 0, "discard too soon");
    }

    #[test]
    fn bots_play_to_the_end() {
        let mut bots = [PlayerState::default(), PlayerState::default()];
        let mut game = Game::new(&mut ChaCha12Rng::seed_from_u64(7));
        let result = game.run(&mut bots);
        assert!(!matches!(result, GameResult::Aborted { .. }), "{result}");
        assert_eq!(game.result(), Some(&result));
        assert!(bots.iter().all(|b| b.finished && b.hand.len() == 13));
        assert!(bots[0].discards.len().abs_diff(bots[1].discards.len()) <= 1);
    }
}
