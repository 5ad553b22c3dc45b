//! Wait enumeration over a 13-tile hand and best-hand selection over a
//! 14-tile one.
use super::agari::{Hand, Shape};
use super::decompose::{decompose_regular, is_all_pairs, is_kokushi};
use super::point::{Limit, Score};
use super::yaku::Yaku;
use crate::hand::{tiles_to_string, validate};
use crate::meld::Meld;
use crate::options::Options;
use crate::tile::{KINDS, Tile};

use anyhow::{Result, ensure};
use serde::Serialize;
use tinyvec::ArrayVec;

/// The best score a wait can reach over every way of completing the hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WaitScore {
    pub tile: Tile,
    pub score: Score,
    pub limit: Limit,
}

impl WaitScore {
    #[inline]
    #[must_use]
    pub const fn points(&self) -> u32 {
        self.limit.points()
    }

    #[inline]
    #[must_use]
    pub const fn is_win(&self) -> bool {
        self.limit.is_win()
    }
}

/// Every hand `tiles` forms when `wait` is the winning tile.
///
/// A regular decomposition yields one hand per distinct group that contains
/// `wait`, since the group the winning tile completed decides fu and some
/// yaku. `tiles` must be sorted.
#[must_use]
pub fn all_hands<'a>(tiles: &[Tile], wait: Tile, options: &'a Options) -> Vec<Hand<'a>> {
    if !tiles.contains(&wait) {
        return vec![];
    }

    let mut hands = vec![];
    for div in decompose_regular(tiles) {
        let mut seen = ArrayVec::<[Meld; 5]>::new();
        for group in div.groups().filter(|g| g.contains(wait)) {
            if seen.contains(&group) {
                continue;
            }
            seen.push(group);
            let shape = Shape::Regular {
                div: div.clone(),
                wait_group: group,
            };
            hands.push(Hand::new(tiles.to_vec(), wait, shape, options));
        }
    }
    if is_all_pairs(tiles) {
        hands.push(Hand::new(tiles.to_vec(), wait, Shape::Pairs, options));
    }
    if is_kokushi(tiles) {
        hands.push(Hand::new(tiles.to_vec(), wait, Shape::Kokushi, options));
    }
    hands
}

/// Structural waits of a 13-tile hand, in tile order, each with the best
/// score over every completion.
///
/// A kind is a structural wait when it still has a copy outside the hand and
/// completes at least one hand shape. Many of them score `Limit::None`.
/// Errors unless `tiles` is 13 tiles with at most 4 copies of a kind.
pub fn eval_waits<'a>(tiles: &[Tile], options: &'a Options) -> Result<impl Iterator<Item = WaitScore> + 'a> {
    let sorted = validate(tiles, 13)?;
    Ok(structural_waits(sorted, options))
}

/// The waits that are valid wins.
pub fn waits<'a>(tiles: &[Tile], options: &'a Options) -> Result<impl Iterator<Item = WaitScore> + 'a> {
    Ok(eval_waits(tiles, options)?.filter(WaitScore::is_win))
}

/// `eval_waits` over a hand the caller already validated.
pub(crate) fn structural_waits(mut base: Vec<Tile>, options: &Options) -> impl Iterator<Item = WaitScore> + '_ {
    base.sort_unstable();
    let mut counts = [0u8; KINDS];
    for t in &base {
        counts[t.as_usize()] += 1;
    }

    Tile::all().filter_map(move |wait| {
        if counts[wait.as_usize()] >= 4 {
            return None;
        }
        let mut full = base.clone();
        let pos = full.partition_point(|&t| t <= wait);
        full.insert(pos, wait);
        let score = all_hands(&full, wait, options).iter().map(Hand::score).max()?;
        Some(WaitScore {
            tile: wait,
            score,
            limit: score.limit(),
        })
    })
}

/// The highest scoring hand by `(fan, fu)`, the first one on ties.
#[must_use]
pub fn best_hand<'a>(tiles: &[Tile], wait: Tile, options: &'a Options) -> Option<Hand<'a>> {
    let mut sorted = tiles.to_vec();
    sorted.sort_unstable();
    all_hands(&sorted, wait, options)
        .into_iter()
        .reduce(|best, hand| if hand.score() > best.score() { hand } else { best })
}

/// Yaku, dora and payout tier of the best hand.
#[must_use]
pub fn eval_hand(tiles: &[Tile], wait: Tile, options: &Options) -> Option<(Vec<Yaku>, u8, Limit)> {
    let hand = best_hand(tiles, wait, options)?;
    let (dora, limit) = (hand.dora(), hand.limit());
    Some((hand.yaku, dora, limit))
}

/// `best_hand` over a validated 14-tile hand that contains its winning tile.
pub fn score_best<'a>(tiles: &[Tile], wait: Tile, options: &'a Options) -> Result<Option<Hand<'a>>> {
    let sorted = validate(tiles, 14)?;
    ensure!(
        sorted.contains(&wait),
        "winning tile {wait} is not part of {}",
        tiles_to_string(&sorted),
    );
    Ok(best_hand(&sorted, wait, options))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hand::parse_tiles;

    fn tiles(s: &str) -> Vec<Tile> {
        parse_tiles(s).unwrap()
    }

    #[test]
    fn simple_win() {
        let options = Options::default();
        let (yaku, dora, limit) = eval_hand(&tiles("M2 M2 M3 M3 M4 M4 P2 P3 P4 P7 P7 P7 S2 S2"), Tile::M3, &options).unwrap();
        assert_eq!(yaku, vec![Yaku::Iipeiko, Yaku::Tanyao]);
        assert_eq!(dora, 0);
        // 2 fan 40 fu is below the floor even with the declaration bonus
        assert_eq!(limit, Limit::None);

        let with_dora = Options::new(Tile::X1, Tile::M2);
        let (_, dora, limit) = eval_hand(&tiles("M2 M2 M3 M3 M4 M4 P2 P3 P4 P7 P7 P7 S2 S2"), Tile::M3, &with_dora).unwrap();
        assert_eq!(dora, 2);
        assert_eq!(limit, Limit::Mangan);
    }

    #[test]
    fn kokushi() {
        let options = Options::default();
        let hand = score_best(&tiles("M1 M9 P1 P9 S1 S9 X1 X2 X3 X4 X5 X6 X7 S1"), Tile::S1, &options)
            .unwrap()
            .unwrap();
        assert_eq!(hand.yaku, vec![Yaku::Kokushi]);
        assert_eq!(hand.limit(), Limit::Yakuman);
        assert_eq!(hand.score().points(), 32000);

        let thirteen = tiles("M1 M9 P1 P9 S1 S9 X1 X2 X3 X4 X5 X6 X7");
        let waits: Vec<_> = waits(&thirteen, &options).unwrap().collect();
        assert_eq!(waits.len(), 13);
        assert!(waits.iter().all(|w| w.limit == Limit::Yakuman && w.tile.is_yaochu()));
    }

    #[test]
    fn two_sided_wait() {
        let options = Options::new(Tile::X1, Tile::X1);
        let hand = tiles("M2 M3 M4 P2 P3 P4 S2 S3 S4 S5 S6 S8 S8");
        let found: Vec<_> = waits(&hand, &options).unwrap().collect();
        assert_eq!(found.iter().map(|w| w.tile).collect::<Vec<_>>(), vec![Tile::S4, Tile::S7]);
        for w in &found {
            // pinfu, tanyao and sanshokudojun
            assert_eq!(w.score, Score { fan: 4, fu: 30 }, "failed for {}", w.tile);
            assert_eq!(w.points(), 8000);
        }

        // S1 breaks the tanyao and the triple run, leaving pinfu alone
        let structural: Vec<_> = eval_waits(&hand, &options).unwrap().map(|w| (w.tile, w.is_win())).collect();
        assert_eq!(structural, vec![(Tile::S1, false), (Tile::S4, true), (Tile::S7, true)]);
    }

    #[test]
    fn worthless_waits_are_structural_only() {
        let options = Options::default();
        // pinfu alone stays below the floor
        let hand = tiles("M1 M2 M3 M7 M8 M9 P1 P2 P3 S4 S5 S9 S9");
        let structural: Vec<_> = eval_waits(&hand, &options).unwrap().collect();
        assert_eq!(structural.iter().map(|w| w.tile).collect::<Vec<_>>(), vec![Tile::S3, Tile::S6]);
        assert!(structural.iter().all(|w| !w.is_win() && w.score.fan == 1));
        assert_eq!(waits(&hand, &options).unwrap().count(), 0);
    }

    #[test]
    fn held_out_kinds() {
        let options = Options::default();
        // a fifth M2 would be needed to wait on M2
        let hand = tiles("M2 M2 M2 M2 M3 M4 P5 P6 P7 S5 S6 S7 S8");
        let found: Vec<_> = eval_waits(&hand, &options).unwrap().map(|w| w.tile).collect();
        assert!(!found.contains(&Tile::M2));
        assert!(found.contains(&Tile::S8));
    }

    #[test]
    fn best_of_several_hands() {
        let options = Options::default();
        let tiles = tiles("M1 M1 M1 M1 M2 M2 M2 M2 M3 M3 M3 M3 M9 M9");
        let best = best_hand(&tiles, Tile::M1, &options).unwrap();
        assert_eq!(best.yaku, vec![Yaku::Pinfu, Yaku::Ryanpeiko, Yaku::Junchan, Yaku::Chinitsu]);
        let max = all_hands(&tiles, Tile::M1, &options).iter().map(Hand::score).max();
        assert_eq!(Some(best.score()), max);
    }

    #[test]
    fn wait_must_be_in_the_hand() {
        let options = Options::default();
        let mut sorted = tiles("M2 M2 M3 M3 M4 M4 P2 P3 P4 P7 P7 P7 S2 S2");
        sorted.sort_unstable();
        assert!(all_hands(&sorted, Tile::X1, &options).is_empty());
    }

    #[test]
    fn score_best_validation() {
        let options = Options::default();
        let test_one = |s: &str, wait: Tile| {
            assert!(score_best(&tiles(s), wait, &options).is_err(), "accepted {s} + {wait}");
        };
        test_one("M2 M2 M3 M3 M4 M4 P2 P3 P4 P7 P7 P7 S2", Tile::M3);
        test_one("M2 M2 M3 M3 M4 M4 P2 P3 P4 P7 P7 P7 S2 S2", Tile::X1);
        test_one("M2 M2 M2 M2 M2 M3 M4 P2 P3 P4 P7 P7 P7 S2", Tile::M3);
        assert!(
            score_best(&tiles("M1 M1 M2 M2 M3 M3 M4 M4 P1 P2 P9 S9 X1 X1"), Tile::M1, &options)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn wait_validation() {
        let options = Options::new(Tile::X1, Tile::X1);
        let test_one = |s: &str| {
            assert!(eval_waits(&tiles(s), &options).is_err(), "accepted {s}");
            assert!(waits(&tiles(s), &options).is_err(), "accepted {s}");
        };
        test_one("M1");
        test_one("M2 M3 M4 P2 P3 P4 S2 S3 S4 S5 S6 S8");
        test_one("M2 M3 M4 P2 P3 P4 S2 S3 S4 S5 S6 S8 S8 S8");
        test_one("M1 M1 M1 M1 M1 M2 M3 M4 M5 M6 M7 M8 M9");
        assert_eq!(waits(&tiles("M2 M3 M4 P2 P3 P4 S2 S3 S4 S5 S6 S8 S8"), &options).unwrap().count(), 2);
    }
}
