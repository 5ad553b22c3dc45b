//! Candidate tenpai hands drawn from a concealed multiset.
use crate::hand::Counts;
use crate::meld::Meld;
use crate::tile::{Tile, YAOCHU};
use std::collections::BTreeSet;

use tinyvec::ArrayVec;

/// Every distinct pon and chi that can be taken from `counts`.
#[must_use]
pub fn full_groups(counts: &Counts) -> Vec<Meld> {
    let has = |t: Option<Tile>| t.is_some_and(|t| counts[t.as_usize()] > 0);
    let mut groups = vec![];
    for tile in Tile::all().filter(|t| counts[t.as_usize()] > 0) {
        if counts[tile.as_usize()] >= 3 {
            groups.push(Meld::Pon(tile));
        }
        if let Some(chi) = Meld::chi(tile)
            && has(tile.offset(1))
            && has(tile.offset(2))
        {
            groups.push(chi);
        }
    }
    groups
}

/// Kinds held at least twice.
#[must_use]
pub fn pairs(counts: &Counts) -> Vec<Tile> {
    Tile::all().filter(|t| counts[t.as_usize()] >= 2).collect()
}

fn take(counts: &mut Counts, meld: Meld) -> bool {
    let tiles = meld.tiles();
    let mut needed = *counts;
    for t in &tiles {
        let c = &mut needed[t.as_usize()];
        if *c == 0 {
            return false;
        }
        *c -= 1;
    }
    *counts = needed;
    true
}

fn search_groups(
    groups: &[Meld],
    start: usize,
    k: usize,
    remaining: &Counts,
    acc: &mut ArrayVec<[Meld; 4]>,
    out: &mut Vec<(ArrayVec<[Meld; 4]>, Counts)>,
) {
    if acc.len() == k {
        out.push((acc.clone(), *remaining));
        return;
    }
    for (i, &group) in groups.iter().enumerate().skip(start) {
        let mut rest = *remaining;
        if take(&mut rest, group) {
            acc.push(group);
            // same index again: a chi may be chosen twice when the copies exist
            search_groups(groups, i, k, &rest, acc, out);
            acc.pop();
        }
    }
}

/// Every multiset of `k` groups (`k <= 4`) that fits inside `counts`, with
/// the counts left over.
///
/// Groups are chosen in non-decreasing index order, so each combination
/// appears once.
#[must_use]
pub fn choose_groups(groups: &[Meld], k: usize, counts: &Counts) -> Vec<(ArrayVec<[Meld; 4]>, Counts)> {
    let mut out = vec![];
    if k <= 4 {
        search_groups(groups, 0, k, counts, &mut ArrayVec::new(), &mut out);
    }
    out
}

fn hand_of(groups: &[Meld], extra: &[Tile]) -> Vec<Tile> {
    let mut hand: Vec<_> = groups.iter().flat_map(|g| g.tiles()).chain(extra.iter().copied()).collect();
    hand.sort_unstable();
    hand
}

fn held(counts: &Counts) -> impl Iterator<Item = Tile> + '_ {
    Tile::all().filter(|t| counts[t.as_usize()] > 0)
}

/// Partial runs `(t, t+1)` and `(t, t+2)` available in `counts`.
fn partial_runs(counts: &Counts) -> impl Iterator<Item = [Tile; 2]> + '_ {
    held(counts).flat_map(move |t| {
        [1, 2]
            .into_iter()
            .filter_map(move |n| t.offset(n))
            .filter(|u| counts[u.as_usize()] > 0)
            .map(move |u| [t, u])
    })
}

/// Three groups plus a pair and a second pair or a partial run.
pub fn three_groups(counts: &Counts, groups: &[Meld], out: &mut BTreeSet<Vec<Tile>>) {
    for (chosen, rest) in choose_groups(groups, 3, counts) {
        let rest_pairs = pairs(&rest);
        for (i, &p) in rest_pairs.iter().enumerate() {
            for &q in &rest_pairs[i + 1..] {
                out.insert(hand_of(&chosen, &[p, p, q, q]));
            }
            let mut after_pair = rest;
            after_pair[p.as_usize()] -= 2;
            for [a, b] in partial_runs(&after_pair) {
                out.insert(hand_of(&chosen, &[p, p, a, b]));
            }
        }
    }
}

/// Four groups plus a single tile.
pub fn four_groups(counts: &Counts, groups: &[Meld], out: &mut BTreeSet<Vec<Tile>>) {
    for (chosen, rest) in choose_groups(groups, 4, counts) {
        for t in held(&rest) {
            out.insert(hand_of(&chosen, &[t]));
        }
    }
}

/// Six distinct pairs plus a kind that is not one of them.
pub fn six_pairs(counts: &Counts, out: &mut BTreeSet<Vec<Tile>>) {
    fn search(all: &[Tile], start: usize, acc: &mut Vec<Tile>, counts: &Counts, out: &mut BTreeSet<Vec<Tile>>) {
        if acc.len() == 6 {
            for t in held(counts).filter(|t| !acc.contains(t)) {
                let mut hand: Vec<_> = acc.iter().flat_map(|&p| [p, p]).collect();
                hand.push(t);
                hand.sort_unstable();
                out.insert(hand);
            }
            return;
        }
        for i in start..all.len() {
            acc.push(all[i]);
            search(all, i + 1, acc, counts, out);
            acc.pop();
        }
    }
    search(&pairs(counts), 0, &mut Vec::with_capacity(6), counts, out);
}

/// Thirteen orphans one tile away.
pub fn kokushi(counts: &Counts, out: &mut BTreeSet<Vec<Tile>>) {
    let present: Vec<_> = YAOCHU.into_iter().filter(|t| counts[t.as_usize()] > 0).collect();
    match present.len() {
        13 => {
            out.insert(present);
        }
        12 => {
            for &dup in present.iter().filter(|t| counts[t.as_usize()] >= 2) {
                let mut hand = present.clone();
                hand.push(dup);
                hand.sort_unstable();
                out.insert(hand);
            }
        }
        _ => (),
    }
}

/// All candidates from the four strategies, deduplicated and in
/// lexicographic order.
#[must_use]
pub fn candidates(counts: &Counts) -> BTreeSet<Vec<Tile>> {
    let groups = full_groups(counts);
    let mut out = BTreeSet::new();
    three_groups(counts, &groups, &mut out);
    four_groups(counts, &groups, &mut out);
    six_pairs(counts, &mut out);
    kokushi(counts, &mut out);
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hand::{counts_of, hand, parse_tiles, tiles_of};

    fn sorted(s: &str) -> Vec<Tile> {
        let mut tiles = parse_tiles(s).unwrap();
        tiles.sort_unstable();
        tiles
    }

    #[test]
    fn groups_and_pairs() {
        let counts = hand("M2 M2 M2 M3 M4 M5 M7 S1 S1 S2 S3").unwrap();
        let groups: BTreeSet<_> = full_groups(&counts).into_iter().collect();
        let expected: BTreeSet<_> = [Meld::Pon(Tile::M2), Meld::Chi(Tile::M2), Meld::Chi(Tile::M3), Meld::Chi(Tile::S1)]
            .into_iter()
            .collect();
        assert_eq!(groups, expected);

        let counts = hand("M2 M2 M2 M3 M4 S1 S1 S2 S3").unwrap();
        assert_eq!(pairs(&counts), vec![Tile::M2, Tile::S1]);
    }

    #[test]
    fn group_choice() {
        let groups = [Meld::Pon(Tile::M2), Meld::Chi(Tile::M2), Meld::Chi(Tile::S1)];
        let counts = hand("M2 M2 M2 M3 M4 M5 M7 S1 S1 S2 S3").unwrap();
        let chosen: Vec<Vec<Meld>> = choose_groups(&groups, 2, &counts)
            .into_iter()
            .map(|(g, _)| g.to_vec())
            .collect();
        assert_eq!(
            chosen,
            vec![
                vec![Meld::Pon(Tile::M2), Meld::Chi(Tile::S1)],
                vec![Meld::Chi(Tile::M2), Meld::Chi(Tile::S1)],
            ],
        );

        let counts = hand("M1 M1 M2 M2 M3 M3 P5").unwrap();
        let twice = choose_groups(&[Meld::Chi(Tile::M1)], 2, &counts);
        let (chosen, rest) = &twice[0];
        assert_eq!(chosen.as_slice(), [Meld::Chi(Tile::M1), Meld::Chi(Tile::M1)]);
        assert_eq!(tiles_of(rest), vec![Tile::P5]);
        assert!(choose_groups(&[Meld::Chi(Tile::M1)], 3, &counts).is_empty());
    }

    #[test]
    fn strategies() {
        let counts = hand("M1 M2 M3 P4 P5 P6 S7 S8 S9 X1 X1 X2 X2 M5 M7").unwrap();
        let all = candidates(&counts);
        let test_one = |s: &str, expected: bool| {
            assert_eq!(all.contains(&sorted(s)), expected, "failed for {s}");
        };
        // pair and pair
        test_one("M1 M2 M3 P4 P5 P6 S7 S8 S9 X1 X1 X2 X2", true);
        // pair and partial run
        test_one("M1 M2 M3 P4 P5 P6 S7 S8 S9 X1 X1 M5 M7", true);
        test_one("M1 M2 M3 P4 P5 P6 S7 S8 S9 X2 X2 M5 M7", true);
        // four groups need a fourth group
        test_one("M1 M2 M3 P4 P5 P6 S7 S8 S9 X1 X1 X2 M5", false);
        assert!(all.iter().all(|h| h.len() == 13));
        assert!(all.iter().all(|h| counts_of(h).unwrap().iter().zip(&counts).all(|(a, b)| a <= b)));
    }

    #[test]
    fn seven_pairs_and_kokushi() {
        let mut out = BTreeSet::new();
        six_pairs(&hand("M1 M1 M4 M4 P2 P2 P8 P8 S3 S3 X6 X6 X7").unwrap(), &mut out);
        assert_eq!(out.len(), 1);
        assert!(out.contains(&sorted("M1 M1 M4 M4 P2 P2 P8 P8 S3 S3 X6 X6 X7")));

        let mut out = BTreeSet::new();
        kokushi(&hand("M1 M9 P1 P9 S1 S9 X1 X2 X3 X4 X5 X6 M1 S9 M5").unwrap(), &mut out);
        assert_eq!(out.len(), 2);
        assert!(out.contains(&sorted("M1 M9 P1 P9 S1 S9 X1 X2 X3 X4 X5 X6 M1")));
        assert!(out.contains(&sorted("M1 M9 P1 P9 S1 S9 X1 X2 X3 X4 X5 X6 S9")));

        let mut out = BTreeSet::new();
        kokushi(&hand("M1 M9 P1 P9 S1 S9 X1 X2 X3 X4 X5 X6 X7 M1").unwrap(), &mut out);
        assert_eq!(out.into_iter().collect::<Vec<_>>(), vec![YAOCHU.to_vec()]);
    }
}
