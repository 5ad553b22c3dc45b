//! Backtracking decomposition of a sorted tile sequence into a pair plus
//! melds, and the two irregular shapes.
//!
//! Every routine here expects its input sorted. The smallest remaining tile
//! always has to start a meld, so the search only ever looks at the front of
//! the slice.
use crate::meld::Meld;
use crate::tile::{KINDS, Tile};
use std::iter;

use serde::Serialize;
use tinyvec::ArrayVec;

/// A regular decomposition: the pair and the melds, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Div {
    pub pair: Tile,
    pub melds: ArrayVec<[Meld; 4]>,
}

impl Div {
    /// The pair first, then the melds.
    pub fn groups(&self) -> impl Iterator<Item = Meld> + '_ {
        iter::once(Meld::Pair(self.pair)).chain(self.melds.iter().copied())
    }

    /// Re-expand into the sorted tile multiset.
    #[must_use]
    pub fn tiles(&self) -> Vec<Tile> {
        let mut tiles: Vec<_> = self.groups().flat_map(Meld::tiles).collect();
        tiles.sort_unstable();
        tiles
    }
}

/// Candidate pairs with the tiles left over.
///
/// A run of three or four equal tiles yields its pair only once, from the
/// last valid offset.
pub fn find_pair(tiles: &[Tile]) -> impl Iterator<Item = (Tile, Vec<Tile>)> + '_ {
    (0..tiles.len().saturating_sub(1))
        .filter(move |&i| tiles[i] == tiles[i + 1] && tiles.get(i + 2) != Some(&tiles[i + 1]))
        .map(move |i| {
            let mut rest = tiles[..i].to_vec();
            rest.extend_from_slice(&tiles[i + 2..]);
            (tiles[i], rest)
        })
}

pub fn begin_pon(tiles: &[Tile]) -> Option<(Meld, Vec<Tile>)> {
    match tiles {
        [a, b, c, rest @ ..] if a == b && b == c => Some((Meld::Pon(*a), rest.to_vec())),
        _ => None,
    }
}

pub fn begin_chi(tiles: &[Tile]) -> Option<(Meld, Vec<Tile>)> {
    let (&first, rest) = tiles.split_first()?;
    let meld = Meld::chi(first)?;
    let mut rest = rest.to_vec();
    for offset in 1..=2 {
        let next = first.offset(offset)?;
        let pos = rest.iter().position(|&t| t == next)?;
        rest.remove(pos);
    }
    Some((meld, rest))
}

fn search_melds(tiles: &[Tile], acc: &mut ArrayVec<[Meld; 4]>, out: &mut Vec<ArrayVec<[Meld; 4]>>) {
    if tiles.is_empty() {
        let mut melds = acc.clone();
        melds.sort_unstable();
        if !out.contains(&melds) {
            out.push(melds);
        }
        return;
    }
    if acc.len() == acc.capacity() {
        return;
    }
    for (meld, rest) in [begin_pon(tiles), begin_chi(tiles)].into_iter().flatten() {
        acc.push(meld);
        search_melds(&rest, acc, out);
        acc.pop();
    }
}

/// Every way to split the remaining tiles into melds, pon tried before chi.
///
/// Melds come back sorted and structurally identical splits are reported
/// once.
#[must_use]
pub fn all_melds(tiles: &[Tile]) -> Vec<ArrayVec<[Meld; 4]>> {
    let mut out = vec![];
    search_melds(tiles, &mut ArrayVec::new(), &mut out);
    out
}

/// All regular decompositions of a sorted 3n+2 tile sequence, n <= 4.
///
/// Anything else has no regular decomposition and yields nothing.
pub fn decompose_regular(tiles: &[Tile]) -> impl Iterator<Item = Div> + '_ {
    let well_formed = tiles.len() % 3 == 2 && tiles.len() <= 14;
    find_pair(tiles)
        .filter(move |_| well_formed)
        .flat_map(|(pair, rest)| all_melds(&rest).into_iter().map(move |melds| Div { pair, melds }))
}

/// Seven distinct pairs, or more generally `len / 2` distinct adjacent pairs.
#[must_use]
pub fn is_all_pairs(tiles: &[Tile]) -> bool {
    tiles.len() % 2 == 0
        && tiles.chunks_exact(2).all(|c| c[0] == c[1])
        && tiles.windows(2).filter(|w| w[0] != w[1]).count() + 1 == tiles.len() / 2
}

/// The set of kinds is exactly the 13 terminals and honors.
#[must_use]
pub fn is_kokushi(tiles: &[Tile]) -> bool {
    let mut present = [false; KINDS];
    for t in tiles {
        present[t.as_usize()] = true;
    }
    Tile::all().all(|t| present[t.as_usize()] == t.is_yaochu())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hand::parse_tiles;
    use crate::t;

    fn sorted(s: &str) -> Vec<Tile> {
        let mut tiles = parse_tiles(s).unwrap();
        tiles.sort_unstable();
        tiles
    }

    #[test]
    fn pairs() {
        assert_eq!(find_pair(&t![M1, M2, M3]).count(), 0);
        assert_eq!(find_pair(&t![M1, M1, M3]).collect::<Vec<_>>(), vec![(Tile::M1, vec![Tile::M3])]);
        assert_eq!(find_pair(&t![M1, M1, M1]).count(), 1);
        assert_eq!(find_pair(&t![M1, M1, M1, M1]).count(), 1);
    }

    #[test]
    fn meld_starts() {
        assert_eq!(begin_pon(&t![M1, M1, M1]), Some((Meld::Pon(Tile::M1), vec![])));
        assert_eq!(begin_pon(&t![M1, M1, M2]), None);
        assert_eq!(begin_chi(&t![M1, M2, M3, M4]), Some((Meld::Chi(Tile::M1), vec![Tile::M4])));
        assert_eq!(begin_chi(&t![M1, M2, M4]), None);
        assert_eq!(begin_chi(&t![M8, M9, P1]), None);
        assert_eq!(begin_chi(&t![X1, X2, X3]), None);
    }

    #[test]
    fn decomposition_count() {
        let tiles = sorted("M1 M1 M2 M2 M3 M3 M4 M4");
        let divs: Vec<_> = decompose_regular(&tiles).collect();
        assert_eq!(
            divs,
            vec![
                Div {
                    pair: Tile::M1,
                    melds: [Meld::Chi(Tile::M2), Meld::Chi(Tile::M2)].into_iter().collect(),
                },
                Div {
                    pair: Tile::M4,
                    melds: [Meld::Chi(Tile::M1), Meld::Chi(Tile::M1)].into_iter().collect(),
                },
            ],
        );
    }

    #[test]
    fn round_trip() {
        let test_one = |s: &str, expected_divs: usize| {
            let tiles = sorted(s);
            let divs: Vec<_> = decompose_regular(&tiles).collect();
            assert_eq!(divs.len(), expected_divs, "failed for {s}: {divs:?}");
            for div in divs {
                assert_eq!(div.tiles(), tiles, "failed for {s}: {div:?}");
                assert_eq!(div.melds.len(), 4, "failed for {s}");
            }
        };
        test_one("M1 M1 M1 M1 M2 M2 M2 M2 M3 M3 M3 M3 M9 M9", 2);
        test_one("M1 M2 M3 P1 P2 P3 S1 S2 S3 S4 S5 S6 S7 S7", 1);
        test_one("P2 P2 P3 P3 P4 P4 P5 P5 P6 P6 P7 P7 P8 P8", 3);
        test_one("M1 M1 M1 M2 M3 M4 M5 M6 M7 M8 M9 M9 M9 M5", 1);
        test_one("M1 M9 P1 P9 S1 S9 X1 X2 X3 X4 X5 X6 X7 X7", 0);
    }

    #[test]
    fn malformed_lengths_yield_nothing() {
        assert_eq!(decompose_regular(&sorted("M1 M1 M2")).count(), 0);
        assert_eq!(decompose_regular(&sorted("M1 M1 M1 M2 M2 M2 M3 M3 M3 M4 M4 M4 M5 M5 M5 M6 M6")).count(), 0);
    }

    #[test]
    fn irregular_shapes() {
        assert!(is_all_pairs(&t![M1, M1, M2, M2]));
        assert!(!is_all_pairs(&t![M1, M1, M2, M3]));
        assert!(!is_all_pairs(&t![M1, M1, M1, M1]));
        assert!(is_all_pairs(&sorted("M1 M1 P3 P3 P4 P4 P5 P5 P7 P7 X1 X1 X3 X3")));

        assert!(is_kokushi(&sorted("M1 M9 P1 P9 S1 S9 S9 X1 X2 X3 X4 X5 X6 X7")));
        assert!(!is_kokushi(&sorted("M1 M9 P1 P9 S1 S9 S9 X1 X2 X3 X4 X5 X6 X6")));
        assert!(!is_kokushi(&sorted("M1 M9 P1 P9 S1 S9 M2 X1 X2 X3 X4 X5 X6 X7")));
    }
}
