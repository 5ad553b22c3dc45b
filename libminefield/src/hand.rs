//! Tile string parsing and 34-kind count arrays.
use crate::must_tile;
use crate::tile::{KINDS, Tile};

use anyhow::{Context, Result, bail, ensure};

/// Counts per tile kind, indexed by `Tile::as_usize`.
pub type Counts = [u8; KINDS];

/// Parse a tile string.
///
/// Accepts the `M1 P2 X5` notation (whitespace or comma separated) as well as
/// the compact `123m 55z` form, where `z` is the honor suit.
pub fn parse_tiles(s: &str) -> Result<Vec<Tile>> {
    ensure!(s.is_ascii(), "tiles {s:?} contain non-ascii content");

    let mut tiles = vec![];
    let mut stack = vec![];
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'M' | b'P' | b'S' | b'X' => {
                let token = s.get(i..i + 2).context("truncated tile")?;
                tiles.push(token.parse::<Tile>()?);
                i += 2;
                continue;
            }
            b'1'..=b'9' => stack.push(b - b'0'),
            b'm' | b'p' | b's' | b'z' => {
                ensure!(!stack.is_empty(), "suit {} without ranks in {s:?}", b as char);
                let (base, max) = match b {
                    b'm' => (0, 9),
                    b'p' => (9, 9),
                    b's' => (18, 9),
                    _ => (27, 7),
                };
                for n in stack.drain(..) {
                    ensure!(n <= max, "rank {n} out of range for suit {}", b as char);
                    tiles.push(must_tile!(base + n - 1));
                }
            }
            b',' => (),
            _ if b.is_ascii_whitespace() => (),
            _ => bail!("unexpected byte {:?} in {s:?}", b as char),
        }
        i += 1;
    }
    ensure!(stack.is_empty(), "trailing ranks without a suit in {s:?}");

    Ok(tiles)
}

/// Parse a tile string into counts, rejecting more than four copies.
pub fn hand(s: &str) -> Result<Counts> {
    let tiles = parse_tiles(s)?;
    counts_of(&tiles)
}

/// Count tiles per kind, rejecting more than four copies of one kind.
pub fn counts_of(tiles: &[Tile]) -> Result<Counts> {
    let mut counts = [0; KINDS];
    for &tile in tiles {
        let c = &mut counts[tile.as_usize()];
        *c += 1;
        ensure!(*c <= 4, "more than four copies of {tile}");
    }
    Ok(counts)
}

/// Expand counts into a sorted tile vector.
#[must_use]
pub fn tiles_of(counts: &Counts) -> Vec<Tile> {
    counts
        .iter()
        .enumerate()
        .flat_map(|(i, &c)| std::iter::repeat_n(must_tile!(i), c as usize))
        .collect()
}

/// Check that `tiles` is a well formed hand of exactly `len` tiles and return
/// it sorted.
pub fn validate(tiles: &[Tile], len: usize) -> Result<Vec<Tile>> {
    ensure!(
        tiles.len() == len,
        "expected {len} tiles, got {} ({})",
        tiles.len(),
        tiles_to_string(tiles),
    );
    counts_of(tiles)?;
    let mut sorted = tiles.to_vec();
    sorted.sort_unstable();
    Ok(sorted)
}

#[must_use]
pub fn tiles_to_string(tiles: &[Tile]) -> String {
    tiles.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(" ")
}
