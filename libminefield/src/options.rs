//! Table-scoped options that travel with every hand evaluation.
use crate::tile::{DRAGONS, Tile};

use serde::{Deserialize, Serialize};
use tinyvec::ArrayVec;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Winds whose triplets count as yaku and whose pair adds fu.
    pub fanpai_winds: ArrayVec<[Tile; 2]>,
    pub dora_ind: Option<Tile>,
    /// Only known once a win is confirmed.
    pub uradora_ind: Option<Tile>,
    /// Win on the first discard after declaring.
    pub ippatsu: bool,
    /// Win on the last discard of the game.
    pub hotei: bool,
}

impl Options {
    #[must_use]
    pub fn new(seat_wind: Tile, dora_ind: Tile) -> Self {
        let mut fanpai_winds = ArrayVec::new();
        fanpai_winds.push(seat_wind);
        Self {
            fanpai_winds,
            dora_ind: Some(dora_ind),
            ..Default::default()
        }
    }

    /// Dragons and fanpai winds.
    #[must_use]
    pub fn is_yakupai(&self, tile: Tile) -> bool {
        DRAGONS.contains(&tile) || self.fanpai_winds.contains(&tile)
    }

    #[must_use]
    pub fn with_uradora(&self, uradora_ind: Tile) -> Self {
        Self {
            uradora_ind: Some(uradora_ind),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn json() {
        let options: Options = serde_json::from_str(r#"{"fanpai_winds":["X1"],"dora_ind":"M9"}"#).unwrap();
        assert_eq!(options, Options::new(Tile::X1, Tile::M9));
        assert!(options.is_yakupai(Tile::X1));
        assert!(options.is_yakupai(Tile::X6));
        assert!(!options.is_yakupai(Tile::X2));
        assert_eq!(options.with_uradora(Tile::P1).uradora_ind, Some(Tile::P1));

        let empty: Options = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, Options::default());
    }
}
