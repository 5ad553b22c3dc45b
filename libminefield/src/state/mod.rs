pub mod agent_helper;
pub mod player_state;
pub mod update;

pub use player_state::{DISCARDS, PLAYER_TILES, PlayerState};
