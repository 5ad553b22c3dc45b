//! Rules engine and bot for two-player Minefield mahjong.
//!
//! Every hand-level routine is a pure function over tiles and an [`Options`]
//! record. [`state::PlayerState`] and [`arena`] layer the game on top.
//!
//! [`Options`]: options::Options

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod algo;
pub mod arena;
pub mod hand;
pub mod meld;
pub mod options;
pub mod protocol;
pub mod state;
pub mod tile;
