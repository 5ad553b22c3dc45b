use super::Event;
use crate::state::PlayerState;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::{debug, info};
use serde_json as json;

/// Drives a [`PlayerState`] from JSON lines.
#[derive(Debug, Clone, Default)]
pub struct Bot {
    state: PlayerState,
}

impl Bot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Returns the JSON line to answer with, if the event asks for one.
    pub fn react(&mut self, line: &str) -> Result<Option<String>> {
        let event: Event = json::from_str(line).with_context(|| format!("failed to parse event {line}"))?;
        let reaction = self.state.update(&event)?;
        if event.is_game_end() {
            info!("game over: {line}");
        }

        let Some(reaction) = reaction else {
            return Ok(None);
        };
        let ret = json::to_string(&reaction)?;
        debug!("reacting with {ret}");
        Ok(Some(ret))
    }

    /// Answer events read from `input` until the game ends or the input is
    /// exhausted. Blank lines are skipped.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read event")?;
            if line.trim().is_empty() {
                continue;
            }
            if let Some(reaction) = self.react(&line)? {
                writeln!(output, "{reaction}")?;
                output.flush()?;
            }
            if self.state.finished {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tile::Tile;

    const DEAL: &str = concat!(
        r#"{"type":"phase_one","tiles":["M2","M3","M4","P2","P3","P4","S2","S3","S4","S5","S6","S8","S8","#,
        r#""M1","M1","M9","M9","P1","P1","P9","P9","S1","S9","X1","X1","X2","X2","X3","X3","X5","X5","X6","S7","S4"],"#,
        r#""dora_ind":"X7","you":1,"east":0}"#,
    );

    #[test]
    fn react() {
        let mut bot = Bot::new();
        assert_eq!(bot.react(DEAL).unwrap(), None);
        assert_eq!(bot.state().player_id, 1);

        let hand = bot
            .react(r#"{"type":"start_move","move_type":"hand","time_limit":180}"#)
            .unwrap()
            .unwrap();
        assert!(hand.starts_with(r#"{"type":"hand","hand":["#), "got {hand}");
        assert_eq!(bot.react(r#"{"type":"end_move"}"#).unwrap(), None);
        assert_eq!(bot.react(r#"{"type":"phase_two"}"#).unwrap(), None);
        assert_eq!(bot.react(r#"{"type":"discarded","player":0,"tile":"X2"}"#).unwrap(), None);

        let discard = bot
            .react(r#"{"type":"start_move","move_type":"discard","time_limit":15}"#)
            .unwrap();
        let tile = bot.state().discard().unwrap();
        assert_eq!(discard, Some(format!(r#"{{"type":"discard","tile":"{tile}"}}"#)));
        if bot.state().concealed[Tile::X2.as_usize()] > 0 {
            assert_eq!(tile, Tile::X2);
        }
        assert!(bot.state().safe_tiles[Tile::X2.as_usize()]);

        assert!(bot.react("not json").is_err());
        assert!(bot.react(r#"{"type":"tsumo"}"#).is_err());
    }

    #[test]
    fn run() {
        let input = format!(
            "{DEAL}\n\n{}\n{}\n{}\n",
            r#"{"type":"start_move","move_type":"hand","time_limit":180}"#,
            r#"{"type":"abort","culprit":0,"description":"time limit exceeded"}"#,
            r#"{"type":"start_move","move_type":"discard","time_limit":15}"#,
        );
        let mut output = vec![];
        let mut bot = Bot::new();
        bot.run(input.as_bytes(), &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.lines().count(), 1);
        assert!(bot.state().finished);
    }
}
