mod report;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use clap::{Args, Parser, Subcommand};
use console::style;
use flate2::read::GzDecoder;
use log::info;
use minefield::algo::tenpai::{CandidateColumn, TenpaiCalculator};
use minefield::algo::wait::{eval_hand, eval_waits, score_best};
use minefield::arena::run_games;
use minefield::hand::{counts_of, parse_tiles, tiles_to_string};
use minefield::options::Options;
use minefield::protocol::{Bot, Event};
use minefield::state::PlayerState;
use minefield::tile::Tile;
use report::Report;
use serde_json as json;

#[derive(Parser)]
#[command(version, about = "Two-player Minefield mahjong: hand evaluation, tenpai search and a bot")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a seat's event log through the bot, printing what it knows after
    /// every event.
    Analyze {
        /// JSON lines, optionally gzipped (`.gz`).
        log: PathBuf,
        /// Candidates to show before the hand is declared.
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    /// Score a 14-tile hand won on `wait`.
    Score {
        tiles: String,
        #[arg(long)]
        wait: Tile,
        #[command(flatten)]
        table: TableArgs,
    },
    /// Every structural wait of a 13-tile hand and what it is worth.
    Waits {
        tiles: String,
        #[command(flatten)]
        table: TableArgs,
    },
    /// Search the best 13-tile hand to declare from more than 13 tiles.
    Tenpai {
        tiles: String,
        #[arg(long, default_value_t = 10)]
        top: usize,
        /// Print the chosen candidate as JSON.
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        table: TableArgs,
    },
    /// Play one seat over JSON lines on stdin and stdout.
    Bot,
    /// Play bot against bot.
    Arena {
        #[arg(long, default_value_t = 100)]
        games: u64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

#[derive(Args)]
struct TableArgs {
    /// Full options record as JSON. Takes precedence over the flags below.
    #[arg(long)]
    options: Option<String>,
    #[arg(long)]
    dora_ind: Option<Tile>,
    /// Seat wind, which counts as yakuhai.
    #[arg(long, default_value = "X1")]
    wind: Tile,
    #[arg(long)]
    uradora_ind: Option<Tile>,
    #[arg(long)]
    ippatsu: bool,
    #[arg(long)]
    hotei: bool,
}

impl TableArgs {
    fn options(&self) -> Result<Options> {
        if let Some(raw) = &self.options {
            return json::from_str(raw).context("failed to parse --options");
        }
        ensure!(self.wind.is_wind(), "{} is not a wind", self.wind);
        let mut options = Options::default();
        options.fanpai_winds.push(self.wind);
        options.dora_ind = self.dora_ind;
        options.uradora_ind = self.uradora_ind;
        options.ippatsu = self.ippatsu;
        options.hotei = self.hotei;
        Ok(options)
    }
}

fn open_log(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(Box::new(BufReader::new(reader)))
}

fn analyze(log: &Path, top: usize) -> Result<()> {
    let mut state = PlayerState::default();
    for (i, line) in open_log(log)?.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: Event = json::from_str(&line).with_context(|| format!("line {}: {line}", i + 1))?;
        state.update(&event)?;
        println!("\n{}", style(&line).cyan());
        if matches!(
            event,
            Event::PhaseOne { .. } | Event::PhaseTwo | Event::Discarded { .. } | Event::StartMove { .. }
        ) {
            println!("{}", Report::from_state(state.clone(), top));
        }
    }
    Ok(())
}

fn score(tiles: &str, wait: Tile, options: &Options) -> Result<()> {
    let tiles = parse_tiles(tiles)?;
    let Some(hand) = score_best(&tiles, wait, options)? else {
        println!("{} is not a complete hand", tiles_to_string(&tiles));
        return Ok(());
    };
    let score = hand.score();
    println!("yaku: {}", hand.yaku.iter().map(|y| y.to_string()).collect::<Vec<_>>().join(", "));
    println!("dora: {}", hand.dora());
    println!("{score} ({})", score.limit());
    Ok(())
}

fn waits(tiles: &str, options: &Options) -> Result<()> {
    let tiles = parse_tiles(tiles)?;
    for w in eval_waits(&tiles, options)? {
        let mut full = tiles.clone();
        full.push(w.tile);
        let yaku = eval_hand(&full, w.tile, options)
            .map(|(yaku, _, _)| yaku.iter().map(|y| y.to_string()).collect::<Vec<_>>().join(" "))
            .unwrap_or_default();
        let line = format!("{} - {} ({}) {yaku}", w.tile, w.score, w.limit);
        if w.is_win() {
            println!("{}", style(line).green());
        } else {
            println!("{}", style(line).dim());
        }
    }
    Ok(())
}

fn tenpai(tiles: &str, top: usize, as_json: bool, options: &Options) -> Result<()> {
    let concealed = parse_tiles(tiles)?;
    let seen = counts_of(&concealed)?;
    let calc = TenpaiCalculator {
        options,
        tiles_seen: &seen,
    };
    let chosen = calc.choose(&concealed)?;
    if as_json {
        println!("{}", json::to_string(&chosen)?);
        return Ok(());
    }

    let mut all = calc.calc(&concealed)?;
    info!("{} candidates", all.len());
    all.sort_by(|a, b| b.cmp(a, CandidateColumn::EV));
    for candidate in all.iter().take(top) {
        println!("{}", candidate.to_candidate_string());
    }
    println!("{} {}", style("chosen:").bold(), chosen.to_candidate_string());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze { log, top } => analyze(&log, top),
        Command::Score { tiles, wait, table } => score(&tiles, wait, &table.options()?),
        Command::Waits { tiles, table } => waits(&tiles, &table.options()?),
        Command::Tenpai {
            tiles,
            top,
            json,
            table,
        } => tenpai(&tiles, top, json, &table.options()?),
        Command::Bot => Bot::new().run(io::stdin().lock(), io::stdout().lock()),
        Command::Arena { games, seed } => {
            let tally = run_games(games, seed, true);
            println!("{tally}");
            Ok(())
        }
    }
}
