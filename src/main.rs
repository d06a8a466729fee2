//! `tilegrid`: score, preview or inspect boards from the command line.
//!
//! Usage:
//!   tilegrid score board.txt --stickers mr_happy,rgb --hand 2
//!   tilegrid score board.json --commit --seed 7
//!   tilegrid preview board.txt --at 2-3 --tile munching@90
//!   tilegrid catalog --json
//!
//! Boards are either JSON (five rows of cells) or five lines of tile tokens
//! with `.` for empty cells. Results go to stdout as JSON, logs to stderr.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tilegrid_engine::engine::rng::seeded;
use tilegrid_engine::engine::rules::load_rule_set;
use tilegrid_engine::game::catalog::STANDARD_CATALOG;
use tilegrid_engine::game::scoring::ScoringEngine;
use tilegrid_engine::game::types::{Grid, PlacedTile, Position, StickerKind};
use tilegrid_engine::EngineError;

#[derive(Parser)]
#[command(name = "tilegrid", about = "Tile grid scoring engine")]
struct Cli {
    /// Path to rules.toml (default: auto-discover)
    #[arg(long, global = true, env = "TILEGRID_RULES")]
    rules: Option<PathBuf>,

    /// Rule profile name from rules.toml
    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a board
    Score {
        #[command(flatten)]
        hand: HandArgs,

        /// Resolve chance effects too (explosive tiles, white tile rewards)
        #[arg(long)]
        commit: bool,

        /// Seed for --commit
        #[arg(long, default_value = "42")]
        seed: u64,
    },
    /// Preview a hovered cell, optionally holding a tile
    Preview {
        #[command(flatten)]
        hand: HandArgs,

        /// Hovered cell as "row-col"
        #[arg(long)]
        at: Option<Position>,

        /// Held tile token, e.g. "blue@90+shiny"
        #[arg(long)]
        tile: Option<PlacedTile>,
    },
    /// Print the tile, enchantment and sticker catalog
    Catalog {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct HandArgs {
    /// Board file (JSON or layout)
    board: PathBuf,

    /// Active stickers, comma separated
    #[arg(long, value_delimiter = ',')]
    stickers: Vec<StickerKind>,

    /// Current hand number
    #[arg(long, default_value = "1")]
    hand: u32,
}

fn load_board(path: &Path) -> Result<Grid, EngineError> {
    let text = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Grid::parse(&text)
}

fn print_catalog() {
    println!("{:<16} {:<10} {:>5}  {}", "TILE", "RARITY", "PRICE", "EFFECT");
    for def in STANDARD_CATALOG.tiles() {
        println!("{:<16} {:<10} {:>5}  {}", def.name, format!("{:?}", def.rarity), def.price, def.tooltip);
    }
    println!();
    println!("{:<16} {:<10} {:>5}  {}", "ENCHANTMENT", "RARITY", "FEE", "EFFECT");
    for def in STANDARD_CATALOG.enchantments() {
        println!("{:<16} {:<10} {:>5}  {}", def.name, format!("{:?}", def.rarity), def.base_fee, def.tooltip);
    }
    println!();
    println!("{:<16} {:<10} {:>5}  {}", "STICKER", "RARITY", "PRICE", "EFFECT");
    for def in STANDARD_CATALOG.stickers() {
        println!("{:<16} {:<10} {:>5}  {}", def.name, format!("{:?}", def.rarity), def.price, def.tooltip);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let rules = load_rule_set(cli.rules.as_deref(), cli.profile.as_deref())?;
    let engine = ScoringEngine::new(&STANDARD_CATALOG, rules);

    match cli.command {
        Command::Score { hand, commit, seed } => {
            let grid = load_board(&hand.board)?;
            let output = if commit {
                let mut rng = seeded(seed);
                let outcome = engine.commit(&grid, &hand.stickers, hand.hand, &mut rng);
                serde_json::json!({ "total": outcome.hand_total, "outcome": outcome })
            } else {
                let result = engine.score(&grid, &hand.stickers, hand.hand);
                serde_json::json!({ "total": result.total(), "result": result })
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Preview { hand, at, tile } => {
            let grid = load_board(&hand.board)?;
            if tile.is_some() && at.is_none() {
                tracing::warn!("--tile given without --at, ignoring held tile");
            }
            let preview = engine.preview(&grid, at, tile, &hand.stickers, hand.hand);
            println!("{}", serde_json::to_string_pretty(&preview)?);
        }
        Command::Catalog { json } => {
            if json {
                let output = serde_json::json!({
                    "tiles": STANDARD_CATALOG.tiles(),
                    "enchantments": STANDARD_CATALOG.enchantments(),
                    "stickers": STANDARD_CATALOG.stickers(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_catalog();
            }
        }
    }

    Ok(())
}
