//! Simulation CLI: play many seeded levels with a placement strategy.
//!
//! Usage:
//!   cargo run --release --bin simulate -- --runs 500 --strategy greedy
//!   cargo run --release --bin simulate -- --runs 50 --levels 3 --stickers hourglass --profile generous

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tilegrid_engine::engine::arena::{run_simulations, ArenaConfig};
use tilegrid_engine::engine::rules::load_rule_set;
use tilegrid_engine::engine::strategy::strategy_by_name;
use tilegrid_engine::game::catalog::STANDARD_CATALOG;
use tilegrid_engine::game::scoring::ScoringEngine;
use tilegrid_engine::game::types::StickerKind;

#[derive(Parser)]
#[command(name = "simulate", about = "Run seeded level simulations")]
struct Cli {
    /// Number of runs
    #[arg(long, default_value = "100")]
    runs: usize,

    /// Levels played per run
    #[arg(long, default_value = "1")]
    levels: usize,

    /// Base random seed; run i uses seed + i
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Placement strategy: "random" or "greedy"
    #[arg(long, default_value = "greedy")]
    strategy: String,

    /// Stickers active for the whole run, comma separated
    #[arg(long, value_delimiter = ',')]
    stickers: Vec<StickerKind>,

    /// Path to rules.toml
    #[arg(long, env = "TILEGRID_RULES")]
    rules: Option<PathBuf>,

    /// Rule profile name from rules.toml
    #[arg(long)]
    profile: Option<String>,

    /// Print every run as JSON lines instead of the summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let rules = load_rule_set(cli.rules.as_deref(), cli.profile.as_deref())?;
    let engine = ScoringEngine::new(&STANDARD_CATALOG, rules);
    let strategy = strategy_by_name(&cli.strategy)
        .ok_or_else(|| format!("unknown strategy '{}', expected random or greedy", cli.strategy))?;

    let config = ArenaConfig {
        runs: cli.runs,
        levels_per_run: cli.levels,
        base_seed: cli.seed,
        stickers: cli.stickers,
    };
    eprintln!(
        "Simulate: {} runs x {} levels, seed={}, strategy={}, stickers={:?}",
        config.runs,
        config.levels_per_run,
        config.base_seed,
        strategy.name(),
        config.stickers
    );

    let summary = run_simulations(&engine, strategy.as_ref(), &config);

    if cli.json {
        for run in &summary.runs {
            let line = serde_json::json!({
                "seed": run.seed,
                "total_score": run.total_score(),
                "money": run.final_money,
                "deck_size": run.final_deck_size,
                "levels": run.levels,
            });
            println!("{}", serde_json::to_string(&line)?);
        }
    } else {
        println!("{}", summary.summary());
    }

    Ok(())
}
