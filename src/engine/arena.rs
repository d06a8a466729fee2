//! Batch runner: plays many seeded runs in parallel and aggregates the scores.

use std::time::Instant;

use rayon::prelude::*;

use crate::engine::rng::seeded;
use crate::engine::simulator::{play_level, LevelReport, RunState};
use crate::engine::strategy::PlacementStrategy;
use crate::game::scoring::ScoringEngine;
use crate::game::types::StickerKind;

#[derive(Debug, Clone)]
pub struct ArenaConfig {
    pub runs: usize,
    pub levels_per_run: usize,
    pub base_seed: u64,
    pub stickers: Vec<StickerKind>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            runs: 100,
            levels_per_run: 1,
            base_seed: 42,
            stickers: Vec::new(),
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub seed: u64,
    pub levels: Vec<LevelReport>,
    pub final_money: i64,
    pub final_deck_size: usize,
    pub duration_ms: f64,
}

impl RunRecord {
    pub fn total_score(&self) -> i64 {
        self.levels.iter().map(|l| l.total_score).sum()
    }
}

/// Aggregated results from an arena run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub strategy: String,
    pub runs: Vec<RunRecord>,
}

impl SimulationSummary {
    fn level_scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.runs.iter().flat_map(|r| r.levels.iter().map(|l| l.total_score as f64))
    }

    pub fn num_levels(&self) -> usize {
        self.runs.iter().map(|r| r.levels.len()).sum()
    }

    pub fn mean_level_score(&self) -> f64 {
        let n = self.num_levels();
        if n == 0 {
            return 0.0;
        }
        self.level_scores().sum::<f64>() / n as f64
    }

    pub fn level_score_stddev(&self) -> f64 {
        let n = self.num_levels();
        if n < 2 {
            return 0.0;
        }
        let avg = self.mean_level_score();
        let variance = self.level_scores().map(|s| (s - avg).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    }

    pub fn best_hand(&self) -> i64 {
        self.runs
            .iter()
            .flat_map(|r| r.levels.iter().map(LevelReport::best_hand))
            .max()
            .unwrap_or(0)
    }

    pub fn mean_money(&self) -> f64 {
        if self.runs.is_empty() {
            return 0.0;
        }
        self.runs.iter().map(|r| r.final_money as f64).sum::<f64>() / self.runs.len() as f64
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "Simulation Results ({} runs, {} levels, strategy {})",
            self.runs.len(),
            self.num_levels(),
            self.strategy
        )];
        lines.push("=".repeat(60));
        lines.push(format!(
            "  {:>12}: {:8.1} +/- {:6.1}",
            "Level score",
            self.mean_level_score(),
            self.level_score_stddev()
        ));
        lines.push(format!("  {:>12}: {}", "Best hand", self.best_hand()));
        lines.push(format!("  {:>12}: {:8.1}", "Money", self.mean_money()));
        if !self.runs.is_empty() {
            let total_ms: f64 = self.runs.iter().map(|r| r.duration_ms).sum();
            lines.push(format!(
                "  Avg run: {:.1}ms  |  Total: {:.1}s",
                total_ms / self.runs.len() as f64,
                total_ms / 1000.0
            ));
        }
        lines.join("\n")
    }
}

/// Play `config.runs` runs in parallel. Run `i` uses seed `base_seed + i`,
/// so results do not depend on thread scheduling.
pub fn run_simulations(
    engine: &ScoringEngine<'_>,
    strategy: &dyn PlacementStrategy,
    config: &ArenaConfig,
) -> SimulationSummary {
    let runs: Vec<RunRecord> = (0..config.runs)
        .into_par_iter()
        .map(|i| {
            let seed = config.base_seed + i as u64;
            play_run(engine, strategy, config, seed)
        })
        .collect();

    tracing::info!(runs = runs.len(), strategy = strategy.name(), "simulations finished");
    SimulationSummary {
        strategy: strategy.name().to_string(),
        runs,
    }
}

fn play_run(
    engine: &ScoringEngine<'_>,
    strategy: &dyn PlacementStrategy,
    config: &ArenaConfig,
    seed: u64,
) -> RunRecord {
    let t0 = Instant::now();
    let mut rng = seeded(seed);
    let mut run = RunState::new(engine.rules()).with_stickers(&config.stickers);

    let levels = (0..config.levels_per_run)
        .map(|_| play_level(engine, &mut run, strategy, &mut rng))
        .collect();

    RunRecord {
        seed,
        levels,
        final_money: run.money,
        final_deck_size: run.deck.len(),
        duration_ms: t0.elapsed().as_secs_f64() * 1000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::strategy::RandomStrategy;

    #[test]
    fn test_arena_random() {
        let engine = ScoringEngine::standard();
        let config = ArenaConfig { runs: 4, levels_per_run: 2, ..ArenaConfig::default() };
        let summary = run_simulations(&engine, &RandomStrategy, &config);

        assert_eq!(summary.runs.len(), 4);
        assert_eq!(summary.num_levels(), 8);
        let seeds: Vec<u64> = summary.runs.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![42, 43, 44, 45]);
        assert!(summary.summary().contains("4 runs"));
    }

    #[test]
    fn test_arena_is_deterministic() {
        let engine = ScoringEngine::standard();
        let config = ArenaConfig { runs: 6, ..ArenaConfig::default() };
        let a = run_simulations(&engine, &RandomStrategy, &config);
        let b = run_simulations(&engine, &RandomStrategy, &config);
        let totals = |s: &SimulationSummary| s.runs.iter().map(RunRecord::total_score).collect::<Vec<_>>();
        assert_eq!(totals(&a), totals(&b));
    }

    #[test]
    fn test_empty_summary() {
        let summary = SimulationSummary { strategy: "none".into(), runs: Vec::new() };
        assert_eq!(summary.mean_level_score(), 0.0);
        assert_eq!(summary.level_score_stddev(), 0.0);
        assert_eq!(summary.best_hand(), 0);
    }
}
