//! Score every board in tests/fixtures/scenarios.json and compare with the
//! expected result.
//!
//! Run with:
//!     cargo test --test scoring_scenarios -- --nocapture

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use tilegrid_engine::engine::rules::load_profiles;
use tilegrid_engine::game::scoring::ScoringEngine;
use tilegrid_engine::game::types::{Grid, StickerKind};

#[derive(Deserialize)]
struct Scenario {
    name: String,
    layout: Vec<String>,
    #[serde(default)]
    stickers: Vec<StickerKind>,
    #[serde(default = "first_hand")]
    hand: u32,
    base_score: i64,
    multiplier: i64,
    scored: Vec<String>,
    effects: serde_json::Value,
}

fn first_hand() -> u32 {
    1
}

fn load_scenarios() -> Vec<Scenario> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/scenarios.json");
    let json_str = fs::read_to_string(&path).unwrap_or_else(|_| panic!("Fixture not found at {:?}", path));
    serde_json::from_str(&json_str).expect("Invalid JSON in scenarios fixture")
}

#[test]
fn scenarios_match_expected_scores() {
    let engine = ScoringEngine::standard();
    let scenarios = load_scenarios();
    assert!(!scenarios.is_empty());

    for scenario in &scenarios {
        let grid = Grid::from_layout(&scenario.layout.join("\n"))
            .unwrap_or_else(|e| panic!("{}: bad layout: {}", scenario.name, e));
        let result = engine.score(&grid, &scenario.stickers, scenario.hand);

        assert_eq!(result.base_score, scenario.base_score, "{}: base score", scenario.name);
        assert_eq!(result.multiplier, scenario.multiplier, "{}: multiplier", scenario.name);
        let expected: BTreeSet<String> = scenario.scored.iter().cloned().collect();
        assert_eq!(result.scored_keys(), expected, "{}: scored cells", scenario.name);
        assert_eq!(
            serde_json::to_value(&result.effects).unwrap(),
            scenario.effects,
            "{}: effects",
            scenario.name
        );
        println!("  ok  {:<45} {:>4} x {:<3} = {}", scenario.name, result.base_score, result.multiplier, result.total());
    }
}

#[test]
fn scoring_twice_gives_identical_results() {
    let engine = ScoringEngine::standard();
    for scenario in load_scenarios() {
        let grid = Grid::from_layout(&scenario.layout.join("\n")).unwrap();
        let a = engine.score(&grid, &scenario.stickers, scenario.hand);
        let b = engine.score(&grid, &scenario.stickers, scenario.hand);
        assert_eq!(a, b, "{}", scenario.name);
    }
}

#[test]
fn shipped_rule_profiles_resolve() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("rules.toml");
    let profiles = load_profiles(&path).expect("rules.toml should parse");
    assert!(profiles.resolve(None).is_ok());
    for name in profiles.profiles.keys() {
        let rules = profiles.resolve(Some(name)).unwrap();
        assert!((0.0..=1.0).contains(&rules.explosive_chance), "{name}");
        assert!(rules.hand_size > 0, "{name}");
    }
}
