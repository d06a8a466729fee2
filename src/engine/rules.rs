//! Numeric scoring rules and named rule profiles.
//! Profiles are loaded from TOML; every field is an optional override on top
//! of [`RuleSet::default`].

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Every tunable constant of the scoring rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Base score of one interaction.
    pub interaction_score: i64,
    /// Mr. Happy: extra score per interaction.
    pub mr_happy_bonus: i64,
    /// RGB: extra score per interaction from a red, green or blue tile.
    pub rgb_bonus: i64,
    /// Hourglass: multiplier per hand number.
    pub hourglass_per_hand: i64,
    /// Multiplier for each interaction landing on a purple tile.
    pub purple_bonus: i64,
    pub black_isolated_factor: i64,
    pub black_engaged_bonus: i64,
    pub shy_factor: i64,
    pub shy_payout: i64,
    /// Score per distinct tile kind in an orange tile's row and column.
    pub orange_per_kind: i64,
    pub blocking_bonus: i64,
    /// Multiplier for each tile eaten by a munching tile.
    pub munch_bonus: i64,
    pub creative_score: i64,
    pub productive_bonus: i64,
    pub explosive_chance: f64,
    pub explosive_score: i64,
    pub shiny_money: i64,
    /// Tiles granted by an isolated white tile.
    pub white_reward_count: u32,
    pub hand_size: usize,
    pub hands_per_level: u32,
    pub deck_limit: usize,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            interaction_score: 10,
            mr_happy_bonus: 15,
            rgb_bonus: 5,
            hourglass_per_hand: 4,
            purple_bonus: 1,
            black_isolated_factor: 3,
            black_engaged_bonus: 10,
            shy_factor: 2,
            shy_payout: 5,
            orange_per_kind: 20,
            blocking_bonus: 15,
            munch_bonus: 6,
            creative_score: 100,
            productive_bonus: 15,
            explosive_chance: 0.15,
            explosive_score: 200,
            shiny_money: 2,
            white_reward_count: 2,
            hand_size: 7,
            hands_per_level: 3,
            deck_limit: 40,
        }
    }
}

/// A named set of overrides.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RuleProfile {
    pub description: Option<String>,

    pub interaction_score: Option<i64>,
    pub mr_happy_bonus: Option<i64>,
    pub rgb_bonus: Option<i64>,
    pub hourglass_per_hand: Option<i64>,
    pub purple_bonus: Option<i64>,
    pub black_isolated_factor: Option<i64>,
    pub black_engaged_bonus: Option<i64>,
    pub shy_factor: Option<i64>,
    pub shy_payout: Option<i64>,
    pub orange_per_kind: Option<i64>,
    pub blocking_bonus: Option<i64>,
    pub munch_bonus: Option<i64>,
    pub creative_score: Option<i64>,
    pub productive_bonus: Option<i64>,
    pub explosive_chance: Option<f64>,
    pub explosive_score: Option<i64>,
    pub shiny_money: Option<i64>,
    pub white_reward_count: Option<u32>,
    pub hand_size: Option<usize>,
    pub hands_per_level: Option<u32>,
    pub deck_limit: Option<usize>,
}

impl RuleProfile {
    /// Convert to a RuleSet, using defaults for any unspecified fields.
    pub fn to_rule_set(&self) -> RuleSet {
        let d = RuleSet::default();
        RuleSet {
            interaction_score: self.interaction_score.unwrap_or(d.interaction_score),
            mr_happy_bonus: self.mr_happy_bonus.unwrap_or(d.mr_happy_bonus),
            rgb_bonus: self.rgb_bonus.unwrap_or(d.rgb_bonus),
            hourglass_per_hand: self.hourglass_per_hand.unwrap_or(d.hourglass_per_hand),
            purple_bonus: self.purple_bonus.unwrap_or(d.purple_bonus),
            black_isolated_factor: self.black_isolated_factor.unwrap_or(d.black_isolated_factor),
            black_engaged_bonus: self.black_engaged_bonus.unwrap_or(d.black_engaged_bonus),
            shy_factor: self.shy_factor.unwrap_or(d.shy_factor),
            shy_payout: self.shy_payout.unwrap_or(d.shy_payout),
            orange_per_kind: self.orange_per_kind.unwrap_or(d.orange_per_kind),
            blocking_bonus: self.blocking_bonus.unwrap_or(d.blocking_bonus),
            munch_bonus: self.munch_bonus.unwrap_or(d.munch_bonus),
            creative_score: self.creative_score.unwrap_or(d.creative_score),
            productive_bonus: self.productive_bonus.unwrap_or(d.productive_bonus),
            explosive_chance: self.explosive_chance.unwrap_or(d.explosive_chance).clamp(0.0, 1.0),
            explosive_score: self.explosive_score.unwrap_or(d.explosive_score),
            shiny_money: self.shiny_money.unwrap_or(d.shiny_money),
            white_reward_count: self.white_reward_count.unwrap_or(d.white_reward_count),
            hand_size: self.hand_size.unwrap_or(d.hand_size),
            hands_per_level: self.hands_per_level.unwrap_or(d.hands_per_level),
            deck_limit: self.deck_limit.unwrap_or(d.deck_limit),
        }
    }
}

/// Top-level TOML file structure.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RuleProfilesFile {
    /// Profile used when none is named.
    pub default_profile: Option<String>,
    #[serde(default)]
    pub profiles: HashMap<String, RuleProfile>,
}

impl RuleProfilesFile {
    /// Rule set for `name`, or for `default_profile`, or the built-in rules.
    pub fn resolve(&self, name: Option<&str>) -> Result<RuleSet> {
        let Some(name) = name.or(self.default_profile.as_deref()) else {
            return Ok(RuleSet::default());
        };
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.to_rule_set()),
            None => {
                let mut available: Vec<String> = self.profiles.keys().cloned().collect();
                available.sort();
                Err(EngineError::UnknownProfile { name: name.to_string(), available })
            }
        }
    }
}

/// Load profiles from a TOML file at the given path.
pub fn load_profiles(path: &Path) -> Result<RuleProfilesFile> {
    let content = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| EngineError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Try to load profiles from well-known paths, returning an empty file if
/// none is found.
pub fn load_default_profiles() -> RuleProfilesFile {
    let candidates = ["rules.toml", "../rules.toml", "/etc/tilegrid/rules.toml"];
    for path in &candidates {
        let p = Path::new(path);
        if p.exists() {
            match load_profiles(p) {
                Ok(profiles) => {
                    tracing::info!(path = %p.display(), count = profiles.profiles.len(), "loaded rule profiles");
                    return profiles;
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "failed to load rule profiles");
                }
            }
        }
    }
    tracing::info!("no rules.toml found, using built-in rules");
    RuleProfilesFile::default()
}

/// Rules for the command line: an explicit file must load, otherwise the
/// well-known paths are tried.
pub fn load_rule_set(path: Option<&Path>, profile: Option<&str>) -> Result<RuleSet> {
    let profiles = match path {
        Some(path) => load_profiles(path)?,
        None => load_default_profiles(),
    };
    profiles.resolve(profile)
}
