//! Engine output types: score results, deferred effects and previews.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::game::transform::TransformTrace;
use crate::game::types::*;

/// Deck or money change the caller applies after a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeferredEffect {
    GainMoney {
        amount: i64,
    },
    RemoveTileFromDeck {
        tile: TileKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        enchantment: Option<EnchantmentKind>,
    },
    /// Remove one copy with exactly this enchantment, or nothing.
    DestroyTile {
        tile: TileKind,
        enchantment: EnchantmentKind,
    },
    AddTilesToDeck {
        tile: TileKind,
        count: u32,
    },
}

/// Result of scoring one board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub base_score: i64,
    pub multiplier: i64,
    /// Cells whose tile interacted with at least one other tile.
    pub scored_cells: BTreeSet<Position>,
    pub effective_grid: Grid,
    pub effects: Vec<DeferredEffect>,
}

impl ScoreResult {
    pub fn total(&self) -> i64 {
        self.base_score.saturating_mul(self.multiplier)
    }

    /// Scored cells as "r-c" keys.
    pub fn scored_keys(&self) -> BTreeSet<String> {
        self.scored_cells.iter().map(|p| p.to_key()).collect()
    }
}

/// Result of ending a hand: the score plus everything decided by chance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitOutcome {
    pub score: ScoreResult,
    /// Flat points added after the multiplier (explosive enchantments).
    pub bonus: i64,
    pub hand_total: i64,
    /// Every effect to apply, in order. Includes `score.effects`.
    pub effects: Vec<DeferredEffect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InteractionEdge {
    pub from: Position,
    pub to: Position,
}

/// Highlight for a cell that a transformation or shy rule is about to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Marker {
    Rotated { quarter_turns: u32 },
    Eaten { by: Position },
    Duplicated { by: Position, copy_of: TileKind },
    /// Shy tile hit exactly once: doubles the multiplier.
    ShyDoubling,
    /// Shy tile left alone: pays out money.
    ShyPayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Forecast {
    pub base_score: i64,
    pub multiplier: i64,
    pub total: i64,
}

impl From<&ScoreResult> for Forecast {
    fn from(result: &ScoreResult) -> Self {
        Self {
            base_score: result.base_score,
            multiplier: result.multiplier,
            total: result.total(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    /// Lines from the hovered cell to each of its targets.
    pub edges: Vec<InteractionEdge>,
    pub markers: BTreeMap<Position, Vec<Marker>>,
    pub effective_grid: Grid,
    pub trace: TransformTrace,
    /// Score of the board with the hovered tile in place.
    pub forecast: Forecast,
}
