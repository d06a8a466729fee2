//! Scoring engine.
//!
//! [`ScoringEngine::score`] and [`ScoringEngine::preview`] both run the
//! transformation pipeline and then the same evaluation pass, so a forecast
//! always matches what a commit would score.

use std::collections::BTreeSet;

use super::board::is_isolated;
use super::catalog::{TileCatalog, STANDARD_CATALOG};
use super::resolver::InteractionResolver;
use super::transform::{EffectiveBoard, Hypothetical, TransformPipeline};
use super::types::*;
use crate::engine::models::{CommitOutcome, DeferredEffect, ScoreResult};
use crate::engine::rng::RandomSource;
use crate::engine::rules::RuleSet;

/// Incoming interaction count per cell.
pub(crate) type IncomingCounts = [[u32; GRID_SIZE]; GRID_SIZE];

pub(crate) struct Evaluation {
    pub result: ScoreResult,
    pub incoming: IncomingCounts,
}

#[derive(Clone, Copy)]
pub struct ScoringEngine<'c> {
    catalog: &'c TileCatalog,
    rules: RuleSet,
}

impl ScoringEngine<'static> {
    /// Standard catalog and default rules.
    pub fn standard() -> Self {
        Self::new(&STANDARD_CATALOG, RuleSet::default())
    }
}

impl<'c> ScoringEngine<'c> {
    pub fn new(catalog: &'c TileCatalog, rules: RuleSet) -> Self {
        Self { catalog, rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn catalog(&self) -> &'c TileCatalog {
        self.catalog
    }

    pub fn effective_grid(&self, raw: &Grid, hypothetical: Option<&Hypothetical>) -> EffectiveBoard {
        TransformPipeline::new(self.catalog).run(raw, hypothetical)
    }

    /// Score the board as placed. Deterministic: never draws randomness.
    pub fn score(&self, grid: &Grid, stickers: &[StickerKind], hand_number: u32) -> ScoreResult {
        let board = self.effective_grid(grid, None);
        self.evaluate(&board, stickers, hand_number).result
    }

    /// End a hand: score the board, then resolve the effects decided by chance.
    ///
    /// Draw order is fixed: one coin flip per isolated white tile (row-major),
    /// then one draw per scored explosive tile (row-major).
    pub fn commit(
        &self,
        grid: &Grid,
        stickers: &[StickerKind],
        hand_number: u32,
        rng: &mut dyn RandomSource,
    ) -> CommitOutcome {
        let score = self.score(grid, stickers, hand_number);
        let mut effects = Vec::new();

        for (pos, tile) in grid.occupied() {
            if tile.kind == TileKind::White && is_isolated(grid, pos) {
                let reward = if rng.chance(0.5) { TileKind::Black } else { TileKind::Duality };
                effects.push(DeferredEffect::AddTilesToDeck {
                    tile: reward,
                    count: self.rules.white_reward_count,
                });
            }
        }

        effects.extend(score.effects.iter().copied());

        let mut bonus: i64 = 0;
        for &pos in &score.scored_cells {
            let Some(tile) = grid.get(pos) else { continue };
            if tile.enchantment != Some(EnchantmentKind::Explosive) {
                continue;
            }
            if rng.chance(self.rules.explosive_chance) {
                bonus = bonus.saturating_add(self.rules.explosive_score);
                effects.push(DeferredEffect::DestroyTile {
                    tile: tile.kind,
                    enchantment: EnchantmentKind::Explosive,
                });
                tracing::debug!(cell = %pos, tile = tile.kind.id(), "explosive tile detonated");
            }
        }

        let hand_total = score.total().saturating_add(bonus);
        tracing::debug!(
            hand = hand_number,
            base = score.base_score,
            multiplier = score.multiplier,
            bonus,
            hand_total,
            effects = effects.len(),
            "hand committed"
        );

        CommitOutcome { score, bonus, hand_total, effects }
    }

    /// Score an already transformed board.
    pub(crate) fn evaluate(&self, board: &EffectiveBoard, stickers: &[StickerKind], hand_number: u32) -> Evaluation {
        let rules = &self.rules;
        let grid = &board.grid;
        let resolver = InteractionResolver::new(self.catalog);

        let has = |sticker: StickerKind| stickers.contains(&sticker);

        let mut base_score: i64 = 0;
        let mut multiplier: i64 = 1;
        if has(StickerKind::Hourglass) {
            let hourglass = rules.hourglass_per_hand.saturating_mul(i64::from(hand_number));
            multiplier = multiplier.saturating_add(hourglass);
        }
        let munched = board.trace.removals.len() as i64;
        multiplier = multiplier.saturating_add(rules.munch_bonus.saturating_mul(munched));

        let mut incoming: IncomingCounts = [[0; GRID_SIZE]; GRID_SIZE];
        let mut scored_cells = BTreeSet::new();

        for (source, tile) in grid.occupied() {
            let targets = resolver.resolve(tile.kind, source, grid);
            if targets.is_empty() {
                continue;
            }
            scored_cells.insert(source);

            let mut per_interaction = rules.interaction_score;
            if has(StickerKind::MrHappy) {
                per_interaction = per_interaction.saturating_add(rules.mr_happy_bonus);
            }
            if has(StickerKind::Rgb) && tile.kind.is_primary_color() {
                per_interaction = per_interaction.saturating_add(rules.rgb_bonus);
            }

            for target in targets {
                incoming[target.row][target.col] += 1;
                base_score = base_score.saturating_add(per_interaction);
                if grid.get(target).map(|t| t.kind) == Some(TileKind::Purple) {
                    multiplier = multiplier.saturating_add(rules.purple_bonus);
                }
            }
        }

        let any_scored = !scored_cells.is_empty();
        for (pos, tile) in grid.occupied() {
            if self.catalog.tile(tile.kind).is_none() {
                continue;
            }
            let hits = incoming[pos.row][pos.col];
            match tile.kind {
                TileKind::Black => {
                    if hits == 0 {
                        multiplier = multiplier.saturating_mul(rules.black_isolated_factor);
                    } else {
                        multiplier = multiplier.saturating_add(rules.black_engaged_bonus);
                    }
                }
                TileKind::Shy => {
                    if hits == 1 {
                        multiplier = multiplier.saturating_mul(rules.shy_factor);
                    }
                }
                TileKind::Orange => {
                    let kinds = distinct_kinds_in_lines(grid, pos) as i64;
                    base_score = base_score.saturating_add(rules.orange_per_kind.saturating_mul(kinds));
                }
                TileKind::Blocking => multiplier = multiplier.saturating_add(rules.blocking_bonus),
                TileKind::Blue
                | TileKind::Red
                | TileKind::Green
                | TileKind::Yellow
                | TileKind::Purple
                | TileKind::Colorful
                | TileKind::White
                | TileKind::Glass
                | TileKind::Rubiks
                | TileKind::Munching
                | TileKind::Duality => {}
            }

            if any_scored {
                match tile.enchantment {
                    Some(EnchantmentKind::Creative) => {
                        base_score = base_score.saturating_add(rules.creative_score);
                    }
                    Some(EnchantmentKind::Productive) => {
                        multiplier = multiplier.saturating_add(rules.productive_bonus);
                    }
                    Some(EnchantmentKind::Explosive) | Some(EnchantmentKind::Shiny) | None => {}
                }
            }
        }

        let effects = self.deck_effects(board, &scored_cells, &incoming, &resolver);

        let result = ScoreResult {
            base_score,
            multiplier,
            scored_cells,
            effective_grid: *grid,
            effects,
        };
        tracing::debug!(
            base = result.base_score,
            multiplier = result.multiplier,
            scored = result.scored_cells.len(),
            effects = result.effects.len(),
            "board scored"
        );

        Evaluation { result, incoming }
    }

    /// Money and deck changes. These follow the tile the player owns, so they
    /// read the placed board; what scored is decided on the effective board.
    fn deck_effects(
        &self,
        board: &EffectiveBoard,
        scored_cells: &BTreeSet<Position>,
        incoming: &IncomingCounts,
        resolver: &InteractionResolver<'_>,
    ) -> Vec<DeferredEffect> {
        let rules = &self.rules;
        let mut effects = Vec::new();

        for &pos in scored_cells {
            let Some(placed) = board.placed.get(pos) else { continue };
            match placed.kind {
                TileKind::Rubiks => {
                    let count = resolver.resolve(placed.kind, pos, &board.placed).len() as u32;
                    if count > 0 {
                        effects.push(DeferredEffect::AddTilesToDeck { tile: TileKind::Colorful, count });
                    }
                }
                TileKind::Glass => effects.push(DeferredEffect::RemoveTileFromDeck {
                    tile: TileKind::Glass,
                    enchantment: placed.enchantment,
                }),
                _ => {}
            }
            if placed.enchantment == Some(EnchantmentKind::Shiny) {
                effects.push(DeferredEffect::GainMoney { amount: rules.shiny_money });
            }
        }

        for _ in shy_payouts(board, incoming) {
            effects.push(DeferredEffect::GainMoney { amount: rules.shy_payout });
        }

        effects
    }
}

/// Cells whose placed shy tile pays out: nothing hits the cell on the
/// effective board. An eaten shy is never hit, so it still pays.
pub(crate) fn shy_payouts<'a>(
    board: &'a EffectiveBoard,
    incoming: &'a IncomingCounts,
) -> impl Iterator<Item = Position> + 'a {
    board
        .placed
        .occupied()
        .filter(move |(pos, placed)| placed.kind == TileKind::Shy && incoming[pos.row][pos.col] == 0)
        .map(|(pos, _)| pos)
}

/// Distinct tile kinds among the other occupied cells of `pos`'s row and column.
fn distinct_kinds_in_lines(grid: &Grid, pos: Position) -> usize {
    grid.occupied()
        .filter(|(other, _)| *other != pos && (other.row == pos.row || other.col == pos.col))
        .map(|(_, tile)| tile.kind)
        .collect::<BTreeSet<_>>()
        .len()
}
