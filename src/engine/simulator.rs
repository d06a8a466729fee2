//! Level simulator: draws hands from a shuffled copy of the run deck, lets a
//! strategy fill the board, commits each hand and applies its effects to the
//! run. Used by the arena and the `simulate` binary.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::engine::models::DeferredEffect;
use crate::engine::rules::RuleSet;
use crate::engine::strategy::{HandContext, PlacementStrategy};
use crate::game::deck::{Deck, DeckTile};
use crate::game::scoring::ScoringEngine;
use crate::game::types::*;

/// State that outlives a level.
#[derive(Debug, Clone, Serialize)]
pub struct RunState {
    pub deck: Deck,
    pub money: i64,
    pub stickers: Vec<StickerKind>,
}

impl RunState {
    pub fn new(rules: &RuleSet) -> Self {
        Self {
            deck: Deck::starter(rules.deck_limit),
            money: 0,
            stickers: Vec::new(),
        }
    }

    pub fn with_stickers(mut self, stickers: &[StickerKind]) -> Self {
        self.stickers = stickers.to_vec();
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HandReport {
    pub hand_number: u32,
    pub placed: usize,
    pub base_score: i64,
    pub multiplier: i64,
    pub bonus: i64,
    pub hand_total: i64,
    pub effects: Vec<DeferredEffect>,
    pub layout: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelReport {
    pub hands: Vec<HandReport>,
    pub total_score: i64,
    pub money_after: i64,
    pub deck_size_after: usize,
}

impl LevelReport {
    pub fn best_hand(&self) -> i64 {
        self.hands.iter().map(|h| h.hand_total).max().unwrap_or(0)
    }
}

pub fn hands_for_level(rules: &RuleSet, stickers: &[StickerKind]) -> u32 {
    let extra = u32::from(stickers.contains(&StickerKind::NeedAHand));
    rules.hands_per_level + extra
}

/// Play one level against `run`, mutating its deck and money.
pub fn play_level(
    engine: &ScoringEngine<'_>,
    run: &mut RunState,
    strategy: &dyn PlacementStrategy,
    rng: &mut StdRng,
) -> LevelReport {
    let rules = *engine.rules();
    let mut draw_pile: Vec<DeckTile> = run.deck.tiles().to_vec();
    draw_pile.shuffle(rng);

    let mut hand: Vec<DeckTile> = Vec::with_capacity(rules.hand_size);
    let mut hands = Vec::new();
    let mut total_score = 0;

    for hand_number in 1..=hands_for_level(&rules, &run.stickers) {
        while hand.len() < rules.hand_size {
            match draw_pile.pop() {
                Some(tile) => hand.push(tile),
                None => break,
            }
        }

        let ctx = HandContext { stickers: &run.stickers, hand_number };
        let mut grid = Grid::new();
        let mut placed = 0;
        while let Some(placement) = strategy.choose_placement(engine, &grid, &hand, &ctx, rng) {
            let Some(tile) = placement.tile(&hand) else { break };
            if !grid.place(placement.position, tile) {
                tracing::warn!(
                    strategy = strategy.name(),
                    cell = %placement.position,
                    "strategy chose an occupied cell, ending hand"
                );
                break;
            }
            hand.remove(placement.hand_index);
            placed += 1;
        }

        let outcome = engine.commit(&grid, &run.stickers, hand_number, rng);
        run.deck.apply(&outcome.effects, &mut run.money);
        total_score += outcome.hand_total;

        tracing::debug!(
            hand = hand_number,
            placed,
            total = outcome.hand_total,
            deck = run.deck.len(),
            money = run.money,
            "hand played"
        );

        hands.push(HandReport {
            hand_number,
            placed,
            base_score: outcome.score.base_score,
            multiplier: outcome.score.multiplier,
            bonus: outcome.bonus,
            hand_total: outcome.hand_total,
            effects: outcome.effects,
            layout: grid.to_layout(),
        });
    }

    LevelReport {
        hands,
        total_score,
        money_after: run.money,
        deck_size_after: run.deck.len(),
    }
}

/// Board with `tiles` random tiles (any kind, enchantment or rotation) on
/// distinct cells.
pub fn random_grid(rng: &mut StdRng, tiles: usize) -> Grid {
    let mut positions: Vec<Position> = Position::all().collect();
    positions.shuffle(rng);

    let mut grid = Grid::new();
    for pos in positions.into_iter().take(tiles) {
        let kind = TileKind::ALL[rng.gen_range(0..TileKind::ALL.len())];
        let enchantment = if rng.gen_bool(0.2) {
            Some(EnchantmentKind::ALL[rng.gen_range(0..EnchantmentKind::ALL.len())])
        } else {
            None
        };
        grid.set(
            pos,
            Some(PlacedTile {
                kind,
                enchantment,
                rotation: Rotation::from_quarter_turns(rng.gen_range(0..4)),
            }),
        );
    }
    grid
}
