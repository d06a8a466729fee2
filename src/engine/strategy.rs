//! Placement strategies used by the simulator.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::deck::DeckTile;
use crate::game::scoring::ScoringEngine;
use crate::game::types::*;

/// Everything about the current hand a strategy may look at besides the board.
#[derive(Debug, Clone, Copy)]
pub struct HandContext<'a> {
    pub stickers: &'a [StickerKind],
    pub hand_number: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Index into the hand.
    pub hand_index: usize,
    pub position: Position,
    pub rotation: Rotation,
}

impl Placement {
    pub fn tile(&self, hand: &[DeckTile]) -> Option<PlacedTile> {
        hand.get(self.hand_index).map(|t| PlacedTile {
            kind: t.kind,
            enchantment: t.enchantment,
            rotation: self.rotation,
        })
    }
}

/// Picks the next tile to place, or `None` to end the hand.
pub trait PlacementStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn choose_placement(
        &self,
        engine: &ScoringEngine<'_>,
        grid: &Grid,
        hand: &[DeckTile],
        ctx: &HandContext<'_>,
        rng: &mut StdRng,
    ) -> Option<Placement>;
}

/// Places every tile it can at a random empty cell and rotation.
pub struct RandomStrategy;

impl PlacementStrategy for RandomStrategy {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_placement(
        &self,
        _engine: &ScoringEngine<'_>,
        grid: &Grid,
        hand: &[DeckTile],
        _ctx: &HandContext<'_>,
        rng: &mut StdRng,
    ) -> Option<Placement> {
        if hand.is_empty() {
            return None;
        }
        let position = *grid.empty_positions().choose(rng)?;
        Some(Placement {
            hand_index: rng.gen_range(0..hand.len()),
            position,
            rotation: Rotation::from_quarter_turns(rng.gen_range(0..4)),
        })
    }
}

/// Tries every tile, cell and rotation through the preview and takes the best
/// forecast. Stops once no placement improves a non-zero score.
pub struct GreedyStrategy;

impl PlacementStrategy for GreedyStrategy {
    fn name(&self) -> &str {
        "greedy"
    }

    fn choose_placement(
        &self,
        engine: &ScoringEngine<'_>,
        grid: &Grid,
        hand: &[DeckTile],
        ctx: &HandContext<'_>,
        _rng: &mut StdRng,
    ) -> Option<Placement> {
        let current = engine.score(grid, ctx.stickers, ctx.hand_number).total();

        let mut best: Option<(i64, Placement)> = None;
        for position in grid.empty_positions() {
            for hand_index in 0..hand.len() {
                for turns in 0..4 {
                    let placement = Placement {
                        hand_index,
                        position,
                        rotation: Rotation::from_quarter_turns(turns),
                    };
                    let tile = placement.tile(hand)?;
                    let forecast = engine
                        .preview(grid, Some(position), Some(tile), ctx.stickers, ctx.hand_number)
                        .forecast;
                    if best.map_or(true, |(total, _)| forecast.total > total) {
                        best = Some((forecast.total, placement));
                    }
                }
            }
        }

        let (total, placement) = best?;
        (total > current || current == 0).then_some(placement)
    }
}

/// Strategy by name, as accepted on the command line.
pub fn strategy_by_name(name: &str) -> Option<Box<dyn PlacementStrategy>> {
    match name {
        "random" => Some(Box::new(RandomStrategy)),
        "greedy" => Some(Box::new(GreedyStrategy)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn ctx() -> HandContext<'static> {
        HandContext { stickers: &[], hand_number: 1 }
    }

    #[test]
    fn test_random_places_on_empty_cell() {
        let engine = ScoringEngine::standard();
        let mut grid = Grid::new();
        grid.place(Position::new(0, 0), PlacedTile::new(TileKind::Red));
        let hand = [DeckTile::new(TileKind::Blue), DeckTile::new(TileKind::Green)];
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let p = RandomStrategy.choose_placement(&engine, &grid, &hand, &ctx(), &mut rng).unwrap();
            assert!(!grid.is_occupied(p.position));
            assert!(p.hand_index < hand.len());
        }
        assert!(RandomStrategy.choose_placement(&engine, &grid, &[], &ctx(), &mut rng).is_none());
    }

    #[test]
    fn test_greedy_finds_interaction() {
        let engine = ScoringEngine::standard();
        let mut grid = Grid::new();
        grid.place(Position::new(0, 2), PlacedTile::new(TileKind::Green));
        let hand = [DeckTile::new(TileKind::Blue)];
        let mut rng = StdRng::seed_from_u64(3);
        let p = GreedyStrategy.choose_placement(&engine, &grid, &hand, &ctx(), &mut rng).unwrap();
        let mut placed = grid;
        placed.place(p.position, p.tile(&hand).unwrap());
        assert!(engine.score(&placed, &[], 1).total() > 0);
    }

    #[test]
    fn test_greedy_on_full_board() {
        let engine = ScoringEngine::standard();
        let mut grid = Grid::new();
        for pos in Position::all() {
            grid.place(pos, PlacedTile::new(TileKind::Yellow));
        }
        let hand = [DeckTile::new(TileKind::Blue)];
        let mut rng = StdRng::seed_from_u64(3);
        assert!(GreedyStrategy.choose_placement(&engine, &grid, &hand, &ctx(), &mut rng).is_none());
    }

    #[test]
    fn test_strategy_by_name() {
        assert_eq!(strategy_by_name("greedy").unwrap().name(), "greedy");
        assert!(strategy_by_name("minimax").is_none());
    }
}
