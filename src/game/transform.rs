//! Board transformation pipeline.
//!
//! Turns the placed board into the effective board that every interaction
//! and scoring rule reads. Preview and commit both go through
//! [`TransformPipeline::run`], so they cannot disagree about what the board
//! looks like.
//!
//! Stages run in a fixed order, and each one reads a finished snapshot and
//! writes a new one:
//!
//! 1. insert the hypothetical (hovered or held) tile, if its cell is empty;
//! 2. rotation: every Rubik's tile turns its orthogonal neighbors 90°;
//! 3. removal: every Munching tile eats the tile on its rotated left;
//! 4. copy: every Duality tile turns its rotated-left neighbor into a copy of
//!    its rotated-right neighbor, keeping the left cell's rotation.
//!
//! Because a stage never reads its own output, the row-major visiting order
//! inside a stage has no effect on the result.

use serde::Serialize;

use super::board::{rotated_neighbor, ORTHOGONAL_OFFSETS};
use super::catalog::{TileCatalog, Transformation};
use super::types::*;

/// A tile the player is hovering over or holding at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hypothetical {
    pub position: Position,
    pub tile: PlacedTile,
}

impl Hypothetical {
    pub fn new(position: Position, tile: PlacedTile) -> Self {
        Self { position, tile }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RotationEvent {
    pub source: Position,
    pub target: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemovalEvent {
    pub source: Position,
    pub target: Position,
    pub eaten: TileKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CopyEvent {
    pub source: Position,
    pub from: Position,
    pub to: Position,
    pub copied: TileKind,
}

/// Record of what each stage did, in stage order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformTrace {
    pub inserted: Option<Position>,
    pub rotations: Vec<RotationEvent>,
    pub removals: Vec<RemovalEvent>,
    pub copies: Vec<CopyEvent>,
}

/// Output of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveBoard {
    /// The board as placed, including the hypothetical tile when it fit.
    pub placed: Grid,
    /// The board after every transformation stage.
    pub grid: Grid,
    pub trace: TransformTrace,
}

pub struct TransformPipeline<'c> {
    catalog: &'c TileCatalog,
}

impl<'c> TransformPipeline<'c> {
    pub fn new(catalog: &'c TileCatalog) -> Self {
        Self { catalog }
    }

    pub fn run(&self, raw: &Grid, hypothetical: Option<&Hypothetical>) -> EffectiveBoard {
        let mut trace = TransformTrace::default();

        let placed = insert_hypothetical(raw, hypothetical, &mut trace);
        let rotated = self.rotation_stage(&placed, &mut trace);
        let trimmed = self.removal_stage(&rotated, &mut trace);
        let grid = self.copy_stage(&trimmed, &mut trace);

        tracing::trace!(
            inserted = ?trace.inserted,
            rotations = trace.rotations.len(),
            removals = trace.removals.len(),
            copies = trace.copies.len(),
            "effective board computed"
        );

        EffectiveBoard { placed, grid, trace }
    }

    fn sources(&self, grid: &Grid, role: Transformation) -> Vec<(Position, PlacedTile)> {
        grid.occupied()
            .filter(|(_, tile)| self.catalog.transformation(tile.kind) == Some(role))
            .map(|(pos, tile)| (pos, *tile))
            .collect()
    }

    pub(crate) fn rotation_stage(&self, input: &Grid, trace: &mut TransformTrace) -> Grid {
        let mut output = *input;
        for (source, _) in self.sources(input, Transformation::RotateNeighbors) {
            for (dr, dc) in ORTHOGONAL_OFFSETS {
                let Some(target) = source.offset(dr, dc) else { continue };
                if !input.is_occupied(target) {
                    continue;
                }
                if let Some(tile) = output.get_mut(target) {
                    tile.rotation = tile.rotation.turned();
                    trace.rotations.push(RotationEvent { source, target });
                }
            }
        }
        output
    }

    pub(crate) fn removal_stage(&self, input: &Grid, trace: &mut TransformTrace) -> Grid {
        let mut output = *input;
        for (source, muncher) in self.sources(input, Transformation::ConsumeLeft) {
            let Some(target) = rotated_neighbor(source, Direction::Left, muncher.rotation) else {
                continue;
            };
            if let Some(eaten) = input.get(target) {
                output.set(target, None);
                trace.removals.push(RemovalEvent { source, target, eaten: eaten.kind });
            }
        }
        output
    }

    pub(crate) fn copy_stage(&self, input: &Grid, trace: &mut TransformTrace) -> Grid {
        let mut output = *input;
        for (source, duality) in self.sources(input, Transformation::CopyRightOntoLeft) {
            let left = rotated_neighbor(source, Direction::Left, duality.rotation);
            let right = rotated_neighbor(source, Direction::Right, duality.rotation);
            let (Some(to), Some(from)) = (left, right) else { continue };
            let (Some(target), Some(original)) = (input.get(to), input.get(from)) else {
                continue;
            };
            let copy = original.with_rotation(target.rotation);
            output.set(to, Some(copy));
            trace.copies.push(CopyEvent { source, from, to, copied: original.kind });
        }
        output
    }
}

fn insert_hypothetical(raw: &Grid, hypothetical: Option<&Hypothetical>, trace: &mut TransformTrace) -> Grid {
    let mut grid = *raw;
    if let Some(h) = hypothetical {
        if grid.place(h.position, h.tile) {
            trace.inserted = Some(h.position);
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::STANDARD_CATALOG;

    fn pipeline() -> TransformPipeline<'static> {
        TransformPipeline::new(&STANDARD_CATALOG)
    }

    fn layout(text: &str) -> Grid {
        Grid::from_layout(text).unwrap()
    }

    fn rotation_at(grid: &Grid, r: usize, c: usize) -> u32 {
        grid.get(Position::new(r, c)).unwrap().rotation.degrees()
    }

    #[test]
    fn test_rubiks_turns_orthogonal_neighbors_only() {
        let grid = layout(
            "
            . . . . .
            . red blue . .
            . . rubiks . .
            . . . . .
            . . . . .
            ",
        );
        let board = pipeline().run(&grid, None);
        assert_eq!(rotation_at(&board.grid, 1, 2), 90);
        assert_eq!(rotation_at(&board.grid, 1, 1), 0);
        assert_eq!(board.trace.rotations.len(), 1);
    }

    #[test]
    fn test_two_rubiks_accumulate() {
        let grid = layout(
            "
            . . . . .
            . rubiks blue rubiks .
            . . . . .
            . . . . .
            . . . . .
            ",
        );
        let board = pipeline().run(&grid, None);
        assert_eq!(rotation_at(&board.grid, 1, 2), 180);
    }

    #[test]
    fn test_adjacent_rubiks_turn_each_other_once() {
        let grid = layout(
            "
            . . . . .
            . rubiks rubiks . .
            . . . . .
            . . . . .
            . . . . .
            ",
        );
        let board = pipeline().run(&grid, None);
        assert_eq!(rotation_at(&board.grid, 1, 1), 90);
        assert_eq!(rotation_at(&board.grid, 1, 2), 90);
    }

    #[test]
    fn test_rotation_wraps_at_full_turn() {
        let grid = layout(
            "
            . . . . .
            . . rubiks . .
            . rubiks red@180 rubiks .
            . . rubiks . .
            . . . . .
            ",
        );
        let board = pipeline().run(&grid, None);
        assert_eq!(rotation_at(&board.grid, 2, 2), 180);
    }

    #[test]
    fn test_munching_eats_left() {
        let grid = layout(
            "
            . . . . .
            . . . . .
            . red munching . .
            . . . . .
            . . . . .
            ",
        );
        let board = pipeline().run(&grid, None);
        assert!(!board.grid.is_occupied(Position::new(2, 1)));
        assert!(board.placed.is_occupied(Position::new(2, 1)));
        assert_eq!(board.trace.removals[0].eaten, TileKind::Red);
    }

    #[test]
    fn test_rotated_munching_eats_above() {
        let grid = layout(
            "
            . . . . .
            . . red . .
            . blue munching@90 . .
            . . . . .
            . . . . .
            ",
        );
        let board = pipeline().run(&grid, None);
        assert!(!board.grid.is_occupied(Position::new(1, 2)));
        assert!(board.grid.is_occupied(Position::new(2, 1)));
    }

    #[test]
    fn test_rubiks_redirects_munching_before_it_eats() {
        let grid = layout(
            "
            . . . . .
            . . red . .
            . blue munching rubiks .
            . . . . .
            . . . . .
            ",
        );
        // munching is turned to 90, so its left is now up
        let board = pipeline().run(&grid, None);
        assert!(!board.grid.is_occupied(Position::new(1, 2)));
        assert!(board.grid.is_occupied(Position::new(2, 1)));
    }

    #[test]
    fn test_munchers_eat_each_other() {
        let grid = layout(
            "
            . . . . .
            . munching munching . .
            . . . . .
            . . . . .
            . . . . .
            ",
        );
        let board = pipeline().run(&grid, None);
        // only the right muncher has a tile on its left
        assert!(!board.grid.is_occupied(Position::new(1, 1)));
        assert!(board.grid.is_occupied(Position::new(1, 2)));
        assert_eq!(board.trace.removals.len(), 1);
    }

    #[test]
    fn test_duality_copies_right_onto_left() {
        let grid = layout(
            "
            . . . . .
            . . . . .
            red@270 duality glass+shiny . .
            . . . . .
            . . . . .
            ",
        );
        let board = pipeline().run(&grid, None);
        let copied = board.grid.get(Position::new(2, 0)).unwrap();
        assert_eq!(copied.kind, TileKind::Glass);
        assert_eq!(copied.enchantment, Some(EnchantmentKind::Shiny));
        assert_eq!(copied.rotation.degrees(), 270);
        assert_eq!(board.trace.copies[0].copied, TileKind::Glass);
    }

    #[test]
    fn test_duality_needs_both_sides() {
        let grid = layout(
            "
            . . . . .
            . duality glass . .
            red duality . . .
            . . . . .
            . . . . .
            ",
        );
        let board = pipeline().run(&grid, None);
        assert!(board.trace.copies.is_empty());
        assert_eq!(board.grid, grid);
    }

    #[test]
    fn test_duality_copy_is_independent() {
        let grid = layout(
            "
            . . . . .
            . . . . .
            red duality blue . .
            . . . . .
            . . . . .
            ",
        );
        let mut board = pipeline().run(&grid, None);
        board.grid.get_mut(Position::new(2, 0)).unwrap().rotation = Rotation::from_quarter_turns(3);
        assert_eq!(rotation_at(&board.grid, 2, 2), 0);
        assert_eq!(board.grid.get(Position::new(2, 0)).unwrap().kind, TileKind::Blue);
    }

    #[test]
    fn test_munched_cell_is_not_copied_over() {
        let grid = layout(
            "
            . . . . .
            . . . . .
            red duality blue munching .
            . . . . .
            . . . . .
            ",
        );
        // munching eats blue first, so duality has nothing to copy
        let board = pipeline().run(&grid, None);
        assert!(!board.grid.is_occupied(Position::new(2, 2)));
        assert_eq!(board.grid.get(Position::new(2, 0)).unwrap().kind, TileKind::Red);
    }

    #[test]
    fn test_hypothetical_only_fills_empty_cells() {
        let grid = layout(
            "
            . . . . .
            . . . . .
            . . red . .
            . . . . .
            . . . . .
            ",
        );
        let over = Hypothetical::new(Position::new(2, 2), PlacedTile::new(TileKind::Black));
        let board = pipeline().run(&grid, Some(&over));
        assert_eq!(board.trace.inserted, None);
        assert_eq!(board.grid.get(Position::new(2, 2)).unwrap().kind, TileKind::Red);

        let beside = Hypothetical::new(Position::new(2, 3), PlacedTile::new(TileKind::Munching));
        let board = pipeline().run(&grid, Some(&beside));
        assert_eq!(board.trace.inserted, Some(Position::new(2, 3)));
        assert!(!board.grid.is_occupied(Position::new(2, 2)));
        // the caller's grid is untouched
        assert!(grid.is_occupied(Position::new(2, 2)));
        assert!(!grid.is_occupied(Position::new(2, 3)));
    }
}
