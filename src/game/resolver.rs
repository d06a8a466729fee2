//! Interaction resolver: which cells a tile interacts with.

use super::board::*;
use super::catalog::{Geometry, TileCatalog};
use super::types::*;

pub struct InteractionResolver<'c> {
    catalog: &'c TileCatalog,
}

impl<'c> InteractionResolver<'c> {
    pub fn new(catalog: &'c TileCatalog) -> Self {
        Self { catalog }
    }

    /// Targets of a `kind` tile standing at `pos`. The rotation is read from
    /// the grid cell at `pos`; an empty cell interacts with nothing.
    pub fn resolve(&self, kind: TileKind, pos: Position, grid: &Grid) -> Vec<Position> {
        let Some(cell) = grid.get(pos) else {
            return Vec::new();
        };
        resolve_geometry(self.catalog.geometry(kind), cell.rotation, pos, grid)
    }

    /// Targets of whatever tile occupies `pos`.
    pub fn resolve_cell(&self, pos: Position, grid: &Grid) -> Vec<Position> {
        match grid.get(pos) {
            Some(cell) => self.resolve(cell.kind, pos, grid),
            None => Vec::new(),
        }
    }
}

/// Apply one geometric rule. Results are always occupied, on-grid cells
/// other than `pos`, in discovery order.
pub fn resolve_geometry(geometry: Geometry, rotation: Rotation, pos: Position, grid: &Grid) -> Vec<Position> {
    match geometry {
        Geometry::Ray(base) => ray(grid, pos, base.rotated(rotation).delta()),
        Geometry::CardinalRays => [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
            .into_iter()
            .flat_map(|dir| ray(grid, pos, dir.delta()))
            .collect(),
        Geometry::DiagonalRays => DIAGONAL_OFFSETS
            .into_iter()
            .flat_map(|offset| ray(grid, pos, offset))
            .collect(),
        Geometry::Surrounding => occupied_neighbors(grid, pos, &SURROUNDING_OFFSETS),
        Geometry::RowAndColumn => {
            let mut hits = Vec::new();
            for i in 0..GRID_SIZE {
                let in_row = Position::new(pos.row, i);
                if i != pos.col && grid.is_occupied(in_row) {
                    hits.push(in_row);
                }
                let in_col = Position::new(i, pos.col);
                if i != pos.row && grid.is_occupied(in_col) {
                    hits.push(in_col);
                }
            }
            hits
        }
        Geometry::FlankingColumns => {
            let up = Direction::Up.rotated(rotation).delta();
            [Direction::Left, Direction::Right]
                .into_iter()
                .filter_map(|side| first_occupied(grid, pos, side.rotated(rotation).delta()))
                .flat_map(|flank| ray(grid, flank, up))
                .collect()
        }
        Geometry::Inert => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::STANDARD_CATALOG;

    fn resolver() -> InteractionResolver<'static> {
        InteractionResolver::new(&STANDARD_CATALOG)
    }

    fn layout(text: &str) -> Grid {
        Grid::from_layout(text).unwrap()
    }

    #[test]
    fn test_blue_looks_up() {
        let grid = layout(
            "
            . . . . .
            . . red . .
            . . . . .
            . . . . .
            . . blue . .
            ",
        );
        assert_eq!(resolver().resolve_cell(Position::new(4, 2), &grid), vec![Position::new(1, 2)]);
    }

    #[test]
    fn test_rotated_blue_looks_right() {
        let grid = layout(
            "
            . . . . .
            . . . . .
            blue@90 . red . yellow
            . . . . .
            . . . . .
            ",
        );
        assert_eq!(
            resolver().resolve_cell(Position::new(2, 0), &grid),
            vec![Position::new(2, 2), Position::new(2, 4)]
        );
    }

    #[test]
    fn test_black_casts_four_rays() {
        let grid = layout(
            "
            . . red . .
            . . . . .
            green . black . yellow
            . . . . .
            . . blue . .
            ",
        );
        assert_eq!(
            resolver().resolve_cell(Position::new(2, 2), &grid),
            vec![Position::new(0, 2), Position::new(4, 2), Position::new(2, 0), Position::new(2, 4)]
        );
    }

    #[test]
    fn test_glass_casts_diagonals() {
        let grid = layout(
            "
            red . . . .
            . . . . .
            . . glass . .
            . . . blue .
            . . . . green
            ",
        );
        assert_eq!(
            resolver().resolve_cell(Position::new(2, 2), &grid),
            vec![Position::new(0, 0), Position::new(3, 3), Position::new(4, 4)]
        );
    }

    #[test]
    fn test_colorful_and_rubiks_see_surrounding() {
        let grid = layout(
            "
            . . . . .
            . red blue . .
            . green colorful rubiks .
            . . . yellow .
            . . . . .
            ",
        );
        assert_eq!(resolver().resolve_cell(Position::new(2, 2), &grid).len(), 5);
        assert_eq!(
            resolver().resolve_cell(Position::new(2, 3), &grid),
            vec![Position::new(1, 2), Position::new(2, 2), Position::new(3, 3)]
        );
    }

    #[test]
    fn test_orange_scans_row_and_column() {
        let grid = layout(
            "
            . orange . . blue
            . . . . .
            . red . . .
            . . . . .
            . green . . .
            ",
        );
        assert_eq!(
            resolver().resolve_cell(Position::new(0, 1), &grid),
            vec![Position::new(2, 1), Position::new(0, 4), Position::new(4, 1)]
        );
    }

    #[test]
    fn test_white_scans_above_flanks() {
        let grid = layout(
            "
            red . . . blue
            . . . . .
            . . . . green
            yellow . white . purple
            . . . . .
            ",
        );
        // left flank (3,0) has red above it, right flank (3,4) has green and blue
        assert_eq!(
            resolver().resolve_cell(Position::new(3, 2), &grid),
            vec![Position::new(0, 0), Position::new(2, 4), Position::new(0, 4)]
        );
    }

    #[test]
    fn test_white_without_flanks() {
        let grid = layout(
            "
            . . red . .
            . . . . .
            . . white . .
            . . . . .
            . . . . .
            ",
        );
        assert!(resolver().resolve_cell(Position::new(2, 2), &grid).is_empty());
    }

    #[test]
    fn test_inert_tiles() {
        let grid = layout(
            "
            red red red . .
            red munching red . .
            red duality red shy .
            red blocking red purple .
            . . . . .
            ",
        );
        for pos in [(1, 1), (2, 1), (2, 3), (3, 1), (3, 3)] {
            assert!(resolver().resolve_cell(Position::new(pos.0, pos.1), &grid).is_empty());
        }
    }

    #[test]
    fn test_empty_cell_has_no_targets() {
        let grid = layout(
            "
            . . red . .
            . . . . .
            . . . . .
            . . . . .
            . . . . .
            ",
        );
        assert!(resolver().resolve(TileKind::Blue, Position::new(4, 2), &grid).is_empty());
    }

    #[test]
    fn test_targets_stay_on_grid_from_every_cell() {
        let mut full = Grid::new();
        for pos in Position::all() {
            full.place(pos, PlacedTile::new(TileKind::Blue));
        }
        for kind in TileKind::ALL {
            for pos in Position::all() {
                for turns in 0..4 {
                    let mut grid = full;
                    grid.set(pos, Some(PlacedTile::new(kind).with_rotation(Rotation::from_quarter_turns(turns))));
                    for target in resolver().resolve_cell(pos, &grid) {
                        assert!(target.row < GRID_SIZE && target.col < GRID_SIZE);
                        assert_ne!(target, pos);
                    }
                }
            }
        }
    }
}
