//! Grid geometry: neighbor offsets and ray casting. Everything that would
//! leave the 5x5 grid simply stops; nothing wraps.

use super::types::*;

/// Up, down, left, right.
pub const ORTHOGONAL_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

pub const DIAGONAL_OFFSETS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// All eight surrounding cells, row by row.
#[rustfmt::skip]
pub const SURROUNDING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// Occupied cells from `from` (exclusive) to the edge along `(dr, dc)`.
/// Rays pass through occupied cells.
pub fn ray(grid: &Grid, from: Position, (dr, dc): (i32, i32)) -> Vec<Position> {
    let mut hits = Vec::new();
    let mut current = from.offset(dr, dc);
    while let Some(pos) = current {
        if grid.is_occupied(pos) {
            hits.push(pos);
        }
        current = pos.offset(dr, dc);
    }
    hits
}

/// First occupied cell from `from` (exclusive) along `(dr, dc)`.
pub fn first_occupied(grid: &Grid, from: Position, (dr, dc): (i32, i32)) -> Option<Position> {
    let mut current = from.offset(dr, dc);
    while let Some(pos) = current {
        if grid.is_occupied(pos) {
            return Some(pos);
        }
        current = pos.offset(dr, dc);
    }
    None
}

/// Occupied cells at the given offsets from `pos`, in offset order.
pub fn occupied_neighbors(grid: &Grid, pos: Position, offsets: &[(i32, i32)]) -> Vec<Position> {
    offsets
        .iter()
        .filter_map(|&(dr, dc)| pos.offset(dr, dc))
        .filter(|&n| grid.is_occupied(n))
        .collect()
}

/// True when none of the eight surrounding cells is occupied.
pub fn is_isolated(grid: &Grid, pos: Position) -> bool {
    occupied_neighbors(grid, pos, &SURROUNDING_OFFSETS).is_empty()
}

/// The cell one step from `pos` in `base` turned by `rotation`.
pub fn rotated_neighbor(pos: Position, base: Direction, rotation: Rotation) -> Option<Position> {
    pos.step(base.rotated(rotation))
}
