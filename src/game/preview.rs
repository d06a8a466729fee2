//! Hover preview: interaction lines for the hovered cell, markers for every
//! cell a transformation or shy rule is about to touch, and a forecast of the
//! score. Runs on copies only; the caller's grid is never modified.

use std::collections::BTreeMap;

use super::resolver::InteractionResolver;
use super::scoring::{shy_payouts, ScoringEngine};
use super::transform::Hypothetical;
use super::types::*;
use crate::engine::models::{Forecast, InteractionEdge, Marker, Preview};

impl<'c> ScoringEngine<'c> {
    /// Preview the board with `held` hovered over `hovered`.
    ///
    /// With no held tile the hovered cell's own tile is used for edges. A held
    /// tile over an occupied cell is not inserted.
    pub fn preview(
        &self,
        grid: &Grid,
        hovered: Option<Position>,
        held: Option<PlacedTile>,
        stickers: &[StickerKind],
        hand_number: u32,
    ) -> Preview {
        let hypothetical = hovered.zip(held).map(|(position, tile)| Hypothetical::new(position, tile));
        let board = self.effective_grid(grid, hypothetical.as_ref());
        let evaluation = self.evaluate(&board, stickers, hand_number);

        let edges = match hovered {
            Some(from) => InteractionResolver::new(self.catalog())
                .resolve_cell(from, &board.grid)
                .into_iter()
                .map(|to| InteractionEdge { from, to })
                .collect(),
            None => Vec::new(),
        };

        let mut markers: BTreeMap<Position, Vec<Marker>> = BTreeMap::new();

        let mut turns: BTreeMap<Position, u32> = BTreeMap::new();
        for event in &board.trace.rotations {
            *turns.entry(event.target).or_default() += 1;
        }
        for (pos, quarter_turns) in turns {
            markers.entry(pos).or_default().push(Marker::Rotated { quarter_turns });
        }
        for event in &board.trace.removals {
            markers.entry(event.target).or_default().push(Marker::Eaten { by: event.source });
        }
        for event in &board.trace.copies {
            markers.entry(event.to).or_default().push(Marker::Duplicated {
                by: event.source,
                copy_of: event.copied,
            });
        }
        // doubling scores off the effective board, the payout follows the placed tile
        for (pos, tile) in board.grid.occupied() {
            if tile.kind == TileKind::Shy && evaluation.incoming[pos.row][pos.col] == 1 {
                markers.entry(pos).or_default().push(Marker::ShyDoubling);
            }
        }
        for pos in shy_payouts(&board, &evaluation.incoming) {
            markers.entry(pos).or_default().push(Marker::ShyPayout);
        }

        tracing::trace!(edges = edges.len(), marked = markers.len(), "preview computed");

        Preview {
            edges,
            markers,
            forecast: Forecast::from(&evaluation.result),
            effective_grid: board.grid,
            trace: board.trace,
        }
    }
}
