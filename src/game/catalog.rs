//! Tile, enchantment and sticker catalog: display metadata plus the
//! interaction geometry and board transformation role of every tile kind.
//!
//! The catalog is immutable once built and is handed to the resolver and the
//! scoring engine by reference. [`STANDARD_CATALOG`] is the stock instance.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use super::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

/// How a tile finds its interaction targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Geometry {
    /// Every occupied cell from the tile to the edge in one base direction,
    /// turned by the tile's rotation.
    Ray(Direction),
    /// Unrotated rays up, down, left and right.
    CardinalRays,
    /// Rays along all four diagonals.
    DiagonalRays,
    /// The eight surrounding cells.
    Surrounding,
    /// Every other occupied cell in the same row or column.
    RowAndColumn,
    /// Nearest occupied cell to the (rotated) left and right, then everything
    /// (rotated) above each of them.
    FlankingColumns,
    /// No direct interactions.
    Inert,
}

/// Effect a tile has on the board before interactions are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Transformation {
    /// Turn every orthogonal neighbor a quarter turn clockwise.
    RotateNeighbors,
    /// Remove the tile on the (rotated) left.
    ConsumeLeft,
    /// Turn the (rotated) left tile into a copy of the (rotated) right tile.
    CopyRightOntoLeft,
}

#[derive(Debug, Clone, Serialize)]
pub struct TileDefinition {
    pub kind: TileKind,
    pub name: &'static str,
    pub rarity: Rarity,
    pub price: u32,
    pub tooltip: &'static str,
    pub geometry: Geometry,
    pub transformation: Option<Transformation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnchantmentDefinition {
    pub kind: EnchantmentKind,
    pub name: &'static str,
    pub rarity: Rarity,
    pub base_fee: u32,
    pub tooltip: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct StickerDefinition {
    pub kind: StickerKind,
    pub name: &'static str,
    pub rarity: Rarity,
    pub price: u32,
    pub tooltip: &'static str,
}

fn tile(
    kind: TileKind,
    name: &'static str,
    rarity: Rarity,
    price: u32,
    tooltip: &'static str,
    geometry: Geometry,
) -> TileDefinition {
    TileDefinition { kind, name, rarity, price, tooltip, geometry, transformation: None }
}

fn transforming(def: TileDefinition, transformation: Transformation) -> TileDefinition {
    TileDefinition { transformation: Some(transformation), ..def }
}

fn tile_definition(kind: TileKind) -> TileDefinition {
    use Geometry::*;
    use Rarity::*;

    match kind {
        TileKind::Blue => tile(
            kind,
            "Blue Tile",
            Common,
            2,
            "Interacts with all tiles above it.",
            Ray(Direction::Up),
        ),
        TileKind::Red => tile(
            kind,
            "Red Tile",
            Common,
            2,
            "Interacts with all tiles below it.",
            Ray(Direction::Down),
        ),
        TileKind::Green => tile(
            kind,
            "Green Tile",
            Common,
            2,
            "Interacts with all tiles to its left.",
            Ray(Direction::Left),
        ),
        TileKind::Yellow => tile(
            kind,
            "Yellow Tile",
            Common,
            2,
            "Interacts with all tiles to its right.",
            Ray(Direction::Right),
        ),
        TileKind::Shy => tile(
            kind,
            "Shy Tile",
            Uncommon,
            5,
            "Scores nothing. x2 Multiplier when interacted with exactly once; $5 when left alone.",
            Inert,
        ),
        TileKind::Purple => tile(
            kind,
            "Purple Tile",
            Uncommon,
            6,
            "Adds +1 to Multiplier when interacted with.",
            Inert,
        ),
        TileKind::Orange => tile(
            kind,
            "Orange Tile",
            Legendary,
            10,
            "Interacts with its row and column. +20 score for each distinct tile kind sharing them.",
            RowAndColumn,
        ),
        TileKind::Colorful => tile(
            kind,
            "Colorful Tile",
            Uncommon,
            5,
            "Interacts with all 8 tiles immediately surrounding it.",
            Surrounding,
        ),
        TileKind::White => tile(
            kind,
            "White Tile",
            Rare,
            6,
            "Interacts above its nearest left and right neighbors. If placed with no adjacent tiles, adds 2 Black Tiles or 2 Duality Tiles to your deck.",
            FlankingColumns,
        ),
        TileKind::Munching => transforming(
            tile(
                kind,
                "Munching Tile",
                Uncommon,
                4,
                "Eats the tile to its left for +6 Multiplier.",
                Inert,
            ),
            Transformation::ConsumeLeft,
        ),
        TileKind::Glass => tile(
            kind,
            "Glass Tile",
            Uncommon,
            4,
            "Interacts diagonally. Shatters (leaves your deck) after it scores.",
            DiagonalRays,
        ),
        TileKind::Black => tile(
            kind,
            "Black Tile",
            Rare,
            6,
            "Interacts in all 4 cardinal directions. If not interacted with: x3 Multiplier. Otherwise: +10 Multiplier.",
            CardinalRays,
        ),
        TileKind::Duality => transforming(
            tile(
                kind,
                "Duality Tile",
                Rare,
                6,
                "Transforms the tile on its left into a copy of the tile on its right.",
                Inert,
            ),
            Transformation::CopyRightOntoLeft,
        ),
        TileKind::Rubiks => transforming(
            tile(
                kind,
                "Rubik's Tile",
                Legendary,
                10,
                "Rotates its neighbors. Interacts with all 8 surrounding tiles and adds a Colorful Tile to your deck for each.",
                Surrounding,
            ),
            Transformation::RotateNeighbors,
        ),
        TileKind::Blocking => tile(
            kind,
            "Blocking Tile",
            Legendary,
            10,
            "Scores nothing, but adds +15 to the multiplier.",
            Inert,
        ),
    }
}

fn enchantment_definition(kind: EnchantmentKind) -> EnchantmentDefinition {
    let (name, rarity, base_fee, tooltip) = match kind {
        EnchantmentKind::Creative => ("Creative", Rarity::Uncommon, 8, "+100 score if on board."),
        EnchantmentKind::Productive => {
            ("Productive", Rarity::Uncommon, 8, "+15 multiplier if on board.")
        }
        EnchantmentKind::Explosive => {
            ("Explosive", Rarity::Rare, 12, "15% chance to be destroyed for +200 score.")
        }
        EnchantmentKind::Shiny => ("Shiny", Rarity::Common, 3, "+$2 when scored."),
    };
    EnchantmentDefinition { kind, name, rarity, base_fee, tooltip }
}

fn sticker_definition(kind: StickerKind) -> StickerDefinition {
    let (name, rarity, price, tooltip) = match kind {
        StickerKind::MrHappy => {
            ("Mr. Happy", Rarity::Common, 5, "+15 score for every interaction.")
        }
        StickerKind::Rgb => {
            ("RGB", Rarity::Common, 5, "Red, Green, Blue tiles grant +5 score per interaction.")
        }
        StickerKind::Hourglass => {
            ("Hourglass", Rarity::Uncommon, 8, "+4 multiplier per hand number.")
        }
        StickerKind::NeedAHand => {
            ("Need a Hand?", Rarity::Uncommon, 8, "+1 maximum hands per level.")
        }
    };
    StickerDefinition { kind, name, rarity, price, tooltip }
}

/// Lookup tables for every tile, enchantment and sticker.
#[derive(Debug, Clone)]
pub struct TileCatalog {
    tiles: HashMap<TileKind, TileDefinition>,
    enchantments: HashMap<EnchantmentKind, EnchantmentDefinition>,
    stickers: HashMap<StickerKind, StickerDefinition>,
}

pub static STANDARD_CATALOG: Lazy<TileCatalog> = Lazy::new(TileCatalog::standard);

impl TileCatalog {
    pub fn standard() -> Self {
        Self {
            tiles: TileKind::ALL.into_iter().map(|k| (k, tile_definition(k))).collect(),
            enchantments: EnchantmentKind::ALL
                .into_iter()
                .map(|k| (k, enchantment_definition(k)))
                .collect(),
            stickers: StickerKind::ALL.into_iter().map(|k| (k, sticker_definition(k))).collect(),
        }
    }

    /// Copy of this catalog without the given tile kind.
    pub fn without_tile(&self, kind: TileKind) -> Self {
        let mut catalog = self.clone();
        catalog.tiles.remove(&kind);
        catalog
    }

    pub fn tile(&self, kind: TileKind) -> Option<&TileDefinition> {
        self.tiles.get(&kind)
    }

    pub fn enchantment(&self, kind: EnchantmentKind) -> Option<&EnchantmentDefinition> {
        self.enchantments.get(&kind)
    }

    pub fn sticker(&self, kind: StickerKind) -> Option<&StickerDefinition> {
        self.stickers.get(&kind)
    }

    /// Tile definitions in canonical kind order.
    pub fn tiles(&self) -> Vec<&TileDefinition> {
        let mut defs: Vec<_> = self.tiles.values().collect();
        defs.sort_by_key(|d| d.kind);
        defs
    }

    pub fn enchantments(&self) -> Vec<&EnchantmentDefinition> {
        let mut defs: Vec<_> = self.enchantments.values().collect();
        defs.sort_by_key(|d| d.kind);
        defs
    }

    pub fn stickers(&self) -> Vec<&StickerDefinition> {
        let mut defs: Vec<_> = self.stickers.values().collect();
        defs.sort_by_key(|d| d.kind);
        defs
    }

    /// Interaction geometry for a tile kind. A kind missing from the catalog
    /// is a bug: debug builds panic, release builds treat the tile as inert.
    pub fn geometry(&self, kind: TileKind) -> Geometry {
        match self.lookup(kind) {
            Some(def) => def.geometry,
            None => Geometry::Inert,
        }
    }

    pub fn transformation(&self, kind: TileKind) -> Option<Transformation> {
        self.lookup(kind).and_then(|def| def.transformation)
    }

    fn lookup(&self, kind: TileKind) -> Option<&TileDefinition> {
        let def = self.tiles.get(&kind);
        debug_assert!(def.is_some(), "tile kind {kind} missing from catalog");
        if def.is_none() {
            tracing::warn!(tile = kind.id(), "tile kind missing from catalog, treating as inert");
        }
        def
    }
}

impl Default for TileCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
