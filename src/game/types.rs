//! Core types for the tile grid: tile kinds, modifiers, rotation, positions
//! and the 5x5 board itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

pub const GRID_SIZE: usize = 5;

// --- Tile kinds and modifiers ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Blue,
    Red,
    Green,
    Yellow,
    Shy,
    Purple,
    Orange,
    Colorful,
    White,
    Munching,
    Glass,
    Black,
    Duality,
    Rubiks,
    Blocking,
}

impl TileKind {
    pub const ALL: [TileKind; 15] = [
        TileKind::Blue,
        TileKind::Red,
        TileKind::Green,
        TileKind::Yellow,
        TileKind::Shy,
        TileKind::Purple,
        TileKind::Orange,
        TileKind::Colorful,
        TileKind::White,
        TileKind::Munching,
        TileKind::Glass,
        TileKind::Black,
        TileKind::Duality,
        TileKind::Rubiks,
        TileKind::Blocking,
    ];

    pub fn id(self) -> &'static str {
        match self {
            TileKind::Blue => "blue",
            TileKind::Red => "red",
            TileKind::Green => "green",
            TileKind::Yellow => "yellow",
            TileKind::Shy => "shy",
            TileKind::Purple => "purple",
            TileKind::Orange => "orange",
            TileKind::Colorful => "colorful",
            TileKind::White => "white",
            TileKind::Munching => "munching",
            TileKind::Glass => "glass",
            TileKind::Black => "black",
            TileKind::Duality => "duality",
            TileKind::Rubiks => "rubiks",
            TileKind::Blocking => "blocking",
        }
    }

    /// Red, green and blue: the tiles boosted by the RGB sticker.
    pub fn is_primary_color(self) -> bool {
        matches!(self, TileKind::Red | TileKind::Green | TileKind::Blue)
    }
}

impl FromStr for TileKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        TileKind::ALL
            .into_iter()
            .find(|k| k.id() == s)
            .ok_or_else(|| EngineError::UnknownTile(s.to_string()))
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnchantmentKind {
    Creative,
    Productive,
    Explosive,
    Shiny,
}

impl EnchantmentKind {
    pub const ALL: [EnchantmentKind; 4] = [
        EnchantmentKind::Creative,
        EnchantmentKind::Productive,
        EnchantmentKind::Explosive,
        EnchantmentKind::Shiny,
    ];

    pub fn id(self) -> &'static str {
        match self {
            EnchantmentKind::Creative => "creative",
            EnchantmentKind::Productive => "productive",
            EnchantmentKind::Explosive => "explosive",
            EnchantmentKind::Shiny => "shiny",
        }
    }
}

impl FromStr for EnchantmentKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        EnchantmentKind::ALL
            .into_iter()
            .find(|k| k.id() == s)
            .ok_or_else(|| EngineError::UnknownEnchantment(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StickerKind {
    MrHappy,
    Rgb,
    Hourglass,
    NeedAHand,
}

impl StickerKind {
    pub const ALL: [StickerKind; 4] = [
        StickerKind::MrHappy,
        StickerKind::Rgb,
        StickerKind::Hourglass,
        StickerKind::NeedAHand,
    ];

    pub fn id(self) -> &'static str {
        match self {
            StickerKind::MrHappy => "mr_happy",
            StickerKind::Rgb => "rgb",
            StickerKind::Hourglass => "hourglass",
            StickerKind::NeedAHand => "need_a_hand",
        }
    }
}

impl FromStr for StickerKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        StickerKind::ALL
            .into_iter()
            .find(|k| k.id() == s)
            .ok_or_else(|| EngineError::UnknownSticker(s.to_string()))
    }
}

// --- Directions and rotation ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

/// Clockwise order used for rotation.
pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

impl Direction {
    fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    /// (row delta, column delta). Row 0 is the top of the grid.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// Rotate clockwise by the given rotation.
    pub fn rotated(self, rotation: Rotation) -> Direction {
        DIRECTIONS[(self.index() + rotation.quarter_turns() as usize) % 4]
    }
}

/// Tile rotation, stored as clockwise quarter turns so it always stays
/// within 0..360 no matter how many Rubik's tiles touch a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Rotation(u8);

impl Rotation {
    pub const ZERO: Rotation = Rotation(0);

    pub fn from_degrees(degrees: u32) -> Result<Self> {
        if degrees % 90 != 0 {
            return Err(EngineError::BadRotation(degrees));
        }
        Ok(Rotation(((degrees / 90) % 4) as u8))
    }

    pub fn from_quarter_turns(turns: u32) -> Self {
        Rotation((turns % 4) as u8)
    }

    pub fn quarter_turns(self) -> u8 {
        self.0
    }

    pub fn degrees(self) -> u32 {
        self.0 as u32 * 90
    }

    /// One more clockwise quarter turn, wrapping at 360.
    pub fn turned(self) -> Self {
        Rotation((self.0 + 1) % 4)
    }
}

impl TryFrom<u32> for Rotation {
    type Error = EngineError;

    fn try_from(degrees: u32) -> Result<Self> {
        Rotation::from_degrees(degrees)
    }
}

impl From<Rotation> for u32 {
    fn from(rotation: Rotation) -> u32 {
        rotation.degrees()
    }
}

// --- Position ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        debug_assert!(row < GRID_SIZE && col < GRID_SIZE, "position ({row},{col}) off the grid");
        Self { row, col }
    }

    /// Position shifted by a delta, or `None` when it leaves the grid.
    pub fn offset(self, dr: i32, dc: i32) -> Option<Self> {
        let row = self.row as i32 + dr;
        let col = self.col as i32 + dc;
        if (0..GRID_SIZE as i32).contains(&row) && (0..GRID_SIZE as i32).contains(&col) {
            Some(Self { row: row as usize, col: col as usize })
        } else {
            None
        }
    }

    pub fn step(self, direction: Direction) -> Option<Self> {
        let (dr, dc) = direction.delta();
        self.offset(dr, dc)
    }

    /// "r-c" key, the format used for scored-cell sets.
    pub fn to_key(self) -> String {
        format!("{}-{}", self.row, self.col)
    }

    /// All 25 grid positions in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..GRID_SIZE).flat_map(|row| (0..GRID_SIZE).map(move |col| Position { row, col }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

/// Accepts "r-c" and "r,c".
impl FromStr for Position {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let bad = || EngineError::BadPosition(s.to_string());
        let (row, col) = s.split_once(|c| c == '-' || c == ',').ok_or_else(bad)?;
        let row: usize = row.trim().parse().map_err(|_| bad())?;
        let col: usize = col.trim().parse().map_err(|_| bad())?;
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return Err(bad());
        }
        Ok(Self { row, col })
    }
}

impl Serialize for Position {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_key())
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}

// --- Placed tiles and the grid ---

/// A tile sitting on the grid. `Copy`, so every copy between cells is an
/// independent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedTile {
    #[serde(rename = "tile")]
    pub kind: TileKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enchantment: Option<EnchantmentKind>,
    #[serde(default)]
    pub rotation: Rotation,
}

impl PlacedTile {
    pub fn new(kind: TileKind) -> Self {
        Self { kind, enchantment: None, rotation: Rotation::ZERO }
    }

    pub fn with_rotation(self, rotation: Rotation) -> Self {
        Self { rotation, ..self }
    }

    pub fn with_enchantment(self, enchantment: EnchantmentKind) -> Self {
        Self { enchantment: Some(enchantment), ..self }
    }
}

/// Compact token form: `kind[@degrees][+enchantment]`, e.g. `blue@90+shiny`.
impl FromStr for PlacedTile {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let (rest, enchantment) = match s.split_once('+') {
            Some((rest, ench)) => (rest, Some(ench.parse::<EnchantmentKind>()?)),
            None => (s, None),
        };
        let (kind, rotation) = match rest.split_once('@') {
            Some((kind, degrees)) => {
                let degrees: u32 = degrees
                    .parse()
                    .map_err(|_| EngineError::UnknownTile(s.to_string()))?;
                (kind, Rotation::from_degrees(degrees)?)
            }
            None => (rest, Rotation::ZERO),
        };
        Ok(Self { kind: kind.parse()?, enchantment, rotation })
    }
}

impl fmt::Display for PlacedTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.id())?;
        if self.rotation != Rotation::ZERO {
            write!(f, "@{}", self.rotation.degrees())?;
        }
        if let Some(ench) = self.enchantment {
            write!(f, "+{}", ench.id())?;
        }
        Ok(())
    }
}

/// The 5x5 board. Plain value type: cloning yields a fully independent board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Grid {
    cells: [[Option<PlacedTile>; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pos: Position) -> Option<&PlacedTile> {
        self.cells[pos.row][pos.col].as_ref()
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut PlacedTile> {
        self.cells[pos.row][pos.col].as_mut()
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.cells[pos.row][pos.col].is_some()
    }

    pub fn set(&mut self, pos: Position, cell: Option<PlacedTile>) {
        self.cells[pos.row][pos.col] = cell;
    }

    /// Put a tile on an empty cell. Returns false when the cell is taken.
    pub fn place(&mut self, pos: Position, tile: PlacedTile) -> bool {
        if self.is_occupied(pos) {
            return false;
        }
        self.set(pos, Some(tile));
        true
    }

    /// Occupied cells in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (Position, &PlacedTile)> + '_ {
        Position::all().filter_map(move |pos| self.get(pos).map(|tile| (pos, tile)))
    }

    pub fn empty_positions(&self) -> Vec<Position> {
        Position::all().filter(|&pos| !self.is_occupied(pos)).collect()
    }

    pub fn count(&self) -> usize {
        self.occupied().count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn is_full(&self) -> bool {
        self.count() == GRID_SIZE * GRID_SIZE
    }

    pub fn from_rows(rows: Vec<Vec<Option<PlacedTile>>>) -> Result<Self> {
        if rows.len() != GRID_SIZE || rows.iter().any(|r| r.len() != GRID_SIZE) {
            return Err(EngineError::BoardShape {
                rows: rows.len(),
                cols: rows.iter().map(Vec::len).collect(),
            });
        }
        let mut grid = Grid::new();
        for (row, cells) in rows.into_iter().enumerate() {
            for (col, cell) in cells.into_iter().enumerate() {
                grid.cells[row][col] = cell;
            }
        }
        Ok(grid)
    }

    pub fn rows(&self) -> Vec<Vec<Option<PlacedTile>>> {
        self.cells.iter().map(|row| row.to_vec()).collect()
    }

    /// Parse the whitespace layout form: five lines of five tokens, `.` for
    /// an empty cell, otherwise a [`PlacedTile`] token. Blank lines and lines
    /// starting with `#` are ignored.
    pub fn from_layout(text: &str) -> Result<Self> {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| {
                line.split_whitespace()
                    .map(|token| match token {
                        "." => Ok(None),
                        token => token.parse::<PlacedTile>().map(Some),
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Grid::from_rows(rows)
    }

    /// Parse either JSON (an array of five rows) or the layout form.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim_start().starts_with('[') {
            Ok(serde_json::from_str(text)?)
        } else {
            Grid::from_layout(text)
        }
    }

    pub fn to_layout(&self) -> String {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Some(tile) => tile.to_string(),
                        None => ".".to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Serialize for Grid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.rows().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let rows = Vec::<Vec<Option<PlacedTile>>>::deserialize(deserializer)?;
        Grid::from_rows(rows).map_err(serde::de::Error::custom)
    }
}
