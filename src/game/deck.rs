//! The run deck: the tiles a player owns between levels.

use serde::{Deserialize, Serialize};

use super::types::{EnchantmentKind, TileKind};
use crate::engine::models::DeferredEffect;

pub const STARTER_COPIES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeckTile {
    pub kind: TileKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enchantment: Option<EnchantmentKind>,
}

impl DeckTile {
    pub fn new(kind: TileKind) -> Self {
        Self { kind, enchantment: None }
    }

    pub fn enchanted(kind: TileKind, enchantment: EnchantmentKind) -> Self {
        Self { kind, enchantment: Some(enchantment) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    tiles: Vec<DeckTile>,
    limit: usize,
}

impl Deck {
    pub fn new(limit: usize) -> Self {
        Self { tiles: Vec::new(), limit }
    }

    /// Six each of blue, red, green and yellow.
    pub fn starter(limit: usize) -> Self {
        let mut deck = Self::new(limit);
        for kind in [TileKind::Blue, TileKind::Red, TileKind::Green, TileKind::Yellow] {
            deck.tiles.extend(std::iter::repeat(DeckTile::new(kind)).take(STARTER_COPIES));
        }
        deck
    }

    pub fn tiles(&self) -> &[DeckTile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|t| t.kind == kind).count()
    }

    /// Add a single tile. Refused once the deck is full.
    pub fn push(&mut self, tile: DeckTile) -> bool {
        if self.tiles.len() >= self.limit {
            return false;
        }
        self.tiles.push(tile);
        true
    }

    /// Add `count` plain copies of `kind`, stopping at the limit. Returns
    /// false if any copy was refused.
    pub fn add(&mut self, kind: TileKind, count: u32) -> bool {
        (0..count).fold(true, |ok, _| self.push(DeckTile::new(kind)) && ok)
    }

    /// Remove one copy of `kind`. Prefers a copy with exactly `enchantment`,
    /// then an unenchanted copy, then any copy.
    pub fn remove(&mut self, kind: TileKind, enchantment: Option<EnchantmentKind>) -> bool {
        let index = self
            .position(|t| t.kind == kind && t.enchantment == enchantment)
            .or_else(|| self.position(|t| t.kind == kind && t.enchantment.is_none()))
            .or_else(|| self.position(|t| t.kind == kind));
        match index {
            Some(i) => {
                self.tiles.remove(i);
                true
            }
            None => false,
        }
    }

    /// Remove one copy of `kind` with exactly `enchantment`. No fallback.
    pub fn remove_exact(&mut self, kind: TileKind, enchantment: EnchantmentKind) -> bool {
        match self.position(|t| t.kind == kind && t.enchantment == Some(enchantment)) {
            Some(i) => {
                self.tiles.remove(i);
                true
            }
            None => false,
        }
    }

    fn position(&self, pred: impl Fn(&DeckTile) -> bool) -> Option<usize> {
        self.tiles.iter().position(pred)
    }

    /// Apply deferred effects in order.
    pub fn apply(&mut self, effects: &[DeferredEffect], money: &mut i64) {
        for effect in effects {
            match *effect {
                DeferredEffect::GainMoney { amount } => *money = money.saturating_add(amount),
                DeferredEffect::RemoveTileFromDeck { tile, enchantment } => {
                    if !self.remove(tile, enchantment) {
                        tracing::debug!(tile = tile.id(), "tile to remove not in deck");
                    }
                }
                DeferredEffect::DestroyTile { tile, enchantment } => {
                    if !self.remove_exact(tile, enchantment) {
                        tracing::debug!(tile = tile.id(), enchantment = enchantment.id(), "tile already gone");
                    }
                }
                DeferredEffect::AddTilesToDeck { tile, count } => {
                    if !self.add(tile, count) {
                        tracing::debug!(tile = tile.id(), count, limit = self.limit, "deck full, tiles refused");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_deck() {
        let deck = Deck::starter(40);
        assert_eq!(deck.len(), 24);
        assert_eq!(deck.count(TileKind::Blue), 6);
        assert_eq!(deck.count(TileKind::Yellow), 6);
        assert_eq!(deck.count(TileKind::Black), 0);
    }

    #[test]
    fn test_add_respects_limit() {
        let mut deck = Deck::starter(26);
        assert!(!deck.add(TileKind::Colorful, 3));
        assert_eq!(deck.len(), 26);
        assert_eq!(deck.count(TileKind::Colorful), 2);
        assert!(!deck.push(DeckTile::new(TileKind::Red)));
    }

    #[test]
    fn test_remove_preference() {
        let mut deck = Deck::new(40);
        deck.push(DeckTile::enchanted(TileKind::Blue, EnchantmentKind::Shiny));
        deck.push(DeckTile::new(TileKind::Blue));
        deck.push(DeckTile::enchanted(TileKind::Blue, EnchantmentKind::Explosive));

        assert!(deck.remove(TileKind::Blue, Some(EnchantmentKind::Explosive)));
        assert_eq!(
            deck.tiles(),
            &[DeckTile::enchanted(TileKind::Blue, EnchantmentKind::Shiny), DeckTile::new(TileKind::Blue)]
        );

        assert!(deck.remove(TileKind::Blue, Some(EnchantmentKind::Creative)));
        assert_eq!(deck.tiles(), &[DeckTile::enchanted(TileKind::Blue, EnchantmentKind::Shiny)]);

        assert!(deck.remove(TileKind::Blue, None));
        assert!(deck.is_empty());
        assert!(!deck.remove(TileKind::Blue, None));
    }

    #[test]
    fn test_apply_effects() {
        let mut deck = Deck::starter(40);
        deck.push(DeckTile::new(TileKind::Glass));
        let mut money = 3;
        deck.apply(
            &[
                DeferredEffect::GainMoney { amount: 5 },
                DeferredEffect::RemoveTileFromDeck { tile: TileKind::Glass, enchantment: None },
                DeferredEffect::AddTilesToDeck { tile: TileKind::Black, count: 2 },
                DeferredEffect::GainMoney { amount: 2 },
            ],
            &mut money,
        );
        assert_eq!(money, 10);
        assert_eq!(deck.count(TileKind::Glass), 0);
        assert_eq!(deck.count(TileKind::Black), 2);
        assert_eq!(deck.len(), 26);
    }

    #[test]
    fn test_destroy_never_falls_back() {
        let mut deck = Deck::new(40);
        deck.push(DeckTile::new(TileKind::Red));
        deck.push(DeckTile::enchanted(TileKind::Red, EnchantmentKind::Shiny));
        let mut money = 0;

        let destroy = DeferredEffect::DestroyTile {
            tile: TileKind::Red,
            enchantment: EnchantmentKind::Explosive,
        };
        deck.apply(&[destroy], &mut money);
        assert_eq!(deck.len(), 2);

        deck.push(DeckTile::enchanted(TileKind::Red, EnchantmentKind::Explosive));
        deck.apply(&[destroy, destroy], &mut money);
        assert_eq!(
            deck.tiles(),
            &[DeckTile::new(TileKind::Red), DeckTile::enchanted(TileKind::Red, EnchantmentKind::Shiny)]
        );
    }
}
