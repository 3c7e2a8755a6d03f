//! # Interactions
//!
//! What happens when the avatar uses the tile it is facing.

use crate::game::grid::LayeredGrid;
use crate::game::tiles::TileId;
use crate::game::PlaneCoord;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity of an obtainable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemId {
    TarnishedCoin,
    CrackedGem,
    BoneCharm,
    RustedKey,
    CandleStub,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub value: i64,
}

impl Item {
    pub fn new(name: &str, value: i64) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

/// Items a chest can hand out, picked uniformly.
#[derive(Debug, Clone, Default)]
pub struct RewardCatalog {
    items: BTreeMap<ItemId, Item>,
}

impl RewardCatalog {
    pub fn new(entries: impl IntoIterator<Item = (ItemId, Item)>) -> Self {
        Self {
            items: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// One uniformly drawn entry, or None for an empty catalog.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(ItemId, &Item)> {
        if self.items.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.items.len());
        self.items.iter().nth(index).map(|(&id, item)| (id, item))
    }
}

/// Result of interacting with a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionEffect {
    Nothing,
    Message(String),
    Acquired { item: Item, message: String },
}

impl InteractionEffect {
    pub fn message(&self) -> Option<&str> {
        match self {
            InteractionEffect::Nothing => None,
            InteractionEffect::Message(message) => Some(message),
            InteractionEffect::Acquired { message, .. } => Some(message),
        }
    }
}

/// Resolves an interaction with the terrain tile at `coord`.
///
/// Chests hand out a random reward. Sealed doors only report that they are
/// sealed. Everything else does nothing. The grid is not modified.
pub fn interact_with<R: Rng + ?Sized>(
    rng: &mut R,
    grid: &LayeredGrid,
    rewards: &RewardCatalog,
    coord: PlaneCoord,
) -> InteractionEffect {
    match grid.terrain()[coord] {
        TileId::Chest => match rewards.pick(rng) {
            Some((_, item)) => InteractionEffect::Acquired {
                message: format!("(Obtained {}!)", item.name),
                item: item.clone(),
            },
            None => InteractionEffect::Message("(The chest is empty.)".to_string()),
        },
        TileId::SlidingDoor => InteractionEffect::Message("(The door is sealed.)".to_string()),
        _ => InteractionEffect::Nothing,
    }
}
