//! # Specimen
//!
//! The avatar walking the dungeon.

use crate::game::interaction::Item;
use crate::game::PlaneCoord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecimenStatus {
    Normal,
    Dead,
}

/// The player's avatar. Life never drops below zero, and reaching zero
/// marks the specimen dead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specimen {
    pub status: SpecimenStatus,
    pub position: PlaneCoord,
    pub life: u32,
    pub items: Vec<Item>,
}

impl Specimen {
    pub fn new(position: PlaneCoord, life: u32) -> Self {
        Self {
            status: if life == 0 {
                SpecimenStatus::Dead
            } else {
                SpecimenStatus::Normal
            },
            position,
            life,
            items: Vec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status == SpecimenStatus::Normal
    }

    /// Applies damage and returns the remaining life.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.life = self.life.saturating_sub(amount);
        if self.life == 0 {
            self.status = SpecimenStatus::Dead;
        }
        self.life
    }

    pub fn acquire(&mut self, item: Item) {
        self.items.push(item);
    }
}
