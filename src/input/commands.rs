//! # Input Events
//!
//! The per-tick input contract of a room session.

use crate::game::Direction;
use serde::{Deserialize, Serialize};

/// One player intent, delivered to the session once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InputEvent {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    /// Use the tile the avatar last bumped into
    Interact,
    Quit,
    /// Nothing pressed this tick; hazards still advance
    #[default]
    None,
}

impl InputEvent {
    /// Movement direction, for the four move events.
    pub fn direction(self) -> Option<Direction> {
        match self {
            InputEvent::MoveUp => Some(Direction::North),
            InputEvent::MoveDown => Some(Direction::South),
            InputEvent::MoveLeft => Some(Direction::West),
            InputEvent::MoveRight => Some(Direction::East),
            _ => None,
        }
    }

    pub fn is_movement(self) -> bool {
        self.direction().is_some()
    }
}
