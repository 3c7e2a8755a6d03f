//! # Input Module
//!
//! Keyboard handling for the window loop.

pub mod commands;

pub use commands::*;

use macroquad::prelude::*;

/// Turns key presses into [`InputEvent`]s.
pub struct InputHandler {
    /// Whether to enable Vi-style movement keys (hjkl)
    pub vi_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use cryptwalk::InputHandler;
    ///
    /// let input_handler = InputHandler::new();
    /// assert!(input_handler.vi_keys_enabled);
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
        }
    }

    /// The event for the first mapped key pressed this frame.
    pub fn poll(&self) -> Option<InputEvent> {
        get_keys_pressed()
            .into_iter()
            .find_map(|key| self.map_key(key))
    }

    /// Maps a single key. Arrows and WASD always move; hjkl moves when vi
    /// keys are enabled.
    pub fn map_key(&self, key: KeyCode) -> Option<InputEvent> {
        match key {
            KeyCode::Escape | KeyCode::Q => Some(InputEvent::Quit),
            KeyCode::E => Some(InputEvent::Interact),

            KeyCode::Up | KeyCode::W => Some(InputEvent::MoveUp),
            KeyCode::Down | KeyCode::S => Some(InputEvent::MoveDown),
            KeyCode::Left | KeyCode::A => Some(InputEvent::MoveLeft),
            KeyCode::Right | KeyCode::D => Some(InputEvent::MoveRight),

            KeyCode::K if self.vi_keys_enabled => Some(InputEvent::MoveUp),
            KeyCode::J if self.vi_keys_enabled => Some(InputEvent::MoveDown),
            KeyCode::H if self.vi_keys_enabled => Some(InputEvent::MoveLeft),
            KeyCode::L if self.vi_keys_enabled => Some(InputEvent::MoveRight),

            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        let handler = InputHandler::new();
        assert_eq!(handler.map_key(KeyCode::W), Some(InputEvent::MoveUp));
        assert_eq!(handler.map_key(KeyCode::Left), Some(InputEvent::MoveLeft));
        assert_eq!(handler.map_key(KeyCode::J), Some(InputEvent::MoveDown));
        assert_eq!(handler.map_key(KeyCode::E), Some(InputEvent::Interact));
        assert_eq!(handler.map_key(KeyCode::Escape), Some(InputEvent::Quit));
        assert_eq!(handler.map_key(KeyCode::Z), None);
    }

    #[test]
    fn test_vi_keys_can_be_disabled() {
        let handler = InputHandler {
            vi_keys_enabled: false,
        };
        assert_eq!(handler.map_key(KeyCode::H), None);
        assert_eq!(handler.map_key(KeyCode::A), Some(InputEvent::MoveLeft));
    }
}
