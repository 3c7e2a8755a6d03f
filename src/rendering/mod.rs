//! # Rendering Module
//!
//! Macroquad front end: the room grid, the status panel and the ending
//! screen. Everything drawn comes from the session's presentation queries.

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::*;

use crate::game::tiles::ColorHint;
use macroquad::prelude::Color;

/// Converts an 8-bit RGB triple to a macroquad color.
pub fn rgb(channels: (u8, u8, u8)) -> Color {
    Color::from_rgba(channels.0, channels.1, channels.2, 255)
}

/// Foreground and background colors for a hint.
pub fn hint_colors(hint: ColorHint) -> (Color, Color) {
    (rgb(hint.foreground()), rgb(hint.background()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_colors_are_opaque() {
        let (fg, bg) = hint_colors(ColorHint::GreenOnWhite);
        assert_eq!(fg.a, 1.0);
        assert_eq!(bg.a, 1.0);
        assert!(fg.g > fg.r);
        assert!(bg.r > 0.9 && bg.g > 0.9 && bg.b > 0.9);
    }
}
