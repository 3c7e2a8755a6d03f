//! # Display Management
//!
//! Draws a room session with macroquad: one glyph per visible cell on its
//! hint background, the status panel on the right and the latest messages
//! along the bottom.

use crate::game::state::RoomSession;
use crate::rendering::{hint_colors, UI};
use crate::CryptwalkResult;
use macroquad::prelude::*;

/// Macroquad display manager for the game.
pub struct MacroquadDisplay {
    /// Screen width in pixels
    pub screen_width: f32,
    /// Screen height in pixels
    pub screen_height: f32,
    /// Largest tile size in pixels
    pub max_tile_size: f32,
    /// UI panel width in pixels
    pub ui_panel_width: f32,
    /// Height reserved for the message area
    pub message_area_height: f32,
    /// Number of messages shown
    pub message_lines: usize,
    pub ui: UI,
}

impl MacroquadDisplay {
    /// Creates a display sized to the current window.
    pub async fn new() -> CryptwalkResult<Self> {
        Ok(Self {
            screen_width: screen_width(),
            screen_height: screen_height(),
            max_tile_size: 28.0,
            ui_panel_width: 300.0,
            message_area_height: 90.0,
            message_lines: 3,
            ui: UI::new(),
        })
    }

    /// Renders the complete game screen.
    pub async fn render_room(&mut self, session: &RoomSession) -> CryptwalkResult<()> {
        self.screen_width = screen_width();
        self.screen_height = screen_height();
        clear_background(BLACK);

        self.render_grid(session)?;
        let panel_x = self.screen_width - self.ui_panel_width + 10.0;
        self.ui.render_status(session, panel_x);
        self.render_messages(session.messages());
        Ok(())
    }

    /// Side length of one cell so a `room_size` grid fits the map area.
    pub fn tile_size_for(&self, room_size: i32) -> f32 {
        fit_tile_size(
            room_size,
            self.screen_width - self.ui_panel_width,
            self.screen_height - self.message_area_height,
            self.max_tile_size,
        )
    }

    fn render_grid(&self, session: &RoomSession) -> CryptwalkResult<()> {
        let tile_size = self.tile_size_for(session.grid().size());
        let font_size = tile_size * 0.9;

        for cell in session.visible_cells()? {
            let x = cell.coord.x() as f32 * tile_size;
            let y = cell.coord.y() as f32 * tile_size;
            let (foreground, background) = hint_colors(cell.color);

            draw_rectangle(x, y, tile_size, tile_size, background);
            if cell.symbol != ' ' {
                let glyph = cell.symbol.to_string();
                let dims = measure_text(&glyph, None, font_size as u16, 1.0);
                draw_text(
                    &glyph,
                    x + (tile_size - dims.width) / 2.0,
                    y + tile_size * 0.8,
                    font_size,
                    foreground,
                );
            }
        }
        Ok(())
    }

    fn render_messages(&self, messages: &[String]) {
        let message_area_y = self.screen_height - self.message_area_height + 20.0;
        let line_height = 18.0;

        draw_rectangle(
            0.0,
            message_area_y - 20.0,
            self.screen_width,
            self.message_area_height,
            Color::new(0.0, 0.0, 0.0, 0.8),
        );

        let start_index = messages.len().saturating_sub(self.message_lines);
        for (i, message) in messages.iter().skip(start_index).enumerate() {
            let y = message_area_y + i as f32 * line_height;
            let color = if start_index + i + 1 == messages.len() {
                WHITE
            } else {
                GRAY
            };
            draw_text(message, 10.0, y, 16.0, color);
        }
    }
}

/// Largest cell size, capped at `max`, that fits `room_size` cells into a
/// `width`×`height` area. Never below one pixel.
pub fn fit_tile_size(room_size: i32, width: f32, height: f32, max: f32) -> f32 {
    let cells = room_size.max(1) as f32;
    (width.min(height) / cells).min(max).max(1.0).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_size_fits_room() {
        assert_eq!(fit_tile_size(20, 500.0, 700.0, 28.0), 25.0);
        assert_eq!(fit_tile_size(10, 2000.0, 2000.0, 28.0), 28.0);
        assert_eq!(fit_tile_size(25, 10.0, 10.0, 28.0), 1.0);
        assert_eq!(fit_tile_size(0, 100.0, 100.0, 28.0), 28.0);
    }
}
