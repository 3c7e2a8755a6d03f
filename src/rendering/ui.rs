//! # User Interface Elements
//!
//! The status panel beside the room and the screen shown when a run ends.

use crate::game::graph::RoomId;
use crate::game::state::RoomSession;
use macroquad::prelude::*;

/// How a run ended, for the ending screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub died: bool,
    /// Room the run ended in
    pub room: RoomId,
    pub rooms_discovered: usize,
    pub life: u32,
    pub items: Vec<String>,
}

impl RunSummary {
    /// Text of the ending screen, one entry per line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            if self.died {
                "You died in the crypt.".to_string()
            } else {
                "You left the crypt.".to_string()
            },
            format!("Last room: {}", self.room),
            format!("Rooms discovered: {}", self.rooms_discovered),
            format!("Life remaining: {}", self.life),
        ];
        if self.items.is_empty() {
            lines.push("You carried nothing out.".to_string());
        } else {
            lines.push(format!("Carried: {}", self.items.join(", ")));
        }
        lines
    }
}

/// Draws panels that are not part of the room grid.
#[derive(Debug, Default)]
pub struct UI;

impl UI {
    pub fn new() -> Self {
        Self
    }

    /// Room title, life, pack and controls.
    pub fn render_status(&self, session: &RoomSession, panel_x: f32) {
        let mut line_y = 20.0;
        let line_height = 20.0;

        draw_text(crate::config::WINDOW_TITLE, panel_x, line_y, 24.0, WHITE);
        line_y += line_height * 2.0;

        draw_text(
            &format!("Room {}", session.room_id()),
            panel_x,
            line_y,
            20.0,
            YELLOW,
        );
        line_y += line_height;

        let avatar = session.avatar();
        let life_color = if avatar.life <= 20 { RED } else { WHITE };
        draw_text(
            &format!("Life: {}", avatar.life),
            panel_x,
            line_y,
            18.0,
            life_color,
        );
        line_y += line_height;

        draw_text(
            &format!("Turn: {}", session.turn()),
            panel_x,
            line_y,
            18.0,
            WHITE,
        );
        line_y += line_height * 2.0;

        draw_text("Pack:", panel_x, line_y, 18.0, SKYBLUE);
        line_y += line_height;
        if avatar.items.is_empty() {
            draw_text("(empty)", panel_x, line_y, 16.0, GRAY);
            line_y += line_height;
        }
        for item in &avatar.items {
            draw_text(&item.name, panel_x, line_y, 16.0, WHITE);
            line_y += line_height;
        }
        line_y += line_height;

        draw_text("Controls:", panel_x, line_y, 18.0, GREEN);
        line_y += line_height;
        for control in ["WASD/arrows/hjkl: Move", "E: Interact", "Q/ESC: Quit"] {
            draw_text(control, panel_x, line_y, 16.0, WHITE);
            line_y += line_height;
        }
    }

    /// Centered summary plus the restart hint.
    pub fn render_ending_screen(&self, summary: &RunSummary) {
        clear_background(BLACK);
        let title_color = if summary.died { RED } else { GREEN };
        let mut line_y = screen_height() / 3.0;

        for (i, line) in summary.lines().iter().enumerate() {
            let (size, color) = if i == 0 {
                (36.0, title_color)
            } else {
                (20.0, WHITE)
            };
            let dims = measure_text(line, None, size as u16, 1.0);
            draw_text(line, (screen_width() - dims.width) / 2.0, line_y, size, color);
            line_y += size + 8.0;
        }

        let hint = "N: new run    ESC: exit";
        let dims = measure_text(hint, None, 18, 1.0);
        draw_text(
            hint,
            (screen_width() - dims.width) / 2.0,
            line_y + 30.0,
            18.0,
            GRAY,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lines() {
        let summary = RunSummary {
            died: true,
            room: 4,
            rooms_discovered: 9,
            life: 0,
            items: vec!["cracked gem".to_string(), "bone charm".to_string()],
        };
        let lines = summary.lines();
        assert_eq!(lines[0], "You died in the crypt.");
        assert_eq!(lines[1], "Last room: 4");
        assert_eq!(lines.last().unwrap(), "Carried: cracked gem, bone charm");

        let quiet = RunSummary {
            died: false,
            items: Vec::new(),
            ..summary
        };
        assert_eq!(quiet.lines()[0], "You left the crypt.");
        assert_eq!(quiet.lines().last().unwrap(), "You carried nothing out.");
    }
}
