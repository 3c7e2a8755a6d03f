//! # Scene Management System
//!
//! Runs the window loop: the playing scene ticks the room session at a fixed
//! rate and swaps sessions when the avatar walks through a doorway; the
//! game-over scene shows the run summary until the player starts again or
//! leaves.

use crate::content::Catalogs;
use crate::game::dungeon::{Dungeon, DungeonConfig};
use crate::game::state::{RoomSession, SessionStatus};
use crate::input::{InputEvent, InputHandler};
use crate::rendering::{MacroquadDisplay, RunSummary};
use crate::{CryptwalkError, CryptwalkResult};
use log::info;
use macroquad::prelude::*;

/// Ticks the session may run in one frame before the clock drops the rest.
const MAX_TICKS_PER_FRAME: u32 = 5;

/// Represents the current scene in the game
#[derive(Debug, Clone, PartialEq)]
pub enum SceneType {
    /// Normal gameplay
    Playing,
    /// Run ended by death or by quitting
    GameOver(RunSummary),
}

/// Converts frame times into a whole number of fixed-length ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct TickClock {
    tick_length: f32,
    accumulator: f32,
}

impl TickClock {
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            tick_length: 1.0 / ticks_per_second.max(1) as f32,
            accumulator: 0.0,
        }
    }

    /// Adds `frame_time` seconds and returns how many ticks are due.
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        self.accumulator += frame_time.max(0.0);
        let mut due = 0;
        while self.accumulator >= self.tick_length {
            self.accumulator -= self.tick_length;
            due += 1;
        }
        if due > MAX_TICKS_PER_FRAME {
            self.accumulator = 0.0;
            due = MAX_TICKS_PER_FRAME;
        }
        due
    }
}

/// The main scene manager that coordinates all game scenes
pub struct SceneManager {
    current_scene: SceneType,
    config: DungeonConfig,
    dungeon: Dungeon,
    session: Option<RoomSession>,
    display: MacroquadDisplay,
    input_handler: InputHandler,
    clock: TickClock,
    pending: InputEvent,
}

impl SceneManager {
    /// Builds the dungeon and enters its first room.
    pub async fn new(config: DungeonConfig, input_handler: InputHandler) -> CryptwalkResult<Self> {
        let mut dungeon = Dungeon::new(config.clone(), Catalogs::standard())?;
        let session = dungeon.start()?;

        Ok(Self {
            current_scene: SceneType::Playing,
            clock: TickClock::new(config.ticks_per_second),
            config,
            dungeon,
            session: Some(session),
            display: MacroquadDisplay::new().await?,
            input_handler,
            pending: InputEvent::None,
        })
    }

    /// Runs the main scene loop until the game exits
    pub async fn run(&mut self) -> CryptwalkResult<()> {
        loop {
            let exit = match self.current_scene.clone() {
                SceneType::Playing => self.update_playing_scene().await?,
                SceneType::GameOver(summary) => self.update_game_over_scene(&summary).await?,
            };
            if exit {
                break;
            }
            next_frame().await;
        }
        if let Some(session) = self.session.take() {
            self.dungeon.close(session);
        }
        Ok(())
    }

    /// Updates the playing scene, returns true if exit is requested
    async fn update_playing_scene(&mut self) -> CryptwalkResult<bool> {
        if let Some(input) = self.input_handler.poll() {
            if self.pending != InputEvent::Quit {
                self.pending = input;
            }
        }

        for _ in 0..self.clock.advance(get_frame_time()) {
            let input = std::mem::take(&mut self.pending);
            if self.step(input)? {
                return Ok(false);
            }
        }

        match &self.session {
            Some(session) => self.display.render_room(session).await?,
            None => {
                return Err(CryptwalkError::InvalidState(
                    "playing without a room session".to_string(),
                ))
            }
        }
        Ok(false)
    }

    /// Runs one session tick. Returns true when the run ended.
    fn step(&mut self, input: InputEvent) -> CryptwalkResult<bool> {
        let Some(mut session) = self.session.take() else {
            return Err(CryptwalkError::InvalidState(
                "playing without a room session".to_string(),
            ));
        };

        match session.tick(input)? {
            SessionStatus::Playing => {
                self.session = Some(session);
                Ok(false)
            }
            SessionStatus::Exited(door) => {
                self.session = Some(self.dungeon.transit(session, door)?);
                Ok(false)
            }
            SessionStatus::Quit => {
                self.end_run(session, false);
                Ok(true)
            }
            SessionStatus::Died => {
                self.end_run(session, true);
                Ok(true)
            }
        }
    }

    fn end_run(&mut self, session: RoomSession, died: bool) {
        let room = session.room_id();
        let avatar = self.dungeon.close(session);
        info!(
            "run ended in room {} ({}), {} item(s)",
            room,
            if died { "died" } else { "quit" },
            avatar.items.len()
        );
        self.current_scene = SceneType::GameOver(RunSummary {
            died,
            room,
            rooms_discovered: self.dungeon.graph().len(),
            life: avatar.life,
            items: avatar.items.into_iter().map(|item| item.name).collect(),
        });
    }

    /// Updates the game over scene, returns true if exit is requested
    async fn update_game_over_scene(&mut self, summary: &RunSummary) -> CryptwalkResult<bool> {
        self.display.ui.render_ending_screen(summary);

        if is_key_pressed(KeyCode::N) {
            self.start_new_game()?;
            return Ok(false);
        }
        Ok(is_key_pressed(KeyCode::Escape))
    }

    /// Starts a new run on a fresh dungeon seeded from the clock.
    fn start_new_game(&mut self) -> CryptwalkResult<()> {
        let new_seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(self.config.generation.seed.wrapping_add(1));
        info!("Starting new run with seed: {}", new_seed);

        self.config.generation.seed = new_seed;
        self.dungeon = Dungeon::new(self.config.clone(), Catalogs::standard())?;
        self.session = Some(self.dungeon.start()?);
        self.clock = TickClock::new(self.config.ticks_per_second);
        self.pending = InputEvent::None;
        self.current_scene = SceneType::Playing;
        Ok(())
    }
}
