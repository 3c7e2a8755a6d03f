//! # Cryptwalk
//!
//! Procedurally generated dungeon rooms linked into a lazily grown graph,
//! with trap hazards that fire on a background clock.
//!
//! ## Architecture Overview
//!
//! - **Coordinates**: bounded scalars, plane coordinates and wall coordinates
//! - **Tiles**: a catalog of tile identities and their capability flags
//! - **Grid**: stacked layers of tiles (terrain, actors, projectiles)
//! - **Generation**: the room builder (terrain, doorways, chests, traps)
//! - **Dungeon**: the room graph, room sessions and the driver that links them
//! - **Hazards**: armed traps, the timer task and the projectile mover
//!
//! Rendering and input are thin adapters over the session's presentation
//! and input contracts.

pub mod content;
pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod scenes;
pub mod utils;

pub use content::*;
pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;
pub use utils::*;

/// Core error type for the Cryptwalk engine.
#[derive(thiserror::Error, Debug)]
pub enum CryptwalkError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A tile identity has no catalog entry
    #[error("Unknown tile: {0:?}")]
    UnknownTile(TileId),

    /// A hazard or payload identity has no hazard catalog entry
    #[error("Missing hazard descriptor for {0:?}")]
    MissingHazard(TileId),

    /// A door was queried before the graph assigned it a destination
    #[error("Door {door} in room {room} has no destination")]
    UnassignedDoor { room: RoomId, door: PlaneCoord },

    /// A room id that was never allocated
    #[error("Unknown room: {0}")]
    UnknownRoom(RoomId),

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Cryptwalk codebase.
pub type CryptwalkResult<T> = Result<T, CryptwalkError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Avatar life points at the start of a run
    pub const DEFAULT_LIFE_POINTS: u32 = 100;

    /// Interval between hazard clock ticks, in milliseconds
    pub const HAZARD_INTERVAL_MS: u64 = 1000;

    /// Session ticks per second driven by the window loop
    pub const TICKS_PER_SECOND: u32 = 10;

    /// Smallest room side length drawn by default
    pub const DEFAULT_MIN_ROOM_SIZE: i32 = 20;

    /// Largest room side length drawn by default
    pub const DEFAULT_MAX_ROOM_SIZE: i32 = 25;

    /// Hard upper bound on any room side length
    pub const MAX_ROOM_SIZE: i32 = 256;

    /// Number of layers in every room grid
    pub const LAYER_COUNT: usize = 3;

    /// Messages kept in a session's log
    pub const MAX_MESSAGES: usize = 100;

    /// Window title
    pub const WINDOW_TITLE: &str = "Cryptwalk";
}
