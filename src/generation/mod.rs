//! # Generation Module
//!
//! Procedural room generation: terrain, doorways, chests and traps.
//!
//! Every room is generated from its own seeded random source, so the same
//! master seed and room id always rebuild the same layout.

pub mod encounters;
pub mod items;
pub mod room;

pub use encounters::*;
pub use items::*;
pub use room::*;

use crate::content::ROOM_TILE_WEIGHTS;
use crate::game::tiles::TileId;
use crate::{CryptwalkError, CryptwalkResult};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Master seed; each room derives its own seed from it
    pub seed: u64,
    /// Smallest room side length
    pub min_room_size: i32,
    /// Largest room side length
    pub max_room_size: i32,
    /// Fewest doorways drawn per room (before deduplication)
    pub min_doors: u32,
    /// Most doorways drawn per room
    pub max_doors: u32,
    /// Most chests per room
    pub max_chests: u32,
    /// Most traps per room
    pub max_traps: u32,
    /// Relative weights of interior tiles
    pub tile_weights: Vec<(TileId, f64)>,
}

impl GenerationConfig {
    /// Creates the standard configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use cryptwalk::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert!(config.min_room_size <= config.max_room_size);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            min_room_size: crate::config::DEFAULT_MIN_ROOM_SIZE,
            max_room_size: crate::config::DEFAULT_MAX_ROOM_SIZE,
            min_doors: 2,
            max_doors: 6,
            max_chests: 2,
            max_traps: 2,
            tile_weights: ROOM_TILE_WEIGHTS.to_vec(),
        }
    }

    /// Creates a configuration for testing: small fixed-size rooms, no traps.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            min_room_size: 15,
            max_room_size: 15,
            max_traps: 0,
            ..Self::new(seed)
        }
    }

    /// Pins every room to one side length.
    pub fn with_room_size(mut self, size: i32) -> Self {
        self.min_room_size = size;
        self.max_room_size = size;
        self
    }

    /// Checks that the ranges make sense.
    pub fn validate(&self) -> CryptwalkResult<()> {
        if self.min_room_size < 5 {
            return Err(CryptwalkError::InvalidConfig(format!(
                "rooms must be at least 5 cells wide, got {}",
                self.min_room_size
            )));
        }
        if self.max_room_size > crate::config::MAX_ROOM_SIZE {
            return Err(CryptwalkError::InvalidConfig(format!(
                "rooms may be at most {} cells wide, got {}",
                crate::config::MAX_ROOM_SIZE,
                self.max_room_size
            )));
        }
        if self.min_room_size > self.max_room_size {
            return Err(CryptwalkError::InvalidConfig(format!(
                "room size range {}..={} is empty",
                self.min_room_size, self.max_room_size
            )));
        }
        if self.min_doors == 0 || self.min_doors > self.max_doors {
            return Err(CryptwalkError::InvalidConfig(format!(
                "door range {}..={} must be non-empty and start at 1 or more",
                self.min_doors, self.max_doors
            )));
        }
        if self.tile_weights.is_empty() || self.tile_weights.iter().any(|(_, w)| *w <= 0.0) {
            return Err(CryptwalkError::InvalidConfig(
                "tile weights must be non-empty and positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> CryptwalkResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> CryptwalkResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use crate::game::graph::RoomId;
    use rand::{Rng, SeedableRng};

    /// Creates the random source for one room: master seed plus room id.
    pub fn room_rng(seed: u64, room: RoomId) -> StdRng {
        StdRng::seed_from_u64(seed.wrapping_add(u64::from(room)))
    }

    /// Draws a room side length from the configured range.
    pub fn room_size(config: &GenerationConfig, rng: &mut StdRng) -> i32 {
        rng.gen_range(config.min_room_size..=config.max_room_size)
    }
}
