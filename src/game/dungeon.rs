//! # Dungeon Driver
//!
//! Owns everything that outlives a single room: configuration, catalogs,
//! the room graph and the runtime that hosts hazard timers. Rooms are built
//! when entered and rebuilt from their seed on every later visit.

use crate::content::Catalogs;
use crate::game::graph::{DungeonGraph, RoomId};
use crate::game::grid::LayeredGrid;
use crate::game::hazards::HazardEngine;
use crate::game::interaction::Item;
use crate::game::specimen::Specimen;
use crate::game::state::RoomSession;
use crate::game::tiles::{TileFlags, TileId};
use crate::game::PlaneCoord;
use crate::generation::{sigil_for, utils, GenerationConfig, Generator, RoomBuilder};
use crate::{CryptwalkError, CryptwalkResult};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::time::Duration;

/// Run-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub generation: GenerationConfig,
    /// Avatar life points on entering the first room
    pub starting_life: u32,
    /// Milliseconds between hazard clock ticks
    pub hazard_interval_ms: u64,
    /// Session ticks per second in the window loop
    pub ticks_per_second: u32,
}

impl DungeonConfig {
    pub fn new(seed: u64) -> Self {
        Self {
            generation: GenerationConfig::new(seed),
            starting_life: crate::config::DEFAULT_LIFE_POINTS,
            hazard_interval_ms: crate::config::HAZARD_INTERVAL_MS,
            ticks_per_second: crate::config::TICKS_PER_SECOND,
        }
    }

    /// Small trap-free rooms.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            generation: GenerationConfig::for_testing(seed),
            ..Self::new(seed)
        }
    }

    /// Reads a JSON configuration file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> CryptwalkResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        debug!("loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn validate(&self) -> CryptwalkResult<()> {
        self.generation.validate()?;
        if self.hazard_interval_ms == 0 {
            return Err(CryptwalkError::InvalidConfig(
                "hazard interval must be positive".to_string(),
            ));
        }
        if self.ticks_per_second == 0 {
            return Err(CryptwalkError::InvalidConfig(
                "tick rate must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn hazard_interval(&self) -> Duration {
        Duration::from_millis(self.hazard_interval_ms)
    }
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self::new(GenerationConfig::default().seed)
    }
}

/// Sequences room sessions through the dungeon graph.
pub struct Dungeon {
    config: DungeonConfig,
    catalogs: Arc<Catalogs>,
    graph: DungeonGraph,
    builder: RoomBuilder,
    runtime: Runtime,
}

impl Dungeon {
    /// Validates the configuration and starts the hazard runtime.
    pub fn new(config: DungeonConfig, catalogs: Catalogs) -> CryptwalkResult<Self> {
        config.validate()?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .thread_name("cryptwalk-hazards")
            .build()?;
        let builder = RoomBuilder::from_config(&config.generation, &catalogs);

        Ok(Self {
            config,
            catalogs: Arc::new(catalogs),
            graph: DungeonGraph::new(),
            builder,
            runtime,
        })
    }

    /// Enters room 0 with a fresh avatar.
    pub fn start(&mut self) -> CryptwalkResult<RoomSession> {
        info!("starting run with seed {}", self.config.generation.seed);
        self.enter(0, None, self.config.starting_life, Vec::new())
    }

    /// Builds `room_id` and opens a session in it.
    ///
    /// On the first visit the room's doors are linked in the graph. Entering
    /// from another room seals the return door and places the avatar on the
    /// sigil of the door leading back to `entered_from`.
    pub fn enter(
        &mut self,
        room_id: RoomId,
        entered_from: Option<RoomId>,
        life: u32,
        items: Vec<Item>,
    ) -> CryptwalkResult<RoomSession> {
        self.graph.room(room_id)?;

        let generation = &self.config.generation;
        let mut rng = utils::room_rng(generation.seed, room_id);
        let mut room = self.builder.generate(generation, &mut rng)?;
        let size = room.size();

        let return_door = if self.graph.is_built(room_id) {
            self.graph.room(room_id)?.return_door
        } else {
            self.graph.populate(room_id, &room.doors, entered_from)?
        };
        if let Some(door) = return_door {
            room.grid.terrain_mut()[door] = TileId::SlidingDoor;
        }

        let doors = self.graph.room(room_id)?.doors.clone();
        let arrival = entered_from.and_then(|from| {
            doors
                .iter()
                .find(|(_, destination)| **destination == from)
                .map(|(&door, _)| door)
        });
        let position = match arrival {
            Some(door) => sigil_for(door),
            None => self.starting_position(&room.grid)?,
        };

        let mut avatar = Specimen::new(position, life);
        avatar.items = items;
        info!(
            "entered room {} ({}x{}, {} door(s)) at {}",
            room_id,
            size,
            size,
            doors.len(),
            position
        );

        let hazards = HazardEngine::new(
            Some(self.runtime.handle().clone()),
            self.config.hazard_interval(),
        );
        RoomSession::new(
            room_id,
            room.grid,
            doors,
            avatar,
            rng,
            Arc::clone(&self.catalogs),
            hazards,
        )
    }

    /// The room center, or the first passable interior cell in row-major
    /// order when the center is blocked.
    fn starting_position(&self, grid: &LayeredGrid) -> CryptwalkResult<PlaneCoord> {
        let center = grid.center();
        if self
            .catalogs
            .tiles
            .satisfies(grid, center, TileFlags::PASSABLE)?
        {
            return Ok(center);
        }
        for coord in grid.cells() {
            if !coord.is_on_border()
                && self
                    .catalogs
                    .tiles
                    .satisfies(grid, coord, TileFlags::PASSABLE)?
            {
                return Ok(coord);
            }
        }
        Err(CryptwalkError::InvalidState(
            "room has no passable cell".to_string(),
        ))
    }

    /// Closes `session` and opens the room behind `exit`, carrying the
    /// avatar's life and items over.
    pub fn transit(
        &mut self,
        session: RoomSession,
        exit: PlaneCoord,
    ) -> CryptwalkResult<RoomSession> {
        let from = session.room_id();
        let destination = self.graph.resolve(from, exit)?;
        let avatar = self.close(session);
        info!("room {} -> room {} through {}", from, destination, exit);
        self.enter(destination, Some(from), avatar.life, avatar.items)
    }

    /// Stops the session's hazard timer and waits for it to exit.
    pub fn close(&self, session: RoomSession) -> Specimen {
        self.runtime.block_on(session.close())
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    pub fn graph(&self) -> &DungeonGraph {
        &self.graph
    }
}
