//! # Room Builder
//!
//! Builds a single square room: weighted terrain inside a wall ring,
//! doorways spread around the ring, then chests and traps.
//!
//! Every doorway gets a *sigil* on the interior cell next to it. The avatar
//! arrives on a sigil, and the sigil is what shows the door's letter.

use super::encounters::EncounterGenerator;
use super::items::place_chests;
use super::{utils, GenerationConfig, Generator};
use crate::content::Catalogs;
use crate::game::grid::{LayeredGrid, TileLayer};
use crate::game::tiles::TileId;
use crate::game::{PlaneCoord, Side, WallCoord};
use crate::{CryptwalkError, CryptwalkResult};
use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::BTreeSet;

/// Output of the room builder.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRoom {
    pub grid: LayeredGrid,
    /// Doorway coordinates in wall order (side, then offset along it)
    pub doors: Vec<PlaneCoord>,
    pub chests: Vec<PlaneCoord>,
    pub traps: Vec<(TileId, PlaneCoord)>,
}

impl BuiltRoom {
    pub fn size(&self) -> i32 {
        self.grid.size()
    }
}

/// Builds rooms from a tile weighting and a set of trap kinds.
#[derive(Debug, Clone)]
pub struct RoomBuilder {
    pub tile_weights: Vec<(TileId, f64)>,
    pub encounters: EncounterGenerator,
}

impl RoomBuilder {
    pub fn new(tile_weights: Vec<(TileId, f64)>, encounters: EncounterGenerator) -> Self {
        Self {
            tile_weights,
            encounters,
        }
    }

    /// A builder using the configured weights and every placeable trap in
    /// the hazard catalog.
    pub fn from_config(config: &GenerationConfig, catalogs: &Catalogs) -> Self {
        Self::new(
            config.tile_weights.clone(),
            EncounterGenerator::new(catalogs.hazards.placeable_traps()),
        )
    }

    /// Builds a room of the given side length: terrain, then doorways, then
    /// chests, then traps, all drawn from `rng` in that order.
    pub fn build_room(
        &self,
        rng: &mut StdRng,
        config: &GenerationConfig,
        size: i32,
    ) -> CryptwalkResult<BuiltRoom> {
        let mut terrain = random_grid(rng, size, &self.tile_weights)?;

        let door_count = rng.gen_range(config.min_doors..=config.max_doors.max(config.min_doors));
        let doors = add_random_doorways(rng, &mut terrain, door_count);

        let chest_count = rng.gen_range(0..=config.max_chests);
        let chests = place_chests(rng, &mut terrain, chest_count);

        let trap_count = rng.gen_range(0..=config.max_traps);
        let traps = self.encounters.place(rng, &mut terrain, trap_count);

        debug!(
            "built {}x{} room: {} door(s), {} chest(s), {} trap(s)",
            size,
            size,
            doors.len(),
            chests.len(),
            traps.len()
        );

        Ok(BuiltRoom {
            grid: LayeredGrid::new(terrain),
            doors,
            chests,
            traps,
        })
    }
}

impl Generator<BuiltRoom> for RoomBuilder {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> CryptwalkResult<BuiltRoom> {
        let size = utils::room_size(config, rng);
        let room = self.build_room(rng, config, size)?;
        self.validate(&room, config)?;
        Ok(room)
    }

    fn validate(&self, content: &BuiltRoom, config: &GenerationConfig) -> CryptwalkResult<()> {
        let size = content.size();
        if size < config.min_room_size || size > config.max_room_size {
            return Err(CryptwalkError::GenerationFailed(format!(
                "room size {} outside {}..={}",
                size, config.min_room_size, config.max_room_size
            )));
        }
        if content.doors.is_empty() {
            return Err(CryptwalkError::GenerationFailed(
                "room has no doorways".to_string(),
            ));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "RoomBuilder"
    }
}

/// A `size`×`size` terrain layer: the outer ring is wall, every interior cell
/// is drawn independently from the weighted tiles. Sizes below 3 are raised
/// to 3.
pub fn random_grid<R: Rng + ?Sized>(
    rng: &mut R,
    size: i32,
    weights: &[(TileId, f64)],
) -> CryptwalkResult<TileLayer> {
    let distribution = WeightedIndex::new(weights.iter().map(|(_, weight)| *weight))
        .map_err(|err| CryptwalkError::GenerationFailed(format!("bad tile weights: {}", err)))?;

    let mut layer = TileLayer::filled(size.max(3), TileId::Wall);
    for coord in layer.cells().collect::<Vec<_>>() {
        if !coord.is_on_border() {
            layer[coord] = weights[distribution.sample(rng)].0;
        }
    }
    Ok(layer)
}

/// Draws `count` wall coordinates with offsets in `[min_u, max_u]`, cycling
/// the sides left, right, top, bottom. Duplicate draws collapse, so fewer
/// than `count` may come back. The result is sorted by side, then offset.
pub fn random_wall_coords<R: Rng + ?Sized>(
    rng: &mut R,
    count: u32,
    min_u: i32,
    max_u: i32,
    max: i32,
) -> Vec<WallCoord> {
    if min_u > max_u {
        return Vec::new();
    }
    let mut side = Side::Left;
    let mut coords = BTreeSet::new();
    for _ in 0..count {
        coords.insert(WallCoord::new(side, rng.gen_range(min_u..=max_u), max));
        side = side.next();
    }
    coords.into_iter().collect()
}

/// The interior cell a doorway's sigil sits on: one step in from the wall,
/// and one step in on both axes at a corner.
pub fn sigil_for(door: PlaneCoord) -> PlaneCoord {
    let mut sigil = door;
    if door.x() == door.min() {
        sigil.x_mut().increment();
    } else if door.x() == door.max() {
        sigil.x_mut().decrement();
    }
    if door.y() == door.min() {
        sigil.y_mut().increment();
    } else if door.y() == door.max() {
        sigil.y_mut().decrement();
    }
    sigil
}

/// Carves up to `count` doorways into the wall ring, each with its sigil.
/// Returns the doorway coordinates in wall order.
pub fn add_random_doorways<R: Rng + ?Sized>(
    rng: &mut R,
    terrain: &mut TileLayer,
    count: u32,
) -> Vec<PlaneCoord> {
    let max = terrain.max_index();
    random_wall_coords(rng, count, 1, terrain.size() - 2, max)
        .into_iter()
        .map(|wall| {
            let door = wall.to_plane(max);
            terrain[door] = TileId::Doorway;
            terrain[sigil_for(door)] = TileId::DoorwaySigil;
            door
        })
        .collect()
}
