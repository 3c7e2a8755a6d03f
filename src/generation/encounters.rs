//! # Encounter Generation
//!
//! Trap placement. Traps are written into the terrain as their own tile
//! identity; the room session arms every trap tile it finds when play starts.

use super::items::{is_reserved, random_plane_coords};
use crate::game::grid::TileLayer;
use crate::game::tiles::TileId;
use crate::game::PlaneCoord;
use log::debug;
use rand::Rng;

/// Places traps of the given kinds.
#[derive(Debug, Clone, Default)]
pub struct EncounterGenerator {
    pub kinds: Vec<TileId>,
}

impl EncounterGenerator {
    pub fn new(kinds: Vec<TileId>) -> Self {
        Self { kinds }
    }

    /// Places up to `count` traps on interior cells, each of a uniformly drawn
    /// kind. Draws that land on reserved tiles or on another trap are
    /// skipped, so a room may end up with fewer traps.
    pub fn place<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        terrain: &mut TileLayer,
        count: u32,
    ) -> Vec<(TileId, PlaneCoord)> {
        if self.kinds.is_empty() || count == 0 {
            return Vec::new();
        }

        let mut placed = Vec::new();
        for _ in 0..count {
            let kind = self.kinds[rng.gen_range(0..self.kinds.len())];
            let Some(coord) =
                random_plane_coords(rng, 1, 1, terrain.size() - 2, terrain.max_index())
                    .into_iter()
                    .next()
            else {
                continue;
            };
            let current = terrain[coord];
            if is_reserved(current) || self.kinds.contains(&current) {
                continue;
            }
            terrain[coord] = kind;
            placed.push((kind, coord));
        }
        debug!("placed {} trap(s)", placed.len());
        placed
    }
}
