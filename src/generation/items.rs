//! # Chest Placement
//!
//! Scatters chests over a room's interior.

use crate::game::grid::TileLayer;
use crate::game::tiles::TileId;
use crate::game::PlaneCoord;
use rand::Rng;

/// Draws `count` coordinates with both axes in `[min, max]`, on a grid of
/// extent `grid_max`. Duplicates are possible.
pub fn random_plane_coords<R: Rng + ?Sized>(
    rng: &mut R,
    count: u32,
    min: i32,
    max: i32,
    grid_max: i32,
) -> Vec<PlaneCoord> {
    if min > max {
        return Vec::new();
    }
    (0..count)
        .map(|_| {
            let x = rng.gen_range(min..=max);
            let y = rng.gen_range(min..=max);
            PlaneCoord::new(x, y, grid_max)
        })
        .collect()
}

/// True for tiles that room features must never be written over.
pub fn is_reserved(tile: TileId) -> bool {
    matches!(
        tile,
        TileId::Doorway | TileId::DoorwaySigil | TileId::SlidingDoor | TileId::Chest
    )
}

/// Places up to `count` chests on interior cells, skipping any draw that
/// lands on a reserved tile. Returns where chests were written.
pub fn place_chests<R: Rng + ?Sized>(
    rng: &mut R,
    terrain: &mut TileLayer,
    count: u32,
) -> Vec<PlaneCoord> {
    let candidates = random_plane_coords(rng, count, 1, terrain.size() - 2, terrain.max_index());
    let mut placed = Vec::new();
    for coord in candidates {
        if is_reserved(terrain[coord]) {
            continue;
        }
        terrain[coord] = TileId::Chest;
        placed.push(coord);
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_plane_coords_stay_inside() {
        let mut rng = StdRng::seed_from_u64(5);
        let coords = random_plane_coords(&mut rng, 200, 1, 8, 9);
        assert_eq!(coords.len(), 200);
        assert!(coords
            .iter()
            .all(|c| (1..=8).contains(&c.x()) && (1..=8).contains(&c.y())));
    }

    #[test]
    fn test_chests_skip_reserved_cells() {
        let mut terrain = TileLayer::filled(3, TileId::DoorwaySigil);
        let mut rng = StdRng::seed_from_u64(11);
        assert!(place_chests(&mut rng, &mut terrain, 2).is_empty());
        assert_eq!(terrain.count(TileId::Chest), 0);

        let mut terrain = TileLayer::filled(3, TileId::StoneFlooring);
        let placed = place_chests(&mut rng, &mut terrain, 2);
        assert_eq!(placed.len(), 1);
        assert_eq!(terrain[terrain.coord(1, 1)], TileId::Chest);
    }
}
