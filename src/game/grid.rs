//! # Layered Grid
//!
//! A room is a stack of equally sized square layers: terrain at the bottom,
//! then the actor overlay, then the projectile overlay. Cells are stored
//! y-major so row-major iteration walks memory in order.

use crate::game::tiles::TileId;
use crate::game::PlaneCoord;
use crate::{CryptwalkError, CryptwalkResult};
use std::ops::{Index, IndexMut};

/// Which layer of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Terrain,
    Actors,
    Projectiles,
}

impl LayerKind {
    fn index(self) -> usize {
        match self {
            LayerKind::Terrain => 0,
            LayerKind::Actors => 1,
            LayerKind::Projectiles => 2,
        }
    }
}

/// One square layer of tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    size: i32,
    cells: Vec<TileId>,
}

impl TileLayer {
    /// A `size`×`size` layer filled with `tile`. Sizes below one are raised
    /// to one.
    pub fn filled(size: i32, tile: TileId) -> Self {
        let size = size.max(1);
        Self {
            size,
            cells: vec![tile; (size * size) as usize],
        }
    }

    /// Builds a layer from rows, which must form a square.
    pub fn from_rows(rows: Vec<Vec<TileId>>) -> CryptwalkResult<Self> {
        let size = rows.len();
        if size == 0 || rows.iter().any(|row| row.len() != size) {
            return Err(CryptwalkError::GenerationFailed(format!(
                "layer rows must form a non-empty square, got {} rows",
                size
            )));
        }
        Ok(Self {
            size: size as i32,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Side length.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Largest coordinate value on either axis.
    pub fn max_index(&self) -> i32 {
        self.size - 1
    }

    /// A coordinate bounded to this layer.
    pub fn coord(&self, x: i32, y: i32) -> PlaneCoord {
        PlaneCoord::new(x, y, self.max_index())
    }

    /// Every coordinate in row-major order.
    pub fn cells(&self) -> Cells {
        Cells::new(self.size)
    }

    /// Writes `tile` at every coordinate in `coords`.
    pub fn replace(&mut self, coords: &[PlaneCoord], tile: TileId) {
        for &coord in coords {
            self[coord] = tile;
        }
    }

    /// Number of cells holding `tile`.
    pub fn count(&self, tile: TileId) -> usize {
        self.cells.iter().filter(|&&t| t == tile).count()
    }

    /// Coordinates of every cell holding `tile`, row-major.
    pub fn positions_of(&self, tile: TileId) -> Vec<PlaneCoord> {
        self.cells().filter(|&coord| self[coord] == tile).collect()
    }

    fn offset(&self, coord: PlaneCoord) -> usize {
        let x = coord.x().clamp(0, self.size - 1);
        let y = coord.y().clamp(0, self.size - 1);
        (y * self.size + x) as usize
    }
}

impl Index<PlaneCoord> for TileLayer {
    type Output = TileId;

    fn index(&self, coord: PlaneCoord) -> &TileId {
        &self.cells[self.offset(coord)]
    }
}

impl IndexMut<PlaneCoord> for TileLayer {
    fn index_mut(&mut self, coord: PlaneCoord) -> &mut TileId {
        let offset = self.offset(coord);
        &mut self.cells[offset]
    }
}

/// Row-major walk over every coordinate of a square grid.
#[derive(Debug, Clone)]
pub struct Cells {
    size: i32,
    next: i32,
}

impl Cells {
    fn new(size: i32) -> Self {
        Self { size, next: 0 }
    }
}

impl Iterator for Cells {
    type Item = PlaneCoord;

    fn next(&mut self) -> Option<PlaneCoord> {
        if self.next >= self.size * self.size {
            return None;
        }
        let (x, y) = (self.next % self.size, self.next / self.size);
        self.next += 1;
        Some(PlaneCoord::new(x, y, self.size - 1))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.size * self.size - self.next).max(0) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Cells {}

/// The full tile stack of one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayeredGrid {
    layers: Vec<TileLayer>,
}

impl LayeredGrid {
    /// Wraps a terrain layer and adds blank actor and projectile overlays.
    pub fn new(terrain: TileLayer) -> Self {
        let size = terrain.size();
        let mut layers = Vec::with_capacity(crate::config::LAYER_COUNT);
        layers.push(terrain);
        for _ in 1..crate::config::LAYER_COUNT {
            layers.push(TileLayer::filled(size, TileId::Nil));
        }
        Self { layers }
    }

    pub fn size(&self) -> i32 {
        self.terrain().size()
    }

    pub fn max_index(&self) -> i32 {
        self.terrain().max_index()
    }

    pub fn coord(&self, x: i32, y: i32) -> PlaneCoord {
        self.terrain().coord(x, y)
    }

    /// Center cell.
    pub fn center(&self) -> PlaneCoord {
        let half = self.size() / 2;
        self.coord(half, half)
    }

    pub fn cells(&self) -> Cells {
        self.terrain().cells()
    }

    pub fn layer(&self, kind: LayerKind) -> &TileLayer {
        &self.layers[kind.index()]
    }

    pub fn layer_mut(&mut self, kind: LayerKind) -> &mut TileLayer {
        &mut self.layers[kind.index()]
    }

    pub fn terrain(&self) -> &TileLayer {
        self.layer(LayerKind::Terrain)
    }

    pub fn terrain_mut(&mut self) -> &mut TileLayer {
        self.layer_mut(LayerKind::Terrain)
    }

    pub fn actors_mut(&mut self) -> &mut TileLayer {
        self.layer_mut(LayerKind::Actors)
    }

    pub fn projectiles(&self) -> &TileLayer {
        self.layer(LayerKind::Projectiles)
    }

    pub fn projectiles_mut(&mut self) -> &mut TileLayer {
        self.layer_mut(LayerKind::Projectiles)
    }

    /// The topmost non-[`TileId::Nil`] tile at `coord`, or `Nil` when every
    /// layer is empty there.
    pub fn top_tile(&self, coord: PlaneCoord) -> TileId {
        self.layers
            .iter()
            .rev()
            .map(|layer| layer[coord])
            .find(|&tile| tile != TileId::Nil)
            .unwrap_or(TileId::Nil)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_visit_row_major_once() {
        let layer = TileLayer::filled(3, TileId::Wall);
        let visited: Vec<(i32, i32)> = layer.cells().map(|c| (c.x(), c.y())).collect();
        assert_eq!(
            visited,
            vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1), (0, 2), (1, 2), (2, 2)]
        );
        assert_eq!(layer.cells().len(), 9);
    }

    #[test]
    fn test_index_is_y_major() {
        let mut layer = TileLayer::filled(4, TileId::StoneFlooring);
        let cell = layer.coord(3, 1);
        layer[cell] = TileId::Chest;
        assert_eq!(layer.cells[7], TileId::Chest);
        assert_eq!(layer.count(TileId::Chest), 1);
        assert_eq!(layer.positions_of(TileId::Chest), vec![cell]);
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let rows = vec![vec![TileId::Wall; 3], vec![TileId::Wall; 2], vec![TileId::Wall; 3]];
        assert!(TileLayer::from_rows(rows).is_err());
        assert!(TileLayer::from_rows(Vec::new()).is_err());

        let rows = vec![vec![TileId::Wall; 2], vec![TileId::StoneFlooring; 2]];
        let layer = TileLayer::from_rows(rows).unwrap();
        assert_eq!(layer[layer.coord(1, 1)], TileId::StoneFlooring);
    }

    #[test]
    fn test_top_tile_prefers_upper_layers() {
        let mut grid = LayeredGrid::new(TileLayer::filled(5, TileId::StoneFlooring));
        let cell = grid.coord(2, 2);
        assert_eq!(grid.top_tile(cell), TileId::StoneFlooring);

        grid.actors_mut()[cell] = TileId::Player;
        assert_eq!(grid.top_tile(cell), TileId::Player);

        grid.projectiles_mut()[cell] = TileId::Dart;
        assert_eq!(grid.top_tile(cell), TileId::Dart);

        grid.projectiles_mut()[cell] = TileId::Nil;
        grid.actors_mut()[cell] = TileId::Nil;
        grid.terrain_mut()[cell] = TileId::Nil;
        assert_eq!(grid.top_tile(cell), TileId::Nil);
    }

    #[test]
    fn test_overlays_match_terrain_size() {
        let grid = LayeredGrid::new(TileLayer::filled(7, TileId::Wall));
        assert_eq!(grid.layer(LayerKind::Actors).size(), 7);
        assert_eq!(grid.projectiles().size(), 7);
        assert_eq!(grid.center(), grid.coord(3, 3));
    }
}
