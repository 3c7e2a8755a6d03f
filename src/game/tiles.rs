//! # Tile Catalog
//!
//! Tile identities, their capability flags and their presentation data.
//! Movement, interaction and door rules all ask the catalog what a tile can
//! do instead of matching on identities directly.

use crate::game::grid::LayeredGrid;
use crate::game::PlaneCoord;
use crate::{CryptwalkError, CryptwalkResult};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identity of every tile that can appear in a room layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileId {
    /// Empty overlay cell
    Nil,
    Wall,
    Doorway,
    DoorwaySigil,
    SlidingDoor,
    Chest,
    StoneRubblePile,
    StoneFlooring,
    CrackedStoneFlooring,
    DecoratedStoneFlooring,
    StonePillar,
    ScorchedFlooring,
    Player,
    DartTrap,
    Dart,
    FlameVent,
    Fireball,
    Embers,
    Spark,
    RockChute,
    Rock,
}

bitflags! {
    /// What a tile lets the avatar do.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TileFlags: u8 {
        const PASSABLE       = 1 << 0;
        const INTERACTABLE   = 1 << 1;
        const TRANSPORTING   = 1 << 2;
        const SHAPE_CHANGING = 1 << 3;
        const DAMAGING       = 1 << 4;
    }
}

/// Foreground/background pair a presentation layer should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorHint {
    #[default]
    WhiteOnBlack,
    GrayOnBlack,
    CyanOnBlack,
    MagentaOnBlue,
    GreenOnWhite,
    RedOnBlack,
    OrangeOnBlack,
    YellowOnBlack,
}

impl ColorHint {
    /// Foreground as 8-bit RGB.
    pub fn foreground(self) -> (u8, u8, u8) {
        match self {
            ColorHint::WhiteOnBlack => (230, 230, 230),
            ColorHint::GrayOnBlack => (130, 130, 130),
            ColorHint::CyanOnBlack => (0, 200, 210),
            ColorHint::MagentaOnBlue => (220, 60, 220),
            ColorHint::GreenOnWhite => (20, 160, 40),
            ColorHint::RedOnBlack => (220, 40, 40),
            ColorHint::OrangeOnBlack => (245, 150, 30),
            ColorHint::YellowOnBlack => (240, 220, 40),
        }
    }

    /// Background as 8-bit RGB.
    pub fn background(self) -> (u8, u8, u8) {
        match self {
            ColorHint::MagentaOnBlue => (20, 30, 150),
            ColorHint::GreenOnWhite => (235, 235, 235),
            _ => (0, 0, 0),
        }
    }
}

/// Static properties of one tile identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileDescriptor {
    pub symbol: char,
    pub flags: TileFlags,
    pub description: String,
    pub color: ColorHint,
}

impl TileDescriptor {
    pub fn new(symbol: char, flags: TileFlags, description: &str, color: ColorHint) -> Self {
        Self {
            symbol,
            flags,
            description: description.to_string(),
            color,
        }
    }
}

/// Mapping from tile identity to its descriptor.
///
/// Built once at start-up and shared read-only. A lookup miss is a content
/// error and is reported as [`CryptwalkError::UnknownTile`].
#[derive(Debug, Clone, Default)]
pub struct TileCatalog {
    tiles: HashMap<TileId, TileDescriptor>,
}

impl TileCatalog {
    pub fn new(entries: impl IntoIterator<Item = (TileId, TileDescriptor)>) -> Self {
        Self {
            tiles: entries.into_iter().collect(),
        }
    }

    /// Looks up a descriptor.
    pub fn get(&self, tile: TileId) -> CryptwalkResult<&TileDescriptor> {
        self.tiles
            .get(&tile)
            .ok_or(CryptwalkError::UnknownTile(tile))
    }

    pub fn flags(&self, tile: TileId) -> CryptwalkResult<TileFlags> {
        Ok(self.get(tile)?.flags)
    }

    pub fn contains(&self, tile: TileId) -> bool {
        self.tiles.contains_key(&tile)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// True when the terrain tile at `coord` carries any flag in `mask`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cryptwalk::{Catalogs, LayeredGrid, TileFlags, TileId, TileLayer};
    ///
    /// let catalogs = Catalogs::standard();
    /// let grid = LayeredGrid::new(TileLayer::filled(5, TileId::StoneFlooring));
    /// let center = grid.coord(2, 2);
    /// assert!(catalogs.tiles.satisfies(&grid, center, TileFlags::PASSABLE).unwrap());
    /// assert!(!catalogs.tiles.satisfies(&grid, center, TileFlags::TRANSPORTING).unwrap());
    /// ```
    pub fn satisfies(
        &self,
        grid: &LayeredGrid,
        coord: PlaneCoord,
        mask: TileFlags,
    ) -> CryptwalkResult<bool> {
        Ok(self.flags(grid.terrain()[coord])?.intersects(mask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Catalogs;
    use crate::game::grid::TileLayer;

    #[test]
    fn test_lookup_miss_is_an_error() {
        let catalog = TileCatalog::default();
        match catalog.get(TileId::Wall) {
            Err(CryptwalkError::UnknownTile(TileId::Wall)) => {}
            other => panic!("unexpected lookup result: {:?}", other),
        }
    }

    #[test]
    fn test_standard_flags() {
        let tiles = Catalogs::standard().tiles;
        assert!(tiles.flags(TileId::Doorway).unwrap().contains(TileFlags::TRANSPORTING));
        assert!(tiles.flags(TileId::DoorwaySigil).unwrap().contains(TileFlags::SHAPE_CHANGING));
        assert!(tiles.flags(TileId::Chest).unwrap().contains(TileFlags::INTERACTABLE));
        assert!(!tiles.flags(TileId::Chest).unwrap().contains(TileFlags::PASSABLE));
        assert!(tiles.flags(TileId::Wall).unwrap().is_empty());
        assert!(tiles.flags(TileId::Embers).unwrap().contains(TileFlags::DAMAGING));
    }

    #[test]
    fn test_satisfies_reads_terrain_only() {
        let tiles = Catalogs::standard().tiles;
        let mut grid = LayeredGrid::new(TileLayer::filled(5, TileId::Wall));
        let cell = grid.coord(1, 1);
        grid.actors_mut()[cell] = TileId::Player;
        assert!(!tiles.satisfies(&grid, cell, TileFlags::PASSABLE).unwrap());

        grid.terrain_mut()[cell] = TileId::StoneFlooring;
        assert!(tiles
            .satisfies(&grid, cell, TileFlags::PASSABLE | TileFlags::INTERACTABLE)
            .unwrap());
    }
}
