//! # Game Module
//!
//! Room coordinates, tiles, grids, the dungeon graph and the per-room session.
//!
//! This module contains the fundamental building blocks of a Cryptwalk run:
//! - Plane and wall coordinates built on [`Bounded`] axes
//! - The tile catalog and the layered room grid
//! - The dungeon graph that links rooms through their doorways
//! - Room sessions, hazards and interactions

pub mod dungeon;
pub mod graph;
pub mod grid;
pub mod hazards;
pub mod interaction;
pub mod specimen;
pub mod state;
pub mod tiles;

pub use dungeon::*;
pub use graph::*;
pub use grid::*;
pub use hazards::*;
pub use interaction::*;
pub use specimen::*;
pub use state::*;
pub use tiles::*;

use crate::utils::Bounded;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A cell inside a room.
///
/// Both axes share the same bounds, so a coordinate can only ever address a
/// cell of the grid it was made for. Ordering is by `x`, then `y`.
///
/// # Examples
///
/// ```
/// use cryptwalk::{Direction, PlaneCoord};
///
/// let pos = PlaneCoord::new(0, 5, 9);
/// assert_eq!(pos.step(Direction::West), pos); // blocked by the edge
/// assert_eq!(pos.step(Direction::East), PlaneCoord::new(1, 5, 9));
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlaneCoord {
    x: Bounded,
    y: Bounded,
}

impl PlaneCoord {
    /// Creates a coordinate on a grid spanning `0..=max` on both axes.
    pub fn new(x: i32, y: i32, max: i32) -> Self {
        Self::with_bounds(x, y, 0, max)
    }

    /// Creates a coordinate with explicit shared bounds.
    pub fn with_bounds(x: i32, y: i32, min: i32, max: i32) -> Self {
        Self {
            x: Bounded::new(x, min, max),
            y: Bounded::new(y, min, max),
        }
    }

    pub fn x(self) -> i32 {
        self.x.value()
    }

    pub fn y(self) -> i32 {
        self.y.value()
    }

    /// Shared lower bound.
    pub fn min(self) -> i32 {
        self.x.min()
    }

    /// Shared upper bound.
    pub fn max(self) -> i32 {
        self.x.max()
    }

    /// Mutable access to the horizontal axis.
    pub fn x_mut(&mut self) -> &mut Bounded {
        &mut self.x
    }

    /// Mutable access to the vertical axis.
    pub fn y_mut(&mut self) -> &mut Bounded {
        &mut self.y
    }

    /// Moves each axis by its delta. An axis whose move would leave the
    /// bounds stays put; the other axis still moves.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.add(dx),
            y: self.y.add(dy),
        }
    }

    /// One step in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.to_delta();
        self.offset(dx, dy)
    }

    /// True when the coordinate lies on the outer ring.
    pub fn is_on_border(self) -> bool {
        self.x.at_bound() || self.y.at_bound()
    }
}

impl PartialEq for PlaneCoord {
    fn eq(&self, other: &Self) -> bool {
        (self.x, self.y) == (other.x, other.y)
    }
}

impl Eq for PlaneCoord {}

impl PartialOrd for PlaneCoord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PlaneCoord {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.x, self.y).cmp(&(other.x, other.y))
    }
}

impl Hash for PlaneCoord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

impl std::fmt::Display for PlaneCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x(), self.y())
    }
}

/// A side of a room's outer wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Round-robin order used when spreading doorways around a room.
    pub fn next(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Top,
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Left,
        }
    }

    pub fn all() -> [Side; 4] {
        [Side::Left, Side::Right, Side::Top, Side::Bottom]
    }
}

/// A cell pinned to one side of the outer wall, `u` cells along it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WallCoord {
    side: Side,
    u: Bounded,
}

impl WallCoord {
    /// Creates a wall coordinate on a wall spanning `0..=max`.
    pub fn new(side: Side, u: i32, max: i32) -> Self {
        Self {
            side,
            u: Bounded::new(u, 0, max),
        }
    }

    pub fn side(self) -> Side {
        self.side
    }

    pub fn u(self) -> i32 {
        self.u.value()
    }

    /// The plane cell this wall coordinate names on a grid of extent `max`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cryptwalk::{PlaneCoord, Side, WallCoord};
    ///
    /// let door = WallCoord::new(Side::Bottom, 4, 9);
    /// assert_eq!(door.to_plane(9), PlaneCoord::new(4, 9, 9));
    /// ```
    pub fn to_plane(self, max: i32) -> PlaneCoord {
        let u = self.u();
        match self.side {
            Side::Left => PlaneCoord::new(0, u, max),
            Side::Right => PlaneCoord::new(max, u, max),
            Side::Top => PlaneCoord::new(u, 0, max),
            Side::Bottom => PlaneCoord::new(u, max, max),
        }
    }

    /// Recovers the wall coordinate of a perimeter cell.
    ///
    /// Sides are checked left, right, top, bottom, so corners report the
    /// left or right wall. Interior cells yield `None`.
    pub fn from_plane(coord: PlaneCoord) -> Option<WallCoord> {
        let (min, max) = (coord.min(), coord.max());
        let span = max - min;
        let (side, u) = if coord.x() == min {
            (Side::Left, coord.y() - min)
        } else if coord.x() == max {
            (Side::Right, coord.y() - min)
        } else if coord.y() == min {
            (Side::Top, coord.x() - min)
        } else if coord.y() == max {
            (Side::Bottom, coord.x() - min)
        } else {
            return None;
        };
        Some(WallCoord::new(side, u, span))
    }
}

/// Directions for movement and projectile bearings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl Direction {
    /// Converts a direction to a `(dx, dy)` delta. North is `-y`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cryptwalk::Direction;
    ///
    /// assert_eq!(Direction::North.to_delta(), (0, -1));
    /// ```
    pub fn to_delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::Northeast => (1, -1),
            Direction::Northwest => (-1, -1),
            Direction::Southeast => (1, 1),
            Direction::Southwest => (-1, 1),
        }
    }

    /// Converts a delta to a direction.
    ///
    /// Returns None if the delta doesn't correspond to a valid direction.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
        match (dx, dy) {
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            (1, -1) => Some(Direction::Northeast),
            (-1, -1) => Some(Direction::Northwest),
            (1, 1) => Some(Direction::Southeast),
            (-1, 1) => Some(Direction::Southwest),
            _ => None,
        }
    }

    /// The compass bearing from `from` toward `to`, snapped to one of the
    /// eight directions. None when both are the same cell.
    pub fn toward(from: PlaneCoord, to: PlaneCoord) -> Option<Direction> {
        Self::from_delta((to.x() - from.x()).signum(), (to.y() - from.y()).signum())
    }

    /// Returns all 8 directions.
    pub fn all() -> Vec<Direction> {
        vec![
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
            Direction::Northeast,
            Direction::Northwest,
            Direction::Southeast,
            Direction::Southwest,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_coord_clamps_on_creation() {
        let pos = PlaneCoord::new(12, -3, 9);
        assert_eq!(pos.x(), 9);
        assert_eq!(pos.y(), 0);
    }

    #[test]
    fn test_plane_coord_ordering_is_x_then_y() {
        let a = PlaneCoord::new(1, 8, 9);
        let b = PlaneCoord::new(2, 0, 9);
        let c = PlaneCoord::new(2, 3, 9);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_offset_blocks_per_axis() {
        let pos = PlaneCoord::new(9, 4, 9);
        let moved = pos.offset(1, 1);
        assert_eq!(moved, PlaneCoord::new(9, 5, 9));
    }

    #[test]
    fn test_side_round_robin() {
        let mut side = Side::Left;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(side);
            side = side.next();
        }
        assert_eq!(seen, Side::all().to_vec());
        assert_eq!(side, Side::Left);
    }

    #[test]
    fn test_wall_coord_to_plane() {
        let max = 14;
        let expected = [
            (Side::Left, (0, 3)),
            (Side::Right, (14, 3)),
            (Side::Top, (3, 0)),
            (Side::Bottom, (3, 14)),
        ];
        for (side, (x, y)) in expected {
            let plane = WallCoord::new(side, 3, max).to_plane(max);
            assert_eq!(plane, PlaneCoord::new(x, y, max), "side {:?}", side);
        }
    }

    #[test]
    fn test_wall_plane_round_trip() {
        let max = 11;
        for side in Side::all() {
            for u in 1..max {
                let wall = WallCoord::new(side, u, max);
                let back = WallCoord::from_plane(wall.to_plane(max));
                assert_eq!(back, Some(wall), "side {:?} u {}", side, u);
            }
        }
        assert_eq!(WallCoord::from_plane(PlaneCoord::new(4, 4, max)), None);
    }

    #[test]
    fn test_direction_toward() {
        let from = PlaneCoord::new(2, 5, 9);
        assert_eq!(Direction::toward(from, PlaneCoord::new(7, 5, 9)), Some(Direction::East));
        assert_eq!(Direction::toward(from, PlaneCoord::new(0, 0, 9)), Some(Direction::Northwest));
        assert_eq!(Direction::toward(from, from), None);
    }

    #[test]
    fn test_direction_delta_round_trip() {
        for direction in Direction::all() {
            let (dx, dy) = direction.to_delta();
            assert_eq!(Direction::from_delta(dx, dy), Some(direction));
        }
    }
}
