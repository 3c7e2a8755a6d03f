//! # Moving Objects
//!
//! Projectiles in flight. Each one moves a single cell per sweep along a fixed
//! velocity and pays one unit of energy per move, diagonal or not.

use crate::game::tiles::TileId;
use crate::game::PlaneCoord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovingObject {
    pub kind: TileId,
    pub position: PlaneCoord,
    pub velocity: (i32, i32),
    pub energy: u32,
    at_boundary: bool,
}

impl MovingObject {
    pub fn new(kind: TileId, position: PlaneCoord, velocity: (i32, i32), energy: u32) -> Self {
        Self {
            kind,
            position,
            velocity,
            energy,
            at_boundary: false,
        }
    }

    pub fn is_spent(&self) -> bool {
        self.energy == 0
    }

    /// Set once the object has moved onto the outer ring.
    pub fn reached_boundary(&self) -> bool {
        self.at_boundary
    }

    /// The next cell along the velocity, or None when either axis would be
    /// blocked by the grid bounds.
    pub fn next_cell(&self) -> Option<PlaneCoord> {
        let (dx, dy) = self.velocity;
        let next = self.position.offset(dx, dy);
        let moved_fully = next.x() == self.position.x() + dx && next.y() == self.position.y() + dy;
        (moved_fully && next != self.position).then_some(next)
    }

    /// Pays for one step.
    pub fn spend(&mut self) {
        self.energy = self.energy.saturating_sub(1);
    }

    /// Drops all remaining energy, as on impact.
    pub fn exhaust(&mut self) {
        self.energy = 0;
    }

    pub fn advance_to(&mut self, next: PlaneCoord) {
        self.position = next;
        if next.is_on_border() {
            self.at_boundary = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_cell_blocked_on_either_axis() {
        let dart = MovingObject::new(TileId::Dart, PlaneCoord::new(3, 0, 9), (1, -1), 5);
        assert_eq!(dart.next_cell(), None);

        let dart = MovingObject::new(TileId::Dart, PlaneCoord::new(3, 4, 9), (1, -1), 5);
        assert_eq!(dart.next_cell(), Some(PlaneCoord::new(4, 3, 9)));

        let resting = MovingObject::new(TileId::Dart, PlaneCoord::new(3, 4, 9), (0, 0), 5);
        assert_eq!(resting.next_cell(), None);
    }

    #[test]
    fn test_energy_bounds_position_changes() {
        let mut spark = MovingObject::new(TileId::Spark, PlaneCoord::new(1, 1, 30), (1, 1), 4);
        let mut moves = 0;
        while !spark.is_spent() {
            let Some(next) = spark.next_cell() else { break };
            spark.spend();
            spark.advance_to(next);
            moves += 1;
        }
        assert_eq!(moves, 4);
        assert_eq!(spark.position, PlaneCoord::new(5, 5, 30));
    }

    #[test]
    fn test_boundary_flag() {
        let mut rock = MovingObject::new(TileId::Rock, PlaneCoord::new(1, 4, 9), (-1, 0), 3);
        let next = rock.next_cell().unwrap();
        rock.advance_to(next);
        assert!(rock.reached_boundary());
        assert_eq!(rock.next_cell(), None);
    }
}
