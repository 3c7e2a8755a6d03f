//! # Dungeon Graph
//!
//! Which door of which room leads where. Rooms are allocated ids in the order
//! they are discovered and records are only ever added, so ids are stable for
//! the whole run and the graph can be walked back through any door already
//! linked.

use crate::game::PlaneCoord;
use crate::{CryptwalkError, CryptwalkResult};
use log::debug;
use std::collections::BTreeMap;

/// Index of a room in discovery order.
pub type RoomId = u32;

/// What the graph knows about one room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomRecord {
    pub id: RoomId,
    /// Door coordinate → destination room
    pub doors: BTreeMap<PlaneCoord, RoomId>,
    /// The sealed door leading back to the room this one was entered from
    pub return_door: Option<PlaneCoord>,
    pub entered_from: Option<RoomId>,
    /// Whether the room's layout has been generated and its doors linked
    pub built: bool,
}

/// Arena of room records indexed by [`RoomId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DungeonGraph {
    rooms: Vec<RoomRecord>,
}

impl DungeonGraph {
    /// A graph holding only the starting room, id 0.
    pub fn new() -> Self {
        let mut graph = Self { rooms: Vec::new() };
        graph.allocate();
        graph
    }

    /// Reserves the next room id.
    pub fn allocate(&mut self) -> RoomId {
        let id = self.rooms.len() as RoomId;
        self.rooms.push(RoomRecord {
            id,
            ..RoomRecord::default()
        });
        id
    }

    /// The id the next allocation will return.
    pub fn next_free(&self) -> RoomId {
        self.rooms.len() as RoomId
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn room(&self, id: RoomId) -> CryptwalkResult<&RoomRecord> {
        self.rooms
            .get(id as usize)
            .ok_or(CryptwalkError::UnknownRoom(id))
    }

    fn room_mut(&mut self, id: RoomId) -> CryptwalkResult<&mut RoomRecord> {
        self.rooms
            .get_mut(id as usize)
            .ok_or(CryptwalkError::UnknownRoom(id))
    }

    pub fn is_built(&self, id: RoomId) -> bool {
        self.rooms.get(id as usize).is_some_and(|room| room.built)
    }

    /// Records that `door` in `room` leads to `destination`.
    pub fn link(
        &mut self,
        room: RoomId,
        door: PlaneCoord,
        destination: RoomId,
    ) -> CryptwalkResult<()> {
        self.room(destination)?;
        self.room_mut(room)?.doors.insert(door, destination);
        debug!("room {} door {} -> room {}", room, door, destination);
        Ok(())
    }

    /// Links a freshly generated room's doors.
    ///
    /// Entered from another room, the last door in `doors` becomes the sealed
    /// return door leading back; every other door gets a newly allocated room.
    /// Returns the return door, if any.
    pub fn populate(
        &mut self,
        room: RoomId,
        doors: &[PlaneCoord],
        entered_from: Option<RoomId>,
    ) -> CryptwalkResult<Option<PlaneCoord>> {
        let (return_door, onward) = match (entered_from, doors.split_last()) {
            (Some(previous), Some((&last, rest))) => {
                self.link(room, last, previous)?;
                (Some(last), rest)
            }
            _ => (None, doors),
        };

        for &door in onward {
            let destination = self.allocate();
            self.link(room, door, destination)?;
        }

        let record = self.room_mut(room)?;
        record.return_door = return_door;
        record.entered_from = entered_from;
        record.built = true;
        Ok(return_door)
    }

    /// Where `door` in `room` leads.
    pub fn resolve(&self, room: RoomId, door: PlaneCoord) -> CryptwalkResult<RoomId> {
        self.room(room)?
            .doors
            .get(&door)
            .copied()
            .ok_or(CryptwalkError::UnassignedDoor { room, door })
    }
}

impl Default for DungeonGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn door(x: i32, y: i32) -> PlaneCoord {
        PlaneCoord::new(x, y, 14)
    }

    #[test]
    fn test_starting_room_exists() {
        let graph = DungeonGraph::new();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.next_free(), 1);
        assert!(!graph.is_built(0));
    }

    #[test]
    fn test_first_room_assigns_every_door() {
        let mut graph = DungeonGraph::new();
        let doors = [door(0, 3), door(14, 5), door(7, 0)];
        let ret = graph.populate(0, &doors, None).unwrap();
        assert_eq!(ret, None);
        assert_eq!(graph.resolve(0, doors[0]).unwrap(), 1);
        assert_eq!(graph.resolve(0, doors[1]).unwrap(), 2);
        assert_eq!(graph.resolve(0, doors[2]).unwrap(), 3);
        assert_eq!(graph.next_free(), 4);
    }

    #[test]
    fn test_return_door_leads_back() {
        let mut graph = DungeonGraph::new();
        let doors = [door(0, 3), door(14, 5)];
        graph.populate(0, &doors, None).unwrap();
        let next = graph.resolve(0, doors[1]).unwrap();

        let inner = [door(0, 9), door(3, 14), door(14, 2)];
        let ret = graph.populate(next, &inner, Some(0)).unwrap();
        assert_eq!(ret, Some(inner[2]));
        assert_eq!(graph.resolve(next, inner[2]).unwrap(), 0);
        assert_eq!(graph.room(next).unwrap().entered_from, Some(0));
        assert!(graph.resolve(next, inner[0]).unwrap() > next);
    }

    #[test]
    fn test_unassigned_door_is_an_error() {
        let graph = DungeonGraph::new();
        match graph.resolve(0, door(0, 1)) {
            Err(CryptwalkError::UnassignedDoor { room: 0, .. }) => {}
            other => panic!("expected unassigned door, got {:?}", other),
        }
        assert!(matches!(graph.room(5), Err(CryptwalkError::UnknownRoom(5))));
    }
}
