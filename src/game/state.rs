//! # Room Session
//!
//! The controlling context of one room. Each tick applies one input event,
//! fires whatever the hazard clock primed, moves the projectiles and checks
//! whether the avatar survived.
//!
//! The session also answers the presentation queries: the topmost tile and
//! display symbol of every visible cell, descriptions for the info line and
//! the message log.

use crate::content::Catalogs;
use crate::game::graph::RoomId;
use crate::game::grid::LayeredGrid;
use crate::game::hazards::{HazardEngine, HazardEvent, HazardId};
use crate::game::interaction::{interact_with, InteractionEffect};
use crate::game::specimen::Specimen;
use crate::game::tiles::{ColorHint, TileFlags, TileId};
use crate::game::PlaneCoord;
use crate::generation::sigil_for;
use crate::input::InputEvent;
use crate::{CryptwalkError, CryptwalkResult};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::BTreeMap;
use std::sync::Arc;

/// What a session tick decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Keep ticking
    Playing,
    /// The avatar stepped onto a doorway
    Exited(PlaneCoord),
    /// The player asked to leave
    Quit,
    /// The avatar's life reached zero
    Died,
}

/// One cell as the renderer should draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    pub coord: PlaneCoord,
    pub tile: TileId,
    pub symbol: char,
    pub color: ColorHint,
}

/// State of the room the avatar is currently in.
pub struct RoomSession {
    room_id: RoomId,
    grid: LayeredGrid,
    doors: BTreeMap<PlaneCoord, RoomId>,
    avatar: Specimen,
    focus: Option<PlaneCoord>,
    hazards: HazardEngine,
    rng: StdRng,
    catalogs: Arc<Catalogs>,
    messages: Vec<String>,
    turn: u64,
}

impl RoomSession {
    /// Starts a session: places the avatar on the actor layer and arms every
    /// self-arming hazard found in the terrain, each with a random head start
    /// of a quarter, a third, a half or all of its period.
    pub fn new(
        room_id: RoomId,
        grid: LayeredGrid,
        doors: BTreeMap<PlaneCoord, RoomId>,
        avatar: Specimen,
        rng: StdRng,
        catalogs: Arc<Catalogs>,
        hazards: HazardEngine,
    ) -> CryptwalkResult<Self> {
        let mut session = Self {
            room_id,
            grid,
            doors,
            avatar,
            focus: None,
            hazards,
            rng,
            catalogs,
            messages: Vec::new(),
            turn: 0,
        };
        let position = session.avatar.position;
        session.grid.actors_mut()[position] = TileId::Player;
        session.arm_room_hazards()?;
        session.push_message(format!("You enter room {}.", room_id));
        info!(
            "room {} session started with {} hazard(s)",
            room_id,
            session.hazards.hazards().count()
        );
        Ok(session)
    }

    fn arm_room_hazards(&mut self) -> CryptwalkResult<()> {
        let traps: Vec<(PlaneCoord, TileId)> = self
            .grid
            .cells()
            .map(|coord| (coord, self.grid.terrain()[coord]))
            .filter(|(_, tile)| {
                self.catalogs
                    .hazards
                    .get(*tile)
                    .is_ok_and(|descriptor| descriptor.self_arming())
            })
            .collect();

        for (coord, kind) in traps {
            let period = self.catalogs.hazards.get(kind)?.period.unsigned_abs();
            let elapsed = period / self.rng.gen_range(1..=4u32);
            self.hazards
                .arm(kind, coord, elapsed, &mut self.grid, &self.catalogs)?;
        }
        Ok(())
    }

    /// Advances the session by one tick.
    pub fn tick(&mut self, input: InputEvent) -> CryptwalkResult<SessionStatus> {
        self.turn += 1;

        match input {
            InputEvent::Quit => return Ok(SessionStatus::Quit),
            InputEvent::Interact => self.interact(),
            InputEvent::None => {}
            movement => {
                if let Some(direction) = movement.direction() {
                    let target = self.avatar.position.step(direction);
                    if let Some(exit) = self.move_avatar(target)? {
                        info!("left room {} through {}", self.room_id, exit);
                        return Ok(SessionStatus::Exited(exit));
                    }
                }
            }
        }

        let mut events = self
            .hazards
            .poll(&mut self.grid, &self.avatar, &self.catalogs)?;
        events.extend(self.hazards.advance_projectiles(
            &mut self.grid,
            &mut self.avatar,
            &self.catalogs,
        )?);
        self.report(&events);

        if self.avatar.is_alive() {
            Ok(SessionStatus::Playing)
        } else {
            info!("avatar died in room {} on turn {}", self.room_id, self.turn);
            Ok(SessionStatus::Died)
        }
    }

    fn interact(&mut self) {
        let Some(focus) = self.focus else {
            return;
        };
        let effect = interact_with(&mut self.rng, &self.grid, &self.catalogs.rewards, focus);
        if let Some(message) = effect.message() {
            self.push_message(message.to_string());
        }
        if let InteractionEffect::Acquired { item, .. } = effect {
            debug!("picked up {} (value {})", item.name, item.value);
            self.avatar.acquire(item);
        }
    }

    /// Tries to move the avatar onto `target`. Returns the doorway when the
    /// move leaves the room. Bumping into plain blocking terrain is silent.
    fn move_avatar(&mut self, target: PlaneCoord) -> CryptwalkResult<Option<PlaneCoord>> {
        let tile = self.grid.terrain()[target];
        let flags = self.catalogs.tiles.flags(tile)?;

        if flags.contains(TileFlags::INTERACTABLE) {
            if self.focus != Some(target) {
                let info = self.describe(target)?;
                self.push_message(info);
            }
            self.focus = Some(target);
            return Ok(None);
        }
        self.focus = None;
        if !flags.contains(TileFlags::PASSABLE) {
            return Ok(None);
        }

        let info = self.describe(target)?;
        self.push_message(info);
        let from = self.avatar.position;
        self.grid.actors_mut()[from] = TileId::Nil;
        self.avatar.position = target;
        self.grid.actors_mut()[target] = TileId::Player;

        if flags.contains(TileFlags::TRANSPORTING) {
            return Ok(Some(target));
        }
        if flags.contains(TileFlags::DAMAGING) {
            let damage = self.catalogs.hazards.get(tile)?.damage.unwrap_or(0);
            let remaining = self.avatar.take_damage(damage);
            self.report(&[HazardEvent::AvatarHit {
                by: tile,
                damage,
                remaining,
            }]);
        }
        Ok(None)
    }

    /// Fires a hazard immediately, as if the clock had primed it.
    pub fn trigger_hazard(&mut self, id: HazardId) -> CryptwalkResult<()> {
        let events = self
            .hazards
            .trigger(id, &mut self.grid, &self.avatar, &self.catalogs)?;
        self.report(&events);
        Ok(())
    }

    fn report(&mut self, events: &[HazardEvent]) {
        for event in events {
            if let Some(message) = event.message(&self.catalogs.tiles) {
                self.push_message(message);
            }
        }
    }

    fn push_message(&mut self, message: String) {
        self.messages.push(message);
        if self.messages.len() > crate::config::MAX_MESSAGES {
            self.messages.remove(0);
        }
    }

    /// Info-line text for the terrain at `coord`.
    ///
    /// Doorways name the room they lead to and sigils borrow the name of
    /// their own doorway. A sealed doorway reads `(sealed)`.
    pub fn describe(&self, coord: PlaneCoord) -> CryptwalkResult<String> {
        let tile = self.grid.terrain()[coord];
        let descriptor = self.catalogs.tiles.get(tile)?;

        if descriptor.flags.contains(TileFlags::INTERACTABLE) {
            return Ok(format!(
                "(Press e to interact with {})",
                descriptor.description
            ));
        }
        if descriptor.flags.contains(TileFlags::TRANSPORTING) {
            return self.door_label(coord);
        }
        if descriptor.flags.contains(TileFlags::SHAPE_CHANGING) {
            if let Some(door) = self.door_of_sigil(coord) {
                return self.door_label(door);
            }
        }
        Ok(descriptor.description.clone())
    }

    fn door_label(&self, door: PlaneCoord) -> CryptwalkResult<String> {
        let destination = self
            .doors
            .get(&door)
            .ok_or(CryptwalkError::UnassignedDoor {
                room: self.room_id,
                door,
            })?;
        let mut label = format!("\"Room {}\"", destination);
        if self.grid.terrain()[door] == TileId::SlidingDoor {
            label.push_str(" (sealed)");
        }
        Ok(label)
    }

    fn door_of_sigil(&self, sigil: PlaneCoord) -> Option<PlaneCoord> {
        self.doors
            .keys()
            .copied()
            .find(|&door| sigil_for(door) == sigil)
    }

    /// Glyph to draw at `coord`. Sigils show their doorway's letter: `A` for
    /// the first door in coordinate order, `B` for the next and so on.
    pub fn display_symbol(&self, coord: PlaneCoord) -> CryptwalkResult<char> {
        let tile = self.grid.top_tile(coord);
        let descriptor = self.catalogs.tiles.get(tile)?;
        if descriptor.flags.contains(TileFlags::SHAPE_CHANGING) {
            if let Some(door) = self.door_of_sigil(coord) {
                let rank = self.doors.keys().take_while(|&&d| d != door).count();
                return Ok(char::from_u32('A' as u32 + rank as u32).unwrap_or(descriptor.symbol));
            }
        }
        Ok(descriptor.symbol)
    }

    /// Every non-empty cell in row-major order.
    pub fn visible_cells(&self) -> CryptwalkResult<Vec<CellView>> {
        let mut cells = Vec::with_capacity(self.grid.cells().len());
        for coord in self.grid.cells() {
            let tile = self.grid.top_tile(coord);
            if tile == TileId::Nil {
                continue;
            }
            cells.push(CellView {
                coord,
                tile,
                symbol: self.display_symbol(coord)?,
                color: self.catalogs.tiles.get(tile)?.color,
            });
        }
        Ok(cells)
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn grid(&self) -> &LayeredGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut LayeredGrid {
        &mut self.grid
    }

    pub fn doors(&self) -> &BTreeMap<PlaneCoord, RoomId> {
        &self.doors
    }

    pub fn avatar(&self) -> &Specimen {
        &self.avatar
    }

    pub fn focus(&self) -> Option<PlaneCoord> {
        self.focus
    }

    pub fn hazards(&self) -> &HazardEngine {
        &self.hazards
    }

    pub fn hazards_mut(&mut self) -> &mut HazardEngine {
        &mut self.hazards
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// The most recent message.
    pub fn info_line(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Stops the hazard timer and hands back the avatar.
    pub async fn close(mut self) -> Specimen {
        self.hazards.stop().await;
        debug!("room {} session closed after {} turn(s)", self.room_id, self.turn);
        self.avatar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid::TileLayer;
    use rand::SeedableRng;
    use tokio::time::Duration;

    /// A walled 9×9 floor with doorways on the left and top walls.
    fn room() -> (LayeredGrid, BTreeMap<PlaneCoord, RoomId>) {
        let mut terrain = TileLayer::filled(9, TileId::StoneFlooring);
        for coord in terrain.cells().collect::<Vec<_>>() {
            if coord.is_on_border() {
                terrain[coord] = TileId::Wall;
            }
        }
        let mut doors = BTreeMap::new();
        for (x, y, destination) in [(0, 4, 3), (4, 0, 7)] {
            let door = terrain.coord(x, y);
            terrain[door] = TileId::Doorway;
            terrain[sigil_for(door)] = TileId::DoorwaySigil;
            doors.insert(door, destination);
        }
        (LayeredGrid::new(terrain), doors)
    }

    fn session_at(
        grid: LayeredGrid,
        doors: BTreeMap<PlaneCoord, RoomId>,
        x: i32,
        y: i32,
    ) -> RoomSession {
        let avatar = Specimen::new(grid.coord(x, y), 100);
        RoomSession::new(
            2,
            grid,
            doors,
            avatar,
            StdRng::seed_from_u64(42),
            Arc::new(Catalogs::standard()),
            HazardEngine::new(None, Duration::from_secs(1)),
        )
        .unwrap()
    }

    #[test]
    fn test_avatar_is_drawn_on_top() {
        let (grid, doors) = room();
        let session = session_at(grid, doors, 4, 4);
        let center = session.grid().coord(4, 4);
        assert_eq!(session.grid().top_tile(center), TileId::Player);
        assert_eq!(session.display_symbol(center).unwrap(), '*');
        assert_eq!(session.info_line(), Some("You enter room 2."));
    }

    #[test]
    fn test_walls_block_and_floor_moves() {
        let (grid, doors) = room();
        let mut session = session_at(grid, doors, 1, 1);

        let before = session.messages().len();
        assert_eq!(session.tick(InputEvent::MoveLeft).unwrap(), SessionStatus::Playing);
        assert_eq!(session.avatar().position, session.grid().coord(1, 1));
        assert_eq!(session.messages().len(), before);
        assert_eq!(session.info_line(), Some("You enter room 2."));

        session.tick(InputEvent::MoveDown).unwrap();
        assert_eq!(session.avatar().position, session.grid().coord(1, 2));
        assert_eq!(session.info_line(), Some("stone floor"));
        assert_eq!(session.grid().top_tile(session.grid().coord(1, 1)), TileId::StoneFlooring);
    }

    #[test]
    fn test_doorway_exits_room() {
        let (grid, doors) = room();
        let mut session = session_at(grid, doors, 1, 4);
        let status = session.tick(InputEvent::MoveLeft).unwrap();
        assert_eq!(status, SessionStatus::Exited(session.grid().coord(0, 4)));
        assert_eq!(session.info_line(), Some("\"Room 3\""));
    }

    #[test]
    fn test_quit_and_idle() {
        let (grid, doors) = room();
        let mut session = session_at(grid, doors, 4, 4);
        assert_eq!(session.tick(InputEvent::None).unwrap(), SessionStatus::Playing);
        assert_eq!(session.tick(InputEvent::Quit).unwrap(), SessionStatus::Quit);
        assert_eq!(session.turn(), 2);
    }

    #[test]
    fn test_chest_becomes_focus_and_yields_item() {
        let (mut grid, doors) = room();
        let chest = grid.coord(5, 4);
        grid.terrain_mut()[chest] = TileId::Chest;
        let mut session = session_at(grid, doors, 4, 4);

        session.tick(InputEvent::MoveRight).unwrap();
        assert_eq!(session.avatar().position, session.grid().coord(4, 4));
        assert_eq!(session.focus(), Some(chest));
        assert_eq!(
            session.info_line(),
            Some("(Press e to interact with mysterious chest)")
        );

        session.tick(InputEvent::Interact).unwrap();
        assert_eq!(session.avatar().items.len(), 1);
        let name = &session.avatar().items[0].name;
        assert_eq!(session.info_line().unwrap(), format!("(Obtained {}!)", name));
    }

    #[test]
    fn test_interact_without_focus_does_nothing() {
        let (grid, doors) = room();
        let mut session = session_at(grid, doors, 4, 4);
        let before = session.messages().len();
        session.tick(InputEvent::Interact).unwrap();
        assert_eq!(session.messages().len(), before);
    }

    #[test]
    fn test_sigil_descriptions_and_letters() {
        let (mut grid, doors) = room();
        let left = grid.coord(0, 4);
        let top = grid.coord(4, 0);
        grid.terrain_mut()[top] = TileId::SlidingDoor;
        let session = session_at(grid, doors, 4, 4);

        assert_eq!(session.describe(sigil_for(left)).unwrap(), "\"Room 3\"");
        assert_eq!(
            session.describe(sigil_for(top)).unwrap(),
            "\"Room 7\" (sealed)"
        );
        assert_eq!(
            session.describe(top).unwrap(),
            "(Press e to interact with sliding door)"
        );
        assert_eq!(session.display_symbol(sigil_for(left)).unwrap(), 'A');
        assert_eq!(session.display_symbol(sigil_for(top)).unwrap(), 'B');
    }

    #[test]
    fn test_unassigned_doorway_is_reported() {
        let (grid, _) = room();
        let session = session_at(grid, BTreeMap::new(), 4, 4);
        let door = session.grid().coord(0, 4);
        assert!(matches!(
            session.describe(door),
            Err(CryptwalkError::UnassignedDoor { room: 2, .. })
        ));
        assert_eq!(session.describe(sigil_for(door)).unwrap(), "door sigil");
    }

    #[test]
    fn test_visible_cells_cover_the_room() {
        let (grid, doors) = room();
        let session = session_at(grid, doors, 4, 4);
        let cells = session.visible_cells().unwrap();
        assert_eq!(cells.len(), 81);
        let doorway = cells
            .iter()
            .find(|cell| cell.tile == TileId::Doorway)
            .unwrap();
        assert_eq!(doorway.symbol, ' ');
        assert!(cells.iter().any(|cell| cell.tile == TileId::Player));
    }

    #[test]
    fn test_traps_are_armed_on_entry() {
        let (mut grid, doors) = room();
        let trap = grid.coord(4, 6);
        grid.terrain_mut()[trap] = TileId::DartTrap;
        let session = session_at(grid, doors, 4, 2);
        let armed: Vec<_> = session.hazards().hazards().collect();
        assert_eq!(armed.len(), 1);
        assert_eq!(armed[0].position, trap);
        assert!(!session.hazards().timer_running());
    }

    #[test]
    fn test_dart_hits_avatar_through_ticks() {
        let (mut grid, doors) = room();
        let trap = grid.coord(4, 6);
        grid.terrain_mut()[trap] = TileId::DartTrap;
        let mut session = session_at(grid, doors, 4, 2);
        let id = session.hazards().hazard_at(trap).unwrap();

        session.trigger_hazard(id).unwrap();
        for _ in 0..6 {
            session.tick(InputEvent::None).unwrap();
        }
        assert_eq!(session.avatar().life, 95);
        assert!(session.hazards().objects().is_empty());
        assert_eq!(session.info_line(), Some("(Hit by a dart for 5!)"));
    }

    #[test]
    fn test_embers_burn_on_contact() {
        let (mut grid, doors) = room();
        let embers = grid.coord(5, 4);
        grid.terrain_mut()[embers] = TileId::Embers;
        let mut session = session_at(grid, doors, 4, 4);
        session.tick(InputEvent::MoveRight).unwrap();
        assert_eq!(session.avatar().position, embers);
        assert_eq!(session.avatar().life, 99);
    }

    #[test]
    fn test_death_ends_session() {
        let (grid, doors) = room();
        let avatar = Specimen::new(grid.coord(4, 4), 1);
        let mut session = RoomSession::new(
            0,
            grid,
            doors,
            avatar,
            StdRng::seed_from_u64(1),
            Arc::new(Catalogs::standard()),
            HazardEngine::new(None, Duration::from_secs(1)),
        )
        .unwrap();
        let embers = session.grid().coord(4, 5);
        session.grid_mut().terrain_mut()[embers] = TileId::Embers;
        assert_eq!(session.tick(InputEvent::MoveDown).unwrap(), SessionStatus::Died);
    }

    #[test]
    fn test_message_log_is_capped() {
        let (grid, doors) = room();
        let mut session = session_at(grid, doors, 1, 1);
        for step in 0..(crate::config::MAX_MESSAGES + 20) {
            let input = if step % 2 == 0 {
                InputEvent::MoveDown
            } else {
                InputEvent::MoveUp
            };
            session.tick(input).unwrap();
        }
        assert_eq!(session.messages().len(), crate::config::MAX_MESSAGES);
    }

    #[test]
    fn test_close_returns_avatar() {
        let (grid, doors) = room();
        let session = session_at(grid, doors, 4, 4);
        let avatar = tokio_test::block_on(session.close());
        assert_eq!(avatar.life, 100);
    }
}
