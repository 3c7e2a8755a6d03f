//! # Hazards
//!
//! Traps and lingering effects that fire projectiles on a timer.
//!
//! A hazard is **dormant** while its countdown runs, **primed** once the
//! timer task reports that it reached its period, and **triggered** when the
//! room session consumes that report: the hazard spawns its payloads as
//! [`MovingObject`]s and either goes back to dormant or, if single-shot, is
//! removed. Payloads are hazards too; they never self-arm (negative period)
//! and only carry damage, energy and what happens when they stop.

pub mod projectile;
pub mod timer;

pub use projectile::*;
pub use timer::*;

use crate::content::Catalogs;
use crate::game::grid::LayeredGrid;
use crate::game::specimen::Specimen;
use crate::game::tiles::{TileCatalog, TileFlags, TileId};
use crate::game::{Direction, PlaneCoord};
use crate::generation::items::is_reserved;
use crate::{CryptwalkError, CryptwalkResult};
use bitflags::bitflags;
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};
use tokio::runtime::Handle;
use tokio::time::Duration;

/// Identifier of an armed hazard, unique within a session.
pub type HazardId = u32;

bitflags! {
    /// How a hazard fires and what its payload does when it stops.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct HazardBehavior: u8 {
        /// Fire one payload along the bearing to the avatar
        const ARM_AND_FIRE = 1 << 0;
        /// Fire one payload in each of the eight compass directions
        const BURST        = 1 << 1;
        /// Payload flies over non-passable terrain
        const LOB          = 1 << 2;
        /// Payload arms its spawns where it comes to rest
        const DISSIPATE    = 1 << 3;
        /// Payload rewrites the terrain it hits
        const BLAST        = 1 << 4;
        /// Hazard is removed after firing once
        const SINGLE_SHOT  = 1 << 5;
    }
}

/// Static description of a hazard or payload identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HazardDescriptor {
    pub behavior: HazardBehavior,
    /// Seconds between firings; negative never self-arms
    pub period: i32,
    pub damage: Option<u32>,
    pub energy: Option<u32>,
    pub spawns: Vec<TileId>,
    /// Tile left behind by a blast or by a spent single-shot hazard
    pub aftermath: Option<TileId>,
}

impl HazardDescriptor {
    pub fn new(behavior: HazardBehavior, period: i32) -> Self {
        Self {
            behavior,
            period,
            damage: None,
            energy: None,
            spawns: Vec::new(),
            aftermath: None,
        }
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn with_energy(mut self, energy: u32) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn spawning(mut self, spawns: &[TileId]) -> Self {
        self.spawns = spawns.to_vec();
        self
    }

    pub fn leaving(mut self, aftermath: TileId) -> Self {
        self.aftermath = Some(aftermath);
        self
    }

    pub fn self_arming(&self) -> bool {
        self.period >= 0
    }
}

/// Mapping from hazard identity to descriptor. A miss is reported as
/// [`CryptwalkError::MissingHazard`].
#[derive(Debug, Clone, Default)]
pub struct HazardCatalog {
    entries: HashMap<TileId, HazardDescriptor>,
}

impl HazardCatalog {
    pub fn new(entries: impl IntoIterator<Item = (TileId, HazardDescriptor)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, kind: TileId) -> CryptwalkResult<&HazardDescriptor> {
        self.entries
            .get(&kind)
            .ok_or(CryptwalkError::MissingHazard(kind))
    }

    pub fn contains(&self, kind: TileId) -> bool {
        self.entries.contains_key(&kind)
    }

    /// Self-arming, aimed hazards the room builder may place, in a stable
    /// order.
    pub fn placeable_traps(&self) -> Vec<TileId> {
        let mut traps: Vec<TileId> = self
            .entries
            .iter()
            .filter(|(_, descriptor)| {
                descriptor.self_arming()
                    && descriptor.behavior.contains(HazardBehavior::ARM_AND_FIRE)
            })
            .map(|(&kind, _)| kind)
            .collect();
        traps.sort();
        traps
    }
}

/// A hazard placed in the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmedHazard {
    pub id: HazardId,
    pub kind: TileId,
    pub position: PlaneCoord,
}

/// Something the hazard engine did during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HazardEvent {
    Fired {
        kind: TileId,
        at: PlaneCoord,
        projectiles: usize,
    },
    AvatarHit {
        by: TileId,
        damage: u32,
        remaining: u32,
    },
    Blasted {
        at: PlaneCoord,
        into: TileId,
    },
    Dissipated {
        kind: TileId,
        at: PlaneCoord,
    },
}

impl HazardEvent {
    /// Player-facing message, for the events worth one.
    pub fn message(&self, tiles: &TileCatalog) -> Option<String> {
        match self {
            HazardEvent::AvatarHit { by, damage, .. } => {
                let name = tiles
                    .get(*by)
                    .map(|descriptor| descriptor.description.clone())
                    .unwrap_or_else(|_| "something".to_string());
                Some(format!("(Hit by a {} for {}!)", name, damage))
            }
            HazardEvent::Blasted { .. } => Some("(Something explodes nearby.)".to_string()),
            _ => None,
        }
    }
}

/// Owns the armed hazards and the projectiles of one room session.
///
/// The timer task is started lazily on the first self-arming hazard, on the
/// runtime passed at construction. Without a runtime hazards only fire when
/// [`HazardEngine::trigger`] is called directly.
pub struct HazardEngine {
    hazards: BTreeMap<HazardId, ArmedHazard>,
    objects: Vec<MovingObject>,
    next_id: HazardId,
    runtime: Option<Handle>,
    interval: Duration,
    timer: Option<HazardTimer>,
}

impl HazardEngine {
    pub fn new(runtime: Option<Handle>, interval: Duration) -> Self {
        Self {
            hazards: BTreeMap::new(),
            objects: Vec::new(),
            next_id: 0,
            runtime,
            interval,
            timer: None,
        }
    }

    /// Arms a hazard at `position`, writing its identity into the terrain.
    /// A hazard already armed there is replaced. Self-arming hazards start
    /// counting with `elapsed` seconds of head start. Doorways, sigils,
    /// sliding doors and chests are never overwritten.
    pub fn arm(
        &mut self,
        kind: TileId,
        position: PlaneCoord,
        elapsed: u32,
        grid: &mut LayeredGrid,
        catalogs: &Catalogs,
    ) -> CryptwalkResult<HazardId> {
        let descriptor = catalogs.hazards.get(kind)?;
        let current = grid.terrain()[position];
        if is_reserved(current) {
            return Err(CryptwalkError::InvalidState(format!(
                "cannot arm {:?} over {:?} at {}",
                kind, current, position
            )));
        }
        if let Some(previous) = self.hazard_at(position) {
            self.remove_hazard(previous, grid, None);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.hazards.insert(id, ArmedHazard { id, kind, position });
        grid.terrain_mut()[position] = kind;

        if descriptor.self_arming() {
            self.ensure_timer();
            self.send(TimerCommand::Arm {
                id,
                period: descriptor.period.unsigned_abs(),
                elapsed,
            });
        }
        debug!("armed {:?} #{} at {}", kind, id, position);
        Ok(id)
    }

    /// Forgets a hazard without touching the terrain.
    pub fn disarm(&mut self, id: HazardId) -> Option<ArmedHazard> {
        let hazard = self.hazards.remove(&id)?;
        self.send(TimerCommand::Disarm { id });
        Some(hazard)
    }

    /// Drains primed signals from the timer, fires each primed hazard and
    /// acknowledges the batch.
    pub fn poll(
        &mut self,
        grid: &mut LayeredGrid,
        avatar: &Specimen,
        catalogs: &Catalogs,
    ) -> CryptwalkResult<Vec<HazardEvent>> {
        let mut events = Vec::new();
        loop {
            let signal = match self.timer.as_mut() {
                Some(timer) => timer.try_signal(),
                None => None,
            };
            let Some(TimerSignal::Primed(ids)) = signal else {
                break;
            };
            for id in ids {
                events.extend(self.trigger(id, grid, avatar, catalogs)?);
            }
            self.send(TimerCommand::Acknowledge);
        }
        Ok(events)
    }

    /// Fires a hazard: spawns its payloads toward the avatar and/or in every
    /// direction, then removes it if it is single-shot. Unknown ids are
    /// ignored; they were removed after priming.
    pub fn trigger(
        &mut self,
        id: HazardId,
        grid: &mut LayeredGrid,
        avatar: &Specimen,
        catalogs: &Catalogs,
    ) -> CryptwalkResult<Vec<HazardEvent>> {
        let Some(hazard) = self.hazards.get(&id).copied() else {
            return Ok(Vec::new());
        };
        let descriptor = catalogs.hazards.get(hazard.kind)?;
        let bearings = bearings(descriptor.behavior, hazard.position, avatar.position);

        let mut projectiles = 0;
        for &spawn in &descriptor.spawns {
            let energy = catalogs.hazards.get(spawn)?.energy.unwrap_or(0);
            for &velocity in &bearings {
                self.objects
                    .push(MovingObject::new(spawn, hazard.position, velocity, energy));
                projectiles += 1;
            }
        }
        info!(
            "{:?} #{} fired {} projectile(s) from {}",
            hazard.kind, id, projectiles, hazard.position
        );

        if descriptor.behavior.contains(HazardBehavior::SINGLE_SHOT) {
            self.remove_hazard(id, grid, descriptor.aftermath);
        }

        Ok(vec![HazardEvent::Fired {
            kind: hazard.kind,
            at: hazard.position,
            projectiles,
        }])
    }

    /// Moves every projectile one cell and settles the ones that stop.
    ///
    /// A projectile that lands on the avatar deals its damage and stops; one
    /// that lands on non-passable terrain stops short of it (blasting the
    /// impacted cell if it can). Stopped projectiles dissipate into their
    /// spawns or vanish. Projectiles on the outer ring never dissipate: they
    /// are drawn there once and dropped on the following sweep.
    pub fn advance_projectiles(
        &mut self,
        grid: &mut LayeredGrid,
        avatar: &mut Specimen,
        catalogs: &Catalogs,
    ) -> CryptwalkResult<Vec<HazardEvent>> {
        let mut events = Vec::new();
        let objects = std::mem::take(&mut self.objects);
        let mut survivors = Vec::with_capacity(objects.len());

        for mut object in objects {
            let overlay = &mut grid.projectiles_mut()[object.position];
            if *overlay == object.kind {
                *overlay = TileId::Nil;
            }
            if object.reached_boundary() {
                continue;
            }

            let payload = catalogs.hazards.get(object.kind)?;
            if !object.is_spent() {
                let Some(next) = object.next_cell() else {
                    debug!("{:?} left the room at {}", object.kind, object.position);
                    continue;
                };
                object.spend();

                if next == avatar.position {
                    let damage = payload.damage.unwrap_or(0);
                    let remaining = avatar.take_damage(damage);
                    events.push(HazardEvent::AvatarHit {
                        by: object.kind,
                        damage,
                        remaining,
                    });
                    object.exhaust();
                } else if !payload.behavior.contains(HazardBehavior::LOB)
                    && !catalogs.tiles.satisfies(grid, next, TileFlags::PASSABLE)?
                {
                    object.exhaust();
                    if payload.behavior.contains(HazardBehavior::BLAST) {
                        if let Some(aftermath) = payload.aftermath {
                            grid.terrain_mut()[next] = aftermath;
                            events.push(HazardEvent::Blasted {
                                at: next,
                                into: aftermath,
                            });
                        }
                        if let Some(destroyed) = self.hazard_at(next) {
                            info!("blast at {} destroyed hazard #{}", next, destroyed);
                            self.remove_hazard(destroyed, grid, None);
                        }
                    }
                } else {
                    object.advance_to(next);
                }
            }

            if object.is_spent() {
                if payload.behavior.contains(HazardBehavior::DISSIPATE)
                    && self.can_settle(object.position, grid)
                {
                    for &spawn in &payload.spawns {
                        self.arm(spawn, object.position, 0, grid, catalogs)?;
                    }
                    events.push(HazardEvent::Dissipated {
                        kind: object.kind,
                        at: object.position,
                    });
                }
                continue;
            }

            grid.projectiles_mut()[object.position] = object.kind;
            survivors.push(object);
        }

        self.objects = survivors;
        Ok(events)
    }

    /// Id of the hazard armed at `position`, if any.
    pub fn hazard_at(&self, position: PlaneCoord) -> Option<HazardId> {
        self.hazards
            .values()
            .find(|hazard| hazard.position == position)
            .map(|hazard| hazard.id)
    }

    pub fn hazard(&self, id: HazardId) -> Option<&ArmedHazard> {
        self.hazards.get(&id)
    }

    pub fn hazards(&self) -> impl Iterator<Item = &ArmedHazard> {
        self.hazards.values()
    }

    pub fn objects(&self) -> &[MovingObject] {
        &self.objects
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Cancels the timer task, if one was started, and waits for it.
    pub async fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop().await;
            debug!("hazard timer stopped");
        }
    }

    /// A stopped projectile may leave its spawns only on an interior cell
    /// with no armed hazard and no reserved tile.
    fn can_settle(&self, position: PlaneCoord, grid: &LayeredGrid) -> bool {
        !position.is_on_border()
            && !is_reserved(grid.terrain()[position])
            && self.hazard_at(position).is_none()
    }

    fn remove_hazard(
        &mut self,
        id: HazardId,
        grid: &mut LayeredGrid,
        replacement: Option<TileId>,
    ) -> Option<ArmedHazard> {
        let hazard = self.disarm(id)?;
        if let Some(tile) = replacement {
            grid.terrain_mut()[hazard.position] = tile;
        }
        Some(hazard)
    }

    fn ensure_timer(&mut self) {
        if self.timer.is_some() {
            return;
        }
        if let Some(runtime) = &self.runtime {
            self.timer = Some(HazardTimer::spawn(runtime, self.interval));
            debug!("hazard timer started ({:?} interval)", self.interval);
        }
    }

    fn send(&self, command: TimerCommand) {
        if let Some(timer) = &self.timer {
            if !timer.send(command) {
                warn!("hazard timer is gone; dropped {:?}", command);
            }
        }
    }
}

fn bearings(behavior: HazardBehavior, from: PlaneCoord, target: PlaneCoord) -> Vec<(i32, i32)> {
    let mut velocities = Vec::new();
    if behavior.contains(HazardBehavior::ARM_AND_FIRE) {
        if let Some(direction) = Direction::toward(from, target) {
            velocities.push(direction.to_delta());
        }
    }
    if behavior.contains(HazardBehavior::BURST) {
        for direction in Direction::all() {
            let delta = direction.to_delta();
            if !velocities.contains(&delta) {
                velocities.push(delta);
            }
        }
    }
    velocities
}
