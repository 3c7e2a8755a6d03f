//! # Content
//!
//! The standard tile, hazard and reward catalogs.
//!
//! Catalogs are plain values built once at start-up and handed to the dungeon
//! driver. Nothing reads them through globals, so tests can swap in trimmed
//! or broken catalogs.

use crate::game::hazards::{HazardBehavior, HazardCatalog, HazardDescriptor};
use crate::game::interaction::{Item, ItemId, RewardCatalog};
use crate::game::tiles::{ColorHint, TileCatalog, TileDescriptor, TileFlags, TileId};

/// Relative weights for filling a room's interior.
pub const ROOM_TILE_WEIGHTS: [(TileId, f64); 5] = [
    (TileId::StoneRubblePile, 60.0),
    (TileId::StoneFlooring, 100.0),
    (TileId::CrackedStoneFlooring, 40.0),
    (TileId::DecoratedStoneFlooring, 30.0),
    (TileId::StonePillar, 2.0),
];

/// Every catalog a dungeon needs.
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub tiles: TileCatalog,
    pub hazards: HazardCatalog,
    pub rewards: RewardCatalog,
}

impl Catalogs {
    pub fn standard() -> Self {
        Self {
            tiles: standard_tiles(),
            hazards: standard_hazards(),
            rewards: standard_rewards(),
        }
    }
}

impl Default for Catalogs {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_tiles() -> TileCatalog {
    use ColorHint::*;
    use TileId::*;

    let none = TileFlags::empty();
    let floor = TileFlags::PASSABLE;

    TileCatalog::new([
        (Wall, TileDescriptor::new('#', none, "stone wall", WhiteOnBlack)),
        (
            Doorway,
            TileDescriptor::new(
                ' ',
                TileFlags::PASSABLE | TileFlags::TRANSPORTING,
                "doorway",
                WhiteOnBlack,
            ),
        ),
        (
            DoorwaySigil,
            TileDescriptor::new(
                'D',
                TileFlags::PASSABLE | TileFlags::SHAPE_CHANGING,
                "door sigil",
                RedOnBlack,
            ),
        ),
        (
            SlidingDoor,
            TileDescriptor::new('#', TileFlags::INTERACTABLE, "sliding door", RedOnBlack),
        ),
        (
            Chest,
            TileDescriptor::new('?', TileFlags::INTERACTABLE, "mysterious chest", MagentaOnBlue),
        ),
        (
            StoneRubblePile,
            TileDescriptor::new('"', floor, "small pile of rubble", GrayOnBlack),
        ),
        (StoneFlooring, TileDescriptor::new('.', floor, "stone floor", WhiteOnBlack)),
        (
            CrackedStoneFlooring,
            TileDescriptor::new(',', floor, "cracked stone floor", WhiteOnBlack),
        ),
        (
            DecoratedStoneFlooring,
            TileDescriptor::new('~', floor, "decorated stone floor", WhiteOnBlack),
        ),
        (StonePillar, TileDescriptor::new('O', none, "stone pillar", CyanOnBlack)),
        (ScorchedFlooring, TileDescriptor::new('_', floor, "scorched floor", GrayOnBlack)),
        (Player, TileDescriptor::new('*', none, "Player character", GreenOnWhite)),
        (DartTrap, TileDescriptor::new('^', none, "dart trap", OrangeOnBlack)),
        (Dart, TileDescriptor::new('-', none, "dart", WhiteOnBlack)),
        (FlameVent, TileDescriptor::new('&', none, "flame vent", RedOnBlack)),
        (Fireball, TileDescriptor::new('@', none, "fireball", OrangeOnBlack)),
        (
            Embers,
            TileDescriptor::new(
                ':',
                TileFlags::PASSABLE | TileFlags::DAMAGING,
                "smoldering embers",
                OrangeOnBlack,
            ),
        ),
        (Spark, TileDescriptor::new('\'', none, "spark", YellowOnBlack)),
        (RockChute, TileDescriptor::new('V', none, "rock chute", GrayOnBlack)),
        (Rock, TileDescriptor::new('o', none, "rock", GrayOnBlack)),
    ])
}

fn standard_hazards() -> HazardCatalog {
    use HazardBehavior as B;
    use TileId::*;

    HazardCatalog::new([
        (DartTrap, HazardDescriptor::new(B::ARM_AND_FIRE, 3).spawning(&[Dart])),
        (Dart, HazardDescriptor::new(B::empty(), -1).with_damage(5).with_energy(12)),
        (FlameVent, HazardDescriptor::new(B::ARM_AND_FIRE, 5).spawning(&[Fireball])),
        (
            Fireball,
            HazardDescriptor::new(B::DISSIPATE | B::BLAST, -1)
                .with_damage(10)
                .with_energy(8)
                .spawning(&[Embers])
                .leaving(StoneRubblePile),
        ),
        (
            Embers,
            HazardDescriptor::new(B::BURST | B::SINGLE_SHOT, 2)
                .with_damage(1)
                .spawning(&[Spark])
                .leaving(ScorchedFlooring),
        ),
        (Spark, HazardDescriptor::new(B::empty(), -1).with_damage(2).with_energy(2)),
        (RockChute, HazardDescriptor::new(B::ARM_AND_FIRE, 6).spawning(&[Rock])),
        (
            Rock,
            HazardDescriptor::new(B::LOB, -1).with_damage(8).with_energy(6),
        ),
    ])
}

fn standard_rewards() -> RewardCatalog {
    RewardCatalog::new([
        (ItemId::TarnishedCoin, Item::new("tarnished coin", 1)),
        (ItemId::CrackedGem, Item::new("cracked gem", 25)),
        (ItemId::BoneCharm, Item::new("bone charm", 10)),
        (ItemId::RustedKey, Item::new("rusted key", 5)),
        (ItemId::CandleStub, Item::new("candle stub", 2)),
    ])
}
