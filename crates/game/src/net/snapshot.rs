use std::iter;

use super::protocol::{ENTITY_SLOTS, EntityPosition, SnapshotState};
use crate::entity::{GameObject, ObjectKind};
use crate::world::{
    BULLET_SLOTS, GameState, HORDE_SLOTS, MenuButton, MusicFlags, POWERUP_SLOTS, SHIP_SLOTS,
    SOUND_RING_LEN, SoundCue, World, alien_kind_for_slot, powerup_kind_for_slot,
};

const ENEMY_SHIP_SLOT: usize = SHIP_SLOTS;
const HORDE_START: usize = ENEMY_SHIP_SLOT + 1;
const BULLET_START: usize = HORDE_START + HORDE_SLOTS;
const POWERUP_START: usize = BULLET_START + BULLET_SLOTS;

/// Object kind occupying a wire slot. Powerup slots report the kind their
/// half of the powerup pool is reserved for.
pub fn slot_kind(slot: usize) -> Option<ObjectKind> {
    match slot {
        s if s < ENEMY_SHIP_SLOT => Some(ObjectKind::Ship),
        ENEMY_SHIP_SLOT => Some(ObjectKind::EnemyShip),
        s if s < BULLET_START => Some(alien_kind_for_slot(s - HORDE_START)),
        s if s < POWERUP_START => Some(ObjectKind::Bullet),
        s if s < POWERUP_START + POWERUP_SLOTS => Some(powerup_kind_for_slot(s - POWERUP_START)),
        _ => None,
    }
}

fn position_of(object: &GameObject) -> EntityPosition {
    if !object.is_active() {
        return EntityPosition::ABSENT;
    }
    // Float to int casts saturate, so off-screen objects clamp to the edge.
    EntityPosition {
        x: object.bounds.pos.x as u16,
        y: object.bounds.pos.y as u16,
    }
}

impl SnapshotState {
    /// Captures the world for the wire and clears its sound accumulator.
    pub fn encode(world: &mut World) -> Self {
        let mut positions = [EntityPosition::ABSENT; ENTITY_SLOTS];
        let objects = world
            .ships
            .as_slice()
            .iter()
            .chain(iter::once(&world.enemy_ship))
            .chain(world.horde.as_slice())
            .chain(world.bullets.as_slice())
            .chain(world.powerups.as_slice());
        for (slot, object) in positions.iter_mut().zip(objects) {
            *slot = position_of(object);
        }

        Self {
            positions,
            game_state: world.state(),
            menu: world.menu(),
            sounds: world.take_sound_ring().map(|cues| cues.bits()),
            music: world.music().bits(),
        }
    }

    /// Position of a slot, or `None` when the slot is absent.
    pub fn slot(&self, slot: usize) -> Option<(u16, u16)> {
        self.positions
            .get(slot)
            .filter(|p| !p.is_absent())
            .map(|p| (p.x, p.y))
    }

    pub fn sound_ring(&self) -> [SoundCue; SOUND_RING_LEN] {
        self.sounds.map(SoundCue::from_bits_truncate)
    }

    pub fn cues(&self) -> SoundCue {
        self.sound_ring()
            .into_iter()
            .fold(SoundCue::empty(), |acc, cues| acc | cues)
    }

    pub fn music_flags(&self) -> MusicFlags {
        MusicFlags::from_bits_truncate(self.music)
    }

    /// Present slots in wire order, tagged with the kind the slot holds.
    pub fn drawables(&self) -> impl Iterator<Item = Drawable> + '_ {
        self.positions
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_absent())
            .filter_map(|(slot, p)| {
                Some(Drawable {
                    slot,
                    kind: slot_kind(slot)?,
                    x: p.x,
                    y: p.y,
                })
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drawable {
    pub slot: usize,
    pub kind: ObjectKind,
    pub x: u16,
    pub y: u16,
}

/// What the replica knows about the game: the most recent snapshot applied.
#[derive(Debug, Clone, Default)]
pub struct ReplicaView {
    latest: Option<SnapshotState>,
    applied: u64,
}

impl ReplicaView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the view and returns the cues the snapshot carried.
    pub fn apply(&mut self, snapshot: SnapshotState) -> SoundCue {
        let cues = snapshot.cues();
        self.latest = Some(snapshot);
        self.applied += 1;
        cues
    }

    pub fn latest(&self) -> Option<&SnapshotState> {
        self.latest.as_ref()
    }

    pub fn applied(&self) -> u64 {
        self.applied
    }

    pub fn game_state(&self) -> GameState {
        self.latest
            .as_ref()
            .map_or(GameState::Connecting, |s| s.game_state)
    }

    pub fn menu(&self) -> MenuButton {
        self.latest.as_ref().map_or(MenuButton::Start, |s| s.menu)
    }

    pub fn music(&self) -> MusicFlags {
        self.latest
            .as_ref()
            .map_or(MusicFlags::empty(), SnapshotState::music_flags)
    }

    pub fn drawables(&self) -> impl Iterator<Item = Drawable> + '_ {
        self.latest.iter().flat_map(|s| s.drawables())
    }
}
