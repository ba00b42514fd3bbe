use bitflags::bitflags;

pub const SOUND_RING_LEN: usize = 4;

bitflags! {
    /// One-shot sound effects raised by the simulation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SoundCue: u8 {
        const SHIP_FIRE = 1 << 0;
        const ALIEN_FIRE = 1 << 1;
        const SHIP_EXPLOSION = 1 << 2;
        const ALIEN_EXPLOSION = 1 << 3;
        const POWERUP = 1 << 4;
        const LOSE = 1 << 5;
        const VICTORY = 1 << 6;
        const MENU = 1 << 7;
    }
}

bitflags! {
    /// Looping music tracks that should currently be playing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MusicFlags: u8 {
        const BACKGROUND = 1 << 0;
        const ENEMY_SHIP = 1 << 1;
    }
}

/// Per-tick sound cues accumulated between two snapshots.
///
/// Each simulation tick writes into its own slot. When more ticks pass than
/// there are slots the ring wraps and later cues are merged into the older
/// slots; nothing is dropped until [`SoundRing::take`].
#[derive(Debug, Clone, Default)]
pub struct SoundRing {
    slots: [SoundCue; SOUND_RING_LEN],
    cursor: usize,
}

impl SoundRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&mut self, cue: SoundCue) {
        self.slots[self.cursor] |= cue;
    }

    pub fn end_tick(&mut self) {
        self.cursor = (self.cursor + 1) % SOUND_RING_LEN;
    }

    pub fn pending(&self) -> SoundCue {
        self.slots.iter().fold(SoundCue::empty(), |acc, &s| acc | s)
    }

    pub fn take(&mut self) -> [SoundCue; SOUND_RING_LEN] {
        let slots = self.slots;
        *self = Self::default();
        slots
    }
}
