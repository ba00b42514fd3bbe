//! Authoritative game world: the pools, the per-tick simulation and the
//! menu state machine that wraps it.

pub mod config;
pub mod events;
pub mod input;
pub mod state;
mod step;

pub use config::GameConfig;
pub use events::{MusicFlags, SOUND_RING_LEN, SoundCue, SoundRing};
pub use input::InputFlags;
pub use state::{
    BULLET_SLOTS, GameState, HORDE_COLS, HORDE_ROWS, HORDE_SLOTS, LOCAL_SHIP, MenuButton,
    POWERUP_SLOTS, REMOTE_SHIP, SHIP_SLOTS, ShipTimers, World, alien_kind_for_slot,
    powerup_kind_for_slot, powerup_slot_range,
};
