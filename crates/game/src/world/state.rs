use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use rkyv::{Archive, Deserialize, Serialize};

use crate::entity::{GameObject, ObjectKind, ObjectState, Pool, Rect, Selector};

use super::config::GameConfig;
use super::events::{MusicFlags, SOUND_RING_LEN, SoundCue, SoundRing};

pub const SHIP_SLOTS: usize = 2;
pub const HORDE_ROWS: usize = 5;
pub const HORDE_COLS: usize = 11;
pub const HORDE_SLOTS: usize = HORDE_ROWS * HORDE_COLS;
pub const BULLET_SLOTS: usize = 40;
/// First half holds fast-shot powerups, second half fast-move powerups.
pub const POWERUP_SLOTS: usize = 20;

/// Ship driven by the authoritative peer's own input.
pub const LOCAL_SHIP: usize = 0;
/// Ship driven by the replica's command buffers.
pub const REMOTE_SHIP: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
#[repr(u8)]
pub enum GameState {
    #[default]
    Connecting,
    Menu,
    Playing,
    Paused,
    Lose,
    Win,
    Close,
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        self == Self::Close
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Menu => "menu",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Lose => "lose",
            Self::Win => "win",
            Self::Close => "close",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
#[repr(u8)]
pub enum MenuButton {
    #[default]
    Start,
    Quit,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShipTimers {
    pub reload: f32,
    pub fast_shot: f32,
    pub fast_move: f32,
}

impl ShipTimers {
    pub(super) fn tick(&mut self, dt: f32) {
        self.reload = (self.reload - dt).max(0.0);
        self.fast_shot = (self.fast_shot - dt).max(0.0);
        self.fast_move = (self.fast_move - dt).max(0.0);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnemyShipTimers {
    pub sleep: f32,
    pub reload: f32,
}

/// The authoritative world: every pool plus the mutable bookkeeping the
/// simulation step needs. One instance per process, owned by the session.
#[derive(Debug)]
pub struct World {
    pub(super) config: GameConfig,
    pub ships: Pool,
    pub enemy_ship: GameObject,
    pub horde: Pool,
    pub bullets: Pool,
    pub powerups: Pool,
    pub(super) ship_timers: [ShipTimers; SHIP_SLOTS],
    pub(super) enemy_timers: EnemyShipTimers,
    pub(super) enemy_ship_velocity: f32,
    pub(super) horde_speed: f32,
    pub(super) horde_descend: bool,
    pub(super) horde_last_alive: Option<usize>,
    pub(super) enemies_alive: u16,
    pub(super) state: GameState,
    pub(super) menu: MenuButton,
    pub(super) music: MusicFlags,
    pub(super) frame_cues: SoundCue,
    pub(super) sounds: SoundRing,
    pub(super) rng: Pcg32,
}

impl World {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut world = Self {
            ships: Pool::new(Vec::new()),
            enemy_ship: GameObject::vacant(ObjectKind::EnemyShip, config.enemy_ship_size),
            horde: Pool::new(Vec::new()),
            bullets: Pool::new(Vec::new()),
            powerups: Pool::new(Vec::new()),
            ship_timers: [ShipTimers::default(); SHIP_SLOTS],
            enemy_timers: EnemyShipTimers::default(),
            enemy_ship_velocity: 0.0,
            horde_speed: 0.0,
            horde_descend: false,
            horde_last_alive: None,
            enemies_alive: 0,
            state: GameState::Connecting,
            menu: MenuButton::Start,
            music: MusicFlags::empty(),
            frame_cues: SoundCue::empty(),
            sounds: SoundRing::new(),
            rng: Pcg32::seed_from_u64(seed),
            config,
        };
        world.populate();
        world
    }

    /// Rebuilds every pool and timer for a fresh round. Slot counts and
    /// indices are unchanged; game state, menu and RNG carry over.
    pub fn restart(&mut self) {
        self.populate();
        log::info!("World restarted");
    }

    fn populate(&mut self) {
        let config = &self.config;

        self.ships = Pool::new(
            config
                .ship_spawn_x
                .iter()
                .map(|&x| {
                    GameObject::new(
                        ObjectKind::Ship,
                        Rect::new(x, config.ship_y, config.ship_size.x, config.ship_size.y),
                        ObjectState::Active,
                    )
                })
                .collect(),
        );

        self.enemy_ship = GameObject::new(
            ObjectKind::EnemyShip,
            Rect {
                pos: Vec2::new(config.screen_width, config.enemy_ship_y),
                size: config.enemy_ship_size,
            },
            ObjectState::Inactive,
        );

        self.horde = Pool::new((0..HORDE_SLOTS).map(|i| alien(config, i)).collect());
        self.bullets = Pool::filled(
            BULLET_SLOTS,
            GameObject::vacant(ObjectKind::Bullet, config.bullet_size),
        );
        self.powerups = Pool::new(
            (0..POWERUP_SLOTS)
                .map(|i| GameObject::vacant(powerup_kind_for_slot(i), config.powerup_size))
                .collect(),
        );

        self.ship_timers = [ShipTimers::default(); SHIP_SLOTS];
        self.enemy_timers = EnemyShipTimers {
            sleep: config.enemy_ship_sleep_time,
            reload: config.enemy_ship_fire_delay,
        };
        self.enemy_ship_velocity = -config.enemy_ship_speed;
        self.horde_speed = config.horde_speed;
        self.horde_descend = false;
        self.horde_last_alive = HORDE_SLOTS.checked_sub(1);
        self.enemies_alive = (HORDE_SLOTS + 1) as u16;
        self.music = MusicFlags::empty();
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn menu(&self) -> MenuButton {
        self.menu
    }

    pub fn music(&self) -> MusicFlags {
        self.music
    }

    pub fn enemies_alive(&self) -> u16 {
        self.enemies_alive
    }

    pub fn horde_speed(&self) -> f32 {
        self.horde_speed
    }

    pub fn horde_last_alive(&self) -> Option<usize> {
        self.horde_last_alive
    }

    pub fn ship_timers(&self, ship: usize) -> Option<&ShipTimers> {
        self.ship_timers.get(ship)
    }

    pub fn ships_alive(&self) -> usize {
        self.ships.count(Selector::AnyActive)
    }

    pub fn set_state(&mut self, state: GameState) {
        if self.state != state {
            log::info!("Game state {} -> {}", self.state.as_str(), state.as_str());
            self.state = state;
        }
    }

    /// Leaves the connecting screen once the other peer has been heard from.
    pub fn peer_joined(&mut self) {
        if self.state == GameState::Connecting {
            self.set_state(GameState::Menu);
        }
    }

    /// Cues raised since the previous call, for local audio playback.
    pub fn take_frame_cues(&mut self) -> SoundCue {
        std::mem::take(&mut self.frame_cues)
    }

    /// Per-tick cues accumulated since the previous snapshot.
    pub fn take_sound_ring(&mut self) -> [SoundCue; SOUND_RING_LEN] {
        self.sounds.take()
    }

    pub(super) fn cue(&mut self, cue: SoundCue) {
        self.frame_cues |= cue;
        self.sounds.raise(cue);
    }
}

fn alien(config: &GameConfig, index: usize) -> GameObject {
    let row = index / HORDE_COLS;
    let col = index % HORDE_COLS;
    let size = config.alien_size;
    let gap = config.horde_gap;
    let cols = HORDE_COLS as f32;
    let offset_x = config.screen_width / 2.0 - (size.x * cols + gap.x * (cols - 1.0)) / 2.0;

    GameObject::new(
        alien_kind_for_slot(index),
        Rect {
            pos: Vec2::new(
                offset_x + col as f32 * (size.x + gap.x),
                config.horde_top + row as f32 * (size.y + gap.y),
            ),
            size,
        },
        ObjectState::Active,
    )
}

/// The two front rows are the weakest aliens, the back two the strongest.
pub fn alien_kind_for_slot(slot: usize) -> ObjectKind {
    match slot / HORDE_COLS {
        0 | 1 => ObjectKind::Alien1,
        2 => ObjectKind::Alien2,
        _ => ObjectKind::Alien3,
    }
}

/// Powerup kinds own disjoint halves of the powerup pool so that neither can
/// starve the other of free slots.
pub fn powerup_kind_for_slot(slot: usize) -> ObjectKind {
    if slot < POWERUP_SLOTS / 2 {
        ObjectKind::FastShot
    } else {
        ObjectKind::FastMove
    }
}

pub fn powerup_slot_range(kind: ObjectKind) -> std::ops::Range<usize> {
    match kind {
        ObjectKind::FastShot => 0..POWERUP_SLOTS / 2,
        _ => POWERUP_SLOTS / 2..POWERUP_SLOTS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_world_layout() {
        let world = World::new(GameConfig::default(), 1);

        assert_eq!(world.ships.len(), SHIP_SLOTS);
        assert_eq!(world.horde.len(), HORDE_SLOTS);
        assert_eq!(world.bullets.len(), BULLET_SLOTS);
        assert_eq!(world.powerups.len(), POWERUP_SLOTS);
        assert_eq!(world.enemies_alive(), 56);
        assert_eq!(world.horde_last_alive(), Some(HORDE_SLOTS - 1));
        assert_eq!(world.state(), GameState::Connecting);
        assert_eq!(world.enemy_ship.state, ObjectState::Inactive);
        assert_eq!(world.bullets.count(Selector::AnyActive), 0);
    }

    #[test]
    fn horde_rows_and_kinds() {
        let world = World::new(GameConfig::default(), 1);
        assert_eq!(world.horde[0].kind, ObjectKind::Alien1);
        assert_eq!(world.horde[2 * HORDE_COLS].kind, ObjectKind::Alien2);
        assert_eq!(world.horde[HORDE_SLOTS - 1].kind, ObjectKind::Alien3);

        let first = world.horde[0].bounds;
        let second_row = world.horde[HORDE_COLS].bounds;
        assert_eq!(first.top(), 96.0);
        assert_eq!(second_row.top(), 96.0 + 32.0 + 20.0);
        assert!((first.left() + world.horde[HORDE_COLS - 1].bounds.right() - 1920.0).abs() < 0.01);
    }

    #[test]
    fn powerup_partition_is_disjoint() {
        let shot = powerup_slot_range(ObjectKind::FastShot);
        let r#move = powerup_slot_range(ObjectKind::FastMove);
        assert_eq!(shot.end, r#move.start);
        assert!(shot.clone().all(|i| powerup_kind_for_slot(i) == ObjectKind::FastShot));
        assert!(r#move.clone().all(|i| powerup_kind_for_slot(i) == ObjectKind::FastMove));
    }

    #[test]
    fn peer_join_leaves_connecting_once() {
        let mut world = World::new(GameConfig::default(), 1);
        world.peer_joined();
        assert_eq!(world.state(), GameState::Menu);

        world.set_state(GameState::Playing);
        world.peer_joined();
        assert_eq!(world.state(), GameState::Playing);
    }
}
