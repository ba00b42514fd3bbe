use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Gameplay tuning. Everything here may differ between builds without
/// breaking the wire format; slot counts are constants in [`super::state`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Horizontal band the ships and the horde must stay inside.
    pub screen_limits: [f32; 2],

    pub ship_size: Vec2,
    pub ship_y: f32,
    pub ship_spawn_x: [f32; 2],
    /// Base and boosted movement speed, px/s.
    pub ship_speeds: [f32; 2],
    /// Base and boosted reload time, seconds.
    pub ship_fire_delays: [f32; 2],

    pub enemy_ship_size: Vec2,
    pub enemy_ship_y: f32,
    pub enemy_ship_speed: f32,
    pub enemy_ship_fire_delay: f32,
    pub enemy_ship_sleep_time: f32,

    pub alien_size: Vec2,
    pub horde_gap: Vec2,
    pub horde_top: f32,
    pub horde_speed: f32,
    pub horde_speed_increase: f32,
    pub horde_step_y: f32,
    /// Chance per alien per tick of firing.
    pub alien_fire_chance: f32,

    pub bullet_size: Vec2,
    pub projectile_speed: f32,

    pub powerup_size: Vec2,
    pub powerup_duration: f32,
    /// Percent chance that a killed alien drops a powerup.
    pub powerup_drop_percent: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 1920.0,
            screen_height: 1080.0,
            screen_limits: [250.0, 1670.0],

            ship_size: Vec2::new(96.0, 72.0),
            ship_y: 900.0,
            ship_spawn_x: [760.0, 1064.0],
            ship_speeds: [300.0, 450.0],
            ship_fire_delays: [0.5, 0.1],

            enemy_ship_size: Vec2::new(64.0, 40.0),
            enemy_ship_y: 50.0,
            enemy_ship_speed: 450.0,
            enemy_ship_fire_delay: 0.25,
            enemy_ship_sleep_time: 4.0,

            alien_size: Vec2::new(32.0, 32.0),
            horde_gap: Vec2::new(15.0, 20.0),
            horde_top: 96.0,
            horde_speed: 100.0,
            horde_speed_increase: 25.0,
            horde_step_y: 100.0,
            alien_fire_chance: 0.0005,

            bullet_size: Vec2::new(4.0, 32.0),
            projectile_speed: 600.0,

            powerup_size: Vec2::new(32.0, 32.0),
            powerup_duration: 2.0,
            powerup_drop_percent: 10,
        }
    }
}

impl GameConfig {
    /// Parses a tuning file. Fields left out keep their defaults; a screen
    /// or limit band that cannot hold the ships is rejected.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        config
            .validate()
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.screen_width > 0.0 && self.screen_height > 0.0) {
            return Err(format!(
                "screen size must be positive, got {}x{}",
                self.screen_width, self.screen_height
            ));
        }
        let [left, right] = self.screen_limits;
        if !(0.0 <= left && left + self.ship_size.x <= right && right <= self.screen_width) {
            return Err(format!(
                "screen limits [{}, {}] must fit a ship inside 0..{}",
                left, right, self.screen_width
            ));
        }
        Ok(())
    }

    pub fn left_limit(&self) -> f32 {
        self.screen_limits[0]
    }

    pub fn right_limit(&self) -> f32 {
        self.screen_limits[1]
    }

    pub fn ship_speed(&self, boosted: bool) -> f32 {
        self.ship_speeds[boosted as usize]
    }

    pub fn ship_fire_delay(&self, boosted: bool) -> f32 {
        self.ship_fire_delays[boosted as usize]
    }
}
