use glam::Vec2;
use rand::Rng;

use crate::entity::{CollisionCursor, Heading, ObjectKind, ObjectState, Selector};

use super::events::{MusicFlags, SoundCue};
use super::input::InputFlags;
use super::state::{
    GameState, HORDE_SLOTS, LOCAL_SHIP, MenuButton, REMOTE_SHIP, World, powerup_slot_range,
};

impl World {
    /// Advances the world by one simulation tick using the authoritative
    /// player's input. Outside of play the input drives the menu instead.
    pub fn step(&mut self, input: InputFlags, dt: f32) {
        match self.state {
            GameState::Playing if input.contains(InputFlags::PAUSE) => {
                self.set_state(GameState::Paused);
            }
            GameState::Playing => self.simulate(input, dt),
            GameState::Menu | GameState::Paused | GameState::Win | GameState::Lose => {
                self.navigate_menu(input);
            }
            GameState::Connecting | GameState::Close => {}
        }
        self.sounds.end_tick();
    }

    /// Replays a burst of remote inputs as sequential updates of the second
    /// ship, oldest first. Ignored unless a round is in progress.
    pub fn apply_remote_inputs(&mut self, inputs: impl IntoIterator<Item = InputFlags>, dt: f32) {
        if self.state != GameState::Playing {
            return;
        }
        for input in inputs {
            self.update_ship(REMOTE_SHIP, input, dt);
        }
    }

    fn simulate(&mut self, input: InputFlags, dt: f32) {
        self.resolve_collisions();
        self.update_ship(LOCAL_SHIP, input, dt);
        self.update_enemy_ship(dt);
        self.update_horde(dt);
        self.advance_projectiles(dt);
        self.check_terminal();
    }

    fn navigate_menu(&mut self, input: InputFlags) {
        if self.state == GameState::Paused && input.contains(InputFlags::PAUSE) {
            self.set_state(GameState::Playing);
            return;
        }

        if input.contains(InputFlags::UP) && self.menu != MenuButton::Start {
            self.menu = MenuButton::Start;
            self.cue(SoundCue::MENU);
        }
        if input.contains(InputFlags::DOWN) && self.menu != MenuButton::Quit {
            self.menu = MenuButton::Quit;
            self.cue(SoundCue::MENU);
        }

        if !input.contains(InputFlags::CONFIRM) {
            return;
        }
        match self.menu {
            MenuButton::Quit => self.set_state(GameState::Close),
            MenuButton::Start => {
                if matches!(self.state, GameState::Win | GameState::Lose) {
                    self.restart();
                }
                self.music.insert(MusicFlags::BACKGROUND);
                self.set_state(GameState::Playing);
            }
        }
    }

    fn resolve_collisions(&mut self) {
        self.hit_aliens();
        self.hit_enemy_ship();
        self.hit_ships();
        self.collect_powerups();
    }

    fn hit_aliens(&mut self) {
        let mut cursor = CollisionCursor::new(
            &self.bullets,
            Selector::ActiveTowardEnemies,
            &self.horde,
            Selector::AnyActive,
        );
        while let Some((bullet, alien)) = cursor.current_pair() {
            if self.bullets[bullet].overlaps(&self.horde[alien]) {
                self.bullets[bullet].state = ObjectState::Inactive;
                self.kill_alien(alien);
            }
            cursor.advance(&self.bullets, &self.horde);
        }
    }

    fn hit_enemy_ship(&mut self) {
        let mut cursor = self.bullets.cursor(Selector::ActiveTowardEnemies);
        while let Some(bullet) = cursor.current_index() {
            if !self.enemy_ship.is_active() {
                return;
            }
            if self.bullets[bullet].overlaps(&self.enemy_ship) {
                self.bullets[bullet].state = ObjectState::Inactive;
                self.enemy_ship.state = ObjectState::Dead;
                self.enemies_alive = self.enemies_alive.saturating_sub(1);
                self.music.remove(MusicFlags::ENEMY_SHIP);
                self.cue(SoundCue::SHIP_EXPLOSION);
            }
            cursor.advance(&self.bullets);
        }
    }

    fn hit_ships(&mut self) {
        let mut cursor = CollisionCursor::new(
            &self.bullets,
            Selector::ActiveTowardPlayer,
            &self.ships,
            Selector::AnyActive,
        );
        while let Some((bullet, ship)) = cursor.current_pair() {
            if self.bullets[bullet].overlaps(&self.ships[ship]) {
                self.bullets[bullet].state = ObjectState::Inactive;
                self.ships[ship].state = ObjectState::Dead;
                self.cue(SoundCue::SHIP_EXPLOSION);
            }
            cursor.advance(&self.bullets, &self.ships);
        }
    }

    fn collect_powerups(&mut self) {
        let mut cursor = CollisionCursor::new(
            &self.powerups,
            Selector::AnyActive,
            &self.ships,
            Selector::AnyActive,
        );
        while let Some((powerup, ship)) = cursor.current_pair() {
            if self.powerups[powerup].overlaps(&self.ships[ship]) {
                self.powerups[powerup].state = ObjectState::Inactive;
                let duration = self.config.powerup_duration;
                let timers = &mut self.ship_timers[ship];
                match self.powerups[powerup].kind {
                    ObjectKind::FastShot => timers.fast_shot = duration,
                    _ => timers.fast_move = duration,
                }
                self.cue(SoundCue::POWERUP);
            }
            cursor.advance(&self.powerups, &self.ships);
        }
    }

    fn kill_alien(&mut self, index: usize) {
        self.horde[index].state = ObjectState::Dead;
        self.enemies_alive = self.enemies_alive.saturating_sub(1);
        self.cue(SoundCue::ALIEN_EXPLOSION);

        if self.horde_last_alive == Some(index) {
            self.horde_last_alive = (0..index).rev().find(|&i| self.horde[i].is_active());
        }

        let percent = self.rng.random_range(0..100u32);
        if percent < self.config.powerup_drop_percent {
            let center = self.horde[index].bounds.center_x();
            let top = self.horde[index].bounds.top();
            self.drop_powerup(center, top);
        }
    }

    fn drop_powerup(&mut self, center_x: f32, top: f32) {
        let kind = if self.rng.random_bool(0.5) {
            ObjectKind::FastShot
        } else {
            ObjectKind::FastMove
        };
        let Some(slot) = self.powerups.claim_in(powerup_slot_range(kind)) else {
            return;
        };
        let powerup = &mut self.powerups[slot];
        powerup.kind = kind;
        powerup.heading = Heading::TowardPlayer;
        powerup.bounds.pos = Vec2::new(center_x - powerup.bounds.size.x * 0.5, top);
    }

    fn update_ship(&mut self, ship: usize, input: InputFlags, dt: f32) {
        if !self.ships.get(ship).is_some_and(|s| s.is_active()) {
            return;
        }

        let timers = &mut self.ship_timers[ship];
        timers.tick(dt);
        let speed = self.config.ship_speed(timers.fast_move > 0.0);
        let left = self.config.left_limit();
        let right = self.config.right_limit();

        let bounds = &mut self.ships[ship].bounds;
        let x = bounds.pos.x + input.horizontal() * speed * dt;
        bounds.pos.x = x.min(right - bounds.size.x).max(left);

        if !input.contains(InputFlags::FIRE) || self.ship_timers[ship].reload > 0.0 {
            return;
        }
        let bounds = self.ships[ship].bounds;
        if self
            .spawn_bullet(bounds.center_x(), bounds.top(), Heading::TowardEnemies)
            .is_some()
        {
            let timers = &mut self.ship_timers[ship];
            timers.reload = self.config.ship_fire_delay(timers.fast_shot > 0.0);
            self.cue(SoundCue::SHIP_FIRE);
        }
    }

    /// Spawns a bullet centered on `center_x` whose leading edge starts at
    /// `edge_y`. Returns `None` when every bullet slot is in flight.
    fn spawn_bullet(&mut self, center_x: f32, edge_y: f32, heading: Heading) -> Option<usize> {
        let slot = self.bullets.claim()?;
        let bullet = &mut self.bullets[slot];
        let size = bullet.bounds.size;
        let y = match heading {
            Heading::TowardEnemies => edge_y - size.y,
            Heading::TowardPlayer => edge_y,
        };
        bullet.heading = heading;
        bullet.bounds.pos = Vec2::new(center_x - size.x * 0.5, y);
        Some(slot)
    }

    fn update_enemy_ship(&mut self, dt: f32) {
        match self.enemy_ship.state {
            ObjectState::Dead => {}
            ObjectState::Inactive => {
                self.enemy_timers.sleep -= dt;
                if self.enemy_timers.sleep > 0.0 {
                    return;
                }
                // Enter from the edge opposite to the direction of travel.
                self.enemy_ship.bounds.pos.x = if self.enemy_ship_velocity < 0.0 {
                    self.config.screen_width
                } else {
                    0.0
                };
                self.enemy_ship.state = ObjectState::Active;
                self.enemy_timers.reload = self.config.enemy_ship_fire_delay;
                self.music.insert(MusicFlags::ENEMY_SHIP);
            }
            ObjectState::Active => {
                let bounds = &mut self.enemy_ship.bounds;
                bounds.pos.x += self.enemy_ship_velocity * dt;

                let exited = if self.enemy_ship_velocity < 0.0 {
                    bounds.left() <= 0.0
                } else {
                    bounds.left() >= self.config.screen_width
                };
                if exited {
                    bounds.pos.x = bounds.pos.x.min(self.config.screen_width).max(0.0);
                    self.enemy_ship.state = ObjectState::Inactive;
                    self.enemy_ship_velocity = -self.enemy_ship_velocity;
                    self.enemy_timers.sleep = self.config.enemy_ship_sleep_time;
                    self.music.remove(MusicFlags::ENEMY_SHIP);
                    return;
                }

                self.enemy_timers.reload -= dt;
                if self.enemy_timers.reload <= 0.0 {
                    self.enemy_timers.reload = self.config.enemy_ship_fire_delay;
                    let bounds = self.enemy_ship.bounds;
                    if self
                        .spawn_bullet(bounds.center_x(), bounds.bottom(), Heading::TowardPlayer)
                        .is_some()
                    {
                        self.cue(SoundCue::ALIEN_FIRE);
                    }
                }
            }
        }
    }

    fn update_horde(&mut self, dt: f32) {
        if self.horde_descend {
            let step = self.config.horde_step_y;
            for alien in self.horde.iter_mut().filter(|a| a.is_active()) {
                alien.bounds.pos.y += step;
            }
            self.horde_descend = false;
        }

        let (leftmost, rightmost) = self
            .horde
            .selected(Selector::AnyActive)
            .fold((f32::MAX, f32::MIN), |(l, r), (_, alien)| {
                (l.min(alien.bounds.left()), r.max(alien.bounds.right()))
            });
        let at_boundary = (self.horde_speed > 0.0 && rightmost >= self.config.right_limit())
            || (self.horde_speed < 0.0 && leftmost <= self.config.left_limit());
        if at_boundary {
            let magnitude = self.horde_speed.abs() + self.config.horde_speed_increase;
            self.horde_speed = -self.horde_speed.signum() * magnitude;
            self.horde_descend = true;
        }

        let shift = self.horde_speed * dt;
        let chance = self.config.alien_fire_chance;
        let mut cursor = self.horde.cursor(Selector::AnyActive);
        while let Some(index) = cursor.current_index() {
            self.horde[index].bounds.pos.x += shift;
            if chance > 0.0 && self.rng.random::<f32>() < chance {
                let bounds = self.horde[index].bounds;
                if self
                    .spawn_bullet(bounds.center_x(), bounds.bottom(), Heading::TowardPlayer)
                    .is_some()
                {
                    self.cue(SoundCue::ALIEN_FIRE);
                }
            }
            cursor.advance(&self.horde);
        }
    }

    fn advance_projectiles(&mut self, dt: f32) {
        let distance = self.config.projectile_speed * dt;
        let height = self.config.screen_height;

        for object in self.bullets.iter_mut().chain(self.powerups.iter_mut()) {
            if !object.is_active() {
                continue;
            }
            object.bounds.pos.y += object.heading.sign() * distance;
            if object.bounds.top() < 0.0 || object.bounds.top() > height {
                object.state = ObjectState::Inactive;
            }
        }
    }

    fn check_terminal(&mut self) {
        if self.state != GameState::Playing {
            return;
        }

        if self.enemies_alive == 0 {
            self.finish(GameState::Win, SoundCue::VICTORY);
        } else if self.ships_alive() == 0 || self.horde_reached_ships() {
            self.finish(GameState::Lose, SoundCue::LOSE);
        }
    }

    fn horde_reached_ships(&self) -> bool {
        self.horde_last_alive
            .filter(|&i| i < HORDE_SLOTS)
            .is_some_and(|i| self.horde[i].bounds.bottom() >= self.config.ship_y)
    }

    fn finish(&mut self, state: GameState, cue: SoundCue) {
        self.music.remove(MusicFlags::BACKGROUND | MusicFlags::ENEMY_SHIP);
        self.menu = MenuButton::Start;
        self.cue(cue);
        self.set_state(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{GameObject, Rect};
    use crate::world::config::GameConfig;
    use crate::world::state::{BULLET_SLOTS, HORDE_COLS, SHIP_SLOTS};

    const DT: f32 = 1.0 / 60.0;

    fn quiet_config() -> GameConfig {
        GameConfig {
            alien_fire_chance: 0.0,
            powerup_drop_percent: 0,
            ..GameConfig::default()
        }
    }

    fn playing(config: GameConfig) -> World {
        let mut world = World::new(config, 7);
        world.set_state(GameState::Playing);
        world
    }

    /// Keeps only the alien at `keep`, everything else in the horde dead.
    fn lone_alien(world: &mut World, keep: usize, bounds: Rect) {
        for (i, alien) in world.horde.iter_mut().enumerate() {
            if i != keep {
                alien.state = ObjectState::Dead;
            }
        }
        world.horde[keep].bounds = bounds;
        world.horde_last_alive = Some(keep);
        world.enemies_alive = 2;
    }

    fn fire_bullet(world: &mut World, x: f32, y: f32, heading: Heading) -> usize {
        let slot = world.bullets.claim().unwrap();
        world.bullets[slot].heading = heading;
        world.bullets[slot].bounds.pos = Vec2::new(x, y);
        slot
    }

    #[test]
    fn bullet_kills_overlapping_alien() {
        let mut world = playing(quiet_config());
        let alive = world.enemies_alive();
        let bullet = fire_bullet(&mut world, 110.0, 110.0, Heading::TowardEnemies);
        world.horde[0].bounds.pos = Vec2::new(100.0, 100.0);

        world.resolve_collisions();

        assert_eq!(world.horde[0].state, ObjectState::Dead);
        assert_eq!(world.bullets[bullet].state, ObjectState::Inactive);
        assert_eq!(world.enemies_alive(), alive - 1);
        assert!(world.take_frame_cues().contains(SoundCue::ALIEN_EXPLOSION));
    }

    #[test]
    fn one_bullet_kills_at_most_one_alien() {
        let mut world = playing(quiet_config());
        world.horde[0].bounds.pos = Vec2::new(100.0, 100.0);
        world.horde[1].bounds.pos = Vec2::new(100.0, 100.0);
        fire_bullet(&mut world, 110.0, 110.0, Heading::TowardEnemies);

        world.resolve_collisions();

        assert_eq!(world.horde[0].state, ObjectState::Dead);
        assert_eq!(world.horde[1].state, ObjectState::Active);
    }

    #[test]
    fn downward_bullets_ignore_aliens() {
        let mut world = playing(quiet_config());
        world.horde[0].bounds.pos = Vec2::new(100.0, 100.0);
        let bullet = fire_bullet(&mut world, 110.0, 110.0, Heading::TowardPlayer);

        world.resolve_collisions();

        assert_eq!(world.horde[0].state, ObjectState::Active);
        assert!(world.bullets[bullet].is_active());
    }

    #[test]
    fn horde_reverses_then_descends() {
        let mut world = playing(quiet_config());
        let limit = world.config().right_limit();
        lone_alien(&mut world, 0, Rect::new(limit - 32.0, 200.0, 32.0, 32.0));
        let speed = world.horde_speed();
        assert!(speed > 0.0);

        world.update_horde(DT);
        assert!(world.horde_speed() < 0.0);
        assert_eq!(world.horde_speed(), -(speed + world.config().horde_speed_increase));
        assert_eq!(world.horde[0].bounds.top(), 200.0);

        world.update_horde(DT);
        assert_eq!(world.horde[0].bounds.top(), 200.0 + world.config().horde_step_y);
        assert!(world.horde_speed() < 0.0);

        world.update_horde(DT);
        assert_eq!(world.horde[0].bounds.top(), 200.0 + world.config().horde_step_y);
    }

    #[test]
    fn last_alive_recomputed_only_on_its_death() {
        let mut world = playing(quiet_config());
        let last = HORDE_SLOTS - 1;

        world.kill_alien(3);
        assert_eq!(world.horde_last_alive(), Some(last));

        world.kill_alien(last - 1);
        world.kill_alien(last);
        assert_eq!(world.horde_last_alive(), Some(last - 2));
    }

    #[test]
    fn horde_reaching_ships_loses() {
        let mut world = playing(quiet_config());
        let ship_y = world.config().ship_y;
        lone_alien(&mut world, 5, Rect::new(600.0, ship_y - 32.0, 32.0, 32.0));

        world.check_terminal();

        assert_eq!(world.state(), GameState::Lose);
        assert!(world.take_frame_cues().contains(SoundCue::LOSE));
        assert!(!world.music().contains(MusicFlags::BACKGROUND));
    }

    #[test]
    fn clearing_every_enemy_wins() {
        let mut world = playing(quiet_config());
        world.music.insert(MusicFlags::BACKGROUND);
        lone_alien(&mut world, 0, Rect::new(600.0, 300.0, 32.0, 32.0));
        world.enemy_ship.state = ObjectState::Dead;
        world.enemies_alive = 1;
        fire_bullet(&mut world, 610.0, 310.0, Heading::TowardEnemies);

        world.step(InputFlags::empty(), DT);

        assert_eq!(world.state(), GameState::Win);
        assert!(world.music().is_empty());
        let ring = world.take_sound_ring();
        assert!(ring.iter().any(|cues| cues.contains(SoundCue::VICTORY)));
    }

    #[test]
    fn both_ships_dead_loses() {
        let mut world = playing(quiet_config());
        for i in 0..SHIP_SLOTS {
            let bounds = world.ships[i].bounds;
            fire_bullet(&mut world, bounds.left() + 10.0, bounds.top() + 10.0, Heading::TowardPlayer);
        }

        world.step(InputFlags::empty(), DT);

        assert_eq!(world.ships_alive(), 0);
        assert_eq!(world.state(), GameState::Lose);
    }

    #[test]
    fn ship_clamped_to_limits() {
        let mut world = playing(quiet_config());
        for _ in 0..1000 {
            world.update_ship(LOCAL_SHIP, InputFlags::LEFT, DT);
        }
        assert_eq!(world.ships[LOCAL_SHIP].bounds.left(), world.config().left_limit());

        for _ in 0..1000 {
            world.update_ship(LOCAL_SHIP, InputFlags::RIGHT, DT);
        }
        assert_eq!(world.ships[LOCAL_SHIP].bounds.right(), world.config().right_limit());
    }

    #[test]
    fn fast_move_boosts_speed() {
        let mut world = playing(quiet_config());
        let start = world.ships[LOCAL_SHIP].bounds.left();
        world.update_ship(LOCAL_SHIP, InputFlags::RIGHT, 0.1);
        let base = world.ships[LOCAL_SHIP].bounds.left() - start;

        world.ship_timers[LOCAL_SHIP].fast_move = 1.0;
        let start = world.ships[LOCAL_SHIP].bounds.left();
        world.update_ship(LOCAL_SHIP, InputFlags::RIGHT, 0.1);
        let boosted = world.ships[LOCAL_SHIP].bounds.left() - start;

        assert!(boosted > base);
    }

    #[test]
    fn reload_gates_firing() {
        let mut world = playing(quiet_config());
        world.update_ship(LOCAL_SHIP, InputFlags::FIRE, DT);
        assert_eq!(world.bullets.count(Selector::ActiveTowardEnemies), 1);
        assert!(world.take_frame_cues().contains(SoundCue::SHIP_FIRE));

        world.update_ship(LOCAL_SHIP, InputFlags::FIRE, DT);
        assert_eq!(world.bullets.count(Selector::ActiveTowardEnemies), 1);

        let delay = world.config().ship_fire_delay(false);
        world.update_ship(LOCAL_SHIP, InputFlags::empty(), delay);
        world.update_ship(LOCAL_SHIP, InputFlags::FIRE, DT);
        assert_eq!(world.bullets.count(Selector::ActiveTowardEnemies), 2);
    }

    #[test]
    fn fast_shot_shortens_reload() {
        let mut world = playing(quiet_config());
        world.ship_timers[LOCAL_SHIP].fast_shot = 1.0;
        world.update_ship(LOCAL_SHIP, InputFlags::FIRE, DT);
        let reload = world.ship_timers(LOCAL_SHIP).unwrap().reload;
        assert_eq!(reload, world.config().ship_fire_delay(true));
    }

    #[test]
    fn exhausted_bullets_do_not_reset_reload() {
        let mut world = playing(quiet_config());
        for _ in 0..BULLET_SLOTS {
            world.bullets.claim();
        }
        world.update_ship(LOCAL_SHIP, InputFlags::FIRE, DT);
        assert_eq!(world.ship_timers(LOCAL_SHIP).unwrap().reload, 0.0);
        assert!(!world.take_frame_cues().contains(SoundCue::SHIP_FIRE));
    }

    #[test]
    fn powerup_drops_use_their_half() {
        let mut world = playing(GameConfig {
            powerup_drop_percent: 100,
            alien_fire_chance: 0.0,
            ..GameConfig::default()
        });
        for i in 0..HORDE_COLS * 2 {
            world.kill_alien(i);
        }
        for (slot, powerup) in world.powerups.selected(Selector::AnyActive) {
            assert!(powerup_slot_range(powerup.kind).contains(&slot));
            assert_eq!(powerup.heading, Heading::TowardPlayer);
        }
        assert!(world.powerups.count(Selector::AnyActive) > 0);
    }

    #[test]
    fn powerup_pickup_sets_timer() {
        let mut world = playing(quiet_config());
        let slot = world.powerups.claim_in(powerup_slot_range(ObjectKind::FastMove)).unwrap();
        world.powerups[slot].kind = ObjectKind::FastMove;
        world.powerups[slot].bounds.pos = world.ships[REMOTE_SHIP].bounds.pos;

        world.resolve_collisions();

        assert!(!world.powerups[slot].is_active());
        let timers = world.ship_timers(REMOTE_SHIP).unwrap();
        assert_eq!(timers.fast_move, world.config().powerup_duration);
        assert_eq!(timers.fast_shot, 0.0);
    }

    #[test]
    fn projectiles_leave_the_screen() {
        let mut world = playing(quiet_config());
        let up = fire_bullet(&mut world, 500.0, 1.0, Heading::TowardEnemies);
        let down = fire_bullet(&mut world, 500.0, 1079.0, Heading::TowardPlayer);

        world.advance_projectiles(DT);

        assert!(!world.bullets[up].is_active());
        assert!(!world.bullets[down].is_active());
    }

    #[test]
    fn enemy_ship_sleeps_then_crosses() {
        let mut world = playing(quiet_config());
        let sleep = world.config().enemy_ship_sleep_time;

        world.update_enemy_ship(sleep / 2.0);
        assert!(!world.enemy_ship.is_active());

        world.update_enemy_ship(sleep);
        assert!(world.enemy_ship.is_active());
        assert!(world.music().contains(MusicFlags::ENEMY_SHIP));

        let crossing = world.config().screen_width / world.config().enemy_ship_speed;
        world.update_enemy_ship(crossing + 0.1);
        assert!(!world.enemy_ship.is_active());
        assert!(!world.music().contains(MusicFlags::ENEMY_SHIP));
        assert!(world.enemy_ship_velocity > 0.0);
    }

    #[test]
    fn enemy_ship_fires_on_cooldown() {
        let mut world = playing(quiet_config());
        let delay = world.config().enemy_ship_fire_delay;
        world.enemy_ship.state = ObjectState::Active;
        world.enemy_ship.bounds.pos = Vec2::new(1200.0, world.config().enemy_ship_y);
        world.enemy_timers.reload = delay;

        world.update_enemy_ship(DT);
        assert_eq!(world.bullets.count(Selector::AnyActive), 0);

        world.update_enemy_ship(delay);
        let ship = world.enemy_ship.bounds;
        let shots: Vec<_> = world.bullets.selected(Selector::ActiveTowardPlayer).collect();
        assert_eq!(shots.len(), 1);
        let (_, bullet) = shots[0];
        assert_eq!(bullet.bounds.top(), ship.bottom());
        assert!((bullet.bounds.center_x() - ship.center_x()).abs() < 1e-3);
        assert_eq!(world.enemy_timers.reload, delay);
        assert!(world.take_frame_cues().contains(SoundCue::ALIEN_FIRE));

        world.update_enemy_ship(DT);
        assert_eq!(world.bullets.count(Selector::ActiveTowardPlayer), 1);
    }

    #[test]
    fn every_live_alien_fires_at_full_chance() {
        let mut world = playing(GameConfig {
            alien_fire_chance: 1.0,
            powerup_drop_percent: 0,
            ..GameConfig::default()
        });
        for i in 10..HORDE_SLOTS {
            world.horde[i].state = ObjectState::Dead;
        }

        world.update_horde(DT);
        assert_eq!(world.bullets.count(Selector::ActiveTowardPlayer), 10);
        assert_eq!(world.bullets.count(Selector::ActiveTowardEnemies), 0);
        assert!(world.take_frame_cues().contains(SoundCue::ALIEN_FIRE));
        for (_, bullet) in world.bullets.selected(Selector::AnyActive) {
            let shooter = world
                .horde
                .selected(Selector::AnyActive)
                .find(|(_, alien)| (alien.bounds.center_x() - bullet.bounds.center_x()).abs() < 1e-3);
            let (_, alien) = shooter.unwrap();
            assert_eq!(bullet.bounds.top(), alien.bounds.bottom());
        }
    }

    #[test]
    fn horde_fire_stops_when_bullets_run_out() {
        let mut world = playing(GameConfig {
            alien_fire_chance: 1.0,
            powerup_drop_percent: 0,
            ..GameConfig::default()
        });
        assert!(HORDE_SLOTS > BULLET_SLOTS);

        world.update_horde(DT);
        assert_eq!(world.bullets.count(Selector::ActiveTowardPlayer), BULLET_SLOTS);
        world.take_frame_cues();

        world.update_horde(DT);
        assert_eq!(world.bullets.count(Selector::ActiveTowardPlayer), BULLET_SLOTS);
        assert!(!world.take_frame_cues().contains(SoundCue::ALIEN_FIRE));
    }

    #[test]
    fn enemy_ship_exit_tolerates_degenerate_screen() {
        let mut world = playing(GameConfig {
            screen_width: -1.0,
            ..quiet_config()
        });
        world.enemy_ship.state = ObjectState::Active;
        world.enemy_ship.bounds.pos.x = 10.0;

        world.update_enemy_ship(0.1);

        assert!(!world.enemy_ship.is_active());
        assert_eq!(world.enemy_ship.bounds.left(), 0.0);
    }

    #[test]
    fn enemy_ship_kill_counts() {
        let mut world = playing(quiet_config());
        world.enemy_ship.state = ObjectState::Active;
        world.enemy_ship.bounds.pos = Vec2::new(800.0, 50.0);
        let alive = world.enemies_alive();
        fire_bullet(&mut world, 810.0, 60.0, Heading::TowardEnemies);

        world.resolve_collisions();

        assert_eq!(world.enemy_ship.state, ObjectState::Dead);
        assert_eq!(world.enemies_alive(), alive - 1);
    }

    #[test]
    fn menu_flow() {
        let mut world = World::new(quiet_config(), 1);
        world.peer_joined();

        world.step(InputFlags::DOWN, DT);
        assert_eq!(world.menu(), MenuButton::Quit);
        assert!(world.take_frame_cues().contains(SoundCue::MENU));

        world.step(InputFlags::UP, DT);
        world.step(InputFlags::CONFIRM, DT);
        assert_eq!(world.state(), GameState::Playing);
        assert!(world.music().contains(MusicFlags::BACKGROUND));

        world.step(InputFlags::PAUSE, DT);
        assert_eq!(world.state(), GameState::Paused);
        world.step(InputFlags::PAUSE, DT);
        assert_eq!(world.state(), GameState::Playing);

        world.set_state(GameState::Lose);
        world.step(InputFlags::DOWN | InputFlags::CONFIRM, DT);
        assert_eq!(world.state(), GameState::Close);
    }

    #[test]
    fn restart_after_loss() {
        let mut world = playing(quiet_config());
        world.kill_alien(0);
        world.set_state(GameState::Lose);

        world.step(InputFlags::CONFIRM, DT);

        assert_eq!(world.state(), GameState::Playing);
        assert_eq!(world.enemies_alive(), (HORDE_SLOTS + 1) as u16);
        assert!(world.horde[0].is_active());
    }

    #[test]
    fn remote_inputs_move_second_ship_only() {
        let mut world = playing(quiet_config());
        let local = world.ships[LOCAL_SHIP].bounds;
        let remote = world.ships[REMOTE_SHIP].bounds;

        world.apply_remote_inputs([InputFlags::LEFT, InputFlags::LEFT, InputFlags::FIRE], DT);

        assert_eq!(world.ships[LOCAL_SHIP].bounds, local);
        assert!(world.ships[REMOTE_SHIP].bounds.left() < remote.left());
        assert_eq!(world.bullets.count(Selector::ActiveTowardEnemies), 1);
    }

    #[test]
    fn remote_inputs_ignored_outside_play() {
        let mut world = World::new(quiet_config(), 1);
        world.peer_joined();
        world.apply_remote_inputs([InputFlags::CONFIRM, InputFlags::FIRE], DT);
        assert_eq!(world.state(), GameState::Menu);
        assert_eq!(world.bullets.count(Selector::AnyActive), 0);
    }

    #[test]
    fn dead_ship_does_not_act() {
        let mut world = playing(quiet_config());
        world.ships[LOCAL_SHIP] = GameObject {
            state: ObjectState::Dead,
            ..world.ships[LOCAL_SHIP]
        };
        world.update_ship(LOCAL_SHIP, InputFlags::FIRE, DT);
        assert_eq!(world.bullets.count(Selector::AnyActive), 0);
    }
}
