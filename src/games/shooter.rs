//=========================================================================
// Shooter
//=========================================================================
//
// Top-down arena shooter against four wandering bots.
//
// Everything time-based runs through one `Scheduler`:
// ```text
//   Wander ──(+1000ms)──> StopWander        every 2000ms
//   EnemyVolley                             every 1500ms
//   SpawnPack ──(+15s)──> ExpirePack(id)    every 10s
//   kill ──(+3000ms)──> RespawnEnemy(i)
//   shot ──(+2000ms)──> ExpireBullet(id)
//   (re)spawn ──(+2000ms)──> EndInvulnerability
//   death ──(+3000ms)──> AutoRespawn
// ```
//
// Death ends the run; respawning is a full reset.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use glam::Vec2;
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::{ArcadeAction, Flow, Frame, Game, GameEvent, GameKind, Outcome};
use crate::core::physics::Aabb;
use crate::core::scheduler::Scheduler;

//=== Configuration =======================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterConfig {
    pub arena: Vec2,
    pub viewport: Vec2,
    /// Keeps random spawns away from the walls.
    pub spawn_margin: f32,
    pub fighter_size: Vec2,
    pub bullet_size: f32,
    pub pack_size: f32,

    pub player_speed: f32,
    pub max_health: i32,
    pub bullet_speed: f32,
    pub bullet_life_ms: u64,
    pub fire_cooldown_ms: u64,
    pub bullet_pool: usize,
    pub invulnerable_ms: u64,
    pub respawn_ms: u64,

    pub enemy_names: Vec<String>,
    pub enemy_health: i32,
    pub wander_every_ms: u64,
    pub wander_for_ms: u64,
    pub wander_speed: (f32, f32),
    pub volley_every_ms: u64,
    pub enemy_respawn_ms: u64,

    pub player_damage: i32,
    pub enemy_damage: i32,
    pub kill_points: u32,
    /// Mid-run submission whenever the score lands on a multiple of this.
    pub checkpoint_every: u32,

    pub packs_at_start: usize,
    pub pack_every_ms: u64,
    pub pack_life_ms: u64,
    pub pack_heal: i32,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            arena: Vec2::new(1600.0, 1200.0),
            viewport: Vec2::new(800.0, 600.0),
            spawn_margin: 100.0,
            fighter_size: Vec2::new(28.0, 40.0),
            bullet_size: 8.0,
            pack_size: 20.0,

            player_speed: 200.0,
            max_health: 100,
            bullet_speed: 800.0,
            bullet_life_ms: 2000,
            fire_cooldown_ms: 200,
            bullet_pool: 20,
            invulnerable_ms: 2000,
            respawn_ms: 3000,

            enemy_names: (1..=4).map(|i| format!("Player{i}")).collect(),
            enemy_health: 100,
            wander_every_ms: 2000,
            wander_for_ms: 1000,
            wander_speed: (50.0, 150.0),
            volley_every_ms: 1500,
            enemy_respawn_ms: 3000,

            player_damage: 25,
            enemy_damage: 10,
            kill_points: 10,
            checkpoint_every: 50,

            packs_at_start: 3,
            pack_every_ms: 10_000,
            pack_life_ms: 15_000,
            pack_heal: 25,
        }
    }
}

//=== Timers ==============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShooterTimer {
    Wander,
    StopWander,
    EnemyVolley,
    RespawnEnemy(usize),
    SpawnPack,
    ExpirePack(u64),
    ExpireBullet(u64),
    EndInvulnerability,
    AutoRespawn,
}

//=== Entities ============================================================

#[derive(Debug, Clone)]
struct Bullet {
    id: u64,
    aabb: Aabb,
    velocity: Vec2,
}

#[derive(Debug, Clone)]
struct Enemy {
    name: String,
    aabb: Aabb,
    velocity: Vec2,
    health: i32,
    active: bool,
}

#[derive(Debug, Clone)]
struct HealthPack {
    id: u64,
    aabb: Aabb,
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

//=== Shooter =============================================================

pub struct Shooter {
    config: ShooterConfig,
    player: Aabb,
    health: i32,
    invulnerable: bool,
    enemies: Vec<Enemy>,
    player_bullets: Vec<Bullet>,
    enemy_bullets: Vec<Bullet>,
    packs: Vec<HealthPack>,
    timers: Scheduler<ShooterTimer>,
    last_shot: Option<Duration>,
    next_id: u64,
    score: u32,
}

impl Shooter {
    pub fn new(config: ShooterConfig) -> Self {
        Self {
            player: Aabb::new(config.arena / 2.0, config.fighter_size),
            health: config.max_health,
            invulnerable: false,
            enemies: Vec::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            packs: Vec::new(),
            timers: Scheduler::new(),
            last_shot: None,
            next_id: 0,
            score: 0,
            config,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }

    pub fn player_position(&self) -> Vec2 {
        self.player.center
    }

    pub fn active_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.active).count()
    }

    pub fn player_bullet_count(&self) -> usize {
        self.player_bullets.len()
    }

    pub fn enemy_bullet_count(&self) -> usize {
        self.enemy_bullets.len()
    }

    pub fn pack_count(&self) -> usize {
        self.packs.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Top-left of the view, following the player and clamped to the arena.
    pub fn camera_origin(&self) -> Vec2 {
        let max = (self.config.arena - self.config.viewport).max(Vec2::ZERO);
        (self.player.center - self.config.viewport / 2.0).clamp(Vec2::ZERO, max)
    }

    //--- Helpers ----------------------------------------------------------

    fn random_spot(&self, rng: &mut StdRng) -> Vec2 {
        let m = self.config.spawn_margin;
        let a = self.config.arena;
        Vec2::new(rng.gen_range(m..=a.x - m), rng.gen_range(m..=a.y - m))
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn clamp_to_arena(&self, aabb: &mut Aabb) {
        aabb.center = aabb.center.clamp(aabb.half, self.config.arena - aabb.half);
    }

    fn make_bullet(&mut self, now: Duration, from: Vec2, target: Vec2) -> Bullet {
        let d = target - from;
        let angle = d.y.atan2(d.x);
        let id = self.next_id();
        self.timers.schedule_in(now, ms(self.config.bullet_life_ms), ShooterTimer::ExpireBullet(id));
        Bullet {
            id,
            aabb: Aabb::new(from, Vec2::splat(self.config.bullet_size)),
            velocity: Vec2::new(angle.cos(), angle.sin()) * self.config.bullet_speed,
        }
    }

    fn spawn_pack(&mut self, now: Duration, rng: &mut StdRng) {
        let id = self.next_id();
        let at = self.random_spot(rng);
        self.packs.push(HealthPack { id, aabb: Aabb::new(at, Vec2::splat(self.config.pack_size)) });
        self.timers.schedule_in(now, ms(self.config.pack_life_ms), ShooterTimer::ExpirePack(id));
    }

    //--- Timers -----------------------------------------------------------

    fn run_timers(&mut self, now: Duration, rng: &mut StdRng) {
        for timer in self.timers.poll(now) {
            match timer {
                ShooterTimer::Wander => {
                    let (lo, hi) = self.config.wander_speed;
                    for enemy in self.enemies.iter_mut().filter(|e| e.active) {
                        let angle = rng.gen_range(0.0..360.0f32).to_radians();
                        let speed = rng.gen_range(lo..=hi);
                        enemy.velocity = Vec2::new(angle.cos(), angle.sin()) * speed;
                    }
                    self.timers.schedule_in(now, ms(self.config.wander_for_ms), ShooterTimer::StopWander);
                    self.timers.schedule_in(now, ms(self.config.wander_every_ms), ShooterTimer::Wander);
                }
                ShooterTimer::StopWander => {
                    for enemy in &mut self.enemies {
                        enemy.velocity = Vec2::ZERO;
                    }
                }
                ShooterTimer::EnemyVolley => {
                    let target = self.player.center;
                    let shooters: Vec<Vec2> =
                        self.enemies.iter().filter(|e| e.active).map(|e| e.aabb.center).collect();
                    for from in shooters {
                        let bullet = self.make_bullet(now, from, target);
                        self.enemy_bullets.push(bullet);
                    }
                    self.timers.schedule_in(now, ms(self.config.volley_every_ms), ShooterTimer::EnemyVolley);
                }
                ShooterTimer::RespawnEnemy(index) => {
                    let at = self.random_spot(rng);
                    let health = self.config.enemy_health;
                    if let Some(enemy) = self.enemies.get_mut(index) {
                        enemy.aabb.center = at;
                        enemy.velocity = Vec2::ZERO;
                        enemy.health = health;
                        enemy.active = true;
                    }
                }
                ShooterTimer::SpawnPack => {
                    self.spawn_pack(now, rng);
                    self.timers.schedule_in(now, ms(self.config.pack_every_ms), ShooterTimer::SpawnPack);
                }
                ShooterTimer::ExpirePack(id) => self.packs.retain(|p| p.id != id),
                ShooterTimer::ExpireBullet(id) => {
                    self.player_bullets.retain(|b| b.id != id);
                    self.enemy_bullets.retain(|b| b.id != id);
                }
                ShooterTimer::EndInvulnerability => self.invulnerable = false,
                ShooterTimer::AutoRespawn => {}
            }
        }
    }

    //--- Player -----------------------------------------------------------

    fn move_player(&mut self, frame: &Frame<'_>) {
        let mut dir = Vec2::ZERO;
        if frame.held(ArcadeAction::Left) {
            dir.x = -1.0;
        } else if frame.held(ArcadeAction::Right) {
            dir.x = 1.0;
        }
        if frame.held(ArcadeAction::Up) {
            dir.y = -1.0;
        } else if frame.held(ArcadeAction::Down) {
            dir.y = 1.0;
        }

        let mut player = self.player;
        player.center += dir * self.config.player_speed * frame.dt();
        self.clamp_to_arena(&mut player);
        self.player = player;
    }

    /// Shoots toward the pointer (viewport coordinates). Rejected during
    /// the cooldown or when every pooled bullet is in flight.
    fn fire(&mut self, now: Duration, pointer: Vec2) -> bool {
        if let Some(last) = self.last_shot {
            if now < last + ms(self.config.fire_cooldown_ms) {
                return false;
            }
        }
        if self.player_bullets.len() >= self.config.bullet_pool {
            return false;
        }
        self.last_shot = Some(now);

        let target = self.camera_origin() + pointer;
        let bullet = self.make_bullet(now, self.player.center, target);
        self.player_bullets.push(bullet);
        true
    }

    //--- World ------------------------------------------------------------

    fn move_entities(&mut self, dt: f32) {
        for i in 0..self.enemies.len() {
            let mut aabb = self.enemies[i].aabb;
            aabb.center += self.enemies[i].velocity * dt;
            self.clamp_to_arena(&mut aabb);
            self.enemies[i].aabb = aabb;
        }

        for bullet in self.player_bullets.iter_mut().chain(self.enemy_bullets.iter_mut()) {
            bullet.aabb.center += bullet.velocity * dt;
        }
        let arena = Aabb::from_min_max(Vec2::ZERO, self.config.arena);
        self.player_bullets.retain(|b| arena.contains(b.aabb.center));
        self.enemy_bullets.retain(|b| arena.contains(b.aabb.center));
    }

    fn hit_enemies(&mut self, now: Duration, events: &mut Vec<GameEvent>) {
        let damage = self.config.player_damage;
        let mut kills = Vec::new();

        for (index, enemy) in self.enemies.iter_mut().enumerate().filter(|(_, e)| e.active) {
            let before = self.player_bullets.len();
            self.player_bullets.retain(|b| !b.aabb.overlaps(&enemy.aabb));
            let hits = (before - self.player_bullets.len()) as i32;
            if hits == 0 {
                continue;
            }
            enemy.health -= hits * damage;
            if enemy.health <= 0 {
                enemy.active = false;
                enemy.velocity = Vec2::ZERO;
                debug!(target: "arcade::shooter", "{} down", enemy.name);
                kills.push(index);
            }
        }

        for index in kills {
            self.score += self.config.kill_points;
            self.timers.schedule_in(now, ms(self.config.enemy_respawn_ms), ShooterTimer::RespawnEnemy(index));
            if self.config.checkpoint_every > 0 && self.score % self.config.checkpoint_every == 0 {
                events.push(GameEvent::Checkpoint(self.score));
            }
        }
    }

    /// Enemy bullets pass through while invulnerable.
    fn hit_player(&mut self) {
        if self.invulnerable {
            return;
        }
        let player = self.player;
        let before = self.enemy_bullets.len();
        self.enemy_bullets.retain(|b| !b.aabb.overlaps(&player));
        let hits = (before - self.enemy_bullets.len()) as i32;
        self.health -= hits * self.config.enemy_damage;
    }

    fn pick_packs(&mut self) {
        let player = self.player;
        let before = self.packs.len();
        self.packs.retain(|p| !p.aabb.overlaps(&player));
        let picked = (before - self.packs.len()) as i32;
        if picked > 0 {
            self.health = (self.health + picked * self.config.pack_heal).min(self.config.max_health);
        }
    }
}

impl Game for Shooter {
    fn kind(&self) -> GameKind {
        GameKind::Shooter
    }

    fn reset(&mut self, now: Duration, rng: &mut StdRng) {
        self.timers.clear();
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.packs.clear();
        self.last_shot = None;
        self.score = 0;

        let at = self.random_spot(rng);
        self.player = Aabb::new(at, self.config.fighter_size);
        self.health = self.config.max_health;
        self.invulnerable = true;

        let names = self.config.enemy_names.clone();
        self.enemies = names
            .into_iter()
            .map(|name| Enemy {
                name,
                aabb: Aabb::new(self.random_spot(rng), self.config.fighter_size),
                velocity: Vec2::ZERO,
                health: self.config.enemy_health,
                active: true,
            })
            .collect();

        for _ in 0..self.config.packs_at_start {
            self.spawn_pack(now, rng);
        }

        let c = &self.config;
        let schedule = [
            (c.wander_every_ms, ShooterTimer::Wander),
            (c.volley_every_ms, ShooterTimer::EnemyVolley),
            (c.pack_every_ms, ShooterTimer::SpawnPack),
            (c.invulnerable_ms, ShooterTimer::EndInvulnerability),
        ];
        for (delay, timer) in schedule {
            self.timers.schedule_in(now, ms(delay), timer);
        }
    }

    fn step(&mut self, frame: &Frame<'_>, rng: &mut StdRng, events: &mut Vec<GameEvent>) -> Flow {
        self.run_timers(frame.now, rng);

        self.move_player(frame);
        if frame.pressed(ArcadeAction::Fire) {
            self.fire(frame.now, frame.pointer);
        }
        self.move_entities(frame.dt());

        self.hit_enemies(frame.now, events);
        self.hit_player();
        self.pick_packs();

        if self.health <= 0 {
            self.timers.clear();
            self.timers.schedule_in(frame.now, ms(self.config.respawn_ms), ShooterTimer::AutoRespawn);
            return Flow::Finished(Outcome::Lost);
        }
        Flow::Continue
    }

    fn score(&self) -> u32 {
        self.score
    }

    /// Click, or the automatic respawn timer.
    fn restart_requested(&mut self, frame: &Frame<'_>) -> bool {
        frame.pressed(ArcadeAction::Fire)
            || self.timers.poll(frame.now).contains(&ShooterTimer::AutoRespawn)
    }

    fn hud(&self) -> String {
        format!("Score: {} | Health: {}", self.score, self.health.max(0))
    }

    fn restart_hint(&self) -> &'static str {
        "Click to respawn"
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::{Driver, STEP};
    use approx::assert_relative_eq;

    fn game() -> (Shooter, Driver) {
        let mut game = Shooter::new(ShooterConfig::default());
        let mut driver = Driver::new(8);
        driver.reset(&mut game);
        (game, driver)
    }

    /// Parks the player in the middle of the arena, enemies far away.
    fn quiet(game: &mut Shooter) {
        game.player.center = Vec2::new(800.0, 600.0);
        for (i, enemy) in game.enemies.iter_mut().enumerate() {
            enemy.aabb.center = Vec2::new(150.0 + i as f32 * 60.0, 150.0);
        }
        game.packs.clear();
    }

    fn frame(driver: &Driver) -> Frame<'_> {
        Frame::new(driver.now, STEP, &driver.input, driver.pointer)
    }

    #[test]
    fn start_state() {
        let (game, _) = game();
        assert_eq!(game.health(), 100);
        assert!(game.is_invulnerable());
        assert_eq!(game.active_enemies(), 4);
        assert_eq!(game.pack_count(), 3);
        assert_eq!(game.enemies[0].name, "Player1");

        let p = game.player_position();
        assert!((100.0..=1500.0).contains(&p.x));
        assert!((100.0..=1100.0).contains(&p.y));
    }

    #[test]
    fn left_wins_over_right() {
        let (mut game, mut driver) = game();
        quiet(&mut game);
        driver.input.hold(ArcadeAction::Left);
        driver.input.hold(ArcadeAction::Right);
        driver.step(&mut game);
        assert!(game.player_position().x < 800.0);
    }

    #[test]
    fn player_stays_in_arena() {
        let (mut game, mut driver) = game();
        game.player.center = Vec2::new(15.0, 21.0);
        driver.input.hold(ArcadeAction::Left);
        driver.input.hold(ArcadeAction::Up);
        game.move_player(&frame(&driver));
        assert_eq!(game.player_position(), Vec2::new(14.0, 20.0));
    }

    #[test]
    fn shots_fly_toward_pointer() {
        let (mut game, _) = game();
        quiet(&mut game);
        // Camera centred on the player: viewport (600, 300) is 200px right
        assert!(game.fire(Duration::from_secs(1), Vec2::new(600.0, 300.0)));
        let v = game.player_bullets[0].velocity;
        assert_relative_eq!(v.x, 800.0, epsilon = 1e-3);
        assert_relative_eq!(v.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn camera_clamps_at_arena_corner() {
        let (mut game, _) = game();
        game.player.center = Vec2::new(50.0, 1180.0);
        assert_eq!(game.camera_origin(), Vec2::new(0.0, 600.0));
    }

    #[test]
    fn cooldown_rejects_rapid_fire() {
        let (mut game, _) = game();
        quiet(&mut game);
        let t = Duration::from_secs(1);
        assert!(game.fire(t, Vec2::ZERO));
        assert!(!game.fire(t + ms(150), Vec2::ZERO));
        assert!(game.fire(t + ms(200), Vec2::ZERO));
        assert_eq!(game.player_bullet_count(), 2);
    }

    #[test]
    fn empty_pool_rejects_without_touching_cooldown() {
        let (mut game, _) = game();
        quiet(&mut game);
        let mut t = Duration::from_secs(1);
        for _ in 0..20 {
            assert!(game.fire(t, Vec2::ZERO));
            t += ms(200);
        }
        let last = game.last_shot;
        assert!(!game.fire(t, Vec2::ZERO));
        assert_eq!(game.last_shot, last);
        assert_eq!(game.player_bullet_count(), 20);
    }

    #[test]
    fn bullets_expire_after_two_seconds() {
        let (mut game, mut driver) = game();
        quiet(&mut game);
        // Slow bullet so it stays in the arena
        game.config.bullet_speed = 10.0;
        game.fire(driver.now, Vec2::new(400.0, 300.0));
        assert_eq!(game.player_bullet_count(), 1);

        driver.advance(ms(1990));
        game.run_timers(driver.now, &mut driver.rng);
        assert_eq!(game.player_bullet_count(), 1);
        driver.advance(ms(10));
        game.run_timers(driver.now, &mut driver.rng);
        assert_eq!(game.player_bullet_count(), 0);
    }

    #[test]
    fn four_hits_kill_and_enemy_respawns_later() {
        let (mut game, mut driver) = game();
        quiet(&mut game);
        let target = game.enemies[0].aabb.center;
        for _ in 0..4 {
            let b = game.make_bullet(driver.now, target, target + Vec2::X);
            game.player_bullets.push(b);
        }

        game.hit_enemies(driver.now, &mut driver.events);
        assert_eq!(game.score(), 10);
        assert_eq!(game.active_enemies(), 3);
        assert!(driver.events.is_empty());

        driver.advance(ms(3000));
        game.run_timers(driver.now, &mut driver.rng);
        assert_eq!(game.active_enemies(), 4);
        assert_eq!(game.enemies[0].health, 100);
    }

    #[test]
    fn three_hits_only_wound() {
        let (mut game, mut driver) = game();
        quiet(&mut game);
        let target = game.enemies[1].aabb.center;
        for _ in 0..3 {
            let b = game.make_bullet(driver.now, target, target + Vec2::X);
            game.player_bullets.push(b);
        }
        game.hit_enemies(driver.now, &mut driver.events);
        assert_eq!(game.enemies[1].health, 25);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn checkpoint_on_multiples_of_fifty() {
        let (mut game, mut driver) = game();
        quiet(&mut game);
        game.score = 40;
        game.enemies[2].health = 25;
        let target = game.enemies[2].aabb.center;
        let b = game.make_bullet(driver.now, target, target + Vec2::X);
        game.player_bullets.push(b);

        game.hit_enemies(driver.now, &mut driver.events);
        assert_eq!(driver.events, vec![GameEvent::Checkpoint(50)]);
    }

    #[test]
    fn invulnerability_blocks_then_expires() {
        let (mut game, mut driver) = game();
        quiet(&mut game);
        let at = game.player.center;
        let b = game.make_bullet(driver.now, at, at + Vec2::X);
        game.enemy_bullets.push(b);
        game.hit_player();
        assert_eq!(game.health(), 100);

        driver.advance(ms(2000));
        game.run_timers(driver.now, &mut driver.rng);
        assert!(!game.is_invulnerable());

        let b = game.make_bullet(driver.now, at, at + Vec2::X);
        game.enemy_bullets.push(b);
        game.hit_player();
        assert_eq!(game.health(), 90);
    }

    #[test]
    fn death_ends_run_and_auto_respawns() {
        let (mut game, mut driver) = game();
        quiet(&mut game);
        game.invulnerable = false;
        game.health = 10;
        let at = game.player.center;
        let b = game.make_bullet(driver.now, at, at + Vec2::X);
        game.enemy_bullets.push(b);

        assert_eq!(driver.step(&mut game), Flow::Finished(Outcome::Lost));
        assert_eq!(game.pending_timers(), 1);

        driver.advance(ms(2900));
        assert!(!game.restart_requested(&frame(&driver)));
        driver.advance(ms(200));
        assert!(game.restart_requested(&frame(&driver)));
    }

    #[test]
    fn click_respawns_immediately() {
        let (mut game, mut driver) = game();
        game.health = 0;
        driver.input.press(ArcadeAction::Fire);
        assert!(game.restart_requested(&frame(&driver)));
    }

    #[test]
    fn health_pack_heals_up_to_max() {
        let (mut game, mut driver) = game();
        quiet(&mut game);
        game.health = 90;
        game.spawn_pack(driver.now, &mut driver.rng);
        game.packs[0].aabb.center = game.player.center;

        game.pick_packs();
        assert_eq!(game.health(), 100);
        assert_eq!(game.pack_count(), 0);
    }

    #[test]
    fn packs_spawn_every_ten_seconds_and_expire() {
        let (mut game, mut driver) = game();
        game.packs.clear();
        driver.advance(ms(10_000));
        game.run_timers(driver.now, &mut driver.rng);
        assert_eq!(game.pack_count(), 1);

        driver.advance(ms(15_000));
        game.run_timers(driver.now, &mut driver.rng);
        // The 20s pack is still fresh; the 10s one is gone
        assert_eq!(game.pack_count(), 1);
    }

    #[test]
    fn enemies_wander_then_stop() {
        let (mut game, mut driver) = game();
        driver.advance(ms(2000));
        game.run_timers(driver.now, &mut driver.rng);
        for enemy in &game.enemies {
            let speed = enemy.velocity.length();
            assert!((49.9..=150.1).contains(&speed), "speed {speed}");
        }

        driver.advance(ms(1000));
        game.run_timers(driver.now, &mut driver.rng);
        assert!(game.enemies.iter().all(|e| e.velocity == Vec2::ZERO));
    }

    #[test]
    fn volley_fires_one_bullet_per_active_enemy() {
        let (mut game, mut driver) = game();
        game.enemies[3].active = false;
        driver.advance(ms(1500));
        game.run_timers(driver.now, &mut driver.rng);
        assert_eq!(game.enemy_bullet_count(), 3);
    }

    #[test]
    fn respawn_is_a_full_reset() {
        let (mut game, mut driver) = game();
        game.score = 70;
        game.health = 0;
        game.player_bullets.clear();
        driver.reset(&mut game);

        assert_eq!(game.score(), 0);
        assert_eq!(game.health(), 100);
        assert!(game.is_invulnerable());
        assert_eq!(game.hud(), "Score: 0 | Health: 100");
    }
}
