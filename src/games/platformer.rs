//=========================================================================
// Platformer
//=========================================================================
//
// One fixed level: run, jump, collect coins, stomp enemies, reach the flag.
//
// Per tick:
//   enemy patrol → player input → integrate + platform contacts
//   → coins → enemies (stomp or death) → flag
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use glam::Vec2;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::{ArcadeAction, Flow, Frame, Game, GameEvent, GameKind, Outcome};
use crate::core::physics::{Aabb, ArcadeWorld, Body};

//=== Configuration =======================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub at: Vec2,
    /// Patrol runs from `at.x` to `at.x + distance`.
    pub distance: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerConfig {
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
    pub player_start: Vec2,
    pub player_size: f32,
    pub bounce: f32,
    pub run_speed: f32,
    pub jump_speed: f32,
    pub stomp_rebound: f32,
    /// How far above the enemy centre the player must be to stomp.
    pub stomp_margin: f32,
    pub platform_size: Vec2,
    pub platforms: Vec<Vec2>,
    /// Left coin of each row of three.
    pub coin_rows: Vec<Vec2>,
    pub coins_per_row: usize,
    pub coin_spacing: f32,
    pub coin_size: f32,
    pub enemy_size: Vec2,
    pub enemies: Vec<EnemySpawn>,
    pub flag: Vec2,
    pub flag_size: f32,
    pub coin_points: u32,
    pub stomp_points: u32,
    pub coin_bonus: u32,
}

impl Default for PlatformerConfig {
    fn default() -> Self {
        let enemy = |x: f32, platform_y: f32, distance: f32| EnemySpawn {
            at: Vec2::new(x, platform_y - 30.0),
            distance,
            speed: 100.0,
        };
        Self {
            width: 800.0,
            height: 500.0,
            gravity: 900.0,
            player_start: Vec2::new(100.0, 300.0),
            player_size: 32.0,
            bounce: 0.2,
            run_speed: 200.0,
            jump_speed: 500.0,
            stomp_rebound: 300.0,
            stomp_margin: 20.0,
            platform_size: Vec2::new(100.0, 20.0),
            platforms: vec![
                Vec2::new(300.0, 400.0),
                Vec2::new(500.0, 350.0),
                Vec2::new(200.0, 300.0),
                Vec2::new(400.0, 250.0),
                Vec2::new(600.0, 200.0),
                Vec2::new(100.0, 150.0),
                Vec2::new(700.0, 150.0),
            ],
            coin_rows: vec![
                Vec2::new(300.0, 370.0),
                Vec2::new(500.0, 320.0),
                Vec2::new(200.0, 270.0),
                Vec2::new(400.0, 220.0),
                Vec2::new(600.0, 170.0),
                Vec2::new(100.0, 120.0),
            ],
            coins_per_row: 3,
            coin_spacing: 30.0,
            coin_size: 20.0,
            enemy_size: Vec2::new(40.0, 20.0),
            enemies: vec![
                enemy(350.0, 400.0, 200.0),
                enemy(300.0, 300.0, 150.0),
                enemy(450.0, 250.0, 150.0),
            ],
            flag: Vec2::new(700.0, 100.0),
            flag_size: 50.0,
            coin_points: 10,
            stomp_points: 20,
            coin_bonus: 5,
        }
    }
}

//=== Entities ============================================================

#[derive(Debug, Clone)]
struct Enemy {
    body: Body,
    start_x: f32,
    end_x: f32,
    speed: f32,
    moving_right: bool,
}

impl Enemy {
    fn patrol(&mut self) {
        let x = self.body.center().x;
        if self.moving_right && x >= self.end_x {
            self.moving_right = false;
        } else if !self.moving_right && x <= self.start_x {
            self.moving_right = true;
        }
        self.body.velocity.x = if self.moving_right { self.speed } else { -self.speed };
    }
}

//=== Platformer ==========================================================

pub struct Platformer {
    config: PlatformerConfig,
    world: ArcadeWorld,
    platforms: Vec<Aabb>,
    player: Body,
    coins: Vec<Aabb>,
    total_coins: usize,
    enemies: Vec<Enemy>,
    flag: Aabb,
    score: u32,
    coins_taken: u32,
}

impl Platformer {
    pub fn new(config: PlatformerConfig) -> Self {
        let world = ArcadeWorld::new(Vec2::new(config.width, config.height), config.gravity);
        let platforms = Self::build_platforms(&config);
        let flag = Aabb::new(config.flag, Vec2::splat(config.flag_size));
        let mut level = Self {
            world,
            platforms,
            player: Self::spawn_player(&config),
            coins: Vec::new(),
            total_coins: 0,
            enemies: Vec::new(),
            flag,
            score: 0,
            coins_taken: 0,
            config,
        };
        level.populate();
        level
    }

    /// Ground row along the bottom plus the floating platforms.
    fn build_platforms(config: &PlatformerConfig) -> Vec<Aabb> {
        let step = config.platform_size.x.max(1.0);
        let ground_y = config.height - config.platform_size.y;
        let ground = (0..)
            .map(|i| i as f32 * step)
            .take_while(|&x| x < config.width)
            .map(|x| Vec2::new(x, ground_y));

        ground
            .chain(config.platforms.iter().copied())
            .map(|centre| Aabb::new(centre, config.platform_size))
            .collect()
    }

    fn spawn_player(config: &PlatformerConfig) -> Body {
        Body::new(config.player_start, Vec2::splat(config.player_size))
            .with_bounce(config.bounce)
            .with_world_bounds()
    }

    /// Coins and enemies back to their starting layout.
    fn populate(&mut self) {
        let c = &self.config;
        self.coins = c
            .coin_rows
            .iter()
            .flat_map(|base| {
                (0..c.coins_per_row)
                    .map(move |i| Vec2::new(base.x + i as f32 * c.coin_spacing, base.y))
            })
            .map(|at| Aabb::new(at, Vec2::splat(c.coin_size)))
            .collect();
        self.total_coins = self.coins.len();

        self.enemies = c
            .enemies
            .iter()
            .map(|spawn| Enemy {
                body: Body::new(spawn.at, c.enemy_size).with_world_bounds(),
                start_x: spawn.at.x,
                end_x: spawn.at.x + spawn.distance,
                speed: spawn.speed,
                moving_right: true,
            })
            .collect();
    }

    //--- Queries ----------------------------------------------------------

    pub fn player(&self) -> &Body {
        &self.player
    }

    pub fn coins_left(&self) -> usize {
        self.coins.len()
    }

    pub fn total_coins(&self) -> usize {
        self.total_coins
    }

    pub fn coins_taken(&self) -> u32 {
        self.coins_taken
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn platform_count(&self) -> usize {
        self.platforms.len()
    }

    //--- Rules ------------------------------------------------------------

    fn control_player(&mut self, frame: &Frame<'_>) {
        self.player.velocity.x = if frame.held(ArcadeAction::Left) {
            -self.config.run_speed
        } else if frame.held(ArcadeAction::Right) {
            self.config.run_speed
        } else {
            0.0
        };

        if frame.held(ArcadeAction::Up) && self.player.on_floor() {
            self.player.velocity.y = -self.config.jump_speed;
        }
    }

    fn simulate(&mut self, dt: f32) {
        self.world.integrate(&mut self.player, dt);
        for platform in &self.platforms {
            self.world.collide_solid(&mut self.player, platform);
        }

        for enemy in &mut self.enemies {
            self.world.integrate(&mut enemy.body, dt);
            for platform in &self.platforms {
                self.world.collide_solid(&mut enemy.body, platform);
            }
        }
    }

    fn collect_coins(&mut self) {
        let player = self.player.aabb;
        let before = self.coins.len();
        self.coins.retain(|coin| !coin.overlaps(&player));
        let taken = (before - self.coins.len()) as u32;
        self.coins_taken += taken;
        self.score += taken * self.config.coin_points;
    }

    /// Stomps every enemy hit from above; any other contact loses.
    fn touch_enemies(&mut self) -> Option<Outcome> {
        let player = self.player.aabb;
        let falling = self.player.velocity.y > 0.0;
        let margin = self.config.stomp_margin;

        let mut stomped = 0;
        let mut hurt = false;
        self.enemies.retain(|enemy| {
            if !enemy.body.aabb.overlaps(&player) {
                return true;
            }
            if falling && player.center.y < enemy.body.center().y - margin {
                stomped += 1;
                false
            } else {
                hurt = true;
                true
            }
        });

        if stomped > 0 {
            self.score += stomped * self.config.stomp_points;
            self.player.velocity.y = -self.config.stomp_rebound;
        }
        hurt.then_some(Outcome::Lost)
    }

    /// Single exit for both outcomes.
    fn end_game(&mut self, outcome: Outcome) -> Flow {
        self.player.velocity = Vec2::ZERO;
        Flow::Finished(outcome)
    }
}

impl Game for Platformer {
    fn kind(&self) -> GameKind {
        GameKind::Platformer
    }

    fn reset(&mut self, _now: Duration, _rng: &mut StdRng) {
        self.player = Self::spawn_player(&self.config);
        self.populate();
        self.score = 0;
        self.coins_taken = 0;
    }

    fn step(&mut self, frame: &Frame<'_>, _rng: &mut StdRng, _events: &mut Vec<GameEvent>) -> Flow {
        for enemy in &mut self.enemies {
            enemy.patrol();
        }
        self.control_player(frame);
        self.simulate(frame.dt());

        self.collect_coins();
        if let Some(outcome) = self.touch_enemies() {
            return self.end_game(outcome);
        }
        if self.player.aabb.overlaps(&self.flag) {
            return self.end_game(Outcome::Won);
        }
        Flow::Continue
    }

    fn score(&self) -> u32 {
        self.score
    }

    /// Score plus the per-coin bonus.
    fn final_score(&self) -> u32 {
        self.score + self.coins_taken * self.config.coin_bonus
    }

    fn hud(&self) -> String {
        format!("Score: {} | Coins: {}/{}", self.score, self.coins_taken, self.total_coins)
    }

    /// Coin bonus included.
    fn over_hud(&self) -> String {
        format!("Score: {} | Coins: {}/{}", self.final_score(), self.coins_taken, self.total_coins)
    }

    fn over_banner(&self, outcome: Outcome) -> &'static str {
        match outcome {
            Outcome::Won => "LEVEL COMPLETE!",
            Outcome::Lost => "GAME OVER",
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::Driver;

    fn game() -> (Platformer, Driver) {
        let mut game = Platformer::new(PlatformerConfig::default());
        let mut driver = Driver::new(4);
        driver.reset(&mut game);
        (game, driver)
    }

    #[test]
    fn level_layout() {
        let (game, _) = game();
        assert_eq!(game.platform_count(), 15);
        assert_eq!(game.total_coins(), 18);
        assert_eq!(game.enemy_count(), 3);
    }

    #[test]
    fn player_lands_on_ground_then_jumps() {
        let (mut game, mut driver) = game();
        assert_eq!(driver.run(&mut game, 120), Flow::Continue);
        assert!(game.player().on_floor());
        assert!((game.player().center().y - 454.0).abs() < 0.5);

        driver.input.hold(ArcadeAction::Up);
        driver.step(&mut game);
        assert!(game.player().velocity.y < -400.0);
    }

    #[test]
    fn no_jump_in_mid_air() {
        let (mut game, mut driver) = game();
        driver.input.hold(ArcadeAction::Up);
        driver.step(&mut game);
        assert!(game.player().velocity.y > 0.0);
    }

    #[test]
    fn horizontal_speed_follows_input() {
        let (mut game, mut driver) = game();
        driver.input.hold(ArcadeAction::Left);
        driver.step(&mut game);
        assert_eq!(game.player().velocity.x, -200.0);

        driver.input.release(ArcadeAction::Left);
        driver.step(&mut game);
        assert_eq!(game.player().velocity.x, 0.0);
    }

    #[test]
    fn coin_adds_ten() {
        let (mut game, mut driver) = game();
        game.player.teleport(Vec2::new(300.0, 370.0));
        driver.step(&mut game);

        assert_eq!(game.score(), 10);
        assert_eq!(game.coins_taken(), 1);
        assert_eq!(game.coins_left(), 17);
        assert_eq!(game.hud(), "Score: 10 | Coins: 1/18");
    }

    #[test]
    fn falling_onto_enemy_stomps_it() {
        let (mut game, _) = game();
        let enemy = game.enemies[0].body.center();
        game.player.teleport(enemy - Vec2::new(0.0, 24.0));
        game.player.velocity.y = 150.0;

        assert_eq!(game.touch_enemies(), None);
        assert_eq!(game.enemy_count(), 2);
        assert_eq!(game.score(), 20);
        assert_eq!(game.player().velocity.y, -300.0);
    }

    #[test]
    fn side_contact_loses() {
        let (mut game, _) = game();
        let enemy = game.enemies[1].body.center();
        game.player.teleport(enemy - Vec2::new(30.0, 0.0));

        assert_eq!(game.touch_enemies(), Some(Outcome::Lost));
        assert_eq!(game.enemy_count(), 3);
    }

    #[test]
    fn flag_wins_with_coin_bonus() {
        let (mut game, mut driver) = game();
        game.player.teleport(Vec2::new(300.0, 370.0));
        driver.step(&mut game);

        game.player.teleport(Vec2::new(700.0, 100.0));
        assert_eq!(driver.step(&mut game), Flow::Finished(Outcome::Won));
        assert_eq!(game.final_score(), 15);
        assert_eq!(game.over_banner(Outcome::Won), "LEVEL COMPLETE!");
        assert_eq!(game.hud(), "Score: 10 | Coins: 1/18");
        assert_eq!(game.over_hud(), "Score: 15 | Coins: 1/18");
    }

    #[test]
    fn enemy_turns_at_patrol_end() {
        let (mut game, _) = game();
        let enemy = &mut game.enemies[0];
        enemy.body.teleport(Vec2::new(enemy.end_x + 1.0, 370.0));
        enemy.patrol();
        assert!(enemy.body.velocity.x < 0.0);

        enemy.body.teleport(Vec2::new(enemy.start_x - 1.0, 370.0));
        enemy.patrol();
        assert!(enemy.body.velocity.x > 0.0);
    }

    #[test]
    fn reset_restores_level() {
        let (mut game, mut driver) = game();
        game.player.teleport(Vec2::new(300.0, 370.0));
        driver.step(&mut game);
        game.enemies.clear();

        driver.reset(&mut game);
        assert_eq!(game.score(), 0);
        assert_eq!(game.coins_left(), 18);
        assert_eq!(game.enemy_count(), 3);
        assert_eq!(game.player().center(), Vec2::new(100.0, 300.0));
    }
}
