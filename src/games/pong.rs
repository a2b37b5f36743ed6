//=========================================================================
// Pong
//=========================================================================
//
// Player paddle on the left, computer paddle on the right, first to
// `winning_points` wins.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f32::consts::FRAC_PI_4;
use std::time::Duration;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::{ArcadeAction, Flow, Frame, Game, GameEvent, GameKind, Outcome};
use crate::core::physics::Aabb;

//=== Configuration =======================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongConfig {
    pub width: f32,
    pub height: f32,
    pub paddle_size: Vec2,
    pub player_x: f32,
    pub computer_x: f32,
    pub ball_size: f32,
    pub player_speed: f32,
    pub computer_speed: f32,
    /// Chance the computer aims true; above it a random error is added.
    pub difficulty: f32,
    pub aim_error: f32,
    pub dead_zone: f32,
    pub serve_speed: f32,
    pub max_speed: f32,
    pub speedup: f32,
    /// Vertical speed at a full-edge paddle hit.
    pub deflect_speed: f32,
    pub winning_points: u32,
    pub points_multiplier: u32,
}

impl Default for PongConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            paddle_size: Vec2::new(15.0, 100.0),
            player_x: 50.0,
            computer_x: 750.0,
            ball_size: 15.0,
            player_speed: 600.0,
            computer_speed: 360.0,
            difficulty: 0.6,
            aim_error: 100.0,
            dead_zone: 10.0,
            serve_speed: 300.0,
            max_speed: 800.0,
            speedup: 1.05,
            deflect_speed: 400.0,
            winning_points: 5,
            points_multiplier: 10,
        }
    }
}

//=== Pong ================================================================

pub struct Pong {
    config: PongConfig,
    player: Aabb,
    computer: Aabb,
    ball: Aabb,
    ball_velocity: Vec2,
    player_points: u32,
    computer_points: u32,
}

impl Pong {
    pub fn new(config: PongConfig) -> Self {
        let mid_y = config.height / 2.0;
        Self {
            player: Aabb::new(Vec2::new(config.player_x, mid_y), config.paddle_size),
            computer: Aabb::new(Vec2::new(config.computer_x, mid_y), config.paddle_size),
            ball: Aabb::new(Self::court_centre(&config), Vec2::splat(config.ball_size)),
            ball_velocity: Vec2::ZERO,
            player_points: 0,
            computer_points: 0,
            config,
        }
    }

    fn court_centre(config: &PongConfig) -> Vec2 {
        Vec2::new(config.width / 2.0, config.height / 2.0)
    }

    //--- Queries ----------------------------------------------------------

    pub fn ball(&self) -> &Aabb {
        &self.ball
    }

    pub fn ball_velocity(&self) -> Vec2 {
        self.ball_velocity
    }

    pub fn points(&self) -> (u32, u32) {
        (self.player_points, self.computer_points)
    }

    pub fn player_paddle(&self) -> &Aabb {
        &self.player
    }

    pub fn computer_paddle(&self) -> &Aabb {
        &self.computer
    }

    //--- Rules ------------------------------------------------------------

    /// Ball back to centre, random angle in [-45°, 45°], random side.
    fn serve(&mut self, rng: &mut StdRng) {
        self.ball.center = Self::court_centre(&self.config);
        let angle = (rng.gen_range(-45..=45) as f32).to_radians();
        let side = if rng.gen_bool(0.5) { -1.0 } else { 1.0 };
        let speed = self.config.serve_speed;
        self.ball_velocity = Vec2::new(side * speed * angle.cos(), speed * angle.sin());
    }

    fn clamp_paddle(&self, paddle: &mut Aabb) {
        let half = paddle.half.y;
        paddle.center.y = paddle.center.y.clamp(half, self.config.height - half);
    }

    fn move_player(&mut self, frame: &Frame<'_>, dt: f32) {
        let mut player = self.player;
        if frame.held(ArcadeAction::Up) {
            player.center.y -= self.config.player_speed * dt;
        } else if frame.held(ArcadeAction::Down) {
            player.center.y += self.config.player_speed * dt;
        }
        self.clamp_paddle(&mut player);
        self.player = player;
    }

    /// Tracks the ball only while it approaches.
    fn move_computer(&mut self, rng: &mut StdRng, dt: f32) {
        if self.ball_velocity.x <= 0.0 {
            return;
        }
        let mut target = self.ball.center.y;
        if rng.gen::<f32>() > self.config.difficulty {
            target += (rng.gen::<f32>() - 0.5) * self.config.aim_error;
        }

        let mut computer = self.computer;
        let dz = self.config.dead_zone;
        let step = self.config.computer_speed * dt;
        if computer.center.y < target - dz {
            computer.center.y += step;
        } else if computer.center.y > target + dz {
            computer.center.y -= step;
        }
        self.clamp_paddle(&mut computer);
        self.computer = computer;
    }

    fn bounce_walls(&mut self) {
        let half = self.ball.half.y;
        if self.ball.center.y < half {
            self.ball.center.y = half;
            self.ball_velocity.y = self.ball_velocity.y.abs();
        } else if self.ball.center.y > self.config.height - half {
            self.ball.center.y = self.config.height - half;
            self.ball_velocity.y = -self.ball_velocity.y.abs();
        }
    }

    /// Reflects off a paddle, speeding up and angling by contact offset.
    fn hit_paddle(&mut self, paddle: Aabb) {
        let prev = self.ball_velocity.x;
        let vx = -prev.signum() * (prev.abs() * self.config.speedup).min(self.config.max_speed);

        let offset = ((self.ball.center.y - paddle.center.y) / paddle.half.y).clamp(-1.0, 1.0);
        let vy = self.config.deflect_speed * (offset * FRAC_PI_4).sin();
        self.ball_velocity = Vec2::new(vx, vy);

        // Out of the paddle so the next tick cannot hit it again
        let gap = paddle.half.x + self.ball.half.x;
        self.ball.center.x = if vx > 0.0 { paddle.center.x + gap } else { paddle.center.x - gap };
    }

    fn check_paddles(&mut self) {
        if self.ball_velocity.x < 0.0 && self.ball.overlaps(&self.player) {
            self.hit_paddle(self.player);
        } else if self.ball_velocity.x > 0.0 && self.ball.overlaps(&self.computer) {
            self.hit_paddle(self.computer);
        }
    }

    /// Awards a point when the ball leaves the court; serves again unless
    /// someone has won.
    fn check_goal(&mut self, rng: &mut StdRng) -> Flow {
        let x = self.ball.center.x;
        if x < 0.0 {
            self.computer_points += 1;
        } else if x > self.config.width {
            self.player_points += 1;
        } else {
            return Flow::Continue;
        }

        if self.player_points >= self.config.winning_points {
            return self.finish(Outcome::Won);
        }
        if self.computer_points >= self.config.winning_points {
            return self.finish(Outcome::Lost);
        }
        self.serve(rng);
        Flow::Continue
    }

    fn finish(&mut self, outcome: Outcome) -> Flow {
        self.ball_velocity = Vec2::ZERO;
        Flow::Finished(outcome)
    }
}

impl Game for Pong {
    fn kind(&self) -> GameKind {
        GameKind::Pong
    }

    fn reset(&mut self, _now: Duration, rng: &mut StdRng) {
        let mid_y = self.config.height / 2.0;
        self.player.center.y = mid_y;
        self.computer.center.y = mid_y;
        self.player_points = 0;
        self.computer_points = 0;
        self.serve(rng);
    }

    fn step(&mut self, frame: &Frame<'_>, rng: &mut StdRng, _events: &mut Vec<GameEvent>) -> Flow {
        let dt = frame.dt();
        self.move_player(frame, dt);
        self.move_computer(rng, dt);

        self.ball.center += self.ball_velocity * dt;
        self.bounce_walls();
        self.check_paddles();
        self.check_goal(rng)
    }

    fn score(&self) -> u32 {
        self.player_points
    }

    fn final_score(&self) -> u32 {
        self.player_points * self.config.points_multiplier
    }

    fn hud(&self) -> String {
        format!("Player {} - {} Computer", self.player_points, self.computer_points)
    }

    fn over_banner(&self, outcome: Outcome) -> &'static str {
        match outcome {
            Outcome::Won => "YOU WIN!",
            Outcome::Lost => "COMPUTER WINS!",
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
