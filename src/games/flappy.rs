//=========================================================================
// Flappy Bird
//=========================================================================
//
// Bird under gravity, pipe columns scrolling in from the right.
//
// Per tick:
//   flap input → tilt easing → column spawn → integrate/scroll
//   → score passed columns → collide with pipes and ground
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::{ArcadeAction, Flow, Frame, Game, GameEvent, GameKind, Outcome};
use crate::core::physics::{Aabb, ArcadeWorld, Body};

//=== Configuration =======================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlappyConfig {
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
    /// Upward speed set by a flap.
    pub flap_speed: f32,
    pub bird_start: Vec2,
    pub bird_size: Vec2,
    pub bounce: f32,
    pub pipe_interval_ms: u64,
    pub pipe_segments: usize,
    pub pipe_width: f32,
    pub pipe_speed: f32,
    pub ground_height: f32,
}

impl Default for FlappyConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 600.0,
            gravity: 1200.0,
            flap_speed: 400.0,
            bird_start: Vec2::new(100.0, 300.0),
            bird_size: Vec2::new(20.0, 24.0),
            bounce: 0.1,
            pipe_interval_ms: 1500,
            pipe_segments: 8,
            pipe_width: 50.0,
            pipe_speed: 200.0,
            ground_height: 40.0,
        }
    }
}

//=== Tilt ================================================================

const FLAP_ANGLE: f32 = -30.0;
const DIVE_ANGLE: f32 = 90.0;
const RISE_STEP: f32 = 5.0;
const FALL_STEP: f32 = 2.0;

//=== PipeColumn ==========================================================

#[derive(Debug, Clone)]
struct PipeColumn {
    x: f32,
    /// First of the two open rows.
    hole: usize,
    scored: bool,
}

//=== Flappy ==============================================================

pub struct Flappy {
    config: FlappyConfig,
    world: ArcadeWorld,
    bird: Body,
    angle: f32,
    columns: Vec<PipeColumn>,
    ground: Aabb,
    next_column_at: Duration,
    score: u32,
}

impl Flappy {
    pub fn new(config: FlappyConfig) -> Self {
        let size = Vec2::new(config.width, config.height);
        let ground = Aabb::from_min_max(
            Vec2::new(0.0, config.height - config.ground_height),
            size,
        );
        let bird = Self::spawn_bird(&config);
        Self {
            world: ArcadeWorld::new(size, config.gravity),
            bird,
            angle: 0.0,
            columns: Vec::new(),
            ground,
            next_column_at: Duration::from_millis(config.pipe_interval_ms),
            score: 0,
            config,
        }
    }

    fn spawn_bird(config: &FlappyConfig) -> Body {
        Body::new(config.bird_start, config.bird_size)
            .with_bounce(config.bounce)
            .with_world_bounds()
    }

    //--- Queries ----------------------------------------------------------

    pub fn bird(&self) -> &Body {
        &self.bird
    }

    pub fn bird_angle(&self) -> f32 {
        self.angle
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn segment_height(&self) -> f32 {
        self.config.height / self.config.pipe_segments as f32
    }

    /// Solid segments of one column; the hole and the row under it are open.
    fn segments(&self, column: &PipeColumn) -> impl Iterator<Item = Aabb> + '_ {
        let h = self.segment_height();
        let width = self.config.pipe_width;
        let x = column.x;
        let hole = column.hole;
        (0..self.config.pipe_segments)
            .filter(move |&row| row != hole && row != hole + 1)
            .map(move |row| {
                Aabb::new(Vec2::new(x, row as f32 * h + h / 2.0), Vec2::new(width, h))
            })
    }

    //--- Rules ------------------------------------------------------------

    fn flap(&mut self) {
        self.bird.velocity.y = -self.config.flap_speed;
        self.angle = FLAP_ANGLE;
    }

    fn ease_tilt(&mut self) {
        self.angle = if self.bird.velocity.y < 0.0 {
            (self.angle - RISE_STEP).max(FLAP_ANGLE)
        } else {
            (self.angle + FALL_STEP).min(DIVE_ANGLE)
        };
    }

    fn spawn_column(&mut self, rng: &mut StdRng) {
        let last_hole = self.config.pipe_segments.saturating_sub(2).max(2);
        let hole = rng.gen_range(2..=last_hole);
        self.columns.push(PipeColumn { x: self.config.width, hole, scored: false });
    }

    fn hit_anything(&self) -> bool {
        if self.bird.aabb.overlaps(&self.ground) {
            return true;
        }
        self.columns
            .iter()
            .any(|c| self.segments(c).any(|seg| seg.overlaps(&self.bird.aabb)))
    }

    #[cfg(test)]
    fn push_column(&mut self, x: f32, hole: usize) {
        self.columns.push(PipeColumn { x, hole, scored: false });
    }
}

impl Game for Flappy {
    fn kind(&self) -> GameKind {
        GameKind::Flappy
    }

    fn reset(&mut self, now: Duration, _rng: &mut StdRng) {
        self.bird = Self::spawn_bird(&self.config);
        self.angle = 0.0;
        self.columns.clear();
        self.next_column_at = now + Duration::from_millis(self.config.pipe_interval_ms);
        self.score = 0;
    }

    fn step(&mut self, frame: &Frame<'_>, rng: &mut StdRng, _events: &mut Vec<GameEvent>) -> Flow {
        let dt = frame.dt();

        self.ease_tilt();
        if frame.pressed(ArcadeAction::Confirm) || frame.pressed(ArcadeAction::Fire) {
            self.flap();
        }

        while frame.now >= self.next_column_at {
            self.spawn_column(rng);
            self.next_column_at += Duration::from_millis(self.config.pipe_interval_ms);
        }

        self.world.integrate(&mut self.bird, dt);

        let shift = self.config.pipe_speed * dt;
        let half_width = self.config.pipe_width / 2.0;
        for column in &mut self.columns {
            column.x -= shift;
        }
        self.columns.retain(|c| c.x + half_width >= 0.0);

        let bird_x = self.bird.center().x;
        for column in &mut self.columns {
            if !column.scored && column.x < bird_x {
                column.scored = true;
                self.score += 1;
            }
        }

        if self.hit_anything() {
            self.bird.velocity = Vec2::ZERO;
            return Flow::Finished(Outcome::Lost);
        }
        Flow::Continue
    }

    fn score(&self) -> u32 {
        self.score
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::Driver;
    use approx::assert_relative_eq;

    fn game(config: FlappyConfig) -> (Flappy, Driver) {
        let mut game = Flappy::new(config);
        let mut driver = Driver::new(3);
        driver.reset(&mut game);
        (game, driver)
    }

    #[test]
    fn flap_sets_upward_speed_and_tilt() {
        let (mut game, mut driver) = game(FlappyConfig::default());
        driver.input.press(ArcadeAction::Confirm);
        driver.step(&mut game);

        assert!(game.bird().velocity.y < 0.0);
        assert_eq!(game.bird_angle(), FLAP_ANGLE);
    }

    #[test]
    fn click_also_flaps() {
        let (mut game, mut driver) = game(FlappyConfig::default());
        driver.input.press(ArcadeAction::Fire);
        driver.step(&mut game);
        assert!(game.bird().velocity.y < 0.0);
    }

    #[test]
    fn tilt_eases_toward_dive_while_falling() {
        let (mut game, mut driver) = game(FlappyConfig::default());
        for _ in 0..10 {
            driver.step(&mut game);
        }
        assert_relative_eq!(game.bird_angle(), 20.0);
    }

    #[test]
    fn falling_bird_hits_ground() {
        let (mut game, mut driver) = game(FlappyConfig::default());
        assert_eq!(driver.run(&mut game, 600), Flow::Finished(Outcome::Lost));
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn columns_spawn_on_interval_with_valid_hole() {
        let config = FlappyConfig { gravity: 0.0, ..FlappyConfig::default() };
        let (mut game, mut driver) = game(config);

        driver.advance(Duration::from_millis(1490));
        driver.step(&mut game);
        assert_eq!(game.column_count(), 1);

        let hole = game.columns[0].hole;
        assert!((2..=6).contains(&hole));
        assert_eq!(game.segments(&game.columns[0]).count(), 6);
    }

    #[test]
    fn passing_a_column_scores_once() {
        let config = FlappyConfig { gravity: 0.0, pipe_interval_ms: 60_000, ..FlappyConfig::default() };
        let (mut game, mut driver) = game(config);
        // Rows 3 and 4 open: y 225..375 around the bird at 300
        game.push_column(160.0, 3);

        let flow = driver.run(&mut game, 120);

        assert_eq!(flow, Flow::Continue);
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn flying_into_a_pipe_ends_run() {
        let config = FlappyConfig { gravity: 0.0, pipe_interval_ms: 60_000, ..FlappyConfig::default() };
        let (mut game, mut driver) = game(config);
        // Open rows 5 and 6 leave the bird's row solid
        game.push_column(160.0, 5);

        assert_eq!(driver.run(&mut game, 120), Flow::Finished(Outcome::Lost));
    }

    #[test]
    fn offscreen_columns_are_dropped() {
        let config = FlappyConfig { gravity: 0.0, pipe_interval_ms: 60_000, ..FlappyConfig::default() };
        let (mut game, mut driver) = game(config);
        game.push_column(10.0, 3);
        for _ in 0..30 {
            driver.step(&mut game);
        }
        assert_eq!(game.column_count(), 0);
    }

    #[test]
    fn reset_clears_columns_and_score() {
        let config = FlappyConfig { gravity: 0.0, pipe_interval_ms: 60_000, ..FlappyConfig::default() };
        let (mut game, mut driver) = game(config);
        game.push_column(160.0, 3);
        driver.run(&mut game, 120);

        driver.reset(&mut game);
        assert_eq!(game.score(), 0);
        assert_eq!(game.column_count(), 0);
        assert_eq!(game.bird().center(), Vec2::new(100.0, 300.0));
    }
}
