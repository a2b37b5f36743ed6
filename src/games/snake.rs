//=========================================================================
// Snake
//=========================================================================
//
// Grid movement on a fixed interval that shortens as the snake eats.
//
// Body is a deque of cells, head at the front. Direction input is
// buffered into `next_heading` and applied on the next grid step; a
// buffered heading can never be the reverse of the current one.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;
use std::time::Duration;

use glam::IVec2;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::{ArcadeAction, Flow, Frame, Game, GameEvent, GameKind, Outcome};

//=== Configuration =======================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    pub columns: i32,
    pub rows: i32,
    /// Pixels per cell; only used to report the playfield size.
    pub cell_size: u32,
    pub start: IVec2,
    /// Cells per second.
    pub start_speed: f32,
    pub speed_step: f32,
    pub max_speed: f32,
    pub food_points: u32,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            columns: 40,
            rows: 30,
            cell_size: 16,
            start: IVec2::new(10, 10),
            start_speed: 8.0,
            speed_step: 0.2,
            max_speed: 20.0,
            food_points: 10,
        }
    }
}

impl SnakeConfig {
    pub fn playfield_size(&self) -> (u32, u32) {
        (
            self.columns.max(0) as u32 * self.cell_size,
            self.rows.max(0) as u32 * self.cell_size,
        )
    }
}

//=== Heading =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    fn offset(self) -> IVec2 {
        match self {
            Heading::Up => IVec2::new(0, -1),
            Heading::Down => IVec2::new(0, 1),
            Heading::Left => IVec2::new(-1, 0),
            Heading::Right => IVec2::new(1, 0),
        }
    }

    fn opposite(self) -> Heading {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }
}

//=== Snake ===============================================================

pub struct Snake {
    config: SnakeConfig,
    body: VecDeque<IVec2>,
    heading: Heading,
    next_heading: Heading,
    food: Option<IVec2>,
    speed: f32,
    last_step: Duration,
    score: u32,
}

impl Snake {
    pub fn new(config: SnakeConfig) -> Self {
        let mut body = VecDeque::new();
        body.push_back(config.start);
        Self {
            body,
            heading: Heading::Right,
            next_heading: Heading::Right,
            food: None,
            speed: config.start_speed,
            last_step: Duration::ZERO,
            score: 0,
            config,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn head(&self) -> IVec2 {
        self.body.front().copied().unwrap_or(self.config.start)
    }

    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn food(&self) -> Option<IVec2> {
        self.food
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Time between grid steps at the current speed.
    pub fn step_interval(&self) -> Duration {
        Duration::from_micros((1_000_000.0 / self.speed) as u64)
    }

    fn in_grid(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.config.columns && cell.y < self.config.rows
    }

    //--- Rules ------------------------------------------------------------

    fn steer(&mut self, frame: &Frame<'_>) {
        let wanted = [
            (ArcadeAction::Left, Heading::Left),
            (ArcadeAction::Right, Heading::Right),
            (ArcadeAction::Up, Heading::Up),
            (ArcadeAction::Down, Heading::Down),
        ]
        .into_iter()
        .find(|(action, heading)| {
            *heading != self.heading.opposite() && (frame.held(*action) || frame.pressed(*action))
        })
        .map(|(_, heading)| heading);

        if let Some(heading) = wanted {
            self.next_heading = heading;
        }
    }

    /// Picks a random unoccupied cell; `None` when the board is full.
    fn place_food(&mut self, rng: &mut StdRng) -> Option<IVec2> {
        let free: Vec<IVec2> = (0..self.config.rows)
            .flat_map(|y| (0..self.config.columns).map(move |x| IVec2::new(x, y)))
            .filter(|cell| !self.body.contains(cell))
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[rng.gen_range(0..free.len())])
    }

    fn advance(&mut self, rng: &mut StdRng) -> Flow {
        self.heading = self.next_heading;
        let next = self.head() + self.heading.offset();

        if !self.in_grid(next) || self.body.contains(&next) {
            return Flow::Finished(Outcome::Lost);
        }

        self.body.push_front(next);
        if self.food == Some(next) {
            self.score += self.config.food_points;
            self.speed = (self.speed + self.config.speed_step).min(self.config.max_speed);
            self.food = self.place_food(rng);
            if self.food.is_none() {
                return Flow::Finished(Outcome::Won);
            }
        } else {
            self.body.pop_back();
        }
        Flow::Continue
    }

    #[cfg(test)]
    fn set_body(&mut self, cells: &[IVec2], heading: Heading) {
        self.body = cells.iter().copied().collect();
        self.heading = heading;
        self.next_heading = heading;
    }
}

impl Game for Snake {
    fn kind(&self) -> GameKind {
        GameKind::Snake
    }

    fn reset(&mut self, now: Duration, rng: &mut StdRng) {
        self.body.clear();
        self.body.push_back(self.config.start);
        self.heading = Heading::Right;
        self.next_heading = Heading::Right;
        self.speed = self.config.start_speed;
        self.last_step = now;
        self.score = 0;
        self.food = self.place_food(rng);
    }

    fn step(&mut self, frame: &Frame<'_>, rng: &mut StdRng, _events: &mut Vec<GameEvent>) -> Flow {
        self.steer(frame);

        if frame.now.saturating_sub(self.last_step) < self.step_interval() {
            return Flow::Continue;
        }
        self.last_step = frame.now;
        self.advance(rng)
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
    use crate::games::testing::{Driver, STEP};

    fn game(config: SnakeConfig) -> (Snake, Driver) {
        let mut game = Snake::new(config);
        let mut driver = Driver::new(5);
        driver.reset(&mut game);
        (game, driver)
    }

    /// Steps until the head leaves its current cell.
    fn one_cell(game: &mut Snake, driver: &mut Driver) -> Flow {
        let start = game.head();
        let len = game.body_len();
        for _ in 0..60 {
            let flow = driver.step(game);
            if flow != Flow::Continue || game.head() != start || game.body_len() != len {
                return flow;
            }
        }
        Flow::Continue
    }

    #[test]
    fn moves_one_cell_per_interval() {
        let (mut game, mut driver) = game(SnakeConfig::default());
        // 125 ms interval: seven 16.7 ms ticks are not enough, eight are
        for _ in 0..7 {
            driver.step(&mut game);
        }
        assert_eq!(game.head(), IVec2::new(10, 10));
        driver.step(&mut game);
        assert_eq!(game.head(), IVec2::new(11, 10));
    }

    #[test]
    fn reversal_is_ignored() {
        let (mut game, mut driver) = game(SnakeConfig::default());
        driver.input.hold(ArcadeAction::Left);
        one_cell(&mut game, &mut driver);
        assert_eq!(game.heading(), Heading::Right);
        assert_eq!(game.head(), IVec2::new(11, 10));
    }

    #[test]
    fn reversal_key_does_not_mask_a_turn() {
        let (mut game, mut driver) = game(SnakeConfig::default());
        driver.input.hold(ArcadeAction::Left);
        driver.input.hold(ArcadeAction::Up);
        one_cell(&mut game, &mut driver);
        assert_eq!(game.heading(), Heading::Up);
        assert_eq!(game.head(), IVec2::new(10, 9));
    }

    #[test]
    fn turn_applies_on_next_step() {
        let (mut game, mut driver) = game(SnakeConfig::default());
        driver.input.hold(ArcadeAction::Down);
        one_cell(&mut game, &mut driver);
        assert_eq!(game.heading(), Heading::Down);
        assert_eq!(game.head(), IVec2::new(10, 11));
    }

    #[test]
    fn eating_grows_by_one_and_speeds_up() {
        let (mut game, mut driver) = game(SnakeConfig::default());
        game.food = Some(IVec2::new(11, 10));

        one_cell(&mut game, &mut driver);

        assert_eq!(game.body_len(), 2);
        assert_eq!(game.score(), 10);
        assert!((game.speed() - 8.2).abs() < 1e-4);
        let food = game.food().unwrap();
        assert!(!game.body.contains(&food));
    }

    #[test]
    fn interval_stays_above_frame_period() {
        let (mut game, _) = game(SnakeConfig::default());
        game.speed = 19.9;
        game.speed = (game.speed + game.config.speed_step).min(game.config.max_speed);
        assert_eq!(game.speed(), 20.0);
        assert!(game.step_interval() >= Duration::from_millis(50));
        assert!(game.step_interval() > STEP);
    }

    #[test]
    fn leaving_the_grid_ends_run() {
        let config = SnakeConfig { start: IVec2::new(39, 10), ..SnakeConfig::default() };
        let (mut game, mut driver) = game(config);
        assert_eq!(one_cell(&mut game, &mut driver), Flow::Finished(Outcome::Lost));
        assert_eq!(game.head(), IVec2::new(39, 10));
    }

    #[test]
    fn running_into_body_ends_run() {
        let (mut game, mut driver) = game(SnakeConfig::default());
        // Head at (5,5) heading down into its own tail at (5,6)
        game.set_body(
            &[IVec2::new(5, 5), IVec2::new(6, 5), IVec2::new(6, 6), IVec2::new(5, 6)],
            Heading::Down,
        );
        game.food = Some(IVec2::new(0, 0));
        assert_eq!(one_cell(&mut game, &mut driver), Flow::Finished(Outcome::Lost));
    }

    #[test]
    fn filling_the_board_wins() {
        let config = SnakeConfig { columns: 2, rows: 1, start: IVec2::new(0, 0), ..SnakeConfig::default() };
        let (mut game, mut driver) = game(config);
        assert_eq!(game.food(), Some(IVec2::new(1, 0)));

        assert_eq!(one_cell(&mut game, &mut driver), Flow::Finished(Outcome::Won));
        assert_eq!(game.body_len(), 2);
    }

    #[test]
    fn reset_restores_start_state() {
        let (mut game, mut driver) = game(SnakeConfig::default());
        game.food = Some(IVec2::new(11, 10));
        one_cell(&mut game, &mut driver);

        driver.reset(&mut game);
        assert_eq!(game.body_len(), 1);
        assert_eq!(game.score(), 0);
        assert_eq!(game.speed(), 8.0);
        assert_eq!(game.heading(), Heading::Right);
    }

    #[test]
    fn playfield_is_640_by_480() {
        assert_eq!(SnakeConfig::default().playfield_size(), (640, 480));
    }
}
