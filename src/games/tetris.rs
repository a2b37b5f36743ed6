//=========================================================================
// Tetris
//=========================================================================
//
// Falling tetrominoes on a 10×20 board.
//
// Per tick:
//   shift (pressed) → soft drop (held, tenth of interval) → rotate
//   → hard drop → gravity (interval)
//
// Any of those may lock the piece; locking clears full rows and spawns
// the next piece. A spawn that does not fit ends the run.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::{ArcadeAction, Flow, Frame, Game, GameEvent, GameKind, Outcome};

//=== Configuration =======================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TetrisConfig {
    pub columns: usize,
    pub rows: usize,
    pub base_interval_ms: u64,
    pub min_interval_ms: u64,
    /// Interval reduction per level above 1.
    pub level_step_ms: u64,
    pub lines_per_level: u32,
    pub line_points: [u32; 5],
    pub soft_drop_divisor: u32,
    pub soft_drop_points: u32,
    pub hard_drop_points: u32,
}

impl Default for TetrisConfig {
    fn default() -> Self {
        Self {
            columns: 10,
            rows: 20,
            base_interval_ms: 1000,
            min_interval_ms: 100,
            level_step_ms: 100,
            lines_per_level: 10,
            line_points: [0, 40, 100, 300, 1200],
            soft_drop_divisor: 10,
            soft_drop_points: 1,
            hard_drop_points: 2,
        }
    }
}

//=== Tetromino ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tetromino {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl Tetromino {
    pub const ALL: [Tetromino; 7] = [
        Tetromino::I,
        Tetromino::J,
        Tetromino::L,
        Tetromino::O,
        Tetromino::S,
        Tetromino::T,
        Tetromino::Z,
    ];

    /// Spawn orientation.
    pub fn shape(self) -> Shape {
        let rows: &[&[u8]] = match self {
            Tetromino::I => &[&[1, 1, 1, 1]],
            Tetromino::J => &[&[1, 0, 0], &[1, 1, 1]],
            Tetromino::L => &[&[0, 0, 1], &[1, 1, 1]],
            Tetromino::O => &[&[1, 1], &[1, 1]],
            Tetromino::S => &[&[0, 1, 1], &[1, 1, 0]],
            Tetromino::T => &[&[0, 1, 0], &[1, 1, 1]],
            Tetromino::Z => &[&[1, 1, 0], &[0, 1, 1]],
        };
        Shape {
            cells: rows.iter().map(|row| row.iter().map(|&c| c != 0).collect()).collect(),
        }
    }
}

//=== Shape ===============================================================

/// Occupancy matrix, `cells[row][col]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    cells: Vec<Vec<bool>>,
}

impl Shape {
    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Offsets `(col, row)` of every filled cell.
    pub fn filled(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, &on)| on)
                .map(move |(c, _)| (c as i32, r as i32))
        })
    }

    /// Clockwise quarter turn: `new[c][r] = old[rows - 1 - r][c]`.
    pub fn rotated_cw(&self) -> Shape {
        let rows = self.height();
        let cells = (0..self.width())
            .map(|c| (0..rows).map(|r| self.cells[rows - 1 - r][c]).collect())
            .collect();
        Shape { cells }
    }
}

//=== Board ===============================================================

#[derive(Debug, Clone)]
pub struct Board {
    columns: usize,
    rows: Vec<Vec<Option<Tetromino>>>,
}

impl Board {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows: vec![vec![None; columns]; rows] }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<Tetromino> {
        self.rows.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Cells above the top are allowed; sides, floor and filled cells are not.
    pub fn fits(&self, x: i32, y: i32, shape: &Shape) -> bool {
        shape.filled().all(|(c, r)| {
            let bx = x + c;
            let by = y + r;
            if bx < 0 || bx >= self.columns as i32 || by >= self.height() as i32 {
                return false;
            }
            by < 0 || self.rows[by as usize][bx as usize].is_none()
        })
    }

    /// Writes the piece into the grid; cells above the top are dropped.
    pub fn lock(&mut self, x: i32, y: i32, shape: &Shape, kind: Tetromino) {
        for (c, r) in shape.filled() {
            let (bx, by) = (x + c, y + r);
            if bx < 0 || by < 0 {
                continue;
            }
            if let Some(cell) = self.rows.get_mut(by as usize).and_then(|row| row.get_mut(bx as usize)) {
                *cell = Some(kind);
            }
        }
    }

    /// Removes every full row, shifting the rest down. Returns the count.
    pub fn clear_lines(&mut self) -> u32 {
        let before = self.rows.len();
        self.rows.retain(|row| row.iter().any(Option::is_none));
        let cleared = before - self.rows.len();
        for _ in 0..cleared {
            self.rows.insert(0, vec![None; self.columns]);
        }
        cleared as u32
    }

    pub fn fill_row(&mut self, row: usize, kind: Tetromino) {
        if let Some(r) = self.rows.get_mut(row) {
            r.iter_mut().for_each(|cell| *cell = Some(kind));
        }
    }
}

//=== Piece ===============================================================

#[derive(Debug, Clone)]
pub struct Piece {
    pub kind: Tetromino,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
}

//=== Tetris ==============================================================

pub struct Tetris {
    config: TetrisConfig,
    board: Board,
    piece: Option<Piece>,
    score: u32,
    level: u32,
    lines: u32,
    interval: Duration,
    last_drop: Duration,
    topped_out: bool,
}

impl Tetris {
    pub fn new(config: TetrisConfig) -> Self {
        Self {
            board: Board::new(config.columns, config.rows),
            piece: None,
            score: 0,
            level: 1,
            lines: 0,
            interval: Duration::from_millis(config.base_interval_ms),
            last_drop: Duration::ZERO,
            topped_out: false,
            config,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece(&self) -> Option<&Piece> {
        self.piece.as_ref()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    //--- Pieces -----------------------------------------------------------

    /// Spawns a random piece centred at the top.
    fn spawn(&mut self, rng: &mut StdRng) {
        let kind = Tetromino::ALL[rng.gen_range(0..Tetromino::ALL.len())];
        self.spawn_kind(kind);
    }

    fn spawn_kind(&mut self, kind: Tetromino) {
        let shape = kind.shape();
        let x = (self.config.columns / 2) as i32 - (shape.width() / 2) as i32;
        if !self.board.fits(x, 0, &shape) {
            self.topped_out = true;
        }
        self.piece = Some(Piece { kind, shape, x, y: 0 });
    }

    /// Moves the piece by `(dx, dy)` if it fits.
    fn try_shift(&mut self, dx: i32, dy: i32) -> bool {
        let Some(piece) = &mut self.piece else {
            return false;
        };
        if self.board.fits(piece.x + dx, piece.y + dy, &piece.shape) {
            piece.x += dx;
            piece.y += dy;
            true
        } else {
            false
        }
    }

    /// Clockwise turn in place, else the first kick that fits.
    fn rotate(&mut self) {
        let Some(piece) = &mut self.piece else {
            return;
        };
        let rotated = piece.shape.rotated_cw();
        for kick in [0, -1, 1, -2, 2] {
            if self.board.fits(piece.x + kick, piece.y, &rotated) {
                piece.x += kick;
                piece.shape = rotated;
                return;
            }
        }
    }

    /// One row down, locking when blocked.
    fn drop_one(&mut self, rng: &mut StdRng) {
        if !self.try_shift(0, 1) {
            self.lock_and_spawn(rng);
        }
    }

    fn hard_drop(&mut self, rng: &mut StdRng) {
        let mut rows = 0;
        while self.try_shift(0, 1) {
            rows += 1;
        }
        if rows > 0 {
            self.score += rows * self.config.hard_drop_points;
            self.lock_and_spawn(rng);
        }
    }

    fn lock_and_spawn(&mut self, rng: &mut StdRng) {
        if let Some(piece) = self.piece.take() {
            self.board.lock(piece.x, piece.y, &piece.shape, piece.kind);
        }
        self.check_lines();
        self.spawn(rng);
    }

    //--- Scoring ----------------------------------------------------------

    /// Clears full rows and applies line points and level.
    pub fn check_lines(&mut self) -> u32 {
        let cleared = self.board.clear_lines();
        if cleared == 0 {
            return 0;
        }
        let points = self.config.line_points.get(cleared as usize).copied().unwrap_or(0);
        self.score += points * self.level;
        self.lines += cleared;

        let level = self.lines / self.config.lines_per_level.max(1) + 1;
        if level > self.level {
            self.level = level;
            let faster = u64::from(level - 1) * self.config.level_step_ms;
            let ms = self.config.base_interval_ms.saturating_sub(faster).max(self.config.min_interval_ms);
            self.interval = Duration::from_millis(ms);
        }
        cleared
    }
}

impl Game for Tetris {
    fn kind(&self) -> GameKind {
        GameKind::Tetris
    }

    fn reset(&mut self, now: Duration, rng: &mut StdRng) {
        self.board = Board::new(self.config.columns, self.config.rows);
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.interval = Duration::from_millis(self.config.base_interval_ms);
        self.last_drop = now;
        self.topped_out = false;
        self.spawn(rng);
    }

    fn step(&mut self, frame: &Frame<'_>, rng: &mut StdRng, _events: &mut Vec<GameEvent>) -> Flow {
        if frame.pressed(ArcadeAction::Left) {
            self.try_shift(-1, 0);
        } else if frame.pressed(ArcadeAction::Right) {
            self.try_shift(1, 0);
        }

        let soft_interval = self.interval / self.config.soft_drop_divisor.max(1);
        if frame.held(ArcadeAction::Down) && frame.now.saturating_sub(self.last_drop) >= soft_interval {
            self.drop_one(rng);
            self.last_drop = frame.now;
            self.score += self.config.soft_drop_points;
        }

        if !self.topped_out && frame.pressed(ArcadeAction::Up) {
            self.rotate();
        }
        if !self.topped_out && frame.pressed(ArcadeAction::Confirm) {
            self.hard_drop(rng);
        }

        if !self.topped_out && frame.now.saturating_sub(self.last_drop) >= self.interval {
            self.drop_one(rng);
            self.last_drop = frame.now;
        }

        if self.topped_out {
            Flow::Finished(Outcome::Lost)
        } else {
            Flow::Continue
        }
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn hud(&self) -> String {
        format!("Score: {} | Level: {}", self.score, self.level)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
