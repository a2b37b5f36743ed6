//=========================================================================
// Arcade Games
//=========================================================================
//
// Six independent games on one shared state machine.
//
// Architecture:
// ```text
//   mount_game(kind, mount, id, tuning, ports, seed)
//        │
//        └─> GameSession<G: Game>          (implements Scene)
//              ├─ phase: Playing | GameOver(outcome)
//              ├─ rng: StdRng (seeded)
//              ├─ ports: score / ready / hud
//              └─ game: Flappy | Shooter | Platformer | Pong | Snake | Tetris
// ```
//
// A game only knows its own rules. The session owns the lifecycle:
// ready signal, terminal detection, the single score submission per
// GameOver, restart and HUD publishing.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod flappy;
pub mod platformer;
pub mod pong;
pub mod session;
pub mod shooter;
pub mod snake;
pub mod tetris;

//=== Public API ==========================================================

pub use session::{GameSession, Phase};

//=== External Dependencies ===============================================

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use glam::Vec2;
use rand::rngs::StdRng;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::config::GameTuning;
use crate::core::input::{Action, ActionState, InputContext, InputSystem, KeyCode, MouseButton};
use crate::core::scene::{Scene, SceneKey};
use crate::core::scoring::{GameId, MountPoint, SessionPorts};

//=== GameKind ============================================================

/// Scene key for each game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameKind {
    Flappy,
    Shooter,
    Platformer,
    Pong,
    Snake,
    Tetris,
}

impl SceneKey for GameKind {}

impl GameKind {
    pub const ALL: [GameKind; 6] = [
        GameKind::Flappy,
        GameKind::Shooter,
        GameKind::Platformer,
        GameKind::Pong,
        GameKind::Snake,
        GameKind::Tetris,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GameKind::Flappy => "flappy",
            GameKind::Shooter => "shooter",
            GameKind::Platformer => "platformer",
            GameKind::Pong => "pong",
            GameKind::Snake => "snake",
            GameKind::Tetris => "tetris",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GameKind::Flappy => "Flappy Bird",
            GameKind::Shooter => "2D FPS",
            GameKind::Platformer => "Platformer",
            GameKind::Pong => "Pong",
            GameKind::Snake => "Snake",
            GameKind::Tetris => "Tetris",
        }
    }

    /// Parses a CLI name; accepts a few aliases.
    pub fn parse_name(name: &str) -> Result<Self, UnknownGame> {
        match name.trim().to_ascii_lowercase().as_str() {
            "flappy" | "flappybird" | "flappy-bird" => Ok(GameKind::Flappy),
            "shooter" | "fps" => Ok(GameKind::Shooter),
            "platformer" => Ok(GameKind::Platformer),
            "pong" => Ok(GameKind::Pong),
            "snake" => Ok(GameKind::Snake),
            "tetris" => Ok(GameKind::Tetris),
            _ => Err(UnknownGame(name.to_string())),
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameKind {
    type Err = UnknownGame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_name(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game '{0}' (expected flappy, shooter, platformer, pong, snake or tetris)")]
pub struct UnknownGame(pub String);

//=== ArcadeAction ========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArcadeAction {
    Left,
    Right,
    Up,
    Down,
    /// Space: jump, hard drop, restart.
    Confirm,
    /// Left click: shoot, flap, respawn.
    Fire,
}

impl Action for ArcadeAction {}

/// Arrows and WASD for movement, Space/Enter to confirm, left click to fire.
pub fn default_bindings(input: &mut InputSystem<ArcadeAction>) {
    use ArcadeAction::*;
    let ctx = InputContext::Primary;

    for (key, action) in [
        (KeyCode::ArrowLeft, Left),
        (KeyCode::KeyA, Left),
        (KeyCode::ArrowRight, Right),
        (KeyCode::KeyD, Right),
        (KeyCode::ArrowUp, Up),
        (KeyCode::KeyW, Up),
        (KeyCode::ArrowDown, Down),
        (KeyCode::KeyS, Down),
        (KeyCode::Space, Confirm),
        (KeyCode::Enter, Confirm),
    ] {
        input.bind_key(key, action, ctx);
    }
    input.bind_button(MouseButton::Left, Fire, ctx);
}

//=== Frame ===============================================================

/// What a game sees for one tick.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub now: Duration,
    pub delta: Duration,
    pub input: &'a ActionState<ArcadeAction>,
    /// Pointer in viewport pixels.
    pub pointer: Vec2,
}

impl<'a> Frame<'a> {
    pub fn new(
        now: Duration,
        delta: Duration,
        input: &'a ActionState<ArcadeAction>,
        pointer: Vec2,
    ) -> Self {
        Self { now, delta, input, pointer }
    }

    /// Tick length in seconds.
    pub fn dt(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn pressed(&self, action: ArcadeAction) -> bool {
        self.input.is_pressed(action)
    }

    pub fn held(&self, action: ArcadeAction) -> bool {
        self.input.is_held(action)
    }
}

//=== Flow / Outcome / Events =============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

/// Result of one `Game::step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Finished(Outcome),
}

/// Side effects a game asks its session to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Mid-run score submission.
    Checkpoint(u32),
}

//=== Game Trait ==========================================================

/// Rules of one game. Driven by [`GameSession`].
pub trait Game: Send {
    fn kind(&self) -> GameKind;

    /// Rebuilds every entity and zeroes the score.
    fn reset(&mut self, now: Duration, rng: &mut StdRng);

    /// Advances one tick of play. Never called after `Finished` until
    /// the next `reset`.
    fn step(&mut self, frame: &Frame<'_>, rng: &mut StdRng, events: &mut Vec<GameEvent>) -> Flow;

    fn score(&self) -> u32;

    /// Score reported when the run ends.
    fn final_score(&self) -> u32 {
        self.score()
    }

    /// Polled every tick while the run is over.
    fn restart_requested(&mut self, frame: &Frame<'_>) -> bool {
        frame.pressed(ArcadeAction::Confirm)
    }

    /// Status line while playing.
    fn hud(&self) -> String {
        format!("Score: {}", self.score())
    }

    /// Status line once the run is over, ahead of the banner.
    fn over_hud(&self) -> String {
        self.hud()
    }

    fn over_banner(&self, outcome: Outcome) -> &'static str {
        match outcome {
            Outcome::Won => "YOU WIN!",
            Outcome::Lost => "GAME OVER",
        }
    }

    fn restart_hint(&self) -> &'static str {
        "Press SPACE to restart"
    }
}

//=== Mounting ============================================================

pub type GameScene = Box<dyn Scene<GameKind, ArcadeAction>>;

/// Builds the scene for `kind`. The single initialisation entry point.
pub fn mount_game(
    kind: GameKind,
    mount: MountPoint,
    game_id: GameId,
    tuning: &GameTuning,
    ports: SessionPorts,
    seed: u64,
) -> GameScene {
    match kind {
        GameKind::Flappy => Box::new(GameSession::new(
            mount,
            game_id,
            flappy::Flappy::new(tuning.flappy.clone()),
            ports,
            seed,
        )),
        GameKind::Shooter => Box::new(GameSession::new(
            mount,
            game_id,
            shooter::Shooter::new(tuning.shooter.clone()),
            ports,
            seed,
        )),
        GameKind::Platformer => Box::new(GameSession::new(
            mount,
            game_id,
            platformer::Platformer::new(tuning.platformer.clone()),
            ports,
            seed,
        )),
        GameKind::Pong => Box::new(GameSession::new(
            mount,
            game_id,
            pong::Pong::new(tuning.pong.clone()),
            ports,
            seed,
        )),
        GameKind::Snake => Box::new(GameSession::new(
            mount,
            game_id,
            snake::Snake::new(tuning.snake.clone()),
            ports,
            seed,
        )),
        GameKind::Tetris => Box::new(GameSession::new(
            mount,
            game_id,
            tetris::Tetris::new(tuning.tetris.clone()),
            ports,
            seed,
        )),
    }
}

//=========================================================================
// Test Support
//=========================================================================


//=========================================================================
// Unit Tests
//=========================================================================
