//=========================================================================
// Arcade Suite — Library Root
//
// Six classic arcade games (Flappy Bird, a top-down shooter, a
// platformer, Pong, Snake, Tetris) on a fixed-tick engine.
//
// Responsibilities:
// - `games`: the rules of each game and the shared Playing/GameOver
//   session that reports scores and readiness
// - `core`: input, scenes, scheduler, arcade physics and score ports
// - `engine`: builder and runtime wiring the logic thread to a window
// - `platform` (private): winit window and input batching
//
// Typical usage:
// ```no_run
// use arcade_suite::{ArcadeEngineBuilder, GameId, GameKind, MountPoint};
//
// ArcadeEngineBuilder::new()
//     .build()
//     .mount(GameKind::Snake, MountPoint::new("main"), GameId(5))
//     .run()
//     .unwrap();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------

pub mod config;
pub mod core;
pub mod error;
pub mod games;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------

mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use crate::config::{ArcadeConfig, ConfigError, GameTuning, WindowConfig};
pub use crate::core::platform_bridge::PlatformError;
pub use crate::core::scoring::{
    ChannelScorePort, GameId, GameReady, HudUpdate, JsonLinesScorePort, LogScorePort, MountPoint,
    ReadySignal, ScoreLogError, ScorePort, ScoreSubmission, SharedScorePort,
};
pub use crate::engine::{ArcadeEngine, ArcadeEngineBuilder, Engine, EngineBuilder};
pub use crate::error::ArcadeError;
pub use crate::games::{mount_game, ArcadeAction, GameKind, Outcome, Phase};
