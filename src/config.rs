//=========================================================================
// Configuration
//=========================================================================
//
// Engine settings plus per-game tuning, loaded from JSON.
//
// Layering:
//   ArcadeConfig::default() → JSON file (partial, every field defaulted)
//                           → EngineBuilder / CLI overrides → validate()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::games::flappy::FlappyConfig;
use crate::games::platformer::PlatformerConfig;
use crate::games::pong::PongConfig;
use crate::games::shooter::ShooterConfig;
use crate::games::snake::SnakeConfig;
use crate::games::tetris::TetrisConfig;

//=== ConfigError =========================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

//=== WindowConfig ========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Arcade".to_string(),
            width: 800,
            height: 600,
        }
    }
}

//=== GameTuning ==========================================================

/// Rule constants for every game. Defaults are the classic values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    pub flappy: FlappyConfig,
    pub shooter: ShooterConfig,
    pub platformer: PlatformerConfig,
    pub pong: PongConfig,
    pub snake: SnakeConfig,
    pub tetris: TetrisConfig,
}

//=== ArcadeConfig ========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    /// Logic ticks per second.
    pub tps: f64,
    /// Capacity of the platform → core and core → platform channels.
    pub channel_capacity: usize,
    pub window: WindowConfig,
    /// Session RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
    pub games: GameTuning,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            window: WindowConfig::default(),
            seed: None,
            games: GameTuning::default(),
        }
    }
}

impl ArcadeConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_json(&text)
    }

    /// Rejects values the engine or a game cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tps.is_finite() && self.tps > 0.0) {
            return Err(ConfigError::Invalid(format!("tps must be positive, got {}", self.tps)));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid("channel_capacity must be positive".into()));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero".into()));
        }

        let games = &self.games;
        if games.snake.columns < 2 || games.snake.rows < 1 {
            return Err(ConfigError::Invalid("snake grid needs at least 2x1 cells".into()));
        }
        if games.snake.start_speed <= 0.0 || games.snake.max_speed < games.snake.start_speed {
            return Err(ConfigError::Invalid(
                "snake speeds must be positive and max_speed >= start_speed".into(),
            ));
        }
        if games.tetris.columns < 4 || games.tetris.rows < 4 {
            return Err(ConfigError::Invalid("tetris board needs at least 4x4 cells".into()));
        }
        if games.tetris.min_interval_ms == 0 || games.tetris.lines_per_level == 0 {
            return Err(ConfigError::Invalid(
                "tetris min_interval_ms and lines_per_level must be positive".into(),
            ));
        }
        if games.pong.winning_points == 0 {
            return Err(ConfigError::Invalid("pong winning_points must be positive".into()));
        }
        if games.flappy.pipe_segments < 4 {
            return Err(ConfigError::Invalid("flappy needs at least 4 pipe segments".into()));
        }
        let shooter = &games.shooter;
        if shooter.bullet_pool == 0 {
            return Err(ConfigError::Invalid("shooter bullet_pool must be positive".into()));
        }
        let spawn_area = shooter.arena - Vec2::splat(2.0 * shooter.spawn_margin);
        if shooter.spawn_margin < 0.0 || spawn_area.min_element() < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "shooter arena {:?} leaves no room inside spawn_margin {}",
                shooter.arena, shooter.spawn_margin
            )));
        }
        let (lo, hi) = shooter.wander_speed;
        if !(lo.is_finite() && hi.is_finite()) || lo < 0.0 || lo > hi {
            return Err(ConfigError::Invalid(format!(
                "shooter wander_speed needs 0 <= low <= high, got ({}, {})",
                lo, hi
            )));
        }
        let largest = shooter.fighter_size.max(Vec2::splat(shooter.pack_size));
        if shooter.pack_size < 0.0
            || shooter.fighter_size.min_element() < 0.0
            || largest.cmpgt(shooter.arena).any()
        {
            return Err(ConfigError::Invalid(
                "shooter fighter_size and pack_size must fit inside the arena".into(),
            ));
        }
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
