//=========================================================================
// arcade — run one game in a window
//=========================================================================
//
// Usage:
//   arcade snake
//   arcade tetris --tps 120 --seed 42 --score-log scores.jsonl
//   arcade pong --config arcade.json --game-id 4 --mount lobby
//
// Logging follows RUST_LOG (default: info); `-v` / `-vv` raise it.
//
//=========================================================================

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{ArgAction, Parser};
use env_logger::Builder;
use log::{error, LevelFilter};

use arcade_suite::{
    ArcadeConfig, ArcadeEngineBuilder, ArcadeError, GameId, GameKind, JsonLinesScorePort,
    LogScorePort, MountPoint, SharedScorePort,
};

#[derive(Parser, Debug)]
#[command(name = "arcade", version)]
#[command(about = "Flappy Bird, shooter, platformer, Pong, Snake and Tetris")]
struct Cli {
    /// flappy, shooter, platformer, pong, snake or tetris
    #[arg(value_parser = GameKind::parse_name)]
    game: GameKind,

    /// JSON config file (engine settings and per-game tuning)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Logic ticks per second
    #[arg(long)]
    tps: Option<f64>,

    /// Seed for the game's random number generator
    #[arg(long)]
    seed: Option<u64>,

    /// Append score submissions to this file as JSON lines
    #[arg(long)]
    score_log: Option<PathBuf>,

    /// Id reported with every score submission
    #[arg(long, default_value_t = 1)]
    game_id: u32,

    /// Name of the place the game is shown
    #[arg(long, default_value = "main")]
    mount: String,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbose: u8) {
    let mut builder = Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(LevelFilter::Info);
    }
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder
        .filter_module("winit", LevelFilter::Warn)
        .format_timestamp_millis()
        .try_init()
        .ok();
}

fn run(cli: Cli) -> Result<(), ArcadeError> {
    let mut config = match &cli.config {
        Some(path) => ArcadeConfig::from_path(path)?,
        None => ArcadeConfig::default(),
    };
    if let Some(tps) = cli.tps {
        config.tps = tps;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if config.window.title == ArcadeConfig::default().window.title {
        config.window.title = cli.game.title().to_string();
    }
    config.validate()?;

    let score_port: SharedScorePort = match &cli.score_log {
        Some(path) => Arc::new(JsonLinesScorePort::open(path)?),
        None => Arc::new(LogScorePort),
    };

    ArcadeEngineBuilder::new()
        .with_config(config)
        .with_score_port(score_port)
        .build()
        .mount(cli.game, MountPoint::new(cli.mount), GameId(cli.game_id))
        .run()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
