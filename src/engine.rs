//=========================================================================
// Arcade Engine
//
// Entry point tying the logic thread, the platform and the mounted game
// together.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──mount()──>  Engine  ──run()──>  [Runtime]
//         │                          │                                        │
//         ├─ with_config()           └─ init(|systems| ..)                    ├─ logic thread @ TPS
//         ├─ with_tps()                                                       ├─ platform (this thread)
//         ├─ with_channel_capacity()                                          └─ joins on exit
//         ├─ with_score_port()
//         └─ with_ready_signal()
// ```
//
// `step()` runs one tick on the calling thread with no window, which is
// how end-to-end tests drive a mounted game.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::config::{ArcadeConfig, GameTuning, WindowConfig};
use crate::core::input::InputEvent;
use crate::core::platform_bridge::PlatformEvent;
use crate::core::scoring::{GameId, HudUpdate, MountPoint, ReadySignal, SessionPorts, SharedScorePort};
use crate::core::{Action, CoreSystemsOrchestrator, GlobalContext, GlobalSystems, SceneKey};
use crate::error::ArcadeError;
use crate::games::{self, ArcadeAction, GameKind};
use crate::platform::Platform;

//=== Aliases =============================================================

/// Builder for the arcade's own scene and action types.
pub type ArcadeEngineBuilder = EngineBuilder<GameKind, ArcadeAction>;

pub type ArcadeEngine = Engine<GameKind, ArcadeAction>;

//=== EngineBuilder =======================================================

/// Configures an [`Engine`].
///
/// Starts from [`ArcadeConfig::default`] (60 TPS, 128-slot channels, an
/// 800x600 window, a random seed). Individual `with_*` calls override
/// whatever `with_config` supplied.
///
/// ```no_run
/// use arcade_suite::{ArcadeEngineBuilder, GameKind, GameId, MountPoint, LogScorePort};
/// use std::sync::Arc;
///
/// ArcadeEngineBuilder::new()
///     .with_tps(120.0)
///     .with_score_port(Arc::new(LogScorePort))
///     .build()
///     .mount(GameKind::Tetris, MountPoint::new("main"), GameId(3))
///     .run()
///     .unwrap();
/// ```
pub struct EngineBuilder<S: SceneKey, A: Action> {
    tps: f64,
    channel_capacity: usize,
    window: WindowConfig,
    seed: Option<u64>,
    tuning: GameTuning,
    ports: SessionPorts,
    _phantom: std::marker::PhantomData<(S, A)>,
}

impl<S: SceneKey, A: Action> EngineBuilder<S, A> {
    pub fn new() -> Self {
        Self::from_config(ArcadeConfig::default())
    }

    fn from_config(config: ArcadeConfig) -> Self {
        Self {
            tps: config.tps,
            channel_capacity: config.channel_capacity,
            window: config.window,
            seed: config.seed,
            tuning: config.games,
            ports: SessionPorts::none(),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Replaces every setting with `config` (ports are kept).
    pub fn with_config(self, config: ArcadeConfig) -> Self {
        let ports = self.ports;
        Self { ports, ..Self::from_config(config) }
    }

    /// Logic ticks per second. Each tick advances game time by `1/tps`.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Capacity of the input and HUD channels.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    /// Fixes the session RNG seed so a run can be replayed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Where final and checkpoint scores go. Without one, submissions are
    /// skipped (the player is treated as not logged in).
    pub fn with_score_port(mut self, port: SharedScorePort) -> Self {
        self.ports.score = Some(port);
        self
    }

    pub fn with_ready_signal(mut self, signal: ReadySignal) -> Self {
        self.ports.ready = Some(signal);
        self
    }

    pub fn build(self) -> Engine<S, A> {
        let seed = self.seed.unwrap_or_else(rand::random);
        info!(
            "Building engine (TPS: {}, channel: {}, seed: {})",
            self.tps, self.channel_capacity, seed
        );

        let (hud_tx, hud_rx) = bounded(self.channel_capacity);
        let ports = self.ports.with_hud(hud_tx);

        Engine {
            orchestrator: CoreSystemsOrchestrator::new(),
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            window: self.window,
            seed,
            tuning: self.tuning,
            ports,
            hud_receiver: hud_rx,
        }
    }
}

impl<S: SceneKey, A: Action> Default for EngineBuilder<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Arcade runtime.
///
/// ```text
/// Engine (main thread)
///   ├─► CoreSystemsOrchestrator (logic thread @ TPS)
///   │     └─► InputSystem → GameSession → ScorePort / ReadySignal / HUD
///   │
///   └─► Platform (winit event loop)
///         └─► window, input batching, HUD title
/// ```
pub struct Engine<S: SceneKey, A: Action> {
    orchestrator: CoreSystemsOrchestrator<S, A>,
    tps: f64,
    channel_capacity: usize,
    window: WindowConfig,
    seed: u64,
    tuning: GameTuning,
    ports: SessionPorts,
    hud_receiver: Receiver<HudUpdate>,
}

impl<S: SceneKey, A: Action> Engine<S, A> {
    //--- Initialization ---------------------------------------------------

    /// Configures bindings and scenes before the first tick.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut GlobalSystems<S, A>),
    {
        self.orchestrator.init_systems(init_fn);
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tps)
    }

    //--- Headless ---------------------------------------------------------

    /// Runs one tick on this thread with the given input batches.
    pub fn step(&mut self, batches: Vec<Vec<InputEvent>>) {
        let step = self.tick_duration();
        self.orchestrator.tick(batches, step);
    }

    pub fn context(&self) -> &GlobalContext<S, A> {
        self.orchestrator.context()
    }

    pub fn systems_mut(&mut self) -> &mut GlobalSystems<S, A> {
        self.orchestrator.systems_mut()
    }

    /// HUD lines published by mounted games.
    pub fn hud_updates(&self) -> &Receiver<HudUpdate> {
        &self.hud_receiver
    }

    //--- Execution --------------------------------------------------------

    /// Opens the window and blocks until it is closed.
    ///
    /// The logic thread stops on `WindowClosed` or when the platform side
    /// of the channel goes away; its panic is reported as
    /// [`ArcadeError::LogicPanicked`].
    pub fn run(self) -> Result<(), ArcadeError> {
        info!("Starting engine runtime (TPS: {})", self.tps);

        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);

        let core_handle = self
            .orchestrator
            .spawn_core_thread(rx, self.tps)
            .map_err(ArcadeError::Thread)?;
        info!("Core logic thread spawned");

        let platform = Platform::new(tx, self.hud_receiver, self.window);
        let platform_result = platform.run();
        info!("Platform event loop exited");

        let core_result = core_handle.join();
        if core_result.is_err() {
            error!("Core thread panicked");
        }

        platform_result?;
        core_result.map_err(|_| ArcadeError::LogicPanicked)?;

        info!("Engine shutdown complete");
        Ok(())
    }
}

//=== Arcade Mounting =====================================================

impl ArcadeEngine {
    /// Mounts one game with the default bindings. It runs alongside any
    /// game mounted before it and sends its ready signal on the first tick.
    pub fn mount(self, kind: GameKind, mount: MountPoint, game_id: GameId) -> Self {
        info!("Mounting {} at '{}' (game id {})", kind.title(), mount, game_id);

        let scene = games::mount_game(kind, mount, game_id, &self.tuning, self.ports.clone(), self.seed);
        self.init(|systems| {
            games::default_bindings(&mut systems.input);
            systems.scene_manager.register_boxed(kind, scene);
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
