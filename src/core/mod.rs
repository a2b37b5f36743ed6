//=========================================================================
// Core Systems
//=========================================================================
//
// Everything that runs on the logic thread.
//
// Architecture:
// ```text
//   EventCollector ──batches──> GlobalContext.frame_events
//                                     │
//   GlobalSystems::update() ──────────┘
//     ├─ FrameClock.advance(1/TPS)
//     ├─ InputSystem  → ActionState
//     └─ SceneManager → Scene::update (games)
// ```
//
// The clock advances by exactly one fixed step per tick regardless of
// how long the tick took, so a run is reproducible from its seed and
// input stream. Wall time only paces the loop.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod globals;
pub mod input;
pub mod physics;
pub(crate) mod platform_bridge;
pub mod scene;
pub mod scheduler;
pub mod scoring;

//=== Public API ==========================================================

pub use globals::{FrameClock, GlobalContext, GlobalSystems};
pub use input::{Action, ActionState, InputContext, InputSystem};
pub use scene::{Scene, SceneKey, SceneManager};

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;
use platform_bridge::{EventCollector, PlatformEvent, TickControl};

//=== CoreSystemsOrchestrator =============================================

/// Owns systems and context; ticks them at a fixed rate.
pub(crate) struct CoreSystemsOrchestrator<S: SceneKey, A: Action> {
    systems: GlobalSystems<S, A>,
    context: GlobalContext<S, A>,
    started: bool,
}

impl<S: SceneKey, A: Action> CoreSystemsOrchestrator<S, A> {
    pub(crate) fn new() -> Self {
        Self {
            systems: GlobalSystems::new(),
            context: GlobalContext::new(),
            started: false,
        }
    }

    pub(crate) fn init_systems<F>(&mut self, init_fn: F)
    where
        F: FnOnce(&mut GlobalSystems<S, A>),
    {
        init_fn(&mut self.systems);
    }

    pub(crate) fn systems_mut(&mut self) -> &mut GlobalSystems<S, A> {
        &mut self.systems
    }

    pub(crate) fn context(&self) -> &GlobalContext<S, A> {
        &self.context
    }

    //--- Ticking ----------------------------------------------------------

    /// Enters the initial scenes. Idempotent.
    pub(crate) fn start(&mut self) {
        if !self.started {
            self.started = true;
            self.systems.scene_manager.start(&self.context);
        }
    }

    /// Runs one tick with the given input batches.
    pub(crate) fn tick(&mut self, batches: Vec<Vec<InputEvent>>, step: Duration) {
        self.start();
        self.context.frame_events = batches;
        self.systems.update(&mut self.context, step);
    }

    //--- Logic Thread -----------------------------------------------------

    /// Spawns the logic thread.
    ///
    /// Each tick: drain platform events, update systems, sleep off the
    /// rest of the frame. Exits on `WindowClosed` or disconnect.
    pub(crate) fn spawn_core_thread(
        mut self,
        receiver: Receiver<PlatformEvent>,
        tps: f64,
    ) -> std::io::Result<thread::JoinHandle<()>> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);

        thread::Builder::new()
            .name("arcade-logic".into())
            .spawn(move || {
                let mut collector = EventCollector::new(receiver);
                self.start();
                info!("Logic thread running at {} TPS", tps);

                loop {
                    let frame_start = Instant::now();

                    if collector.collect_frame() == TickControl::Exit {
                        info!("Core thread exiting after {} ticks", self.context.clock.tick);
                        break;
                    }

                    self.tick(collector.take_batches(), frame_duration);

                    let elapsed = frame_start.elapsed();
                    if elapsed < frame_duration {
                        thread::sleep(frame_duration - elapsed);
                    } else {
                        debug!("Tick overran by {:?}", elapsed - frame_duration);
                    }
                }
            })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputContext, KeyCode};
    use crossbeam_channel::unbounded;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        Main,
    }

    impl SceneKey for Key {}

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Act {
        Go,
    }

    impl Action for Act {}

    struct Counter {
        entered: Arc<Mutex<u32>>,
        presses: Arc<Mutex<u32>>,
    }

    impl Scene<Key, Act> for Counter {
        fn on_enter(&mut self, _ctx: &GlobalContext<Key, Act>) {
            *self.entered.lock().unwrap() += 1;
        }

        fn update(&mut self, ctx: &mut GlobalContext<Key, Act>) {
            if ctx.actions.is_pressed(Act::Go) {
                *self.presses.lock().unwrap() += 1;
            }
        }
    }

    fn orchestrator() -> (CoreSystemsOrchestrator<Key, Act>, Arc<Mutex<u32>>, Arc<Mutex<u32>>) {
        let entered = Arc::new(Mutex::new(0));
        let presses = Arc::new(Mutex::new(0));
        let mut core = CoreSystemsOrchestrator::new();
        let scene = Counter { entered: Arc::clone(&entered), presses: Arc::clone(&presses) };
        core.init_systems(|systems| {
            systems.input.bind_key(KeyCode::Enter, Act::Go, InputContext::Primary);
            systems.scene_manager.register(Key::Main, scene);
        });
        (core, entered, presses)
    }

    #[test]
    fn headless_ticks_advance_clock_and_enter_once() {
        let (mut core, entered, presses) = orchestrator();
        let step = Duration::from_millis(20);

        core.tick(vec![vec![InputEvent::key_down(KeyCode::Enter)]], step);
        core.tick(vec![], step);

        assert_eq!(*entered.lock().unwrap(), 1);
        assert_eq!(*presses.lock().unwrap(), 1);
        assert_eq!(core.context().clock.now, Duration::from_millis(40));
    }

    #[test]
    fn core_thread_stops_on_window_close() {
        let (core, entered, _) = orchestrator();
        let (tx, rx) = unbounded();

        let handle = core.spawn_core_thread(rx, 240.0).unwrap();
        tx.send(PlatformEvent::WindowClosed).unwrap();
        handle.join().unwrap();

        assert_eq!(*entered.lock().unwrap(), 1);
    }
}
