//=========================================================================
// Global Systems
//=========================================================================
//
// Engine-level systems with logic. They operate on GlobalContext data.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use super::GlobalContext;
use crate::core::input::{Action, InputSystem};
use crate::core::scene::{SceneKey, SceneManager};

//=== GlobalSystems =======================================================

/// Input bindings and the mounted scenes, configured through
/// [`crate::Engine::init`].
pub struct GlobalSystems<S: SceneKey, A: Action> {
    pub input: InputSystem<A>,
    pub scene_manager: SceneManager<S, A>,
}

impl<S: SceneKey, A: Action> GlobalSystems<S, A> {
    pub(crate) fn new() -> Self {
        Self {
            input: InputSystem::new(),
            scene_manager: SceneManager::new(),
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// One tick.
    ///
    /// 1. Advance the clock by `step`
    /// 2. Fold platform events into input state and actions
    /// 3. Update mounted scenes
    pub(crate) fn update(&mut self, context: &mut GlobalContext<S, A>, step: Duration) {
        context.clock.advance(step);

        let events = std::mem::take(&mut context.frame_events);
        self.input
            .process_frame(&mut context.input_state, &events, &mut context.actions);

        self.scene_manager.update(context);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::globals::GlobalContext;
    use crate::core::input::{InputContext, InputEvent, KeyCode};
    use crate::core::scene::Scene;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        Only,
    }

    impl SceneKey for Key {}

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Act {
        Jump,
    }

    impl Action for Act {}

    struct Recorder {
        seen: Arc<Mutex<Vec<(Duration, bool)>>>,
    }

    impl Scene<Key, Act> for Recorder {
        fn update(&mut self, ctx: &mut GlobalContext<Key, Act>) {
            self.seen
                .lock()
                .unwrap()
                .push((ctx.clock.now, ctx.actions.is_pressed(Act::Jump)));
        }
    }

    #[test]
    fn tick_feeds_scenes_fresh_actions_and_time() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut systems = GlobalSystems::<Key, Act>::new();
        let mut ctx = GlobalContext::new();

        systems.input.bind_key(KeyCode::Space, Act::Jump, InputContext::Primary);
        systems
            .scene_manager
            .register(Key::Only, Recorder { seen: Arc::clone(&seen) });

        let step = Duration::from_millis(10);
        ctx.frame_events.push(vec![InputEvent::key_down(KeyCode::Space)]);
        systems.update(&mut ctx, step);
        systems.update(&mut ctx, step);

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![(step, true), (step * 2, false)]);
        assert!(ctx.frame_events.is_empty());
    }
}
