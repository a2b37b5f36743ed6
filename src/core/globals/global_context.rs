//=========================================================================
// Global Context
//=========================================================================
//
// Shared data handed to scenes every tick:
// - input_state: raw key/button state
// - actions: this frame's resolved actions
// - clock: deterministic engine time
//
//=========================================================================

//=== External Dependencies ===============================================

use std::marker::PhantomData;
use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::input::{Action, ActionState, InputEvent, StateTracker};
use crate::core::scene::SceneKey;

//=== FrameClock ==========================================================

/// Engine time. Advances by a fixed step per tick, never by wall time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameClock {
    /// Time since the engine started, including this tick.
    pub now: Duration,
    /// Length of the current tick.
    pub delta: Duration,
    pub tick: u64,
}

impl FrameClock {
    pub(crate) fn advance(&mut self, step: Duration) {
        self.delta = step;
        self.now += step;
        self.tick += 1;
    }
}

//=== GlobalContext =======================================================

pub struct GlobalContext<S: SceneKey, A: Action> {
    pub input_state: StateTracker,
    pub actions: ActionState<A>,
    pub clock: FrameClock,

    /// Batches collected from the platform this tick. Consumed by the
    /// input system before scenes run.
    pub(crate) frame_events: Vec<Vec<InputEvent>>,

    _scene: PhantomData<fn() -> S>,
}

impl<S: SceneKey, A: Action> GlobalContext<S, A> {
    pub(crate) fn new() -> Self {
        Self {
            input_state: StateTracker::new(),
            actions: ActionState::new(),
            clock: FrameClock::default(),
            frame_events: Vec::new(),
            _scene: PhantomData,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_accumulates_fixed_steps() {
        let mut clock = FrameClock::default();
        let step = Duration::from_micros(16_667);
        for _ in 0..3 {
            clock.advance(step);
        }
        assert_eq!(clock.tick, 3);
        assert_eq!(clock.delta, step);
        assert_eq!(clock.now, step * 3);
    }
}
