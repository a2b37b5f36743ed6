//=========================================================================
// Input System
//=========================================================================
//
// Per-frame pipeline from raw platform events to game actions.
//
// Pipeline:
//   frame_events → StateTracker (held / pressed / released)
//                → ActionMapper  (bindings in active context)
//                → ActionState   (read by scenes through GlobalContext)
//
// Owned by GlobalSystems and run once per tick, before scenes update.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod action;
pub mod action_mapper;
pub mod event;
pub mod state_tracker;

//=== Public API ==========================================================

pub use action::{Action, InputContext};
pub use action_mapper::ActionMapper;
pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
pub use state_tracker::StateTracker;

//=== External Dependencies ===============================================

use std::collections::HashSet;

use log::trace;

//=== ActionState =========================================================

/// Actions resolved for the current frame.
///
/// `pressed` holds actions whose key or button went down this frame;
/// `held` holds every action with at least one bound input still down.
/// A freshly pressed action is also held.
#[derive(Debug, Clone)]
pub struct ActionState<A: Action> {
    pressed: HashSet<A>,
    held: HashSet<A>,
}

impl<A: Action> Default for ActionState<A> {
    fn default() -> Self {
        Self {
            pressed: HashSet::new(),
            held: HashSet::new(),
        }
    }
}

impl<A: Action> ActionState<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, action: A) -> bool {
        self.pressed.contains(&action)
    }

    pub fn is_held(&self, action: A) -> bool {
        self.held.contains(&action)
    }

    pub fn pressed(&self) -> impl Iterator<Item = &A> {
        self.pressed.iter()
    }

    pub fn held(&self) -> impl Iterator<Item = &A> {
        self.held.iter()
    }

    //--- Mutation ---------------------------------------------------------
    //
    // Public so hosts and tests can script input without a platform.
    //

    /// Marks `action` as pressed this frame (and held).
    pub fn press(&mut self, action: A) {
        self.pressed.insert(action);
        self.held.insert(action);
    }

    pub fn hold(&mut self, action: A) {
        self.held.insert(action);
    }

    pub fn release(&mut self, action: A) {
        self.pressed.remove(&action);
        self.held.remove(&action);
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
        self.held.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty() && self.pressed.is_empty()
    }
}

//=== InputSystem =========================================================

/// Binding table plus the frame pipeline that fills an [`ActionState`].
#[derive(Debug)]
pub struct InputSystem<A: Action> {
    mapper: ActionMapper<A>,
}

impl<A: Action> Default for InputSystem<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> InputSystem<A> {
    pub fn new() -> Self {
        Self {
            mapper: ActionMapper::new(),
        }
    }

    //--- Bindings ---------------------------------------------------------

    pub fn bind_key(&mut self, key: KeyCode, action: A, context: InputContext) {
        self.mapper.bind_key(key, action, context);
    }

    pub fn bind_key_with_mods(
        &mut self,
        key: KeyCode,
        modifiers: Modifiers,
        action: A,
        context: InputContext,
    ) {
        self.mapper.bind_key_with_mods(key, modifiers, action, context);
    }

    pub fn bind_button(&mut self, button: MouseButton, action: A, context: InputContext) {
        self.mapper.bind_button(button, action, context);
    }

    pub fn unbind_key(&mut self, key: KeyCode, context: InputContext) {
        self.mapper.unbind_key(key, context);
    }

    pub fn set_context(&mut self, context: InputContext) {
        self.mapper.set_context(context);
    }

    pub fn context(&self) -> InputContext {
        self.mapper.current_context()
    }

    pub fn mapper(&self) -> &ActionMapper<A> {
        &self.mapper
    }

    //--- Frame Processing -------------------------------------------------

    /// Folds this frame's event batches into `state`, then rebuilds
    /// `actions` from the resulting key and button sets.
    pub(crate) fn process_frame(
        &self,
        state: &mut StateTracker,
        batches: &[Vec<InputEvent>],
        actions: &mut ActionState<A>,
    ) {
        state.begin_frame();
        for batch in batches {
            state.process_events(batch);
        }
        state.finalize_frame();

        actions.clear();
        let mods = state.modifiers();

        for key in state.keys_down() {
            if let Some(action) = self.mapper.map_key(*key, mods) {
                actions.hold(action);
            }
        }
        for button in state.buttons_down() {
            if let Some(action) = self.mapper.map_button(*button, mods) {
                actions.hold(action);
            }
        }
        for key in state.keys_pressed() {
            if let Some(action) = self.mapper.map_key(*key, mods) {
                actions.press(action);
            }
        }
        for button in state.buttons_pressed() {
            if let Some(action) = self.mapper.map_button(*button, mods) {
                actions.press(action);
            }
        }

        if !actions.pressed.is_empty() {
            trace!(target: "core::input", "Pressed this frame: {:?}", actions.pressed);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
