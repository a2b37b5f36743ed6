//=========================================================================
// Action Mapper
//=========================================================================
//
// (key | button, modifiers, context) → HashMap → Action
//
// Lookups try the exact modifier set first and fall back to the
// unmodified binding, so holding Shift does not swallow an arrow key.
// Only bindings in the active context resolve.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::{
    action::{Action, InputContext},
    event::{KeyCode, Modifiers, MouseButton},
};

//=== ActionMapper ========================================================

#[derive(Debug)]
pub struct ActionMapper<A: Action> {
    key_bindings: HashMap<(KeyCode, Modifiers, InputContext), A>,
    mouse_bindings: HashMap<(MouseButton, Modifiers, InputContext), A>,
    current_context: InputContext,
}

impl<A: Action> Default for ActionMapper<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> ActionMapper<A> {
    pub fn new() -> Self {
        Self {
            key_bindings: HashMap::new(),
            mouse_bindings: HashMap::new(),
            current_context: InputContext::Primary,
        }
    }

    //--- Binding API ------------------------------------------------------

    pub fn bind_key(&mut self, key: KeyCode, action: A, context: InputContext) {
        self.bind_key_with_mods(key, Modifiers::NONE, action, context);
    }

    /// Rebinding the same triple replaces the previous action.
    pub fn bind_key_with_mods(
        &mut self,
        key: KeyCode,
        modifiers: Modifiers,
        action: A,
        context: InputContext,
    ) {
        self.key_bindings.insert((key, modifiers, context), action);
    }

    pub fn bind_button(&mut self, button: MouseButton, action: A, context: InputContext) {
        self.bind_button_with_mods(button, Modifiers::NONE, action, context);
    }

    pub fn bind_button_with_mods(
        &mut self,
        button: MouseButton,
        modifiers: Modifiers,
        action: A,
        context: InputContext,
    ) {
        self.mouse_bindings.insert((button, modifiers, context), action);
    }

    /// Removes every modifier variant of `key` in `context`.
    pub fn unbind_key(&mut self, key: KeyCode, context: InputContext) {
        self.key_bindings.retain(|&(k, _, ctx), _| !(k == key && ctx == context));
    }

    pub fn unbind_button(&mut self, button: MouseButton, context: InputContext) {
        self.mouse_bindings.retain(|&(b, _, ctx), _| !(b == button && ctx == context));
    }

    pub fn clear_context(&mut self, context: InputContext) {
        self.key_bindings.retain(|&(_, _, ctx), _| ctx != context);
        self.mouse_bindings.retain(|&(_, _, ctx), _| ctx != context);
    }

    pub fn set_context(&mut self, context: InputContext) {
        self.current_context = context;
    }

    pub fn current_context(&self) -> InputContext {
        self.current_context
    }

    //--- Lookup -----------------------------------------------------------

    pub fn map_key(&self, key: KeyCode, modifiers: Modifiers) -> Option<A> {
        let ctx = self.current_context;
        self.key_bindings
            .get(&(key, modifiers, ctx))
            .or_else(|| self.key_bindings.get(&(key, Modifiers::NONE, ctx)))
            .copied()
    }

    pub fn map_button(&self, button: MouseButton, modifiers: Modifiers) -> Option<A> {
        let ctx = self.current_context;
        self.mouse_bindings
            .get(&(button, modifiers, ctx))
            .or_else(|| self.mouse_bindings.get(&(button, Modifiers::NONE, ctx)))
            .copied()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
