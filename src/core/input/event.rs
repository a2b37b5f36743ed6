//=========================================================================
// Input Event Types
//
// Portable representation of the raw key and pointer events the arcade
// games react to. The platform layer converts winit events into these
// before they cross into the logic thread.
//
// Event Flow:
// ```text
// Platform Layer (winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    StateTracker (held / pressed / released)
//         ↓
//    ArcadeAction (Left, Right, Confirm, Fire, ...)
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::hash::{Hash, Hasher};

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// `Other` covers side and thumb buttons, which no game binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier (location, not produced character).
///
/// Covers the keys the cabinet games read: letters (WASD movement),
/// digits, arrows and the usual special keys. Anything else arrives as
/// `Unidentified` and is filtered by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Key the platform reported but the engine does not model.
    Unidentified,
}

//=== InputEvent ==========================================================

/// Low-level input event from the platform layer.
///
/// # Equality & Hashing Semantics
///
/// Events compare by kind + key/button + modifiers. `MouseMoved` events
/// are equal regardless of coordinates so a frame buffer can coalesce
/// them (last position wins).
///
/// ```text
/// KeyDown{Space, NONE} == KeyDown{Space, NONE}    ✓
/// KeyDown{Space, NONE} == KeyDown{Space, SHIFT}   ✗
/// KeyDown{Space}       == KeyUp{Space}            ✗
/// MouseMoved{..}       == MouseMoved{..}          ✓
/// ```
#[derive(Debug, Clone)]
pub enum InputEvent {
    KeyDown {
        key: KeyCode,
        modifiers: Modifiers,
    },

    KeyUp {
        key: KeyCode,
        modifiers: Modifiers,
    },

    MouseButtonDown {
        button: MouseButton,
        modifiers: Modifiers,
    },

    MouseButtonUp {
        button: MouseButton,
        modifiers: Modifiers,
    },

    /// Pointer moved, in viewport pixels with a top-left origin.
    MouseMoved { x: f32, y: f32 },

    /// Unsupported event; ignored by the input system.
    Unidentified,
}

//--- Constructors ----------------------------------------------------------

impl InputEvent {
    /// Key press without modifiers.
    pub fn key_down(key: KeyCode) -> Self {
        Self::KeyDown { key, modifiers: Modifiers::NONE }
    }

    /// Key release without modifiers.
    pub fn key_up(key: KeyCode) -> Self {
        Self::KeyUp { key, modifiers: Modifiers::NONE }
    }

    /// Mouse button press without modifiers.
    pub fn button_down(button: MouseButton) -> Self {
        Self::MouseButtonDown { button, modifiers: Modifiers::NONE }
    }

    /// Mouse button release without modifiers.
    pub fn button_up(button: MouseButton) -> Self {
        Self::MouseButtonUp { button, modifiers: Modifiers::NONE }
    }
}

//--- Trait Implementations -----------------------------------------------

impl PartialEq for InputEvent {
    fn eq(&self, other: &Self) -> bool {
        use InputEvent::*;
        match (self, other) {
            (KeyDown { key: a, modifiers: ma }, KeyDown { key: b, modifiers: mb })
            | (KeyUp { key: a, modifiers: ma }, KeyUp { key: b, modifiers: mb }) => {
                a == b && ma == mb
            }
            (
                MouseButtonDown { button: a, modifiers: ma },
                MouseButtonDown { button: b, modifiers: mb },
            )
            | (
                MouseButtonUp { button: a, modifiers: ma },
                MouseButtonUp { button: b, modifiers: mb },
            ) => a == b && ma == mb,
            (MouseMoved { .. }, MouseMoved { .. }) => true,
            (Unidentified, Unidentified) => true,
            _ => false,
        }
    }
}

impl Eq for InputEvent {}

/// Hashes kind + payload; pointer coordinates are left out to stay
/// consistent with equality.
impl Hash for InputEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);

        match self {
            Self::KeyDown { key, modifiers } | Self::KeyUp { key, modifiers } => {
                key.hash(state);
                modifiers.hash(state);
            }
            Self::MouseButtonDown { button, modifiers }
            | Self::MouseButtonUp { button, modifiers } => {
                button.hash(state);
                modifiers.hash(state);
            }
            _ => {}
        }
    }
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt), left/right not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };

    /// Shift only.
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false };

    /// Ctrl only.
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false };

    /// Alt only.
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true };
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn same_key_same_modifiers_are_equal() {
        assert_eq!(InputEvent::key_down(KeyCode::Space), InputEvent::key_down(KeyCode::Space));
    }

    #[test]
    fn modifiers_distinguish_events() {
        let plain = InputEvent::key_down(KeyCode::KeyS);
        let ctrl = InputEvent::KeyDown { key: KeyCode::KeyS, modifiers: Modifiers::CTRL };
        assert_ne!(plain, ctrl);
        assert_ne!(hash_of(&plain), hash_of(&ctrl));
    }

    #[test]
    fn press_and_release_differ() {
        assert_ne!(InputEvent::key_down(KeyCode::ArrowUp), InputEvent::key_up(KeyCode::ArrowUp));
        assert_ne!(
            InputEvent::button_down(MouseButton::Left),
            InputEvent::button_up(MouseButton::Left)
        );
    }

    #[test]
    fn pointer_moves_coalesce_in_sets() {
        let mut set = HashSet::new();
        set.insert(InputEvent::MouseMoved { x: 10.0, y: 10.0 });
        set.replace(InputEvent::MouseMoved { x: 320.0, y: 200.0 });

        assert_eq!(set.len(), 1);
        match set.iter().next() {
            Some(InputEvent::MouseMoved { x, y }) => assert_eq!((*x, *y), (320.0, 200.0)),
            other => panic!("expected pointer move, got {:?}", other),
        }
    }

    #[test]
    fn modifiers_default_to_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
    }
}
