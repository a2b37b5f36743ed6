//=========================================================================
// Input Processor
//=========================================================================
//
// Turns winit window events into portable InputEvents.
//
// Architecture:
//   WindowEvent → InputProcessor → InputEvent → InputBuffer
//
// State kept here:
// - modifiers from the last ModifiersChanged, stamped on every key and
//   button event
// - the window scale factor, so pointer positions arrive in logical
//   viewport pixels (what the games measure in)
// - keys and buttons currently down, so a focus loss can release them
//   instead of leaving a paddle or a runner stuck moving
//
// OS key repeat and keys no game understands are filtered out.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use winit::{
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::event::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== InputProcessor ======================================================

pub(crate) struct InputProcessor {
    modifiers: Modifiers,
    scale_factor: f64,
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
}

impl InputProcessor {
    pub(crate) fn new() -> Self {
        Self {
            modifiers: Modifiers::NONE,
            scale_factor: 1.0,
            keys_down: HashSet::new(),
            buttons_down: HashSet::new(),
        }
    }

    //--- Window State -----------------------------------------------------

    pub(crate) fn update_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = Modifiers::from(state);
    }

    pub(crate) fn set_scale_factor(&mut self, scale_factor: f64) {
        if scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    #[cfg(test)]
    pub(crate) fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    //--- Conversion -------------------------------------------------------

    /// `None` for OS repeats, unknown keys and releases of keys that were
    /// never seen going down.
    pub(crate) fn process_key_event(&mut self, event: &KeyEvent) -> Option<InputEvent> {
        if event.repeat {
            return None;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        self.process_key(KeyCode::from(code), event.state)
    }

    pub(crate) fn process_mouse_button(
        &mut self,
        button: WinitMouseButton,
        state: ElementState,
    ) -> Option<InputEvent> {
        let button = MouseButton::from(button);
        let modifiers = self.modifiers;

        match state {
            ElementState::Pressed => {
                self.buttons_down.insert(button);
                Some(InputEvent::MouseButtonDown { button, modifiers })
            }
            ElementState::Released => self
                .buttons_down
                .remove(&button)
                .then_some(InputEvent::MouseButtonUp { button, modifiers }),
        }
    }

    /// Physical cursor position to logical pixels.
    pub(crate) fn process_mouse_move(&self, x: f64, y: f64) -> InputEvent {
        InputEvent::MouseMoved {
            x: (x / self.scale_factor) as f32,
            y: (y / self.scale_factor) as f32,
        }
    }

    /// Releases everything still down; used when the window loses focus.
    pub(crate) fn release_all(&mut self) -> Vec<InputEvent> {
        let modifiers = Modifiers::NONE;
        let keys = self
            .keys_down
            .drain()
            .map(|key| InputEvent::KeyUp { key, modifiers });
        let buttons = self
            .buttons_down
            .drain()
            .map(|button| InputEvent::MouseButtonUp { button, modifiers });
        let released = keys.chain(buttons).collect();
        self.modifiers = Modifiers::NONE;
        released
    }

    fn process_key(&mut self, key: KeyCode, state: ElementState) -> Option<InputEvent> {
        if key == KeyCode::Unidentified {
            return None;
        }
        let modifiers = self.modifiers;

        match state {
            ElementState::Pressed => {
                self.keys_down.insert(key);
                Some(InputEvent::KeyDown { key, modifiers })
            }
            ElementState::Released => self
                .keys_down
                .remove(&key)
                .then_some(InputEvent::KeyUp { key, modifiers }),
        }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

/// Keys outside the cabinet's set map to `Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode as W;

        const DIGITS: [KeyCode; 10] = [
            KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
            KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
        ];
        const WINIT_DIGITS: [W; 10] = [
            W::Digit0, W::Digit1, W::Digit2, W::Digit3, W::Digit4,
            W::Digit5, W::Digit6, W::Digit7, W::Digit8, W::Digit9,
        ];
        const LETTERS: [KeyCode; 26] = [
            KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
            KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
            KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
            KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
            KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
            KeyCode::KeyZ,
        ];
        const WINIT_LETTERS: [W; 26] = [
            W::KeyA, W::KeyB, W::KeyC, W::KeyD, W::KeyE, W::KeyF, W::KeyG, W::KeyH, W::KeyI,
            W::KeyJ, W::KeyK, W::KeyL, W::KeyM, W::KeyN, W::KeyO, W::KeyP, W::KeyQ, W::KeyR,
            W::KeyS, W::KeyT, W::KeyU, W::KeyV, W::KeyW, W::KeyX, W::KeyY, W::KeyZ,
        ];

        if let Some(i) = WINIT_DIGITS.iter().position(|w| *w == code) {
            return DIGITS[i];
        }
        if let Some(i) = WINIT_LETTERS.iter().position(|w| *w == code) {
            return LETTERS[i];
        }

        match code {
            W::ArrowUp => KeyCode::ArrowUp,
            W::ArrowDown => KeyCode::ArrowDown,
            W::ArrowLeft => KeyCode::ArrowLeft,
            W::ArrowRight => KeyCode::ArrowRight,
            W::Space => KeyCode::Space,
            W::Enter | W::NumpadEnter => KeyCode::Enter,
            W::Escape => KeyCode::Escape,
            W::Tab => KeyCode::Tab,
            W::Backspace => KeyCode::Backspace,
            W::Delete => KeyCode::Delete,
            _ => KeyCode::Unidentified,
        }
    }
}

impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn mods(shift: bool, ctrl: bool, alt: bool) -> ModifiersState {
        let mut state = ModifiersState::empty();
        state.set(ModifiersState::SHIFT, shift);
        state.set(ModifiersState::CONTROL, ctrl);
        state.set(ModifiersState::ALT, alt);
        state
    }

    #[test]
    fn starts_without_modifiers() {
        assert_eq!(InputProcessor::new().modifiers(), Modifiers::NONE);
    }

    #[test]
    fn modifiers_are_stamped_on_keys_and_buttons() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(mods(true, false, true));

        let key = processor.process_key(KeyCode::Space, ElementState::Pressed).unwrap();
        let button = processor
            .process_mouse_button(WinitMouseButton::Left, ElementState::Pressed)
            .unwrap();

        match (key, button) {
            (
                InputEvent::KeyDown { key, modifiers: km },
                InputEvent::MouseButtonDown { button, modifiers: bm },
            ) => {
                assert_eq!(key, KeyCode::Space);
                assert_eq!(button, MouseButton::Left);
                assert!(km.shift && km.alt && !km.ctrl);
                assert_eq!(km, bm);
            }
            other => panic!("unexpected events {:?}", other),
        }
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let mut processor = InputProcessor::new();
        assert_eq!(KeyCode::from(WinitKeyCode::F13), KeyCode::Unidentified);
        assert!(processor.process_key(KeyCode::Unidentified, ElementState::Pressed).is_none());
    }

    #[test]
    fn release_without_press_is_dropped() {
        let mut processor = InputProcessor::new();
        assert!(processor.process_key(KeyCode::KeyA, ElementState::Released).is_none());
        assert!(processor
            .process_mouse_button(WinitMouseButton::Left, ElementState::Released)
            .is_none());

        processor.process_key(KeyCode::KeyA, ElementState::Pressed);
        assert_eq!(
            processor.process_key(KeyCode::KeyA, ElementState::Released),
            Some(InputEvent::key_up(KeyCode::KeyA))
        );
    }

    #[test]
    fn pointer_is_reported_in_logical_pixels() {
        let mut processor = InputProcessor::new();
        processor.set_scale_factor(2.0);

        match processor.process_mouse_move(400.0, 300.0) {
            InputEvent::MouseMoved { x, y } => assert_eq!((x, y), (200.0, 150.0)),
            other => panic!("Expected MouseMoved, found {:?}", other),
        }
    }

    #[test]
    fn focus_loss_releases_everything_held() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(mods(false, true, false));
        processor.process_key(KeyCode::ArrowLeft, ElementState::Pressed);
        processor.process_mouse_button(WinitMouseButton::Left, ElementState::Pressed);

        let released = processor.release_all();
        assert_eq!(released.len(), 2);
        assert!(released.contains(&InputEvent::key_up(KeyCode::ArrowLeft)));
        assert!(released.contains(&InputEvent::button_up(MouseButton::Left)));
        assert_eq!(processor.modifiers(), Modifiers::NONE);
        assert!(processor.release_all().is_empty());
    }

    #[test]
    fn key_table_covers_letters_digits_and_specials() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyW), KeyCode::KeyW);
        assert_eq!(KeyCode::from(WinitKeyCode::KeyZ), KeyCode::KeyZ);
        assert_eq!(KeyCode::from(WinitKeyCode::Digit7), KeyCode::Digit7);
        assert_eq!(KeyCode::from(WinitKeyCode::NumpadEnter), KeyCode::Enter);
        assert_eq!(KeyCode::from(WinitKeyCode::ArrowDown), KeyCode::ArrowDown);
    }

    #[test]
    fn mouse_button_conversion() {
        assert_eq!(MouseButton::from(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(MouseButton::from(WinitMouseButton::Back), MouseButton::Other);
    }
}
