//=========================================================================
// State Tracker
//=========================================================================
//
// Raw key/button state with per-frame deltas.
//
// Frame lifecycle: begin_frame() → process_events() → finalize_frame() → query
//
// Games never read this directly; InputSystem folds it into an
// ActionState. It stays public for hosts that want raw queries.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== StateTracker ========================================================

/// Held keys/buttons plus what changed during the current frame.
#[derive(Debug, Default)]
pub struct StateTracker {
    //--- Persistent State -------------------------------------------------
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    pointer: Vec2,
    modifiers: Modifiers,

    //--- Frame Deltas -----------------------------------------------------
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,

    pointer_delta: Vec2,
    last_pointer: Vec2,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Drops last frame's pressed/released sets.
    pub(crate) fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.last_pointer = self.pointer;
    }

    pub(crate) fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            self.process_event(event);
        }
    }

    pub(crate) fn finalize_frame(&mut self) {
        self.pointer_delta = self.pointer - self.last_pointer;
    }

    fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { key, modifiers } => {
                self.modifiers = *modifiers;
                // OS key repeat must not count as a fresh press
                if self.keys_down.insert(*key) {
                    self.keys_pressed.insert(*key);
                }
            }
            InputEvent::KeyUp { key, modifiers } => {
                self.modifiers = *modifiers;
                if self.keys_down.remove(key) {
                    self.keys_released.insert(*key);
                }
            }
            InputEvent::MouseButtonDown { button, modifiers } => {
                self.modifiers = *modifiers;
                if self.buttons_down.insert(*button) {
                    self.buttons_pressed.insert(*button);
                }
            }
            InputEvent::MouseButtonUp { button, modifiers } => {
                self.modifiers = *modifiers;
                if self.buttons_down.remove(button) {
                    self.buttons_released.insert(*button);
                }
            }
            InputEvent::MouseMoved { x, y } => {
                self.pointer = Vec2::new(*x, *y);
            }
            InputEvent::Unidentified => {}
        }
    }

    //=====================================================================
    // Query API
    //=====================================================================

    /// `true` only on the frame the key went down.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// `true` while the key is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn is_button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Pointer position in viewport pixels.
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_delta
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn keys_down(&self) -> impl Iterator<Item = &KeyCode> {
        self.keys_down.iter()
    }

    pub fn keys_pressed(&self) -> impl Iterator<Item = &KeyCode> {
        self.keys_pressed.iter()
    }

    pub fn buttons_down(&self) -> impl Iterator<Item = &MouseButton> {
        self.buttons_down.iter()
    }

    pub fn buttons_pressed(&self) -> impl Iterator<Item = &MouseButton> {
        self.buttons_pressed.iter()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tracker: &mut StateTracker, events: &[InputEvent]) {
        tracker.begin_frame();
        tracker.process_events(events);
        tracker.finalize_frame();
    }

    #[test]
    fn press_lasts_one_frame_hold_persists() {
        let mut tracker = StateTracker::new();

        frame(&mut tracker, &[InputEvent::key_down(KeyCode::Space)]);
        assert!(tracker.is_key_pressed(KeyCode::Space));
        assert!(tracker.is_key_down(KeyCode::Space));

        frame(&mut tracker, &[]);
        assert!(!tracker.is_key_pressed(KeyCode::Space));
        assert!(tracker.is_key_down(KeyCode::Space));
    }

    #[test]
    fn key_repeat_is_not_a_new_press() {
        let mut tracker = StateTracker::new();
        frame(&mut tracker, &[InputEvent::key_down(KeyCode::ArrowLeft)]);
        frame(&mut tracker, &[InputEvent::key_down(KeyCode::ArrowLeft)]);

        assert!(!tracker.is_key_pressed(KeyCode::ArrowLeft));
        assert!(tracker.is_key_down(KeyCode::ArrowLeft));
    }

    #[test]
    fn tap_within_one_frame_registers_press_and_release() {
        let mut tracker = StateTracker::new();
        frame(
            &mut tracker,
            &[InputEvent::key_down(KeyCode::ArrowUp), InputEvent::key_up(KeyCode::ArrowUp)],
        );

        assert!(tracker.is_key_pressed(KeyCode::ArrowUp));
        assert!(tracker.is_key_released(KeyCode::ArrowUp));
        assert!(!tracker.is_key_down(KeyCode::ArrowUp));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut tracker = StateTracker::new();
        frame(&mut tracker, &[InputEvent::key_up(KeyCode::KeyW)]);
        assert!(!tracker.is_key_released(KeyCode::KeyW));
    }

    #[test]
    fn buttons_track_like_keys() {
        let mut tracker = StateTracker::new();
        frame(&mut tracker, &[InputEvent::button_down(MouseButton::Left)]);
        assert!(tracker.is_button_pressed(MouseButton::Left));

        frame(&mut tracker, &[InputEvent::button_up(MouseButton::Left)]);
        assert!(tracker.is_button_released(MouseButton::Left));
        assert!(!tracker.is_button_down(MouseButton::Left));
    }

    #[test]
    fn pointer_delta_is_per_frame() {
        let mut tracker = StateTracker::new();
        frame(&mut tracker, &[InputEvent::MouseMoved { x: 100.0, y: 50.0 }]);
        assert_eq!(tracker.pointer_delta(), Vec2::new(100.0, 50.0));

        frame(&mut tracker, &[InputEvent::MouseMoved { x: 110.0, y: 40.0 }]);
        assert_eq!(tracker.pointer(), Vec2::new(110.0, 40.0));
        assert_eq!(tracker.pointer_delta(), Vec2::new(10.0, -10.0));

        frame(&mut tracker, &[]);
        assert_eq!(tracker.pointer_delta(), Vec2::ZERO);
    }
}
