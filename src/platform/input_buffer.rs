//=========================================================================
// Input Buffer
//=========================================================================
//
// Per-redraw holding area for input on the platform thread.
//
// Two lanes:
// - discrete: key and button transitions, in arrival order, with
//   back-to-back repeats (OS key repeat) collapsed
// - continuous: pointer motion, coalesced so only the latest position
//   of a redraw crosses to the logic thread
//
// `drain()` hands both lanes over and leaves the buffer empty with its
// allocations intact for the next redraw.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use crate::core::input::event::InputEvent;

//=== InputBuffer =========================================================

pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    continuous: HashSet<InputEvent>,
}

impl InputBuffer {
    pub(crate) fn new() -> Self {
        const DISCRETE_BASE: usize = 64;
        const CONTINUOUS_BASE: usize = 4;

        Self {
            discrete: Vec::with_capacity(DISCRETE_BASE),
            continuous: HashSet::with_capacity(CONTINUOUS_BASE),
        }
    }

    //--- Recording --------------------------------------------------------

    /// Latest event of a kind replaces the previous one (equality ignores
    /// pointer coordinates).
    pub(crate) fn push_continuous(&mut self, event: InputEvent) {
        self.continuous.replace(event);
    }

    /// Appends a transition unless it repeats the previous one.
    pub(crate) fn push_discrete(&mut self, event: InputEvent) {
        if self.discrete.last() != Some(&event) {
            self.discrete.push(event);
        }
    }

    //--- Drain ------------------------------------------------------------

    /// Takes this redraw's `(discrete, continuous)` events, or `None` if
    /// nothing was recorded.
    pub(crate) fn drain(&mut self) -> Option<(Vec<InputEvent>, Vec<InputEvent>)> {
        if self.is_empty() {
            return None;
        }
        let discrete: Vec<InputEvent> = self.discrete.drain(..).collect();
        let continuous: Vec<InputEvent> = self.continuous.drain().collect();
        Some((discrete, continuous))
    }

    //--- Utilities --------------------------------------------------------

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.discrete.len() + self.continuous.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.continuous.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::{KeyCode, MouseButton};

    fn mouse_move(x: f32, y: f32) -> InputEvent {
        InputEvent::MouseMoved { x, y }
    }

    #[test]
    fn repeated_key_down_collapses() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(InputEvent::key_down(KeyCode::Space));
        buffer.push_discrete(InputEvent::key_down(KeyCode::Space));
        buffer.push_discrete(InputEvent::key_down(KeyCode::ArrowLeft));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn tap_within_one_redraw_keeps_both_edges() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(InputEvent::button_down(MouseButton::Left));
        buffer.push_discrete(InputEvent::button_up(MouseButton::Left));

        let (discrete, continuous) = buffer.drain().unwrap();
        assert_eq!(
            discrete,
            vec![InputEvent::button_down(MouseButton::Left), InputEvent::button_up(MouseButton::Left)]
        );
        assert!(continuous.is_empty());
    }

    #[test]
    fn pointer_motion_keeps_latest_position() {
        let mut buffer = InputBuffer::new();
        buffer.push_continuous(mouse_move(10.0, 10.0));
        buffer.push_continuous(mouse_move(20.0, 30.0));

        let (_, continuous) = buffer.drain().unwrap();
        assert_eq!(continuous.len(), 1);
        match continuous[0] {
            InputEvent::MouseMoved { x, y } => assert_eq!((x, y), (20.0, 30.0)),
            ref other => panic!("Expected MouseMoved, found {:?}", other),
        }
    }

    #[test]
    fn drain_empties_buffer() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(InputEvent::key_down(KeyCode::KeyA));
        buffer.push_continuous(mouse_move(5.0, 5.0));

        assert!(buffer.drain().is_some());
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_none());
    }

    #[test]
    fn drain_keeps_capacity() {
        let mut buffer = InputBuffer::new();
        for i in 0..200 {
            let key = if i % 2 == 0 { KeyCode::KeyA } else { KeyCode::KeyB };
            buffer.push_discrete(InputEvent::key_down(key));
        }
        let cap = buffer.discrete.capacity();

        buffer.drain();
        assert_eq!(buffer.discrete.capacity(), cap);
    }
}
