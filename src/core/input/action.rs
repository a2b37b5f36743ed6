//=========================================================================
// Action Trait & Input Context
//=========================================================================
//
// Actions: game-level commands the input layer produces from raw events.
// Contexts: separate binding sets (the cabinet games all share Primary,
// but the mapper keeps the split so a pause overlay can rebind keys).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Action Trait ========================================================

/// Marker trait for action enums.
///
/// ```
/// use arcade_suite::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum MenuAction { Select, Back }
///
/// impl Action for MenuAction {}
/// ```
pub trait Action: 'static + Send + Copy + Eq + Hash + Debug {}

//=== InputContext ========================================================

/// Which binding set is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputContext {
    /// Bindings used while a game is running.
    #[default]
    Primary,

    /// Host-defined binding sets.
    Custom(u32),
}

impl InputContext {
    #[inline]
    pub const fn custom(id: u32) -> Self {
        Self::Custom(id)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Steer {
        Left,
        Right,
    }

    impl Action for Steer {}

    #[test]
    fn actions_deduplicate_in_sets() {
        let mut set = HashSet::new();
        set.insert(Steer::Left);
        set.insert(Steer::Left);
        set.insert(Steer::Right);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn context_defaults_to_primary() {
        assert_eq!(InputContext::default(), InputContext::Primary);
    }

    #[test]
    fn primary_is_not_custom_zero() {
        assert_ne!(InputContext::Primary, InputContext::custom(0));
    }

    #[test]
    fn action_bounds_allow_thread_transfer() {
        fn assert_send_static<T: Send + 'static>() {}
        assert_send_static::<Steer>();
    }
}
