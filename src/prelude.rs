//=========================================================================
// Prelude
//=========================================================================
//
// Convenience re-exports.
//
// Usage:
//   use arcade_suite::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{ArcadeEngineBuilder, Engine, EngineBuilder};
pub use crate::error::ArcadeError;

// Global systems and context
pub use crate::core::globals::{GlobalContext, GlobalSystems};

// Input system
pub use crate::core::input::{Action, InputContext, KeyCode, Modifiers, MouseButton};

// Scene system
pub use crate::core::scene::{Scene, SceneKey};

// Games and ports
pub use crate::core::scoring::{GameId, MountPoint, ReadySignal, ScorePort, ScoreSubmission};
pub use crate::games::{ArcadeAction, Game, GameKind, Outcome};
