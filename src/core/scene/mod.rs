//=========================================================================
// Scene System
//=========================================================================
//
// Every mounted game is one scene.
//
// Architecture:
//   SceneManager
//     ├─ scenes: HashMap<S, Box<dyn Scene>>
//     └─ order: Vec<S>
//
// Flow:
//   start()  → Scene::on_enter()  (first tick)
//   update() → Scene::update()    (every tick, mount order)
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::globals::GlobalContext;
use crate::core::input::Action;

//=== Module Declarations =================================================

mod scene_manager;

//=== Public API ==========================================================

pub use scene_manager::{BoxedScene, SceneKey, SceneManager};

//=== Scene Trait =========================================================

/// Lifecycle hooks for one scene.
///
/// Only `update()` is required.
///
/// ```
/// use arcade_suite::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Screen { Attract }
/// impl SceneKey for Screen {}
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Button { Start }
/// impl Action for Button {}
///
/// struct Attract { frames: u64 }
///
/// impl Scene<Screen, Button> for Attract {
///     fn update(&mut self, _ctx: &mut GlobalContext<Screen, Button>) {
///         self.frames += 1;
///     }
/// }
/// ```
pub trait Scene<S: SceneKey, A: Action>: Send {
    /// Called once, on the first tick after mounting.
    fn on_enter(&mut self, _context: &GlobalContext<S, A>) {}

    /// Called every tick.
    fn update(&mut self, context: &mut GlobalContext<S, A>);
}
