//=========================================================================
// Scene Manager
//=========================================================================
//
// Scenes live in a HashMap by key; `order` keeps mount order so every
// tick updates them the same way. Each mounted game is independent of
// the others and they all run side by side.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::Scene;
use crate::core::globals::GlobalContext;
use crate::core::input::Action;

//=== SceneKey ============================================================

/// Marker trait for scene identifiers.
pub trait SceneKey: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

//=== SceneManager ========================================================

pub type BoxedScene<S, A> = Box<dyn Scene<S, A>>;

pub struct SceneManager<S: SceneKey, A: Action> {
    scenes: HashMap<S, BoxedScene<S, A>>,
    order: Vec<S>,
}

impl<S: SceneKey, A: Action> Default for SceneManager<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SceneKey, A: Action> SceneManager<S, A> {
    pub fn new() -> Self {
        Self {
            scenes: HashMap::new(),
            order: Vec::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Mounts `scene`; `on_enter` runs at [`SceneManager::start`].
    pub fn register<T>(&mut self, key: S, scene: T)
    where
        T: Scene<S, A> + 'static,
    {
        self.register_boxed(key, Box::new(scene));
    }

    /// Mounts an already boxed scene (what `mount_game` hands out). A key
    /// that is already mounted keeps its slot and gets the new scene.
    pub fn register_boxed(&mut self, key: S, scene: BoxedScene<S, A>) {
        if self.scenes.insert(key, scene).is_some() {
            warn!("Scene {:?} was already registered and has been replaced", key);
        } else {
            debug!("Registered scene {:?} at slot {}", key, self.order.len());
            self.order.push(key);
        }
    }

    /// Runs `on_enter` for every mounted scene, in mount order.
    pub fn start(&mut self, context: &GlobalContext<S, A>) {
        for key in &self.order {
            if let Some(scene) = self.scenes.get_mut(key) {
                debug!("Starting scene {:?}", key);
                scene.on_enter(context);
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn keys(&self) -> &[S] {
        &self.order
    }

    pub fn is_registered(&self, key: S) -> bool {
        self.scenes.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    //--- Update Loop ------------------------------------------------------

    pub fn update(&mut self, context: &mut GlobalContext<S, A>) {
        for key in &self.order {
            if let Some(scene) = self.scenes.get_mut(key) {
                scene.update(context);
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
