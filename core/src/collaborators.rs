//! Engine services the simulation calls into.
//!
//! Every call is synchronous and fire-and-forget. Callers hold collaborators
//! as `Option<&mut dyn Trait>` and skip the call when the service is absent.

use std::collections::HashMap;

use crate::SceneIndex;

/// Animation layer of a character rig.
pub trait Animation {
    /// Fires a trigger parameter.
    fn set_trigger(&mut self, name: &str);

    /// Sets a boolean parameter.
    fn set_bool(&mut self, name: &str, value: bool);

    /// Sets a float parameter.
    fn set_float(&mut self, name: &str, value: f32);
}

/// Integer key-value store that survives process restarts.
pub trait KeyValueStore {
    /// Stores `value` under `key`.
    fn set_int(&mut self, key: &str, value: i32);

    /// Reads the value under `key`, or `default` when missing.
    fn get_int(&self, key: &str, default: i32) -> i32;

    /// Reports whether `key` holds a value.
    fn has_key(&self, key: &str) -> bool;

    /// Removes `key` from the store.
    fn delete_key(&mut self, key: &str);

    /// Flushes pending writes to durable storage.
    fn save(&mut self);
}

/// Scene loader owned by the host engine.
pub trait SceneLoader {
    /// Requests a transition to the scene with the provided build index.
    fn load_scene(&mut self, index: SceneIndex);

    /// Build index of the scene currently loaded.
    fn current_scene_index(&self) -> SceneIndex;

    /// Number of scenes available in the build.
    fn scene_count(&self) -> u32;
}

/// Value held by a narrative variable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Variable {
    /// Integer counter.
    Int(i32),
    /// Boolean flag.
    Bool(bool),
    /// Fractional value.
    Float(f32),
}

impl Variable {
    /// Interprets the variable as an integer the way dialogue scripts do.
    #[must_use]
    pub fn as_int(&self) -> i32 {
        match *self {
            Self::Int(value) => value,
            Self::Bool(value) => i32::from(value),
            Self::Float(value) => value as i32,
        }
    }
}

/// Variable table shared with the dialogue runtime.
pub trait NarrativeStore {
    /// Assigns `value` to the variable `name`.
    fn set_variable(&mut self, name: &str, value: Variable);

    /// Reads the variable `name`, if it was ever assigned.
    fn get_variable(&self, name: &str) -> Option<Variable>;
}

/// Camera shake service.
pub trait CameraShake {
    /// Adds shake with an intensity in `0..=1`.
    fn shake(&mut self, intensity: f32);
}

/// One-shot audio cue.
pub trait AudioCue {
    /// Plays the cue.
    fn play(&mut self);
}

/// Reads an integer variable, treating a missing variable as zero.
#[must_use]
pub fn int_variable(store: &dyn NarrativeStore, name: &str) -> i32 {
    store.get_variable(name).map_or(0, |value| value.as_int())
}

/// Key-value store kept entirely in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, i32>,
    saves: usize,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times [`KeyValueStore::save`] was called.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl KeyValueStore for MemoryStore {
    fn set_int(&mut self, key: &str, value: i32) {
        let _ = self.values.insert(key.to_owned(), value);
    }

    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn delete_key(&mut self, key: &str) {
        let _ = self.values.remove(key);
    }

    fn save(&mut self) {
        self.saves += 1;
    }
}

/// Narrative variable table kept entirely in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryNarrative {
    variables: HashMap<String, Variable>,
}

impl MemoryNarrative {
    /// Creates an empty variable table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl NarrativeStore for MemoryNarrative {
    fn set_variable(&mut self, name: &str, value: Variable) {
        let _ = self.variables.insert(name.to_owned(), value);
    }

    fn get_variable(&self, name: &str) -> Option<Variable> {
        self.variables.get(name).copied()
    }
}
