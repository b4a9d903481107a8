//! Persistence of the scene the player resumes at.

use raft_runner_core::{
    collaborators::{KeyValueStore, SceneLoader},
    SceneIndex,
};

/// Store key holding the build index of the scene to resume at.
pub const LAST_SCENE_KEY: &str = "Raft_LastSceneIndex";

/// Records the scene the player should resume at and flushes the store.
pub fn save_last_scene_index(store: &mut dyn KeyValueStore, index: SceneIndex) {
    let value = i32::try_from(index.get()).unwrap_or(i32::MAX);
    store.set_int(LAST_SCENE_KEY, value);
    store.save();
    log::info!("saved last scene index {}", index.get());
}

/// Whether any progress was saved.
#[must_use]
pub fn has_saved_scene(store: &dyn KeyValueStore) -> bool {
    store.has_key(LAST_SCENE_KEY)
}

/// Saved scene, if present and still inside the build's scene range.
#[must_use]
pub fn saved_scene_index(store: &dyn KeyValueStore, scenes: &dyn SceneLoader) -> Option<SceneIndex> {
    if !has_saved_scene(store) {
        return None;
    }
    let index = u32::try_from(store.get_int(LAST_SCENE_KEY, -1)).ok()?;
    (index < scenes.scene_count()).then_some(SceneIndex::new(index))
}

/// Forgets saved progress, used when starting a new game.
pub fn clear_progress(store: &mut dyn KeyValueStore) {
    store.delete_key(LAST_SCENE_KEY);
    store.save();
    log::info!("cleared saved progress");
}
