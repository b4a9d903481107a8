use raft_runner_core::{
    collaborators::{KeyValueStore, SceneLoader},
    SceneIndex,
};

use crate::saved;

/// Transitions offered once a level is finished.
#[derive(Clone, Copy, Debug, Default)]
pub struct LevelEnd;

impl LevelEnd {
    /// Advances to the next scene, or back to the menu after the last one.
    ///
    /// The destination is saved as the resume point before loading it.
    pub fn continue_to_next(&self, store: &mut dyn KeyValueStore, scenes: &mut dyn SceneLoader) {
        let next = scenes.current_scene_index().get().saturating_add(1);
        let destination = if next < scenes.scene_count() {
            SceneIndex::new(next)
        } else {
            SceneIndex::MENU
        };
        saved::save_last_scene_index(store, destination);
        scenes.load_scene(destination);
    }

    /// Reloads the current scene.
    pub fn restart_current(&self, scenes: &mut dyn SceneLoader) {
        let current = scenes.current_scene_index();
        scenes.load_scene(current);
    }
}

/// Main menu actions.
#[derive(Clone, Copy, Debug)]
pub struct MainMenu {
    first_level: SceneIndex,
}

impl MainMenu {
    /// Creates a menu whose new games start at `first_level`.
    #[must_use]
    pub const fn new(first_level: SceneIndex) -> Self {
        Self { first_level }
    }

    /// Scene a new game starts at.
    #[must_use]
    pub const fn first_level(&self) -> SceneIndex {
        self.first_level
    }

    /// Resumes at the saved scene, falling back to the first level.
    pub fn continue_game(&self, store: &dyn KeyValueStore, scenes: &mut dyn SceneLoader) {
        let destination = saved::saved_scene_index(store, scenes).unwrap_or(self.first_level);
        scenes.load_scene(destination);
    }

    /// Clears saved progress and starts from the first level.
    pub fn new_game(&self, store: &mut dyn KeyValueStore, scenes: &mut dyn SceneLoader) {
        saved::clear_progress(store);
        scenes.load_scene(self.first_level);
    }
}

impl Default for MainMenu {
    fn default() -> Self {
        Self::new(SceneIndex::new(1))
    }
}

/// Direct chapter selection from a menu.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChapterSelector;

impl ChapterSelector {
    /// Saves and loads the chapter at `build_index` if it exists.
    ///
    /// Out-of-range indices are logged and ignored. Returns whether a load was
    /// requested.
    pub fn load_level(
        &self,
        build_index: i32,
        store: &mut dyn KeyValueStore,
        scenes: &mut dyn SceneLoader,
    ) -> bool {
        let Some(index) = u32::try_from(build_index)
            .ok()
            .filter(|index| *index < scenes.scene_count())
        else {
            log::warn!("chapter build index {build_index} is out of range");
            return false;
        };
        let index = SceneIndex::new(index);
        saved::save_last_scene_index(store, index);
        scenes.load_scene(index);
        true
    }
}
