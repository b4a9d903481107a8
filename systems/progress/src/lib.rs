#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scene progression: saved progress, level transitions and restarts.
//!
//! Nothing here loads scenes itself. Every operation only asks the engine's
//! [`SceneLoader`](raft_runner_core::collaborators::SceneLoader) for a
//! transition and records the player's position in the persistent
//! [`KeyValueStore`](raft_runner_core::collaborators::KeyValueStore).

mod navigation;
mod restart;
pub mod saved;

pub use navigation::{ChapterSelector, LevelEnd, MainMenu};
pub use restart::RestartOnDeplete;
