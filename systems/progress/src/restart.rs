use std::time::Duration;

use raft_runner_core::{collaborators::SceneLoader, Deferred, Event};

/// Reloads the current scene once the raft's condition is depleted.
///
/// Delays run on unscaled time so pausing the simulation does not hold the
/// restart back. Scheduling a new restart replaces the one in flight.
#[derive(Clone, Debug)]
pub struct RestartOnDeplete {
    default_delay: Duration,
    on_depleted: Option<Duration>,
    pending: Deferred<()>,
}

impl RestartOnDeplete {
    /// Creates a restarter that waits `default_delay` after depletion.
    #[must_use]
    pub const fn new(default_delay: Duration) -> Self {
        Self {
            default_delay,
            on_depleted: Some(default_delay),
            pending: Deferred::new(),
        }
    }

    /// Creates a restarter that reloads immediately on depletion.
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            default_delay: Duration::ZERO,
            on_depleted: None,
            pending: Deferred::new(),
        }
    }

    /// Whether a delayed restart is waiting to fire.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_pending()
    }

    /// Consumes world events, reacting to depletion and advancing the delay.
    ///
    /// Returns whether a reload was requested during this call.
    pub fn handle(&mut self, events: &[Event], scenes: &mut dyn SceneLoader) -> bool {
        let mut restarted = false;
        for event in events {
            match event {
                Event::ConditionDepleted => {
                    restarted |= match self.on_depleted {
                        Some(delay) => self.restart_after(delay, scenes),
                        None => {
                            self.restart_now(scenes);
                            true
                        }
                    };
                }
                Event::TimeAdvanced { unscaled_dt, .. } => {
                    if self.pending.advance(*unscaled_dt).is_some() {
                        self.restart_now(scenes);
                        restarted = true;
                    }
                }
                _ => {}
            }
        }
        restarted
    }

    /// Reloads the current scene right away, dropping any pending restart.
    pub fn restart_now(&mut self, scenes: &mut dyn SceneLoader) {
        let _ = self.pending.cancel();
        let current = scenes.current_scene_index();
        log::info!("restarting scene {}", current.get());
        scenes.load_scene(current);
    }

    /// Reloads the current scene after `delay`. A zero delay reloads immediately.
    ///
    /// Returns whether the reload already happened.
    pub fn restart_after(&mut self, delay: Duration, scenes: &mut dyn SceneLoader) -> bool {
        if delay.is_zero() {
            self.restart_now(scenes);
            return true;
        }
        if self.pending.schedule(delay, ()).is_some() {
            log::debug!("pending restart superseded");
        }
        false
    }

    /// Reloads the current scene after the configured default delay.
    pub fn restart_after_default_delay(&mut self, scenes: &mut dyn SceneLoader) -> bool {
        self.restart_after(self.default_delay, scenes)
    }

    /// Drops a pending restart.
    pub fn cancel(&mut self) {
        let _ = self.pending.cancel();
    }
}

impl Default for RestartOnDeplete {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
