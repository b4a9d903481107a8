#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bookkeeping shared with the dialogue runtime.
//!
//! Raft condition is mirrored into narrative variables so dialogue can react
//! to it, collectible shells count themselves into a variable, and HUD labels
//! format that count.

use std::time::Duration;

use raft_runner_core::{
    collaborators::{int_variable, Animation, NarrativeStore, Variable},
    Deferred, Event,
};

/// Variable holding the raft condition as a rounded percentage.
pub const CONDITION_PERCENT_VARIABLE: &str = "RaftCondition";

/// Variable holding the raft condition as a fraction in `0..=1`.
pub const CONDITION_FRACTION_VARIABLE: &str = "RaftConditionFloat";

/// Mirrors condition changes into the narrative store.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConditionBroadcast;

impl ConditionBroadcast {
    /// Publishes the latest condition found in `events`.
    pub fn handle(&self, events: &[Event], store: &mut dyn NarrativeStore) {
        let latest = events.iter().rev().find_map(|event| match event {
            Event::ConditionChanged { normalized, .. } => Some(*normalized),
            _ => None,
        });
        if let Some(normalized) = latest {
            self.publish(normalized, store);
        }
    }

    /// Writes `normalized` condition to both variables.
    pub fn publish(&self, normalized: f32, store: &mut dyn NarrativeStore) {
        let normalized = normalized.clamp(0.0, 1.0);
        let percent = (normalized * 100.0).round() as i32;
        store.set_variable(CONDITION_PERCENT_VARIABLE, Variable::Int(percent));
        store.set_variable(CONDITION_FRACTION_VARIABLE, Variable::Float(normalized));
    }
}

/// Tuning for a collectible shell.
#[derive(Clone, Debug, PartialEq)]
pub struct PickupConfig {
    /// Animation trigger fired on pickup. Empty skips the animation.
    pub trigger: String,
    /// Counter variable incremented on pickup.
    pub variable: String,
    /// Amount added to the counter.
    pub increment_by: i32,
    /// Time between pickup and the shell disappearing.
    pub vanish_delay: Duration,
    /// Whether the visual is hidden at pickup rather than at vanish time.
    pub hide_immediately: bool,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            trigger: "Pickup".to_owned(),
            variable: "ShellsCollected".to_owned(),
            increment_by: 1,
            vanish_delay: Duration::from_millis(750),
            hide_immediately: false,
        }
    }
}

/// A shell that can be collected exactly once.
#[derive(Clone, Debug)]
pub struct ShellPickup {
    config: PickupConfig,
    used: bool,
    visible: bool,
    vanished: bool,
    vanish: Deferred<()>,
}

impl ShellPickup {
    /// Creates an uncollected, visible shell.
    #[must_use]
    pub fn new(config: PickupConfig) -> Self {
        Self {
            config,
            used: false,
            visible: true,
            vanished: false,
            vanish: Deferred::new(),
        }
    }

    /// Whether the shell still accepts interaction.
    #[must_use]
    pub fn is_collectable(&self) -> bool {
        !self.used
    }

    /// Whether the shell is drawn.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the shell has left the scene.
    #[must_use]
    pub fn has_vanished(&self) -> bool {
        self.vanished
    }

    /// Collects the shell. Returns `false` when it was already collected.
    pub fn use_pickup(
        &mut self,
        animator: Option<&mut dyn Animation>,
        narrative: Option<&mut dyn NarrativeStore>,
    ) -> bool {
        if self.used {
            return false;
        }
        self.used = true;

        if !self.config.trigger.is_empty() {
            if let Some(animator) = animator {
                animator.set_trigger(&self.config.trigger);
            }
        }
        match narrative {
            Some(narrative) if !self.config.variable.is_empty() => {
                let count = int_variable(narrative, &self.config.variable)
                    .saturating_add(self.config.increment_by);
                narrative.set_variable(&self.config.variable, Variable::Int(count));
                log::debug!("{} is now {count}", self.config.variable);
            }
            _ => {}
        }

        if self.config.hide_immediately {
            self.visible = false;
        }
        let _ = self.vanish.schedule(self.config.vanish_delay, ());
        true
    }

    /// Advances the vanish timer. Returns `true` on the frame the shell vanishes.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.vanish.advance(dt).is_none() {
            return false;
        }
        self.visible = false;
        self.vanished = true;
        true
    }
}

impl Default for ShellPickup {
    fn default() -> Self {
        Self::new(PickupConfig::default())
    }
}

/// HUD label showing a narrative counter.
#[derive(Clone, Debug, PartialEq)]
pub struct ShellCounter {
    variable: String,
    format: String,
}

impl ShellCounter {
    /// Creates a label that substitutes `{0}` in `format` with `variable`'s value.
    #[must_use]
    pub fn new(variable: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            format: format.into(),
        }
    }

    /// Renders the label from the current counter value.
    #[must_use]
    pub fn label(&self, narrative: &dyn NarrativeStore) -> String {
        let count = int_variable(narrative, &self.variable);
        self.format.replace("{0}", &count.to_string())
    }
}

impl Default for ShellCounter {
    fn default() -> Self {
        Self::new("ShellsCollected", "{0}")
    }
}
