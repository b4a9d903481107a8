//! Raft durability meter.

use std::time::Duration;

/// Tuning for the condition meter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConditionConfig {
    /// Upper bound of the meter.
    pub max: f32,
    /// Value at the start of a session, clamped into `0..=max`.
    pub start: f32,
    /// Passive regeneration per second. Zero disables regeneration.
    pub regen_per_second: f32,
}

impl Default for ConditionConfig {
    fn default() -> Self {
        Self {
            max: 100.0,
            start: 100.0,
            regen_per_second: 0.0,
        }
    }
}

/// Result of draining the meter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Drain {
    /// The meter was already empty.
    Ignored,
    /// The meter was drained but still holds condition.
    Drained,
    /// The meter crossed into zero during this drain.
    Depleted,
}

/// Bounded accumulator tracking how much punishment the raft can take.
#[derive(Clone, Debug)]
pub struct ConditionMeter {
    current: f32,
    max: f32,
    regen_per_second: f32,
}

impl ConditionMeter {
    /// Creates a meter from the provided tuning.
    #[must_use]
    pub fn new(config: ConditionConfig) -> Self {
        let max = config.max.max(0.0);
        Self {
            current: config.start.clamp(0.0, max),
            max,
            regen_per_second: config.regen_per_second.max(0.0),
        }
    }

    /// Current condition.
    #[must_use]
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Upper bound of the meter.
    #[must_use]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Condition as a fraction of the maximum. Maxima below one count as one.
    #[must_use]
    pub fn normalized(&self) -> f32 {
        self.current / self.max.max(1.0)
    }

    /// Whether the meter is empty.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Drains `|amount|`, clamping at zero.
    pub fn damage(&mut self, amount: f32) -> Drain {
        if self.is_depleted() {
            return Drain::Ignored;
        }
        self.current = (self.current - amount.abs()).max(0.0);
        if self.is_depleted() {
            Drain::Depleted
        } else {
            Drain::Drained
        }
    }

    /// Restores `|amount|`, clamping at the maximum.
    ///
    /// An empty meter stays empty; healing never revives a depleted raft.
    pub fn heal(&mut self, amount: f32) -> bool {
        if self.is_depleted() {
            return false;
        }
        self.current = (self.current + amount.abs()).min(self.max);
        true
    }

    /// Applies passive regeneration while the meter is neither empty nor full.
    pub fn regenerate(&mut self, dt: Duration) {
        if self.regen_per_second > 0.0 && self.current > 0.0 && self.current < self.max {
            self.current = (self.current + self.regen_per_second * dt.as_secs_f32()).min(self.max);
        }
    }
}
