//! Global scroll speed shared by every obstacle on the track.

use std::time::Duration;

use raft_runner_core::Slowdown;

/// Tuning for the scroll speed ramp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedConfig {
    /// Speed at the start of a session.
    pub start: f32,
    /// Cruise speed the ramp converges to.
    pub cruise: f32,
    /// Maximum change of speed per second while ramping.
    pub ramp_per_second: f32,
    /// Whether the ramp is active at the start of a session.
    pub running: bool,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            start: 8.0,
            cruise: 18.0,
            ramp_per_second: 0.5,
            running: true,
        }
    }
}

/// Owns the scroll speed and any slowdown currently overriding the ramp.
#[derive(Clone, Debug)]
pub struct SpeedController {
    current: f32,
    cruise: f32,
    ramp_per_second: f32,
    running: bool,
    recovery: Recovery,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Recovery {
    Idle,
    Easing {
        slowed: f32,
        restored: f32,
        elapsed: Duration,
        duration: Duration,
    },
    Pinned,
}

impl SpeedController {
    /// Creates a controller from the provided tuning.
    #[must_use]
    pub fn new(config: SpeedConfig) -> Self {
        Self {
            current: config.start.max(0.0),
            cruise: config.cruise.max(0.0),
            ramp_per_second: config.ramp_per_second.abs(),
            running: config.running,
            recovery: Recovery::Idle,
        }
    }

    /// Current scroll speed.
    #[must_use]
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Cruise speed targeted by the ramp.
    #[must_use]
    pub fn cruise(&self) -> f32 {
        self.cruise
    }

    /// Whether the ramp toward cruise speed is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a slowdown currently overrides the ramp.
    #[must_use]
    pub fn is_recovering(&self) -> bool {
        self.recovery != Recovery::Idle
    }

    /// Advances the ramp, or the recovery of an in-flight slowdown.
    pub fn tick(&mut self, dt: Duration) {
        match &mut self.recovery {
            Recovery::Idle => {
                if self.running {
                    let max_delta = self.ramp_per_second * dt.as_secs_f32();
                    self.current = move_towards(self.current, self.cruise, max_delta);
                }
            }
            Recovery::Easing {
                slowed,
                restored,
                elapsed,
                duration,
            } => {
                *elapsed = elapsed.saturating_add(dt);
                if *elapsed >= *duration {
                    self.current = *restored;
                    self.recovery = Recovery::Idle;
                } else {
                    let t = elapsed.as_secs_f32() / duration.as_secs_f32();
                    self.current = lerp(*slowed, *restored, t);
                }
            }
            Recovery::Pinned => {}
        }
    }

    /// Drops the speed immediately and eases back to the pre-slowdown value.
    ///
    /// Supersedes any slowdown already in flight. Returns the speeds before and
    /// after the drop.
    pub fn apply_slowdown(&mut self, slowdown: Slowdown) -> (f32, f32) {
        let before = self.current;
        let after = (before * slowdown.factor.clamp(0.0, 1.0))
            .max(slowdown.floor)
            .max(0.0);
        self.current = after;
        self.recovery = if slowdown.recover.is_zero() {
            Recovery::Pinned
        } else {
            Recovery::Easing {
                slowed: after,
                restored: before,
                elapsed: Duration::ZERO,
                duration: slowdown.recover,
            }
        };
        (before, after)
    }

    /// Sets the speed instantly and drops any slowdown override.
    pub fn force(&mut self, speed: f32) {
        self.current = speed.max(0.0);
        self.recovery = Recovery::Idle;
    }

    /// Enables or disables the ramp.
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }
}

fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}
