#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decorative light behaviours along the river banks.
//!
//! Both behaviours draw from their own seeded generator so a replay with the
//! same seed reproduces the same light show.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Upper bound, in seconds, of the random spread added before a desynced
/// lamp's first change.
const MAX_DESYNC_SPREAD: f32 = 1.2;
const DESYNC_JITTER: f32 = 0.15;

/// Odds and cadence of the three-lamp stoplight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StoplightConfig {
    /// Time between pattern changes.
    pub interval: Duration,
    /// Probability that every lamp goes dark.
    pub chance_all_off: f64,
    /// Probability that every lamp lights up.
    pub chance_all_on: f64,
    /// Probability that exactly two lamps light up, rolled separately once
    /// neither the all-off nor the all-on pattern was picked.
    pub chance_two_on: f64,
}

impl Default for StoplightConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            chance_all_off: 0.02,
            chance_all_on: 0.10,
            chance_two_on: 0.35,
        }
    }
}

/// Three-lamp stoplight flashing random patterns.
#[derive(Clone, Debug)]
pub struct Stoplight {
    config: StoplightConfig,
    timer: Duration,
    lamps: [bool; 3],
    rng: ChaCha8Rng,
}

impl Stoplight {
    /// Creates a stoplight with every lamp off, waiting one interval before
    /// its first pattern.
    #[must_use]
    pub fn new(config: StoplightConfig, seed: u64) -> Self {
        Self {
            config,
            timer: config.interval,
            lamps: [false; 3],
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Current lamp states, top to bottom.
    #[must_use]
    pub fn lamps(&self) -> [bool; 3] {
        self.lamps
    }

    /// Advances the timer and returns the new pattern when one was picked.
    pub fn advance(&mut self, dt: Duration) -> Option<[bool; 3]> {
        self.timer = self.timer.saturating_sub(dt);
        if !self.timer.is_zero() {
            return None;
        }
        self.timer = self.config.interval;
        self.lamps = self.roll_pattern();
        Some(self.lamps)
    }

    fn roll_pattern(&mut self) -> [bool; 3] {
        let roll: f64 = self.rng.gen();
        let all_off = self.config.chance_all_off;
        let all_on = all_off + self.config.chance_all_on;

        if roll < all_off {
            [false; 3]
        } else if roll < all_on {
            [true; 3]
        } else if self.rng.gen::<f64>() < self.config.chance_two_on {
            let dark = self.rng.gen_range(0..3);
            let mut lamps = [true; 3];
            lamps[dark] = false;
            lamps
        } else {
            let lit = self.rng.gen_range(0..3);
            let mut lamps = [false; 3];
            lamps[lit] = true;
            lamps
        }
    }
}

/// How a flickering lamp varies its light.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FlickerMode {
    /// Switch the light on and off.
    Toggle,
    /// Fade the intensity between random targets.
    #[default]
    Intensity,
}

/// Tuning for a flickering lamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LampConfig {
    /// Flicker behaviour.
    pub mode: FlickerMode,
    /// Shortest wait between changes.
    pub min_interval: Duration,
    /// Longest wait between changes.
    pub max_interval: Duration,
    /// Probability the light is on after a toggle.
    pub on_chance: f64,
    /// Lowest intensity target.
    pub min_intensity: f32,
    /// Highest intensity target.
    pub max_intensity: f32,
    /// Fade length toward a new target. Zero snaps.
    pub fade: Duration,
    /// Adds a random delay before the first change so neighbouring lamps
    /// fall out of step.
    pub desync_start: bool,
    /// In toggle mode, flips a repeated state half of the time.
    pub avoid_repeats: bool,
}

impl Default for LampConfig {
    fn default() -> Self {
        Self {
            mode: FlickerMode::Intensity,
            min_interval: Duration::from_millis(50),
            max_interval: Duration::from_millis(350),
            on_chance: 0.7,
            min_intensity: 0.2,
            max_intensity: 1.2,
            fade: Duration::from_millis(80),
            desync_start: false,
            avoid_repeats: false,
        }
    }
}

impl LampConfig {
    /// Slow on/off street lamp that starts out of step with its neighbours
    /// and rarely repeats a state.
    #[must_use]
    pub fn street_lamp() -> Self {
        Self {
            mode: FlickerMode::Toggle,
            min_interval: Duration::from_millis(800),
            max_interval: Duration::from_secs(2),
            desync_start: true,
            avoid_repeats: true,
            ..Self::default()
        }
    }
}

/// Light output of a lamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LampState {
    /// Whether the light is switched on.
    pub enabled: bool,
    /// Light intensity.
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Waiting { remaining: Duration },
    Fading { from: f32, to: f32, elapsed: Duration },
}

/// Lamp that flickers at random intervals.
#[derive(Clone, Debug)]
pub struct LampFlicker {
    config: LampConfig,
    state: LampState,
    phase: Phase,
    rng: ChaCha8Rng,
}

impl LampFlicker {
    /// Creates a lit lamp at `intensity` that waits a random interval first.
    ///
    /// `on_chance` is clamped to `0..=1`; NaN counts as zero.
    #[must_use]
    pub fn new(mut config: LampConfig, intensity: f32, seed: u64) -> Self {
        config.on_chance = if config.on_chance.is_nan() {
            0.0
        } else {
            config.on_chance.clamp(0.0, 1.0)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut remaining = Duration::ZERO;
        if config.desync_start {
            let spread = config.max_interval.as_secs_f32().min(MAX_DESYNC_SPREAD);
            let jitter =
                sample_between(&mut rng, 0.0, spread) + rng.gen::<f32>() * DESYNC_JITTER;
            remaining = Duration::from_secs_f32(jitter.max(0.0));
        }
        remaining += random_wait(&config, &mut rng);
        Self {
            config,
            state: LampState {
                enabled: true,
                intensity,
            },
            phase: Phase::Waiting { remaining },
            rng,
        }
    }

    /// Current light output.
    #[must_use]
    pub fn state(&self) -> LampState {
        self.state
    }

    /// Advances the flicker and returns the light output for this frame.
    pub fn advance(&mut self, dt: Duration) -> LampState {
        match self.phase {
            Phase::Waiting { remaining } => {
                let remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    self.change();
                } else {
                    self.phase = Phase::Waiting { remaining };
                }
            }
            Phase::Fading { from, to, elapsed } => {
                let elapsed = elapsed.saturating_add(dt);
                if elapsed >= self.config.fade {
                    self.state.intensity = to;
                    self.wait();
                } else {
                    let t = elapsed.as_secs_f32() / self.config.fade.as_secs_f32();
                    self.state.intensity = from + (to - from) * t;
                    self.phase = Phase::Fading { from, to, elapsed };
                }
            }
        }
        self.state
    }

    fn change(&mut self) {
        match self.config.mode {
            FlickerMode::Toggle => {
                let mut enabled = self.rng.gen_bool(self.config.on_chance);
                let repeated = enabled == self.state.enabled;
                if self.config.avoid_repeats && repeated && self.rng.gen_bool(0.5) {
                    enabled = !enabled;
                }
                self.state.enabled = enabled;
                self.wait();
            }
            FlickerMode::Intensity => {
                let target = sample_between(
                    &mut self.rng,
                    self.config.min_intensity,
                    self.config.max_intensity,
                );
                if self.config.fade.is_zero() {
                    self.state.intensity = target;
                    self.wait();
                } else {
                    self.phase = Phase::Fading {
                        from: self.state.intensity,
                        to: target,
                        elapsed: Duration::ZERO,
                    };
                }
            }
        }
    }

    fn wait(&mut self) {
        self.phase = Phase::Waiting {
            remaining: random_wait(&self.config, &mut self.rng),
        };
    }
}

fn random_wait(config: &LampConfig, rng: &mut ChaCha8Rng) -> Duration {
    let seconds = sample_between(
        rng,
        config.min_interval.as_secs_f32(),
        config.max_interval.as_secs_f32(),
    );
    Duration::from_secs_f32(seconds.max(0.0))
}

fn sample_between(rng: &mut ChaCha8Rng, low: f32, high: f32) -> f32 {
    if low < high {
        rng.gen_range(low..=high)
    } else {
        low
    }
}
