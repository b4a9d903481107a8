#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting obstacle spawn commands.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use raft_runner_core::{Command, Event, LaneIndex, TemplateId};

const DEFAULT_SPAWN_INTERVAL: Duration = Duration::from_millis(800);
const DEFAULT_SKIP_PROBABILITY: f64 = 0.25;
const DEFAULT_SEED: u64 = 0x5eed_4a17_0b57_ac1e;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    skip_probability: f64,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided cadence, gap chance and seed.
    #[must_use]
    pub const fn new(spawn_interval: Duration, skip_probability: f64, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            skip_probability,
            rng_seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_SPAWN_INTERVAL, DEFAULT_SKIP_PROBABILITY, DEFAULT_SEED)
    }
}

/// Pure system that periodically emits spawn commands for random lanes and templates.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Duration,
    skip_probability: f64,
    timer: Duration,
    rng: ChaCha8Rng,
    skipped: u64,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    ///
    /// The timer starts expired, so the first tick attempts a spawn.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let skip_probability = if config.skip_probability.is_nan() {
            0.0
        } else {
            config.skip_probability.clamp(0.0, 1.0)
        };
        Self {
            spawn_interval: config.spawn_interval,
            skip_probability,
            timer: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            skipped: 0,
        }
    }

    /// Number of spawn attempts discarded to widen gaps.
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Consumes events and immutable views to emit spawn commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        lanes: &[LaneIndex],
        templates: &[TemplateId],
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::TimeAdvanced { dt, .. } = event {
                self.tick(*dt, lanes, templates, out);
            }
        }
    }

    /// Counts the interval timer down and attempts a single spawn when it expires.
    pub fn tick(
        &mut self,
        dt: Duration,
        lanes: &[LaneIndex],
        templates: &[TemplateId],
        out: &mut Vec<Command>,
    ) {
        self.timer = self.timer.saturating_sub(dt);
        if !self.timer.is_zero() {
            return;
        }
        self.attempt_spawn(lanes, templates, out);
        self.timer = self.spawn_interval;
    }

    fn attempt_spawn(
        &mut self,
        lanes: &[LaneIndex],
        templates: &[TemplateId],
        out: &mut Vec<Command>,
    ) {
        if lanes.is_empty() || templates.is_empty() {
            return;
        }

        let lane = lanes[self.rng.gen_range(0..lanes.len())];
        let template = templates[self.rng.gen_range(0..templates.len())];

        if self.rng.gen_bool(self.skip_probability) {
            self.skipped += 1;
            log::trace!("spawn skipped to widen the gap");
            return;
        }

        out.push(Command::SpawnObstacle { template, lane });
    }
}
