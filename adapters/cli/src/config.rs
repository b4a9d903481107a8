//! Session tuning loaded from an optional TOML file.
//!
//! Every field is defaulted, so an empty file (or no file) reproduces the
//! built-in tuning and a file only needs to name what it changes.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use raft_runner_core::{ResponderId, Slowdown, TemplateId};
use raft_runner_system_hit_response as hit_response;
use raft_runner_system_progress::RestartOnDeplete;
use raft_runner_system_spawning as spawning;
use raft_runner_world::{ConditionConfig, ObstacleTemplate, SpeedConfig, TrackConfig, WorldConfig};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionConfig {
    pub(crate) track: TrackSection,
    pub(crate) speed: SpeedSection,
    pub(crate) condition: ConditionSection,
    pub(crate) spawner: SpawnerSection,
    pub(crate) hit: HitSection,
    pub(crate) restart: RestartSection,
    pub(crate) player: PlayerSection,
}

impl SessionConfig {
    /// Reads and parses the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub(crate) fn world(&self) -> WorldConfig {
        WorldConfig {
            track: TrackConfig {
                lanes: self.track.lanes,
                lane_width: self.track.lane_width,
                lane_height: self.track.lane_height,
                spawn_distance: self.track.spawn_distance,
                kill_boundary: self.track.kill_boundary,
            },
            speed: SpeedConfig {
                start: self.speed.start,
                cruise: self.speed.cruise,
                ramp_per_second: self.speed.ramp_per_second,
                running: true,
            },
            condition: ConditionConfig {
                max: self.condition.max,
                start: self.condition.start,
                regen_per_second: self.condition.regen_per_second,
            },
            templates: self
                .track
                .templates
                .iter()
                .map(TemplateSection::template)
                .collect(),
            pool_per_template: self.track.pool_per_template,
        }
    }

    pub(crate) fn spawning(&self, seed: u64) -> spawning::Config {
        spawning::Config::new(
            Duration::from_millis(self.spawner.interval_ms),
            self.spawner.skip_probability,
            seed,
        )
    }

    pub(crate) fn hit_response(&self) -> hit_response::Config {
        let slowdown = self.hit.slowdown.then(|| {
            Slowdown::new(
                self.hit.slowdown_factor,
                self.hit.slowdown_floor,
                Duration::from_millis(self.hit.recover_ms),
            )
        });
        hit_response::Config {
            responder: ResponderId::new(0),
            invulnerability: Duration::from_millis(self.hit.invulnerability_ms),
            shake_intensity: self.hit.shake_intensity,
            damage_per_hit: self.hit.damage,
            slowdown,
            ..hit_response::Config::default()
        }
    }

    pub(crate) fn restart(&self) -> RestartOnDeplete {
        if self.restart.immediate {
            RestartOnDeplete::immediate()
        } else {
            RestartOnDeplete::new(Duration::from_millis(self.restart.delay_ms))
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TrackSection {
    pub(crate) lanes: u32,
    pub(crate) lane_width: f32,
    pub(crate) lane_height: f32,
    pub(crate) spawn_distance: f32,
    pub(crate) kill_boundary: f32,
    pub(crate) pool_per_template: usize,
    pub(crate) templates: Vec<TemplateSection>,
}

impl Default for TrackSection {
    fn default() -> Self {
        let track = TrackConfig::default();
        let world = WorldConfig::default();
        Self {
            lanes: track.lanes,
            lane_width: track.lane_width,
            lane_height: track.lane_height,
            spawn_distance: track.spawn_distance,
            kill_boundary: track.kill_boundary,
            pool_per_template: world.pool_per_template,
            templates: world
                .templates
                .iter()
                .map(|template| TemplateSection {
                    id: template.id,
                    speed_multiplier: template.speed_multiplier,
                    height_offset: template.height_offset,
                })
                .collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct TemplateSection {
    pub(crate) id: TemplateId,
    #[serde(default = "unit_multiplier")]
    pub(crate) speed_multiplier: f32,
    #[serde(default)]
    pub(crate) height_offset: f32,
}

impl TemplateSection {
    fn template(&self) -> ObstacleTemplate {
        ObstacleTemplate {
            id: self.id,
            speed_multiplier: self.speed_multiplier,
            height_offset: self.height_offset,
        }
    }
}

fn unit_multiplier() -> f32 {
    1.0
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SpeedSection {
    pub(crate) start: f32,
    pub(crate) cruise: f32,
    pub(crate) ramp_per_second: f32,
}

impl Default for SpeedSection {
    fn default() -> Self {
        let speed = SpeedConfig::default();
        Self {
            start: speed.start,
            cruise: speed.cruise,
            ramp_per_second: speed.ramp_per_second,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ConditionSection {
    pub(crate) max: f32,
    pub(crate) start: f32,
    pub(crate) regen_per_second: f32,
}

impl Default for ConditionSection {
    fn default() -> Self {
        let condition = ConditionConfig::default();
        Self {
            max: condition.max,
            start: condition.start,
            regen_per_second: condition.regen_per_second,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SpawnerSection {
    pub(crate) interval_ms: u64,
    pub(crate) skip_probability: f64,
}

impl Default for SpawnerSection {
    fn default() -> Self {
        Self {
            interval_ms: 800,
            skip_probability: 0.25,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct HitSection {
    pub(crate) damage: f32,
    pub(crate) invulnerability_ms: u64,
    pub(crate) shake_intensity: f32,
    pub(crate) slowdown: bool,
    pub(crate) slowdown_factor: f32,
    pub(crate) slowdown_floor: f32,
    pub(crate) recover_ms: u64,
}

impl Default for HitSection {
    fn default() -> Self {
        let hit = hit_response::Config::default();
        let slowdown = Slowdown::default();
        Self {
            damage: hit.damage_per_hit,
            invulnerability_ms: millis(hit.invulnerability),
            shake_intensity: hit.shake_intensity,
            slowdown: hit.slowdown.is_some(),
            slowdown_factor: slowdown.factor,
            slowdown_floor: slowdown.floor,
            recover_ms: millis(slowdown.recover),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RestartSection {
    pub(crate) delay_ms: u64,
    pub(crate) immediate: bool,
}

impl Default for RestartSection {
    fn default() -> Self {
        Self {
            delay_ms: 1_000,
            immediate: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PlayerSection {
    /// Time between lane changes.
    pub(crate) lane_change_ms: u64,
    /// Depth of the raft's hull along the track.
    pub(crate) hull_depth: f32,
}

impl Default for PlayerSection {
    fn default() -> Self {
        Self {
            lane_change_ms: 1_500,
            hull_depth: 1.5,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
