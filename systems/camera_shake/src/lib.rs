#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Trauma-based camera shake.
//!
//! Hits add trauma in `0..=1`; trauma decays linearly and the offsets applied
//! to the camera scale with its square so small knocks stay subtle. Offsets are
//! sampled from smooth noise, one noise row per axis.

use std::time::Duration;

use glam::Vec3;
use raft_runner_core::collaborators::CameraShake;

/// Tuning for the shaker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Noise samples per second.
    pub frequency: f32,
    /// Largest positional offset, in metres, at full trauma.
    pub position_amplitude: f32,
    /// Largest rotational offset, in degrees, at full trauma.
    pub rotation_amplitude: f32,
    /// Trauma removed per second.
    pub trauma_decay: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frequency: 28.0,
            position_amplitude: 0.05,
            rotation_amplitude: 0.8,
            trauma_decay: 2.5,
        }
    }
}

/// Offset to add on top of the camera's rest pose.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ShakeOffset {
    /// Local position offset.
    pub position: Vec3,
    /// Local Euler rotation offset in degrees.
    pub rotation_degrees: Vec3,
}

impl ShakeOffset {
    /// The rest pose.
    pub const ZERO: Self = Self {
        position: Vec3::ZERO,
        rotation_degrees: Vec3::ZERO,
    };
}

/// Camera shaker fed by gameplay hits.
#[derive(Clone, Debug, Default)]
pub struct CameraShaker {
    config: Config,
    trauma: f32,
    time: f32,
}

impl CameraShaker {
    /// Creates a shaker at rest.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            trauma: 0.0,
            time: 0.0,
        }
    }

    /// Current trauma in `0..=1`.
    #[must_use]
    pub fn trauma(&self) -> f32 {
        self.trauma
    }

    /// Drops all trauma, returning the camera to rest.
    pub fn reset(&mut self) {
        self.trauma = 0.0;
    }

    /// Advances the shake clock and returns the offset for this frame.
    pub fn advance(&mut self, dt: Duration) -> ShakeOffset {
        let seconds = dt.as_secs_f32();
        self.time += seconds;
        if self.trauma <= 0.0 {
            return ShakeOffset::ZERO;
        }

        let strength = self.trauma * self.trauma;
        let t = self.time * self.config.frequency;
        let (nx, ny, nz) = (signed_noise(t, 0.0), signed_noise(0.0, t), signed_noise(t, t));
        // The camera never shakes along its view axis; rotation reuses the
        // lateral samples with pitch and yaw swapped.
        let position = Vec3::new(nx, ny, 0.0) * (self.config.position_amplitude * strength);
        let rotation = Vec3::new(ny, nx, nz) * (self.config.rotation_amplitude * strength);

        self.trauma = (self.trauma - self.config.trauma_decay * seconds).max(0.0);
        ShakeOffset {
            position,
            rotation_degrees: rotation,
        }
    }
}

impl CameraShake for CameraShaker {
    fn shake(&mut self, intensity: f32) {
        self.trauma = (self.trauma + intensity).clamp(0.0, 1.0);
    }
}

fn signed_noise(x: f32, y: f32) -> f32 {
    value_noise(x, y) * 2.0 - 1.0
}

/// Smooth 2D value noise in `0..=1`.
fn value_noise(x: f32, y: f32) -> f32 {
    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (smoothstep(x - x0), smoothstep(y - y0));
    let (ix, iy) = (x0 as i32, y0 as i32);

    let top = lerp(lattice(ix, iy), lattice(ix + 1, iy), fx);
    let bottom = lerp(lattice(ix, iy + 1), lattice(ix + 1, iy + 1), fx);
    lerp(top, bottom, fy)
}

fn lattice(x: i32, y: i32) -> f32 {
    let mut hash = (x as u32).wrapping_mul(0x27d4_eb2d) ^ (y as u32).wrapping_mul(0x1656_67b1);
    hash ^= hash >> 15;
    hash = hash.wrapping_mul(0x85eb_ca6b);
    hash ^= hash >> 13;
    (hash & 0x00ff_ffff) as f32 / 16_777_215.0
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
