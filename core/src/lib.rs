#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Raft Runner engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams and respond with
//! new command batches or drive the engine through the [`collaborators`]
//! traits.

pub mod collaborators;
mod deferred;

use std::time::Duration;

pub use deferred::Deferred;
pub use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "All aboard the raft.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock.
    Tick {
        /// Scaled time that elapsed since the previous tick.
        dt: Duration,
        /// Wall-clock time that elapsed since the previous tick, unaffected by pausing.
        unscaled_dt: Duration,
    },
    /// Enables or disables the ramp toward cruise speed.
    SetRunning {
        /// Whether the speed controller should keep ramping.
        running: bool,
    },
    /// Instantly overrides the scroll speed, cancelling any slowdown in flight.
    ForceSpeed {
        /// Requested scroll speed; negative values clamp to zero.
        speed: f32,
    },
    /// Requests a temporary slowdown followed by a recovery to the pre-hit speed.
    ApplySlowdown {
        /// Parameters describing the slowdown.
        slowdown: Slowdown,
    },
    /// Requests that an obstacle be drawn from the pool of a template and activated.
    SpawnObstacle {
        /// Template the obstacle is created from.
        template: TemplateId,
        /// Lane the obstacle occupies. Out-of-range lanes are clamped.
        lane: LaneIndex,
    },
    /// Places an obstacle outside of any pool at an explicit position.
    PlaceObstacle {
        /// Template the obstacle is created from.
        template: TemplateId,
        /// World position of the obstacle.
        position: Vec3,
    },
    /// Reports that the physics layer detected a body touching an obstacle.
    ReportContact {
        /// Obstacle that was touched.
        obstacle: ObstacleId,
        /// Body that touched the obstacle.
        body: ContactBody,
    },
    /// Drains the condition meter.
    DamageCondition {
        /// Amount to drain. The sign is ignored.
        amount: f32,
    },
    /// Restores the condition meter.
    HealCondition {
        /// Amount to restore. The sign is ignored.
        amount: f32,
    },
}

impl Command {
    /// Builds a tick whose scaled and unscaled durations are identical.
    #[must_use]
    pub const fn tick(dt: Duration) -> Self {
        Self::Tick {
            dt,
            unscaled_dt: dt,
        }
    }
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Scaled time that elapsed in the tick.
        dt: Duration,
        /// Unscaled time that elapsed in the tick.
        unscaled_dt: Duration,
    },
    /// Confirms that an obstacle became active on the track.
    ObstacleSpawned {
        /// Identifier of the activated obstacle.
        obstacle: ObstacleId,
        /// Template the obstacle belongs to.
        template: TemplateId,
        /// Position the obstacle was placed at.
        position: Vec3,
        /// Whether an inactive instance was reused instead of created.
        reused: bool,
    },
    /// Confirms that an obstacle left the track.
    ObstacleDespawned {
        /// Identifier of the deactivated obstacle.
        obstacle: ObstacleId,
        /// Template the obstacle belongs to.
        template: TemplateId,
        /// Why the obstacle was removed.
        reason: DespawnReason,
    },
    /// Reports that an obstacle struck a body carrying a hit responder.
    ObstacleStruck {
        /// Obstacle that struck the body.
        obstacle: ObstacleId,
        /// Responder attached to the struck body.
        responder: ResponderId,
        /// Position of the obstacle at the time of contact.
        position: Vec3,
    },
    /// Confirms that a slowdown was applied to the scroll speed.
    SlowdownApplied {
        /// Speed before the slowdown.
        from: f32,
        /// Speed right after the slowdown.
        to: f32,
    },
    /// Reports a damage or heal that changed the condition meter.
    ConditionChanged {
        /// Absolute condition after the change.
        current: f32,
        /// Condition expressed as a fraction of the maximum.
        normalized: f32,
    },
    /// Announces that the condition meter reached zero.
    ConditionDepleted,
}

/// Reasons an obstacle may leave the track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DespawnReason {
    /// The obstacle scrolled past its kill boundary.
    PassedKillBoundary,
    /// The obstacle touched the player.
    Contact,
}

/// Parameters of a temporary slowdown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slowdown {
    /// Multiplier applied to the current speed, clamped to `0..=1`.
    pub factor: f32,
    /// Minimum speed the slowdown may produce.
    pub floor: f32,
    /// Time spent easing back to the pre-slowdown speed. Zero pins the slowed speed.
    pub recover: Duration,
}

impl Slowdown {
    /// Creates a new slowdown description.
    #[must_use]
    pub const fn new(factor: f32, floor: f32, recover: Duration) -> Self {
        Self {
            factor,
            floor,
            recover,
        }
    }
}

impl Default for Slowdown {
    fn default() -> Self {
        Self::new(0.7, 4.0, Duration::from_secs(1))
    }
}

/// Category assigned to physics bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyTag {
    /// The raft carrying the player.
    Player,
    /// Any other body.
    Other,
}

/// Body that touched an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContactBody {
    /// Category of the body.
    pub tag: BodyTag,
    /// Hit responder found on the body or one of its ancestors.
    pub responder: Option<ResponderId>,
}

impl ContactBody {
    /// Describes a player body carrying the provided responder.
    #[must_use]
    pub const fn player(responder: ResponderId) -> Self {
        Self {
            tag: BodyTag::Player,
            responder: Some(responder),
        }
    }
}

/// Identifier of an obstacle template.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TemplateId(u32);

impl TemplateId {
    /// Creates a new template identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an obstacle instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(u32);

impl ObstacleId {
    /// Creates a new obstacle identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a hit responder attached to a body.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ResponderId(u32);

impl ResponderId {
    /// Creates a new responder identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Signed lane index centred on zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LaneIndex(i32);

impl LaneIndex {
    /// The centre lane.
    pub const CENTER: Self = Self(0);

    /// Creates a new lane index.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the signed lane offset.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Clamps the lane into the range covered by `lanes` lanes.
    ///
    /// With `lanes` lanes the valid indices are `-half..=half` where
    /// `half = (lanes - 1) / 2`. Zero lanes collapse onto the centre lane.
    #[must_use]
    pub fn clamp_to(self, lanes: u32) -> Self {
        let half = half_lanes(lanes);
        Self(self.0.clamp(-half, half))
    }
}

/// Number of lanes on either side of the centre lane.
#[must_use]
pub fn half_lanes(lanes: u32) -> i32 {
    let half = lanes.saturating_sub(1) / 2;
    i32::try_from(half).unwrap_or(i32::MAX)
}

/// Build index of a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SceneIndex(u32);

impl SceneIndex {
    /// The main menu scene.
    pub const MENU: Self = Self(0);

    /// Creates a new scene index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric build index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}
