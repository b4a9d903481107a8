#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Raft Runner.
//!
//! The world owns the scroll speed, every obstacle instance together with the
//! pools that recycle them, and the raft's condition meter. It is mutated
//! exclusively through [`apply`] and observed through the [`query`] module.

mod condition;
mod obstacles;
mod speed;

use raft_runner_core::{
    half_lanes, BodyTag, Command, DespawnReason, Event, LaneIndex, TemplateId, Vec3,
    WELCOME_BANNER,
};

pub use condition::{ConditionConfig, ConditionMeter, Drain};
pub use obstacles::ObstacleTemplate;
pub use speed::{SpeedConfig, SpeedController};

use obstacles::ObstacleStore;

const DEFAULT_TEMPLATE_COUNT: u32 = 3;
const DEFAULT_POOL_PER_TEMPLATE: usize = 8;

/// Geometry of the track obstacles scroll along.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackConfig {
    /// Number of discrete lanes centred on the track axis.
    pub lanes: u32,
    /// Horizontal distance between adjacent lanes.
    pub lane_width: f32,
    /// Height of the water surface obstacles float on.
    pub lane_height: f32,
    /// Distance ahead of the raft at which obstacles appear.
    pub spawn_distance: f32,
    /// Depth behind the raft past which obstacles are recycled.
    pub kill_boundary: f32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            lanes: 5,
            lane_width: 2.0,
            lane_height: 0.5,
            spawn_distance: 60.0,
            kill_boundary: -20.0,
        }
    }
}

impl TrackConfig {
    /// Horizontal offset of the provided lane, after clamping it onto the track.
    #[must_use]
    pub fn lane_x(&self, lane: LaneIndex) -> f32 {
        lane.clamp_to(self.lanes).get() as f32 * self.lane_width
    }
}

/// Complete configuration of a world.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Track geometry.
    pub track: TrackConfig,
    /// Scroll speed tuning.
    pub speed: SpeedConfig,
    /// Condition meter tuning.
    pub condition: ConditionConfig,
    /// Obstacle templates available to spawners.
    pub templates: Vec<ObstacleTemplate>,
    /// Number of instances preallocated for every template.
    pub pool_per_template: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            track: TrackConfig::default(),
            speed: SpeedConfig::default(),
            condition: ConditionConfig::default(),
            templates: (0..DEFAULT_TEMPLATE_COUNT)
                .map(|id| ObstacleTemplate::new(TemplateId::new(id)))
                .collect(),
            pool_per_template: DEFAULT_POOL_PER_TEMPLATE,
        }
    }
}

/// Represents the authoritative Raft Runner world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    track: TrackConfig,
    speed: SpeedController,
    condition: ConditionMeter,
    obstacles: ObstacleStore,
    tick_index: u64,
}

impl World {
    /// Creates a new world, preallocating every template's pool.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        Self {
            banner: WELCOME_BANNER,
            track: config.track,
            speed: SpeedController::new(config.speed),
            condition: ConditionMeter::new(config.condition),
            obstacles: ObstacleStore::new(&config.templates, config.pool_per_template),
            tick_index: 0,
        }
    }

    fn spawn_position(&self, template: &ObstacleTemplate, lane: LaneIndex) -> Vec3 {
        Vec3::new(
            self.track.lane_x(lane),
            self.track.lane_height + template.height_offset,
            self.track.spawn_distance,
        )
    }

    fn publish_condition(&self, out_events: &mut Vec<Event>) {
        out_events.push(Event::ConditionChanged {
            current: self.condition.current(),
            normalized: self.condition.normalized(),
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt, unscaled_dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt, unscaled_dt });

            world.speed.tick(dt);
            let speed = world.speed.current();
            world.obstacles.advance(speed, dt, out_events);
            world.condition.regenerate(dt);
        }
        Command::SetRunning { running } => world.speed.set_running(running),
        Command::ForceSpeed { speed } => world.speed.force(speed),
        Command::ApplySlowdown { slowdown } => {
            let (from, to) = world.speed.apply_slowdown(slowdown);
            out_events.push(Event::SlowdownApplied { from, to });
        }
        Command::SpawnObstacle { template, lane } => {
            let Some(blueprint) = world.obstacles.template(template).copied() else {
                log::debug!("spawn ignored: unknown obstacle template {template:?}");
                return;
            };
            let Some((obstacle, reused)) = world.obstacles.acquire(template) else {
                return;
            };
            let position = world.spawn_position(&blueprint, lane);
            world
                .obstacles
                .activate(obstacle, position, world.track.kill_boundary);
            log::trace!("obstacle {obstacle:?} spawned at {position} (reused: {reused})");
            out_events.push(Event::ObstacleSpawned {
                obstacle,
                template,
                position,
                reused,
            });
        }
        Command::PlaceObstacle { template, position } => {
            let Some(obstacle) = world.obstacles.create_standalone(template) else {
                log::debug!("placement ignored: unknown obstacle template {template:?}");
                return;
            };
            world
                .obstacles
                .activate(obstacle, position, world.track.kill_boundary);
            out_events.push(Event::ObstacleSpawned {
                obstacle,
                template,
                position,
                reused: false,
            });
        }
        Command::ReportContact { obstacle, body } => {
            let Some(position) = world
                .obstacles
                .get(obstacle)
                .filter(|candidate| candidate.active)
                .map(|candidate| candidate.position)
            else {
                return;
            };
            if body.tag != BodyTag::Player {
                return;
            }
            if let Some(responder) = body.responder {
                out_events.push(Event::ObstacleStruck {
                    obstacle,
                    responder,
                    position,
                });
            }
            world
                .obstacles
                .despawn(obstacle, DespawnReason::Contact, out_events);
        }
        Command::DamageCondition { amount } => match world.condition.damage(amount) {
            Drain::Ignored => {}
            Drain::Drained => world.publish_condition(out_events),
            Drain::Depleted => {
                world.publish_condition(out_events);
                log::info!("raft condition depleted");
                out_events.push(Event::ConditionDepleted);
            }
        },
        Command::HealCondition { amount } => {
            if world.condition.heal(amount) {
                world.publish_condition(out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{half_lanes, ConditionMeter, ObstacleTemplate, SpeedController, TrackConfig, World};
    use raft_runner_core::{LaneIndex, ObstacleId, TemplateId, Vec3};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Scroll speed shared by every obstacle during the current tick.
    #[must_use]
    pub fn speed(world: &World) -> f32 {
        world.speed.current()
    }

    /// Provides read-only access to the speed controller.
    #[must_use]
    pub fn speed_controller(world: &World) -> &SpeedController {
        &world.speed
    }

    /// Provides read-only access to the condition meter.
    #[must_use]
    pub fn condition(world: &World) -> &ConditionMeter {
        &world.condition
    }

    /// Provides read-only access to the track geometry.
    #[must_use]
    pub fn track(world: &World) -> &TrackConfig {
        &world.track
    }

    /// Enumerates every lane of the track from left to right.
    #[must_use]
    pub fn lanes(world: &World) -> Vec<LaneIndex> {
        let half = half_lanes(world.track.lanes);
        (-half..=half).map(LaneIndex::new).collect()
    }

    /// Identifiers of every registered obstacle template in registration order.
    #[must_use]
    pub fn templates(world: &World) -> Vec<TemplateId> {
        world
            .obstacles
            .templates()
            .iter()
            .map(|template| template.id)
            .collect()
    }

    /// Looks up a registered obstacle template.
    #[must_use]
    pub fn template(world: &World, id: TemplateId) -> Option<&ObstacleTemplate> {
        world.obstacles.template(id)
    }

    /// Total number of obstacle instances ever created, active or pooled.
    #[must_use]
    pub fn instance_count(world: &World) -> usize {
        world.obstacles.len()
    }

    /// Number of inactive instances waiting in the template's pool.
    #[must_use]
    pub fn idle_in_pool(world: &World, template: TemplateId) -> usize {
        world.obstacles.idle_in_pool(template)
    }

    /// Captures a read-only view of the obstacles currently on the track.
    #[must_use]
    pub fn obstacle_view(world: &World) -> ObstacleView {
        let snapshots = world
            .obstacles
            .iter()
            .filter(|obstacle| obstacle.active)
            .map(|obstacle| ObstacleSnapshot {
                id: obstacle.id,
                template: obstacle.template,
                position: obstacle.position,
                pooled: obstacle.home.is_some(),
            })
            .collect();
        ObstacleView { snapshots }
    }

    /// Read-only snapshot describing all active obstacles.
    #[derive(Clone, Debug, Default)]
    pub struct ObstacleView {
        snapshots: Vec<ObstacleSnapshot>,
    }

    impl ObstacleView {
        /// Iterator over the captured snapshots ordered by identifier.
        pub fn iter(&self) -> impl Iterator<Item = &ObstacleSnapshot> {
            self.snapshots.iter()
        }

        /// Number of active obstacles captured by the view.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Whether the track is clear.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }
    }

    /// Immutable representation of a single active obstacle.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ObstacleSnapshot {
        /// Identifier of the obstacle.
        pub id: ObstacleId,
        /// Template the obstacle was created from.
        pub template: TemplateId,
        /// Current world position.
        pub position: Vec3,
        /// Whether the obstacle returns to a pool on despawn.
        pub pooled: bool,
    }
}
