//! Headless play session driving the world and every gameplay system.

use std::{fmt, mem, time::Duration};

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use raft_runner_core::{
    collaborators::{
        int_variable, Animation, AudioCue, KeyValueStore, MemoryNarrative, SceneLoader,
    },
    Command, ContactBody, DespawnReason, Event, LaneIndex, SceneIndex,
};
use raft_runner_system_camera_shake::CameraShaker;
use raft_runner_system_hit_response::{Feedback, HitResponse, HIT_COUNTER_VARIABLE};
use raft_runner_system_narrative::ConditionBroadcast;
use raft_runner_system_progress::{LevelEnd, MainMenu, RestartOnDeplete};
use raft_runner_system_spawning::Spawning;
use raft_runner_world::{apply, query, World};

use crate::config::SessionConfig;

/// Menu plus two levels.
const SCENE_COUNT: u32 = 3;
const PLAYER_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Outcome of a session.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Summary {
    pub(crate) frames: u64,
    pub(crate) level: u32,
    pub(crate) next_scene: u32,
    pub(crate) spawned: u64,
    pub(crate) reused: u64,
    pub(crate) passed: u64,
    pub(crate) skipped: u64,
    pub(crate) hits: i32,
    pub(crate) restarts: u32,
    pub(crate) peak_trauma: f32,
    pub(crate) final_speed: f32,
    pub(crate) final_condition: f32,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "level played     {}", self.level)?;
        writeln!(f, "next scene       {}", self.next_scene)?;
        writeln!(f, "frames           {}", self.frames)?;
        writeln!(
            f,
            "obstacles        {} spawned, {} reused, {} passed, {} gaps",
            self.spawned, self.reused, self.passed, self.skipped
        )?;
        writeln!(f, "hits taken       {}", self.hits)?;
        writeln!(f, "restarts         {}", self.restarts)?;
        writeln!(f, "peak trauma      {:.2}", self.peak_trauma)?;
        writeln!(f, "final speed      {:.2}", self.final_speed)?;
        write!(f, "final condition  {:.1}", self.final_condition)
    }
}

/// Raft steered by switching lanes at a fixed cadence.
#[derive(Debug)]
struct PlayerRaft {
    lane: LaneIndex,
    change_every: Duration,
    timer: Duration,
    rng: ChaCha8Rng,
}

impl PlayerRaft {
    fn new(change_every: Duration, seed: u64) -> Self {
        Self {
            lane: LaneIndex::CENTER,
            change_every,
            timer: change_every,
            rng: ChaCha8Rng::seed_from_u64(seed ^ PLAYER_SEED_SALT),
        }
    }

    fn advance(&mut self, dt: Duration, lanes: &[LaneIndex]) {
        self.timer = self.timer.saturating_sub(dt);
        if !self.timer.is_zero() {
            return;
        }
        self.timer = self.change_every;
        if let Some(lane) = lanes.choose(&mut self.rng) {
            self.lane = *lane;
        }
    }
}

/// Scene loader that records reload requests for the session to act on.
#[derive(Debug)]
struct SessionScenes {
    current: SceneIndex,
    requested: Option<SceneIndex>,
}

impl SceneLoader for SessionScenes {
    fn load_scene(&mut self, index: SceneIndex) {
        log::info!("loading scene {}", index.get());
        self.current = index;
        self.requested = Some(index);
    }

    fn current_scene_index(&self) -> SceneIndex {
        self.current
    }

    fn scene_count(&self) -> u32 {
        SCENE_COUNT
    }
}

/// Rider on the raft whose animation triggers end up in the log.
#[derive(Debug)]
struct LoggedRider {
    name: &'static str,
}

impl Animation for LoggedRider {
    fn set_trigger(&mut self, name: &str) {
        log::trace!("{} animation trigger {name}", self.name);
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        log::trace!("{} animation {name} = {value}", self.name);
    }

    fn set_float(&mut self, name: &str, value: f32) {
        log::trace!("{} animation {name} = {value}", self.name);
    }
}

#[derive(Debug)]
struct SplashCue;

impl AudioCue for SplashCue {
    fn play(&mut self) {
        log::debug!("splash");
    }
}

/// Wires the world, systems and stand-in engine services together.
pub(crate) struct Session<'s> {
    config: SessionConfig,
    world: World,
    spawning: Spawning,
    hit: HitResponse,
    restart: RestartOnDeplete,
    broadcast: ConditionBroadcast,
    shaker: CameraShaker,
    player: PlayerRaft,
    scenes: SessionScenes,
    riders: [LoggedRider; 2],
    splash: SplashCue,
    narrative: MemoryNarrative,
    store: &'s mut dyn KeyValueStore,
    summary: Summary,
}

impl<'s> Session<'s> {
    pub(crate) fn new(config: SessionConfig, seed: u64, store: &'s mut dyn KeyValueStore) -> Self {
        let mut narrative = MemoryNarrative::new();
        let world = World::new(config.world());
        ConditionBroadcast.publish(query::condition(&world).normalized(), &mut narrative);
        Self {
            spawning: Spawning::new(config.spawning(seed)),
            hit: HitResponse::new(config.hit_response()),
            restart: config.restart(),
            broadcast: ConditionBroadcast,
            shaker: CameraShaker::default(),
            player: PlayerRaft::new(Duration::from_millis(config.player.lane_change_ms), seed),
            scenes: SessionScenes {
                current: SceneIndex::MENU,
                requested: None,
            },
            riders: [LoggedRider { name: "paddler" }, LoggedRider { name: "lookout" }],
            splash: SplashCue,
            narrative,
            store,
            summary: Summary::default(),
            world,
            config,
        }
    }

    /// Plays `frames` fixed steps of `dt` from the saved scene, then records
    /// the level as finished.
    pub(crate) fn run(mut self, frames: u64, dt: Duration) -> Summary {
        MainMenu::default().continue_game(&*self.store, &mut self.scenes);
        self.scenes.requested = None;
        self.summary.level = self.scenes.current.get();

        for _ in 0..frames {
            self.step(dt);
        }

        LevelEnd.continue_to_next(&mut *self.store, &mut self.scenes);
        self.summary.frames = frames;
        self.summary.next_scene = self.scenes.current.get();
        self.summary.skipped = self.spawning.skipped();
        self.summary.hits = int_variable(&self.narrative, HIT_COUNTER_VARIABLE);
        self.summary.final_speed = query::speed(&self.world);
        self.summary.final_condition = query::condition(&self.world).current();
        self.summary
    }

    fn step(&mut self, dt: Duration) {
        let mut batch = Vec::new();
        apply(&mut self.world, Command::tick(dt), &mut batch);

        let lanes = query::lanes(&self.world);
        let templates = query::templates(&self.world);
        self.player.advance(dt, &lanes);
        self.summary.peak_trauma = self.summary.peak_trauma.max(self.shaker.trauma());
        let offset = self.shaker.advance(dt);
        log::trace!("camera offset {} / {}", offset.position, offset.rotation_degrees);

        let mut commands = Vec::new();
        self.spawning.handle(&batch, &lanes, &templates, &mut commands);
        self.detect_contacts(&mut commands);

        loop {
            if self.observe(&batch, &mut commands) {
                return;
            }
            if commands.is_empty() {
                break;
            }
            batch.clear();
            for command in mem::take(&mut commands) {
                apply(&mut self.world, command, &mut batch);
            }
        }
    }

    fn detect_contacts(&self, out: &mut Vec<Command>) {
        let track = query::track(&self.world);
        let raft_x = track.lane_x(self.player.lane);
        let half_width = track.lane_width * 0.5;
        let half_depth = self.config.player.hull_depth * 0.5;
        let body = ContactBody::player(self.hit.responder());

        for obstacle in query::obstacle_view(&self.world).iter() {
            let beside = (obstacle.position.x - raft_x).abs() < half_width;
            let alongside = obstacle.position.z.abs() <= half_depth;
            if beside && alongside {
                out.push(Command::ReportContact {
                    obstacle: obstacle.id,
                    body,
                });
            }
        }
    }

    /// Feeds one event batch to the reacting systems. Returns `true` when the
    /// scene was reloaded and the rest of the frame must be dropped.
    fn observe(&mut self, events: &[Event], commands: &mut Vec<Command>) -> bool {
        for event in events {
            match event {
                Event::ObstacleSpawned { reused, .. } => {
                    self.summary.spawned += 1;
                    self.summary.reused += u64::from(*reused);
                }
                Event::ObstacleDespawned {
                    reason: DespawnReason::PassedKillBoundary,
                    ..
                } => self.summary.passed += 1,
                _ => {}
            }
        }

        let mut feedback = Feedback {
            animators: self
                .riders
                .iter_mut()
                .map(|rider| rider as &mut dyn Animation)
                .collect(),
            camera: Some(&mut self.shaker),
            audio: Some(&mut self.splash),
            narrative: Some(&mut self.narrative),
        };
        self.hit.handle(events, &mut feedback, commands);
        self.broadcast.handle(events, &mut self.narrative);

        let _ = self.restart.handle(events, &mut self.scenes);
        if self.scenes.requested.take().is_none() {
            return false;
        }
        self.reload();
        commands.clear();
        true
    }

    fn reload(&mut self) {
        self.world = World::new(self.config.world());
        self.hit = HitResponse::new(self.config.hit_response());
        self.shaker.reset();
        self.player.lane = LaneIndex::CENTER;
        self.broadcast
            .publish(query::condition(&self.world).normalized(), &mut self.narrative);
        self.summary.restarts += 1;
    }
}
