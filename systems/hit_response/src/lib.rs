#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Hit response system that turns obstacle strikes into damage and slowdowns.
//!
//! Each responder belongs to one hit-receiving body. Accepted hits trigger
//! cosmetic feedback through the engine collaborators and emit commands that
//! drain the condition meter and slow the track down. Hits arriving during the
//! invulnerability window are ignored.

use std::time::Duration;

use raft_runner_core::{
    collaborators::{int_variable, Animation, AudioCue, CameraShake, NarrativeStore, Variable},
    Command, Event, ResponderId, Slowdown, Vec3,
};

/// Narrative variable counting accepted hits.
pub const HIT_COUNTER_VARIABLE: &str = "RaftHits";

/// Tuning for a single hit responder.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Responder whose strikes this system handles.
    pub responder: ResponderId,
    /// Trigger fired on every assigned animator. Empty disables the trigger.
    pub collide_trigger: String,
    /// Window after an accepted hit during which further hits are ignored.
    pub invulnerability: Duration,
    /// Camera shake intensity in `0..=1`.
    pub shake_intensity: f32,
    /// Condition drained per accepted hit.
    pub damage_per_hit: f32,
    /// Slowdown requested per accepted hit, if any.
    pub slowdown: Option<Slowdown>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            responder: ResponderId::new(0),
            collide_trigger: "Collide".to_owned(),
            invulnerability: Duration::from_millis(400),
            shake_intensity: 0.35,
            damage_per_hit: 12.0,
            slowdown: Some(Slowdown::default()),
        }
    }
}

/// Engine collaborators notified when a hit is accepted. Absent ones are skipped.
#[derive(Default)]
pub struct Feedback<'a> {
    /// Animators of the characters riding the raft.
    pub animators: Vec<&'a mut dyn Animation>,
    /// Camera shake service.
    pub camera: Option<&'a mut dyn CameraShake>,
    /// Impact sound.
    pub audio: Option<&'a mut dyn AudioCue>,
    /// Dialogue variable table.
    pub narrative: Option<&'a mut dyn NarrativeStore>,
}

/// Cooldown-gated reaction to obstacle strikes on one body.
#[derive(Clone, Debug)]
pub struct HitResponse {
    config: Config,
    cooldown: Duration,
    accepted: u32,
}

impl HitResponse {
    /// Creates a responder that is ready to accept a hit.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cooldown: Duration::ZERO,
            accepted: 0,
        }
    }

    /// Identifier of the responder.
    #[must_use]
    pub fn responder(&self) -> ResponderId {
        self.config.responder
    }

    /// Whether the next hit would be accepted.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cooldown.is_zero()
    }

    /// Number of hits accepted so far.
    #[must_use]
    pub fn accepted_hits(&self) -> u32 {
        self.accepted
    }

    /// Consumes world events, reacting to strikes aimed at this responder.
    pub fn handle(&mut self, events: &[Event], feedback: &mut Feedback<'_>, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt, .. } => self.tick(*dt),
                Event::ObstacleStruck {
                    responder,
                    position,
                    ..
                } if *responder == self.config.responder => {
                    let _ = self.on_hit(*position, feedback, out);
                }
                _ => {}
            }
        }
    }

    /// Counts the invulnerability window down.
    pub fn tick(&mut self, dt: Duration) {
        self.cooldown = self.cooldown.saturating_sub(dt);
    }

    /// Reacts to a strike at `position`. Returns whether the hit was accepted.
    pub fn on_hit(
        &mut self,
        position: Vec3,
        feedback: &mut Feedback<'_>,
        out: &mut Vec<Command>,
    ) -> bool {
        if !self.is_ready() {
            log::trace!("hit at {position} ignored during cooldown");
            return false;
        }
        self.cooldown = self.config.invulnerability;
        self.accepted = self.accepted.saturating_add(1);
        log::debug!("raft hit at {position}");

        if !self.config.collide_trigger.is_empty() {
            for animator in &mut feedback.animators {
                animator.set_trigger(&self.config.collide_trigger);
            }
        }
        if let Some(camera) = feedback.camera.as_deref_mut() {
            camera.shake(self.config.shake_intensity);
        }
        if let Some(audio) = feedback.audio.as_deref_mut() {
            audio.play();
        }

        out.push(Command::DamageCondition {
            amount: self.config.damage_per_hit,
        });
        if let Some(slowdown) = self.config.slowdown {
            out.push(Command::ApplySlowdown { slowdown });
        }

        if let Some(narrative) = feedback.narrative.as_deref_mut() {
            let hits = int_variable(narrative, HIT_COUNTER_VARIABLE);
            narrative.set_variable(HIT_COUNTER_VARIABLE, Variable::Int(hits.saturating_add(1)));
        }
        true
    }
}
