#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pump minigame used to inflate the raft.
//!
//! The player alternates a down stroke and an up stroke; every completed
//! down→up cycle adds progress. Once the raft is fully inflated the minigame
//! raises a narrative flag, reports completion and closes itself after a short
//! pause so the final pose stays visible.

use std::time::Duration;

use raft_runner_core::{
    collaborators::{NarrativeStore, Variable},
    Deferred,
};

const COMPLETION_EPSILON: f32 = 1e-4;

/// Tuning for the pump minigame.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Handle height reached by an up stroke.
    pub handle_up: f32,
    /// Handle height reached by a down stroke.
    pub handle_down: f32,
    /// Speed at which the handle travels toward its target height.
    pub move_speed: f32,
    /// Progress added by each completed down→up cycle.
    pub progress_per_pump: f32,
    /// Progress lost per second while pumping. Zero disables decay.
    pub decay_per_second: f32,
    /// Narrative flag raised on completion. Empty disables the flag.
    pub narrative_variable: String,
    /// Unscaled pause between completion and closing the minigame.
    pub finish_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            handle_up: 0.25,
            handle_down: -0.20,
            move_speed: 10.0,
            progress_per_pump: 0.12,
            decay_per_second: 0.0,
            narrative_variable: "RaftInflated".to_owned(),
            finish_delay: Duration::from_millis(150),
        }
    }
}

/// Input sampled for a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PumpInput {
    /// No relevant key was pressed.
    #[default]
    Idle,
    /// Push the handle down.
    Down,
    /// Pull the handle up.
    Up,
    /// Abort the minigame.
    Cancel,
}

/// Notifications raised by the minigame, in the order they occurred.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PumpEvent {
    /// The minigame opened.
    Started,
    /// Progress changed to the contained fraction.
    Progress(f32),
    /// The raft is fully inflated.
    Completed,
    /// The minigame closed, either cancelled or after completion.
    Canceled,
}

/// State of the pump minigame.
#[derive(Clone, Debug)]
pub struct PumpMinigame {
    config: Config,
    active: bool,
    progress: f32,
    handle_height: f32,
    target_height: f32,
    down_stroke_pending: bool,
    finish: Deferred<()>,
}

impl PumpMinigame {
    /// Creates an inactive minigame with the handle resting at `handle_height`.
    #[must_use]
    pub fn new(config: Config, handle_height: f32) -> Self {
        Self {
            config,
            active: false,
            progress: 0.0,
            handle_height,
            target_height: handle_height,
            down_stroke_pending: false,
            finish: Deferred::new(),
        }
    }

    /// Whether the minigame is currently open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Inflation progress in `0..=1`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Current height of the pump handle.
    #[must_use]
    pub fn handle_height(&self) -> f32 {
        self.handle_height
    }

    /// Opens the minigame. Returns `false` when it is already open.
    pub fn begin(&mut self, out: &mut Vec<PumpEvent>) -> bool {
        if self.active {
            log::debug!("pump minigame already active");
            return false;
        }
        self.active = true;
        self.target_height = self.handle_height;
        self.down_stroke_pending = false;
        out.push(PumpEvent::Started);
        true
    }

    /// Closes the minigame and drops a pending completion.
    pub fn cancel(&mut self, out: &mut Vec<PumpEvent>) {
        let _ = self.finish.cancel();
        if !self.active {
            return;
        }
        self.active = false;
        out.push(PumpEvent::Canceled);
    }

    /// Advances the minigame by one frame.
    pub fn update(
        &mut self,
        dt: Duration,
        unscaled_dt: Duration,
        input: PumpInput,
        narrative: Option<&mut dyn NarrativeStore>,
        out: &mut Vec<PumpEvent>,
    ) {
        if self.finish.advance(unscaled_dt).is_some() {
            self.cancel(out);
            return;
        }
        if !self.active {
            return;
        }
        if input == PumpInput::Cancel {
            self.cancel(out);
            return;
        }

        let seconds = dt.as_secs_f32();
        if self.config.decay_per_second > 0.0 && self.progress > 0.0 {
            let decayed = (self.progress - self.config.decay_per_second * seconds).max(0.0);
            self.set_progress(decayed, out);
        }

        match input {
            PumpInput::Down => {
                self.target_height = self.config.handle_down;
                self.down_stroke_pending = true;
            }
            PumpInput::Up => {
                self.target_height = self.config.handle_up;
                if self.down_stroke_pending {
                    self.down_stroke_pending = false;
                    self.add_pump(narrative, out);
                }
            }
            PumpInput::Idle | PumpInput::Cancel => {}
        }

        self.handle_height = move_towards(
            self.handle_height,
            self.target_height,
            self.config.move_speed * seconds,
        );
    }

    fn add_pump(&mut self, narrative: Option<&mut dyn NarrativeStore>, out: &mut Vec<PumpEvent>) {
        let progress = (self.progress + self.config.progress_per_pump).clamp(0.0, 1.0);
        self.set_progress(progress, out);

        if self.progress < 1.0 - COMPLETION_EPSILON || self.finish.is_pending() {
            return;
        }
        self.progress = 1.0;
        if !self.config.narrative_variable.is_empty() {
            if let Some(narrative) = narrative {
                narrative.set_variable(&self.config.narrative_variable, Variable::Bool(true));
            }
        }
        log::info!("pump minigame completed");
        out.push(PumpEvent::Completed);
        let _ = self.finish.schedule(self.config.finish_delay, ());
    }

    fn set_progress(&mut self, progress: f32, out: &mut Vec<PumpEvent>) {
        self.progress = progress;
        out.push(PumpEvent::Progress(progress));
    }
}

fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}
