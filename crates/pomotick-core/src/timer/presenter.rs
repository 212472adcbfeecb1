//! Presentation state for one timer widget.
//!
//! Turns user intents into engine commands and engine outputs into the
//! displayed duration and progress. Nothing here talks to the engine
//! directly; each intent returns the command the caller must forward.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --resume--> Running
//!  ^                 |                  |
//!  +----reset--------+------reset-------+
//!  +----COMPLETE (cue, then reset)------+
//! ```

use serde::{Deserialize, Serialize};

use super::duration::{TimeUnit, TimerDuration};
use super::mode::{Mode, ModeDurations};
use super::state::{progress_pct, TimerState};
use crate::engine::{EngineCommand, EngineOutput};

pub const DEFAULT_TITLE_SUFFIX: &str = "Pomodoro";

/// Outcome of feeding one engine output into the presenter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reaction {
    /// Stale output (arrived while idle or paused); nothing changed.
    Ignored,
    Ticked {
        remaining_secs: u64,
        progress_pct: f64,
    },
    /// The countdown finished and the presenter already reset itself.
    /// The caller plays the cue and forwards `EngineCommand::Reset`.
    Completed { mode: Mode },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerPresenter {
    mode: Mode,
    defaults: ModeDurations,
    duration: TimerDuration,
    state: TimerState,
    /// Baseline for progress; captured on the first START after a reset.
    initial_total_secs: Option<u64>,
    progress_pct: f64,
    title_suffix: String,
}

impl TimerPresenter {
    pub fn new(mode: Mode, defaults: ModeDurations) -> Self {
        Self {
            mode,
            defaults,
            duration: defaults.for_mode(mode),
            state: TimerState::Idle,
            initial_total_secs: None,
            progress_pct: 100.0,
            title_suffix: DEFAULT_TITLE_SUFFIX.to_string(),
        }
    }

    pub fn with_title_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.title_suffix = suffix.into();
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn duration(&self) -> TimerDuration {
        self.duration
    }

    pub fn defaults(&self) -> &ModeDurations {
        &self.defaults
    }

    pub fn initial_total_secs(&self) -> Option<u64> {
        self.initial_total_secs
    }

    pub fn progress_pct(&self) -> f64 {
        self.progress_pct
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn is_reset(&self) -> bool {
        self.state.is_reset()
    }

    /// Window/page title: `"(25:00) Pomodoro"` while counting or paused,
    /// the bare suffix when reset.
    pub fn title(&self) -> String {
        if self.is_reset() {
            self.title_suffix.clone()
        } else {
            format!("({}) {}", self.duration, self.title_suffix)
        }
    }

    // ── Intents ──────────────────────────────────────────────────────

    /// Edit one field of the duration. Only allowed while idle.
    pub fn edit(&mut self, unit: TimeUnit, value: i64) -> bool {
        if !self.is_reset() {
            return false;
        }
        self.duration = self.duration.with_unit(unit, value);
        true
    }

    /// Replace the whole duration. Only allowed while idle.
    pub fn set_duration(&mut self, duration: TimerDuration) -> bool {
        if !self.is_reset() {
            return false;
        }
        self.duration = duration.clamped();
        true
    }

    pub fn start(&mut self, now_ms: i64) -> Option<EngineCommand> {
        if self.is_active() || self.duration.is_zero() {
            return None;
        }
        let total = self.duration.total_secs();
        self.initial_total_secs.get_or_insert(total);
        let end_time_ms = now_ms.saturating_add(self.duration.total_ms() as i64);
        self.state = TimerState::Running { end_time_ms };
        Some(EngineCommand::Start { end_time_ms })
    }

    pub fn pause(&mut self) -> Option<EngineCommand> {
        if !self.is_active() {
            return None;
        }
        self.state = TimerState::Paused {
            remaining_secs: self.duration.total_secs(),
        };
        Some(EngineCommand::Pause)
    }

    pub fn resume(&mut self, now_ms: i64) -> Option<EngineCommand> {
        let TimerState::Paused { remaining_secs } = self.state else {
            return None;
        };
        let end_time_ms = now_ms.saturating_add(remaining_secs.saturating_mul(1000) as i64);
        self.state = TimerState::Running { end_time_ms };
        Some(EngineCommand::Resume)
    }

    /// Start when idle, pause when running, resume when paused.
    pub fn toggle(&mut self, now_ms: i64) -> Option<EngineCommand> {
        match self.state {
            TimerState::Idle => self.start(now_ms),
            TimerState::Running { .. } => self.pause(),
            TimerState::Paused { .. } => self.resume(now_ms),
        }
    }

    /// Always returns `Reset`; resetting an idle widget is harmless.
    pub fn reset(&mut self) -> EngineCommand {
        self.state = TimerState::Idle;
        self.duration = self.defaults.for_mode(self.mode);
        self.initial_total_secs = None;
        self.progress_pct = 100.0;
        EngineCommand::Reset
    }

    pub fn switch_mode(&mut self, mode: Mode) -> EngineCommand {
        self.mode = mode;
        self.reset()
    }

    pub fn set_defaults(&mut self, defaults: ModeDurations) {
        self.defaults = defaults;
        if self.is_reset() {
            self.duration = defaults.for_mode(self.mode);
        }
    }

    // ── Engine outputs ───────────────────────────────────────────────

    pub fn on_output(&mut self, output: EngineOutput) -> Reaction {
        if !self.is_active() {
            return Reaction::Ignored;
        }
        match output {
            EngineOutput::Tick(remaining_secs) => {
                self.duration = TimerDuration::from_total_secs(remaining_secs);
                let baseline = self.initial_total_secs.get_or_insert(remaining_secs);
                if remaining_secs > *baseline {
                    *baseline = remaining_secs;
                }
                self.progress_pct = progress_pct(remaining_secs, *baseline);
                Reaction::Ticked {
                    remaining_secs,
                    progress_pct: self.progress_pct,
                }
            }
            EngineOutput::Complete => {
                self.reset();
                Reaction::Completed { mode: self.mode }
            }
        }
    }
}

impl Default for TimerPresenter {
    fn default() -> Self {
        Self::new(Mode::default(), ModeDurations::default())
    }
}
