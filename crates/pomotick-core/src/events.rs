use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Mode, TimerDuration, TimerState};

/// Every state change of a widget produces an Event.
/// Front ends render from these; `StateSnapshot` carries everything needed
/// to redraw from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        duration_secs: u64,
        end_time_ms: i64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        end_time_ms: i64,
        at: DateTime<Utc>,
    },
    TimerTick {
        remaining_secs: u64,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
    /// Countdown finished; the cue has played and the widget is reset.
    TimerCompleted {
        mode: Mode,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        at: DateTime<Utc>,
    },
    ModeChanged {
        mode: Mode,
        duration: TimerDuration,
        at: DateTime<Utc>,
    },
    DurationEdited {
        duration: TimerDuration,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        mode: Mode,
        remaining: TimerDuration,
        progress_pct: f64,
        title: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "TimerStarted",
            Event::TimerPaused { .. } => "TimerPaused",
            Event::TimerResumed { .. } => "TimerResumed",
            Event::TimerTick { .. } => "TimerTick",
            Event::TimerCompleted { .. } => "TimerCompleted",
            Event::TimerReset { .. } => "TimerReset",
            Event::ModeChanged { .. } => "ModeChanged",
            Event::DurationEdited { .. } => "DurationEdited",
            Event::StateSnapshot { .. } => "StateSnapshot",
        }
    }
}
