//! Countdown state machine.
//!
//! Pure data: the caller supplies `now` and owns the actual tick source.
//! `apply` tells the caller what to do with that tick source.
//!
//! ```text
//! Idle --START--> Ticking --PAUSE--> Paused --RESUME--> Ticking
//!   ^                |  \                                  |
//!   +-----RESET------+   +--end time reached (COMPLETE)----+--> Idle
//! ```

use super::message::{EngineCommand, EngineOutput};

/// What the engine host must do with its tick source after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSource {
    /// Drop any existing tick source and start a fresh one.
    Restart,
    /// Drop the tick source.
    Cancel,
    /// The command was ignored.
    Unchanged,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Countdown {
    end_time_ms: Option<i64>,
    paused_at_ms: Option<i64>,
    ticking: bool,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn end_time_ms(&self) -> Option<i64> {
        self.end_time_ms
    }

    pub fn paused_at_ms(&self) -> Option<i64> {
        self.paused_at_ms
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn is_paused(&self) -> bool {
        !self.ticking && self.paused_at_ms.is_some() && self.end_time_ms.is_some()
    }

    pub fn apply(&mut self, command: EngineCommand, now_ms: i64) -> TickSource {
        match command {
            EngineCommand::Start { end_time_ms } => {
                self.end_time_ms = Some(end_time_ms);
                self.paused_at_ms = None;
                self.ticking = true;
                TickSource::Restart
            }
            EngineCommand::Pause => {
                if !self.ticking {
                    return TickSource::Unchanged;
                }
                self.ticking = false;
                self.paused_at_ms = Some(now_ms);
                TickSource::Cancel
            }
            EngineCommand::Resume => match (self.end_time_ms, self.paused_at_ms, self.ticking) {
                (Some(end), Some(paused_at), false) => {
                    let paused_for = now_ms.saturating_sub(paused_at).max(0);
                    self.end_time_ms = Some(end.saturating_add(paused_for));
                    self.paused_at_ms = None;
                    self.ticking = true;
                    TickSource::Restart
                }
                _ => TickSource::Unchanged,
            },
            EngineCommand::Reset => {
                self.end_time_ms = None;
                self.paused_at_ms = None;
                self.ticking = false;
                TickSource::Cancel
            }
        }
    }

    /// Evaluate one tick. `None` when not ticking.
    ///
    /// Once the end time is reached the countdown returns to idle, so it
    /// yields exactly one [`EngineOutput::Complete`] per START.
    pub fn tick(&mut self, now_ms: i64) -> Option<EngineOutput> {
        if !self.ticking {
            return None;
        }
        let end = self.end_time_ms?;
        let left_ms = end.saturating_sub(now_ms);
        if left_ms <= 0 {
            self.ticking = false;
            self.end_time_ms = None;
            self.paused_at_ms = None;
            return Some(EngineOutput::Complete);
        }
        Some(EngineOutput::Tick(round_secs(left_ms).max(1)))
    }
}

/// Milliseconds to whole seconds, half-up.
fn round_secs(ms: i64) -> u64 {
    ((ms + 500) / 1000) as u64
}
