use serde::{Deserialize, Serialize};

/// Exactly one of these holds for a mounted widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum TimerState {
    /// Initial and post-reset state.
    #[default]
    Idle,
    /// Counting down to an absolute end time (ms since epoch).
    Running { end_time_ms: i64 },
    /// Remaining whole seconds captured when the pause was issued.
    Paused { remaining_secs: u64 },
}

impl TimerState {
    pub fn is_active(&self) -> bool {
        matches!(self, TimerState::Running { .. })
    }

    pub fn is_reset(&self) -> bool {
        matches!(self, TimerState::Idle)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimerState::Idle => "idle",
            TimerState::Running { .. } => "running",
            TimerState::Paused { .. } => "paused",
        }
    }
}

/// Percentage of the baseline still remaining, clamped to `0..=100`.
///
/// A zero baseline has nothing to measure against and reads as full.
pub fn progress_pct(remaining_secs: u64, initial_total_secs: u64) -> f64 {
    if initial_total_secs == 0 {
        return 100.0;
    }
    (remaining_secs as f64 / initial_total_secs as f64 * 100.0).clamp(0.0, 100.0)
}
