use chrono::Utc;
use tokio::time::Instant;

/// Source of "now" in milliseconds since the Unix epoch.
///
/// The engine and the presentation state must read the same clock, since
/// one computes the end time the other counts down to.
pub trait Clock: Clone + Send + Sync + 'static {
    fn now_ms(&self) -> i64;
}

/// Plain system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Epoch time sampled once, then advanced by the monotonic tokio clock.
///
/// Wall-clock adjustments after construction do not move the countdown.
/// Under a paused tokio runtime it follows virtual time.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch_ms: i64,
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch_ms: Utc::now().timestamp_millis(),
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> i64 {
        self.epoch_ms + self.origin.elapsed().as_millis() as i64
    }
}
