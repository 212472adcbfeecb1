//! Countdown engine.
//!
//! The engine owns the absolute end time and generates one tick per second
//! on its own tokio task, so UI work never delays it. Remaining time is
//! always recomputed from the end time, never from a tick count.

mod clock;
mod countdown;
mod host;
mod message;

pub use clock::{Clock, MonotonicClock, SystemClock};
pub use countdown::{Countdown, TickSource};
pub use host::{CountdownEngine, OutputReceiver, StampedOutput, TICK_INTERVAL};
pub use message::{EngineCommand, EngineOutput, COMPLETE_SENTINEL};
