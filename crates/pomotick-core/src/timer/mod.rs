mod duration;
mod mode;
mod presenter;
mod state;

pub use duration::{TimeUnit, TimerDuration, MAX_HOURS, MAX_MINUTES, MAX_SECONDS, MAX_TOTAL_SECS};
pub use mode::{Mode, ModeDurations};
pub use presenter::{Reaction, TimerPresenter, DEFAULT_TITLE_SUFFIX};
pub use state::{progress_pct, TimerState};
