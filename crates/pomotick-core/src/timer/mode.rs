use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::duration::TimerDuration;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Pomodoro, Mode::ShortBreak, Mode::LongBreak];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Pomodoro => "Pomodoro",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "pomodoro" | "focus" => Ok(Mode::Pomodoro),
            "short_break" | "short" => Ok(Mode::ShortBreak),
            "long_break" | "long" => Ok(Mode::LongBreak),
            _ => Err(ValidationError::InvalidValue {
                field: "mode".into(),
                message: format!("expected pomodoro, short-break or long-break, got '{s}'"),
            }),
        }
    }
}

/// Default duration restored for each mode on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeDurations {
    pub pomodoro: TimerDuration,
    pub short_break: TimerDuration,
    pub long_break: TimerDuration,
}

impl ModeDurations {
    pub fn from_minutes(pomodoro: u64, short_break: u64, long_break: u64) -> Self {
        Self {
            pomodoro: TimerDuration::from_minutes(pomodoro),
            short_break: TimerDuration::from_minutes(short_break),
            long_break: TimerDuration::from_minutes(long_break),
        }
    }

    pub fn for_mode(&self, mode: Mode) -> TimerDuration {
        match mode {
            Mode::Pomodoro => self.pomodoro,
            Mode::ShortBreak => self.short_break,
            Mode::LongBreak => self.long_break,
        }
    }
}

impl Default for ModeDurations {
    fn default() -> Self {
        Self::from_minutes(25, 5, 20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("pomodoro".parse::<Mode>().unwrap(), Mode::Pomodoro);
        assert_eq!("short-break".parse::<Mode>().unwrap(), Mode::ShortBreak);
        assert_eq!("Long Break".parse::<Mode>().unwrap(), Mode::LongBreak);
        assert!("nap".parse::<Mode>().is_err());
    }

    #[test]
    fn default_durations() {
        let d = ModeDurations::default();
        assert_eq!(d.for_mode(Mode::Pomodoro).total_secs(), 25 * 60);
        assert_eq!(d.for_mode(Mode::ShortBreak).total_secs(), 5 * 60);
        assert_eq!(d.for_mode(Mode::LongBreak).total_secs(), 20 * 60);
    }
}
