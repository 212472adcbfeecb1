use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MAX_HOURS: u64 = 10;
pub const MAX_MINUTES: u64 = 59;
pub const MAX_SECONDS: u64 = 59;
/// Longest duration that can be entered: `10:59:59`.
pub const MAX_TOTAL_SECS: u64 = MAX_HOURS * 3600 + MAX_MINUTES * 60 + MAX_SECONDS;

/// One editable field of a [`TimerDuration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    pub fn max(self) -> u64 {
        match self {
            TimeUnit::Hours => MAX_HOURS,
            TimeUnit::Minutes => MAX_MINUTES,
            TimeUnit::Seconds => MAX_SECONDS,
        }
    }

    /// Clamp raw user input into `0..=max`.
    pub fn clamp(self, value: i64) -> u64 {
        value.clamp(0, self.max() as i64) as u64
    }
}

/// Hours/minutes/seconds triple shown and edited by the widget.
///
/// Values coming from user input are clamped per field. Values derived from
/// an engine tick are not clamped, they are a plain decomposition of the
/// remaining seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerDuration {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimerDuration {
    /// Build a duration from user-entered fields, clamping each one.
    pub fn new(hours: i64, minutes: i64, seconds: i64) -> Self {
        Self {
            hours: TimeUnit::Hours.clamp(hours),
            minutes: TimeUnit::Minutes.clamp(minutes),
            seconds: TimeUnit::Seconds.clamp(seconds),
        }
    }

    pub fn from_minutes(minutes: u64) -> Self {
        Self::saturating_from_secs(minutes.saturating_mul(60))
    }

    /// Like [`from_total_secs`](Self::from_total_secs), but saturates at
    /// [`MAX_TOTAL_SECS`] instead of producing out-of-range fields.
    pub fn saturating_from_secs(total: u64) -> Self {
        Self::from_total_secs(total.min(MAX_TOTAL_SECS))
    }

    pub fn from_total_secs(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    pub fn total_secs(&self) -> u64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }

    pub fn total_ms(&self) -> u64 {
        self.total_secs().saturating_mul(1000)
    }

    pub fn is_zero(&self) -> bool {
        self.total_secs() == 0
    }

    pub fn get(&self, unit: TimeUnit) -> u64 {
        match unit {
            TimeUnit::Hours => self.hours,
            TimeUnit::Minutes => self.minutes,
            TimeUnit::Seconds => self.seconds,
        }
    }

    /// Replace one field with a clamped value.
    pub fn with_unit(mut self, unit: TimeUnit, value: i64) -> Self {
        let value = unit.clamp(value);
        match unit {
            TimeUnit::Hours => self.hours = value,
            TimeUnit::Minutes => self.minutes = value,
            TimeUnit::Seconds => self.seconds = value,
        }
        self
    }

    /// Force every field into its input range.
    pub fn clamped(self) -> Self {
        Self {
            hours: self.hours.min(MAX_HOURS),
            minutes: self.minutes.min(MAX_MINUTES),
            seconds: self.seconds.min(MAX_SECONDS),
        }
    }
}

impl fmt::Display for TimerDuration {
    /// `MM:SS`, or `HH:MM:SS` once hours are non-zero.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hours > 0 {
            write!(f, "{:02}:", self.hours)?;
        }
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

impl FromStr for TimerDuration {
    type Err = ValidationError;

    /// Accepts `H:MM:SS`, `MM:SS` or a bare number of seconds.
    ///
    /// Each field is clamped like interactive input; only non-numeric text
    /// is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| ValidationError::InvalidValue {
            field: "duration".into(),
            message: format!("{message}: '{s}'"),
        };

        let parts = s
            .trim()
            .split(':')
            .map(|p| p.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid("expected H:MM:SS, MM:SS or seconds"))?;

        match parts.as_slice() {
            [secs] => Ok(Self::saturating_from_secs((*secs).max(0) as u64)),
            [m, s] => Ok(Self::new(0, *m, *s)),
            [h, m, s] => Ok(Self::new(*h, *m, *s)),
            _ => Err(invalid("too many ':' separated fields")),
        }
    }
}
