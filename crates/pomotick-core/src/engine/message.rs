//! Wire messages exchanged with the countdown engine.
//!
//! Commands are JSON objects tagged by `action`:
//!
//! ```text
//! {"action":"START","endTime":1700000000000}
//! {"action":"PAUSE"}
//! {"action":"RESUME"}
//! {"action":"RESET"}
//! ```
//!
//! Outputs are either a bare integer (whole seconds remaining) or the
//! string `"COMPLETE"`.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub const COMPLETE_SENTINEL: &str = "COMPLETE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineCommand {
    Start {
        /// Absolute end time, milliseconds since the Unix epoch.
        #[serde(rename = "endTime")]
        end_time_ms: i64,
    },
    Pause,
    Resume,
    Reset,
}

impl EngineCommand {
    pub fn name(&self) -> &'static str {
        match self {
            EngineCommand::Start { .. } => "START",
            EngineCommand::Pause => "PAUSE",
            EngineCommand::Resume => "RESUME",
            EngineCommand::Reset => "RESET",
        }
    }

    /// START and RESET end whatever countdown came before; outputs of
    /// that countdown are stale from here on.
    pub fn begins_generation(&self) -> bool {
        matches!(self, EngineCommand::Start { .. } | EngineCommand::Reset)
    }

    pub fn decode(line: &str) -> Result<Self, EngineError> {
        serde_json::from_str(line.trim()).map_err(|e| EngineError::Malformed {
            line: line.to_string(),
            message: e.to_string(),
        })
    }

    pub fn encode(&self) -> String {
        // Plain enum with integer payloads; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// One message emitted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineOutput {
    /// Whole seconds remaining, rounded half-up and never below `1` while
    /// time is left, so a legacy `0` reader never mistakes it for completion.
    Tick(u64),
    /// The countdown reached its end time. Emitted once per START.
    Complete,
}

impl EngineOutput {
    pub fn decode(line: &str) -> Result<Self, EngineError> {
        serde_json::from_str(line.trim()).map_err(|e| EngineError::Malformed {
            line: line.to_string(),
            message: e.to_string(),
        })
    }

    pub fn encode(&self) -> String {
        match self {
            EngineOutput::Tick(secs) => secs.to_string(),
            EngineOutput::Complete => format!("\"{COMPLETE_SENTINEL}\""),
        }
    }
}

impl Serialize for EngineOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EngineOutput::Tick(secs) => serializer.serialize_u64(*secs),
            EngineOutput::Complete => serializer.serialize_str(COMPLETE_SENTINEL),
        }
    }
}

impl<'de> Deserialize<'de> for EngineOutput {
    /// Older emitters signalled completion with a bare `0`, so `0` decodes
    /// as [`EngineOutput::Complete`].
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Secs(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Secs(0) => Ok(EngineOutput::Complete),
            Raw::Secs(secs) => Ok(EngineOutput::Tick(secs)),
            Raw::Text(s) if s == COMPLETE_SENTINEL => Ok(EngineOutput::Complete),
            Raw::Text(s) => Err(serde::de::Error::custom(format!(
                "expected seconds or \"{COMPLETE_SENTINEL}\", got \"{s}\""
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_wire_format() {
        assert_eq!(
            EngineCommand::Start { end_time_ms: 1_000 }.encode(),
            r#"{"action":"START","endTime":1000}"#
        );
        assert_eq!(EngineCommand::Reset.encode(), r#"{"action":"RESET"}"#);
        assert_eq!(
            EngineCommand::decode(r#" {"action":"PAUSE"} "#).unwrap(),
            EngineCommand::Pause
        );
    }

    #[test]
    fn rejects_unknown_action() {
        let err = EngineCommand::decode(r#"{"action":"STOP"}"#).unwrap_err();
        assert!(matches!(err, EngineError::Malformed { .. }));
    }

    #[test]
    fn start_requires_end_time() {
        assert!(EngineCommand::decode(r#"{"action":"START"}"#).is_err());
    }

    #[test]
    fn output_wire_format() {
        assert_eq!(EngineOutput::Tick(42).encode(), "42");
        assert_eq!(EngineOutput::Complete.encode(), r#""COMPLETE""#);
        assert_eq!(
            serde_json::to_string(&EngineOutput::Complete).unwrap(),
            EngineOutput::Complete.encode()
        );
    }

    #[test]
    fn zero_and_sentinel_both_decode_as_complete() {
        assert_eq!(EngineOutput::decode("0").unwrap(), EngineOutput::Complete);
        assert_eq!(EngineOutput::decode(r#""COMPLETE""#).unwrap(), EngineOutput::Complete);
        assert_eq!(EngineOutput::decode("7").unwrap(), EngineOutput::Tick(7));
        assert!(EngineOutput::decode(r#""PAUSED""#).is_err());
    }
}
