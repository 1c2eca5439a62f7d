//! Countdown state enum and its on-disk spelling

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four states a countdown can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    #[default]
    Idle,
    Running,
    Paused,
    Expired,
}

impl CountdownState {
    /// Lowercase name used in records and user-facing messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for CountdownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
