//! Error types for countdown and session operations

use std::path::PathBuf;

use crate::state::CountdownState;

/// Failures raised by the countdown state machine.
///
/// Both variants leave in-memory and on-disk state untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    /// Requested length is not a whole number of minutes in `1..=60`.
    #[error("duration must be a whole number of minutes between 1 and 60, got {value}")]
    InvalidDuration { value: String },

    /// Operation attempted from a state outside its guard set.
    #[error("{operation}() is not valid from {state} state")]
    InvalidTransition {
        operation: &'static str,
        state: CountdownState,
    },
}

/// Everything that can go wrong while loading, mutating or persisting a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Timer(#[from] TimerError),

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("session record is corrupt: {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("failed to lock session record {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SessionError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        SessionError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Convenience type alias for session-level results.
pub type Result<T> = std::result::Result<T, SessionError>;
