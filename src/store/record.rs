//! On-disk session record
//!
//! # File Format
//!
//! ```json
//! {
//!   "state": "running",
//!   "duration_minutes": 10,
//!   "remaining_seconds": 600.0,
//!   "started_at": 1706745600.0
//! }
//! ```
//!
//! `remaining_seconds` is the frozen remainder for `paused` and the
//! remainder as of `started_at` for `running`. Absence of the file means
//! idle.
//!
//! # Atomic Writes
//!
//! Records are written to a temp file in the same directory, synced, then
//! renamed over the old record, so readers see either the old or the new
//! record and never a torn one.

use std::{
    fs,
    io::{ErrorKind, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{
    error::{Result, SessionError},
    state::{CountdownState, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES},
};

/// Persisted snapshot of the single system-wide session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionRecord {
    pub state: CountdownState,
    pub duration_minutes: u32,
    pub remaining_seconds: f64,
    pub started_at: f64,
}

impl SessionRecord {
    /// Reject records no mutation of ours could have produced.
    fn validate(&self) -> std::result::Result<(), String> {
        if !self.remaining_seconds.is_finite() || self.remaining_seconds < 0.0 {
            return Err(format!(
                "remaining_seconds must be a non-negative number, got {}",
                self.remaining_seconds
            ));
        }
        if !self.started_at.is_finite() {
            return Err(format!("started_at must be finite, got {}", self.started_at));
        }
        let minutes_ok =
            (MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&self.duration_minutes);
        if self.state != CountdownState::Idle && !minutes_ok {
            return Err(format!(
                "duration_minutes must be between {} and {} for a {} session, got {}",
                MIN_DURATION_MINUTES, MAX_DURATION_MINUTES, self.state, self.duration_minutes
            ));
        }
        Ok(())
    }
}

/// Read the record at `path`. A missing file is `Ok(None)`.
///
/// An unreadable or malformed record is an error: it is never quietly
/// treated as idle.
pub fn read_record(path: &Path) -> Result<Option<SessionRecord>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("no session record at {}", path.display());
            return Ok(None);
        }
        Err(e) => {
            return Err(SessionError::io(
                format!("failed to read {}", path.display()),
                e,
            ))
        }
    };

    let record: SessionRecord = serde_json::from_str(&content).map_err(|e| {
        warn!("session record {} does not parse: {}", path.display(), e);
        SessionError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    record.validate().map_err(|reason| {
        warn!("session record {} is invalid: {}", path.display(), reason);
        SessionError::Corrupt {
            path: path.to_path_buf(),
            reason,
        }
    })?;

    debug!("loaded session record: {:?}", record);
    Ok(Some(record))
}

/// Atomically replace the record at `path`, creating its directory if needed.
pub fn write_record(path: &Path, record: &SessionRecord) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        SessionError::io(
            format!("record path has no parent: {}", path.display()),
            ErrorKind::InvalidInput.into(),
        )
    })?;
    fs::create_dir_all(parent)
        .map_err(|e| SessionError::io(format!("failed to create {}", parent.display()), e))?;

    let content = serde_json::to_vec(record).map_err(|e| {
        SessionError::io("failed to serialize session record", e.into())
    })?;

    let mut temp = NamedTempFile::new_in(parent)
        .map_err(|e| SessionError::io("failed to create temp session record", e))?;
    temp.write_all(&content)
        .map_err(|e| SessionError::io("failed to write temp session record", e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| SessionError::io("failed to sync temp session record", e))?;
    temp.persist(path)
        .map_err(|e| SessionError::io(format!("failed to persist {}", path.display()), e.error))?;

    debug!("persisted session record: {:?}", record);
    Ok(())
}
