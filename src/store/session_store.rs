//! File-backed session store
//!
//! Each CLI invocation builds a store, performs one operation and exits.
//! Mutations hold an exclusive lock across the whole read-modify-write span;
//! status holds a shared lock and never writes, since lazy expiry is
//! recomputed the same way on every load.

use std::path::PathBuf;

use tracing::debug;

use super::{
    lock::{acquire_exclusive, acquire_shared},
    record::{read_record, write_record},
    session::{Session, StatusReport},
};
use crate::{
    error::{Result, TimerError},
    state::{Clock, SystemClock},
};

/// File name of the persisted record inside the config directory.
pub const RECORD_FILE: &str = "session.json";
/// File name of the advisory lock inside the config directory.
pub const LOCK_FILE: &str = "session.lock";

/// Handle on the session record in one config directory.
#[derive(Debug, Clone)]
pub struct SessionStore<C = SystemClock> {
    config_dir: PathBuf,
    clock: C,
}

impl SessionStore<SystemClock> {
    /// Create a store over `config_dir` using the host clocks
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(config_dir, SystemClock)
    }
}

impl<C: Clock> SessionStore<C> {
    /// Create a store over `config_dir` reading time from `clock`
    pub fn with_clock(config_dir: impl Into<PathBuf>, clock: C) -> Self {
        Self {
            config_dir: config_dir.into(),
            clock,
        }
    }

    pub fn record_path(&self) -> PathBuf {
        self.config_dir.join(RECORD_FILE)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.config_dir.join(LOCK_FILE)
    }

    /// Load and reconcile the current session under a shared lock.
    pub fn load(&self) -> Result<Session<&C>> {
        self.with_session_shared(|_| ())
            .map(|(session, ())| session)
    }

    /// Start a new session of `minutes` minutes.
    pub fn start(&self, minutes: i64) -> Result<String> {
        self.with_session_exclusive("start", |session| session.start(minutes))
    }

    /// Report the current session. Only storage failures are errors.
    pub fn status(&self) -> Result<StatusReport> {
        self.with_session_shared(|session| session.status())
            .map(|(_, report)| report)
    }

    pub fn pause(&self) -> Result<String> {
        self.with_session_exclusive("pause", |session| session.pause())
    }

    pub fn resume(&self) -> Result<String> {
        self.with_session_exclusive("resume", |session| session.resume())
    }

    pub fn restart(&self) -> Result<String> {
        self.with_session_exclusive("restart", |session| session.restart())
    }

    fn with_session_shared<T>(
        &self,
        operation: impl FnOnce(&mut Session<&C>) -> T,
    ) -> Result<(Session<&C>, T)> {
        // Nothing has ever been written here; don't create directories for a read.
        if !self.config_dir.exists() {
            let mut session = Session::from_record(None, &self.clock);
            let result = operation(&mut session);
            return Ok((session, result));
        }

        let lock = acquire_shared(&self.lock_path())?;
        let record = read_record(&self.record_path())?;
        drop(lock);

        let mut session = Session::from_record(record, &self.clock);
        let result = operation(&mut session);
        Ok((session, result))
    }

    fn with_session_exclusive<T>(
        &self,
        name: &str,
        operation: impl FnOnce(&mut Session<&C>) -> std::result::Result<T, TimerError>,
    ) -> Result<T> {
        let lock = acquire_exclusive(&self.lock_path())?;
        let record = read_record(&self.record_path())?;
        let mut session = Session::from_record(record, &self.clock);

        let result = match operation(&mut session) {
            Ok(result) => result,
            Err(e) => {
                debug!("{} rejected, record left untouched: {}", name, e);
                return Err(e.into());
            }
        };

        write_record(&self.record_path(), &session.to_record())?;
        drop(lock);
        Ok(result)
    }
}
