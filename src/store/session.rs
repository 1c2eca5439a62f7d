//! Reconciled in-memory session
//!
//! A [`Session`] is rebuilt from the persisted record on every process
//! start. Wall-clock time bridges the gap since the record was written; from
//! then on the countdown runs on the monotonic clock. Guards and elapsed-time
//! arithmetic are delegated to [`Countdown`].

use std::time::Duration;

use tracing::{debug, info};

use super::record::SessionRecord;
use crate::{
    error::TimerError,
    state::{Clock, Countdown, CountdownState},
    utils::format_remaining,
};

/// Outcome of a status query: the line to print and the process exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub message: String,
    pub exit_code: u8,
}

impl StatusReport {
    fn active(message: String) -> Self {
        Self {
            message,
            exit_code: 0,
        }
    }

    fn inactive(message: &str) -> Self {
        Self {
            message: message.to_string(),
            exit_code: 1,
        }
    }
}

fn secs_to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or_default()
}

/// The countdown plus the wall-clock moment it last entered its current state.
#[derive(Debug)]
pub struct Session<C: Clock> {
    countdown: Countdown,
    started_at: f64,
    clock: C,
}

impl<C: Clock> Session<C> {
    /// Rebuild the session from a persisted record, if there is one.
    ///
    /// A running record is reconciled against the wall clock: the time that
    /// passed while no process was alive is folded into the budget of a
    /// fresh running stretch anchored at the current monotonic instant.
    pub fn from_record(record: Option<SessionRecord>, clock: C) -> Self {
        let Some(record) = record else {
            return Self {
                countdown: Countdown::idle(),
                started_at: 0.0,
                clock,
            };
        };

        let minutes = record.duration_minutes;
        let (countdown, started_at) = match record.state {
            CountdownState::Idle => (Countdown::idle(), 0.0),
            CountdownState::Running => {
                let now = clock.wall_seconds();
                // A wall clock that moved backwards never adds time.
                let elapsed = (now - record.started_at).max(0.0);
                let adjusted = record.remaining_seconds - elapsed;
                if adjusted <= 0.0 {
                    debug!("running record ran out {:.1}s ago", -adjusted);
                    (Countdown::expired(minutes), record.started_at)
                } else {
                    debug!("running record has {:.1}s left after {:.1}s away", adjusted, elapsed);
                    let countdown =
                        Countdown::running(minutes, secs_to_duration(adjusted), clock.monotonic());
                    (countdown, now)
                }
            }
            CountdownState::Paused => (
                Countdown::paused(minutes, secs_to_duration(record.remaining_seconds)),
                record.started_at,
            ),
            CountdownState::Expired => (Countdown::expired(minutes), record.started_at),
        };

        Self {
            countdown,
            started_at,
            clock,
        }
    }

    /// Snapshot for persistence.
    pub fn to_record(&self) -> SessionRecord {
        let remaining = match self.countdown.state() {
            CountdownState::Running => self.countdown.run_duration(),
            CountdownState::Paused => self.countdown.frozen_remaining(),
            CountdownState::Idle | CountdownState::Expired => None,
        };
        SessionRecord {
            state: self.countdown.state(),
            duration_minutes: self.countdown.original_duration_minutes(),
            remaining_seconds: remaining.map(|d| d.as_secs_f64()).unwrap_or(0.0),
            started_at: self.started_at,
        }
    }

    /// Current state, after materializing any pending expiry.
    pub fn state(&mut self) -> CountdownState {
        self.countdown.reconcile(self.clock.monotonic())
    }

    /// Time left right now.
    pub fn remaining(&mut self) -> Duration {
        self.countdown.remaining(self.clock.monotonic())
    }

    pub fn start(&mut self, minutes: i64) -> Result<String, TimerError> {
        self.countdown.start(minutes, self.clock.monotonic())?;
        self.started_at = self.clock.wall_seconds();
        info!("session started: {} minutes", minutes);
        Ok(format!("Session started: {minutes} minutes"))
    }

    pub fn status(&mut self) -> StatusReport {
        match self.state() {
            CountdownState::Running => {
                StatusReport::active(format!("{} remaining", format_remaining(self.remaining())))
            }
            CountdownState::Paused => StatusReport::active(format!(
                "{} remaining (paused)",
                format_remaining(self.remaining())
            )),
            CountdownState::Expired => StatusReport::inactive("Session expired"),
            CountdownState::Idle => StatusReport::inactive("No active session"),
        }
    }

    pub fn pause(&mut self) -> Result<String, TimerError> {
        self.countdown.pause(self.clock.monotonic())?;
        self.started_at = self.clock.wall_seconds();
        let frozen = format_remaining(self.countdown.frozen_remaining().unwrap_or_default());
        info!("session paused at {} remaining", frozen);
        Ok(format!("Session paused at {frozen} remaining"))
    }

    pub fn resume(&mut self) -> Result<String, TimerError> {
        self.countdown.resume(self.clock.monotonic())?;
        self.started_at = self.clock.wall_seconds();
        let left = format_remaining(self.countdown.run_duration().unwrap_or_default());
        info!("session resumed with {} remaining", left);
        Ok(format!("Session resumed: {left} remaining"))
    }

    pub fn restart(&mut self) -> Result<String, TimerError> {
        self.countdown.restart(self.clock.monotonic())?;
        self.started_at = self.clock.wall_seconds();
        let minutes = self.countdown.original_duration_minutes();
        info!("session restarted: {} minutes", minutes);
        Ok(format!("Session restarted: {minutes} minutes"))
    }
}
