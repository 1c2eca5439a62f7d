//! Countdown state machine
//!
//! Pure and in-memory: no I/O, no threads, no clock reads. Every
//! time-dependent operation takes the current monotonic instant from the
//! caller, which keeps the transition function deterministic under test and
//! lets the session layer decide which clock feeds it.
//!
//! # Transitions
//!
//! | From                     | Operation | To      |
//! |--------------------------|-----------|---------|
//! | idle, expired            | start     | running |
//! | running                  | pause     | paused  |
//! | paused                   | resume    | running |
//! | running, paused, expired | restart   | running |
//! | running (on read)        | elapsed   | expired |
//!
//! Expiry is lazy. Every read and every guard check first reconciles the
//! countdown against `now`, so a running countdown whose budget is spent is
//! seen as expired before any guard is evaluated.

use std::time::{Duration, Instant};

use tracing::debug;

use super::CountdownState;
use crate::error::TimerError;

/// Shortest session that may be started, in minutes.
pub const MIN_DURATION_MINUTES: u32 = 1;
/// Longest session that may be started, in minutes.
pub const MAX_DURATION_MINUTES: u32 = 60;

/// Check that `minutes` is a legal session length.
pub fn validate_minutes(minutes: i64) -> Result<u32, TimerError> {
    match u32::try_from(minutes) {
        Ok(m) if (MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&m) => Ok(m),
        _ => Err(TimerError::InvalidDuration {
            value: minutes.to_string(),
        }),
    }
}

/// Parse a user-supplied session length.
///
/// Only whole numbers are accepted: `"2.5"` and `"ten"` are rejected the
/// same way `"0"` and `"61"` are.
pub fn parse_minutes(raw: &str) -> Result<u32, TimerError> {
    let trimmed = raw.trim();
    let minutes = trimmed
        .parse::<i64>()
        .map_err(|_| TimerError::InvalidDuration {
            value: trimmed.to_string(),
        })?;
    validate_minutes(minutes)
}

fn minutes_to_duration(minutes: u32) -> Duration {
    Duration::from_secs(u64::from(minutes) * 60)
}

/// Per-state data. Which of the anchor or the frozen remainder is
/// authoritative is decided by the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running { anchor: Instant, run_for: Duration },
    Paused { frozen: Duration },
    Expired,
}

/// A single bounded countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    phase: Phase,
    original_duration_minutes: u32,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::idle()
    }
}

impl Countdown {
    /// A countdown that has never been started
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            original_duration_minutes: 0,
        }
    }

    /// Rebuild a running countdown that has `run_for` left as of `anchor`.
    pub fn running(original_duration_minutes: u32, run_for: Duration, anchor: Instant) -> Self {
        Self {
            phase: Phase::Running { anchor, run_for },
            original_duration_minutes,
        }
    }

    /// Rebuild a paused countdown holding `frozen` remaining time.
    pub fn paused(original_duration_minutes: u32, frozen: Duration) -> Self {
        Self {
            phase: Phase::Paused { frozen },
            original_duration_minutes,
        }
    }

    /// Rebuild an expired countdown.
    pub fn expired(original_duration_minutes: u32) -> Self {
        Self {
            phase: Phase::Expired,
            original_duration_minutes,
        }
    }

    /// State as last materialized, without reconciling against a clock.
    pub fn state(&self) -> CountdownState {
        match self.phase {
            Phase::Idle => CountdownState::Idle,
            Phase::Running { .. } => CountdownState::Running,
            Phase::Paused { .. } => CountdownState::Paused,
            Phase::Expired => CountdownState::Expired,
        }
    }

    /// Session length set by the last start, in minutes. Zero while idle.
    pub fn original_duration_minutes(&self) -> u32 {
        self.original_duration_minutes
    }

    /// Budget of the current running stretch, counted from its anchor.
    pub fn run_duration(&self) -> Option<Duration> {
        match self.phase {
            Phase::Running { run_for, .. } => Some(run_for),
            _ => None,
        }
    }

    /// Remainder captured by the last pause.
    pub fn frozen_remaining(&self) -> Option<Duration> {
        match self.phase {
            Phase::Paused { frozen } => Some(frozen),
            _ => None,
        }
    }

    /// Materialize lazy expiry and return the resulting state.
    pub fn reconcile(&mut self, now: Instant) -> CountdownState {
        if let Phase::Running { anchor, run_for } = self.phase {
            if now.saturating_duration_since(anchor) >= run_for {
                debug!("countdown of {}m expired", self.original_duration_minutes);
                self.phase = Phase::Expired;
            }
        }
        self.state()
    }

    /// Time left as of `now`. Zero when idle or expired.
    pub fn remaining(&mut self, now: Instant) -> Duration {
        self.reconcile(now);
        match self.phase {
            Phase::Running { anchor, run_for } => {
                run_for.saturating_sub(now.saturating_duration_since(anchor))
            }
            Phase::Paused { frozen } => frozen,
            Phase::Idle | Phase::Expired => Duration::ZERO,
        }
    }

    /// Start a new countdown of `minutes` minutes.
    ///
    /// The duration is validated before the state guard, so a bad length is
    /// reported as such even while a session is active.
    pub fn start(&mut self, minutes: i64, now: Instant) -> Result<(), TimerError> {
        let minutes = validate_minutes(minutes)?;
        self.require("start", &[CountdownState::Idle, CountdownState::Expired], now)?;

        self.original_duration_minutes = minutes;
        self.phase = Phase::Running {
            anchor: now,
            run_for: minutes_to_duration(minutes),
        };
        Ok(())
    }

    /// Freeze the running countdown.
    pub fn pause(&mut self, now: Instant) -> Result<(), TimerError> {
        self.require("pause", &[CountdownState::Running], now)?;

        let frozen = self.remaining(now);
        self.phase = Phase::Paused { frozen };
        Ok(())
    }

    /// Continue a paused countdown from its frozen remainder.
    pub fn resume(&mut self, now: Instant) -> Result<(), TimerError> {
        self.require("resume", &[CountdownState::Paused], now)?;

        let frozen = self.frozen_remaining().unwrap_or_default();
        self.phase = Phase::Running {
            anchor: now,
            run_for: frozen,
        };
        Ok(())
    }

    /// Run again from the full original length.
    pub fn restart(&mut self, now: Instant) -> Result<(), TimerError> {
        self.require(
            "restart",
            &[
                CountdownState::Running,
                CountdownState::Paused,
                CountdownState::Expired,
            ],
            now,
        )?;

        self.phase = Phase::Running {
            anchor: now,
            run_for: minutes_to_duration(self.original_duration_minutes),
        };
        Ok(())
    }

    fn require(
        &mut self,
        operation: &'static str,
        allowed: &[CountdownState],
        now: Instant,
    ) -> Result<(), TimerError> {
        let state = self.reconcile(now);
        if allowed.contains(&state) {
            Ok(())
        } else {
            Err(TimerError::InvalidTransition { operation, state })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    fn started(minutes: i64) -> (Countdown, Instant) {
        let t0 = Instant::now();
        let mut countdown = Countdown::idle();
        countdown.start(minutes, t0).unwrap();
        (countdown, t0)
    }

    fn transition_error(operation: &'static str, state: CountdownState) -> TimerError {
        TimerError::InvalidTransition { operation, state }
    }

    #[test]
    fn starts_idle_with_nothing_remaining() {
        let mut countdown = Countdown::idle();
        assert_eq!(countdown.state(), CountdownState::Idle);
        assert_eq!(countdown.remaining(Instant::now()), Duration::ZERO);
        assert_eq!(countdown.original_duration_minutes(), 0);
    }

    #[test]
    fn start_runs_the_full_duration() {
        let (mut countdown, t0) = started(25);
        assert_eq!(countdown.state(), CountdownState::Running);
        assert_eq!(countdown.remaining(t0), 25 * MINUTE);
        assert_eq!(countdown.original_duration_minutes(), 25);
    }

    #[test]
    fn remaining_counts_down_with_the_monotonic_clock() {
        let (mut countdown, t0) = started(10);
        assert_eq!(
            countdown.remaining(t0 + Duration::from_secs(146)),
            Duration::from_secs(454)
        );
    }

    #[test]
    fn start_rejects_out_of_range_minutes() {
        for bad in [0, -5, 61, 1_000] {
            let mut countdown = Countdown::idle();
            let err = countdown.start(bad, Instant::now()).unwrap_err();
            assert_eq!(
                err,
                TimerError::InvalidDuration {
                    value: bad.to_string()
                }
            );
            assert_eq!(countdown, Countdown::idle());
        }
    }

    #[test]
    fn start_rejects_bad_minutes_from_expired_too() {
        let mut countdown = Countdown::expired(5);
        let err = countdown.start(61, Instant::now()).unwrap_err();
        assert!(matches!(err, TimerError::InvalidDuration { .. }));
        assert_eq!(countdown, Countdown::expired(5));
    }

    #[test]
    fn duration_is_checked_before_state() {
        let (mut countdown, t0) = started(10);
        let err = countdown.start(0, t0).unwrap_err();
        assert!(matches!(err, TimerError::InvalidDuration { .. }));
    }

    #[test]
    fn start_is_rejected_while_active() {
        let (mut countdown, t0) = started(10);
        assert_eq!(
            countdown.start(5, t0).unwrap_err(),
            transition_error("start", CountdownState::Running)
        );

        countdown.pause(t0).unwrap();
        assert_eq!(
            countdown.start(5, t0).unwrap_err(),
            transition_error("start", CountdownState::Paused)
        );
    }

    #[test]
    fn start_is_allowed_after_expiry() {
        let (mut countdown, t0) = started(1);
        let later = t0 + 2 * MINUTE;
        countdown.start(3, later).unwrap();
        assert_eq!(countdown.state(), CountdownState::Running);
        assert_eq!(countdown.remaining(later), 3 * MINUTE);
    }

    #[test]
    fn expires_lazily_on_read() {
        let (mut countdown, t0) = started(1);
        let later = t0 + Duration::from_secs(61);
        assert_eq!(countdown.state(), CountdownState::Running);
        assert_eq!(countdown.remaining(later), Duration::ZERO);
        assert_eq!(countdown.state(), CountdownState::Expired);
    }

    #[test]
    fn expires_exactly_at_the_budget() {
        let (mut countdown, t0) = started(1);
        assert_eq!(countdown.reconcile(t0 + MINUTE), CountdownState::Expired);
    }

    #[test]
    fn pause_freezes_the_remainder() {
        let (mut countdown, t0) = started(10);
        let paused_at = t0 + Duration::from_secs(146);
        countdown.pause(paused_at).unwrap();

        assert_eq!(countdown.state(), CountdownState::Paused);
        let much_later = paused_at + 120 * MINUTE;
        assert_eq!(countdown.remaining(much_later), Duration::from_secs(454));
    }

    #[test]
    fn pause_after_expiry_reports_expired() {
        let (mut countdown, t0) = started(1);
        assert_eq!(
            countdown.pause(t0 + 5 * MINUTE).unwrap_err(),
            transition_error("pause", CountdownState::Expired)
        );
    }

    #[test]
    fn pause_is_rejected_from_idle_and_paused() {
        let mut idle = Countdown::idle();
        assert_eq!(
            idle.pause(Instant::now()).unwrap_err(),
            transition_error("pause", CountdownState::Idle)
        );

        let (mut countdown, t0) = started(10);
        countdown.pause(t0).unwrap();
        assert_eq!(
            countdown.pause(t0).unwrap_err(),
            transition_error("pause", CountdownState::Paused)
        );
    }

    #[test]
    fn resume_continues_from_the_frozen_remainder() {
        let (mut countdown, t0) = started(10);
        let paused_at = t0 + Duration::from_secs(146);
        countdown.pause(paused_at).unwrap();

        let resumed_at = paused_at + 30 * MINUTE;
        countdown.resume(resumed_at).unwrap();
        assert_eq!(countdown.state(), CountdownState::Running);
        assert_eq!(countdown.remaining(resumed_at), Duration::from_secs(454));
        assert_eq!(
            countdown.remaining(resumed_at + Duration::from_secs(54)),
            Duration::from_secs(400)
        );
        assert_eq!(countdown.original_duration_minutes(), 10);
    }

    #[test]
    fn resume_is_rejected_unless_paused() {
        let mut idle = Countdown::idle();
        assert_eq!(
            idle.resume(Instant::now()).unwrap_err(),
            transition_error("resume", CountdownState::Idle)
        );

        let (mut countdown, t0) = started(10);
        assert_eq!(
            countdown.resume(t0).unwrap_err(),
            transition_error("resume", CountdownState::Running)
        );

        let mut expired = Countdown::expired(10);
        assert_eq!(
            expired.resume(t0).unwrap_err(),
            transition_error("resume", CountdownState::Expired)
        );
    }

    #[test]
    fn restart_resets_to_the_original_length_from_any_active_state() {
        let t0 = Instant::now();
        let later = t0 + 7 * MINUTE;

        let mut running = Countdown::running(10, 4 * MINUTE, t0);
        let mut paused = Countdown::paused(10, Duration::from_secs(5));
        let mut expired = Countdown::expired(10);

        for countdown in [&mut running, &mut paused, &mut expired] {
            countdown.restart(later).unwrap();
            assert_eq!(countdown.state(), CountdownState::Running);
            assert_eq!(countdown.remaining(later), 10 * MINUTE);
            assert_eq!(countdown.original_duration_minutes(), 10);
        }
    }

    #[test]
    fn restart_is_rejected_from_idle() {
        let mut countdown = Countdown::idle();
        assert_eq!(
            countdown.restart(Instant::now()).unwrap_err(),
            transition_error("restart", CountdownState::Idle)
        );
    }

    #[test]
    fn transition_error_renders_operation_and_state() {
        let err = transition_error("pause", CountdownState::Idle);
        assert_eq!(err.to_string(), "pause() is not valid from idle state");
    }

    #[test]
    fn parse_minutes_accepts_whole_numbers_only() {
        assert_eq!(parse_minutes("25"), Ok(25));
        assert_eq!(parse_minutes(" 1 "), Ok(1));
        assert_eq!(parse_minutes("60"), Ok(60));
        for bad in ["2.5", "ten", "", "0", "61", "-3"] {
            assert!(
                matches!(parse_minutes(bad), Err(TimerError::InvalidDuration { .. })),
                "{bad:?} should be rejected"
            );
        }
    }
}
