//! Time sources
//!
//! Two readings are needed: a monotonic instant for measuring elapsed time
//! within one process, and wall-clock epoch seconds for bridging elapsed
//! time across process lifetimes (the only clock that survives an exit).

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use chrono::Utc;

/// Source of monotonic and wall-clock readings.
pub trait Clock {
    /// Non-decreasing instant, immune to wall-clock adjustments
    fn monotonic(&self) -> Instant;

    /// Seconds since the Unix epoch
    fn wall_seconds(&self) -> f64;
}

/// The real clocks of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn monotonic(&self) -> Instant {
        Instant::now()
    }

    fn wall_seconds(&self) -> f64 {
        Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}

#[derive(Debug)]
struct ManualReadings {
    offset: Duration,
    wall_seconds: f64,
}

/// A clock that only moves when told to.
///
/// Clones share the same readings, so a test can keep one handle and give
/// another to a store.
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    readings: Arc<Mutex<ManualReadings>>,
}

impl ManualClock {
    /// Create a clock whose wall reading starts at `wall_seconds`
    pub fn new(wall_seconds: f64) -> Self {
        Self {
            base: Instant::now(),
            readings: Arc::new(Mutex::new(ManualReadings {
                offset: Duration::ZERO,
                wall_seconds,
            })),
        }
    }

    /// Advance both clocks together, as real time passing would
    pub fn advance(&self, by: Duration) {
        let mut readings = self.lock();
        readings.offset += by;
        readings.wall_seconds += by.as_secs_f64();
    }

    /// Advance only the wall clock, simulating time between process runs
    pub fn advance_wall(&self, by: Duration) {
        self.lock().wall_seconds += by.as_secs_f64();
    }

    /// Jump the wall clock to an arbitrary value (NTP sync, manual change)
    pub fn set_wall(&self, wall_seconds: f64) {
        self.lock().wall_seconds = wall_seconds;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualReadings> {
        // A panic while holding this lock only happens inside a failing test.
        self.readings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for ManualClock {
    fn monotonic(&self) -> Instant {
        self.base + self.lock().offset
    }

    fn wall_seconds(&self) -> f64 {
        self.lock().wall_seconds
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn monotonic(&self) -> Instant {
        (**self).monotonic()
    }

    fn wall_seconds(&self) -> f64 {
        (**self).wall_seconds()
    }
}
