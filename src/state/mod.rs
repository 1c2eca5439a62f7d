//! Countdown state module
//!
//! This module contains the pure countdown state machine and the clocks that
//! feed it.

pub mod clock;
pub mod countdown;
pub mod countdown_state;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown::{
    parse_minutes, validate_minutes, Countdown, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES,
};
pub use countdown_state::CountdownState;
