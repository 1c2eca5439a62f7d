//! redgreen - A TDD session countdown that survives across CLI invocations
//!
//! This library provides the countdown state machine and the file-backed
//! session store that reconstructs it on every short-lived process start.

pub mod config;
pub mod error;
pub mod state;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{SessionError, TimerError};
pub use state::{Countdown, CountdownState};
pub use store::{SessionStore, StatusReport};
