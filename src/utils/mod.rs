//! Utility functions module
//!
//! This module contains utility functions used throughout the application.

pub mod format;

// Re-export main functions
pub use format::format_remaining;
