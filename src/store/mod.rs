//! Session persistence module
//!
//! This module bridges the pure countdown to durable storage: the on-disk
//! record, the advisory lock around it, and reconciliation on load.

pub mod lock;
pub mod record;
pub mod session;
pub mod session_store;

// Re-export main types
pub use record::SessionRecord;
pub use session::{Session, StatusReport};
pub use session_store::{SessionStore, LOCK_FILE, RECORD_FILE};
