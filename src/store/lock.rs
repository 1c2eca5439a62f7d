//! Advisory locking around the session record
//!
//! The lock lives in its own file next to the record. The record itself is
//! replaced by rename on every write, so a lock taken on the record's inode
//! would not be seen by the next reader.

use std::{
    fs::{self, File, OpenOptions},
    path::Path,
};

use fs2::FileExt;
use tracing::debug;

use crate::error::{Result, SessionError};

/// A held advisory lock. Released when dropped.
#[derive(Debug)]
pub struct SessionLock {
    _file: File,
}

fn open_lock_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| SessionError::io(format!("failed to create {}", parent.display()), e))?;
    }
    OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(path)
        .map_err(|e| SessionError::io(format!("failed to open lock {}", path.display()), e))
}

/// Block until a shared lock on `path` is held.
pub fn acquire_shared(path: &Path) -> Result<SessionLock> {
    let file = open_lock_file(path)?;
    FileExt::lock_shared(&file).map_err(|source| SessionError::Lock {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("holding shared lock on {}", path.display());
    Ok(SessionLock { _file: file })
}

/// Block until an exclusive lock on `path` is held.
pub fn acquire_exclusive(path: &Path) -> Result<SessionLock> {
    let file = open_lock_file(path)?;
    FileExt::lock_exclusive(&file).map_err(|source| SessionError::Lock {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("holding exclusive lock on {}", path.display());
    Ok(SessionLock { _file: file })
}
