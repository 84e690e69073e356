//! # Store File Locking
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on Windows).
//!
//! The lock lives in a sibling `<store>.lock` file holding the owner PID.
//! The OS releases the flock when the owning process dies, so a leftover
//! lock file from a crashed process never blocks acquisition.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;
use thiserror::Error;

/// How long `acquire_for` waits for a competing holder before failing.
pub const STORE_LOCK_TIMEOUT: Duration = Duration::from_millis(500);

/// Errors from store locking
#[derive(Debug, Error)]
pub enum LockError {
    /// Lock file could not be created
    #[error("Failed to create lock file: {0}")]
    CreateFailed(io::Error),

    /// Store is already locked by another process
    #[error("Store already in use{} ({})", .pid.map(|p| format!(" by process {}", p)).unwrap_or_default(), .path.display())]
    AlreadyLocked { pid: Option<u32>, path: PathBuf },

    /// Failed to write PID to lock file
    #[error("Failed to write PID to lock file: {0}")]
    WriteFailed(io::Error),
}

/// Exclusive lock on a store file.
///
/// Acquired when the store is opened, released on drop (RAII).
pub struct DatabaseLock {
    /// The lock file handle (kept open to maintain lock)
    file: File,
    path: PathBuf,
    pid: u32,
}

impl DatabaseLock {
    /// Lock the store at `store_path` using the default timeout.
    pub fn acquire_for(store_path: &Path) -> Result<Self, LockError> {
        Self::acquire_with_timeout(&store_path.with_extension("lock"), STORE_LOCK_TIMEOUT)
    }

    /// Acquire an exclusive lock on `lock_path`, retrying with exponential
    /// backoff until `timeout` expires.
    pub fn acquire_with_timeout(lock_path: &Path, timeout: Duration) -> Result<Self, LockError> {
        let deadline = Instant::now() + timeout;
        let mut retry_delay = Duration::from_millis(25);

        loop {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(lock_path)
                .map_err(LockError::CreateFailed)?;

            match file.try_lock_exclusive() {
                Ok(()) => {
                    let pid = std::process::id();
                    let mut locked_file = file;
                    locked_file.set_len(0).map_err(LockError::WriteFailed)?;
                    writeln!(locked_file, "{}", pid).map_err(LockError::WriteFailed)?;
                    locked_file.sync_all().map_err(LockError::WriteFailed)?;

                    return Ok(Self {
                        file: locked_file,
                        path: lock_path.to_path_buf(),
                        pid,
                    });
                }
                Err(_) => {
                    drop(file);
                    if Instant::now() >= deadline {
                        return Err(LockError::AlreadyLocked {
                            pid: Self::read_existing_pid(lock_path),
                            path: lock_path.to_path_buf(),
                        });
                    }
                    std::thread::sleep(retry_delay);
                    retry_delay = (retry_delay * 2).min(Duration::from_millis(200));
                }
            }
        }
    }

    /// Get the PID of the process holding the lock
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Get the path to the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_existing_pid(path: &Path) -> Option<u32> {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

impl Drop for DatabaseLock {
    fn drop(&mut self) {
        // The lock file itself stays: removing it would let a waiter lock a
        // different inode than the one a third process is about to open.
        #[allow(clippy::incompatible_msrv)]
        let _ = self.file.unlock();
    }
}
