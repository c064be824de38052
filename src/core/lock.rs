//! core::lock
//!
//! Exclusive advisory lock guarding writes to a store file.
//!
//! # Architecture
//!
//! A store file `db.lua` is guarded by a sidecar `db.lua.lock`. Only one
//! process may save a given store at a time.
//!
//! # Invariants
//!
//! - The lock is held for the whole save (temp write + rename)
//! - Lock is automatically released on drop (RAII pattern)
//! - Acquisition is non-blocking (fails fast if locked)
//!
//! # Example
//!
//! ```
//! use dotdb::core::lock::StoreLock;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = dir.path().join("db.lua");
//!
//! let lock = StoreLock::acquire(&store).unwrap();
//! assert!(StoreLock::acquire(&store).is_err());
//! drop(lock);
//! assert!(StoreLock::acquire(&store).is_ok());
//! ```

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("store '{0}' is locked by another process")]
    AlreadyLocked(PathBuf),

    /// Failed to create lock file or directory.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),
}

/// Sidecar lock path for a store file: `<file>.lock`.
pub fn lock_path_for(store_path: &Path) -> PathBuf {
    let mut name: OsString = store_path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("store"));
    name.push(".lock");
    store_path.with_file_name(name)
}

/// An exclusive lock on a store file.
#[derive(Debug)]
pub struct StoreLock {
    /// Open handle holding the OS lock.
    file: File,
}

impl StoreLock {
    /// Attempt to acquire the lock for `store_path`.
    ///
    /// Creates the parent directory if needed.
    ///
    /// # Errors
    ///
    /// - [`LockError::AlreadyLocked`] if another handle holds the lock
    /// - [`LockError::CreateFailed`] if the lock file cannot be created
    /// - [`LockError::AcquireFailed`] if the OS lock cannot be acquired
    pub fn acquire(store_path: &Path) -> Result<Self, LockError> {
        let path = lock_path_for(store_path);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LockError::CreateFailed(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e))
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self { file }),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                Err(LockError::AlreadyLocked(store_path.to_path_buf()))
            }
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(temp: &TempDir) -> PathBuf {
        temp.path().join("db.lua")
    }

    #[test]
    fn lock_path_is_sidecar() {
        assert_eq!(
            lock_path_for(Path::new("/data/db.lua")),
            PathBuf::from("/data/db.lua.lock")
        );
    }

    #[test]
    fn acquire_creates_lock_file() {
        let temp = TempDir::new().expect("create temp dir");
        let store = store_in(&temp);

        let _lock = StoreLock::acquire(&store).expect("acquire lock");
        assert!(lock_path_for(&store).exists());
    }

    #[test]
    fn creates_parent_directory() {
        let temp = TempDir::new().expect("create temp dir");
        let store = temp.path().join("nested").join("db.lua");

        let _lock = StoreLock::acquire(&store).expect("acquire lock");
        assert!(temp.path().join("nested").exists());
    }

    #[test]
    fn prevents_second_acquire() {
        let temp = TempDir::new().expect("create temp dir");
        let store = store_in(&temp);

        let _lock = StoreLock::acquire(&store).expect("first acquire");
        let result = StoreLock::acquire(&store);
        assert!(matches!(result, Err(LockError::AlreadyLocked(_))));
    }

    #[test]
    fn released_on_drop() {
        let temp = TempDir::new().expect("create temp dir");
        let store = store_in(&temp);

        {
            let _lock = StoreLock::acquire(&store).expect("first acquire");
        }

        StoreLock::acquire(&store).expect("second acquire");
    }
}
