//! Filesystem lock that keeps a destination repository single-writer
//!
//! Uses flock() on a file inside the destination's git directory, so two
//! replays into the same destination cannot interleave their commits.

use crate::error::{GitError, Result};
use fs2::FileExt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Name of the lock file inside the destination's `.git` directory
pub const LOCK_FILE_NAME: &str = "microannotate.lock";

/// Guard that holds an exclusive filesystem lock
///
/// The lock is released when this guard is dropped. If the process crashes,
/// the OS releases the flock.
#[derive(Debug)]
pub struct DestinationLock {
    _file: File,
    path: PathBuf,
}

impl DestinationLock {
    /// Try to acquire the lock in `git_dir`, non-blocking
    ///
    /// Fails with [`GitError::DestinationLocked`] if another holder exists.
    pub fn acquire(git_dir: &Path) -> Result<Self> {
        let path = git_dir.join(LOCK_FILE_NAME);

        tracing::debug!("Attempting to acquire destination lock: {:?}", path);

        let file = File::create(&path)?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                tracing::debug!("Acquired destination lock: {:?}", path);
                Ok(Self { _file: file, path })
            }
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                Err(GitError::DestinationLocked(path.display().to_string()).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DestinationLock {
    fn drop(&mut self) {
        // The lock file itself is left behind and reused
        tracing::debug!("Releasing destination lock: {:?}", self.path);
    }
}
