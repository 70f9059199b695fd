//! Process-level mutual exclusion between generation runs.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::errors::{Result, SitemapError};

/// An exclusive advisory lock on `<dir>/<name>.lock`, released when dropped.
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    /// Takes the lock without blocking. Fails with [`SitemapError::AlreadyRunning`] if another
    /// process (or another `RunLock` in this process) holds it.
    pub fn acquire(directory: &Path, name: &str) -> Result<Self> {
        let path = directory.join(format!("{name}.lock"));
        let lock_error = |source| SitemapError::Lock {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(directory).map_err(lock_error)?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(lock_error)?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                debug!("Acquired lock {}", path.display());
                Ok(Self { file, path })
            }
            Err(err) if err.kind() == fs2::lock_contended_error().kind() => Err(SitemapError::AlreadyRunning(path)),
            Err(err) => Err(lock_error(err)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        debug!("Released lock {}", self.path.display());
    }
}
