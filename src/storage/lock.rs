use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use log::{debug, warn};

use crate::errors::{Result, SnipitError};

/// Exclusive advisory lock on the store's lock file. Released on drop.
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .map_err(|e| SnipitError::io(path, e))?;
        file.lock_exclusive()
            .map_err(|e| SnipitError::Lock(format!("{}: {}", path.display(), e)))?;
        debug!("acquired store lock {}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("failed to release store lock {}: {}", self.path.display(), e);
        } else {
            debug!("released store lock {}", self.path.display());
        }
    }
}
