//! Intermediate files that only live until the next stage has consumed them.

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Owns a file produced by an external tool and deletes it when released.
///
/// Call [`Intermediate::remove`] once the artifact is superseded; dropping the
/// guard without it (e.g. on an early error return) still attempts removal.
#[derive(Debug)]
pub struct Intermediate {
    path: PathBuf,
    removed: bool,
}

impl Intermediate {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Intermediate {
            path: path.as_ref().to_path_buf(),
            removed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now. A file that was never created is not an error.
    pub fn remove(mut self) -> Result<()> {
        self.removed = true;
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                log::debug!("Removed {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}

impl Drop for Intermediate {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                log::warn!("Could not remove {}: {e}", self.path.display());
            }
        }
    }
}
