//! On-disk store for pre-maximize window geometry.
//!
//! One JSON file per process id, `window_state_<pid>.json`, in a single
//! directory. Files are disjoint by key, so concurrent invocations for
//! different processes never touch the same file and no lock is taken.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use winmax_core::WindowState;

/// Errors that can occur while saving a record.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to create state directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to serialize window state: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write state file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Directory-backed store of `WindowState` records keyed by process id.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for a process id.
    pub fn path_for(&self, process_id: u32) -> PathBuf {
        self.dir.join(format!("window_state_{}.json", process_id))
    }

    /// Write the record for `process_id`, replacing any existing one.
    ///
    /// The JSON is written to a sibling `.tmp` file and renamed into place,
    /// so a reader never sees a half-written record.
    pub fn save(&self, process_id: u32, state: &WindowState) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(process_id);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string(state)?;

        fs::write(&tmp, json).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            StoreError::Write {
                path: path.clone(),
                source,
            }
        })?;

        debug!("Saved window state for pid {} to {}", process_id, path.display());
        Ok(())
    }

    /// Read the record for `process_id`.
    ///
    /// A missing, unreadable or malformed file is reported as `None`.
    pub fn load(&self, process_id: u32) -> Option<WindowState> {
        let path = self.path_for(process_id);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read state file {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!("Ignoring malformed state file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Remove the record for `process_id`. Removing an absent record is a no-op.
    pub fn delete(&self, process_id: u32) {
        let path = self.path_for(process_id);
        match fs::remove_file(&path) {
            Ok(()) => debug!("Deleted state file {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to delete state file {}: {}", path.display(), e),
        }
    }
}
