//! Named JSON snapshots of in-memory state.
//!
//! Three independent stores persist this way: `habits`, `completions`,
//! and `prefs`. Each file is a pretty-printed serialization of the whole
//! list, rewritten on save and reloaded on startup. A missing file is a
//! fresh profile; a corrupt file is logged and treated as fresh rather
//! than blocking startup.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::error;

use super::data_dir;
use crate::error::StorageError;

/// Snapshot name for the habit list.
pub const HABITS_SNAPSHOT: &str = "habits";
/// Snapshot name for the completion list.
pub const COMPLETIONS_SNAPSHOT: &str = "completions";
/// Snapshot name for UI preferences.
pub const PREFS_SNAPSHOT: &str = "prefs";
/// Snapshot name for the persisted session (user + token).
pub const SESSION_SNAPSHOT: &str = "session";

/// Storage for named state snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Open the snapshot store in the data directory.
    pub fn open() -> Result<Self, StorageError> {
        Ok(SnapshotStore { dir: data_dir()? })
    }

    /// Create a snapshot store rooted at a custom directory (for testing).
    pub fn with_dir(dir: PathBuf) -> Self {
        SnapshotStore { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Load a named snapshot, falling back to the default value.
    pub fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.path(name);
        match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(err) => {
                    error!(snapshot = name, "failed to parse snapshot: {err}");
                    T::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => T::default(),
            Err(err) => {
                error!(snapshot = name, "failed to read snapshot: {err}");
                T::default()
            }
        }
    }

    /// Persist a named snapshot.
    pub fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StorageError> {
        let payload = serde_json::to_vec_pretty(value).map_err(|source| {
            StorageError::Serialize {
                name: name.to_string(),
                source,
            }
        })?;
        let path = self.path(name);
        std::fs::write(&path, payload).map_err(|err| StorageError::WriteFailed {
            name: name.to_string(),
            path,
            message: err.to_string(),
        })
    }

    /// Remove a named snapshot, ignoring a missing file.
    pub fn clear(&self, name: &str) -> Result<(), StorageError> {
        let path = self.path(name);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::WriteFailed {
                name: name.to_string(),
                path,
                message: err.to_string(),
            }),
        }
    }
}
