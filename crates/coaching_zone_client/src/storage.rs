//! Persistence slot for the history log.
//!
//! The backing medium is chosen once, in [`open`]: a file under the storage
//! directory, or an in-memory slot when that directory is unusable.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StorageError;

/// A single named slot holding the serialized history.
pub trait Storage: Send {
    /// `Ok(None)` when nothing has been stored yet.
    fn read(&self) -> Result<Option<String>, StorageError>;
    fn write(&self, contents: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// Slot backed by `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(dir: &Path, key: &str) -> Self {
        Self {
            path: dir.join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, contents: &str) -> Result<(), StorageError> {
        // Temp file + rename: the slot never holds a partial log.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Non-persistent slot; history lasts for the session only.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        let guard = self.slot.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(guard.clone())
    }

    fn write(&self, contents: &str) -> Result<(), StorageError> {
        let mut guard = self.slot.lock().map_err(|_| StorageError::Poisoned)?;
        *guard = Some(contents.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self.slot.lock().map_err(|_| StorageError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

/// File storage in `dir`, or memory storage if `dir` cannot be created.
pub fn open(dir: &Path, key: &str) -> Box<dyn Storage> {
    match std::fs::create_dir_all(dir) {
        Ok(()) => Box::new(FileStorage::new(dir, key)),
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "history storage unavailable, keeping history in memory");
            Box::new(MemoryStorage::new())
        }
    }
}
