//! Scoped key-value storage surviving restarts.
//!
//! The session token lives in one slot of this storage. [`FileStorage`]
//! keeps all slots in a single JSON object on disk; [`MemoryStorage`] is
//! the in-process variant.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

pub trait ScopedStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

type Slots = BTreeMap<String, String>;

/// Slots persisted as a JSON object in one file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    guard: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Slots, StorageError> {
        if !self.path.exists() {
            return Ok(Slots::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Slots::new());
        }
        Ok(serde_json::from_str::<Slots>(&contents)?)
    }

    fn save(&self, slots: &Slots) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(slots)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl ScopedStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _lock = self.guard.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _lock = self.guard.lock().map_err(|_| StorageError::LockPoisoned)?;
        let mut slots = self.load()?;
        slots.insert(key.to_string(), value.to_string());
        self.save(&slots)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _lock = self.guard.lock().map_err(|_| StorageError::LockPoisoned)?;
        let mut slots = self.load()?;
        if slots.remove(key).is_some() {
            self.save(&slots)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<Slots>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with one slot.
    pub fn with_slot(key: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut slots) = storage.slots.lock() {
            slots.insert(key.to_string(), value.to_string());
        }
        storage
    }
}

impl ScopedStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().map_err(|_| StorageError::LockPoisoned)?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().map_err(|_| StorageError::LockPoisoned)?;
        slots.remove(key);
        Ok(())
    }
}
