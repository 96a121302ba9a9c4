//! The user's unsaved shortlist selection.
//!
//! A set of property ids kept under one storage key as a JSON array. Every
//! mutation is persisted and then broadcast to subscribers.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;

use crate::errors::AppError;

/// Storage key the selection lives under.
pub const SELECTION_KEY: &str = "househunt_shortlist";

/// Buffered change notifications per subscriber.
const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// Minimal string key-value persistence.
pub trait SelectionStorage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, AppError>;
    fn save(&self, key: &str, value: &str) -> Result<(), AppError>;
}

/// Process-local storage.
#[derive(Default)]
pub struct MemorySelectionStorage {
    values: Mutex<HashMap<String, String>>,
}

impl SelectionStorage for MemorySelectionStorage {
    fn load(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage backed by a JSON object file, one entry per key.
pub struct FileSelectionStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSelectionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<HashMap<String, String>, AppError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SelectionStorage for FileSelectionStorage {
    fn load(&self, key: &str) -> Result<Option<String>, AppError> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), AppError> {
        let _guard = self.lock.lock();
        let mut all = self.read_all()?;
        all.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string(&all)?)?;
        Ok(())
    }
}

/// The selection itself, shared by every consumer that was handed it.
pub struct ShortlistSelection {
    storage: Arc<dyn SelectionStorage>,
    ids: RwLock<Vec<String>>,
    changes: broadcast::Sender<Vec<String>>,
}

impl ShortlistSelection {
    /// Load the selection from storage. A missing or corrupt entry starts empty.
    pub fn load(storage: Arc<dyn SelectionStorage>) -> Result<Self, AppError> {
        let ids = match storage.load(SELECTION_KEY)? {
            Some(raw) => serde_json::from_str::<Vec<String>>(&raw).unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable shortlist selection: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self {
            storage,
            ids: RwLock::new(ids),
            changes,
        })
    }

    /// Current ids in insertion order.
    pub fn ids(&self) -> Vec<String> {
        self.ids.read().clone()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.read().iter().any(|i| i == id)
    }

    pub fn len(&self) -> usize {
        self.ids.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.read().is_empty()
    }

    /// Receive the full id list after every change.
    pub fn subscribe(&self) -> broadcast::Receiver<Vec<String>> {
        self.changes.subscribe()
    }

    /// Add an id. Returns false if it was already selected.
    pub fn add(&self, id: &str) -> Result<bool, AppError> {
        self.mutate(|ids| {
            if ids.iter().any(|i| i == id) {
                false
            } else {
                ids.push(id.to_string());
                true
            }
        })
    }

    /// Remove an id. Returns false if it was not selected.
    pub fn remove(&self, id: &str) -> Result<bool, AppError> {
        self.mutate(|ids| {
            let before = ids.len();
            ids.retain(|i| i != id);
            ids.len() != before
        })
    }

    pub fn clear(&self) -> Result<bool, AppError> {
        self.mutate(|ids| {
            let changed = !ids.is_empty();
            ids.clear();
            changed
        })
    }

    /// Apply `change`; on change persist first, then publish. A failed save
    /// leaves the in-memory selection untouched.
    fn mutate(&self, change: impl FnOnce(&mut Vec<String>) -> bool) -> Result<bool, AppError> {
        let mut ids = self.ids.write();
        let mut next = ids.clone();
        if !change(&mut next) {
            return Ok(false);
        }

        self.storage
            .save(SELECTION_KEY, &serde_json::to_string(&next)?)?;
        *ids = next.clone();
        drop(ids);

        // No subscribers is fine.
        let _ = self.changes.send(next);
        Ok(true)
    }
}
