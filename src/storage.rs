use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::errors::TrackerError;
use crate::expenses::Expense;

/// Key under which the whole collection is kept.
pub const STORAGE_KEY: &str = "expenses";

/// A single durable slot holding a snapshot of every expense.
pub trait SnapshotStorage {
    /// Missing or unreadable data loads as an empty collection.
    fn load(&self) -> Vec<Expense>;

    /// Replaces the stored snapshot with `records`.
    fn save(&mut self, records: &[Expense]) -> Result<(), TrackerError>;
}

fn decode(blob: &str, origin: &str) -> Vec<Expense> {
    match serde_json::from_str(blob) {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!("ignoring malformed expense data in {origin}: {err}");
            Vec::new()
        }
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_key(dir, STORAGE_KEY)
    }

    pub fn with_key(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStorage for JsonFileStorage {
    fn load(&self) -> Vec<Expense> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no expenses stored at {}, starting empty", self.path.display());
                return Vec::new();
            }
            Err(err) => {
                tracing::warn!("could not read {}: {err}", self.path.display());
                return Vec::new();
            }
        };
        let records = decode(&content, &self.path.display().to_string());
        tracing::debug!("loaded {} expenses from {}", records.len(), self.path.display());
        records
    }

    fn save(&mut self, records: &[Expense]) -> Result<(), TrackerError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(records)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, payload)?;
        fs::rename(&staging, &self.path)?;
        tracing::debug!("saved {} expenses to {}", records.len(), self.path.display());
        Ok(())
    }
}

/// Keeps the snapshot in memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blob: Rc<RefCell<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Rc::new(RefCell::new(Some(blob.into()))),
        }
    }

    /// The raw serialized snapshot, if anything has been written.
    pub fn blob(&self) -> Option<String> {
        self.blob.borrow().clone()
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self) -> Vec<Expense> {
        match self.blob.borrow().as_deref() {
            Some(blob) => decode(blob, "memory"),
            None => Vec::new(),
        }
    }

    fn save(&mut self, records: &[Expense]) -> Result<(), TrackerError> {
        let payload = serde_json::to_string(records)?;
        *self.blob.borrow_mut() = Some(payload);
        Ok(())
    }
}

/// Loads nothing and refuses every write, like a full disk.
#[cfg(test)]
pub struct FailingStorage;

#[cfg(test)]
impl SnapshotStorage for FailingStorage {
    fn load(&self) -> Vec<Expense> {
        Vec::new()
    }

    fn save(&mut self, _records: &[Expense]) -> Result<(), TrackerError> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
    }
}
