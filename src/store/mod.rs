//! Persistence for the single tracked plant state.
//!
//! The store holds one record, `{"status": "inside" | "outside"}`. Reads
//! never fail from the caller's point of view: a missing, unreadable or
//! corrupt record means the plants are inside.

use crate::core::PlantState;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub mod error;

pub use error::StoreError;

/// Default location of the state file.
pub const DEFAULT_STATE_FILE: &str = "plant_status.json";

/// Narrow key-value capability for the persisted state.
pub trait StateStore {
    /// Last persisted state, or `Inside` when there is none.
    fn get(&self) -> PlantState;

    /// Overwrite the persisted state.
    fn set(&self, state: PlantState) -> Result<(), StoreError>;
}

/// On-disk record format.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    #[serde(default)]
    pub status: PlantState,
}

/// JSON file store with atomic replace-on-write.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw record. `Ok(None)` when the file does not exist.
    pub fn read(&self) -> Result<Option<PlantState>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let record: StatusRecord =
            serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        Ok(Some(record.status))
    }

    /// Write the record to a temporary sibling file, then rename it over the
    /// target. The temporary file is removed if anything fails before the rename.
    pub fn write(&self, state: PlantState) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let body = serde_json::to_vec(&StatusRecord { status: state })
            .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&body).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl StateStore for JsonFileStore {
    fn get(&self) -> PlantState {
        match self.read() {
            Ok(Some(state)) => state,
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "No state file, assuming inside");
                PlantState::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable state, assuming inside");
                PlantState::default()
            }
        }
    }

    fn set(&self, state: PlantState) -> Result<(), StoreError> {
        self.write(state)?;
        tracing::debug!(path = %self.path.display(), state = %state, "State persisted");
        Ok(())
    }
}

/// In-process store, shared between clones.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Option<PlantState>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: PlantState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(state))),
        }
    }

    /// Raw stored value, `None` if never written.
    pub fn stored(&self) -> Option<PlantState> {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StateStore for MemoryStore {
    fn get(&self) -> PlantState {
        self.stored().unwrap_or_default()
    }

    fn set(&self, state: PlantState) -> Result<(), StoreError> {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = Some(state);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("state.json"))
    }

    #[test]
    fn missing_file_loads_inside() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.read().unwrap().is_none());
        assert_eq!(store.get(), PlantState::Inside);
    }

    #[test]
    fn saved_state_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.set(PlantState::Outside).unwrap();
        assert_eq!(store.get(), PlantState::Outside);

        store.set(PlantState::Inside).unwrap();
        assert_eq!(store.get(), PlantState::Inside);
    }

    #[test]
    fn file_format_is_status_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.set(PlantState::Outside).unwrap();
        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({"status": "outside"}));
    }

    #[test]
    fn corrupt_json_loads_inside() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(store.read(), Err(StoreError::Corrupt { .. })));
        assert_eq!(store.get(), PlantState::Inside);
    }

    #[test]
    fn unknown_status_loads_inside() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), r#"{"status": "greenhouse"}"#).unwrap();

        assert!(store.read().is_err());
        assert_eq!(store.get(), PlantState::Inside);
    }

    #[test]
    fn record_without_status_loads_inside() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{}").unwrap();

        assert_eq!(store.read().unwrap(), Some(PlantState::Inside));
    }

    #[test]
    fn write_leaves_no_temporary_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.set(PlantState::Outside).unwrap();
        store.set(PlantState::Inside).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nope").join("state.json"));

        let result = store.set(PlantState::Outside);
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }

    #[test]
    fn memory_store_defaults_to_inside() {
        let store = MemoryStore::new();
        assert_eq!(store.stored(), None);
        assert_eq!(store.get(), PlantState::Inside);
    }

    #[test]
    fn memory_store_clones_share_state() {
        let store = MemoryStore::new();
        let clone = store.clone();

        clone.set(PlantState::Outside).unwrap();
        assert_eq!(store.get(), PlantState::Outside);
    }
}
