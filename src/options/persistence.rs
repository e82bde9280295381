use crate::options::model::{ListKind, OptionEntry, OptionList};
use crate::utils::error_handling::{CraftError, CraftResult};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Scoped string key-value storage backing the option lists
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> CraftResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> CraftResult<()>;
    fn remove(&self, key: &str) -> CraftResult<()>;
}

/// In-process store, used by tests and the memory backend
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> CraftResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| CraftError::persist("memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CraftResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CraftResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CraftResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per record under a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    data_directory: PathBuf,
}

impl FileStore {
    pub fn new(data_directory: impl Into<PathBuf>) -> CraftResult<Self> {
        let data_directory = data_directory.into();
        fs::create_dir_all(&data_directory)?;
        Ok(FileStore { data_directory })
    }

    pub fn data_directory(&self) -> &Path {
        &self.data_directory
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.data_directory.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> CraftResult<Option<String>> {
        let path = self.record_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&self, key: &str, value: &str) -> CraftResult<()> {
        let path = self.record_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> CraftResult<()> {
        let path = self.record_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// Why a read fell back to the bootstrap defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    Missing,
    Malformed(String),
    Unreadable(String),
}

impl Fallback {
    /// Diagnostic form of the fallback; a missing record is not an error
    pub fn as_error(&self) -> Option<CraftError> {
        match self {
            Fallback::Missing => None,
            Fallback::Malformed(reason) => Some(CraftError::parse(reason)),
            Fallback::Unreadable(reason) => Some(CraftError::parse(reason)),
        }
    }
}

/// Result of reading one list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    pub options: OptionList,
    pub fallback: Option<Fallback>,
}

impl Loaded {
    fn defaults(kind: ListKind, fallback: Fallback) -> Self {
        Loaded {
            options: kind.defaults(),
            fallback: Some(fallback),
        }
    }
}

/// Reads and writes whole option lists through a shared store handle
#[derive(Clone)]
pub struct PersistenceAdapter {
    store: Arc<dyn KeyValueStore>,
}

impl PersistenceAdapter {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        PersistenceAdapter { store }
    }

    /// Adapter over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    /// Read the list for `kind`. Never fails: anything but a valid record
    /// yields the bootstrap defaults with the reason attached.
    pub fn read(&self, kind: ListKind) -> Loaded {
        let raw = match self.store.get(kind.storage_key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Loaded::defaults(kind, Fallback::Missing),
            Err(e) => return Loaded::defaults(kind, Fallback::Unreadable(e.to_string())),
        };

        match Self::decode(&raw) {
            Ok(options) => Loaded {
                options: dedup_labels(kind, options),
                fallback: None,
            },
            Err(e) => Loaded::defaults(kind, Fallback::Malformed(e.to_string())),
        }
    }

    /// Overwrite the record for `kind` with the full list
    pub fn write(&self, kind: ListKind, options: &[OptionEntry]) -> CraftResult<()> {
        let content = serde_json::to_string(options)
            .map_err(|e| CraftError::persist(&format!("Failed to serialize {} options: {}", kind, e)))?;

        self.store
            .set(kind.storage_key(), &content)
            .map_err(|e| CraftError::persist(&format!("Failed to write {} options: {}", kind, e)))?;

        log::debug!("Persisted {} {} options", options.len(), kind);
        Ok(())
    }

    /// Drop the record for `kind`, so the next read yields defaults
    pub fn clear(&self, kind: ListKind) -> CraftResult<()> {
        self.store
            .remove(kind.storage_key())
            .map_err(|e| CraftError::persist(&format!("Failed to clear {} options: {}", kind, e)))
    }

    fn decode(raw: &str) -> Result<OptionList, serde_json::Error> {
        serde_json::from_str::<OptionList>(raw)
    }
}

/// Collapse repeated labels from hand-edited records, keeping the first
fn dedup_labels(kind: ListKind, options: OptionList) -> OptionList {
    let before = options.len();
    let mut seen = HashSet::new();
    let options: OptionList = options
        .into_iter()
        .filter(|entry| seen.insert(entry.label().to_string()))
        .collect();

    if options.len() != before {
        log::warn!("Dropped {} duplicate {} options from storage", before - options.len(), kind);
    }
    options
}
