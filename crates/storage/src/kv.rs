use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use decor_core::{DecorationId, DecorationRecord, LayoutId, LayoutRecord, ViewId};

use crate::error::StorageError;
use crate::traits::DecorationStorage;

const LAYOUTS_KEY: &str = "layouts";

fn decorations_key(view: ViewId) -> String {
    format!("decorations:{view}")
}

/// String-keyed text store directly reachable from the UI process.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: BTreeMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Key-value store persisted as one JSON object on disk. Every write
/// rewrites the file.
#[derive(Debug)]
pub struct FileKv {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileKv {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| StorageError::Serialization(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No key-value file yet, starting empty");
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string(&self.entries)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl KvStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// [`DecorationStorage`] over a [`KvStore`]: each view's collection and the
/// layout list are stored as JSON arrays under fixed keys.
pub struct KvStorage {
    store: Box<dyn KvStore>,
}

impl KvStorage {
    pub fn new(store: Box<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryKv::new()))
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StorageError> {
        match self.store.get(key)? {
            None => Ok(Vec::new()),
            Some(text) => serde_json::from_str(&text).map_err(|e| {
                warn!(key, error = %e, "Unreadable key-value entry");
                StorageError::Serialization(format!("{key}: {e}"))
            }),
        }
    }

    fn write_list<T: Serialize>(&mut self, key: &str, items: &[T]) -> Result<(), StorageError> {
        if items.is_empty() {
            return self.store.remove(key);
        }
        let text =
            serde_json::to_string(items).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(key, text)
    }
}

impl DecorationStorage for KvStorage {
    fn create_decoration(
        &mut self,
        view: ViewId,
        record: &DecorationRecord,
    ) -> Result<(), StorageError> {
        let key = decorations_key(view);
        let mut records: Vec<DecorationRecord> = self.read_list(&key)?;
        if records.iter().any(|r| r.id == record.id) {
            return Ok(());
        }
        records.push(record.clone());
        self.write_list(&key, &records)
    }

    fn update_decoration(
        &mut self,
        view: ViewId,
        record: &DecorationRecord,
    ) -> Result<(), StorageError> {
        let key = decorations_key(view);
        let mut records: Vec<DecorationRecord> = self.read_list(&key)?;
        let slot = records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| StorageError::NotFound(format!("decoration {} in {view}", record.id)))?;
        *slot = record.clone();
        self.write_list(&key, &records)
    }

    fn delete_decoration(&mut self, view: ViewId, id: DecorationId) -> Result<(), StorageError> {
        let key = decorations_key(view);
        let mut records: Vec<DecorationRecord> = self.read_list(&key)?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(StorageError::NotFound(format!("decoration {id} in {view}")));
        }
        self.write_list(&key, &records)
    }

    fn list_decorations(&self, view: ViewId) -> Result<Vec<DecorationRecord>, StorageError> {
        self.read_list(&decorations_key(view))
    }

    fn create_layout(&mut self, record: &LayoutRecord) -> Result<(), StorageError> {
        let mut layouts: Vec<LayoutRecord> = self.read_list(LAYOUTS_KEY)?;
        if layouts.iter().any(|l| l.id == record.id) {
            return Ok(());
        }
        layouts.push(record.clone());
        self.write_list(LAYOUTS_KEY, &layouts)
    }

    fn list_layouts(&self) -> Result<Vec<LayoutRecord>, StorageError> {
        let mut layouts: Vec<LayoutRecord> = self.read_list(LAYOUTS_KEY)?;
        layouts.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then(b.id.cmp(&a.id)));
        Ok(layouts)
    }

    fn get_layout(&self, id: LayoutId) -> Result<Option<LayoutRecord>, StorageError> {
        let layouts: Vec<LayoutRecord> = self.read_list(LAYOUTS_KEY)?;
        Ok(layouts.into_iter().find(|l| l.id == id))
    }

    fn delete_layout(&mut self, id: LayoutId) -> Result<(), StorageError> {
        let mut layouts: Vec<LayoutRecord> = self.read_list(LAYOUTS_KEY)?;
        let before = layouts.len();
        layouts.retain(|l| l.id != id);
        if layouts.len() == before {
            return Err(StorageError::NotFound(format!("layout {id}")));
        }
        self.write_list(LAYOUTS_KEY, &layouts)
    }
}
