//! Implementaciones de [`DurableStorage`].
//!
//! * [`FileStorage`]: un único archivo JSON plano `{clave: valor}`, escrito de forma
//!   atómica (archivo temporal + rename).
//! * [`MemoryStorage`]: mapa en memoria, para tests y entornos sin disco.


use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};
use super::domain::{DurableStorage, StorageError};


type Entries = BTreeMap<String, String>;


#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializa lectura-modificación-escritura dentro del proceso.
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Entries, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| StorageError::Corrupted(format!("{}: {e}", self.path.display())))
    }

    fn persist(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), entries = entries.len(), "Debug: almacenamiento escrito");
        Ok(())
    }

    fn modify<F>(&self, reset_if_corrupted: bool, change: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut Entries),
    {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut entries = match self.load() {
            Ok(entries) => entries,
            Err(StorageError::Corrupted(reason)) if reset_if_corrupted => {
                warn!("Warn: almacenamiento corrupto, se reinicia: {reason}");
                Entries::new()
            }
            Err(e) => return Err(e),
        };

        change(&mut entries);
        self.persist(&entries)
    }
}

impl DurableStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_items(&[(key, value)])
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.remove_items(&[key])
    }

    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageError> {
        self.modify(false, |entries| {
            for (key, value) in items {
                entries.insert(key.to_string(), value.to_string());
            }
        })
    }

    fn remove_items(&self, keys: &[&str]) -> Result<(), StorageError> {
        self.modify(true, |entries| {
            for key in keys {
                entries.remove(*key);
            }
        })
    }
}


#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        let map = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { entries: Mutex::new(map) }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DurableStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }

    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut entries = self.entries();
        for (key, value) in items {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}
