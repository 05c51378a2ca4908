//! Key-value storage primitive.
//!
//! The planner persists everything as whole string values under a handful of
//! well-known keys. Values are always read and written wholesale.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::NamedTempFile;

use crate::Result;

pub const TASKS_KEY: &str = "planner_tasks";
pub const DURATION_FORMAT_KEY: &str = "planner_duration_format";
pub const THEME_KEY: &str = "planner_theme";

/// Whole-value string storage addressed by key.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// Stores each key as a file under `dir`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.item_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        // Readers see either the old value or the new one, never a torn write.
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.flush()?;
        tmp.persist(self.item_path(key)).map_err(|e| e.error)?;
        tracing::debug!(key, bytes = value.len(), "stored item");
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.item_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-process storage that forgets everything when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_missing_key_is_none() {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::new(temp.path());
        assert_eq!(storage.get_item(TASKS_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_storage_creates_dir_and_overwrites() {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(temp.path().join("nested"));
        storage.set_item(THEME_KEY, "light").unwrap();
        storage.set_item(THEME_KEY, "dark").unwrap();
        assert_eq!(storage.get_item(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_file_storage_remove_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(temp.path());
        storage.set_item(TASKS_KEY, "[]").unwrap();
        storage.remove_item(TASKS_KEY).unwrap();
        storage.remove_item(TASKS_KEY).unwrap();
        assert_eq!(storage.get_item(TASKS_KEY).unwrap(), None);
    }

    #[test]
    fn test_memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }
}
