//! Durable storage backed by a JSON file.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::{Storage, StorageError};

/// File name used inside the data directory.
pub const STORAGE_FILE_NAME: &str = "storage.json";

/// Durable storage persisted as a single JSON object on disk.
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename, so readers never observe a half-written file. Access within one
/// process is serialized; separate processes are not coordinated.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

type Items = BTreeMap<String, String>;

impl FileStorage {
    /// Create a store at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Create a store named [`STORAGE_FILE_NAME`] inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(STORAGE_FILE_NAME))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_items(&self) -> Result<Items, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Items::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if raw.trim().is_empty() {
            return Ok(Items::new());
        }

        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_items(&self, items: &Items) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let body = serde_json::to_string_pretty(items).map_err(StorageError::Encode)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_items()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.read_items()?;
        items.insert(key.to_owned(), value.to_owned());
        self.write_items(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.read_items()?;
        if items.remove(key).is_some() {
            self.write_items(&items)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("bazaar-storage-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let storage = FileStorage::in_dir(temp_dir());
        assert_eq!(storage.get_item("token").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = temp_dir();
        FileStorage::in_dir(&dir).set_item("token", "abc.def.ghi").unwrap();

        let reopened = FileStorage::in_dir(&dir);
        assert_eq!(
            reopened.get_item("token").unwrap().as_deref(),
            Some("abc.def.ghi")
        );

        reopened.remove_item("token").unwrap();
        assert_eq!(FileStorage::in_dir(&dir).get_item("token").unwrap(), None);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_keys_are_independent() {
        let dir = temp_dir();
        let storage = FileStorage::in_dir(&dir);
        storage.set_item("token", "t").unwrap();
        storage.set_item("cart", "[]").unwrap();
        storage.remove_item("token").unwrap();

        assert_eq!(storage.get_item("cart").unwrap().as_deref(), Some("[]"));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();
        let storage = FileStorage::in_dir(&dir);
        fs::write(storage.path(), "not json").unwrap();

        assert!(matches!(
            storage.get_item("cart"),
            Err(StorageError::Corrupt { .. })
        ));
        fs::remove_dir_all(dir).unwrap();
    }
}
