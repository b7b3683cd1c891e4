//! Durable blob storage.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::error::StoreError;

/// Durable key-value persistence for string blobs.
///
/// `get` returns `None` for a key that has never been written. `set` replaces
/// the previous value wholesale; there is no partial update.
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Validates that a key is safe to use as a file name.
///
/// Keys must be non-empty, must not start with a dot and may only contain
/// ASCII alphanumerics, `_`, `-` and `.`; anything else could escape the
/// data directory once joined into a path.
fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey("key is empty".into()));
    }
    if key.starts_with('.') {
        return Err(StoreError::InvalidKey(format!(
            "key must not start with a dot: {key}"
        )));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err(StoreError::InvalidKey(format!(
            "key contains unsupported characters: {key}"
        )));
    }
    Ok(())
}

/// File-backed blob store: one file per key beneath a data directory.
///
/// Writes go to a temporary file in the same directory and are renamed into
/// place, so readers never observe a half-written blob.
#[derive(Debug)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Opens a file store rooted at `data_dir`, creating the directory if it
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the path exists but is not a directory, or if
    /// the directory cannot be created.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();

        if data_dir.exists() && !data_dir.is_dir() {
            return Err(StoreError::InvalidDataDir(format!(
                "not a directory: {}",
                data_dir.display()
            )));
        }
        fs::create_dir_all(&data_dir).map_err(StoreError::DataDirCreation)?;

        Ok(Self { data_dir })
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(key)
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;

        match fs::read_to_string(self.blob_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Read(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;

        let final_path = self.blob_path(key);
        let tmp_path = self.data_dir.join(format!("{key}.tmp"));

        fs::write(&tmp_path, value).map_err(StoreError::Write)?;
        fs::rename(&tmp_path, &final_path).map_err(StoreError::Write)?;

        Ok(())
    }
}

/// In-memory blob store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        let blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        let mut blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
