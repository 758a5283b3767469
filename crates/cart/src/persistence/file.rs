//! Directory-backed storage, one JSON file per key.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use url::form_urlencoded;

use super::{KeyValueStore, StorageError};

/// Stores each key as `<dir>/<escaped key>.json`.
///
/// Writes go to a temp file in the same directory that is then persisted
/// over the target, so a crash mid-write leaves the previous snapshot intact.
/// A failed write drops the temp file.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the storage directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "Opened file store");
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    ///
    /// The key is form-urlencoded, so distinct keys never share a file and
    /// `@ignite-coffee-delivery:products-state-1.0.0` maps to
    /// `%40ignite-coffee-delivery%3Aproducts-state-1.0.0.json`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKey` for an empty key or one made only of dots.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.chars().all(|c| c == '.') {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }

        let name: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();

        Ok(self.dir.join(format!("{name}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StorageError::Io(e.error))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
