//! In-memory backend.

use std::collections::HashMap;

use super::{KeyValueStore, StorageError};

/// Map-backed storage, optionally capped like browser local storage.
///
/// The quota counts key and value bytes across all entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects writes once `limit` bytes would be exceeded.
    #[must_use]
    pub fn with_quota(limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(limit),
        }
    }

    /// Change the quota; `None` removes it. Existing entries are kept.
    pub fn set_quota(&mut self, quota: Option<usize>) {
        self.quota = quota;
    }

    /// Bytes in use, excluding the entry under `except`.
    fn used_bytes(&self, except: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != except)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota {
            let required = self.used_bytes(key) + key.len() + value.len();
            if required > limit {
                return Err(StorageError::QuotaExceeded { limit, required });
            }
        }
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}
