//! Durable snapshot of the cart.
//!
//! # Layout
//!
//! The whole cart lives under one key (by default
//! `@ignite-coffee-delivery:products-state-1.0.0`) as a JSON array of line
//! items. Bumping the version suffix of the key resets every stored cart.
//!
//! # Backends
//!
//! - [`FileStore`] - One file per key inside a directory
//! - [`MemoryStore`] - In-process map with an optional byte quota
//!
//! Both implement [`KeyValueStore`], a synchronous get/set/remove primitive.
//! [`CartPersistence`] layers JSON encoding on top and owns the fail-open
//! policy for reads.

mod file;
mod memory;

use std::collections::HashSet;

use coffee_delivery_core::CartLineItem;
use thiserror::Error;
use tracing::instrument;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Default snapshot key.
pub const DEFAULT_CART_KEY: &str = "@ignite-coffee-delivery:products-state-1.0.0";

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing the value would exceed the backend's capacity.
    #[error("storage quota exceeded: {required} bytes needed, limit is {limit}")]
    QuotaExceeded { limit: usize, required: usize },

    /// Key cannot be mapped onto the backend.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// Errors raised while writing a snapshot.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Backend rejected the write.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cart could not be encoded.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Synchronous string key-value storage.
///
/// Serialization is the caller's concern; backends only move strings.
pub trait KeyValueStore {
    /// Read the value stored under `key`. Returns `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// JSON snapshot of the cart stored under a fixed key.
#[derive(Debug)]
pub struct CartPersistence<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> CartPersistence<S> {
    /// Bind a backend to a snapshot key.
    pub fn new(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Bind a backend to [`DEFAULT_CART_KEY`].
    pub fn with_default_key(backend: S) -> Self {
        Self::new(backend, DEFAULT_CART_KEY)
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    pub const fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    /// Release the backend, e.g. to reopen a store over it.
    pub fn into_backend(self) -> S {
        self.backend
    }

    /// Load the stored cart.
    ///
    /// Never fails: an absent key, an unreadable backend, or a value that
    /// does not parse all yield an empty cart. Line items repeating an
    /// earlier product ID are dropped.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn load(&self) -> Vec<CartLineItem> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No stored cart, starting empty");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored cart, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
            Ok(items) => {
                let items = dedupe(items);
                tracing::debug!(lines = items.len(), "Loaded stored cart");
                items
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stored cart is malformed, starting empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the stored cart with `items`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if encoding or the backend write fails.
    #[instrument(skip(self, items), fields(key = %self.key, lines = items.len()))]
    pub fn save(&mut self, items: &[CartLineItem]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(items)?;
        self.backend.set(&self.key, &json)?;
        tracing::debug!(bytes = json.len(), "Saved cart snapshot");
        Ok(())
    }

    /// Delete the stored cart.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the backend cannot remove the key.
    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.backend.remove(&self.key)?;
        Ok(())
    }
}

/// Keep the first line item per product ID.
fn dedupe(items: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut seen = HashSet::with_capacity(items.len());
    let before = items.len();
    let kept: Vec<_> = items
        .into_iter()
        .filter(|item| seen.insert(item.id().clone()))
        .collect();

    if kept.len() != before {
        tracing::warn!(
            dropped = before - kept.len(),
            "Stored cart repeated product ids, keeping first occurrence"
        );
    }
    kept
}
