//! Storage backend traits, capability shapes, and the read strategy
//!
//! A backend always implements the three write operations. For the one-time
//! prepare read it additionally exposes exactly one of two capability sets:
//! the bulk-async shape (`get_all_keys` + `multi_get`) or the indexed-sync
//! shape (`len` + `key` + `get_item`). Detection is a match over the
//! capability accessors; a backend exposing neither set is unsupported.

use async_trait::async_trait;

use crate::error::{StorageError, StorageResult};

/// A pluggable storage backend
///
/// The host owns the backend; the adapter never constructs or destroys it.
/// Override one of the capability accessors to make the backend readable
/// during prepare.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// The bulk-async read capability, if this backend has it
    fn as_bulk(&self) -> Option<&dyn BulkRead> {
        None
    }

    /// The indexed-sync read capability, if this backend has it
    fn as_indexed(&self) -> Option<&dyn IndexedRead> {
        None
    }

    /// Persist a key/value pair
    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key
    async fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// Remove every entry
    async fn clear(&self) -> StorageResult<()>;
}

/// Bulk-async read capability: fetch all keys, then batch-fetch their values
#[async_trait]
pub trait BulkRead: Send + Sync {
    /// All keys currently in the store
    async fn get_all_keys(&self) -> StorageResult<Vec<String>>;

    /// The `(key, value)` pairs for the given keys, in order
    async fn multi_get(&self, keys: &[String]) -> StorageResult<Vec<(String, String)>>;
}

/// Indexed-sync read capability: a length plus positional key lookup
pub trait IndexedRead: Send + Sync {
    /// Number of entries in the store
    fn len(&self) -> usize;

    /// Whether the store holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The key at the given index, if the index is in range
    fn key(&self, index: usize) -> Option<String>;

    /// The value stored under the given key, if present
    fn get_item(&self, key: &str) -> Option<String>;
}

/// The capability shape a backend was classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageShape {
    /// `get_all_keys` + `multi_get`, both asynchronous
    BulkAsync,
    /// `len` + `key` + `get_item`, all synchronous
    IndexedSync,
}

/// Classify a backend into one of the supported capability shapes
///
/// The bulk-async shape wins when a backend exposes both.
pub fn detect(backend: &dyn StorageBackend) -> StorageResult<StorageShape> {
    if backend.as_bulk().is_some() {
        Ok(StorageShape::BulkAsync)
    } else if backend.as_indexed().is_some() {
        Ok(StorageShape::IndexedSync)
    } else {
        Err(StorageError::UnsupportedFormat)
    }
}

/// Read every entry of the store using whichever capability the backend has
///
/// The indexed-sync walk skips a key whose value has vanished between the
/// `key` and `get_item` calls.
pub async fn read_all(backend: &dyn StorageBackend) -> StorageResult<Vec<(String, String)>> {
    if let Some(bulk) = backend.as_bulk() {
        let keys = bulk.get_all_keys().await?;
        return bulk.multi_get(&keys).await;
    }

    if let Some(indexed) = backend.as_indexed() {
        let mut entries = Vec::with_capacity(indexed.len());
        for index in 0..indexed.len() {
            if let Some(key) = indexed.key(index) {
                if let Some(value) = indexed.get_item(&key) {
                    entries.push((key, value));
                }
            }
        }
        return Ok(entries);
    }

    Err(StorageError::UnsupportedFormat)
}
