//! In-memory storage backend

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::backend::capability::{BulkRead, StorageBackend};
use crate::error::StorageResult;

/// In-memory storage backend with the bulk-async capability shape
///
/// Useful as a host-side default and in tests. Key order of
/// [`BulkRead::get_all_keys`] is unspecified.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-populated with the given entries
    pub fn with_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }

    /// The value stored under `key`, if present
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.read().unwrap().get(key).cloned()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Whether the backend holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    fn as_bulk(&self) -> Option<&dyn BulkRead> {
        Some(self)
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.entries.write().unwrap().remove(key);
        Ok(())
    }

    async fn clear(&self) -> StorageResult<()> {
        self.entries.write().unwrap().clear();
        Ok(())
    }
}

#[async_trait]
impl BulkRead for MemoryStorage {
    async fn get_all_keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.entries.read().unwrap().keys().cloned().collect())
    }

    async fn multi_get(&self, keys: &[String]) -> StorageResult<Vec<(String, String)>> {
        let entries = self.entries.read().unwrap();
        Ok(keys
            .iter()
            .filter_map(|key| entries.get(key).map(|value| (key.clone(), value.clone())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::capability::{detect, read_all, StorageShape};

    #[test]
    fn test_detects_as_bulk_async() {
        let backend = MemoryStorage::new();
        assert_eq!(detect(&backend), Ok(StorageShape::BulkAsync));
    }

    #[tokio::test]
    async fn test_write_operations() {
        let backend = MemoryStorage::new();

        backend
            .set_item("lemon", "orange")
            .await
            .expect("Failed to set item");
        assert_eq!(backend.get("lemon"), Some("orange".to_owned()));

        backend
            .remove_item("lemon")
            .await
            .expect("Failed to remove item");
        assert_eq!(backend.get("lemon"), None);

        backend
            .set_item("lemon", "orange")
            .await
            .expect("Failed to set item");
        backend.clear().await.expect("Failed to clear");
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_read_all() {
        let backend = MemoryStorage::with_entries([
            ("a".to_owned(), "1".to_owned()),
            ("b".to_owned(), "2".to_owned()),
        ]);

        let mut entries = read_all(&backend).await.expect("Failed to read entries");
        entries.sort();
        assert_eq!(
            entries,
            vec![
                ("a".to_owned(), "1".to_owned()),
                ("b".to_owned(), "2".to_owned())
            ]
        );
    }
}
