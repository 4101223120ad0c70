use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::store::{entry_name, writable_name, ContentStore, StoreError};

/// In-process store, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated with `entries`.
    pub fn with_entries<I, N, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, D)>,
        N: Into<String>,
        D: Into<Vec<u8>>,
    {
        let map = entries
            .into_iter()
            .map(|(name, data)| (name.into(), data.into()))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(map)),
        }
    }
}

impl ContentStore for MemoryStore {
    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut names: Vec<String> = self.entries.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let key = entry_name(name)?;
        self.entries
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or(StoreError::NotFound(key))
    }

    async fn write(&self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        let key = writable_name(name)?;
        self.entries.write().await.insert(key, data.to_vec());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        let key = entry_name(name)?;
        match self.entries.write().await.remove(&key) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(key)),
        }
    }
}
