//! Per-name locking around any store.
//!
//! Reads of a name share its lock; writes and deletes of a name take it
//! exclusively. Different names never contend. Listing takes no lock.
//! A name's lock is dropped from the table once no operation holds it.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::store::{entry_name, ContentStore, StoreError};

type NameLock = Arc<RwLock<()>>;

#[derive(Debug)]
pub struct LockedStore<S> {
    inner: S,
    locks: DashMap<String, NameLock>,
}

impl<S: ContentStore> LockedStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            locks: DashMap::new(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of names that currently have a lock in the table.
    pub fn tracked_names(&self) -> usize {
        self.locks.len()
    }

    fn lock_for(&self, key: &str) -> NameLock {
        Arc::clone(&self.locks.entry(key.to_string()).or_default())
    }

    /// Drops the caller's handle and evicts the entry if nobody else holds it.
    fn release(&self, key: &str, lock: NameLock) {
        drop(lock);
        // The shard stays locked during the check, so no new handle can be
        // cloned out between the count and the removal.
        self.locks.remove_if(key, |_, l| Arc::strong_count(l) == 1);
    }
}

impl<S: ContentStore> ContentStore for LockedStore<S> {
    async fn list(&self) -> Result<Vec<String>, StoreError> {
        self.inner.list().await
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let key = entry_name(name)?;
        let lock = self.lock_for(&key);
        let result = {
            let _guard = lock.read().await;
            self.inner.read(name).await
        };
        self.release(&key, lock);
        result
    }

    async fn write(&self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        let key = entry_name(name)?;
        let lock = self.lock_for(&key);
        let result = {
            let _guard = lock.write().await;
            self.inner.write(name, data).await
        };
        self.release(&key, lock);
        result
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        let key = entry_name(name)?;
        let lock = self.lock_for(&key);
        let result = {
            let _guard = lock.write().await;
            self.inner.delete(name).await
        };
        self.release(&key, lock);
        result
    }
}
