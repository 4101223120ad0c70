//! Content store
//!
//! A flat namespace of named byte blobs. Names are reduced to their
//! basename before they reach a backend, so `a/b/c.txt` and `c.txt` refer to
//! the same entry.

pub mod dir;
pub mod locked;
pub mod memory;

use std::future::Future;
use std::path::Path;

use thiserror::Error;

pub use dir::DirStore;
pub use locked::LockedStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no entry named {0:?}")]
    NotFound(String),
    #[error("invalid entry name {0:?}")]
    InvalidName(String),
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Backend for the file operations the router exposes.
pub trait ContentStore: Send + Sync + 'static {
    fn list(&self) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;

    fn read(&self, name: &str) -> impl Future<Output = Result<Vec<u8>, StoreError>> + Send;

    fn write(&self, name: &str, data: &[u8]) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn delete(&self, name: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Reduces a name to its basename, rejecting names that have none.
pub fn entry_name(name: &str) -> Result<String, StoreError> {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .ok_or_else(|| StoreError::InvalidName(name.to_string()))
}

/// Like [`entry_name`], but also refuses hidden (dot) names, which no
/// backend lists.
pub fn writable_name(name: &str) -> Result<String, StoreError> {
    let name = entry_name(name)?;
    if name.starts_with('.') {
        return Err(StoreError::InvalidName(name));
    }
    Ok(name)
}
