//! Directory-backed content store.
//!
//! Entries live as regular files somewhere below `root`. Lookups go by
//! basename: the direct child is tried first, then the tree is searched.
//! Writing a name that already exists replaces that file in place; new
//! names are written directly under `root`.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs;

use crate::store::{entry_name, writable_name, ContentStore, StoreError};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the root directory if it does not exist yet.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self::new(root);
        fs::create_dir_all(&store.root).await?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All regular, non-hidden files below the root.
    async fn walk(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut files = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                if is_hidden(&entry.file_name()) {
                    continue;
                }
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() {
                    files.push(entry.path());
                }
            }
        }

        Ok(files)
    }

    /// Path of the file whose basename is `name`, if any.
    async fn locate(&self, name: &str) -> Result<Option<PathBuf>, StoreError> {
        let direct = self.root.join(name);
        if fs::metadata(&direct).await.is_ok_and(|m| m.is_file()) {
            return Ok(Some(direct));
        }

        Ok(self
            .walk()
            .await?
            .into_iter()
            .find(|path| path.file_name().is_some_and(|n| n == name)))
    }

    /// Every file whose basename is `name`.
    async fn locate_all(&self, name: &str) -> Result<Vec<PathBuf>, StoreError> {
        Ok(self
            .walk()
            .await?
            .into_iter()
            .filter(|path| path.file_name().is_some_and(|n| n == name))
            .collect())
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

impl ContentStore for DirStore {
    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let names: BTreeSet<String> = self
            .walk()
            .await?
            .iter()
            .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
            .collect();
        Ok(names.into_iter().collect())
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let name = entry_name(name)?;
        let Some(path) = self.locate(&name).await? else {
            return Err(StoreError::NotFound(name));
        };

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(name)),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        let name = writable_name(name)?;
        let target = match self.locate(&name).await? {
            Some(existing) => existing,
            None => self.root.join(&name),
        };
        let dir = target.parent().unwrap_or(&self.root);

        // Write aside and rename so readers see either the old or the new blob.
        let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let temp = dir.join(format!(".{}.{}.{}.tmp", name, std::process::id(), seq));

        fs::write(&temp, data).await?;
        if let Err(e) = fs::rename(&temp, &target).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }

        Ok(())
    }

    /// Removes every file carrying the basename, so no stale copy in another
    /// directory can resurface.
    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        let name = entry_name(name)?;

        let mut removed = 0;
        for path in self.locate_all(&name).await? {
            match fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        if removed == 0 {
            return Err(StoreError::NotFound(name));
        }
        Ok(())
    }
}
