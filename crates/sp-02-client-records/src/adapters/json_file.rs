//! JSON file record store.
//!
//! The whole collection lives in one pretty-printed JSON file:
//!
//! ```json
//! { "clients": { "smith@evans-portal.com": { "folderId": "F1", ... } } }
//! ```
//!
//! ## Writers
//!
//! The portal and the admin tool run as separate processes over the same
//! file. Every read-modify-write cycle holds an exclusive `fs2` lock on a
//! sibling `<file>.lock`, so set-additive and set-subtractive updates from
//! different handles never overwrite each other.
//!
//! Each write goes to its own temp file in the same directory, which is then
//! persisted over the original. A crash mid-write leaves the previous
//! collection intact and readers never see a partial file, so reads take no
//! lock.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use shared_types::ClientId;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::domain::{apply_update, ClientDocument, DocumentUpdate, StoreError, UpdateOutcome};
use crate::ports::outbound::ClientRecordStore;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Collection {
    #[serde(default)]
    clients: BTreeMap<ClientId, ClientDocument>,
}

/// File-backed `ClientRecordStore`.
pub struct JsonFileRecordStore {
    path: PathBuf,
}

impl JsonFileRecordStore {
    /// Store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Collection, StoreError> {
        let path = self.path.clone();
        blocking(move || read_collection(&path)).await
    }

    /// Runs `f` on the collection under the exclusive lock. The collection is
    /// written back only when `f` reports a change.
    async fn modify<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Collection) -> Result<(T, bool), StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        blocking(move || {
            let _lock = CollectionLock::acquire(&path)?;
            let mut collection = read_collection(&path)?;
            let (value, changed) = f(&mut collection)?;
            if changed {
                write_collection(&path, &collection)?;
            }
            Ok(value)
        })
        .await
    }
}

async fn blocking<T, F>(f: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Io(format!("store task: {e}")))?
}

fn io_error(path: &Path, e: impl std::fmt::Display) -> StoreError {
    StoreError::Io(format!("{}: {e}", path.display()))
}

fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

/// Exclusive advisory lock on `<file>.lock`, released on drop.
struct CollectionLock {
    file: File,
}

impl CollectionLock {
    fn acquire(path: &Path) -> Result<Self, StoreError> {
        let dir = parent_dir(path);
        std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;

        let mut name = path.as_os_str().to_owned();
        name.push(".lock");
        let lock_path = PathBuf::from(name);

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| io_error(&lock_path, e))?;
        FileExt::lock_exclusive(&file).map_err(|e| io_error(&lock_path, e))?;
        Ok(Self { file })
    }
}

impl Drop for CollectionLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn read_collection(path: &Path) -> Result<Collection, StoreError> {
    match std::fs::read(path) {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Collection::default()),
        Ok(bytes) => serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display()))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Collection::default()),
        Err(e) => Err(io_error(path, e)),
    }
}

fn write_collection(path: &Path, collection: &Collection) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(collection)
        .map_err(|e| StoreError::Io(format!("serialize: {e}")))?;

    let dir = parent_dir(path);
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| io_error(dir, e))?;
    tmp.write_all(&json).map_err(|e| io_error(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| io_error(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| io_error(path, e.error))?;

    debug!("[sp-02] Wrote {} documents to {}", collection.clients.len(), path.display());
    Ok(())
}

#[async_trait]
impl ClientRecordStore for JsonFileRecordStore {
    async fn fetch(&self, id: &ClientId) -> Result<Option<ClientDocument>, StoreError> {
        let mut collection = self.read().await?;
        Ok(collection.clients.remove(id))
    }

    async fn list(&self) -> Result<Vec<(ClientId, ClientDocument)>, StoreError> {
        Ok(self.read().await?.clients.into_iter().collect())
    }

    async fn insert(&self, id: &ClientId, doc: ClientDocument) -> Result<(), StoreError> {
        let id = id.clone();
        self.modify(move |collection| {
            if collection.clients.contains_key(&id) {
                return Err(StoreError::AlreadyExists(id));
            }
            collection.clients.insert(id, doc);
            Ok(((), true))
        })
        .await
    }

    async fn update(
        &self,
        id: &ClientId,
        update: &DocumentUpdate,
    ) -> Result<UpdateOutcome, StoreError> {
        let id = id.clone();
        let update = update.clone();
        self.modify(move |collection| {
            let doc = collection
                .clients
                .get_mut(&id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            let outcome = apply_update(doc, &update);
            Ok((outcome, outcome.applied))
        })
        .await
    }

    async fn remove(&self, id: &ClientId) -> Result<bool, StoreError> {
        let id = id.clone();
        self.modify(move |collection| {
            let removed = collection.clients.remove(&id).is_some();
            Ok((removed, removed))
        })
        .await
    }
}
