//! In-memory record store.

use crate::domain::{apply_update, ClientDocument, DocumentUpdate, StoreError, UpdateOutcome};
use crate::ports::outbound::ClientRecordStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::ClientId;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::debug;

/// In-memory `ClientRecordStore`.
///
/// `set_writes_failing(true)` simulates a write outage: every write then fails
/// with `Unavailable` and changes nothing. `write_calls()` counts write
/// attempts that reached the store, failed ones included.
#[derive(Default)]
pub struct InMemoryRecordStore {
    docs: RwLock<BTreeMap<ClientId, ClientDocument>>,
    writes_failing: AtomicBool,
    reads_failing: AtomicBool,
    write_calls: AtomicUsize,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with documents.
    pub fn with_documents(docs: impl IntoIterator<Item = (ClientId, ClientDocument)>) -> Self {
        let store = Self::new();
        store.docs.write().extend(docs);
        store
    }

    pub fn set_writes_failing(&self, failing: bool) {
        self.writes_failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_reads_failing(&self, failing: bool) {
        self.reads_failing.store(failing, Ordering::SeqCst);
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// Raw stored document, bypassing normalization.
    pub fn snapshot(&self, id: &ClientId) -> Option<ClientDocument> {
        self.docs.read().get(id).cloned()
    }

    /// Replace a document out of band, as another writer would. Not counted
    /// in `write_calls`.
    pub fn put(&self, id: ClientId, doc: ClientDocument) {
        self.docs.write().insert(id, doc);
    }

    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    fn begin_write(&self) -> Result<(), StoreError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.writes_failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("record store write outage".into()));
        }
        Ok(())
    }

    fn begin_read(&self) -> Result<(), StoreError> {
        if self.reads_failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("record store read outage".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ClientRecordStore for InMemoryRecordStore {
    async fn fetch(&self, id: &ClientId) -> Result<Option<ClientDocument>, StoreError> {
        self.begin_read()?;
        Ok(self.docs.read().get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<(ClientId, ClientDocument)>, StoreError> {
        self.begin_read()?;
        Ok(self
            .docs
            .read()
            .iter()
            .map(|(id, doc)| (id.clone(), doc.clone()))
            .collect())
    }

    async fn insert(&self, id: &ClientId, doc: ClientDocument) -> Result<(), StoreError> {
        self.begin_write()?;
        let mut docs = self.docs.write();
        if docs.contains_key(id) {
            return Err(StoreError::AlreadyExists(id.clone()));
        }
        debug!("[sp-02] Inserted document {}", id);
        docs.insert(id.clone(), doc);
        Ok(())
    }

    async fn update(
        &self,
        id: &ClientId,
        update: &DocumentUpdate,
    ) -> Result<UpdateOutcome, StoreError> {
        self.begin_write()?;
        let mut docs = self.docs.write();
        let doc = docs
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let outcome = apply_update(doc, update);
        debug!("[sp-02] Updated document {}: {:?}", id, outcome);
        Ok(outcome)
    }

    async fn remove(&self, id: &ClientId) -> Result<bool, StoreError> {
        self.begin_write()?;
        Ok(self.docs.write().remove(id).is_some())
    }
}
