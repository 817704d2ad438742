//! # Outbound Ports
//!
//! The remote record datastore.

use async_trait::async_trait;
use shared_types::ClientId;

use crate::domain::{ClientDocument, DocumentUpdate, StoreError, UpdateOutcome};

/// Client record store - outbound port.
///
/// Documents are never overwritten after creation; every change goes through
/// `update`.
#[async_trait]
pub trait ClientRecordStore: Send + Sync {
    /// Read one document.
    async fn fetch(&self, id: &ClientId) -> Result<Option<ClientDocument>, StoreError>;

    /// All documents, ordered by key.
    async fn list(&self) -> Result<Vec<(ClientId, ClientDocument)>, StoreError>;

    /// Create a document. Fails `AlreadyExists` if the key is taken.
    async fn insert(&self, id: &ClientId, doc: ClientDocument) -> Result<(), StoreError>;

    /// Apply an update atomically. Fails `NotFound` if the key is absent.
    async fn update(
        &self,
        id: &ClientId,
        update: &DocumentUpdate,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Delete a document. Returns whether it existed.
    async fn remove(&self, id: &ClientId) -> Result<bool, StoreError>;
}
