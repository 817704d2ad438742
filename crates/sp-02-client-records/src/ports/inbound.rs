//! # Inbound Ports
//!
//! Client Record Accessor API.

use async_trait::async_trait;
use shared_types::{ClientId, ClientRecord, Identity};

use crate::domain::{DocumentUpdate, NewClient, RecordError, UpdateOutcome};

/// Client Record Accessor - primary API.
#[async_trait]
pub trait RecordAccessorApi: Send + Sync {
    /// The signed-in client's own record. `NotFound` means access denied.
    async fn load(&self, identity: &Identity) -> Result<ClientRecord, RecordError>;

    /// Any client's record (admin surface).
    async fn load_client(&self, id: &ClientId) -> Result<ClientRecord, RecordError>;

    /// Apply an update to one record.
    async fn save(&self, id: &ClientId, update: DocumentUpdate)
        -> Result<UpdateOutcome, RecordError>;

    /// Onboard a client.
    async fn create(&self, id: &ClientId, new: NewClient) -> Result<ClientRecord, RecordError>;

    /// Records whose id contains `search` (case-insensitive), sorted by id.
    async fn list(&self, search: Option<&str>) -> Result<Vec<ClientRecord>, RecordError>;

    /// Remove a record. `NotFound` when absent.
    async fn delete(&self, id: &ClientId) -> Result<(), RecordError>;

    /// Toggle the legacy single-pending flag.
    async fn set_legacy_signature_needed(
        &self,
        id: &ClientId,
        needed: bool,
    ) -> Result<UpdateOutcome, RecordError>;
}
