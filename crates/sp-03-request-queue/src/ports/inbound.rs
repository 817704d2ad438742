//! # Inbound Ports
//!
//! Request Queue Manager API.

use async_trait::async_trait;
use shared_types::{ClientId, FolderRef, RequestId, SignatureRequest};

use crate::domain::QueueError;

/// Request Queue Manager - primary API.
///
/// Requests are targeted by id only. Two requests may share a name.
#[async_trait]
pub trait RequestQueueApi: Send + Sync {
    /// Queue a new request. `folder` defaults to the client's primary folder
    /// when absent or empty.
    async fn add_request(
        &self,
        client: &ClientId,
        name: &str,
        folder: Option<FolderRef>,
    ) -> Result<SignatureRequest, QueueError>;

    /// Remove a pending request. Returns `false` if it was already gone.
    async fn cancel_request(
        &self,
        client: &ClientId,
        request: &RequestId,
    ) -> Result<bool, QueueError>;

    /// Pending requests in insertion order.
    async fn list_pending(&self, client: &ClientId) -> Result<Vec<SignatureRequest>, QueueError>;
}
