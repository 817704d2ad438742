//! # Request Queue Service

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{ClientId, Clock, FolderRef, RequestId, SignatureRequest};
use sp_02_client_records::{DocumentUpdate, RecordAccessorApi};
use tracing::{info, warn};

use crate::domain::{QueueError, RequestIdGenerator};
use crate::ports::inbound::RequestQueueApi;

/// Request Queue Manager.
pub struct RequestQueueService {
    records: Arc<dyn RecordAccessorApi>,
    ids: RequestIdGenerator,
}

impl RequestQueueService {
    pub fn new(records: Arc<dyn RecordAccessorApi>, clock: Arc<dyn Clock>) -> Self {
        Self {
            records,
            ids: RequestIdGenerator::new(clock),
        }
    }
}

#[async_trait]
impl RequestQueueApi for RequestQueueService {
    async fn add_request(
        &self,
        client: &ClientId,
        name: &str,
        folder: Option<FolderRef>,
    ) -> Result<SignatureRequest, QueueError> {
        let name = name.trim();
        if name.is_empty() {
            warn!(client = %client, "[sp-03] Rejected request with empty name");
            return Err(QueueError::Validation("request name is required".into()));
        }

        let folder_id = match folder.filter(|f| !f.is_empty()) {
            Some(folder) => folder,
            None => self.records.load_client(client).await?.folder_id,
        };

        let (id, created_at) = self.ids.next();
        let request = SignatureRequest {
            id,
            name: name.to_string(),
            folder_id,
            created_at,
        };

        let outcome = self
            .records
            .save(client, DocumentUpdate::add_request(request.clone()))
            .await?;
        if outcome.requests_added == 0 {
            return Err(QueueError::IdConflict(request.id));
        }

        info!(
            client = %client,
            request_id = %request.id,
            folder = %request.folder_id,
            "[sp-03] Signature request queued: {}",
            request.name
        );
        Ok(request)
    }

    async fn cancel_request(
        &self,
        client: &ClientId,
        request: &RequestId,
    ) -> Result<bool, QueueError> {
        let outcome = self
            .records
            .save(client, DocumentUpdate::remove_request(request.clone()))
            .await?;
        let removed = outcome.requests_removed > 0;
        if removed {
            info!(client = %client, request_id = %request, "[sp-03] Signature request cancelled");
        } else {
            info!(
                client = %client,
                request_id = %request,
                "[sp-03] Cancel ignored, request no longer pending"
            );
        }
        Ok(removed)
    }

    async fn list_pending(&self, client: &ClientId) -> Result<Vec<SignatureRequest>, QueueError> {
        Ok(self.records.load_client(client).await?.pending)
    }
}
