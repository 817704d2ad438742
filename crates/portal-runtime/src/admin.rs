//! # Admin Console
//!
//! Back-office operations over every client record: onboarding, edits,
//! request queues, certificates and invites. The console has no identity of
//! its own; operator authorization happens in front of it.

use std::sync::Arc;

use shared_types::{ClientId, ClientRecord, FolderRef, RequestId, SignatureRequest};
use sp_01_identity::{normalize_identifier, username_of, IdentityConfig};
use sp_02_client_records::{DocumentUpdate, FieldPatch, NewClient, RecordAccessorApi};
use sp_03_request_queue::RequestQueueApi;
use sp_04_view_router::{folder_url, ViewerConfig};
use sp_05_signature_capture::{Certificate, SigningApi};
use portal_telemetry::log_client_event;

use crate::container::PortalConfig;
use crate::errors::PortalError;
use crate::gate::{GateAction, SubmissionGate};

/// Admin links for one client's folders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderLinks {
    pub primary: String,
    pub quote: Option<String>,
    pub requests: Vec<(RequestId, String)>,
}

pub struct AdminConsole {
    records: Arc<dyn RecordAccessorApi>,
    queue: Arc<dyn RequestQueueApi>,
    signing: Arc<dyn SigningApi>,
    gate: Arc<SubmissionGate>,
    identity: IdentityConfig,
    viewer: ViewerConfig,
    portal_url: String,
}

impl AdminConsole {
    pub fn new(
        records: Arc<dyn RecordAccessorApi>,
        queue: Arc<dyn RequestQueueApi>,
        signing: Arc<dyn SigningApi>,
        gate: Arc<SubmissionGate>,
        config: &PortalConfig,
    ) -> Self {
        Self {
            records,
            queue,
            signing,
            gate,
            identity: config.identity.resolver_config(),
            viewer: config.viewer.clone(),
            portal_url: config.identity.portal_url.clone(),
        }
    }

    /// Canonical id for a username or full identifier.
    pub fn client_id(&self, username: &str) -> Result<ClientId, PortalError> {
        normalize_identifier(username, &self.identity)
            .map_err(|e| PortalError::Validation(e.to_string()))
    }

    /// Onboard a client. A bare username gets the portal domain.
    pub async fn create_client(
        &self,
        username: &str,
        new: NewClient,
    ) -> Result<ClientRecord, PortalError> {
        let id = self.client_id(username)?;
        let _permit = self.gate.try_acquire(&id, GateAction::CreateClient)?;
        let record = self.records.create(&id, new).await?;
        log_client_event!(info, "admin", "Client onboarded", id);
        Ok(record)
    }

    /// Edit plain fields and return the updated record.
    pub async fn update_client(
        &self,
        id: &ClientId,
        patch: FieldPatch,
    ) -> Result<ClientRecord, PortalError> {
        if patch.folder_id.as_ref().is_some_and(FolderRef::is_empty) {
            return Err(PortalError::Validation("folder id is required".into()));
        }
        let _permit = self.gate.try_acquire(id, GateAction::SaveClient)?;
        self.records.save(id, DocumentUpdate::patch(patch)).await?;
        log_client_event!(info, "admin", "Client updated", id);
        Ok(self.records.load_client(id).await?)
    }

    /// Remove a client record and everything in it.
    pub async fn delete_client(&self, id: &ClientId) -> Result<(), PortalError> {
        let _permit = self.gate.try_acquire(id, GateAction::DeleteClient)?;
        self.records.delete(id).await?;
        log_client_event!(info, "admin", "Client deleted", id);
        Ok(())
    }

    pub async fn client(&self, id: &ClientId) -> Result<ClientRecord, PortalError> {
        Ok(self.records.load_client(id).await?)
    }

    /// Clients whose id contains `search`, case-insensitively.
    pub async fn list_clients(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<ClientRecord>, PortalError> {
        Ok(self.records.list(search).await?)
    }

    /// Ask a client to sign `name`. Without a folder the client's primary
    /// folder is used.
    pub async fn add_request(
        &self,
        id: &ClientId,
        name: &str,
        folder: Option<FolderRef>,
    ) -> Result<SignatureRequest, PortalError> {
        let _permit = self.gate.try_acquire(id, GateAction::AddRequest)?;
        Ok(self.queue.add_request(id, name, folder).await?)
    }

    /// Withdraw a pending request. `false` when it was not pending.
    pub async fn cancel_request(
        &self,
        id: &ClientId,
        request: &RequestId,
    ) -> Result<bool, PortalError> {
        let _permit = self.gate.try_acquire(id, GateAction::CancelRequest)?;
        Ok(self.queue.cancel_request(id, request).await?)
    }

    /// Flip the legacy "signature needed" flag. Returns the new value.
    pub async fn toggle_legacy_signature(&self, id: &ClientId) -> Result<bool, PortalError> {
        let _permit = self.gate.try_acquire(id, GateAction::ToggleLegacy)?;
        let current = self.records.load_client(id).await?.signature_needed;
        self.records
            .set_legacy_signature_needed(id, !current)
            .await?;
        log_client_event!(
            info,
            "admin",
            "Legacy signature flag toggled",
            id,
            needed = !current
        );
        Ok(!current)
    }

    /// Regenerate the certificate for history entry `index`.
    pub async fn certificate(
        &self,
        id: &ClientId,
        index: usize,
    ) -> Result<Certificate, PortalError> {
        let record = self.records.load_client(id).await?;
        let signature = record
            .history
            .get(index)
            .ok_or(PortalError::UnknownSignature(index))?;
        Ok(self.signing.render_certificate(id, signature)?)
    }

    /// Onboarding message to send to a new client.
    pub fn invite_message(&self, id: &ClientId) -> String {
        format!(
            "Hi! Here is the link to your personal client portal:\n\n\
             🔗 {}\n\
             👤 Username: {}\n\
             🔑 Password: (The one we discussed)\n\n\
             You can find all your documents and quotes here.",
            self.portal_url,
            username_of(id, &self.identity)
        )
    }

    pub fn folder_links(&self, record: &ClientRecord) -> FolderLinks {
        FolderLinks {
            primary: folder_url(&record.folder_id, &self.viewer),
            quote: record
                .quote_folder_id
                .as_ref()
                .map(|f| folder_url(f, &self.viewer)),
            requests: record
                .pending
                .iter()
                .map(|r| (r.id.clone(), folder_url(&r.folder_id, &self.viewer)))
                .collect(),
        }
    }
}
