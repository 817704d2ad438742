//! # Record Accessor Service
//!
//! Implements `RecordAccessorApi` over a `ClientRecordStore`, normalizing
//! every document on the way out.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{ClientId, ClientRecord, Clock, Identity};
use tracing::{info, warn};

use crate::domain::{
    normalize, ClientDocument, DocumentUpdate, FieldPatch, NewClient, RecordError, UpdateOutcome,
};
use crate::ports::inbound::RecordAccessorApi;
use crate::ports::outbound::ClientRecordStore;

/// Client Record Accessor.
pub struct RecordAccessor {
    store: Arc<dyn ClientRecordStore>,
    clock: Arc<dyn Clock>,
}

impl RecordAccessor {
    pub fn new(store: Arc<dyn ClientRecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &Arc<dyn ClientRecordStore> {
        &self.store
    }
}

fn matches_search(id: &ClientId, needle: &str) -> bool {
    needle.is_empty() || id.as_str().to_lowercase().contains(needle)
}

#[async_trait]
impl RecordAccessorApi for RecordAccessor {
    async fn load(&self, identity: &Identity) -> Result<ClientRecord, RecordError> {
        match self.load_client(identity.client_id()).await {
            Err(RecordError::NotFound(id)) => {
                warn!(client = %id, "[sp-02] No record for signed-in identity, access denied");
                Err(RecordError::NotFound(id))
            }
            other => other,
        }
    }

    async fn load_client(&self, id: &ClientId) -> Result<ClientRecord, RecordError> {
        let doc = self
            .store
            .fetch(id)
            .await
            .map_err(RecordError::from_read)?
            .ok_or_else(|| RecordError::NotFound(id.clone()))?;
        Ok(normalize(id.clone(), doc))
    }

    async fn save(
        &self,
        id: &ClientId,
        update: DocumentUpdate,
    ) -> Result<UpdateOutcome, RecordError> {
        if update.is_empty() {
            return Ok(UpdateOutcome {
                applied: true,
                ..UpdateOutcome::default()
            });
        }
        let outcome = self
            .store
            .update(id, &update)
            .await
            .map_err(RecordError::from_write)?;
        info!(
            client = %id,
            applied = outcome.applied,
            added = outcome.requests_added,
            removed = outcome.requests_removed,
            appended = outcome.signatures_appended,
            "[sp-02] Record saved"
        );
        Ok(outcome)
    }

    async fn create(&self, id: &ClientId, new: NewClient) -> Result<ClientRecord, RecordError> {
        if new.folder_id.is_empty() {
            return Err(RecordError::Validation("folder reference is required".into()));
        }
        let doc = ClientDocument::onboard(new, self.clock.now());
        self.store
            .insert(id, doc.clone())
            .await
            .map_err(RecordError::from_write)?;
        info!(client = %id, "[sp-02] Client onboarded");
        Ok(normalize(id.clone(), doc))
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<ClientRecord>, RecordError> {
        let needle = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();
        let mut records: Vec<ClientRecord> = self
            .store
            .list()
            .await
            .map_err(RecordError::from_read)?
            .into_iter()
            .filter(|(id, _)| matches_search(id, &needle))
            .map(|(id, doc)| normalize(id, doc))
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    async fn delete(&self, id: &ClientId) -> Result<(), RecordError> {
        let existed = self
            .store
            .remove(id)
            .await
            .map_err(RecordError::from_write)?;
        if !existed {
            return Err(RecordError::NotFound(id.clone()));
        }
        info!(client = %id, "[sp-02] Client record deleted");
        Ok(())
    }

    async fn set_legacy_signature_needed(
        &self,
        id: &ClientId,
        needed: bool,
    ) -> Result<UpdateOutcome, RecordError> {
        self.save(
            id,
            DocumentUpdate::patch(FieldPatch {
                signature_needed: Some(needed),
                ..FieldPatch::default()
            }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRecordStore;
    use shared_types::{AuthMethod, ClientStatus, FolderRef, ManualClock};

    fn id(s: &str) -> ClientId {
        ClientId::new(s).unwrap()
    }

    fn accessor() -> (RecordAccessor, Arc<InMemoryRecordStore>) {
        let store = Arc::new(InMemoryRecordStore::new());
        let clock = Arc::new(ManualClock::at_millis(1_700_000_000_000));
        (RecordAccessor::new(store.clone(), clock), store)
    }

    #[tokio::test]
    async fn test_load_unknown_identity_is_not_found() {
        let (accessor, _) = accessor();
        let identity = Identity::new(id("ghost@evans-portal.com"), AuthMethod::Password);
        let result = accessor.load(&identity).await;
        assert_eq!(result, Err(RecordError::NotFound(id("ghost@evans-portal.com"))));
    }

    #[tokio::test]
    async fn test_create_then_load() {
        let (accessor, _) = accessor();
        let created = accessor
            .create(&id("smith@evans-portal.com"), NewClient::with_folder("F1"))
            .await
            .unwrap();
        assert_eq!(created.status, ClientStatus::Lead);
        assert_eq!(
            created.created_at.map(|t| t.timestamp_millis()),
            Some(1_700_000_000_000)
        );

        let identity = Identity::new(id("smith@evans-portal.com"), AuthMethod::Password);
        let loaded = accessor.load(&identity).await.unwrap();
        assert_eq!(loaded.folder_id, FolderRef::new("F1"));
    }

    #[tokio::test]
    async fn test_create_requires_folder() {
        let (accessor, store) = accessor();
        let result = accessor
            .create(&id("a@x.com"), NewClient::with_folder("  "))
            .await;
        assert!(matches!(result, Err(RecordError::Validation(_))));
        assert_eq!(store.write_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_twice() {
        let (accessor, _) = accessor();
        accessor
            .create(&id("a@x.com"), NewClient::with_folder("F1"))
            .await
            .unwrap();
        let again = accessor
            .create(&id("a@x.com"), NewClient::with_folder("F2"))
            .await;
        assert_eq!(again, Err(RecordError::AlreadyExists(id("a@x.com"))));
    }

    #[tokio::test]
    async fn test_list_search_is_case_insensitive_and_sorted() {
        let (accessor, _) = accessor();
        for client in ["zoe.smith@x.com", "adam@x.com", "bob.SMITH@y.com"] {
            accessor
                .create(&id(client), NewClient::with_folder("F"))
                .await
                .unwrap();
        }

        let all = accessor.list(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id.as_str(), "adam@x.com");

        let smiths: Vec<_> = accessor
            .list(Some("Smith"))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id.to_string())
            .collect();
        assert_eq!(smiths, vec!["bob.SMITH@y.com", "zoe.smith@x.com"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let (accessor, _) = accessor();
        accessor
            .create(&id("a@x.com"), NewClient::with_folder("F1"))
            .await
            .unwrap();
        accessor.delete(&id("a@x.com")).await.unwrap();
        assert_eq!(
            accessor.delete(&id("a@x.com")).await,
            Err(RecordError::NotFound(id("a@x.com")))
        );
    }

    #[tokio::test]
    async fn test_save_outage_is_remote_write() {
        let (accessor, store) = accessor();
        accessor
            .create(&id("a@x.com"), NewClient::with_folder("F1"))
            .await
            .unwrap();
        store.set_writes_failing(true);

        let result = accessor.set_legacy_signature_needed(&id("a@x.com"), true).await;
        assert!(matches!(result, Err(RecordError::RemoteWrite(_))));
        assert!(!store.snapshot(&id("a@x.com")).unwrap().signature_needed);
    }

    #[tokio::test]
    async fn test_read_outage_is_remote_read() {
        let (accessor, store) = accessor();
        store.set_reads_failing(true);
        let result = accessor.load_client(&id("a@x.com")).await;
        assert!(matches!(result, Err(RecordError::RemoteRead(_))));
    }

    #[tokio::test]
    async fn test_empty_save_makes_no_remote_call() {
        let (accessor, store) = accessor();
        let outcome = accessor
            .save(&id("a@x.com"), DocumentUpdate::default())
            .await
            .unwrap();
        assert!(outcome.applied);
        assert_eq!(store.write_calls(), 0);
    }
}
