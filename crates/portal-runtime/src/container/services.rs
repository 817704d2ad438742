//! # Portal Container
//!
//! Builds the subsystems in dependency order:
//!
//! ```text
//! Level 0: Clock, record store, credential directory
//! Level 1: Identity Resolver (sp-01), Record Accessor (sp-02)
//! Level 2: Request Queue (sp-03), Signing (sp-05)
//! ```
//!
//! View routers (sp-04) are per session and are created by `PortalSession`.

use std::sync::Arc;

use shared_types::{ClientId, Clock, Identity, SystemClock};
use sp_01_identity::{
    CredentialDirectory, Credentials, FederatedAssertion, IdentityApi, IdentityResolver,
};
use sp_02_client_records::{
    ClientRecordStore, InMemoryRecordStore, JsonFileRecordStore, RecordAccessor,
    RecordAccessorApi,
};
use sp_03_request_queue::{RequestQueueApi, RequestQueueService};
use sp_05_signature_capture::{SigningApi, SigningService};
use tracing::{info, instrument, warn};

use crate::admin::AdminConsole;
use crate::container::config::{ConfigError, PortalConfig, StoreBackend};
use crate::errors::PortalError;
use crate::gate::SubmissionGate;
use crate::session::PortalSession;

/// Central container holding all subsystem instances.
pub struct PortalContainer {
    /// Configuration (immutable after initialization).
    pub config: PortalConfig,
    pub clock: Arc<dyn Clock>,
    /// Account table behind the identity resolver.
    pub directory: Arc<CredentialDirectory>,
    pub identity: Arc<dyn IdentityApi>,
    pub store: Arc<dyn ClientRecordStore>,
    pub records: Arc<dyn RecordAccessorApi>,
    pub queue: Arc<dyn RequestQueueApi>,
    pub signing: Arc<dyn SigningApi>,
    pub gate: Arc<SubmissionGate>,
}

impl PortalContainer {
    /// Build from configuration with the system clock and the configured
    /// store backend.
    #[instrument(name = "portal_init", skip(config))]
    pub fn new(config: PortalConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let store: Arc<dyn ClientRecordStore> = match config.records.backend {
            StoreBackend::Memory => {
                warn!("Using in-memory record store, records are lost on exit");
                Arc::new(InMemoryRecordStore::new())
            }
            StoreBackend::JsonFile => {
                info!(path = %config.records.path.display(), "Using JSON file record store");
                Arc::new(JsonFileRecordStore::new(config.records.path.clone()))
            }
        };
        Self::with_parts(config, store, Arc::new(SystemClock))
    }

    /// Build around an existing store and clock.
    pub fn with_parts(
        config: PortalConfig,
        store: Arc<dyn ClientRecordStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        info!("Phase 1: Identity directory");
        let directory = Arc::new(CredentialDirectory::new());
        for provider in &config.identity.trusted_providers {
            directory.trust_provider(provider.clone());
        }
        for account in &config.identity.accounts {
            let email = ClientId::new(account.email.clone())
                .map_err(|e| ConfigError::Invalid(format!("identity.accounts: {e}")))?;
            directory.register_hashed(email, account.password_hash.clone());
        }
        for link in &config.identity.federated {
            let email = ClientId::new(link.email.clone())
                .map_err(|e| ConfigError::Invalid(format!("identity.federated: {e}")))?;
            directory.link_federated(link.provider.clone(), link.subject.clone(), email);
        }
        let identity: Arc<dyn IdentityApi> = Arc::new(IdentityResolver::new(
            directory.clone(),
            config.identity.resolver_config(),
        ));
        info!(
            accounts = config.identity.accounts.len(),
            "  [01] Identity Resolver initialized"
        );

        info!("Phase 2: Record access");
        let records: Arc<dyn RecordAccessorApi> =
            Arc::new(RecordAccessor::new(store.clone(), clock.clone()));
        info!("  [02] Client Record Accessor initialized");

        info!("Phase 3: Request queue and signing");
        let queue: Arc<dyn RequestQueueApi> =
            Arc::new(RequestQueueService::new(records.clone(), clock.clone()));
        info!("  [03] Request Queue initialized");
        let signing: Arc<dyn SigningApi> = Arc::new(SigningService::new(
            records.clone(),
            clock.clone(),
            config.capture.clone(),
            config.certificate.clone(),
        ));
        info!("  [05] Signature Capture initialized");

        Ok(Self {
            config,
            clock,
            directory,
            identity,
            store,
            records,
            queue,
            signing,
            gate: SubmissionGate::new(),
        })
    }

    /// Password login, then open the client's session.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<PortalSession, PortalError> {
        let identity = self.identity.resolve(credentials).await?;
        self.open_session(identity).await
    }

    /// Federated login, then open the client's session.
    pub async fn sign_in_federated(
        &self,
        assertion: &FederatedAssertion,
    ) -> Result<PortalSession, PortalError> {
        let identity = self.identity.resolve_federated(assertion).await?;
        self.open_session(identity).await
    }

    /// Session for an already established identity.
    pub async fn open_session(&self, identity: Identity) -> Result<PortalSession, PortalError> {
        PortalSession::open(
            identity,
            self.records.clone(),
            self.signing.clone(),
            self.gate.clone(),
            self.config.viewer.clone(),
        )
        .await
    }

    pub fn admin(&self) -> AdminConsole {
        AdminConsole::new(
            self.records.clone(),
            self.queue.clone(),
            self.signing.clone(),
            self.gate.clone(),
            &self.config,
        )
    }
}
