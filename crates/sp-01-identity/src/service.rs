//! # Identity Resolver Service
//!
//! Application service implementing `IdentityApi` on top of an
//! `IdentityProvider`.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{AuthMethod, Identity};
use tracing::{info, warn};

use crate::domain::{normalize_identifier, Credentials, FederatedAssertion, IdentityConfig, IdentityError};
use crate::ports::inbound::IdentityApi;
use crate::ports::outbound::{IdentityProvider, ProviderAccount};

/// Identity Resolver.
pub struct IdentityResolver {
    provider: Arc<dyn IdentityProvider>,
    config: IdentityConfig,
}

impl IdentityResolver {
    pub fn new(provider: Arc<dyn IdentityProvider>, config: IdentityConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }
}

fn into_identity(account: ProviderAccount, method: AuthMethod) -> Identity {
    let identity = Identity::new(account.email, method);
    match account.display_name {
        Some(name) => identity.with_display_name(name),
        None => identity,
    }
}

#[async_trait]
impl IdentityApi for IdentityResolver {
    async fn resolve(&self, credentials: &Credentials) -> Result<Identity, IdentityError> {
        if credentials.secret.is_empty() {
            return Err(IdentityError::InvalidCredentials);
        }
        let email = normalize_identifier(&credentials.identifier, &self.config)
            .map_err(|_| IdentityError::InvalidCredentials)?;

        match self.provider.verify_password(&email, &credentials.secret).await {
            Ok(account) => {
                info!(client = %account.email, "[sp-01] Password login resolved");
                Ok(into_identity(account, AuthMethod::Password))
            }
            Err(e) => {
                warn!(client = %email, error = %e, "[sp-01] Password login rejected");
                Err(e)
            }
        }
    }

    async fn resolve_federated(
        &self,
        assertion: &FederatedAssertion,
    ) -> Result<Identity, IdentityError> {
        match self.provider.verify_assertion(assertion).await {
            Ok(account) => {
                info!(
                    client = %account.email,
                    provider = %assertion.provider,
                    "[sp-01] Federated login resolved"
                );
                Ok(into_identity(
                    account,
                    AuthMethod::Federated {
                        provider: assertion.provider.clone(),
                    },
                ))
            }
            Err(e) => {
                warn!(provider = %assertion.provider, error = %e, "[sp-01] Federated login rejected");
                Err(e)
            }
        }
    }
}
