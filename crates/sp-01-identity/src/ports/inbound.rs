//! # Inbound Ports
//!
//! API trait defining what the Identity Resolver can do.

use crate::domain::{Credentials, FederatedAssertion, IdentityError};
use async_trait::async_trait;
use shared_types::Identity;

/// Identity API - inbound port.
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Resolve an identifier/secret pair.
    ///
    /// # Errors
    /// - `InvalidCredentials`: mismatch, unknown account, empty input
    /// - `ProviderUnavailable`: upstream outage
    async fn resolve(&self, credentials: &Credentials) -> Result<Identity, IdentityError>;

    /// Resolve a federated-provider assertion.
    async fn resolve_federated(
        &self,
        assertion: &FederatedAssertion,
    ) -> Result<Identity, IdentityError>;
}
