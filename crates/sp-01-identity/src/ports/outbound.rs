//! # Outbound Ports
//!
//! The external identity provider.

use crate::domain::{FederatedAssertion, IdentityError, Secret};
use async_trait::async_trait;
use shared_types::ClientId;

/// Account confirmed by the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderAccount {
    pub email: ClientId,
    pub display_name: Option<String>,
}

/// Identity provider - outbound port.
///
/// Receives canonical identifiers only; normalization happens before the call.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Check a password for a canonical identity.
    async fn verify_password(
        &self,
        email: &ClientId,
        secret: &Secret,
    ) -> Result<ProviderAccount, IdentityError>;

    /// Check a federated assertion.
    async fn verify_assertion(
        &self,
        assertion: &FederatedAssertion,
    ) -> Result<ProviderAccount, IdentityError>;
}
