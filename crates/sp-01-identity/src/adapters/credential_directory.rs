//! Credential Directory Adapter
//!
//! Implements `IdentityProvider` over an in-memory account table with
//! Argon2id password hashes (PHC strings).

use crate::domain::{FederatedAssertion, IdentityError, Secret};
use crate::ports::outbound::{IdentityProvider, ProviderAccount};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::ClientId;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

struct Account {
    password_hash: String,
    display_name: Option<String>,
}

/// In-memory identity provider.
///
/// `set_available(false)` simulates an upstream outage: every call then fails
/// with `ProviderUnavailable`.
pub struct CredentialDirectory {
    accounts: RwLock<HashMap<ClientId, Account>>,
    trusted_providers: RwLock<HashSet<String>>,
    /// Federated accounts keyed by `(provider, subject)`.
    linked: RwLock<HashMap<(String, String), ClientId>>,
    available: AtomicBool,
}

impl CredentialDirectory {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            trusted_providers: RwLock::new(HashSet::new()),
            linked: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Register (or replace) a password account.
    pub fn register(&self, email: ClientId, secret: &Secret) -> Result<(), IdentityError> {
        let password_hash = hash_password(secret)?;
        self.accounts.write().insert(
            email,
            Account {
                password_hash,
                display_name: None,
            },
        );
        Ok(())
    }

    /// Register an account from an existing PHC hash string.
    pub fn register_hashed(&self, email: ClientId, password_hash: impl Into<String>) {
        self.accounts.write().insert(
            email,
            Account {
                password_hash: password_hash.into(),
                display_name: None,
            },
        );
    }

    /// Accept assertions from `provider`.
    pub fn trust_provider(&self, provider: impl Into<String>) {
        self.trusted_providers.write().insert(provider.into());
    }

    /// Bind a federated subject to a portal identity. Linked subjects
    /// resolve to `email` whatever address the assertion carries.
    pub fn link_federated(
        &self,
        provider: impl Into<String>,
        subject: impl Into<String>,
        email: ClientId,
    ) {
        let provider = provider.into();
        self.trust_provider(provider.clone());
        self.linked.write().insert((provider, subject.into()), email);
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), IdentityError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(IdentityError::ProviderUnavailable(
                "credential directory offline".to_string(),
            ))
        }
    }
}

impl Default for CredentialDirectory {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash a password using Argon2id.
pub fn hash_password(secret: &Secret) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.expose().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| IdentityError::Internal(format!("Failed to hash password: {e}")))
}

fn verify_password_hash(secret: &Secret, hash: &str) -> Result<bool, IdentityError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| IdentityError::Internal(format!("Invalid password hash format: {e}")))?;
    Ok(Argon2::default()
        .verify_password(secret.expose().as_bytes(), &parsed)
        .is_ok())
}

#[async_trait]
impl IdentityProvider for CredentialDirectory {
    async fn verify_password(
        &self,
        email: &ClientId,
        secret: &Secret,
    ) -> Result<ProviderAccount, IdentityError> {
        self.ensure_available()?;
        debug!("[sp-01] Verifying password for {}", email);

        let accounts = self.accounts.read();
        let account = accounts
            .get(email)
            .ok_or(IdentityError::InvalidCredentials)?;

        if !verify_password_hash(secret, &account.password_hash)? {
            return Err(IdentityError::InvalidCredentials);
        }

        Ok(ProviderAccount {
            email: email.clone(),
            display_name: account.display_name.clone(),
        })
    }

    async fn verify_assertion(
        &self,
        assertion: &FederatedAssertion,
    ) -> Result<ProviderAccount, IdentityError> {
        self.ensure_available()?;
        debug!(
            "[sp-01] Verifying {} assertion for subject {}",
            assertion.provider, assertion.subject
        );

        if !self.trusted_providers.read().contains(&assertion.provider) {
            return Err(IdentityError::InvalidCredentials);
        }
        if !assertion.email_verified {
            return Err(IdentityError::InvalidCredentials);
        }

        let linked = self
            .linked
            .read()
            .get(&(assertion.provider.clone(), assertion.subject.clone()))
            .cloned();
        let email = match linked {
            Some(email) => email,
            None => ClientId::new(assertion.email.as_str())
                .map_err(|_| IdentityError::InvalidCredentials)?,
        };
        Ok(ProviderAccount {
            email,
            display_name: assertion.display_name.clone(),
        })
    }
}
