//! # SP-01 Identity Resolver
//!
//! Maps a login credential to a canonical client identity.
//!
//! **Subsystem ID:** 1
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! - Bare usernames (no `@`) are normalized by appending the portal suffix
//!   (`@evans-portal.com` by default); qualified identifiers pass through.
//! - Federated logins return an identity straight from a provider assertion.
//! - Every call is a single terminal attempt. There is no retry loop here.
//!
//! ## Module Structure
//!
//! ```text
//! sp-01-identity/
//! ├── domain/          # Normalization, credentials, assertions, errors
//! ├── ports/           # IdentityApi (inbound), IdentityProvider (outbound)
//! ├── adapters/        # CredentialDirectory (Argon2id, in-memory)
//! └── service.rs       # IdentityResolver
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{hash_password, CredentialDirectory};
pub use domain::{
    normalize_identifier, username_of, Credentials, FederatedAssertion, IdentityConfig,
    IdentityError, Secret, DEFAULT_PORTAL_DOMAIN,
};
pub use ports::{IdentityApi, IdentityProvider, ProviderAccount};
pub use service::IdentityResolver;
