//! # Domain Errors
//!
//! Authentication failures. Neither variant establishes a session.

use thiserror::Error;

/// Identity resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Identifier/secret mismatch, unknown account, or rejected assertion.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The upstream identity provider could not be reached.
    #[error("Identity provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Credential material could not be processed (e.g. corrupt hash).
    #[error("Credential processing failed: {0}")]
    Internal(String),
}
