//! # Adapters Layer
//!
//! Implementations of the outbound identity-provider port.

pub mod credential_directory;

pub use credential_directory::{hash_password, CredentialDirectory};
