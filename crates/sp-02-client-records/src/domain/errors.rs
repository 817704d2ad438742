//! # Domain Errors
//!
//! Two layers: `StoreError` is what a record store reports, `RecordError` is
//! what accessor callers see.

use shared_types::ClientId;
use thiserror::Error;

/// Record store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No document under this key.
    #[error("Document not found: {0}")]
    NotFound(ClientId),

    /// Insert collided with an existing document.
    #[error("Document already exists: {0}")]
    AlreadyExists(ClientId),

    /// The store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Local persistence failed.
    #[error("Store I/O error: {0}")]
    Io(String),

    /// Persisted data could not be decoded.
    #[error("Corrupt store data: {0}")]
    Corrupt(String),
}

/// Client Record Accessor errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// No record for this identity. For a client login this means access denied.
    #[error("No client record for {0} (access denied)")]
    NotFound(ClientId),

    /// Onboarding collided with an existing record.
    #[error("Client record already exists: {0}")]
    AlreadyExists(ClientId),

    /// A required field was empty. No remote call was made.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A write did not reach the store. Nothing was applied; retry is safe.
    #[error("Remote write failed: {0}")]
    RemoteWrite(String),

    /// A read did not reach the store.
    #[error("Remote read failed: {0}")]
    RemoteRead(String),

    /// The stored record could not be decoded.
    #[error("Stored record is corrupt: {0}")]
    Corrupt(String),
}

impl RecordError {
    /// Maps a store failure raised by a write.
    pub fn from_write(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::AlreadyExists(id) => Self::AlreadyExists(id),
            StoreError::Corrupt(msg) => Self::Corrupt(msg),
            StoreError::Unavailable(msg) | StoreError::Io(msg) => Self::RemoteWrite(msg),
        }
    }

    /// Maps a store failure raised by a read.
    pub fn from_read(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::AlreadyExists(id) => Self::AlreadyExists(id),
            StoreError::Corrupt(msg) => Self::Corrupt(msg),
            StoreError::Unavailable(msg) | StoreError::Io(msg) => Self::RemoteRead(msg),
        }
    }

    /// Whether a fresh user-initiated attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RemoteWrite(_) | Self::RemoteRead(_))
    }
}
