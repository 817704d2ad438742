//! Request queue errors.

use shared_types::{ClientId, RequestId};
use sp_02_client_records::RecordError;
use thiserror::Error;

/// Request Queue Manager errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// A required field was empty. No remote call was made.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The client has no record.
    #[error("Client not found: {0}")]
    NotFound(ClientId),

    /// The write did not reach the store. Nothing was applied.
    #[error("Remote write failed: {0}")]
    RemoteWrite(String),

    /// A freshly generated id was already known to the record.
    #[error("Request id already in use: {0}")]
    IdConflict(RequestId),

    /// Any other record access failure.
    #[error(transparent)]
    Record(RecordError),
}

impl From<RecordError> for QueueError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::NotFound(id) => Self::NotFound(id),
            RecordError::RemoteWrite(msg) => Self::RemoteWrite(msg),
            RecordError::Validation(msg) => Self::Validation(msg),
            other => Self::Record(other),
        }
    }
}
