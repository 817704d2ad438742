//! # Domain Errors

use shared_types::ClientId;
use sp_02_client_records::RecordError;
use thiserror::Error;

/// Capture and commit errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// Nothing was drawn. No remote call was made.
    #[error("Signature is empty")]
    EmptyInput,

    /// The session was opened for a different target.
    #[error("Capture session is for {actual}, not {expected}")]
    WrongTarget {
        expected: &'static str,
        actual: &'static str,
    },

    /// The drawing could not be encoded.
    #[error("Failed to rasterize signature: {0}")]
    Rasterize(String),

    /// The client has no record.
    #[error("Client not found: {0}")]
    NotFound(ClientId),

    /// The commit did not reach the store. The request is still pending and
    /// the drawing is intact.
    #[error("Remote write failed: {0}")]
    RemoteWrite(String),

    /// Any other record access failure.
    #[error(transparent)]
    Record(RecordError),
}

impl From<RecordError> for CaptureError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::NotFound(id) => Self::NotFound(id),
            RecordError::RemoteWrite(msg) => Self::RemoteWrite(msg),
            other => Self::Record(other),
        }
    }
}

/// Certificate rendering errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CertificateError {
    /// The stored signature image could not be decoded.
    #[error("Invalid signature image: {0}")]
    Image(String),

    /// The configured UTC offset is out of range.
    #[error("Invalid UTC offset: {0} minutes")]
    InvalidOffset(i32),

    /// The configured date pattern is not a valid strftime pattern.
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    /// The PDF could not be assembled.
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}
