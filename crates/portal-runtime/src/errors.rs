//! # Portal Errors
//!
//! Subsystem errors folded into one type for the runtime surfaces.
//! `kind()` maps each failure onto the categories a caller reacts to.

use shared_types::{ClientId, RequestId};
use sp_01_identity::IdentityError;
use sp_02_client_records::RecordError;
use sp_03_request_queue::QueueError;
use sp_04_view_router::RouterError;
use sp_05_signature_capture::{CaptureError, CertificateError};
use thiserror::Error;

use crate::container::ConfigError;
use crate::gate::GateAction;

/// How a caller should react to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad credential or provider outage. No session.
    Auth,
    /// Empty or malformed input. No remote call was made.
    Validation,
    /// No such client, request or history entry.
    NotFound,
    /// The store was not reached. Local state is unchanged; retry by hand.
    RemoteWrite,
    /// Nothing was drawn.
    EmptyInput,
    /// The same action is already in flight.
    Busy,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortalError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Router(#[from] RouterError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Certificate(#[from] CertificateError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Unknown signature request: {0}")]
    UnknownRequest(RequestId),

    #[error("No signature history entry #{0}")]
    UnknownSignature(usize),

    #[error("Nothing to sign in the current view")]
    NothingToSign,

    #[error("{action} already in progress for {client}")]
    Busy { client: ClientId, action: GateAction },

    #[error("Validation failed: {0}")]
    Validation(String),
}

fn record_kind(err: &RecordError) -> ErrorKind {
    match err {
        RecordError::NotFound(_) => ErrorKind::NotFound,
        RecordError::AlreadyExists(_) | RecordError::Validation(_) => ErrorKind::Validation,
        RecordError::RemoteWrite(_) | RecordError::RemoteRead(_) => ErrorKind::RemoteWrite,
        RecordError::Corrupt(_) => ErrorKind::Internal,
    }
}

impl PortalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Identity(IdentityError::Internal(_)) => ErrorKind::Internal,
            Self::Identity(_) => ErrorKind::Auth,
            Self::Record(e) => record_kind(e),
            Self::Queue(e) => match e {
                QueueError::Validation(_) => ErrorKind::Validation,
                QueueError::NotFound(_) => ErrorKind::NotFound,
                QueueError::RemoteWrite(_) => ErrorKind::RemoteWrite,
                QueueError::IdConflict(_) => ErrorKind::Internal,
                QueueError::Record(e) => record_kind(e),
            },
            Self::Router(_) => ErrorKind::Validation,
            Self::Capture(e) => match e {
                CaptureError::EmptyInput => ErrorKind::EmptyInput,
                CaptureError::NotFound(_) => ErrorKind::NotFound,
                CaptureError::RemoteWrite(_) => ErrorKind::RemoteWrite,
                CaptureError::Record(e) => record_kind(e),
                CaptureError::WrongTarget { .. } | CaptureError::Rasterize(_) => {
                    ErrorKind::Internal
                }
            },
            Self::Certificate(_) | Self::Config(_) => ErrorKind::Internal,
            Self::UnknownRequest(_) | Self::UnknownSignature(_) => ErrorKind::NotFound,
            Self::NothingToSign | Self::Validation(_) => ErrorKind::Validation,
            Self::Busy { .. } => ErrorKind::Busy,
        }
    }

    /// Whether trying the same action again later can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::RemoteWrite | ErrorKind::Busy)
    }
}
