//! # Domain Layer
//!
//! - `capture`: the drawing surface and its rasterization
//! - `certificate`: PDF proof of a signature
//! - `errors`: capture and certificate failures

pub mod capture;
pub mod certificate;
pub mod errors;

pub use capture::{CaptureConfig, CaptureSession, CaptureTarget, Point};
pub use certificate::{
    certificate_file_name, render_certificate, Certificate, CertificateConfig, CERTIFICATE_TITLE,
    DEFAULT_DATE_FORMAT,
};
pub use errors::{CaptureError, CertificateError};

use shared_types::SignatureRecord;

/// Result of a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The signature was recorded and the request resolved.
    Committed(SignatureRecord),
    /// The target was no longer pending. Nothing was written.
    AlreadyResolved,
}

impl CommitOutcome {
    pub fn record(&self) -> Option<&SignatureRecord> {
        match self {
            Self::Committed(record) => Some(record),
            Self::AlreadyResolved => None,
        }
    }
}
