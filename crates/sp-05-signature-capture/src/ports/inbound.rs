//! # Inbound Ports
//!
//! Signature Capture & Certification API.

use async_trait::async_trait;
use shared_types::{ClientId, Identity, SignatureRecord, SignatureRequest};

use crate::domain::{CaptureError, CaptureSession, Certificate, CertificateError, CommitOutcome};

/// Signature Capture & Certification - primary API.
#[async_trait]
pub trait SigningApi: Send + Sync {
    /// Open a drawing surface for `request`.
    fn begin_capture(&self, request: &SignatureRequest) -> CaptureSession;

    /// Open a drawing surface for the legacy quote.
    fn begin_legacy_capture(&self) -> CaptureSession;

    /// Record the drawing as the signature for the session's request.
    ///
    /// The session is borrowed: on failure the drawing is still there for
    /// an immediate retry.
    async fn commit(
        &self,
        identity: &Identity,
        session: &CaptureSession,
    ) -> Result<CommitOutcome, CaptureError>;

    /// Record the drawing as the legacy quote signature and clear the
    /// legacy flag in the same write.
    async fn commit_legacy_quote(
        &self,
        identity: &Identity,
        session: &CaptureSession,
    ) -> Result<CommitOutcome, CaptureError>;

    /// PDF proof for one history record of `client`.
    fn render_certificate(
        &self,
        client: &ClientId,
        record: &SignatureRecord,
    ) -> Result<Certificate, CertificateError>;
}
