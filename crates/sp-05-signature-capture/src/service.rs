//! # Signing Service
//!
//! Turns a capture session into an immutable `SignatureRecord` with one
//! atomic record write, and renders certificates for history entries.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{ClientId, Clock, Identity, SignatureRecord, SignatureRequest};
use sp_02_client_records::{DocumentUpdate, RecordAccessorApi, SignatureEntry};
use tracing::{info, warn};

use crate::domain::{
    render_certificate, CaptureConfig, CaptureError, CaptureSession, CaptureTarget, Certificate,
    CertificateConfig, CertificateError, CommitOutcome,
};
use crate::ports::inbound::SigningApi;

/// Signature Capture & Certification.
pub struct SigningService {
    records: Arc<dyn RecordAccessorApi>,
    clock: Arc<dyn Clock>,
    capture: CaptureConfig,
    certificate: CertificateConfig,
}

impl SigningService {
    pub fn new(
        records: Arc<dyn RecordAccessorApi>,
        clock: Arc<dyn Clock>,
        capture: CaptureConfig,
        certificate: CertificateConfig,
    ) -> Self {
        Self {
            records,
            clock,
            capture,
            certificate,
        }
    }

    async fn write(
        &self,
        client: &ClientId,
        update: DocumentUpdate,
        record: SignatureRecord,
    ) -> Result<CommitOutcome, CaptureError> {
        let outcome = match self.records.save(client, update).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(client = %client, error = %e, "[sp-05] Signature commit failed");
                return Err(e.into());
            }
        };
        if !outcome.applied {
            info!(client = %client, "[sp-05] Signature target already resolved, nothing written");
            return Ok(CommitOutcome::AlreadyResolved);
        }
        Ok(CommitOutcome::Committed(record))
    }
}

fn wrong_target(expected: &'static str, session: &CaptureSession) -> CaptureError {
    CaptureError::WrongTarget {
        expected,
        actual: session.target().name(),
    }
}

#[async_trait]
impl SigningApi for SigningService {
    fn begin_capture(&self, request: &SignatureRequest) -> CaptureSession {
        CaptureSession::new(CaptureTarget::Request(request.clone()), self.capture.clone())
    }

    fn begin_legacy_capture(&self) -> CaptureSession {
        CaptureSession::new(CaptureTarget::LegacyQuote, self.capture.clone())
    }

    async fn commit(
        &self,
        identity: &Identity,
        session: &CaptureSession,
    ) -> Result<CommitOutcome, CaptureError> {
        let CaptureTarget::Request(request) = session.target() else {
            return Err(wrong_target(CaptureTarget::REQUEST_LABEL, session));
        };
        let image = session.rasterize()?;

        let client = identity.client_id();
        let record = SignatureRecord::for_request(client.clone(), request, image, self.clock.now());
        let update =
            DocumentUpdate::resolve_request(request.id.clone(), SignatureEntry::from(&record));

        let outcome = self.write(client, update, record).await?;
        if let CommitOutcome::Committed(_) = outcome {
            info!(
                client = %client,
                request_id = %request.id,
                "[sp-05] Signed: {}",
                request.name
            );
        }
        Ok(outcome)
    }

    async fn commit_legacy_quote(
        &self,
        identity: &Identity,
        session: &CaptureSession,
    ) -> Result<CommitOutcome, CaptureError> {
        if session.target() != &CaptureTarget::LegacyQuote {
            return Err(wrong_target(CaptureTarget::LEGACY_QUOTE_LABEL, session));
        }
        let image = session.rasterize()?;

        let client = identity.client_id();
        let record = SignatureRecord::for_legacy_quote(client.clone(), image, self.clock.now());
        let update = DocumentUpdate::resolve_legacy_quote(SignatureEntry::from(&record));

        let outcome = self.write(client, update, record).await?;
        if let CommitOutcome::Committed(_) = outcome {
            info!(client = %client, "[sp-05] Legacy quote signed");
        }
        Ok(outcome)
    }

    fn render_certificate(
        &self,
        client: &ClientId,
        record: &SignatureRecord,
    ) -> Result<Certificate, CertificateError> {
        render_certificate(client, record, &self.certificate)
    }
}
