//! # Portal Session
//!
//! One signed-in client. The session owns the identity established at entry,
//! the last record snapshot, the view router and at most one open drawing.
//! Every core call receives the identity explicitly; dropping the session
//! (or `sign_out`) is the only way to clear it.

use std::sync::Arc;

use shared_types::{
    ClientRecord, FolderRef, Identity, RequestId, SignatureRecord, SignatureRequest,
};
use sp_02_client_records::RecordAccessorApi;
use sp_04_view_router::{viewer_url, ViewRouter, ViewState, ViewerConfig};
use sp_05_signature_capture::{
    CaptureSession, CaptureTarget, Certificate, CommitOutcome, SigningApi,
};
use portal_telemetry::{log_client_event, subsystem_span};
use tracing::Instrument;

use crate::errors::PortalError;
use crate::gate::{GateAction, SubmissionGate};

pub struct PortalSession {
    identity: Identity,
    record: ClientRecord,
    router: ViewRouter,
    capture: Option<CaptureSession>,
    records: Arc<dyn RecordAccessorApi>,
    signing: Arc<dyn SigningApi>,
    gate: Arc<SubmissionGate>,
    viewer: ViewerConfig,
}

impl PortalSession {
    /// Load the client's record and start in the initial view.
    ///
    /// A missing record fails with `NotFound` ("access denied").
    pub async fn open(
        identity: Identity,
        records: Arc<dyn RecordAccessorApi>,
        signing: Arc<dyn SigningApi>,
        gate: Arc<SubmissionGate>,
        viewer: ViewerConfig,
    ) -> Result<Self, PortalError> {
        let record = records.load(&identity).await?;
        let router = ViewRouter::for_record(&record);
        log_client_event!(
            info,
            "session",
            "Portal session opened",
            identity.client_id(),
            pending = record.pending.len(),
            view = router.state().name()
        );
        Ok(Self {
            identity,
            record,
            router,
            capture: None,
            records,
            signing,
            gate,
            viewer,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Record as of the last load, with this session's own writes applied.
    pub fn record(&self) -> &ClientRecord {
        &self.record
    }

    pub fn pending(&self) -> &[SignatureRequest] {
        &self.record.pending
    }

    pub fn history(&self) -> &[SignatureRecord] {
        &self.record.history
    }

    pub fn view_state(&self) -> &ViewState {
        self.router.state()
    }

    pub fn active_folder(&self) -> &FolderRef {
        self.router.active_folder()
    }

    /// Embedded viewer address for the active folder.
    pub fn viewer_url(&self) -> String {
        viewer_url(self.router.active_folder(), &self.viewer)
    }

    /// Switch the viewer to a pending request's folder.
    pub fn open_request(&mut self, id: &RequestId) -> Result<String, PortalError> {
        let request = self
            .record
            .pending_request(id)
            .cloned()
            .ok_or_else(|| PortalError::UnknownRequest(id.clone()))?;
        let folder = self.router.open_request(&request)?;
        Ok(viewer_url(folder, &self.viewer))
    }

    /// Back to the primary folder. An unsaved drawing is discarded.
    pub fn back_to_main(&mut self) -> String {
        self.capture = None;
        let folder = self.router.back_to_main();
        viewer_url(folder, &self.viewer)
    }

    /// Open the drawing surface for whatever the current view asks to sign.
    ///
    /// Reopening for the same target keeps the existing drawing.
    pub fn begin_signing(&mut self) -> Result<&mut CaptureSession, PortalError> {
        let fresh = match self.router.state() {
            ViewState::Request(request) => self.signing.begin_capture(request),
            ViewState::QuoteFolder => self.signing.begin_legacy_capture(),
            ViewState::Main => return Err(PortalError::NothingToSign),
        };
        let keep = self
            .capture
            .as_ref()
            .is_some_and(|open| open.target() == fresh.target());
        if !keep {
            self.capture = Some(fresh);
        }
        self.capture.as_mut().ok_or(PortalError::NothingToSign)
    }

    pub fn capture(&self) -> Option<&CaptureSession> {
        self.capture.as_ref()
    }

    pub fn capture_mut(&mut self) -> Option<&mut CaptureSession> {
        self.capture.as_mut()
    }

    /// Close the drawing surface without writing anything.
    pub fn cancel_signing(&mut self) -> bool {
        self.capture.take().is_some()
    }

    /// Commit the open drawing.
    ///
    /// On failure the request stays pending, the view does not move and the
    /// drawing is kept for a retry.
    pub async fn sign(&mut self) -> Result<CommitOutcome, PortalError> {
        let span = subsystem_span!(
            "sign",
            subsystem = "session",
            client = %self.identity.client_id()
        );
        self.commit_capture().instrument(span).await
    }

    async fn commit_capture(&mut self) -> Result<CommitOutcome, PortalError> {
        let Some(session) = self.capture.as_ref() else {
            return Err(PortalError::NothingToSign);
        };
        let client = self.identity.client_id().clone();
        let _permit = self.gate.try_acquire(&client, GateAction::Sign)?;

        let result = match session.target() {
            CaptureTarget::Request(_) => self.signing.commit(&self.identity, session).await,
            CaptureTarget::LegacyQuote => {
                self.signing
                    .commit_legacy_quote(&self.identity, session)
                    .await
            }
        };
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                log_client_event!(
                    warn,
                    "session",
                    "Signing failed, drawing kept",
                    client,
                    error = %e
                );
                return Err(e.into());
            }
        };

        match &outcome {
            CommitOutcome::Committed(record) => {
                match &record.doc_id {
                    Some(id) => {
                        self.router.on_signed(id);
                        self.record.pending.retain(|r| &r.id != id);
                    }
                    None => {
                        self.router.on_legacy_signed();
                        self.record.signature_needed = false;
                    }
                }
                self.record.history.push(record.clone());
                self.capture = None;
            }
            CommitOutcome::AlreadyResolved => {
                self.capture = None;
                self.refresh().await?;
            }
        }
        Ok(outcome)
    }

    /// Re-read the record and move the view off anything resolved elsewhere.
    /// Returns whether the view changed.
    pub async fn refresh(&mut self) -> Result<bool, PortalError> {
        let record = self.records.load(&self.identity).await?;
        let changed = self.router.refresh(&record);
        if changed {
            self.capture = None;
        }
        self.record = record;
        Ok(changed)
    }

    /// Certificate for entry `index` of this client's history.
    pub fn certificate(&self, index: usize) -> Result<Certificate, PortalError> {
        let record = self
            .record
            .history
            .get(index)
            .ok_or(PortalError::UnknownSignature(index))?;
        Ok(self
            .signing
            .render_certificate(self.identity.client_id(), record)?)
    }

    /// End the session. Identity, snapshot and drawing go with it.
    pub fn sign_out(self) -> Identity {
        log_client_event!(
            info,
            "session",
            "Portal session closed",
            self.identity.client_id()
        );
        self.identity
    }
}
