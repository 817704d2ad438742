//! # View Router
//!
//! ```text
//!                 open_request(R)
//!        ┌──────┐ ─────────────▶ ┌────────────┐
//!        │ Main │                │ Request(R) │
//!        └──────┘ ◀───────────── └────────────┘
//!           ▲      back_to_main / on_signed(R) / reconcile
//!           │
//!           │ back_to_main / on_legacy_signed
//!     ┌─────────────┐
//!     │ QuoteFolder │  initial, when the legacy flag and quote folder are set
//!     └─────────────┘
//! ```

use shared_types::{ClientRecord, FolderRef, RequestId, SignatureRequest};
use tracing::debug;

use crate::domain::{RouterError, ViewState};

/// Per-session navigation state.
#[derive(Debug, Clone)]
pub struct ViewRouter {
    primary: FolderRef,
    quote_folder: Option<FolderRef>,
    state: ViewState,
}

impl ViewRouter {
    /// Initial router for a freshly loaded record.
    pub fn for_record(record: &ClientRecord) -> Self {
        let quote_folder = record.legacy_quote_pending().cloned();
        let state = if quote_folder.is_some() {
            ViewState::QuoteFolder
        } else {
            ViewState::Main
        };
        Self {
            primary: record.folder_id.clone(),
            quote_folder,
            state,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Folder the viewer should currently show.
    pub fn active_folder(&self) -> &FolderRef {
        match &self.state {
            ViewState::Main => &self.primary,
            ViewState::Request(request) => &request.folder_id,
            ViewState::QuoteFolder => self.quote_folder.as_ref().unwrap_or(&self.primary),
        }
    }

    /// `Main -> Request(R)`.
    pub fn open_request(&mut self, request: &SignatureRequest) -> Result<&FolderRef, RouterError> {
        if !self.state.is_main() {
            return Err(RouterError::InvalidTransition {
                from: self.state.name(),
                action: "open a request",
            });
        }
        debug!(request_id = %request.id, "[sp-04] Opening request folder");
        self.state = ViewState::Request(request.clone());
        Ok(self.active_folder())
    }

    /// Back to the primary folder. No-op from `Main`.
    pub fn back_to_main(&mut self) -> &FolderRef {
        if !self.state.is_main() {
            debug!(from = self.state.name(), "[sp-04] Back to main folder");
            self.state = ViewState::Main;
        }
        &self.primary
    }

    /// A request was signed. Returns to `Main` if it was the open one.
    pub fn on_signed(&mut self, id: &RequestId) -> bool {
        match self.state.request() {
            Some(open) if &open.id == id => {
                self.state = ViewState::Main;
                true
            }
            _ => false,
        }
    }

    /// The legacy quote was signed.
    pub fn on_legacy_signed(&mut self) {
        self.quote_folder = None;
        if matches!(self.state, ViewState::QuoteFolder) {
            self.state = ViewState::Main;
        }
    }

    /// Leave a request view whose request is no longer pending. Returns
    /// whether the state changed.
    pub fn reconcile(&mut self, pending: &[SignatureRequest]) -> bool {
        let stale = self
            .state
            .request()
            .is_some_and(|open| !pending.iter().any(|r| r.id == open.id));
        if stale {
            debug!("[sp-04] Open request resolved elsewhere, back to main");
            self.state = ViewState::Main;
        }
        stale
    }

    /// Track a re-read record: new primary folder, resolved requests, cleared
    /// legacy flag.
    pub fn refresh(&mut self, record: &ClientRecord) -> bool {
        self.primary = record.folder_id.clone();
        self.quote_folder = record.legacy_quote_pending().cloned();

        let mut changed = self.reconcile(&record.pending);
        if matches!(self.state, ViewState::QuoteFolder) && self.quote_folder.is_none() {
            self.state = ViewState::Main;
            changed = true;
        }
        changed
    }
}
