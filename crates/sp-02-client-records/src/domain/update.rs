//! # Document Updates
//!
//! The only write shape the record store accepts. Scalars are patched
//! last-writer-wins; the request set and signature history are changed by
//! union, difference and append, never replaced wholesale.
//!
//! `apply_update` is the single definition of these semantics. Every store
//! adapter runs it under its own per-document exclusion.

use rust_decimal::Decimal;
use shared_types::{ClientStatus, FolderRef, RequestId, SignatureRequest};

use super::document::{ClientDocument, SignatureEntry};

/// Scalar field patch. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub folder_id: Option<FolderRef>,
    /// `Some(None)` clears the legacy quote folder.
    pub quote_folder_id: Option<Option<FolderRef>>,
    pub notes: Option<String>,
    pub status: Option<ClientStatus>,
    pub project_value: Option<Decimal>,
    pub signature_needed: Option<bool>,
}

impl FieldPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    fn apply(&self, doc: &mut ClientDocument) {
        if let Some(folder) = &self.folder_id {
            doc.folder_id = folder.clone();
        }
        if let Some(quote) = &self.quote_folder_id {
            doc.quote_folder_id = quote.clone().filter(|f| !f.is_empty());
        }
        if let Some(notes) = &self.notes {
            doc.notes = notes.clone();
        }
        if let Some(status) = &self.status {
            doc.status = status.clone();
        }
        if let Some(value) = self.project_value {
            doc.project_value = value;
        }
        if let Some(needed) = self.signature_needed {
            doc.signature_needed = needed;
        }
    }
}

/// Atomic change to one client document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentUpdate {
    pub fields: FieldPatch,
    /// Union by id.
    pub add_requests: Vec<SignatureRequest>,
    /// Difference by id.
    pub remove_requests: Vec<RequestId>,
    pub append_signatures: Vec<SignatureEntry>,
    /// Apply only while this request is still pending.
    pub require_pending: Option<RequestId>,
    /// Apply only while the legacy `signatureNeeded` flag is set.
    pub require_signature_needed: bool,
}

impl DocumentUpdate {
    pub fn patch(fields: FieldPatch) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    pub fn add_request(request: SignatureRequest) -> Self {
        Self {
            add_requests: vec![request],
            ..Self::default()
        }
    }

    pub fn remove_request(id: RequestId) -> Self {
        Self {
            remove_requests: vec![id],
            ..Self::default()
        }
    }

    /// Append the signature for `id` and drop it from pending, only if it is
    /// still pending.
    pub fn resolve_request(id: RequestId, entry: SignatureEntry) -> Self {
        Self {
            remove_requests: vec![id.clone()],
            append_signatures: vec![entry],
            require_pending: Some(id),
            ..Self::default()
        }
    }

    /// Append a legacy quote signature and clear `signatureNeeded`, only if
    /// the flag is still set.
    pub fn resolve_legacy_quote(entry: SignatureEntry) -> Self {
        Self {
            fields: FieldPatch {
                signature_needed: Some(false),
                ..FieldPatch::default()
            },
            append_signatures: vec![entry],
            require_signature_needed: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
            && self.add_requests.is_empty()
            && self.remove_requests.is_empty()
            && self.append_signatures.is_empty()
    }
}

/// What an update actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// `false` when a precondition failed.
    pub applied: bool,
    pub requests_added: usize,
    pub requests_removed: usize,
    pub signatures_appended: usize,
}

impl UpdateOutcome {
    fn rejected() -> Self {
        Self::default()
    }
}

/// Applies `update` to `doc` in place.
///
/// Either the whole update is applied or, when a precondition fails,
/// nothing is.
pub fn apply_update(doc: &mut ClientDocument, update: &DocumentUpdate) -> UpdateOutcome {
    if let Some(required) = &update.require_pending {
        if !doc.signature_requests.iter().any(|r| &r.id == required) {
            return UpdateOutcome::rejected();
        }
    }
    if update.require_signature_needed && !doc.signature_needed {
        return UpdateOutcome::rejected();
    }

    let mut outcome = UpdateOutcome {
        applied: true,
        ..UpdateOutcome::default()
    };

    update.fields.apply(doc);

    let before = doc.signature_requests.len();
    doc.signature_requests
        .retain(|r| !update.remove_requests.contains(&r.id));
    outcome.requests_removed = before - doc.signature_requests.len();

    for entry in &update.append_signatures {
        // History is keyed by request id for request-derived entries.
        let duplicate = entry.doc_id.as_ref().is_some_and(|id| {
            doc.signatures
                .iter()
                .any(|s| s.doc_id.as_ref() == Some(id))
        });
        if !duplicate {
            doc.signatures.push(entry.clone());
            outcome.signatures_appended += 1;
        }
    }

    for request in &update.add_requests {
        if !doc.knows_request(&request.id) {
            doc.signature_requests.push(request.clone());
            outcome.requests_added += 1;
        }
    }

    outcome
}
