//! # Stored Document Format
//!
//! The wire shape of a client document as the record store holds it, and the
//! read-time normalization into `ClientRecord`.
//!
//! Two generations of signature data coexist in stored documents:
//!
//! - `signature`: a single legacy value (`{signedAt, image}`) from before
//!   request queues existed, paired with the `signatureNeeded` flag.
//! - `signatures`: the append-only history.
//!
//! `normalize` merges both into one history with the legacy entry first, so
//! nothing past this module needs to know about the old shape.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{
    ClientId, ClientRecord, ClientStatus, FolderRef, RasterImage, RequestId, SignatureOrigin,
    SignatureRecord, SignatureRequest, Timestamp,
};

/// A client document as persisted. Missing fields deserialize to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientDocument {
    pub folder_id: FolderRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_folder_id: Option<FolderRef>,
    pub notes: String,
    pub project_value: Decimal,
    pub status: ClientStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    pub signature_requests: Vec<SignatureRequest>,
    pub signatures: Vec<SignatureEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<LegacySignature>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub signature_needed: bool,
}

/// One entry of the `signatures` history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureEntry {
    pub signed_at: Timestamp,
    pub image: RasterImage,
    pub signer: ClientId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<RequestId>,
}

/// The single pre-queue `signature` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySignature {
    pub signed_at: Timestamp,
    pub image: RasterImage,
    /// Absent in the oldest documents; the document key is the signer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer: Option<ClientId>,
}

impl From<&SignatureRecord> for SignatureEntry {
    fn from(record: &SignatureRecord) -> Self {
        Self {
            signed_at: record.signed_at,
            image: record.image.clone(),
            signer: record.signer.clone(),
            doc_name: record.doc_name.clone(),
            doc_id: record.doc_id.clone(),
        }
    }
}

impl SignatureEntry {
    fn into_record(self) -> SignatureRecord {
        SignatureRecord {
            origin: SignatureOrigin::History,
            signer: self.signer,
            signed_at: self.signed_at,
            image: self.image,
            doc_name: self.doc_name,
            doc_id: self.doc_id,
        }
    }
}

/// Fields supplied at onboarding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewClient {
    pub folder_id: FolderRef,
    pub quote_folder_id: Option<FolderRef>,
    pub notes: String,
    pub status: Option<ClientStatus>,
    pub project_value: Option<Decimal>,
}

impl NewClient {
    pub fn with_folder(folder_id: impl Into<String>) -> Self {
        Self {
            folder_id: FolderRef::new(folder_id),
            ..Self::default()
        }
    }
}

impl ClientDocument {
    /// Fresh document for a newly onboarded client: status `Lead`, value zero,
    /// empty queues.
    pub fn onboard(new: NewClient, created_at: Timestamp) -> Self {
        Self {
            folder_id: new.folder_id,
            quote_folder_id: new.quote_folder_id.filter(|f| !f.is_empty()),
            notes: new.notes,
            project_value: new.project_value.unwrap_or(Decimal::ZERO),
            status: new.status.unwrap_or_default(),
            created_at: Some(created_at),
            ..Self::default()
        }
    }

    /// Whether `id` is pending or already resolved into the history.
    pub fn knows_request(&self, id: &RequestId) -> bool {
        self.signature_requests.iter().any(|r| &r.id == id)
            || self.signatures.iter().any(|s| s.doc_id.as_ref() == Some(id))
    }
}

/// Normalizes a stored document into the record business logic works with.
pub fn normalize(id: ClientId, doc: ClientDocument) -> ClientRecord {
    let mut history = Vec::with_capacity(doc.signatures.len() + 1);
    if let Some(legacy) = doc.signature {
        history.push(SignatureRecord {
            origin: SignatureOrigin::Legacy,
            signer: legacy.signer.unwrap_or_else(|| id.clone()),
            signed_at: legacy.signed_at,
            image: legacy.image,
            doc_name: None,
            doc_id: None,
        });
    }
    history.extend(doc.signatures.into_iter().map(SignatureEntry::into_record));

    // A request resolved by a concurrent writer may still linger in the
    // pending set of an old document; the history wins.
    let pending = doc
        .signature_requests
        .into_iter()
        .filter(|r| !history.iter().any(|s| s.doc_id.as_ref() == Some(&r.id)))
        .collect();

    ClientRecord {
        id,
        folder_id: doc.folder_id,
        quote_folder_id: doc.quote_folder_id.filter(|f| !f.is_empty()),
        notes: doc.notes,
        status: doc.status,
        project_value: doc.project_value,
        created_at: doc.created_at,
        signature_needed: doc.signature_needed,
        pending,
        history,
    }
}
