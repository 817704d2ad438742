//! # Core Domain Entities
//!
//! Portal entities: identities, folders, requests, signatures and records.
//!
//! ## Clusters
//!
//! - **Identity**: `ClientId`, `Identity`, `AuthMethod`
//! - **Documents**: `FolderRef`, `RequestId`, `SignatureRequest`
//! - **Signatures**: `SignatureRecord`, `SignatureOrigin`
//! - **Records**: `ClientRecord`, `ClientStatus`

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::IdentifierError;
use crate::image::RasterImage;

/// Instant in UTC. Serialized as RFC 3339.
pub type Timestamp = DateTime<Utc>;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Canonical identity: the fully qualified identifier used as the record key.
///
/// Identifiers are trimmed and lowercased, so `Smith@Evans-Portal.com` and
/// `smith@evans-portal.com` name the same client. Stored keys go through the
/// same folding when read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Result<Self, IdentifierError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::Empty("client id"));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local part of the identifier (everything before the first `@`).
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or(&self.0)
    }
}

impl TryFrom<String> for ClientId {
    type Error = IdentifierError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<ClientId> for String {
    fn from(id: ClientId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How an identity was established.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthMethod {
    /// Identifier + secret.
    Password,
    /// Assertion from a federated provider (e.g. "google").
    Federated { provider: String },
}

/// Authenticated identity for one portal session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Canonical identity (`{email}`-shaped).
    pub email: ClientId,
    /// Display name reported by the provider, if any.
    pub display_name: Option<String>,
    /// How the identity was established.
    pub method: AuthMethod,
}

impl Identity {
    pub fn new(email: ClientId, method: AuthMethod) -> Self {
        Self {
            email,
            display_name: None,
            method,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// The record key this identity may access.
    pub fn client_id(&self) -> &ClientId {
        &self.email
    }
}

// =============================================================================
// CLUSTER B: DOCUMENTS
// =============================================================================

/// Opaque document-folder reference, resolved by the external viewer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderRef(String);

impl FolderRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for FolderRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signature request id (decimal milliseconds since the UNIX epoch).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_millis(millis: i64) -> Self {
        Self(millis.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value when the id is time-derived.
    pub fn as_millis(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named, pending ask for a client to sign the documents in a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRequest {
    pub id: RequestId,
    pub name: String,
    #[serde(default)]
    pub folder_id: FolderRef,
    /// Epoch when absent in older documents.
    #[serde(default)]
    pub created_at: Timestamp,
}

// =============================================================================
// CLUSTER C: SIGNATURES
// =============================================================================

/// Which record representation a signature was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureOrigin {
    /// Entry of the append-only `signatures` history.
    History,
    /// The single `signature` value of records predating request queues.
    Legacy,
}

/// Document name recorded when the legacy quote folder is signed.
pub const LEGACY_QUOTE_DOC_NAME: &str = "Quote";

/// Immutable proof that a client signed a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRecord {
    pub origin: SignatureOrigin,
    pub signer: ClientId,
    pub signed_at: Timestamp,
    pub image: RasterImage,
    pub doc_name: Option<String>,
    pub doc_id: Option<RequestId>,
}

impl SignatureRecord {
    /// Builds the history record for a signed request.
    pub fn for_request(
        signer: ClientId,
        request: &SignatureRequest,
        image: RasterImage,
        signed_at: Timestamp,
    ) -> Self {
        Self {
            origin: SignatureOrigin::History,
            signer,
            signed_at,
            image,
            doc_name: Some(request.name.clone()),
            doc_id: Some(request.id.clone()),
        }
    }

    /// Builds the history record for a signed legacy quote. It carries a
    /// document name but no request id.
    pub fn for_legacy_quote(signer: ClientId, image: RasterImage, signed_at: Timestamp) -> Self {
        Self {
            origin: SignatureOrigin::History,
            signer,
            signed_at,
            image,
            doc_name: Some(LEGACY_QUOTE_DOC_NAME.to_string()),
            doc_id: None,
        }
    }

    pub fn is_legacy(&self) -> bool {
        self.origin == SignatureOrigin::Legacy
    }
}

// =============================================================================
// CLUSTER D: RECORDS
// =============================================================================

/// Lifecycle status of a client.
///
/// Unknown values written by older tooling are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClientStatus {
    #[default]
    Lead,
    Quoted,
    InProgress,
    Completed,
    Other(String),
}

impl ClientStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Lead => "Lead",
            Self::Quoted => "Quoted",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ClientStatus {
    fn from(value: String) -> Self {
        match value.trim() {
            "Lead" => Self::Lead,
            "Quoted" => Self::Quoted,
            "In Progress" | "InProgress" => Self::InProgress,
            "Completed" => Self::Completed,
            _ => Self::Other(value),
        }
    }
}

impl From<ClientStatus> for String {
    fn from(value: ClientStatus) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized per-client record.
///
/// INVARIANT: no request id in `pending` appears as a `doc_id` in `history`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientRecord {
    pub id: ClientId,
    /// Primary document folder.
    pub folder_id: FolderRef,
    /// Legacy quote folder, predating request queues.
    pub quote_folder_id: Option<FolderRef>,
    pub notes: String,
    pub status: ClientStatus,
    pub project_value: Decimal,
    pub created_at: Option<Timestamp>,
    /// Legacy single-pending flag.
    pub signature_needed: bool,
    /// Pending requests in insertion order.
    pub pending: Vec<SignatureRequest>,
    /// Signature history, legacy entry first.
    pub history: Vec<SignatureRecord>,
}

impl ClientRecord {
    pub fn pending_request(&self, id: &RequestId) -> Option<&SignatureRequest> {
        self.pending.iter().find(|r| &r.id == id)
    }

    pub fn is_pending(&self, id: &RequestId) -> bool {
        self.pending_request(id).is_some()
    }

    pub fn has_signed(&self, id: &RequestId) -> bool {
        self.history.iter().any(|s| s.doc_id.as_ref() == Some(id))
    }

    /// Quote folder awaiting a legacy signature, if both legacy fields are set.
    pub fn legacy_quote_pending(&self) -> Option<&FolderRef> {
        if !self.signature_needed {
            return None;
        }
        self.quote_folder_id.as_ref().filter(|f| !f.is_empty())
    }
}
