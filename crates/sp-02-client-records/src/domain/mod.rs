//! # Domain Layer
//!
//! Stored document format, update semantics and errors.

pub mod document;
pub mod errors;
pub mod update;

pub use document::{normalize, ClientDocument, LegacySignature, NewClient, SignatureEntry};
pub use errors::{RecordError, StoreError};
pub use update::{apply_update, DocumentUpdate, FieldPatch, UpdateOutcome};
