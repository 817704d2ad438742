//! # Client Record Accessor (Subsystem 2)
//!
//! Reads and writes per-client records keyed by canonical identity.
//!
//! ## Write Model
//!
//! Scalar fields merge last-writer-wins. The pending-request set and the
//! signature history are only ever changed by union, difference and append
//! through `DocumentUpdate`, applied atomically per document by the store.
//! An admin cancelling one request and a client signing another can
//! therefore never clobber each other.
//!
//! ## Read Model
//!
//! Stored documents may carry the pre-queue `signature`/`signatureNeeded`
//! fields. `domain::document::normalize` folds them into one history so
//! callers only see `ClientRecord`.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────┐     ┌──────────────────────┐
//! │ RecordAccessorApi     │────▶│ ClientRecordStore    │
//! │ (RecordAccessor)      │     │ ├ InMemoryRecordStore│
//! └───────────────────────┘     │ └ JsonFileRecordStore│
//!                               └──────────────────────┘
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryRecordStore, JsonFileRecordStore};
pub use domain::{
    apply_update, normalize, ClientDocument, DocumentUpdate, FieldPatch, LegacySignature,
    NewClient, RecordError, SignatureEntry, StoreError, UpdateOutcome,
};
pub use ports::{ClientRecordStore, RecordAccessorApi};
pub use service::RecordAccessor;
