//! # Ports Layer
//!
//! - `inbound`: the accessor API
//! - `outbound`: the record store

pub mod inbound;
pub mod outbound;

pub use inbound::RecordAccessorApi;
pub use outbound::ClientRecordStore;
