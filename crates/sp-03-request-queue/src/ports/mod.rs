//! # Ports Layer
//!
//! The queue persists through `sp_02_client_records::RecordAccessorApi`; it
//! has no outbound port of its own.

pub mod inbound;

pub use inbound::RequestQueueApi;
