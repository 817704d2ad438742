//! # Ports Layer
//!
//! Commits persist through `sp_02_client_records::RecordAccessorApi`.

pub mod inbound;

pub use inbound::SigningApi;
