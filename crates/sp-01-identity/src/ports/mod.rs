//! Ports layer for the Identity Resolver.
//!
//! - Inbound (Driving) ports: API exposed to the portal runtime
//! - Outbound (Driven) ports: the external identity provider

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
