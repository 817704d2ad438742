//! # Service Container
//!
//! Holds every subsystem service behind its inbound port, built once from a
//! `PortalConfig`.
//!
//! ```text
//! sp-01 Identity ─────────────┐
//!                             ▼
//!                       PortalSession ──▶ sp-04 ViewRouter
//!                        │        │
//! sp-03 RequestQueue ◀── AdminConsole     │
//!        │               │        ▼
//!        └──────▶ sp-02 Records ◀── sp-05 Signing
//! ```

pub mod config;
pub mod services;

pub use config::{
    AccountEntry, ConfigError, FederatedLink, IdentitySection, PortalConfig, RecordsSection,
    StoreBackend, DEFAULT_PORTAL_URL,
};
pub use services::PortalContainer;
