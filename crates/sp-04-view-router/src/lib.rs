//! # View Router (Subsystem 4)
//!
//! Decides which document folder the client's embedded viewer shows.
//!
//! The router is local session state. It never writes to the record store;
//! `PortalSession` feeds it sign results and re-read records.

#![warn(clippy::all)]

pub mod domain;
pub mod router;
pub mod viewer;

pub use domain::{RouterError, ViewState};
pub use router::ViewRouter;
pub use viewer::{folder_url, viewer_url, ViewerConfig, DEFAULT_EMBED_BASE, DEFAULT_FOLDER_BASE};
