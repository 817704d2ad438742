//! # Portal Runtime Library
//!
//! Assembles the subsystems into the two surfaces of the portal:
//!
//! - `PortalSession`: one signed-in client browsing folders and signing
//! - `AdminConsole`: back-office management of every client record
//!
//! Both share one `SubmissionGate`, so a client and an operator cannot run
//! the same action on the same record twice at once.
//!
//! ## Modules
//!
//! - `container/` - configuration and service wiring
//! - `session` - client session state
//! - `admin` - admin operations
//! - `gate` - duplicate-submission guard
//! - `errors` - `PortalError` and `ErrorKind`

#![warn(clippy::all)]

pub mod admin;
pub mod container;
pub mod errors;
pub mod gate;
pub mod session;

pub use admin::{AdminConsole, FolderLinks};
pub use container::{ConfigError, PortalConfig, PortalContainer, StoreBackend};
pub use errors::{ErrorKind, PortalError};
pub use gate::{GateAction, SubmissionGate, SubmissionPermit};
pub use session::PortalSession;
