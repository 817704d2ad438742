//! Portal-Admin: command-line back office for the signing portal.
//!
//! Every command runs against the same `AdminConsole` the runtime exposes,
//! so validation, duplicate-submission guarding and logging are shared.
//!
//! ```text
//! portal-admin --store ./data/clients.json create smith --folder 1AbC
//! portal-admin request add smith "Deck Quote" --folder 1XyZ
//! portal-admin show smith
//! portal-admin certificate smith 0 --out ./receipts
//! ```

pub mod cli;
pub mod commands;
pub mod render;

pub use cli::{Cli, ClientFields, Command, RequestCommand};
pub use commands::execute;
