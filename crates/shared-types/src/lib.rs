//! # Shared Types Crate
//!
//! This crate contains the portal entities shared by every component.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-component types are defined here.
//! - **Normalized Records**: `ClientRecord` is the read-time normalized form;
//!   the wire format (with its legacy fields) never leaves the record crate.
//! - **Explicit Identity**: Every core operation receives the caller's
//!   `Identity` as an argument. Nothing here holds ambient session state.

pub mod clock;
pub mod entities;
pub mod errors;
pub mod image;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entities::*;
pub use errors::*;
pub use image::RasterImage;
