//! # Signing Portal Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Shared records, clocks and drawings
//! └── integration/      # Cross-subsystem flows
//!     ├── flows.rs      # Request lifecycle: add, view, sign, cancel
//!     ├── legacy.rs     # Documents written before request queues
//!     └── concurrency.rs # Duplicate submissions and concurrent writers
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p portal-tests
//! cargo test -p portal-tests integration::legacy::
//! ```

#![allow(dead_code)]

pub mod fixtures;
pub mod integration;
