//! # Domain Module
//!
//! Core domain types for identity resolution.

pub mod credentials;
pub mod errors;
pub mod normalize;

pub use credentials::*;
pub use errors::*;
pub use normalize::*;
