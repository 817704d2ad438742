//! # Error Types
//!
//! Errors raised by the shared entity constructors.

use thiserror::Error;

/// Errors building or parsing a `RasterImage`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// Bytes do not start with the PNG signature.
    #[error("Image is not a PNG")]
    NotPng,

    /// Data URL is not `data:image/png;base64,`.
    #[error("Unsupported data URL (expected data:image/png;base64)")]
    UnsupportedDataUrl,

    /// Data URL payload is not valid base64.
    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(String),
}

/// Errors building identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Identifier is empty after trimming.
    #[error("{0} must not be empty")]
    Empty(&'static str),
}
