//! # Signature Capture & Certification (Subsystem 5)
//!
//! Per-request state machine: `Unsigned -> Signed`, terminal.
//!
//! ```text
//! begin_capture(R) ──▶ CaptureSession ──commit──▶ Committed(SignatureRecord)
//!                        │      │                  or AlreadyResolved
//!                        │      └─ store outage ──▶ RemoteWrite, session kept
//!                        └─ drop ──▶ cancelled, nothing written
//! ```
//!
//! A commit is one `DocumentUpdate` that appends the history entry and removes
//! the request, conditional on the request still being pending.

#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{
    certificate_file_name, render_certificate, CaptureConfig, CaptureError, CaptureSession,
    CaptureTarget, Certificate, CertificateConfig, CertificateError, CommitOutcome, Point,
    CERTIFICATE_TITLE, DEFAULT_DATE_FORMAT,
};
pub use ports::SigningApi;
pub use service::SigningService;
