//! # Request Queue Manager (Subsystem 3)
//!
//! Owns the set of pending signature requests for each client.
//!
//! - `add_request`: union-writes one request with a fresh id
//! - `cancel_request`: difference-writes by id; a missing id is a no-op
//! - `list_pending`: insertion order, no priorities
//!
//! Requests are matched by id exclusively. Names are display text and may
//! repeat.

#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{QueueError, RequestIdGenerator};
pub use ports::RequestQueueApi;
pub use service::RequestQueueService;
