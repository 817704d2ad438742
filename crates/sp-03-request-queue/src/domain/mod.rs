//! # Domain Layer

pub mod errors;
pub mod request_id;

pub use errors::QueueError;
pub use request_id::RequestIdGenerator;
