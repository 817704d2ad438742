//! # Domain Layer

pub mod errors;
pub mod state;

pub use errors::RouterError;
pub use state::ViewState;
