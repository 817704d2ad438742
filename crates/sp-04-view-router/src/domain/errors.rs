use thiserror::Error;

/// View Router errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The action is not valid from the current state. State is unchanged.
    #[error("Cannot {action} while viewing {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },
}
