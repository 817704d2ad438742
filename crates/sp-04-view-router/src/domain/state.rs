//! View states.

use shared_types::SignatureRequest;

/// What the client is currently looking at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// The client's primary folder.
    Main,
    /// The folder of one pending request.
    Request(SignatureRequest),
    /// The legacy quote folder awaiting a signature.
    QuoteFolder,
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Main => "Main",
            Self::Request(_) => "Request",
            Self::QuoteFolder => "QuoteFolder",
        }
    }

    pub fn is_main(&self) -> bool {
        matches!(self, Self::Main)
    }

    /// The open request, if any.
    pub fn request(&self) -> Option<&SignatureRequest> {
        match self {
            Self::Request(r) => Some(r),
            _ => None,
        }
    }
}
