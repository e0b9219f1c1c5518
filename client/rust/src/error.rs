//! Error types for the sui-sync client library.

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while reading objects or dispatching transactions.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The object id did not resolve to a live object.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The ledger answered, but not in the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Network or endpoint failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Invalid argument provided by caller, detected before any network call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No signer is connected.
    #[error("no signer connected")]
    NoSigner,

    /// The ledger declined the transaction. The reason is passed through verbatim.
    #[error("transaction rejected: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::MalformedResponse(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl ClientError {
    /// Returns the error message.
    pub fn message(&self) -> String {
        match self {
            ClientError::NotFound(msg) => msg.clone(),
            ClientError::MalformedResponse(msg) => msg.clone(),
            ClientError::Transport(msg) => msg.clone(),
            ClientError::InvalidArgument(msg) => msg.clone(),
            ClientError::NoSigner => "no signer connected".to_string(),
            ClientError::Rejected(reason) => reason.clone(),
        }
    }

    /// Returns true if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    /// Returns true if the response could not be interpreted.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ClientError::MalformedResponse(_))
    }

    /// Returns true if this is an "invalid argument" error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ClientError::InvalidArgument(_))
    }

    /// Returns true if this is a network or endpoint error.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    /// Returns true if the error was raised locally, before any network call.
    pub fn is_local(&self) -> bool {
        matches!(self, ClientError::InvalidArgument(_) | ClientError::NoSigner)
    }
}
