//! User-facing status notifications.

use std::fmt;

/// How loudly a notification should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One status message for the presentation layer.
///
/// Each failure kind has its own variant so the user can tell them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The ledger confirmed a transaction.
    Confirmed { operation: String, digest: String },
    /// The ledger or wallet declined a transaction. `reason` is verbatim.
    Rejected { operation: String, reason: String },
    /// Input failed validation; nothing was sent.
    InvalidArgument { operation: String, message: String },
    /// An action was requested with no signer connected.
    NoSigner { operation: String },
    /// A read failed; the previous value is still shown.
    ReadFailed { object_id: String, message: String },
    /// A transaction succeeded, but re-reading an object afterwards failed.
    ReconcileFailed { object_id: String, message: String },
    /// The endpoint did not report a version.
    ProtocolVersionUnavailable { message: String },
}

impl Notification {
    pub fn severity(&self) -> Severity {
        match self {
            Notification::Confirmed { .. } => Severity::Info,
            Notification::ReconcileFailed { .. }
            | Notification::ProtocolVersionUnavailable { .. } => Severity::Warning,
            Notification::Rejected { .. }
            | Notification::InvalidArgument { .. }
            | Notification::NoSigner { .. }
            | Notification::ReadFailed { .. } => Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Confirmed { operation, digest } => {
                write!(f, "{} confirmed (digest {})", operation, digest)
            }
            Notification::Rejected { operation, reason } => {
                write!(f, "{} rejected: {}", operation, reason)
            }
            Notification::InvalidArgument { operation, message } => {
                write!(f, "{} not sent, invalid input: {}", operation, message)
            }
            Notification::NoSigner { operation } => {
                write!(f, "connect a wallet before running {}", operation)
            }
            Notification::ReadFailed { object_id, message } => {
                write!(f, "could not read {}: {}", object_id, message)
            }
            Notification::ReconcileFailed { object_id, message } => write!(
                f,
                "transaction succeeded, but refreshing {} failed: {}",
                object_id, message
            ),
            Notification::ProtocolVersionUnavailable { message } => {
                write!(f, "protocol version unavailable: {}", message)
            }
        }
    }
}
