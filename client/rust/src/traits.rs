//! Traits for the external collaborators: the ledger and the signer.
//!
//! The JSON-RPC client implements the ledger side; wallets implement
//! [`TransactionExecutor`]. Implement these to create mock clients for
//! testing or alternative transports.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ExecutionResponse, ObjectId, RemoteObject, TransactionRequest};

/// Read access to ledger objects.
#[async_trait]
pub trait ObjectReader: Send + Sync {
    /// Fetch the current representation of an object, including its content.
    async fn get_object(&self, id: &ObjectId) -> Result<RemoteObject>;
}

/// Endpoint metadata, used for display only.
#[async_trait]
pub trait LedgerMetadata: Send + Sync {
    /// Version descriptor reported by the endpoint.
    async fn protocol_version(&self) -> Result<String>;
}

/// Opaque failure reported by a signer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SignerError {
    pub message: String,
}

impl SignerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Signs a request and executes it on the ledger.
///
/// Called at most once per request. Any error, including the wallet
/// declining to sign, is treated as a rejection.
#[async_trait]
pub trait TransactionExecutor: Send + Sync {
    async fn sign_and_execute(
        &self,
        request: &TransactionRequest,
    ) -> std::result::Result<ExecutionResponse, SignerError>;
}
