//! Client library for keeping local state in sync with Sui objects.
//!
//! This crate provides the leaf pieces of the sync protocol: reading a
//! typed field from a ledger object, and building validated Move call
//! requests. Submission and reconciliation live one level up.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sui_sync_client::{read_u64_field, JsonRpcClient, TransactionBuilder};
//!
//! async fn example() -> sui_sync_client::Result<()> {
//!     let client = JsonRpcClient::new("https://fullnode.testnet.sui.io:443")?;
//!
//!     // Read the counter
//!     let count = read_u64_field(&client, COUNTER_ID, "value").await?;
//!
//!     // Build an increment call; nothing is sent until a signer executes it
//!     let request = TransactionBuilder::new(PACKAGE_ID, "shared_counter", "increment")
//!         .object(COUNTER_ID)
//!         .build()?;
//!     Ok(())
//! }
//! ```
//!
//! # Mocking for Tests
//!
//! Implement [`traits::ObjectReader`] and [`traits::TransactionExecutor`], or
//! enable the `test-utils` feature for the spy implementations in `mock`.

pub mod builder;
pub mod client;
pub mod convert;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod reader;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export main types at crate root
pub use client::JsonRpcClient;
pub use error::{ClientError, Result};
pub use types::{
    Argument, ExecutionResponse, MoveTarget, ObjectId, RemoteObject, SubmissionResult,
    SuiAddress, TransactionRequest,
};

// Re-export builder entry points
pub use builder::{build, ArgInput, PendingAction, TransactionBuilder};

// Re-export reader helpers
pub use reader::{extract_field, extract_u64_field, read_field, read_u64_field};

// Re-export collaborator traits
pub use traits::{LedgerMetadata, ObjectReader, SignerError, TransactionExecutor};
