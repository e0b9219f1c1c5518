//! sui-sync - keep a local view in step with Sui objects
//!
//! Reads shared objects from a fullnode, submits Move calls through an
//! external signer, and re-reads what changed once the ledger confirms.

pub mod config;
pub mod coordinator;
pub mod utils;
