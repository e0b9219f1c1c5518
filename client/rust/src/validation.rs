//! Local precondition checks for transaction arguments.
//!
//! Everything here runs before a request leaves the process, so a bad
//! argument costs no round trip.
//!
//! # Example
//!
//! ```rust,ignore
//! use sui_sync_client::validation::{require_identifier, require_u64};
//!
//! fn mint_args(function: &str, amount: i128) -> sui_sync_client::Result<u64> {
//!     require_identifier(function, "operation")?;
//!     require_u64(amount, "amount")
//! }
//! ```

use crate::convert::is_move_identifier;
use crate::error::{ClientError, Result};

/// Require that a value fits in an unsigned 64-bit integer.
pub fn require_u64(value: i128, field_name: &str) -> Result<u64> {
    if value < 0 {
        return Err(ClientError::InvalidArgument(format!(
            "{} must be non-negative, got {}",
            field_name, value
        )));
    }
    u64::try_from(value).map_err(|_| {
        ClientError::InvalidArgument(format!(
            "{} must fit in 64 bits, got {}",
            field_name, value
        ))
    })
}

/// Require that a string is a valid Move identifier.
pub fn require_identifier(value: &str, field_name: &str) -> Result<()> {
    if !is_move_identifier(value) {
        return Err(ClientError::InvalidArgument(format!(
            "{} {:?} is not a valid Move identifier",
            field_name, value
        )));
    }
    Ok(())
}

/// Require that a string is not empty.
pub fn require_not_empty_str(value: &str, field_name: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ClientError::InvalidArgument(format!(
            "{} must not be empty",
            field_name
        )));
    }
    Ok(())
}
