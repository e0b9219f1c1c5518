//! Shared utilities for the sui-sync binary.

pub mod bootstrap;
pub mod retry;
