//! Step definition modules for Cucumber feature tests.

pub mod object_reader;
pub mod transaction_builder;
