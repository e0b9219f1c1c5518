//! Transaction construction.
//!
//! [`build`] turns unvalidated user input into an inert [`TransactionRequest`].
//! It is pure: no I/O, no clock, no randomness, so identical inputs always
//! produce equal requests. [`TransactionBuilder`] is the fluent front end.

use crate::error::{ClientError, Result};
use crate::types::{Argument, MoveTarget, ObjectId, SuiAddress, TransactionRequest};
use crate::validation::{require_identifier, require_u64};

/// An argument as supplied by the caller, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgInput {
    /// Shared object reference by id.
    ObjectRef(String),
    /// Integer that must land in `0..=u64::MAX`.
    U64(i128),
    /// Address string that must match `0x` + 64 hex digits.
    Address(String),
}

impl ArgInput {
    pub fn object(id: impl Into<String>) -> Self {
        ArgInput::ObjectRef(id.into())
    }

    pub fn u64(value: impl Into<i128>) -> Self {
        ArgInput::U64(value.into())
    }

    pub fn address(address: impl Into<String>) -> Self {
        ArgInput::Address(address.into())
    }

    fn validate(&self, position: usize) -> Result<Argument> {
        let at = |e: ClientError| match e {
            ClientError::InvalidArgument(msg) => {
                ClientError::InvalidArgument(format!("argument {}: {}", position, msg))
            }
            other => other,
        };
        match self {
            ArgInput::ObjectRef(id) => ObjectId::new(id.clone()).map(Argument::ObjectRef).map_err(at),
            ArgInput::U64(value) => require_u64(*value, "u64 value").map(Argument::U64).map_err(at),
            ArgInput::Address(addr) => SuiAddress::parse(addr).map(Argument::Address).map_err(at),
        }
    }
}

/// Build a request for `target::operation(args...)`.
///
/// Argument order is preserved exactly. Object references are passed by id
/// only; the ledger picks the live version at execution time.
pub fn build(operation: &str, target: &MoveTarget, args: &[ArgInput]) -> Result<TransactionRequest> {
    require_identifier(operation, "operation")?;
    let arguments = args
        .iter()
        .enumerate()
        .map(|(i, arg)| arg.validate(i))
        .collect::<Result<Vec<_>>>()?;
    Ok(TransactionRequest::new(
        target.clone(),
        operation.to_string(),
        arguments,
    ))
}

/// One user intent, not yet submitted.
///
/// Consumed by [`PendingAction::build`]; a pending action is turned into at
/// most one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub operation: String,
    pub target: MoveTarget,
    pub args: Vec<ArgInput>,
}

impl PendingAction {
    pub fn new(operation: impl Into<String>, target: MoveTarget, args: Vec<ArgInput>) -> Self {
        Self {
            operation: operation.into(),
            target,
            args,
        }
    }

    /// Validate and turn this action into a request.
    pub fn build(self) -> Result<TransactionRequest> {
        build(&self.operation, &self.target, &self.args)
    }
}

/// Fluent builder for Move call requests.
///
/// Validation is deferred to [`TransactionBuilder::build`], so a chain never
/// panics midway.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    package: String,
    module: String,
    operation: String,
    args: Vec<ArgInput>,
}

impl TransactionBuilder {
    /// Start a call to `package::module::operation`.
    pub fn new(
        package: impl Into<String>,
        module: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            module: module.into(),
            operation: operation.into(),
            args: Vec::new(),
        }
    }

    /// Append a shared object reference.
    pub fn object(mut self, id: impl Into<String>) -> Self {
        self.args.push(ArgInput::object(id));
        self
    }

    /// Append a `u64` argument.
    pub fn u64(mut self, value: impl Into<i128>) -> Self {
        self.args.push(ArgInput::u64(value));
        self
    }

    /// Append an address argument.
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.args.push(ArgInput::address(address));
        self
    }

    /// Append an already-typed argument.
    pub fn arg(mut self, arg: ArgInput) -> Self {
        self.args.push(arg);
        self
    }

    /// Convert into a [`PendingAction`], validating only the target.
    pub fn into_pending(self) -> Result<PendingAction> {
        let target = MoveTarget::new(&self.package, &self.module)?;
        Ok(PendingAction::new(self.operation, target, self.args))
    }

    /// Validate everything and produce the request.
    pub fn build(self) -> Result<TransactionRequest> {
        self.into_pending()?.build()
    }
}
