//! Core value types shared by the reader, the builder and the dispatcher.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::convert::SUI_ADDRESS_LENGTH;
use crate::error::{ClientError, Result};

/// Opaque identifier of an on-chain object.
///
/// The client does not interpret it beyond requiring it to be non-empty;
/// resolution is the ledger's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub(crate) String);

impl ObjectId {
    /// Wrap an object id, rejecting the empty string.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(ClientError::InvalidArgument(
                "object id must not be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A 32-byte Sui account or package address.
///
/// Parsed from `0x` followed by exactly 64 hex digits and always rendered
/// in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuiAddress([u8; SUI_ADDRESS_LENGTH]);

impl SuiAddress {
    /// Parse an address string.
    pub fn parse(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").ok_or_else(|| {
            ClientError::InvalidArgument(format!("address {:?} must start with 0x", s))
        })?;
        if digits.len() != SUI_ADDRESS_LENGTH * 2 {
            return Err(ClientError::InvalidArgument(format!(
                "address {:?} must have {} hex digits, found {}",
                s,
                SUI_ADDRESS_LENGTH * 2,
                digits.len()
            )));
        }
        let mut bytes = [0u8; SUI_ADDRESS_LENGTH];
        hex::decode_to_slice(digits, &mut bytes).map_err(|e| {
            ClientError::InvalidArgument(format!("address {:?} is not hex: {}", s, e))
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; SUI_ADDRESS_LENGTH] {
        &self.0
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for SuiAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SuiAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        SuiAddress::parse(&s).map_err(|e| serde::de::Error::custom(e.message()))
    }
}

/// Package and module a Move call is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTarget {
    pub package: SuiAddress,
    pub module: String,
}

impl MoveTarget {
    /// Build a target, validating the package address and module name.
    pub fn new(package: &str, module: &str) -> Result<Self> {
        let package = SuiAddress::parse(package)?;
        crate::validation::require_identifier(module, "module")?;
        Ok(Self {
            package,
            module: module.to_string(),
        })
    }
}

impl fmt::Display for MoveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.package, self.module)
    }
}

/// A validated Move call argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Argument {
    /// Reference to a shared object. The ledger resolves the live version
    /// at execution time.
    ObjectRef(ObjectId),
    /// Pure `u64` value.
    U64(u64),
    /// Pure address value.
    Address(SuiAddress),
}

/// An inert, validated state-transition request.
///
/// Only [`crate::builder`] constructs these. Nothing happens until it is
/// handed to a [`crate::traits::TransactionExecutor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    target: MoveTarget,
    operation: String,
    arguments: Vec<Argument>,
}

impl TransactionRequest {
    pub(crate) fn new(target: MoveTarget, operation: String, arguments: Vec<Argument>) -> Self {
        Self {
            target,
            operation,
            arguments,
        }
    }

    pub fn target(&self) -> &MoveTarget {
        &self.target
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Fully qualified call target, `package::module::operation`.
    pub fn call_target(&self) -> String {
        format!("{}::{}", self.target, self.operation)
    }

    /// Distinct object ids referenced by the arguments, in first-appearance order.
    pub fn referenced_objects(&self) -> Vec<&ObjectId> {
        let mut ids: Vec<&ObjectId> = Vec::new();
        for arg in &self.arguments {
            if let Argument::ObjectRef(id) = arg {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }
}

/// Current representation of a remote object.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteObject {
    pub object_id: ObjectId,
    /// Bumped by the ledger on every mutation.
    pub version: u64,
    /// Move struct type, when the ledger reports it.
    pub type_name: Option<String>,
    pub fields: Map<String, Value>,
}

impl RemoteObject {
    /// Look up a top-level field. Absence is an error, never a default.
    pub fn field(&self, name: &str) -> Result<&Value> {
        self.fields.get(name).ok_or_else(|| {
            ClientError::MalformedResponse(format!(
                "object {} has no field {:?}",
                self.object_id, name
            ))
        })
    }
}

/// Successful completion reported by the signer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResponse {
    pub digest: String,
    /// Opaque effects payload; passed through, never interpreted.
    pub effects: Value,
}

/// Outcome of one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionResult {
    Confirmed { digest: String, effects: Value },
    Rejected { reason: String },
}

impl SubmissionResult {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, SubmissionResult::Confirmed { .. })
    }

    /// Transaction digest, if confirmed.
    pub fn digest(&self) -> Option<&str> {
        match self {
            SubmissionResult::Confirmed { digest, .. } => Some(digest),
            SubmissionResult::Rejected { .. } => None,
        }
    }

    /// Ledger-provided rejection reason, if rejected.
    pub fn reason(&self) -> Option<&str> {
        match self {
            SubmissionResult::Confirmed { .. } => None,
            SubmissionResult::Rejected { reason } => Some(reason),
        }
    }

    /// Convert into a `Result`, mapping a rejection to [`ClientError::Rejected`].
    pub fn into_result(self) -> Result<ExecutionResponse> {
        match self {
            SubmissionResult::Confirmed { digest, effects } => {
                Ok(ExecutionResponse { digest, effects })
            }
            SubmissionResult::Rejected { reason } => Err(ClientError::Rejected(reason)),
        }
    }
}

impl From<ExecutionResponse> for SubmissionResult {
    fn from(response: ExecutionResponse) -> Self {
        SubmissionResult::Confirmed {
            digest: response.digest,
            effects: response.effects,
        }
    }
}
