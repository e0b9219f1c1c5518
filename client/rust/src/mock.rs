//! Spy implementations of the ledger and signer traits for testing.
//!
//! Both count every call so tests can assert that local validation
//! failures never reach the network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};
use crate::traits::{LedgerMetadata, ObjectReader, SignerError, TransactionExecutor};
use crate::types::{ExecutionResponse, ObjectId, RemoteObject, TransactionRequest};

/// Failure injected into every read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockFailure {
    NotFound,
    Malformed(String),
    Transport(String),
}

/// In-memory ledger.
#[derive(Debug, Default)]
pub struct MockLedger {
    objects: Mutex<HashMap<String, RemoteObject>>,
    failure: Mutex<Option<MockFailure>>,
    protocol_version: Mutex<String>,
    reads: AtomicUsize,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            protocol_version: Mutex::new("1.0.0".to_string()),
            ..Default::default()
        }
    }

    /// Builder-style variant of [`MockLedger::set_field`].
    pub fn with_field(self, id: &str, field: &str, value: Value) -> Self {
        self.set_field(id, field, value);
        self
    }

    /// Set a field, creating the object if needed and bumping its version.
    pub fn set_field(&self, id: &str, field: &str, value: Value) {
        let mut objects = self.objects.lock().unwrap_or_else(PoisonError::into_inner);
        let object = objects.entry(id.to_string()).or_insert_with(|| RemoteObject {
            object_id: ObjectId(id.to_string()),
            version: 0,
            type_name: None,
            fields: Map::new(),
        });
        object.version += 1;
        object.fields.insert(field.to_string(), value);
    }

    /// Replace an object's whole field map.
    pub fn set_fields(&self, id: &str, fields: Map<String, Value>) {
        let mut objects = self.objects.lock().unwrap_or_else(PoisonError::into_inner);
        let version = objects.get(id).map(|o| o.version + 1).unwrap_or(1);
        objects.insert(
            id.to_string(),
            RemoteObject {
                object_id: ObjectId(id.to_string()),
                version,
                type_name: None,
                fields,
            },
        );
    }

    pub fn remove(&self, id: &str) {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
    }

    /// Make every subsequent read fail (or succeed again with `None`).
    pub fn set_failure(&self, failure: Option<MockFailure>) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = failure;
    }

    pub fn set_protocol_version(&self, version: impl Into<String>) {
        *self
            .protocol_version
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = version.into();
    }

    /// Current version of an object, if present.
    pub fn version_of(&self, id: &str) -> Option<u64> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .map(|o| o.version)
    }

    /// Number of `get_object` calls so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectReader for MockLedger {
    async fn get_object(&self, id: &ObjectId) -> Result<RemoteObject> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let failure = self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match failure {
            Some(MockFailure::NotFound) => return Err(ClientError::NotFound(id.to_string())),
            Some(MockFailure::Malformed(msg)) => return Err(ClientError::MalformedResponse(msg)),
            Some(MockFailure::Transport(msg)) => return Err(ClientError::Transport(msg)),
            None => {}
        }
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| ClientError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl LedgerMetadata for MockLedger {
    async fn protocol_version(&self) -> Result<String> {
        if let Some(MockFailure::Transport(msg)) = self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(ClientError::Transport(msg));
        }
        Ok(self
            .protocol_version
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

type ExecuteHook = Box<dyn Fn(&TransactionRequest) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Confirm(String),
    Reject(String),
}

/// Signer that confirms or rejects everything it is given.
pub struct MockSigner {
    outcome: Mutex<Outcome>,
    on_execute: Option<ExecuteHook>,
    submitted: Mutex<Vec<TransactionRequest>>,
    calls: AtomicUsize,
}

impl MockSigner {
    /// Confirm every request with the given digest.
    pub fn confirming(digest: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Confirm(digest.into()))
    }

    /// Reject every request with the given reason.
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Reject(reason.into()))
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            on_execute: None,
            submitted: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Run `hook` on each confirmed request, e.g. to mutate a [`MockLedger`].
    pub fn on_execute(mut self, hook: impl Fn(&TransactionRequest) + Send + Sync + 'static) -> Self {
        self.on_execute = Some(Box::new(hook));
        self
    }

    /// Switch to rejecting with `reason`.
    pub fn reject_with(&self, reason: impl Into<String>) {
        *self.outcome.lock().unwrap_or_else(PoisonError::into_inner) = Outcome::Reject(reason.into());
    }

    /// Number of `sign_and_execute` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request handed to this signer, in order.
    pub fn submitted(&self) -> Vec<TransactionRequest> {
        self.submitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TransactionExecutor for MockSigner {
    async fn sign_and_execute(
        &self,
        request: &TransactionRequest,
    ) -> std::result::Result<ExecutionResponse, SignerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.submitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        let outcome = self
            .outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match outcome {
            Outcome::Confirm(digest) => {
                if let Some(hook) = &self.on_execute {
                    hook(request);
                }
                Ok(ExecutionResponse {
                    digest,
                    effects: serde_json::json!({"status": {"status": "success"}}),
                })
            }
            Outcome::Reject(reason) => Err(SignerError::new(reason)),
        }
    }
}
