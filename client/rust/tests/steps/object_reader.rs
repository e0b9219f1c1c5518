//! Object reader step definitions.

use std::sync::Arc;

use cucumber::{given, then, when, World};
use serde_json::json;
use sui_sync_client::mock::{MockFailure, MockLedger};
use sui_sync_client::{read_u64_field, ClientError};

/// Test context for object reader scenarios.
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct ObjectReaderWorld {
    ledger: Arc<MockLedger>,
    value: Option<u64>,
    error: Option<ClientError>,
}

impl ObjectReaderWorld {
    fn new() -> Self {
        Self {
            ledger: Arc::new(MockLedger::new()),
            value: None,
            error: None,
        }
    }

    fn error(&self) -> &ClientError {
        self.error.as_ref().expect("expected read to fail")
    }
}

// --- Given steps ---

#[given("a mock ledger")]
async fn given_mock_ledger(world: &mut ObjectReaderWorld) {
    world.ledger = Arc::new(MockLedger::new());
}

#[given(expr = "object {string} has field {string} set to {string}")]
async fn given_object_field(world: &mut ObjectReaderWorld, id: String, field: String, value: String) {
    world.ledger.set_field(&id, &field, json!(value));
}

#[given("the ledger transport is failing")]
async fn given_transport_failing(world: &mut ObjectReaderWorld) {
    world
        .ledger
        .set_failure(Some(MockFailure::Transport("connection refused".to_string())));
}

// --- When steps ---

#[when(expr = "I read u64 field {string} of {string}")]
async fn when_read_u64(world: &mut ObjectReaderWorld, field: String, id: String) {
    match read_u64_field(world.ledger.as_ref(), &id, &field).await {
        Ok(v) => world.value = Some(v),
        Err(e) => world.error = Some(e),
    }
}

// --- Then steps ---

#[then(expr = "the read value should be {int}")]
async fn then_value(world: &mut ObjectReaderWorld, expected: u64) {
    assert_eq!(world.value, Some(expected), "error: {:?}", world.error);
}

#[then("the read should fail as malformed")]
async fn then_malformed(world: &mut ObjectReaderWorld) {
    assert!(world.error().is_malformed(), "{:?}", world.error);
    assert!(world.value.is_none());
}

#[then("the read should fail as not found")]
async fn then_not_found(world: &mut ObjectReaderWorld) {
    assert!(world.error().is_not_found(), "{:?}", world.error);
}

#[then("the read should fail as a transport error")]
async fn then_transport(world: &mut ObjectReaderWorld) {
    assert!(world.error().is_transport_error(), "{:?}", world.error);
}

#[then("the read should fail as an invalid argument")]
async fn then_invalid_argument(world: &mut ObjectReaderWorld) {
    assert!(world.error().is_invalid_argument(), "{:?}", world.error);
}

#[then(expr = "the ledger should have been read {int} time(s)")]
async fn then_read_count(world: &mut ObjectReaderWorld, count: usize) {
    assert_eq!(world.ledger.reads(), count);
}
