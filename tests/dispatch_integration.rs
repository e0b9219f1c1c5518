//! End-to-end dispatch tests.
//!
//! Drives the coordinator against spy ledgers and signers, and the JSON-RPC
//! client against a local HTTP stub.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_test::{assert_err, assert_ok};

use sui_sync::config::{CounterConfig, MintConfig};
use sui_sync::coordinator::{DispatchCoordinator, Notification};
use sui_sync_client::mock::{MockFailure, MockLedger, MockSigner};
use sui_sync_client::{
    read_u64_field, Argument, ClientError, ExecutionResponse, JsonRpcClient, ObjectId,
    SignerError, SuiAddress, TransactionExecutor, TransactionRequest,
};

const PACKAGE: &str = "0x068a952d2a9b01b66c8817dc46b7703653e383d9d00d1c64d7336dcacc4df25b";
const RECIPIENT: &str = "0x5f3b8e6c1a2d4f7e9b0c3a5d8e1f2b4c6d7e9f0a1b3c5d7e9f1a3b5c7d9e1f3a";
const COUNTER: &str = "0xabc";
const TREASURY_CAP: &str = "0xcap";

fn counter_config() -> CounterConfig {
    CounterConfig {
        package_id: PACKAGE.to_string(),
        object_id: COUNTER.to_string(),
        ..Default::default()
    }
}

fn mint_config() -> MintConfig {
    MintConfig {
        package_id: PACKAGE.to_string(),
        module: "my_coin".to_string(),
        treasury_cap_id: TREASURY_CAP.to_string(),
        ..Default::default()
    }
}

fn ledger() -> Arc<MockLedger> {
    let ledger = MockLedger::new().with_field(COUNTER, "value", json!("5"));
    ledger.set_field(
        TREASURY_CAP,
        "total_supply",
        json!({"type": "0x2::balance::Supply", "fields": {"value": "1000"}}),
    );
    Arc::new(ledger)
}

/// A ledger whose counter goes up by one on every confirmed increment.
fn incrementing_signer(ledger: &Arc<MockLedger>, digest: &str) -> Arc<MockSigner> {
    let hook_ledger = ledger.clone();
    let next = AtomicUsize::new(6);
    Arc::new(MockSigner::confirming(digest).on_execute(move |_| {
        let value = next.fetch_add(1, Ordering::SeqCst);
        hook_ledger.set_field(COUNTER, "value", json!(value.to_string()));
    }))
}

/// Wallet that refuses to sign.
struct DecliningWallet;

#[async_trait]
impl TransactionExecutor for DecliningWallet {
    async fn sign_and_execute(
        &self,
        _request: &TransactionRequest,
    ) -> Result<ExecutionResponse, SignerError> {
        Err(SignerError::new("User rejected the request"))
    }
}

// --- Scenario 1: read ---

#[tokio::test]
async fn test_read_counter_value() {
    let ledger = ledger();
    let value = assert_ok!(read_u64_field(ledger.as_ref(), COUNTER, "value").await);
    assert_eq!(value, 5);
}

// --- Scenario 2: confirmed increment ---

#[tokio::test]
async fn test_confirmed_increment_reconciles_once() {
    let ledger = ledger();
    let signer = incrementing_signer(&ledger, "DIGEST1");
    let coordinator = DispatchCoordinator::new(ledger.clone(), counter_config())
        .with_signer(signer.clone());
    assert_eq!(assert_ok!(coordinator.initial_load().await), 5);
    let reads_before = ledger.reads();
    let mut view = coordinator.view();
    view.borrow_and_update();

    let result = assert_ok!(coordinator.request_increment().await);

    assert!(result.is_confirmed());
    assert_eq!(signer.calls(), 1);
    assert_eq!(ledger.reads() - reads_before, 1);
    assert_eq!(coordinator.display_value(), Some(6));
    assert!(view.has_changed().unwrap());
    assert_eq!(view.borrow().last_digest.as_deref(), Some("DIGEST1"));

    let submitted = signer.submitted();
    assert_eq!(
        submitted[0].arguments(),
        &[Argument::ObjectRef(ObjectId::new(COUNTER).unwrap())]
    );
    assert_eq!(
        submitted[0].call_target(),
        format!("{}::shared_counter::increment", PACKAGE)
    );
}

#[tokio::test]
async fn test_two_increments_in_sequence() {
    let ledger = ledger();
    let signer = incrementing_signer(&ledger, "D");
    let coordinator =
        DispatchCoordinator::new(ledger.clone(), counter_config()).with_signer(signer.clone());
    coordinator.initial_load().await.unwrap();

    coordinator.request_increment().await.unwrap();
    coordinator.request_increment().await.unwrap();

    assert_eq!(signer.calls(), 2);
    assert_eq!(coordinator.display_value(), Some(7));
}

#[tokio::test]
async fn test_overlapping_increments_each_reach_signer() {
    let ledger = ledger();
    let signer = incrementing_signer(&ledger, "D");
    let coordinator =
        DispatchCoordinator::new(ledger.clone(), counter_config()).with_signer(signer.clone());
    coordinator.initial_load().await.unwrap();
    let reads_before = ledger.reads();

    let (first, second) = tokio::join!(
        coordinator.request_increment(),
        coordinator.request_increment()
    );

    assert!(assert_ok!(first).is_confirmed());
    assert!(assert_ok!(second).is_confirmed());
    assert_eq!(signer.calls(), 2);
    assert_eq!(ledger.reads() - reads_before, 2);
    // Last re-read wins.
    assert_eq!(coordinator.display_value(), Some(7));
}

// --- Scenario 3: rejection ---

#[tokio::test]
async fn test_rejected_increment_keeps_value_and_reason() {
    let ledger = ledger();
    let signer = Arc::new(MockSigner::rejecting("InsufficientGas"));
    let coordinator =
        DispatchCoordinator::new(ledger.clone(), counter_config()).with_signer(signer.clone());
    coordinator.initial_load().await.unwrap();
    let reads_before = ledger.reads();
    let mut notes = coordinator.subscribe();

    let result = assert_ok!(coordinator.request_increment().await);

    assert_eq!(result.reason(), Some("InsufficientGas"));
    assert_eq!(coordinator.display_value(), Some(5));
    assert_eq!(ledger.reads(), reads_before);
    assert_eq!(signer.calls(), 1);
    assert_eq!(
        notes.try_recv().unwrap(),
        Notification::Rejected {
            operation: "increment".to_string(),
            reason: "InsufficientGas".to_string(),
        }
    );
}

#[tokio::test]
async fn test_wallet_decline_is_a_rejection() {
    let ledger = ledger();
    let coordinator = DispatchCoordinator::new(ledger.clone(), counter_config())
        .with_signer(Arc::new(DecliningWallet));
    coordinator.initial_load().await.unwrap();

    let result = assert_ok!(coordinator.request_increment().await);
    assert_eq!(result.reason(), Some("User rejected the request"));
    assert!(result.into_result().unwrap_err().message() == "User rejected the request");
}

// --- Scenario 4: mint ---

#[tokio::test]
async fn test_mint_argument_order_and_supply_refresh() {
    let ledger = ledger();
    let hook_ledger = ledger.clone();
    let signer = Arc::new(MockSigner::confirming("MINT1").on_execute(move |_| {
        hook_ledger.set_field(
            TREASURY_CAP,
            "total_supply",
            json!({"type": "0x2::balance::Supply", "fields": {"value": "100000001000"}}),
        );
    }));
    let coordinator = DispatchCoordinator::new(ledger.clone(), counter_config())
        .with_mint(mint_config())
        .unwrap()
        .with_signer(signer.clone());
    coordinator.initial_load().await.unwrap();
    assert_eq!(coordinator.supply_value(), Some(1000));

    let result = assert_ok!(coordinator.request_mint(100_000_000_000u64, RECIPIENT).await);

    assert!(result.is_confirmed());
    let submitted = signer.submitted();
    assert_eq!(
        submitted[0].arguments(),
        &[
            Argument::ObjectRef(ObjectId::new(TREASURY_CAP).unwrap()),
            Argument::U64(100_000_000_000),
            Argument::Address(SuiAddress::parse(RECIPIENT).unwrap()),
        ]
    );
    assert_eq!(coordinator.supply_value(), Some(100_000_001_000));
    assert_eq!(coordinator.display_value(), Some(5));
}

#[tokio::test]
async fn test_invalid_mint_amount_never_reaches_signer() {
    let ledger = ledger();
    let signer = Arc::new(MockSigner::confirming("MINT1"));
    let coordinator = DispatchCoordinator::new(ledger.clone(), counter_config())
        .with_mint(mint_config())
        .unwrap()
        .with_signer(signer.clone());
    let mut notes = coordinator.subscribe();

    let negative = assert_err!(coordinator.request_mint(-1i64, RECIPIENT).await);
    assert!(negative.is_invalid_argument());
    let too_big = assert_err!(
        coordinator
            .request_mint(i128::from(u64::MAX) + 1, RECIPIENT)
            .await
    );
    assert!(too_big.is_invalid_argument());

    assert_eq!(signer.calls(), 0);
    assert_eq!(ledger.reads(), 0);
    assert!(matches!(
        notes.try_recv().unwrap(),
        Notification::InvalidArgument { .. }
    ));
}

#[tokio::test]
async fn test_invalid_recipient_never_reaches_signer() {
    let ledger = ledger();
    let signer = Arc::new(MockSigner::confirming("MINT1"));
    let coordinator = DispatchCoordinator::new(ledger, counter_config())
        .with_mint(mint_config())
        .unwrap()
        .with_signer(signer.clone());

    let err = assert_err!(coordinator.request_mint(1u64, "0x123").await);
    assert!(err.message().contains("argument 2"));
    assert_eq!(signer.calls(), 0);
}

// --- Signer state ---

#[tokio::test]
async fn test_no_signer_makes_no_calls() {
    let ledger = ledger();
    let coordinator = DispatchCoordinator::new(ledger.clone(), counter_config());
    let mut notes = coordinator.subscribe();

    let err = assert_err!(coordinator.request_increment().await);

    assert!(matches!(err, ClientError::NoSigner));
    assert_eq!(ledger.reads(), 0);
    assert_eq!(
        notes.try_recv().unwrap(),
        Notification::NoSigner {
            operation: "increment".to_string()
        }
    );
}

#[tokio::test]
async fn test_signer_connected_later() {
    let ledger = ledger();
    let coordinator = DispatchCoordinator::new(ledger.clone(), counter_config());
    assert_err!(coordinator.request_increment().await);

    coordinator.connect_signer(incrementing_signer(&ledger, "LATE"));
    let result = assert_ok!(coordinator.request_increment().await);
    assert_eq!(result.digest(), Some("LATE"));
}

// --- Failure handling ---

#[tokio::test]
async fn test_reconcile_failure_keeps_success() {
    let ledger = ledger();
    let hook_ledger = ledger.clone();
    let signer = Arc::new(MockSigner::confirming("D1").on_execute(move |_| {
        hook_ledger.set_failure(Some(MockFailure::Transport("connection reset".to_string())));
    }));
    let coordinator =
        DispatchCoordinator::new(ledger.clone(), counter_config()).with_signer(signer);
    coordinator.initial_load().await.unwrap();

    let result = assert_ok!(coordinator.request_increment().await);

    assert_eq!(result.digest(), Some("D1"));
    let view = coordinator.snapshot();
    assert!(view.is_stale(&ObjectId::new(COUNTER).unwrap()));
    assert_eq!(view.last_digest.as_deref(), Some("D1"));
    assert_eq!(coordinator.display_value(), Some(5));

    // The next successful read clears the stale mark.
    ledger.set_failure(None);
    coordinator.refresh(COUNTER).await.unwrap();
    assert!(!coordinator
        .snapshot()
        .is_stale(&ObjectId::new(COUNTER).unwrap()));
}

#[tokio::test]
async fn test_read_failure_keeps_prior_value() {
    let ledger = ledger();
    let coordinator = DispatchCoordinator::new(ledger.clone(), counter_config());
    coordinator.initial_load().await.unwrap();
    let mut notes = coordinator.subscribe();

    ledger.set_field(COUNTER, "value", json!("18446744073709551616"));
    let err = assert_err!(coordinator.refresh(COUNTER).await);

    assert!(err.is_malformed());
    assert_eq!(coordinator.display_value(), Some(5));
    assert!(matches!(
        notes.try_recv().unwrap(),
        Notification::ReadFailed { .. }
    ));
}

#[tokio::test]
async fn test_initial_load_missing_counter() {
    let ledger = Arc::new(MockLedger::new());
    let coordinator = DispatchCoordinator::new(ledger, counter_config());

    let err = assert_err!(coordinator.initial_load().await);
    assert!(err.is_not_found());
    assert_eq!(coordinator.display_value(), None);
}

// --- JSON-RPC transport ---

/// Serve canned fullnode responses, one request per connection.
async fn spawn_fullnode_stub(counter_value: &'static str) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(AtomicUsize::new(0));
    let seen = requests.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            seen.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let body = read_http_body(&mut socket).await;
                let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
                let response = stub_response(&request, counter_value);
                let payload = response.to_string();
                let reply = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    payload.len(),
                    payload
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{}", addr), requests)
}

async fn read_http_body(socket: &mut tokio::net::TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            return Vec::new();
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + length {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    buf[header_end..].to_vec()
}

fn stub_response(request: &Value, counter_value: &str) -> Value {
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request.get("method").and_then(Value::as_str).unwrap_or("");
    let object_id = request
        .get("params")
        .and_then(|p| p.get(0))
        .and_then(Value::as_str)
        .unwrap_or("");

    let result = match (method, object_id) {
        ("rpc.discover", _) => json!({"openrpc": "1.2.6", "info": {"version": "1.30.1"}}),
        ("sui_getObject", COUNTER) => json!({
            "data": {
                "objectId": COUNTER,
                "version": "42",
                "content": {
                    "dataType": "moveObject",
                    "type": format!("{}::shared_counter::Counter", PACKAGE),
                    "fields": {"id": {"id": COUNTER}, "value": counter_value}
                }
            }
        }),
        ("sui_getObject", other) => json!({
            "error": {"code": "notExists", "object_id": other}
        }),
        _ => {
            return json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {"code": -32601, "message": "Method not found"}
            })
        }
    };
    json!({"jsonrpc": "2.0", "id": id, "result": result})
}

#[tokio::test]
async fn test_json_rpc_read_counter() {
    let (endpoint, requests) = spawn_fullnode_stub("9007199254740993").await;
    let client = JsonRpcClient::new(endpoint).unwrap();

    let value = assert_ok!(read_u64_field(&client, COUNTER, "value").await);

    assert_eq!(value, 9_007_199_254_740_993);
    assert_eq!(requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_json_rpc_missing_object() {
    let (endpoint, _) = spawn_fullnode_stub("5").await;
    let client = JsonRpcClient::new(endpoint).unwrap();

    let err = assert_err!(read_u64_field(&client, "0xdead", "value").await);
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_json_rpc_unknown_method_is_not_retryable() {
    let (endpoint, _) = spawn_fullnode_stub("5").await;
    let client = JsonRpcClient::new(endpoint).unwrap();

    let err = assert_err!(client.call("sui_noSuchMethod", json!([])).await);
    assert!(err.is_malformed());
    assert!(!sui_sync::utils::retry::is_retryable(&err));
}

#[tokio::test]
async fn test_json_rpc_coordinator_initial_load() {
    let (endpoint, _) = spawn_fullnode_stub("5").await;
    let client = Arc::new(JsonRpcClient::new(endpoint.clone()).unwrap());
    let coordinator = DispatchCoordinator::new(client.clone(), counter_config())
        .with_metadata(client)
        .with_endpoint(endpoint.clone());

    assert_eq!(assert_ok!(coordinator.initial_load().await), 5);

    let view = coordinator.snapshot();
    assert_eq!(view.protocol_version.as_deref(), Some("1.30.1"));
    assert_eq!(view.endpoint.as_deref(), Some(endpoint.as_str()));
    assert_eq!(view.version_of(&ObjectId::new(COUNTER).unwrap()), Some(42));
}

#[tokio::test]
async fn test_json_rpc_unreachable_is_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = JsonRpcClient::new(format!("http://{}", addr)).unwrap();
    let err = assert_err!(read_u64_field(&client, COUNTER, "value").await);
    assert!(err.is_transport_error());
}
