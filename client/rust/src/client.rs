//! Default ledger client speaking the fullnode JSON-RPC API over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::convert::{json_kind, value_to_u64};
use crate::error::{ClientError, Result};
use crate::traits;
use crate::types::{ObjectId, RemoteObject};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-RPC method for object reads.
pub const GET_OBJECT_METHOD: &str = "sui_getObject";
/// JSON-RPC method returning the endpoint's API description.
pub const DISCOVER_METHOD: &str = "rpc.discover";

/// Ledger client for a single fullnode endpoint.
#[derive(Clone, Debug)]
pub struct JsonRpcClient {
    http: Client,
    endpoint: String,
}

impl JsonRpcClient {
    /// Create a client for the given endpoint URL with the default timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.into();
        if endpoint.is_empty() {
            return Err(ClientError::InvalidArgument(
                "endpoint URL must not be empty".to_string(),
            ));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Self { http, endpoint })
    }

    /// Create a client using an endpoint from environment variable with fallback.
    pub fn from_env(env_var: &str, default: &str) -> Result<Self> {
        let endpoint = std::env::var(env_var).unwrap_or_else(|_| default.to_string());
        Self::new(endpoint)
    }

    /// The endpoint URL this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue one JSON-RPC call and return its `result` member.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let request_id = Uuid::new_v4().to_string();
        let body = json!({
            "jsonrpc": "2.0",
            "id": request_id,
            "method": method,
            "params": params,
        });

        debug!(endpoint = %self.endpoint, method, request_id = %request_id, "json-rpc call");

        let response = self.http.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(endpoint = %self.endpoint, method, status = %status, "json-rpc call failed");
            return Err(ClientError::Transport(format!(
                "HTTP {} - {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let envelope: Value = response.json().await?;
        unwrap_envelope(envelope)
    }
}

/// JSON-RPC codes for requests the endpoint will never accept: parse
/// error, invalid request, method not found, invalid params.
pub const REQUEST_ERROR_CODES: &[i64] = &[-32700, -32600, -32601, -32602];

/// Pull `result` out of a JSON-RPC response envelope.
///
/// Errors in [`REQUEST_ERROR_CODES`] are [`ClientError::MalformedResponse`]
/// and are not worth retrying; server-side and internal codes are
/// [`ClientError::Transport`].
pub fn unwrap_envelope(mut envelope: Value) -> Result<Value> {
    if let Some(error) = envelope.get("error") {
        let code = error.get("code").cloned().unwrap_or(Value::Null);
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        let text = format!("rpc error {}: {}", code, message);
        let is_request_error = code
            .as_i64()
            .is_some_and(|c| REQUEST_ERROR_CODES.contains(&c));
        return Err(if is_request_error {
            ClientError::MalformedResponse(text)
        } else {
            ClientError::Transport(text)
        });
    }
    envelope
        .get_mut("result")
        .map(Value::take)
        .ok_or_else(|| ClientError::MalformedResponse("response has no result".to_string()))
}

/// Interpret a `sui_getObject` result.
///
/// `notExists` and `deleted` map to [`ClientError::NotFound`]; every other
/// shape mismatch is [`ClientError::MalformedResponse`].
pub fn parse_object_response(id: &ObjectId, result: &Value) -> Result<RemoteObject> {
    if let Some(error) = result.get("error") {
        let code = error.get("code").and_then(Value::as_str).unwrap_or("");
        return match code {
            "notExists" | "deleted" => Err(ClientError::NotFound(id.to_string())),
            other => Err(ClientError::MalformedResponse(format!(
                "object {} read failed with code {:?}",
                id, other
            ))),
        };
    }

    let data = result
        .get("data")
        .ok_or_else(|| malformed(id, "data"))?;
    let version = data
        .get("version")
        .ok_or_else(|| malformed(id, "data.version"))
        .and_then(value_to_u64)?;
    let content = data
        .get("content")
        .ok_or_else(|| malformed(id, "data.content"))?;
    let fields = match content.get("fields") {
        Some(Value::Object(map)) => map.clone(),
        Some(other) => {
            return Err(ClientError::MalformedResponse(format!(
                "object {}: content.fields is {}, expected object",
                id,
                json_kind(other)
            )))
        }
        None => return Err(malformed(id, "data.content.fields")),
    };
    let type_name = content
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(RemoteObject {
        object_id: id.clone(),
        version,
        type_name,
        fields,
    })
}

/// Interpret an `rpc.discover` result.
pub fn parse_version_response(result: &Value) -> Result<String> {
    result
        .get("info")
        .and_then(|info| info.get("version"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ClientError::MalformedResponse("missing info.version".to_string()))
}

fn malformed(id: &ObjectId, path: &str) -> ClientError {
    ClientError::MalformedResponse(format!("object {}: missing {}", id, path))
}

#[async_trait]
impl traits::ObjectReader for JsonRpcClient {
    async fn get_object(&self, id: &ObjectId) -> Result<RemoteObject> {
        let result = self
            .call(
                GET_OBJECT_METHOD,
                json!([id.as_str(), { "showContent": true, "showType": true }]),
            )
            .await?;
        parse_object_response(id, &result)
    }
}

#[async_trait]
impl traits::LedgerMetadata for JsonRpcClient {
    async fn protocol_version(&self) -> Result<String> {
        let result = self.call(DISCOVER_METHOD, json!([])).await?;
        parse_version_response(&result)
    }
}
