//! JSON-RPC 2.0 envelopes (panic-free decoding).
//!
//! Decoding rules:
//! - Malformed JSON yields a `-32700` envelope with a `null` id.
//! - Valid JSON that is not a request object yields `-32600`, echoing the id
//!   when one can be recovered.
//! - An absent id is answered with `"id": null` (no notification semantics).

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{HubError, RpcCode};

/// Protocol tag accepted and emitted by the hub.
pub const JSONRPC_VERSION: &str = "2.0";

/// Request id; echoed back with the same JSON type it arrived with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(serde_json::Number),
    Str(String),
}

impl From<i64> for RequestId {
    fn from(v: i64) -> Self {
        RequestId::Number(v.into())
    }
}

impl From<&str> for RequestId {
    fn from(v: &str) -> Self {
        RequestId::Str(v.to_string())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::Str(s) => f.write_str(s),
        }
    }
}

/// Inbound request.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcRequest {
    /// Protocol tag; must be `"2.0"` on the wire.
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Optional id (string or number).
    #[serde(default)]
    pub id: Option<RequestId>,
    /// Method name (e.g. `tools/call`).
    pub method: String,
    /// Parameter object; treated as `{}` when absent.
    #[serde(default)]
    pub params: Option<Value>,
}

impl RpcRequest {
    /// Build a request in code (tests, embedded callers).
    pub fn new(id: Option<RequestId>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            id,
            method: method.into(),
            params,
        }
    }
}

/// Error payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: RpcCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// The closed-set code this error carries, if it is one of ours.
    pub fn rpc_code(&self) -> Option<RpcCode> {
        RpcCode::from_code(self.code)
    }
}

impl From<&HubError> for RpcError {
    /// Only the display message crosses the wire; sources stay local.
    fn from(e: &HubError) -> Self {
        let err = RpcError::new(e.rpc_code(), e.to_string());
        match e {
            HubError::SandboxViolation { tool } => err.with_data(json!({ "tool": tool })),
            _ => err,
        }
    }
}

/// Outbound response: exactly one of `result` / `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<RequestId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn ok(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: Option<RequestId>, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Serialize to a single line (no embedded newlines).
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            "{\"jsonrpc\":\"2.0\",\"id\":null,\"error\":{\"code\":-32603,\"message\":\"serialization failed\"}}"
                .to_string()
        })
    }
}

/// Decode one raw request.
///
/// Returns the request, or the error envelope to send back instead.
pub fn decode_request(raw: &str) -> std::result::Result<RpcRequest, RpcResponse> {
    let value: Value = serde_json::from_str(raw).map_err(|e| {
        RpcResponse::err(
            None,
            RpcError::new(RpcCode::ParseError, format!("Parse error: {e}")),
        )
    })?;

    let Some(obj) = value.as_object() else {
        return Err(invalid_request(None, "request must be a JSON object"));
    };

    let id = obj
        .get("id")
        .and_then(|v| serde_json::from_value::<RequestId>(v.clone()).ok());

    let req: RpcRequest = serde_json::from_value(value)
        .map_err(|e| invalid_request(id.clone(), &format!("Invalid Request: {e}")))?;

    if req.jsonrpc.as_deref() != Some(JSONRPC_VERSION) {
        return Err(invalid_request(req.id, "Invalid Request: jsonrpc must be \"2.0\""));
    }

    Ok(req)
}

/// `decode_request` over raw bytes; non-UTF-8 input is a parse error.
pub fn decode_request_bytes(raw: &[u8]) -> std::result::Result<RpcRequest, RpcResponse> {
    let raw = std::str::from_utf8(raw).map_err(|e| {
        RpcResponse::err(
            None,
            RpcError::new(RpcCode::ParseError, format!("Parse error: invalid UTF-8: {e}")),
        )
    })?;
    decode_request(raw)
}

fn invalid_request(id: Option<RequestId>, msg: &str) -> RpcResponse {
    RpcResponse::err(id, RpcError::new(RpcCode::InvalidRequest, msg))
}
