//! Protocol state machine.
//!
//! Each request runs AwaitingInput → Parsed → Validated → Dispatched →
//! Responded with no state kept between requests. `parse` and `handle` never
//! fail: every input yields exactly one serialized response.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use savant_core::error::{HubError, Result, RpcCode};
use savant_core::protocol::rpc::{
    decode_request, decode_request_bytes, RequestId, RpcError, RpcRequest, RpcResponse,
};
use savant_core::protocol::tool::ServerInfo;

use crate::engine::{CallContext, Stage};
use crate::multiplexer::Multiplexer;

use super::trace::ToolTracer;
use super::validate::validate_args;

/// Protocol revision advertised by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub struct Dispatcher {
    mux: Arc<Multiplexer>,
    tracer: ToolTracer,
    info: ServerInfo,
}

impl Dispatcher {
    pub fn new(mux: Arc<Multiplexer>, tracer: ToolTracer, info: ServerInfo) -> Self {
        Self { mux, tracer, info }
    }

    pub fn server_info(&self) -> &ServerInfo {
        &self.info
    }

    /// Parse one raw line. `Err` holds the serialized error response to send.
    pub fn parse(&self, raw: &str) -> std::result::Result<RpcRequest, String> {
        self.logged(decode_request(raw), || raw.chars().take(100).collect())
    }

    /// `parse` for raw transport bytes (not necessarily UTF-8).
    pub fn parse_bytes(&self, raw: &[u8]) -> std::result::Result<RpcRequest, String> {
        self.logged(decode_request_bytes(raw), || {
            String::from_utf8_lossy(raw).chars().take(100).collect()
        })
    }

    fn logged(
        &self,
        decoded: std::result::Result<RpcRequest, RpcResponse>,
        preview: impl FnOnce() -> String,
    ) -> std::result::Result<RpcRequest, String> {
        match decoded {
            Ok(req) => {
                tracing::info!(event = "rpc_received", method = %req.method, id = ?req.id);
                Ok(req)
            }
            Err(resp) => {
                tracing::warn!(event = "parse_error", error = ?resp.error, line = %preview());
                Err(resp.to_line())
            }
        }
    }

    /// Handle a validated request and serialize the response.
    pub async fn handle(&self, req: RpcRequest) -> String {
        self.respond(req, None).await.to_line()
    }

    /// `parse` + `handle`: one output line per input line.
    pub async fn handle_line(&self, raw: &str, actor: Option<&str>) -> String {
        match self.parse(raw) {
            Ok(req) => self.respond(req, actor).await.to_line(),
            Err(line) => line,
        }
    }

    /// `handle_line` for raw transport bytes: one output line per input line.
    pub async fn handle_bytes(&self, raw: &[u8], actor: Option<&str>) -> String {
        match self.parse_bytes(raw) {
            Ok(req) => self.respond(req, actor).await.to_line(),
            Err(line) => line,
        }
    }

    /// Closed dispatch table.
    pub async fn respond(&self, req: RpcRequest, actor: Option<&str>) -> RpcResponse {
        let id = req.id.clone();
        let out = match req.method.as_str() {
            "initialize" => Ok(self.initialize()),
            "tools/list" => Ok(self.tools_list()),
            "tools/call" => {
                return self.tools_call(id, req.params, actor).await;
            }
            other => Err(HubError::MethodNotFound(other.to_string())),
        };

        match out {
            Ok(result) => RpcResponse::ok(id, result),
            Err(e) => RpcResponse::err(id, RpcError::from(&e)),
        }
    }

    fn initialize(&self) -> Value {
        let status = self.mux.status();
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": self.info,
            "capabilities": { "tools": {} },
            "instructions": format!(
                "{} engines={} tools={}",
                self.info.description,
                status.engines.len(),
                status.tools
            ),
        })
    }

    fn tools_list(&self) -> Value {
        let tools: Vec<_> = self.mux.tools().iter().map(|t| t.descriptor()).collect();
        json!({ "tools": tools })
    }

    async fn tools_call(
        &self,
        id: Option<RequestId>,
        params: Option<Value>,
        actor: Option<&str>,
    ) -> RpcResponse {
        let (name, args) = match call_params(params) {
            Ok(p) => p,
            Err(e) => return RpcResponse::err(id, RpcError::from(&e)),
        };

        let Some(route) = self.mux.lookup(&name) else {
            tracing::warn!(event = "tool_not_found", tool = %name);
            return RpcResponse::err(
                id,
                RpcError::new(RpcCode::MethodNotFound, format!("Tool not found: {name}")),
            );
        };

        let args = match validate_args(&route.spec.input_schema, args) {
            Ok(args) => args,
            Err(e) => {
                tracing::warn!(event = "invalid_arguments", tool = %name, error = %e);
                return RpcResponse::err(id, RpcError::from(&e));
            }
        };

        let ctx = CallContext {
            request_id: id.clone(),
            actor: actor.map(str::to_string),
            ..CallContext::default()
        };

        match self.tracer.call(&self.mux, &route, args, &ctx).await {
            Ok(result) => RpcResponse::ok(id, result),
            // Gate failures keep their own code (sandbox, unknown engine).
            Err(f) if f.stage == Stage::Gate => RpcResponse::err(id, RpcError::from(&f.error)),
            // Engine failures: message only.
            Err(f) => RpcResponse::err(id, RpcError::new(RpcCode::InternalError, f.error.to_string())),
        }
    }
}

/// Validate `tools/call` params: `name` required, `arguments` an object.
fn call_params(params: Option<Value>) -> Result<(String, Value)> {
    let params = params.unwrap_or_else(|| Value::Object(Map::new()));
    let Value::Object(mut obj) = params else {
        return Err(HubError::InvalidParams("params must be an object".into()));
    };

    let name = match obj.remove("name") {
        Some(Value::String(s)) if !s.is_empty() => s,
        _ => return Err(HubError::InvalidParams("missing tool name".into())),
    };

    let args = match obj.remove("arguments") {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(v @ Value::Object(_)) => v,
        Some(_) => return Err(HubError::InvalidParams("arguments must be an object".into())),
    };

    Ok((name, args))
}
