use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use savant_core::error::{HubError, Result};
use savant_core::protocol::tool::{ServerInfo, ToolSpec};

use crate::engine::{CallContext, Engine};

/// Echo engine. Useful to prove routing, hooks, and sandbox gating end to end.
#[derive(Default)]
pub struct EchoEngine;

impl EchoEngine {
    pub const NAME: &'static str = "echo";

    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Deserialize)]
struct EnvReadReq {
    name: String,
}

#[async_trait]
impl Engine for EchoEngine {
    fn server_info(&self) -> ServerInfo {
        ServerInfo::new(Self::NAME, env!("CARGO_PKG_VERSION"), "Returns what it is given")
    }

    fn list_tools(&self) -> Vec<ToolSpec> {
        vec![
            ToolSpec::new("echo", "Return the call arguments unchanged"),
            ToolSpec::new("env.read", "Read one environment variable of the hub process")
                .with_schema(json!({
                    "type": "object",
                    "properties": { "name": { "type": "string" } },
                    "required": ["name"]
                }))
                .requires_system(),
        ]
    }

    async fn call(&self, name: &str, args: Value, _ctx: &CallContext) -> Result<Value> {
        match name {
            "echo" => Ok(args),
            "env.read" => {
                let req: EnvReadReq = serde_json::from_value(args)
                    .map_err(|e| HubError::tool(format!("env.read invalid arguments: {e}")))?;
                let value = std::env::var(&req.name).ok();
                Ok(json!({ "name": req.name, "value": value }))
            }
            other => Err(HubError::tool(format!("unknown echo tool: {other}"))),
        }
    }
}
