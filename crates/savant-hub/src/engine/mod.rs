//! Engine contract.
//!
//! An engine is a pluggable unit exposing a named set of tools plus server
//! metadata. The hub depends only on this trait, never on concrete engines.

pub mod hooks;

use async_trait::async_trait;
use serde_json::Value;

use savant_core::error::Result;
use savant_core::protocol::rpc::RequestId;
use savant_core::protocol::tool::{ServerInfo, ToolSpec};

pub use hooks::{CallFailure, CallHook, HookPipeline, Stage};

/// Engines (external collaborators). Each engine's own network calls apply
/// their own timeout/retry policy and surface exhaustion as one `Err`.
#[async_trait]
pub trait Engine: Send + Sync {
    fn server_info(&self) -> ServerInfo;

    /// Tools with unqualified names, in the order they should be listed.
    fn list_tools(&self) -> Vec<ToolSpec>;

    /// Execute `name` (unqualified) with `args`.
    async fn call(&self, name: &str, args: Value, ctx: &CallContext) -> Result<Value>;

    /// Before/after hooks, read once at mount time.
    fn hooks(&self) -> HookPipeline {
        HookPipeline::default()
    }
}

/// Per-call context handed to hooks and the engine callable.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    pub request_id: Option<RequestId>,
    /// Per-call id shared by log events and the audit entry.
    pub trace_id: String,
    /// Owning engine name.
    pub service: String,
    /// Namespaced tool name.
    pub tool: String,
    /// Caller identity when the transport provides one.
    pub actor: Option<String>,
    pub requires_system: bool,
    pub sandbox_override: bool,
}

impl CallContext {
    pub fn with_tool(&self, tool: &str) -> Self {
        Self {
            tool: tool.to_string(),
            ..self.clone()
        }
    }
}
