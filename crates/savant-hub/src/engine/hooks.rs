//! Engine hook pipeline.
//!
//! Before-hooks gate a call (fail-closed); after-hooks observe it. Both lists
//! are fixed when the pipeline is built and run in declaration order.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use savant_core::error::{HubError, Result};

use super::CallContext;

/// A side-effecting function run around a tool's execution.
pub trait CallHook: Send + Sync {
    fn run(&self, ctx: &CallContext, payload: &Value) -> Result<()>;
}

impl<F> CallHook for F
where
    F: Fn(&CallContext, &Value) -> Result<()> + Send + Sync,
{
    fn run(&self, ctx: &CallContext, payload: &Value) -> Result<()> {
        self(ctx, payload)
    }
}

#[derive(Clone, Default)]
pub struct HookPipeline {
    before: Vec<Arc<dyn CallHook>>,
    after: Vec<Arc<dyn CallHook>>,
}

impl HookPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before(mut self, hook: impl CallHook + 'static) -> Self {
        self.before.push(Arc::new(hook));
        self
    }

    pub fn after(mut self, hook: impl CallHook + 'static) -> Self {
        self.after.push(Arc::new(hook));
        self
    }

    /// Prepend a gate ahead of every declared before-hook.
    pub fn with_before_first(mut self, hook: Arc<dyn CallHook>) -> Self {
        self.before.insert(0, hook);
        self
    }

    pub fn before_len(&self) -> usize {
        self.before.len()
    }

    pub fn after_len(&self) -> usize {
        self.after.len()
    }

    /// Run `exec` between the hook lists.
    ///
    /// A before-hook failure is returned as-is and neither `exec` nor any
    /// after-hook runs. After-hooks never see the result; their own failures
    /// are logged and do not replace it.
    pub async fn wrap_call<T, F>(
        &self,
        ctx: &CallContext,
        tool: &str,
        payload: &Value,
        exec: F,
    ) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.wrap_call_staged(ctx, tool, payload, exec)
            .await
            .map_err(|f| f.error)
    }

    /// `wrap_call`, but failures say whether `exec` ever ran.
    pub async fn wrap_call_staged<T, F>(
        &self,
        ctx: &CallContext,
        tool: &str,
        payload: &Value,
        exec: F,
    ) -> std::result::Result<T, CallFailure>
    where
        F: Future<Output = Result<T>>,
    {
        let ctx = ctx.with_tool(tool);

        for hook in &self.before {
            hook.run(&ctx, payload).map_err(CallFailure::gate)?;
        }

        let out = exec.await;

        for hook in &self.after {
            if let Err(e) = hook.run(&ctx, payload) {
                tracing::warn!(event = "after_hook_failed", tool = %ctx.tool, error = %e);
            }
        }

        out.map_err(CallFailure::exec)
    }
}

/// Where a wrapped call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Rejected before execution (policy gate or engine before-hook).
    Gate,
    /// The engine callable itself failed.
    Exec,
}

#[derive(Debug)]
pub struct CallFailure {
    pub stage: Stage,
    pub error: HubError,
}

impl CallFailure {
    pub fn gate(error: HubError) -> Self {
        Self {
            stage: Stage::Gate,
            error,
        }
    }

    pub fn exec(error: HubError) -> Self {
        Self {
            stage: Stage::Exec,
            error,
        }
    }
}
