//! Multiplexer: mounted engines behind one namespaced tool table.
//!
//! Mounting reads an engine's metadata, tools, and hooks once; the sandbox
//! hook is put ahead of the engine's own before-hooks so a policy violation
//! stops the call before any engine code runs.

pub mod router;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde_json::Value;

use savant_core::error::{HubError, Result};
use savant_core::protocol::tool::{ServerInfo, ToolSpec};

use crate::engine::{CallContext, CallFailure, Engine, HookPipeline};
use crate::policy::{Policy, SandboxHook};

pub use router::{qualify, Route, ToolRouter, NAMESPACE_SEP};

/// Operator-granted options fixed at mount time.
#[derive(Debug, Clone, Copy, Default)]
pub struct MountOptions {
    /// Let this engine's `requires_system` tools run while sandboxed.
    pub sandbox_override: bool,
}

struct Mount {
    engine: Arc<dyn Engine>,
    info: ServerInfo,
    pipeline: HookPipeline,
    opts: MountOptions,
}

/// Per-engine line of the hub status.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub name: String,
    pub version: String,
    pub tools: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MuxStatus {
    pub engines: Vec<EngineStatus>,
    pub tools: usize,
}

pub struct Multiplexer {
    router: ToolRouter,
    mounts: RwLock<HashMap<String, Arc<Mount>>>,
    policy: Arc<Policy>,
}

impl Multiplexer {
    pub fn new(policy: Arc<Policy>) -> Self {
        Self {
            router: ToolRouter::new(),
            mounts: RwLock::new(HashMap::new()),
            policy,
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Mount (or remount) `engine` under `name`. Returns the tool count.
    pub fn mount(&self, name: &str, engine: Arc<dyn Engine>, opts: MountOptions) -> Result<usize> {
        let info = engine.server_info();
        let tools = engine.list_tools();
        let pipeline = engine
            .hooks()
            .with_before_first(Arc::new(SandboxHook::new(Arc::clone(&self.policy))));

        // Held across registration so mounts and the route table change together.
        let mut mounts = self.mounts.write().unwrap_or_else(|p| p.into_inner());
        let count = self.router.register(name, tools)?;
        mounts.insert(
            name.to_string(),
            Arc::new(Mount {
                engine,
                info,
                pipeline,
                opts,
            }),
        );

        tracing::info!(event = "engine_mounted", engine = %name, tools = count, sandbox_override = opts.sandbox_override);
        Ok(count)
    }

    /// Remove an engine and all its routes. Idempotent.
    pub fn unmount(&self, name: &str) -> bool {
        let mut mounts = self.mounts.write().unwrap_or_else(|p| p.into_inner());
        let had_routes = self.router.remove(name);
        let had_mount = mounts.remove(name).is_some();
        if had_mount {
            tracing::info!(event = "engine_unmounted", engine = %name);
        }
        had_routes || had_mount
    }

    pub fn tools(&self) -> Vec<ToolSpec> {
        self.router.tools()
    }

    pub fn lookup(&self, name: &str) -> Option<Route> {
        self.router.lookup(name)
    }

    pub fn router(&self) -> &ToolRouter {
        &self.router
    }

    pub fn status(&self) -> MuxStatus {
        let mounts = self.mounts.read().unwrap_or_else(|p| p.into_inner());
        let engines = self
            .router
            .engines()
            .into_iter()
            .map(|name| EngineStatus {
                version: mounts
                    .get(&name)
                    .map(|m| m.info.version.clone())
                    .unwrap_or_default(),
                tools: self.router.tool_count(&name),
                name,
            })
            .collect();
        MuxStatus {
            engines,
            tools: self.router.len(),
        }
    }

    /// Run a routed call through the engine's hook pipeline.
    pub async fn call(
        &self,
        route: &Route,
        args: Value,
        ctx: &CallContext,
    ) -> std::result::Result<Value, CallFailure> {
        let mount = {
            let mounts = self.mounts.read().unwrap_or_else(|p| p.into_inner());
            mounts.get(&route.engine).cloned()
        }
        .ok_or_else(|| {
            CallFailure::gate(HubError::MethodNotFound(format!("engine offline: {}", route.engine)))
        })?;

        let ctx = CallContext {
            service: route.engine.clone(),
            tool: route.spec.name.clone(),
            requires_system: route.spec.requires_system,
            sandbox_override: mount.opts.sandbox_override,
            ..ctx.clone()
        };

        mount
            .pipeline
            .wrap_call_staged(
                &ctx,
                &route.spec.name,
                &args,
                mount.engine.call(&route.tool, args.clone(), &ctx),
            )
            .await
    }
}
