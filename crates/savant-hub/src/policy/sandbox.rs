use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use savant_core::error::{HubError, Result};

use crate::config::{self, PolicyConfig};
use crate::engine::{CallContext, CallHook};

/// Environment override for the policy file location.
pub const POLICY_PATH_ENV: &str = "SAVANT_POLICY_PATH";
/// Default policy file location (relative to the working directory).
pub const DEFAULT_POLICY_PATH: &str = "config/policy.yml";

/// Process-wide governance policy. Construct once at startup, then share via Arc.
#[derive(Debug, Clone, Default)]
pub struct Policy {
    cfg: PolicyConfig,
}

impl Policy {
    pub fn new(cfg: PolicyConfig) -> Self {
        Self { cfg }
    }

    /// Layered load: explicit path, else `SAVANT_POLICY_PATH`, else the default.
    /// Read/parse failures degrade to safe defaults (sandbox off, audit off).
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = resolve_path(explicit);
        match config::load_policy(&path) {
            Ok((cfg, true)) => {
                tracing::info!(event = "policy_loaded", path = %path.display(), sandbox = cfg.sandbox, audit = cfg.audit.enabled);
                Self::new(cfg)
            }
            Ok((cfg, false)) => {
                tracing::debug!(event = "policy_missing", path = %path.display());
                Self::new(cfg)
            }
            Err(e) => {
                tracing::warn!(event = "policy_invalid", path = %path.display(), error = %e, "falling back to defaults");
                Self::default()
            }
        }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.cfg
    }

    pub fn sandbox(&self) -> bool {
        self.cfg.sandbox
    }

    pub fn audit_enabled(&self) -> bool {
        self.cfg.audit.enabled
    }

    pub fn audit_store_path(&self) -> &str {
        &self.cfg.audit.store
    }

    pub fn replay_limit(&self) -> u32 {
        self.cfg.replay_limit()
    }

    /// Replace the audit store location (config-level override).
    pub fn with_audit_store(mut self, store: impl Into<String>) -> Self {
        self.cfg.audit.store = store.into();
        self
    }

    /// Sandbox check for one tool execution.
    pub fn enforce(&self, tool: &str, requires_system: bool, sandbox_override: bool) -> Result<()> {
        if !self.cfg.sandbox || sandbox_override || !requires_system {
            return Ok(());
        }
        Err(HubError::SandboxViolation {
            tool: tool.to_string(),
        })
    }
}

fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    match std::env::var(POLICY_PATH_ENV) {
        Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => PathBuf::from(DEFAULT_POLICY_PATH),
    }
}

/// Before-hook enforcing the sandbox using the flags carried on the context.
pub struct SandboxHook {
    policy: Arc<Policy>,
}

impl SandboxHook {
    pub fn new(policy: Arc<Policy>) -> Self {
        Self { policy }
    }
}

impl CallHook for SandboxHook {
    fn run(&self, ctx: &CallContext, _payload: &Value) -> Result<()> {
        self.policy
            .enforce(&ctx.tool, ctx.requires_system, ctx.sandbox_override)
    }
}
