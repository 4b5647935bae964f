//! Shared fixtures for hub integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use savant_core::error::{HubError, Result};
use savant_core::protocol::tool::{ServerInfo, ToolSpec};
use savant_hub::app_state::HubState;
use savant_hub::config::{AuditSection, PolicyConfig};
use savant_hub::engine::{CallContext, Engine, HookPipeline};
use savant_hub::multiplexer::MountOptions;
use savant_hub::policy::Policy;

/// Issue-tracker stand-in with one read tool, one host tool, one failing tool.
#[derive(Default)]
pub struct JiraEngine {
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl Engine for JiraEngine {
    fn server_info(&self) -> ServerInfo {
        ServerInfo::new("jira", "1.2.0", "issue tracker")
    }

    fn list_tools(&self) -> Vec<ToolSpec> {
        vec![
            ToolSpec::new("issue.get", "fetch one issue"),
            ToolSpec::new("issue.delete", "delete one issue").requires_system(),
            ToolSpec::new("boom", "always fails"),
        ]
    }

    async fn call(&self, name: &str, _args: Value, _ctx: &CallContext) -> Result<Value> {
        self.calls.lock().unwrap().push(name.to_string());
        match name {
            "issue.get" => Ok(json!({ "status": "ok" })),
            "issue.delete" => Ok(json!({ "deleted": true })),
            "boom" => Err(HubError::tool("upstream exploded")),
            other => Err(HubError::tool(format!("no such tool {other}"))),
        }
    }
}

/// Engine whose only tool records into a shared log, with recording hooks.
pub struct HookedEngine {
    pub log: Arc<Mutex<Vec<String>>>,
    pub fail_before: bool,
}

#[async_trait]
impl Engine for HookedEngine {
    fn server_info(&self) -> ServerInfo {
        ServerInfo::new("hooked", "0.1.0", "")
    }

    fn list_tools(&self) -> Vec<ToolSpec> {
        vec![ToolSpec::new("run", "")]
    }

    async fn call(&self, _name: &str, _args: Value, _ctx: &CallContext) -> Result<Value> {
        self.log.lock().unwrap().push("exec".into());
        Ok(json!({}))
    }

    fn hooks(&self) -> HookPipeline {
        let before_log = Arc::clone(&self.log);
        let after_log = Arc::clone(&self.log);
        let fail = self.fail_before;
        HookPipeline::new()
            .before(move |_ctx: &CallContext, _p: &Value| -> Result<()> {
                before_log.lock().unwrap().push("before".into());
                if fail {
                    return Err(HubError::tool("denied by engine"));
                }
                Ok(())
            })
            .after(move |_ctx: &CallContext, _p: &Value| -> Result<()> {
                after_log.lock().unwrap().push("after".into());
                Ok(())
            })
    }
}

pub fn policy(sandbox: bool, audit_store: Option<&Path>) -> Policy {
    Policy::new(PolicyConfig {
        sandbox,
        audit: AuditSection {
            enabled: audit_store.is_some(),
            store: audit_store
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        },
        ..PolicyConfig::default()
    })
}

/// Hub with `jira` mounted under the given policy.
pub fn jira_hub(policy: Policy) -> (HubState, Arc<JiraEngine>) {
    let state = HubState::new(policy);
    let jira = Arc::new(JiraEngine::default());
    state
        .mount("jira", jira.clone(), MountOptions::default())
        .unwrap();
    (state, jira)
}

pub fn call_line(id: i64, tool: &str, args: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": tool, "arguments": args }
    })
    .to_string()
}

pub fn parse(line: &str) -> Value {
    serde_json::from_str(line).unwrap()
}

pub fn read_lines(path: &Path) -> Vec<Value> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}
