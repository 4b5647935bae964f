//! Namespaced tool table.
//!
//! Maps `engine.tool` names to their owning engine. Registration replaces an
//! engine's whole spec set atomically; reads never observe a half-applied
//! registration.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use savant_core::error::{HubError, Result};
use savant_core::protocol::tool::ToolSpec;

/// Separator between engine name and tool name.
pub const NAMESPACE_SEP: &str = ".";

pub fn qualify(engine: &str, tool: &str) -> String {
    format!("{engine}{NAMESPACE_SEP}{tool}")
}

/// Resolved route: owning engine, unqualified tool, namespaced spec.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub engine: String,
    pub tool: String,
    pub spec: ToolSpec,
}

#[derive(Default)]
struct Table {
    // Engines in first-registration order.
    order: Vec<String>,
    routes: HashMap<String, Vec<Route>>,
    index: HashMap<String, Route>,
}

#[derive(Default)]
pub struct ToolRouter {
    table: RwLock<Table>,
}

impl ToolRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `specs` under `engine`, replacing any previous set for it.
    ///
    /// Duplicate names, or names colliding with another engine's tools,
    /// reject the whole registration and leave the table untouched.
    pub fn register(&self, engine: &str, specs: Vec<ToolSpec>) -> Result<usize> {
        if engine.is_empty() {
            return Err(HubError::Conflict("engine name must not be empty".into()));
        }

        let mut seen = HashSet::new();
        let mut routes = Vec::with_capacity(specs.len());
        for spec in specs {
            let fq = qualify(engine, &spec.name);
            if !seen.insert(fq.clone()) {
                return Err(HubError::Conflict(format!("duplicate tool {fq}")));
            }
            routes.push(Route {
                engine: engine.to_string(),
                tool: spec.name.clone(),
                spec: ToolSpec { name: fq, ..spec },
            });
        }

        let mut t = self.table.write().unwrap_or_else(|p| p.into_inner());

        if let Some(clash) = routes.iter().find_map(|r| {
            t.index
                .get(&r.spec.name)
                .filter(|existing| existing.engine != engine)
        }) {
            return Err(HubError::Conflict(format!(
                "tool {} already registered by engine {}",
                clash.spec.name, clash.engine
            )));
        }

        if let Some(old) = t.routes.remove(engine) {
            for r in old {
                t.index.remove(&r.spec.name);
            }
        } else {
            t.order.push(engine.to_string());
        }
        for r in &routes {
            t.index.insert(r.spec.name.clone(), r.clone());
        }
        let count = routes.len();
        t.routes.insert(engine.to_string(), routes);
        Ok(count)
    }

    /// Purge every spec under `engine`. Returns whether it was registered.
    pub fn remove(&self, engine: &str) -> bool {
        let mut t = self.table.write().unwrap_or_else(|p| p.into_inner());
        let Some(old) = t.routes.remove(engine) else {
            return false;
        };
        for r in old {
            t.index.remove(&r.spec.name);
        }
        t.order.retain(|e| e != engine);
        true
    }

    /// All namespaced specs: registration order, then spec order.
    pub fn tools(&self) -> Vec<ToolSpec> {
        let t = self.table.read().unwrap_or_else(|p| p.into_inner());
        t.order
            .iter()
            .filter_map(|e| t.routes.get(e))
            .flat_map(|routes| routes.iter().map(|r| r.spec.clone()))
            .collect()
    }

    pub fn lookup(&self, name: &str) -> Option<Route> {
        let t = self.table.read().unwrap_or_else(|p| p.into_inner());
        t.index.get(name).cloned()
    }

    pub fn engines(&self) -> Vec<String> {
        let t = self.table.read().unwrap_or_else(|p| p.into_inner());
        t.order.clone()
    }

    /// Number of tools registered for `engine`.
    pub fn tool_count(&self, engine: &str) -> usize {
        let t = self.table.read().unwrap_or_else(|p| p.into_inner());
        t.routes.get(engine).map(Vec::len).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        let t = self.table.read().unwrap_or_else(|p| p.into_inner());
        t.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
