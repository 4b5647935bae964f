//! Tool and engine metadata.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A single callable operation exposed by an engine.
///
/// `name` is unqualified when an engine reports it; the hub router stores a
/// copy whose `name` is namespaced (`engine.name`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "inputSchema", default = "empty_object_schema")]
    pub input_schema: Value,
    /// Needs host access; blocked while sandbox mode is on.
    #[serde(rename = "requiresSystem", default)]
    pub requires_system: bool,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: empty_object_schema(),
            requires_system: false,
        }
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }

    pub fn requires_system(mut self) -> Self {
        self.requires_system = true;
        self
    }

    /// Wire form returned by `tools/list`.
    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
        }
    }
}

/// `{name, description, inputSchema}` tuple as listed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Service metadata reported by an engine (and by the hub itself).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
}

impl ServerInfo {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: description.into(),
        }
    }
}

fn empty_object_schema() -> Value {
    json!({ "type": "object", "properties": {} })
}
