use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use savant_core::error::{HubError, Result};

/// Outcome recorded for one invocation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Error,
    /// Rejected by a before-hook (sandbox); the tool never ran.
    Blocked,
}

/// Immutable record of one tool-invocation attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub tool: String,
    pub service: String,
    /// Argument keys only; values are not persisted.
    pub arguments: Vec<String>,
    pub timestamp_ms: u64,
    #[serde(default)]
    pub actor: Option<String>,
    pub status: AuditStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEntry {
    pub fn new(tool: &str, service: &str, args: &Value, actor: Option<&str>, status: AuditStatus) -> Self {
        let arguments = args
            .as_object()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        Self {
            tool: tool.to_string(),
            service: service.to_string(),
            arguments,
            timestamp_ms: now_ms(),
            actor: actor.map(str::to_string),
            status,
            trace_id: None,
            duration_ms: None,
            error: None,
        }
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    pub fn with_duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    pub fn with_error(mut self, msg: impl Into<String>) -> Self {
        self.error = Some(msg.into());
        self
    }
}

/// JSONL writer. An empty/unset path makes every append a no-op.
#[derive(Debug)]
pub struct AuditStore {
    path: Option<PathBuf>,
    // Serializes appends; `true` once the parent directory exists.
    dir_ready: Mutex<bool>,
}

impl AuditStore {
    pub fn new(path: impl AsRef<str>) -> Self {
        let path = path.as_ref().trim();
        Self {
            path: (!path.is_empty()).then(|| PathBuf::from(path)),
            dir_ready: Mutex::new(false),
        }
    }

    pub fn disabled() -> Self {
        Self::new("")
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Append one record, creating the parent directory on first write.
    pub fn append(&self, entry: &AuditEntry) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut line = serde_json::to_string(entry)
            .map_err(|e| HubError::Internal(format!("audit serialize failed: {e}")))?;
        line.push('\n');

        // Poisoned mutex means a prior writer panicked mid-append; keep appending.
        let mut dir_ready = self.dir_ready.lock().unwrap_or_else(|p| p.into_inner());
        if !*dir_ready {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)?;
            }
            *dir_ready = true;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    let ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    u64::try_from(ms).unwrap_or(u64::MAX)
}
