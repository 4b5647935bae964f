//! Config loaders (strict parsing).
//!
//! Missing files are reported as `found = false` next to the defaults so
//! callers can tell "absent" apart from "broken".

pub mod schema;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use savant_core::error::{HubError, Result};

pub use schema::{AuditSection, HubConfig, HubSection, PolicyConfig, ReplaySection, TransportKind};

/// Read and validate `path`; a missing file yields defaults.
pub fn load_or_default(path: &str) -> Result<(HubConfig, bool)> {
    match read_optional(Path::new(path))? {
        Some(s) => Ok((load_from_str(&s)?, true)),
        None => Ok((HubConfig::default(), false)),
    }
}

pub fn load_from_str(s: &str) -> Result<HubConfig> {
    let cfg: HubConfig = serde_yaml::from_str(s)
        .map_err(|e| HubError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Read a policy file. Missing → `(defaults, false)`; unreadable or invalid → `Err`.
pub fn load_policy(path: &Path) -> Result<(PolicyConfig, bool)> {
    match read_optional(path)? {
        Some(s) => Ok((policy_from_str(&s)?, true)),
        None => Ok((PolicyConfig::default(), false)),
    }
}

pub fn policy_from_str(s: &str) -> Result<PolicyConfig> {
    // An empty document is a valid "all defaults" policy.
    if s.trim().is_empty() {
        return Ok(PolicyConfig::default());
    }
    serde_yaml::from_str(s).map_err(|e| HubError::Config(format!("invalid policy yaml: {e}")))
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(HubError::Config(format!("read {} failed: {e}", path.display()))),
    }
}
