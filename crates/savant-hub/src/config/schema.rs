use std::net::SocketAddr;

use serde::Deserialize;
use savant_core::error::{HubError, Result};

/// Hub process configuration (`savant.yaml`).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HubConfig {
    pub version: u32,

    #[serde(default)]
    pub hub: HubSection,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            version: 1,
            hub: HubSection::default(),
        }
    }
}

impl HubConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(HubError::Config(format!("unsupported config version: {}", self.version)));
        }

        self.hub.validate()?;

        Ok(())
    }
}

/// Which transport the binary binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Stdio,
    Http,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HubSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_transport")]
    pub transport: TransportKind,

    /// Explicit policy file; wins over `SAVANT_POLICY_PATH`.
    #[serde(default)]
    pub policy_path: Option<String>,

    /// Overrides `audit.store` from the policy file.
    #[serde(default)]
    pub audit_store: Option<String>,
}

impl Default for HubSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            transport: default_transport(),
            policy_path: None,
            audit_store: None,
        }
    }
}

impl HubSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|_| HubError::Config(format!("hub.listen must be a valid SocketAddr: {}", self.listen)))
    }
}

fn default_listen() -> String {
    "127.0.0.1:9292".into()
}
fn default_transport() -> TransportKind {
    TransportKind::Stdio
}

/// Governance policy (`policy.yml`): sandbox + audit settings.
///
/// Unknown keys are ignored: a stray field must not reset the sandbox.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub sandbox: bool,

    #[serde(default)]
    pub audit: AuditSection,

    #[serde(default)]
    pub replay: ReplaySection,
}

impl PolicyConfig {
    /// Replay window hint; non-positive values fall back to the default.
    pub fn replay_limit(&self) -> u32 {
        u32::try_from(self.replay.limit)
            .ok()
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_REPLAY_LIMIT)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditSection {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_audit_store")]
    pub store: String,
}

impl Default for AuditSection {
    fn default() -> Self {
        Self {
            enabled: false,
            store: default_audit_store(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplaySection {
    #[serde(default = "default_replay_limit")]
    pub limit: i64,
}

impl Default for ReplaySection {
    fn default() -> Self {
        Self {
            limit: default_replay_limit(),
        }
    }
}

const DEFAULT_REPLAY_LIMIT: u32 = 25;

fn default_audit_store() -> String {
    "logs/savant_audit.jsonl".into()
}
fn default_replay_limit() -> i64 {
    i64::from(DEFAULT_REPLAY_LIMIT)
}
