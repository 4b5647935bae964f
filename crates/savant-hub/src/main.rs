//! Savant hub binary.
//!
//! - Config: `savant.yaml` (or `$SAVANT_CONFIG`), defaults when absent
//! - Policy: `hub.policy_path`, `$SAVANT_POLICY_PATH`, or `config/policy.yml`
//! - Transport: stdio (default) or HTTP on `hub.listen`
//! - Logs go to stderr; stdout belongs to the stdio protocol

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use savant_core::error::Result;
use savant_hub::{
    app_state::HubState,
    config::{self, TransportKind},
    multiplexer::MountOptions,
    services::EchoEngine,
    transport,
};

const CONFIG_ENV: &str = "SAVANT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "savant.yaml";

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        tracing::error!(event = "hub_failed", error = %e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let (cfg, found) = config::load_or_default(&path)?;
    if !found {
        tracing::info!(event = "config_missing", path = %path, "using defaults");
    }

    let state = HubState::from_config(&cfg);
    state.mount(EchoEngine::NAME, Arc::new(EchoEngine::new()), MountOptions::default())?;

    let status = state.multiplexer().status();
    tracing::info!(
        event = "hub_starting",
        transport = ?cfg.hub.transport,
        engines = status.engines.len(),
        tools = status.tools,
        sandbox = state.policy().sandbox(),
    );

    match cfg.hub.transport {
        TransportKind::Stdio => transport::stdio::serve_stdio(state).await,
        TransportKind::Http => transport::http::serve_http(state, cfg.hub.listen_addr()?).await,
    }
}
