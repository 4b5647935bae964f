//! Shared hub state.
//!
//! One explicitly constructed context object owns the policy, telemetry,
//! audit store, multiplexer, and dispatcher. Both transports hold a clone, so
//! they share the same accounting. Tests build isolated instances.

use std::path::Path;
use std::sync::Arc;

use savant_core::error::Result;
use savant_core::protocol::tool::ServerInfo;

use crate::audit::AuditStore;
use crate::config::HubConfig;
use crate::dispatch::{Dispatcher, ToolTracer};
use crate::engine::Engine;
use crate::multiplexer::{Multiplexer, MountOptions};
use crate::obs::{export, Telemetry};
use crate::policy::Policy;

#[derive(Clone)]
pub struct HubState {
    inner: Arc<HubStateInner>,
    dispatcher: Arc<Dispatcher>,
}

struct HubStateInner {
    policy: Arc<Policy>,
    telemetry: Arc<Telemetry>,
    audit: Arc<AuditStore>,
    mux: Arc<Multiplexer>,
}

impl HubState {
    /// Build state for an already-resolved policy.
    pub fn new(policy: Policy) -> Self {
        Self::with_info(policy, default_server_info())
    }

    pub fn with_info(policy: Policy, info: ServerInfo) -> Self {
        let audit = if policy.audit_enabled() {
            AuditStore::new(policy.audit_store_path())
        } else {
            AuditStore::disabled()
        };

        let policy = Arc::new(policy);
        let telemetry = Arc::new(Telemetry::new());
        let audit = Arc::new(audit);
        let mux = Arc::new(Multiplexer::new(Arc::clone(&policy)));
        let tracer = ToolTracer::new(Arc::clone(&telemetry), Arc::clone(&audit));
        let dispatcher = Dispatcher::new(Arc::clone(&mux), tracer, info);

        Self {
            inner: Arc::new(HubStateInner {
                policy,
                telemetry,
                audit,
                mux,
            }),
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Resolve the policy named by the hub config (or its fallbacks).
    pub fn from_config(cfg: &HubConfig) -> Self {
        let mut policy = Policy::load(cfg.hub.policy_path.as_deref().map(Path::new));
        if let Some(store) = &cfg.hub.audit_store {
            policy = policy.with_audit_store(store.clone());
        }
        Self::new(policy)
    }

    pub fn mount(&self, name: &str, engine: Arc<dyn Engine>, opts: MountOptions) -> Result<usize> {
        self.inner.mux.mount(name, engine, opts)
    }

    pub fn unmount(&self, name: &str) -> bool {
        self.inner.mux.unmount(name)
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }

    pub fn multiplexer(&self) -> Arc<Multiplexer> {
        Arc::clone(&self.inner.mux)
    }

    pub fn policy(&self) -> &Policy {
        &self.inner.policy
    }

    pub fn telemetry(&self) -> Arc<Telemetry> {
        Arc::clone(&self.inner.telemetry)
    }

    pub fn audit(&self) -> Arc<AuditStore> {
        Arc::clone(&self.inner.audit)
    }

    /// Prometheus text for the current telemetry snapshot.
    pub fn metrics_text(&self) -> String {
        export::prometheus(&self.inner.telemetry.snapshot())
    }
}

fn default_server_info() -> ServerInfo {
    ServerInfo::new(
        "savant-hub",
        env!("CARGO_PKG_VERSION"),
        "Savant multi-engine tool hub",
    )
}
