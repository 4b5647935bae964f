//! Transport bindings.
//!
//! - `stdio`: one sequential reader; request N is answered before N+1 is read.
//! - `http`: axum handlers; connections are served concurrently, unordered.
//!
//! Both share one `HubState` and therefore one policy/telemetry/audit state.

pub mod http;
pub mod stdio;

use std::future::Future;

/// Resolves on Ctrl-C. If the signal cannot be installed it never resolves,
/// leaving EOF / listener failure as the only exits.
pub fn shutdown_signal() -> impl Future<Output = ()> {
    async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(event = "signal_unavailable", error = %e);
            std::future::pending::<()>().await;
        }
    }
}
