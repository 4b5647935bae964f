//! Axum router wiring.
//!
//! `/healthz` and `/metrics` for operations, `/rpc` for JSON-RPC.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{app_state::HubState, ops, transport};

pub fn build_router(state: HubState) -> Router {
    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .route("/rpc", post(transport::http::rpc))
        .with_state(state)
}
