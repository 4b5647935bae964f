//! Operational HTTP endpoints.
//!
//! - `/healthz` : liveness (always 200 while the process is up)
//! - `/metrics` : Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::app_state::HubState;

pub async fn healthz(State(state): State<HubState>) -> impl IntoResponse {
    let status = state.multiplexer().status();
    let dispatcher = state.dispatcher();
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": dispatcher.server_info().name,
            "engines": status.engines,
            "tools": status.tools,
        })),
    )
}

pub async fn metrics(State(state): State<HubState>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        state.metrics_text(),
    )
        .into_response()
}
