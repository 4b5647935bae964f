//! HTTP JSON-RPC endpoint.
//!
//! One POST body carries one request object. Parse/shape errors answer with
//! HTTP 400; everything the dispatcher handles answers 200 with the envelope.

use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use savant_core::error::{HubError, Result};

use crate::app_state::HubState;
use crate::router;

use super::shutdown_signal;

/// Optional caller identity, recorded as the audit actor.
pub const USER_HEADER: &str = "x-savant-user-id";
/// Audit actor when the header is absent.
pub const HTTP_ACTOR: &str = "http";

pub async fn rpc(State(state): State<HubState>, headers: HeaderMap, body: Bytes) -> Response {
    let actor = headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(HTTP_ACTOR);

    let dispatcher = state.dispatcher();
    let (status, body) = match dispatcher.parse_bytes(&body) {
        Ok(req) => (StatusCode::OK, dispatcher.respond(req, Some(actor)).await.to_line()),
        Err(line) => (StatusCode::BAD_REQUEST, line),
    };

    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve_http(state: HubState, addr: SocketAddr) -> Result<()> {
    let app = router::build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(event = "http_start", %addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| HubError::Internal(format!("http server failed: {e}")))?;
    tracing::info!(event = "http_shutdown");
    Ok(())
}
