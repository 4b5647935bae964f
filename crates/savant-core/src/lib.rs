//! Savant core: transport-agnostic protocol primitives and error types.
//!
//! This crate defines the wire-level contracts and error surface shared by the
//! hub, its transports, and engines. It intentionally carries no transport or
//! runtime dependencies so engines can depend on it alone.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `HubError`/`Result` so a hub process
//! does not crash on malformed input.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{HubError, Result, RpcCode};
pub use protocol::rpc::{RequestId, RpcError, RpcRequest, RpcResponse};
pub use protocol::tool::{ServerInfo, ToolDescriptor, ToolSpec};
