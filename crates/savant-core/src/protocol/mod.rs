//! Protocol modules (JSON-RPC envelopes + tool metadata).
//!
//! This module hosts the wire formats shared by every transport:
//! - `rpc`: request/response/error envelopes and the panic-free line decoder.
//! - `tool`: tool specs and server metadata reported by engines.
//!
//! Decoding never panics: malformed input becomes a ready-to-send error
//! envelope instead of an error that could escape a transport loop.

pub mod rpc;
pub mod tool;
