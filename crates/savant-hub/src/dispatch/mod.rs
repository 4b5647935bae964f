//! Dispatcher module exports.
//!
//! Re-exports the protocol state machine and the tool tracer so transports
//! can depend on this module directly.

pub mod dispatcher;
pub mod trace;
pub mod validate;

pub use dispatcher::{Dispatcher, PROTOCOL_VERSION};
pub use trace::ToolTracer;
pub use validate::validate_args;
