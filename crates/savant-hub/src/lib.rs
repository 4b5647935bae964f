//! Savant hub library entry.
//!
//! This crate wires the engine multiplexer, sandbox policy, audit trail,
//! telemetry, and JSON-RPC dispatcher into one hub, and binds it to the
//! stdio and HTTP transports. It is consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod audit;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod multiplexer;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod router;
pub mod services;
pub mod transport;
