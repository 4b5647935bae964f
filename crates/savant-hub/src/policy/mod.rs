//! Policy layer (sandbox gating).
//!
//! Loads the governance policy once per process and exposes the sandbox check
//! as a before-hook that the multiplexer puts ahead of every engine's hooks.

pub mod sandbox;

pub use sandbox::{Policy, SandboxHook, DEFAULT_POLICY_PATH, POLICY_PATH_ENV};
