//! Lightweight in-process telemetry.
//!
//! Counters and distributions keyed by metric name + label set, rendered in
//! Prometheus text format by the `/metrics` handler.

pub mod export;
pub mod metrics;

pub use metrics::{labels, Distribution, Labels, MetricEntry, MetricFamily, Snapshot, Telemetry};

/// Successful tool calls.
pub const TOOL_INVOCATIONS_TOTAL: &str = "tool_invocations_total";
/// Failed tool calls, including calls blocked by policy.
pub const TOOL_ERRORS_TOTAL: &str = "tool_errors_total";
/// Wall time of calls that cleared policy.
pub const TOOL_DURATION_SECONDS: &str = "tool_duration_seconds";
