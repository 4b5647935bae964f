//! Tool tracer: telemetry, audit, and logging around every routed call.
//!
//! Every call gets a `trace_id` (kept if the caller already set one) that is
//! stamped on its log events and its audit entry.
//!
//! Accounting per call:
//! - rejected by a gate: one `tool_errors_total`, one `blocked` audit entry;
//! - executed: one of `tool_invocations_total` / `tool_errors_total`, one
//!   `tool_duration_seconds` observation, one `success`/`error` audit entry.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use uuid::Uuid;

use crate::audit::{now_ms, AuditEntry, AuditStatus, AuditStore};
use crate::engine::{CallContext, CallFailure, Stage};
use crate::multiplexer::{Multiplexer, Route};
use crate::obs::{Telemetry, TOOL_DURATION_SECONDS, TOOL_ERRORS_TOTAL, TOOL_INVOCATIONS_TOTAL};

pub struct ToolTracer {
    telemetry: Arc<Telemetry>,
    audit: Arc<AuditStore>,
}

impl ToolTracer {
    pub fn new(telemetry: Arc<Telemetry>, audit: Arc<AuditStore>) -> Self {
        Self { telemetry, audit }
    }

    pub async fn call(
        &self,
        mux: &Multiplexer,
        route: &Route,
        args: Value,
        ctx: &CallContext,
    ) -> Result<Value, CallFailure> {
        let tool = route.spec.name.as_str();
        let service = route.engine.as_str();
        let labels = [("tool", tool), ("service", service)];

        let mut ctx = ctx.clone();
        if ctx.trace_id.is_empty() {
            ctx.trace_id = Uuid::new_v4().to_string();
        }
        let trace_id = ctx.trace_id.as_str();

        let mut entry = AuditEntry::new(tool, service, &args, ctx.actor.as_deref(), AuditStatus::Success)
            .with_trace_id(trace_id);

        tracing::debug!(event = "tool_start", tool, service, trace_id, id = ?ctx.request_id);
        let start = Instant::now();
        let out = mux.call(route, args, &ctx).await;
        let elapsed = start.elapsed();
        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        match &out {
            Ok(_) => {
                self.telemetry.increment(TOOL_INVOCATIONS_TOTAL, &labels);
                self.telemetry.observe(TOOL_DURATION_SECONDS, elapsed.as_secs_f64(), &labels);
                entry = entry.with_duration_ms(duration_ms);
                tracing::debug!(event = "tool_end", tool, service, trace_id, duration_ms, status = "success");
            }
            Err(CallFailure { stage: Stage::Gate, error }) => {
                self.telemetry.increment(TOOL_ERRORS_TOTAL, &labels);
                entry.status = AuditStatus::Blocked;
                entry = entry.with_error(error.to_string());
                tracing::warn!(event = "tool_blocked", tool, service, trace_id, error = %error);
            }
            Err(CallFailure { stage: Stage::Exec, error }) => {
                self.telemetry.increment(TOOL_ERRORS_TOTAL, &labels);
                self.telemetry.observe(TOOL_DURATION_SECONDS, elapsed.as_secs_f64(), &labels);
                entry.status = AuditStatus::Error;
                entry = entry.with_duration_ms(duration_ms).with_error(error.to_string());
                tracing::error!(event = "tool_error", tool, service, trace_id, duration_ms, error = ?error);
            }
        }

        entry.timestamp_ms = now_ms();
        if let Err(e) = self.audit.append(&entry) {
            tracing::warn!(event = "audit_append_failed", tool, trace_id, error = %e);
        }

        out
    }
}
