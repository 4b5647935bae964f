//! Append-only audit trail.
//!
//! One JSON record per line. The hub only ever appends; inspection and replay
//! are external concerns.

pub mod store;

pub use store::{now_ms, AuditEntry, AuditStatus, AuditStore};
