//! Prometheus text exposition.
//!
//! Counters render as one line; distributions as `_count`, `_sum`, `_max`,
//! `_min` (0 when unobserved). Labels render sorted by key.

use std::fmt::Write;

use super::metrics::{Labels, MetricEntry, Snapshot};

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_str(labels: &Labels) -> String {
    labels
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn write_line(out: &mut String, metric: &str, labels: &str, value: impl std::fmt::Display) {
    if labels.is_empty() {
        let _ = writeln!(out, "{} {}", metric, value);
    } else {
        let _ = writeln!(out, "{}{{{}}} {}", metric, labels, value);
    }
}

/// Render a snapshot in Prometheus text format.
pub fn prometheus(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    for family in &snapshot.metrics {
        let name = family.name.as_str();
        for entry in &family.entries {
            let labels = label_str(entry.labels());
            match entry {
                MetricEntry::Counter { value, .. } => write_line(&mut out, name, &labels, value),
                MetricEntry::Distribution { stats, .. } => {
                    write_line(&mut out, &format!("{name}_count"), &labels, stats.count);
                    write_line(&mut out, &format!("{name}_sum"), &labels, stats.sum);
                    write_line(&mut out, &format!("{name}_max"), &labels, stats.max.unwrap_or(0.0));
                    write_line(&mut out, &format!("{name}_min"), &labels, stats.min.unwrap_or(0.0));
                }
            }
        }
    }
    out
}
