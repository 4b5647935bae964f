//! Metrics registry backed by `DashMap`.
//!
//! Label sets are `BTreeMap`s so identity ignores insertion order and
//! rendering order is sorted by key. Every series gets a sequence number on
//! first appearance; snapshots are ordered by it.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use dashmap::DashMap;

/// Unordered key/value label set.
pub type Labels = BTreeMap<String, String>;

/// Build a label set from pairs (later duplicates win).
pub fn labels(pairs: &[(&str, &str)]) -> Labels {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

type SeriesKey = (String, Labels);

struct CounterCell {
    seq: u64,
    value: AtomicU64,
}

struct DistCell {
    seq: u64,
    // count/sum/min/max must move together.
    acc: Mutex<Distribution>,
}

/// count/sum/min/max accumulator for latency-like values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Distribution {
    pub count: u64,
    pub sum: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Distribution {
    fn record(&mut self, v: f64) {
        self.count += 1;
        self.sum += v;
        self.min = Some(self.min.map_or(v, |m| m.min(v)));
        self.max = Some(self.max.map_or(v, |m| m.max(v)));
    }
}

#[derive(Default)]
pub struct Telemetry {
    counters: DashMap<SeriesKey, CounterCell>,
    distributions: DashMap<SeriesKey, DistCell>,
    families: DashMap<String, u64>,
    seq: AtomicU64,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment a counter by 1.
    pub fn increment(&self, name: &str, labels: &[(&str, &str)]) {
        self.add(name, labels, 1);
    }

    /// Increment a counter by an arbitrary value.
    pub fn add(&self, name: &str, labels: &[(&str, &str)], by: u64) {
        self.touch_family(name);
        let key = (name.to_string(), self::labels(labels));
        let cell = self.counters.entry(key).or_insert_with(|| CounterCell {
            seq: self.next_seq(),
            value: AtomicU64::new(0),
        });
        cell.value.fetch_add(by, Ordering::Relaxed);
    }

    /// Record one value into a distribution.
    pub fn observe(&self, name: &str, value: f64, labels: &[(&str, &str)]) {
        self.touch_family(name);
        let key = (name.to_string(), self::labels(labels));
        let cell = self.distributions.entry(key).or_insert_with(|| DistCell {
            seq: self.next_seq(),
            acc: Mutex::new(Distribution::default()),
        });
        let mut acc = cell.acc.lock().unwrap_or_else(|p| p.into_inner());
        acc.record(value);
    }

    /// Owned copy of every series, families and entries in first-appearance order.
    pub fn snapshot(&self) -> Snapshot {
        let mut rows: Vec<(u64, String, MetricEntry)> = Vec::new();

        for r in self.counters.iter() {
            let (name, labels) = r.key();
            rows.push((
                r.value().seq,
                name.clone(),
                MetricEntry::Counter {
                    labels: labels.clone(),
                    value: r.value().value.load(Ordering::Relaxed),
                },
            ));
        }
        for r in self.distributions.iter() {
            let (name, labels) = r.key();
            let stats = *r.value().acc.lock().unwrap_or_else(|p| p.into_inner());
            rows.push((
                r.value().seq,
                name.clone(),
                MetricEntry::Distribution {
                    labels: labels.clone(),
                    stats,
                },
            ));
        }
        rows.sort_by_key(|(seq, _, _)| *seq);

        let mut names: Vec<(u64, String)> = self
            .families
            .iter()
            .map(|r| (*r.value(), r.key().clone()))
            .collect();
        names.sort();

        let metrics = names
            .into_iter()
            .map(|(_, name)| {
                let entries = rows
                    .iter()
                    .filter(|(_, n, _)| *n == name)
                    .map(|(_, _, e)| e.clone())
                    .collect();
                MetricFamily { name, entries }
            })
            .filter(|f| !f.entries.is_empty())
            .collect();

        Snapshot { metrics }
    }

    /// Drop every series. Intended for tests.
    pub fn reset(&self) {
        self.counters.clear();
        self.distributions.clear();
        self.families.clear();
        self.seq.store(0, Ordering::Relaxed);
    }

    fn touch_family(&self, name: &str) {
        if self.families.contains_key(name) {
            return;
        }
        self.families
            .entry(name.to_string())
            .or_insert_with(|| self.next_seq());
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }
}

/// One series within a family.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricEntry {
    Counter { labels: Labels, value: u64 },
    Distribution { labels: Labels, stats: Distribution },
}

impl MetricEntry {
    pub fn labels(&self) -> &Labels {
        match self {
            MetricEntry::Counter { labels, .. } | MetricEntry::Distribution { labels, .. } => labels,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    pub name: String,
    pub entries: Vec<MetricEntry>,
}

/// Point-in-time copy; unaffected by later mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub metrics: Vec<MetricFamily>,
}

impl Snapshot {
    pub fn family(&self, name: &str) -> Option<&MetricFamily> {
        self.metrics.iter().find(|f| f.name == name)
    }

    /// Counter value for an exact label set.
    pub fn counter(&self, name: &str, labels: &[(&str, &str)]) -> Option<u64> {
        let want = self::labels(labels);
        self.family(name)?.entries.iter().find_map(|e| match e {
            MetricEntry::Counter { labels, value } if *labels == want => Some(*value),
            _ => None,
        })
    }

    /// Sum of counters whose labels contain every given pair.
    pub fn counter_where(&self, name: &str, filter: &[(&str, &str)]) -> u64 {
        let Some(family) = self.family(name) else { return 0 };
        family
            .entries
            .iter()
            .filter_map(|e| match e {
                MetricEntry::Counter { labels, value }
                    if filter.iter().all(|(k, v)| labels.get(*k).map(String::as_str) == Some(*v)) =>
                {
                    Some(*value)
                }
                _ => None,
            })
            .sum()
    }

    /// Distribution stats for an exact label set.
    pub fn distribution(&self, name: &str, labels: &[(&str, &str)]) -> Option<Distribution> {
        let want = self::labels(labels);
        self.family(name)?.entries.iter().find_map(|e| match e {
            MetricEntry::Distribution { labels, stats } if *labels == want => Some(*stats),
            _ => None,
        })
    }
}
