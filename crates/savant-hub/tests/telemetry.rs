#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use savant_hub::obs::{export, labels, MetricEntry, Telemetry};

#[test]
fn same_labels_accumulate_distinct_labels_do_not() {
    let t = Telemetry::new();
    t.increment("m", &[("tool", "x"), ("service", "y")]);
    // Label order is irrelevant to identity.
    t.increment("m", &[("service", "y"), ("tool", "x")]);
    t.increment("m", &[("tool", "z"), ("service", "y")]);

    let snap = t.snapshot();
    assert_eq!(snap.counter("m", &[("tool", "x"), ("service", "y")]), Some(2));
    assert_eq!(snap.counter("m", &[("tool", "z"), ("service", "y")]), Some(1));
    assert_eq!(snap.counter_where("m", &[("service", "y")]), 3);
    assert_eq!(snap.family("m").unwrap().entries.len(), 2);
}

#[test]
fn snapshot_keeps_first_appearance_order() {
    let t = Telemetry::new();
    t.increment("b", &[]);
    t.increment("a", &[("k", "2")]);
    t.increment("a", &[("k", "1")]);
    t.increment("b", &[]);

    let snap = t.snapshot();
    let families: Vec<_> = snap.metrics.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(families, ["b", "a"]);

    let a = snap.family("a").unwrap();
    assert_eq!(a.entries[0].labels(), &labels(&[("k", "2")]));
    assert_eq!(a.entries[1].labels(), &labels(&[("k", "1")]));
}

#[test]
fn snapshot_is_a_copy() {
    let t = Telemetry::new();
    t.increment("m", &[]);
    let before = t.snapshot();
    t.increment("m", &[]);
    assert_eq!(before.counter("m", &[]), Some(1));
    assert_eq!(t.snapshot().counter("m", &[]), Some(2));

    t.reset();
    assert!(t.snapshot().metrics.is_empty());
}

#[test]
fn distributions_track_count_sum_min_max() {
    let t = Telemetry::new();
    t.observe("d", 0.5, &[("tool", "x")]);
    t.observe("d", 1.5, &[("tool", "x")]);

    let stats = t.snapshot().distribution("d", &[("tool", "x")]).unwrap();
    assert_eq!(stats.count, 2);
    assert_eq!(stats.sum, 2.0);
    assert_eq!(stats.min, Some(0.5));
    assert_eq!(stats.max, Some(1.5));
}

#[test]
fn prometheus_lines() {
    let t = Telemetry::new();
    t.increment("metric", &[("tool", "x"), ("service", "y")]);
    t.increment("up", &[]);
    t.observe("lat", 0.5, &[("tool", "x")]);
    t.observe("lat", 1.5, &[("tool", "x")]);
    t.increment("esc", &[("v", "a\"b\\c")]);

    let text = export::prometheus(&t.snapshot());
    let lines: Vec<&str> = text.lines().collect();

    assert!(lines.contains(&"metric{service=\"y\",tool=\"x\"} 1"));
    assert!(lines.contains(&"up 1"));
    assert!(lines.contains(&"lat_count{tool=\"x\"} 2"));
    assert!(lines.contains(&"lat_sum{tool=\"x\"} 2"));
    assert!(lines.contains(&"lat_max{tool=\"x\"} 1.5"));
    assert!(lines.contains(&"lat_min{tool=\"x\"} 0.5"));
    assert!(lines.contains(&"esc{v=\"a\\\"b\\\\c\"} 1"));
    assert!(!text.contains("# TYPE"));
}

#[test]
fn concurrent_increments_are_not_lost() {
    let t = Telemetry::new();
    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..1000 {
                    t.increment("hits", &[("tool", "x")]);
                    t.observe("lat", 1.0, &[("tool", "x")]);
                }
            });
        }
    });

    let snap = t.snapshot();
    assert_eq!(snap.counter("hits", &[("tool", "x")]), Some(8000));
    let stats = snap.distribution("lat", &[("tool", "x")]).unwrap();
    assert_eq!(stats.count, 8000);
    assert_eq!(stats.sum, 8000.0);
    assert!(matches!(
        snap.family("hits").unwrap().entries[0],
        MetricEntry::Counter { value: 8000, .. }
    ));
}
