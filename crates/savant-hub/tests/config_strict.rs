#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use savant_core::error::HubError;
use savant_hub::config::{self, TransportKind};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
hub:
  listen: "127.0.0.1:9292"
  transprot: http # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(matches!(err, HubError::Config(_)));
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.hub.transport, TransportKind::Stdio);
    assert_eq!(cfg.hub.listen_addr().unwrap().port(), 9292);
    assert!(cfg.hub.policy_path.is_none());
}

#[test]
fn http_transport_and_overrides() {
    let ok = r#"
version: 1
hub:
  listen: "0.0.0.0:8080"
  transport: http
  policy_path: "conf/policy.yml"
  audit_store: "var/audit.jsonl"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.hub.transport, TransportKind::Http);
    assert_eq!(cfg.hub.policy_path.as_deref(), Some("conf/policy.yml"));
    assert_eq!(cfg.hub.audit_store.as_deref(), Some("var/audit.jsonl"));
}

#[test]
fn rejects_bad_version_and_listen() {
    assert!(config::load_from_str("version: 2\n").is_err());
    assert!(config::load_from_str("version: 1\nhub:\n  listen: \"nowhere\"\n").is_err());
}

#[test]
fn missing_config_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("savant.yaml");
    let (cfg, found) = config::load_or_default(path.to_str().unwrap()).unwrap();
    assert!(!found);
    assert_eq!(cfg.version, 1);
}

#[test]
fn policy_defaults_and_unknown_keys() {
    let empty = config::policy_from_str("").unwrap();
    assert!(!empty.sandbox);
    assert!(!empty.audit.enabled);
    assert_eq!(empty.audit.store, "logs/savant_audit.jsonl");
    assert_eq!(empty.replay_limit(), 25);

    let p = config::policy_from_str("sandbox: true\naudit:\n  enabled: true\nreplay:\n  limit: -3\n").unwrap();
    assert!(p.sandbox);
    assert!(p.audit.enabled);
    assert_eq!(p.replay_limit(), 25);

    assert!(config::policy_from_str("sandbox: [true\n").is_err());
}

#[test]
fn policy_ignores_unknown_keys() {
    let p = config::policy_from_str(
        "sandbox: true\nsandbx: false\naudit:\n  enabled: true\n  store: \"x.jsonl\"\n  rotate: daily\nreplay:\n  limit: 5\n  ttl: 3\n",
    )
    .unwrap();
    assert!(p.sandbox);
    assert!(p.audit.enabled);
    assert_eq!(p.audit.store, "x.jsonl");
    assert_eq!(p.replay_limit(), 5);
}
