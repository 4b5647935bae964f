#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;

use savant_core::error::HubError;
use savant_hub::audit::{AuditEntry, AuditStatus, AuditStore};
use savant_hub::config;
use savant_hub::policy::Policy;

mod common;

#[test]
fn enforce_matrix() {
    let off = common::policy(false, None);
    assert!(off.enforce("fs.exec", true, false).is_ok());

    let on = common::policy(true, None);
    assert!(on.enforce("fs.read", false, false).is_ok());
    assert!(on.enforce("fs.exec", true, true).is_ok());

    let err = on.enforce("fs.exec", true, false).unwrap_err();
    assert!(matches!(err, HubError::SandboxViolation { ref tool } if tool == "fs.exec"));
}

#[test]
fn load_reads_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("policy.yml");
    std::fs::write(
        &path,
        "sandbox: true\naudit:\n  enabled: true\n  store: \"out/audit.jsonl\"\nreplay:\n  limit: 10\n",
    )
    .unwrap();

    let p = Policy::load(Some(path.as_path()));
    assert!(p.sandbox());
    assert!(p.audit_enabled());
    assert_eq!(p.audit_store_path(), "out/audit.jsonl");
    assert_eq!(p.replay_limit(), 10);

    let (cfg, found) = config::load_policy(&path).unwrap();
    assert!(found);
    assert!(cfg.sandbox);
}

#[test]
fn extra_policy_keys_keep_the_sandbox_on() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("policy.yml");
    std::fs::write(
        &path,
        "sandbox: true\nowner: platform\naudit:\n  enabled: true\n  store: \"a.jsonl\"\n  rotate: daily\n",
    )
    .unwrap();

    let p = Policy::load(Some(path.as_path()));
    assert!(p.sandbox());
    assert!(p.audit_enabled());
    assert!(p.enforce("fs.exec", true, false).is_err());
}

#[test]
fn missing_or_invalid_policy_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("nope.yml");
    let (cfg, found) = config::load_policy(&missing).unwrap();
    assert!(!found);
    assert!(!cfg.sandbox);
    assert!(!Policy::load(Some(missing.as_path())).sandbox());

    let broken = dir.path().join("broken.yml");
    std::fs::write(&broken, "sandbox: [true\n").unwrap();
    assert!(config::load_policy(&broken).is_err());

    let p = Policy::load(Some(broken.as_path()));
    assert!(!p.sandbox());
    assert!(!p.audit_enabled());
    assert_eq!(p.replay_limit(), 25);
}

#[test]
fn audit_store_creates_directories_lazily() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/deeper/audit.jsonl");
    let store = AuditStore::new(path.to_str().unwrap());

    assert!(store.is_enabled());
    assert!(!path.parent().unwrap().exists());

    let args = json!({ "query": "secret", "limit": 3 });
    store
        .append(&AuditEntry::new("ctx.search", "ctx", &args, Some("alice"), AuditStatus::Success).with_duration_ms(4))
        .unwrap();
    store
        .append(&AuditEntry::new("ctx.search", "ctx", &args, None, AuditStatus::Error).with_error("boom"))
        .unwrap();

    let lines = common::read_lines(&path);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["status"], "success");
    assert_eq!(lines[0]["actor"], "alice");
    assert_eq!(lines[0]["duration_ms"], 4);
    assert_eq!(lines[1]["status"], "error");
    assert_eq!(lines[1]["error"], "boom");

    // Keys only; values never reach disk.
    let keys: Vec<_> = lines[0]["arguments"].as_array().unwrap().iter().filter_map(|v| v.as_str()).collect();
    assert!(keys.contains(&"query"));
    assert!(keys.contains(&"limit"));
    assert!(!std::fs::read_to_string(&path).unwrap().contains("secret"));
}

#[test]
fn disabled_audit_store_is_a_noop() {
    let store = AuditStore::new("   ");
    assert!(!store.is_enabled());
    assert!(store.path().is_none());
    store
        .append(&AuditEntry::new("a.b", "a", &json!({}), None, AuditStatus::Success))
        .unwrap();
    assert!(!AuditStore::disabled().is_enabled());
}
