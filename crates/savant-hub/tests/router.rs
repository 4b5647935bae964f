#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use savant_core::error::HubError;
use savant_core::protocol::tool::ToolSpec;
use savant_hub::multiplexer::ToolRouter;

fn specs(names: &[&str]) -> Vec<ToolSpec> {
    names.iter().map(|n| ToolSpec::new(*n, "")).collect()
}

fn names(router: &ToolRouter) -> Vec<String> {
    router.tools().into_iter().map(|t| t.name).collect()
}

#[test]
fn namespaces_in_registration_order() {
    let r = ToolRouter::new();
    assert_eq!(r.register("github", specs(&["search", "issue.get"])).unwrap(), 2);
    r.register("context", specs(&["fts"])).unwrap();

    assert_eq!(names(&r), ["github.search", "github.issue.get", "context.fts"]);

    let route = r.lookup("github.issue.get").unwrap();
    assert_eq!(route.engine, "github");
    assert_eq!(route.tool, "issue.get");
    assert_eq!(route.spec.name, "github.issue.get");
    assert!(r.lookup("issue.get").is_none());
}

#[test]
fn remove_purges_and_is_idempotent() {
    let r = ToolRouter::new();
    r.register("a", specs(&["x", "y"])).unwrap();
    r.register("b", specs(&["z"])).unwrap();

    assert!(r.remove("a"));
    assert!(!r.remove("a"));
    assert_eq!(names(&r), ["b.z"]);
    assert!(r.lookup("a.x").is_none());
    assert_eq!(r.engines(), ["b"]);
}

#[test]
fn reregister_replaces_set_and_keeps_slot() {
    let r = ToolRouter::new();
    r.register("a", specs(&["old"])).unwrap();
    r.register("b", specs(&["z"])).unwrap();
    r.register("a", specs(&["new1", "new2"])).unwrap();

    assert_eq!(names(&r), ["a.new1", "a.new2", "b.z"]);
    assert!(r.lookup("a.old").is_none());
    assert_eq!(r.tool_count("a"), 2);
    assert_eq!(r.len(), 3);
}

#[test]
fn collisions_are_rejected_without_side_effects() {
    let r = ToolRouter::new();
    r.register("a", specs(&["b.c"])).unwrap();

    // "a.b" + "c" would shadow "a" + "b.c".
    let err = r.register("a.b", specs(&["c", "d"])).unwrap_err();
    assert!(matches!(err, HubError::Conflict(_)));
    assert_eq!(names(&r), ["a.b.c"]);
    assert_eq!(r.lookup("a.b.c").unwrap().engine, "a");
    assert!(r.lookup("a.b.d").is_none());

    let err = r.register("dup", specs(&["x", "x"])).unwrap_err();
    assert!(matches!(err, HubError::Conflict(_)));
    assert!(r.engines().iter().all(|e| e != "dup"));
}

#[test]
fn empty_router() {
    let r = ToolRouter::new();
    assert!(r.is_empty());
    assert!(r.tools().is_empty());
    assert_eq!(r.tool_count("nope"), 0);
}
