//! End-to-end authorization tests: the full engine flow across DAC, MAC and
//! RBAC, cache behavior across reloads, and the audit trail on disk.
//! These exercise positive and negative paths for each model.

use anyhow::Result;
use tempfile::tempdir;

use filewarden::policy::{AuditEntry, AuditLogger, PolicyEngine, SnapshotData};

fn sample_json() -> String {
    r#"{
        "ownership": [
            {"path": "/", "owner": "root", "permissions": "r--"},
            {"path": "/home/alice", "owner": "alice", "permissions": "---"},
            {"path": "/shared", "owner": "root", "permissions": "rwx"}
        ],
        "labels": {
            "paths": {
                "/": "public",
                "/shared": "internal",
                "/finance": "confidential"
            },
            "clearance_hierarchy": {
                "public": 0, "internal": 1, "confidential": 2, "secret": 3
            }
        },
        "users": {
            "alice": {"clearance": "internal", "roles": ["staff"]},
            "bob": {"clearance": "secret", "roles": ["staff", "auditor"]},
            "guest": {"clearance": "public", "roles": ["guest"]},
            "drone": {"clearance": "public", "roles": []}
        },
        "role_perms": [
            {"role": "staff", "operation": "read", "allowed": true},
            {"role": "staff", "operation": "write", "allowed": true},
            {"role": "staff", "operation": "create", "allowed": true},
            {"role": "staff", "operation": "mkdir", "allowed": true},
            {"role": "staff", "operation": "delete", "allowed": false},
            {"role": "auditor", "operation": "read", "allowed": true},
            {"role": "guest", "operation": "read", "allowed": true}
        ]
    }"#
    .to_string()
}

fn sample_engine() -> PolicyEngine {
    let data = SnapshotData::from_json(&sample_json()).expect("sample snapshot");
    PolicyEngine::new(data, AuditLogger::disabled())
}

#[test]
fn authorize_is_idempotent_without_reload() {
    let engine = sample_engine();
    for (user, op, path) in [
        ("alice", "read", "/shared/doc.txt"),
        ("guest", "delete", "/shared/doc.txt"),
        ("bob", "write", "/shared/doc.txt"),
    ] {
        let first = engine.authorize(user, op, path);
        let second = engine.authorize(user, op, path);
        assert_eq!(first.granted, second.granted);
        assert_eq!(first.reason, second.reason);
    }
}

#[test]
fn overall_verdict_is_the_conjunction_of_the_models() {
    let engine = sample_engine();
    // alice on /shared: DAC r-- allows read, MAC internal==internal, RBAC staff read
    let d = engine.authorize("alice", "read", "/shared/doc.txt");
    assert!(d.granted);
    assert!(d.verdicts.iter().all(|v| v.allowed));

    // exactly one model denying forces an overall deny: staff has delete=false
    // while DAC (/shared rwx for non-owners) and MAC (write-like at equal rank
    // via /shared internal vs alice internal) both allow
    let d = engine.authorize("alice", "delete", "/shared/doc.txt");
    assert!(!d.granted);
    let denies: Vec<_> = d.verdicts.iter().filter(|v| !v.allowed).collect();
    assert_eq!(denies.len(), 1);
    assert_eq!(denies[0].model.name(), "RBAC");
}

#[test]
fn owner_bypasses_permission_bits() {
    let engine = sample_engine();
    // /home/alice is "---" for non-owners, but alice owns it
    let verdicts = engine.check_models("alice", "write", "/home/alice/notes");
    assert!(verdicts[0].allowed);
    assert_eq!(verdicts[0].detail, "owner access");
    // a non-owner is shut out by the same record
    let verdicts = engine.check_models("bob", "read", "/home/alice/notes");
    assert!(!verdicts[0].allowed);
}

#[test]
fn mac_scenarios_cite_numeric_ranks() {
    let engine = sample_engine();

    // internal(1) reading confidential(2): no read up
    let d = engine.authorize("alice", "read", "/finance/report");
    assert!(!d.granted);
    assert!(d.reason.contains("read denied: internal(1) < confidential(2)"));

    // secret(3) writing internal(1): no write down
    let d = engine.authorize("bob", "write", "/shared/doc.txt");
    assert!(!d.granted);
    assert!(d.reason.contains("write denied: internal(1) < secret(3)"));
}

#[test]
fn rbac_denies_without_roles_and_without_grants() {
    let engine = sample_engine();

    // empty role set denies every operation
    for op in ["read", "write", "delete", "mkdir"] {
        let d = engine.authorize("drone", op, "/shared/doc.txt");
        assert!(!d.granted);
        assert!(d.reason.contains("no roles assigned"));
    }

    // guest's table has no delete row at all
    let d = engine.authorize("guest", "delete", "/shared/doc.txt");
    assert!(!d.granted);
    assert!(d.reason.contains("no role grants delete"));
}

#[test]
fn missing_ownership_chain_denies_dac() {
    let raw = r#"{
        "ownership": [{"path": "/known", "owner": "root", "permissions": "rwx"}],
        "labels": {"paths": {"/": "public"}, "clearance_hierarchy": {"public": 0}},
        "users": {"alice": {"clearance": "public", "roles": ["staff"]}},
        "role_perms": [{"role": "staff", "operation": "read", "allowed": true}]
    }"#;
    let engine = PolicyEngine::new(SnapshotData::from_json(raw).unwrap(), AuditLogger::disabled());
    // no root entry and no ancestor entry for /elsewhere
    let d = engine.authorize("alice", "read", "/elsewhere/file");
    assert!(!d.granted);
    assert!(d.reason.contains("no ownership record for path or ancestor"));
}

#[test]
fn ancestor_ownership_governs_deep_paths() {
    let raw = r#"{
        "ownership": [
            {"path": "/", "owner": "root", "permissions": "---"},
            {"path": "/a", "owner": "alice", "permissions": "r--"}
        ],
        "labels": {"paths": {"/": "public"}, "clearance_hierarchy": {"public": 0}},
        "users": {
            "alice": {"clearance": "public", "roles": ["staff"]},
            "bob": {"clearance": "public", "roles": ["staff"]}
        },
        "role_perms": [
            {"role": "staff", "operation": "read", "allowed": true},
            {"role": "staff", "operation": "write", "allowed": true}
        ]
    }"#;
    let engine = PolicyEngine::new(SnapshotData::from_json(raw).unwrap(), AuditLogger::disabled());
    // "/a/b/c" has no record of its own; "/a"'s record governs
    assert!(engine.authorize("bob", "read", "/a/b/c").granted);
    assert!(engine.authorize("alice", "write", "/a/b/c").granted); // owner access
    assert!(!engine.authorize("bob", "read", "/z").granted); // root is "---"
}

#[test]
fn reload_recomputes_against_the_new_snapshot() {
    let engine = sample_engine();
    assert!(engine.authorize("alice", "read", "/shared/doc.txt").granted);

    // relabel /shared to confidential: alice's read must now be denied
    let mut data = SnapshotData::from_json(&sample_json()).unwrap();
    data.labels.paths.insert("/shared".into(), "confidential".into());
    engine.reload(data);

    let d = engine.authorize("alice", "read", "/shared/doc.txt");
    assert!(!d.granted);
    assert!(d.reason.contains("read denied: internal(1) < confidential(2)"));
}

#[test]
fn explicit_cache_invalidation_keeps_decisions_stable() {
    let engine = sample_engine();
    let before = engine.authorize("alice", "read", "/shared/doc.txt");
    engine.invalidate_cache();
    let after = engine.authorize("alice", "read", "/shared/doc.txt");
    assert_eq!(before, after);
    // both invocations recomputed: no hit recorded
    assert_eq!(engine.cache_stats().hits, 0);
    assert_eq!(engine.cache_stats().misses, 2);
}

#[tokio::test]
async fn every_request_is_audited_including_cache_hits() -> Result<()> {
    let dir = tempdir()?;
    let audit_path = dir.path().join("audit.jsonl");
    let data = SnapshotData::from_json(&sample_json())?;
    let mut engine = PolicyEngine::new(data, AuditLogger::to_file(&audit_path));

    engine.authorize("alice", "read", "/shared/doc.txt");
    engine.authorize("alice", "read", "/shared/doc.txt"); // cache hit
    engine.authorize("guest", "delete", "/shared/doc.txt");
    assert_eq!(engine.cache_stats().hits, 1);
    engine.shutdown().await;

    let raw = std::fs::read_to_string(&audit_path)?;
    let entries: Vec<AuditEntry> = raw
        .lines()
        .map(|line| serde_json::from_str(line).expect("audit line parses"))
        .collect();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].user, "alice");
    assert_eq!(entries[0].op, "read");
    assert_eq!(entries[0].path, "/shared/doc.txt");
    assert!(entries[0].allowed);
    assert_eq!(entries[0].reason, entries[1].reason);
    assert!(!entries[2].allowed);
    assert!(entries[2].reason.contains("no role grants delete"));
    assert_eq!(engine.audit_errors(), 0);
    Ok(())
}

#[tokio::test]
async fn audit_failure_never_changes_the_verdict() -> Result<()> {
    let dir = tempdir()?;
    // point the sink at a directory so every write fails
    let data = SnapshotData::from_json(&sample_json())?;
    let mut engine = PolicyEngine::new(data, AuditLogger::to_file(dir.path()));

    let d = engine.authorize("alice", "read", "/shared/doc.txt");
    assert!(d.granted);
    engine.shutdown().await;
    assert_eq!(engine.audit_errors(), 1);
    Ok(())
}

#[test]
fn unknown_operation_yields_a_denial_not_an_error() {
    let engine = sample_engine();
    let d = engine.authorize("alice", "truncate", "/shared/doc.txt");
    assert!(!d.granted);
    assert!(d.reason.contains("no permission mapping for operation truncate"));
    assert!(d.reason.contains("truncate has no read/write classification"));
    assert!(d.reason.contains("no role grants truncate"));
}
