// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

//! End-to-end tests over synthetic must-gather archives.
//!
//! Exercises the full read pipeline (registry -> discovery -> resolver ->
//! reader -> dedup -> redaction) and the update-types flow against trees
//! built in temporary directories.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use must_oc::archive::discover_roots;
use must_oc::config::Limits;
use must_oc::logs::{stream_pod_log, LogRequest, LogVariant};
use must_oc::output::render_describe;
use must_oc::query::{Query, QueryEngine, Scope};
use must_oc::redact::Redaction;
use must_oc::registry::{updater, TypeRegistry, RESOURCE_MAP_FILE};
use must_oc::{Error, ResourceRecord};

fn write(base: &Path, rel: &str, content: &str) {
    let path = base.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn pod(name: &str, namespace: &str, app: &str) -> String {
    format!(
        "apiVersion: v1\nkind: Pod\nmetadata:\n  name: {name}\n  namespace: {namespace}\n  labels:\n    app: {app}\n  creationTimestamp: \"2024-03-01T08:00:00Z\"\nstatus:\n  phase: Running\n  containerStatuses:\n  - name: app\n    ready: true\n    restartCount: 0\n"
    )
}

/// One archive with both layout variants, a list file, a secret, and logs.
fn build_archive(dir: &Path) {
    write(dir, "mg/namespaces/ns1/core/pods/web.yaml", &pod("web", "ns1", "frontend"));
    write(
        dir,
        "mg/namespaces/all/namespaces/ns1/core/pods/web.yaml",
        &pod("web", "ns1", "stale-copy"),
    );
    write(
        dir,
        "mg/namespaces/all/namespaces/ns2/core/pods/worker.yaml",
        &pod("worker", "ns2", "backend"),
    );
    write(
        dir,
        "mg/namespaces/ns2/apps/deployments.yaml",
        "kind: DeploymentList\nitems:\n- metadata:\n    name: a\n    namespace: ns2\n- metadata:\n    name: b\n    namespace: ns2\n",
    );
    write(
        dir,
        "mg/namespaces/ns4/core/secrets/db-creds.yaml",
        "apiVersion: v1\nkind: Secret\nmetadata:\n  name: db-creds\n  namespace: ns4\ndata:\n  password: cGFzcw==\n",
    );
    write(
        dir,
        "mg/cluster-scoped-resources/core/nodes/worker-0.yaml",
        "apiVersion: v1\nkind: Node\nmetadata:\n  name: worker-0\n",
    );
    write(
        dir,
        "mg/namespaces/ns3/pods/multi/alpha/alpha/logs/current.log",
        "alpha says hi\n",
    );
    write(
        dir,
        "mg/namespaces/ns3/pods/multi/beta/beta/logs/current.log",
        "beta says hi\n",
    );
}

fn pods_query(scope: Scope, name: Option<&str>) -> Query {
    Query {
        group: "core".into(),
        plural: "pods".into(),
        scope,
        name: name.map(String::from),
    }
}

fn names(records: &[ResourceRecord]) -> Vec<String> {
    records.iter().map(|r| r.name().to_string()).collect()
}

#[test]
fn list_all_namespaces_merges_layouts_with_precedence() {
    let dir = TempDir::new().unwrap();
    build_archive(dir.path());
    let roots = discover_roots(&[dir.path().to_path_buf()]).unwrap();
    let engine = QueryEngine::new(&roots, Limits::default());

    let records = engine
        .list(&pods_query(Scope::AllNamespaces, None), &Vec::new(), Redaction::Redacted)
        .unwrap();

    assert_eq!(names(&records), vec!["web", "worker"]);
    // Pattern A content won for the duplicated pod.
    assert_eq!(records[0].labels().get("app").unwrap(), "frontend");
}

#[test]
fn repeated_queries_are_byte_identical() {
    let dir = TempDir::new().unwrap();
    build_archive(dir.path());
    let roots = discover_roots(&[dir.path().to_path_buf()]).unwrap();
    let engine = QueryEngine::new(&roots, Limits::default());
    let query = pods_query(Scope::AllNamespaces, None);

    let first: Vec<String> = engine
        .list(&query, &Vec::new(), Redaction::Redacted)
        .unwrap()
        .iter()
        .map(|r| serde_yaml::to_string(r.value()).unwrap())
        .collect();
    let second: Vec<String> = engine
        .list(&query, &Vec::new(), Redaction::Redacted)
        .unwrap()
        .iter()
        .map(|r| serde_yaml::to_string(r.value()).unwrap())
        .collect();

    assert_eq!(first, second);
}

#[test]
fn identity_is_unique_after_dedup() {
    let dir = TempDir::new().unwrap();
    build_archive(dir.path());
    let roots = discover_roots(&[dir.path().to_path_buf()]).unwrap();
    let engine = QueryEngine::new(&roots, Limits::default());

    let records = engine
        .list(&pods_query(Scope::AllNamespaces, None), &Vec::new(), Redaction::Redacted)
        .unwrap();
    let mut identities: Vec<_> = records.iter().map(|r| r.identity()).collect();
    identities.sort();
    identities.dedup();
    assert_eq!(identities.len(), records.len());
}

#[test]
fn get_and_describe_flow() {
    let dir = TempDir::new().unwrap();
    build_archive(dir.path());
    let roots = discover_roots(&[dir.path().to_path_buf()]).unwrap();
    let engine = QueryEngine::new(&roots, Limits::default());

    let record = engine
        .get(
            &pods_query(Scope::Namespace("ns1".into()), Some("web")),
            Redaction::Redacted,
        )
        .unwrap();
    let text = render_describe(&record);
    assert!(text.contains("kind:"));
    assert!(text.contains("web"));

    let err = engine
        .get(
            &pods_query(Scope::Namespace("ns1".into()), Some("missing")),
            Redaction::Redacted,
        )
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn cluster_scoped_records_have_empty_namespace_identity() {
    let dir = TempDir::new().unwrap();
    build_archive(dir.path());
    let roots = discover_roots(&[dir.path().to_path_buf()]).unwrap();
    let engine = QueryEngine::new(&roots, Limits::default());

    let query = Query {
        group: "core".into(),
        plural: "nodes".into(),
        scope: Scope::Cluster,
        name: None,
    };
    let records = engine.list(&query, &Vec::new(), Redaction::Redacted).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].identity().0, "");
}

#[test]
fn secret_values_never_leave_redacted() {
    let dir = TempDir::new().unwrap();
    build_archive(dir.path());
    let roots = discover_roots(&[dir.path().to_path_buf()]).unwrap();
    let engine = QueryEngine::new(&roots, Limits::default());

    let query = Query {
        group: "core".into(),
        plural: "secrets".into(),
        scope: Scope::Namespace("ns4".into()),
        name: None,
    };
    let records = engine.list(&query, &Vec::new(), Redaction::Redacted).unwrap();
    let dumped = serde_yaml::to_string(records[0].value()).unwrap();
    assert!(!dumped.contains("cGFzcw=="));
    assert!(dumped.contains("<REDACTED>"));

    let raw = engine.list(&query, &Vec::new(), Redaction::Raw).unwrap();
    let dumped = serde_yaml::to_string(raw[0].value()).unwrap();
    assert!(dumped.contains("cGFzcw=="));
}

#[test]
fn ambiguous_container_then_explicit_choice() {
    let dir = TempDir::new().unwrap();
    build_archive(dir.path());
    let roots = discover_roots(&[dir.path().to_path_buf()]).unwrap();

    let mut request = LogRequest {
        namespace: "ns3".into(),
        pod: "multi".into(),
        container: None,
        variant: LogVariant::Current,
    };

    let mut out = Vec::new();
    let err = stream_pod_log(&roots, &request, &Limits::default(), &mut out).unwrap_err();
    match err {
        Error::AmbiguousContainer { containers, .. } => {
            assert_eq!(containers, vec!["alpha".to_string(), "beta".to_string()]);
        }
        other => panic!("expected AmbiguousContainer, got {other:?}"),
    }
    assert!(out.is_empty());

    request.container = Some("beta".into());
    stream_pod_log(&roots, &request, &Limits::default(), &mut out).unwrap();
    assert_eq!(out, b"beta says hi\n");
}

#[test]
fn update_types_then_resolve_discovered_kind() {
    let archive = TempDir::new().unwrap();
    build_archive(archive.path());
    write(
        archive.path(),
        "mg/namespaces/ns1/ceph.rook.io/cephclusters/my-cluster.yaml",
        "kind: CephCluster\nmetadata:\n  name: my-cluster\n  namespace: ns1\n",
    );
    let roots = discover_roots(&[archive.path().to_path_buf()]).unwrap();

    let config = TempDir::new().unwrap();
    let summary = updater::update_types(config.path(), &roots).unwrap();
    assert!(summary.added_kinds.contains(&"cephclusters".to_string()));
    assert_eq!(summary.added_cluster_scoped, vec!["nodes".to_string()]);

    let registry = TypeRegistry::load(config.path()).unwrap();
    let (group, plural) = registry.resolve("cephclusters").unwrap();
    assert_eq!(group, "ceph.rook.io");
    assert!(registry.is_cluster_scoped("nodes"));

    // The freshly learned kind is immediately queryable.
    let engine = QueryEngine::new(&roots, Limits::default());
    let query = Query {
        group,
        plural,
        scope: Scope::Namespace("ns1".into()),
        name: None,
    };
    let records = engine.list(&query, &Vec::new(), Redaction::Redacted).unwrap();
    assert_eq!(names(&records), vec!["my-cluster"]);
}

#[test]
fn update_types_is_stable_over_reruns() {
    let archive = TempDir::new().unwrap();
    build_archive(archive.path());
    let roots = discover_roots(&[archive.path().to_path_buf()]).unwrap();

    let config = TempDir::new().unwrap();
    updater::update_types(config.path(), &roots).unwrap();
    let before = fs::read(config.path().join(RESOURCE_MAP_FILE)).unwrap();

    let summary = updater::update_types(config.path(), &roots).unwrap();
    assert_eq!(summary.total_added(), 0);
    assert_eq!(fs::read(config.path().join(RESOURCE_MAP_FILE)).unwrap(), before);
}

#[cfg(unix)]
#[test]
fn symlinked_file_outside_the_archive_is_never_surfaced() {
    let dir = TempDir::new().unwrap();
    build_archive(dir.path());
    let outside = dir.path().join("outside.yaml");
    fs::write(
        &outside,
        "kind: Pod\nmetadata:\n  name: evil\n  namespace: ns1\n",
    )
    .unwrap();
    std::os::unix::fs::symlink(
        &outside,
        dir.path().join("mg/namespaces/ns1/core/pods/evil.yaml"),
    )
    .unwrap();

    let roots = discover_roots(&[dir.path().to_path_buf()]).unwrap();
    let engine = QueryEngine::new(&roots, Limits::default());
    let records = engine
        .list(
            &pods_query(Scope::Namespace("ns1".into()), None),
            &Vec::new(),
            Redaction::Redacted,
        )
        .unwrap();
    assert_eq!(names(&records), vec!["web"]);
}
