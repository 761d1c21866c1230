// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

//! Maps a query to the candidate YAML files that may hold its records.
//!
//! Must-gather producers use several layouts for the same resource, all of
//! which are constructed directly instead of walking the tree:
//!
//! - Pattern A1 (bare):    `namespaces/<NS>/<plural>/<name>/<name>.yaml`
//! - Pattern A2 (direct):  `namespaces/<NS>/<group>/<plural>/<name>.yaml`
//!   (or the `<name>/<name>.yaml` subdirectory variant)
//! - Pattern A3 (list):    `namespaces/<NS>/<group>/<plural>.yaml`
//! - Pattern B (aggregated): `namespaces/all/namespaces/<NS>/<group>/<plural>/<name>.yaml`
//! - Cluster:              `cluster-scoped-resources/<group>/<plural>/<name>.yaml`
//!
//! Within a root, candidates are ordered Pattern A before Pattern B and list
//! files before individual files; namespaces are sorted; roots keep their
//! discovery order. Record-level deduplication downstream keeps the first
//! occurrence, which is what gives Pattern A precedence over Pattern B.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::archive::discovery::ArchiveRoot;
use crate::archive::validate::validate_path;
use crate::error::Error;
use crate::query::{Query, Scope};

/// Emit the ordered, deduplicated candidate files for `query`.
///
/// Named queries short-circuit after the first hit within each root;
/// `stop_at_first` additionally stops at the first hit overall (the
/// `get`/`describe` behavior). Candidates that fail path validation are
/// skipped with a warning.
pub fn find_resource_files(
    roots: &[ArchiveRoot],
    query: &Query,
    stop_at_first: bool,
) -> Vec<PathBuf> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut results: Vec<PathBuf> = Vec::new();

    for root in roots {
        let candidates = match &query.scope {
            Scope::Cluster => cluster_candidates(root.path(), query),
            Scope::Namespace(ns) => {
                namespaced_candidates(root.path(), query, std::slice::from_ref(ns))
            }
            Scope::AllNamespaces => {
                let namespaces = enumerate_namespaces(root.path());
                namespaced_candidates(root.path(), query, &namespaces)
            }
        };

        let mut hit_in_root = false;
        for candidate in candidates {
            match validate_path(&candidate, root.path()) {
                Ok(validated) => {
                    if seen.insert(validated.clone()) {
                        results.push(validated);
                        if query.name.is_some() {
                            hit_in_root = true;
                            break;
                        }
                    }
                }
                Err(Error::PathEscape { path }) => {
                    warn!(path = %path.display(), "skipping path that escapes the archive root");
                }
                Err(err) => {
                    debug!(path = %candidate.display(), %err, "skipping candidate");
                }
            }
        }

        if hit_in_root && stop_at_first {
            break;
        }
    }

    results
}

/// Sorted union of namespace names under `namespaces/` (excluding the
/// reserved `all`) and under `namespaces/all/namespaces/`.
pub fn enumerate_namespaces(root: &Path) -> Vec<String> {
    let mut names: BTreeSet<String> = BTreeSet::new();

    for entry in subdir_names(&root.join("namespaces")) {
        if entry != "all" {
            names.insert(entry);
        }
    }
    for entry in subdir_names(&root.join("namespaces").join("all").join("namespaces")) {
        names.insert(entry);
    }

    names.into_iter().collect()
}

fn namespaced_candidates(root: &Path, query: &Query, namespaces: &[String]) -> Vec<PathBuf> {
    let mut found = Vec::new();

    // Pattern A, per namespace: list file first, then individual files.
    for ns in namespaces {
        let ns_dir = root.join("namespaces").join(ns);
        let bare_dir = ns_dir.join(&query.plural);
        let api_dir = ns_dir.join(&query.group).join(&query.plural);

        match &query.name {
            Some(name) => {
                push_if_file(&mut found, bare_dir.join(name).join(format!("{name}.yaml")));
                push_if_file(&mut found, api_dir.join(format!("{name}.yaml")));
                push_if_file(&mut found, api_dir.join(name).join(format!("{name}.yaml")));
            }
            None => {
                push_if_file(
                    &mut found,
                    ns_dir.join(&query.group).join(format!("{}.yaml", query.plural)),
                );
                collect_name_subdirs(&mut found, &bare_dir);
                collect_yaml_files(&mut found, &api_dir);
                collect_name_subdirs(&mut found, &api_dir);
            }
        }
    }

    // Pattern B, per namespace.
    for ns in namespaces {
        let b_dir = root
            .join("namespaces")
            .join("all")
            .join("namespaces")
            .join(ns)
            .join(&query.group)
            .join(&query.plural);

        match &query.name {
            Some(name) => push_if_file(&mut found, b_dir.join(format!("{name}.yaml"))),
            None => collect_yaml_files(&mut found, &b_dir),
        }
    }

    found
}

fn cluster_candidates(root: &Path, query: &Query) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let csr_base = root.join("cluster-scoped-resources").join(&query.group);
    let csr_dir = csr_base.join(&query.plural);

    match &query.name {
        Some(name) => push_if_file(&mut found, csr_dir.join(format!("{name}.yaml"))),
        None => {
            push_if_file(&mut found, csr_base.join(format!("{}.yaml", query.plural)));
            collect_yaml_files(&mut found, &csr_dir);
        }
    }
    found
}

fn push_if_file(found: &mut Vec<PathBuf>, candidate: PathBuf) {
    if candidate.is_file() {
        found.push(candidate);
    }
}

/// All `*.yaml` regular files directly inside `dir`, sorted by name.
fn collect_yaml_files(found: &mut Vec<PathBuf>, dir: &Path) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "yaml") && path.is_file())
        .collect();
    files.sort();
    found.extend(files);
}

/// The `<name>/<name>.yaml` layout: one subdirectory per resource.
fn collect_name_subdirs(found: &mut Vec<PathBuf>, dir: &Path) {
    for sub in subdir_names(dir) {
        push_if_file(found, dir.join(&sub).join(format!("{sub}.yaml")));
    }
}

fn subdir_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::discovery::discover_roots;
    use std::fs;
    use tempfile::TempDir;

    fn write(base: &Path, rel: &str, content: &str) {
        let path = base.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn query(group: &str, plural: &str, scope: Scope, name: Option<&str>) -> Query {
        Query {
            group: group.to_string(),
            plural: plural.to_string(),
            scope,
            name: name.map(String::from),
        }
    }

    fn single_root(dir: &TempDir) -> Vec<ArchiveRoot> {
        discover_roots(&[dir.path().to_path_buf()]).unwrap()
    }

    #[test]
    fn direct_pattern_before_aggregated() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "mg/namespaces/ns1/core/pods/p.yaml", "kind: Pod\n");
        write(
            dir.path(),
            "mg/namespaces/all/namespaces/ns1/core/pods/p.yaml",
            "kind: Pod\n",
        );

        let roots = single_root(&dir);
        let q = query("core", "pods", Scope::Namespace("ns1".into()), None);
        let files = find_resource_files(&roots, &q, false);

        assert_eq!(files.len(), 2);
        assert!(files[0].to_string_lossy().contains("/ns1/core/pods/"));
        assert!(files[1].to_string_lossy().contains("/all/namespaces/"));
    }

    #[test]
    fn list_file_precedes_individual_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "mg/namespaces/ns1/apps/deployments.yaml", "kind: DeploymentList\nitems: []\n");
        write(dir.path(), "mg/namespaces/ns1/apps/deployments/a.yaml", "kind: Deployment\n");

        let roots = single_root(&dir);
        let q = query("apps", "deployments", Scope::Namespace("ns1".into()), None);
        let files = find_resource_files(&roots, &q, false);

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("deployments.yaml"));
    }

    #[test]
    fn bare_layout_is_found() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "mg/namespaces/ns1/pods/web/web.yaml", "kind: Pod\n");

        let roots = single_root(&dir);
        let q = query("core", "pods", Scope::Namespace("ns1".into()), Some("web"));
        let files = find_resource_files(&roots, &q, true);

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("web/web.yaml"));
    }

    #[test]
    fn named_query_short_circuits_within_root() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "mg/namespaces/ns1/core/pods/web.yaml", "kind: Pod\n");
        write(
            dir.path(),
            "mg/namespaces/all/namespaces/ns1/core/pods/web.yaml",
            "kind: Pod\n",
        );

        let roots = single_root(&dir);
        let q = query("core", "pods", Scope::Namespace("ns1".into()), Some("web"));
        let files = find_resource_files(&roots, &q, true);
        assert_eq!(files.len(), 1);
        assert!(files[0].to_string_lossy().contains("/ns1/core/pods/"));
    }

    #[test]
    fn all_namespaces_unions_both_layouts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "mg/namespaces/ns1/core/pods/a.yaml", "kind: Pod\n");
        write(
            dir.path(),
            "mg/namespaces/all/namespaces/ns2/core/pods/b.yaml",
            "kind: Pod\n",
        );

        let roots = single_root(&dir);
        assert_eq!(
            enumerate_namespaces(roots[0].path()),
            vec!["ns1".to_string(), "ns2".to_string()]
        );

        let q = query("core", "pods", Scope::AllNamespaces, None);
        let files = find_resource_files(&roots, &q, false);
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn cluster_scope_reads_cluster_scoped_resources() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "mg/cluster-scoped-resources/core/nodes/worker-0.yaml",
            "kind: Node\n",
        );

        let roots = single_root(&dir);
        let q = query("core", "nodes", Scope::Cluster, None);
        let files = find_resource_files(&roots, &q, false);
        assert_eq!(files.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_escape_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "mg/namespaces/ns1/core/pods/good.yaml", "kind: Pod\n");
        let outside = dir.path().join("outside.yaml");
        fs::write(&outside, "kind: Pod\n").unwrap();
        std::os::unix::fs::symlink(
            &outside,
            dir.path().join("mg/namespaces/ns1/core/pods/evil.yaml"),
        )
        .unwrap();

        let roots = single_root(&dir);
        let q = query("core", "pods", Scope::Namespace("ns1".into()), None);
        let files = find_resource_files(&roots, &q, false);

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("good.yaml"));
    }
}
