// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

//! Grows the registry from filesystem evidence.
//!
//! The walker enumerates `(group, plural)` pairs at the three directory
//! patterns archives use; the merge is strictly additive so operator-edited
//! entries (notably aliases) are never touched.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::warn;

use crate::archive::ArchiveRoot;
use crate::error::Result;
use crate::registry::TypeRegistry;

/// Everything one walk over the archive roots evidenced.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Plural -> api_group; the first evidence for a plural wins.
    pub kinds: BTreeMap<String, String>,
    /// Plurals seen under `cluster-scoped-resources/`.
    pub cluster_scoped: BTreeSet<String>,
}

/// What an update run changed, for operator-facing reporting.
#[derive(Debug, Default)]
pub struct UpdateSummary {
    pub roots_scanned: usize,
    pub discovered_kinds: usize,
    pub discovered_cluster_scoped: usize,
    pub added_kinds: Vec<String>,
    pub added_cluster_scoped: Vec<String>,
}

impl UpdateSummary {
    pub fn total_added(&self) -> usize {
        self.added_kinds.len() + self.added_cluster_scoped.len()
    }
}

/// Walk every root and record evidenced `(group, plural)` pairs.
///
/// A pair is evidenced when the plural directory is non-empty or a
/// `<plural>.yaml` list file sits beside it. Cluster-scoped pairs feed both
/// the kind mapping and the cluster-scoped set.
pub fn scan_archives(roots: &[ArchiveRoot]) -> ScanResult {
    let mut result = ScanResult::default();

    for root in roots {
        let ns_base = root.path().join("namespaces");
        for ns in sorted_subdirs(&ns_base) {
            if ns == "all" {
                continue;
            }
            scan_namespace_dir(&ns_base.join(&ns), &mut result.kinds);
        }

        let all_ns_base = ns_base.join("all").join("namespaces");
        for ns in sorted_subdirs(&all_ns_base) {
            scan_namespace_dir(&all_ns_base.join(&ns), &mut result.kinds);
        }

        let csr_base = root.path().join("cluster-scoped-resources");
        for group in sorted_subdirs(&csr_base) {
            let mut found: BTreeMap<String, String> = BTreeMap::new();
            scan_group_dir(&csr_base.join(&group), &group, &mut found);
            for (plural, api_group) in found {
                result.cluster_scoped.insert(plural.clone());
                result.kinds.entry(plural).or_insert(api_group);
            }
        }
    }

    result
}

/// Additively merge scan evidence into the persisted registry.
///
/// New plurals are inserted with empty aliases; known plurals are left
/// untouched (a differing discovered group only produces a diagnostic).
/// The updated files are written via write-then-rename.
pub fn update_types(config_dir: &Path, roots: &[ArchiveRoot]) -> Result<UpdateSummary> {
    let scan = scan_archives(roots);
    let mut registry = TypeRegistry::load(config_dir)?;

    let mut summary = UpdateSummary {
        roots_scanned: roots.len(),
        discovered_kinds: scan.kinds.len(),
        discovered_cluster_scoped: scan.cluster_scoped.len(),
        ..UpdateSummary::default()
    };

    for (plural, api_group) in &scan.kinds {
        if let Some(existing) = registry.kinds().get(plural) {
            if existing.api_group != *api_group {
                warn!(
                    plural,
                    existing = existing.api_group,
                    discovered = api_group,
                    "API group mismatch; keeping existing entry"
                );
            }
            continue;
        }
        if registry.insert_kind(plural, api_group) {
            summary.added_kinds.push(plural.clone());
        } else {
            warn!(plural, "token already taken by an alias; skipping");
        }
    }

    for plural in &scan.cluster_scoped {
        // The cluster-scoped set may only reference mapped plurals.
        if !registry.kinds().contains_key(plural) {
            continue;
        }
        if registry.insert_cluster_scoped(plural) {
            summary.added_cluster_scoped.push(plural.clone());
        }
    }

    registry.store(config_dir)?;
    Ok(summary)
}

/// One `namespaces/<NS>/` directory: children are group dirs, their
/// children (or `<plural>.yaml` list files) are the evidence.
fn scan_namespace_dir(ns_dir: &Path, kinds: &mut BTreeMap<String, String>) {
    for group in sorted_subdirs(ns_dir) {
        let mut found: BTreeMap<String, String> = BTreeMap::new();
        scan_group_dir(&ns_dir.join(&group), &group, &mut found);
        for (plural, api_group) in found {
            kinds.entry(plural).or_insert(api_group);
        }
    }
}

fn scan_group_dir(group_dir: &Path, group: &str, found: &mut BTreeMap<String, String>) {
    let Ok(entries) = std::fs::read_dir(group_dir) else {
        return;
    };
    let mut paths: Vec<_> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            if dir_is_empty(&path) {
                continue;
            }
            if let Some(plural) = path.file_name().and_then(|n| n.to_str()) {
                found.entry(plural.to_string()).or_insert_with(|| group.to_string());
            }
        } else if path.extension().is_some_and(|ext| ext == "yaml") {
            if let Some(plural) = path.file_stem().and_then(|n| n.to_str()) {
                found.entry(plural.to_string()).or_insert_with(|| group.to_string());
            }
        }
    }
}

fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(true)
}

fn sorted_subdirs(dir: &Path) -> Vec<String> {
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
