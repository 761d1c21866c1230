// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

//! Discovery of must-gather archive roots.
//!
//! A root is any directory that directly contains `namespaces/` or
//! `cluster-scoped-resources/`. Producers usually place one root per
//! image-hash directory under the directory the operator points us at, and
//! some (e.g. ODF) embed a nested sub-archive one level deeper.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::archive::validate::validate_path;
use crate::error::{Error, Result};

/// One discovered archive root (canonical path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRoot {
    path: PathBuf,
}

impl ArchiveRoot {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ordering key: the root's directory name.
    pub fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for ArchiveRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

fn is_gather_root(dir: &Path) -> bool {
    dir.join("namespaces").is_dir() || dir.join("cluster-scoped-resources").is_dir()
}

fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut subdirs: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    subdirs.sort();
    Ok(subdirs)
}

/// Find all archive roots under the user-supplied directories.
///
/// Immediate children of each directory are checked first; within each root
/// found there, children are checked once more for nested sub-roots that
/// contain `namespaces/`. Recursion stops there. Ordering is user-argument
/// order, then lexicographic child name, nested roots directly after their
/// parent; the first occurrence of a canonical path wins. Fails with
/// [`Error::NoArchive`] when nothing is found.
pub fn discover_roots(directories: &[PathBuf]) -> Result<Vec<ArchiveRoot>> {
    fn push_root(path: &Path, base: &Path, roots: &mut Vec<ArchiveRoot>) {
        match validate_path(path, base) {
            Ok(canonical) => {
                if !roots.iter().any(|r| r.path == canonical) {
                    debug!(root = %canonical.display(), "discovered archive root");
                    roots.push(ArchiveRoot { path: canonical });
                }
            }
            Err(err) => warn!(path = %path.display(), %err, "skipping archive root"),
        }
    }

    let mut roots: Vec<ArchiveRoot> = Vec::new();

    for base_dir in directories {
        if !base_dir.exists() {
            return Err(Error::NotFound(format!(
                "must-gather directory does not exist: {}",
                base_dir.display()
            )));
        }

        for child in sorted_subdirs(base_dir)? {
            if !is_gather_root(&child) {
                continue;
            }
            push_root(&child, base_dir, &mut roots);

            // One level deeper for embedded sub-archives.
            for nested in sorted_subdirs(&child)? {
                if nested.join("namespaces").is_dir() {
                    push_root(&nested, base_dir, &mut roots);
                }
            }
        }
    }

    if roots.is_empty() {
        return Err(Error::NoArchive(directories.to_vec()));
    }
    Ok(roots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn mkdirs(base: &Path, rel: &str) {
        fs::create_dir_all(base.join(rel)).unwrap();
    }

    #[test]
    fn finds_roots_one_level_down() {
        let dir = TempDir::new().unwrap();
        mkdirs(dir.path(), "hash-a/namespaces/ns1");
        mkdirs(dir.path(), "hash-b/cluster-scoped-resources/core");
        mkdirs(dir.path(), "not-a-root/other");

        let roots = discover_roots(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<&str> = roots.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["hash-a", "hash-b"]);
    }

    #[test]
    fn finds_nested_sub_roots() {
        let dir = TempDir::new().unwrap();
        mkdirs(dir.path(), "hash/namespaces/ns1");
        mkdirs(dir.path(), "hash/ceph/namespaces/rook-ceph");

        let roots = discover_roots(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<&str> = roots.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["hash", "ceph"]);
    }

    #[test]
    fn does_not_recurse_past_two_levels() {
        let dir = TempDir::new().unwrap();
        mkdirs(dir.path(), "hash/namespaces/ns1");
        mkdirs(dir.path(), "hash/inner/deeper/namespaces/ns2");

        let roots = discover_roots(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(roots.len(), 1);
    }

    #[test]
    fn preserves_user_argument_order() {
        let dir_a = TempDir::new().unwrap();
        let dir_b = TempDir::new().unwrap();
        mkdirs(dir_a.path(), "zzz/namespaces/ns1");
        mkdirs(dir_b.path(), "aaa/namespaces/ns1");

        let roots = discover_roots(&[dir_a.path().to_path_buf(), dir_b.path().to_path_buf()])
            .unwrap();
        let names: Vec<&str> = roots.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["zzz", "aaa"]);
    }

    #[test]
    fn deduplicates_repeated_directories() {
        let dir = TempDir::new().unwrap();
        mkdirs(dir.path(), "hash/namespaces/ns1");

        let roots =
            discover_roots(&[dir.path().to_path_buf(), dir.path().to_path_buf()]).unwrap();
        assert_eq!(roots.len(), 1);
    }

    #[test]
    fn no_roots_is_an_error() {
        let dir = TempDir::new().unwrap();
        mkdirs(dir.path(), "just-files");

        let err = discover_roots(&[dir.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, Error::NoArchive(_)));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = discover_roots(&[missing]).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
