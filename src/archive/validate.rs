// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

//! Path confinement for untrusted archive trees.
//!
//! Must-gather archives come from other clusters and may contain hostile
//! symlinks or `..` segments. Every file any component opens goes through
//! [`validate_path`] first: the candidate is canonicalized (symlinks
//! resolved) and must remain a descendant of the canonicalized root.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Canonicalize `path` and prove it stays inside `root`.
///
/// Returns the canonical path on success. Fails with [`Error::PathEscape`]
/// when the resolved path leaves the root, and with [`Error::NotFound`] when
/// the path is confined but its leaf does not exist. Callers rely on the
/// distinction: escapes are skipped with a warning, missing leaves are
/// ordinary lookup misses.
pub fn validate_path(path: &Path, root: &Path) -> Result<PathBuf> {
    let root = root.canonicalize()?;

    match path.canonicalize() {
        Ok(resolved) => {
            if resolved.starts_with(&root) {
                Ok(resolved)
            } else {
                Err(Error::PathEscape {
                    path: path.to_path_buf(),
                })
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            // Resolve as far as possible so an escape through a symlinked
            // parent directory is still caught before reporting NotFound.
            let resolved = resolve_existing_prefix(path)?;
            if resolved.starts_with(&root) {
                Err(Error::NotFound(format!(
                    "no such file: {}",
                    path.display()
                )))
            } else {
                Err(Error::PathEscape {
                    path: path.to_path_buf(),
                })
            }
        }
        Err(err) => Err(err.into()),
    }
}

/// Canonicalize the deepest existing ancestor of `path` and re-append the
/// remaining components, folding `.` and `..` lexically.
fn resolve_existing_prefix(path: &Path) -> Result<PathBuf> {
    let mut existing = path.to_path_buf();
    let mut remainder: Vec<std::ffi::OsString> = Vec::new();

    loop {
        match existing.canonicalize() {
            Ok(resolved) => {
                let mut result = resolved;
                for component in remainder.iter().rev() {
                    push_lexical(&mut result, Path::new(component));
                }
                return Ok(result);
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let Some(name) = existing.file_name().map(|n| n.to_os_string()) else {
                    return Err(err.into());
                };
                remainder.push(name);
                if !existing.pop() {
                    return Err(err.into());
                }
            }
            Err(err) => return Err(err.into()),
        }
    }
}

fn push_lexical(base: &mut PathBuf, component: &Path) {
    for part in component.components() {
        match part {
            Component::CurDir => {}
            Component::ParentDir => {
                base.pop();
            }
            other => base.push(other),
        }
    }
}
