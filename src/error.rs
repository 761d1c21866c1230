// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the must-gather query core.

use std::path::PathBuf;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the must-gather query core.
///
/// Variants fall into four tiers: user errors (`UnknownKind`, `BadSelector`,
/// `NoArchive`, `AmbiguousContainer`), per-file skips (`PathEscape`,
/// `ParseError`, `UnsafeYaml`, `TooLarge` during list), operation failures
/// (`NotFound`, `TooLarge` for get/logs), and configuration failures
/// (`ConfigConflict`, `ConfigCorrupt`). Callers decide the disposition; the
/// core only classifies.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Resource token is neither a known plural nor a registered alias.
    #[error(
        "unknown resource type: {0:?}. \
         Use 'must-oc update-types' to discover resource types from a must-gather directory"
    )]
    UnknownKind(String),

    /// No must-gather root was found under any of the supplied directories.
    #[error("no must-gather archive found under: {}", format_paths(.0))]
    NoArchive(Vec<PathBuf>),

    /// A candidate path resolves outside its archive root.
    #[error("path escapes must-gather root: {}", .path.display())]
    PathEscape { path: PathBuf },

    /// The requested resource, pod, container, or log file does not exist.
    #[error("{0}")]
    NotFound(String),

    /// File exceeds the configured size ceiling.
    #[error(
        "{} is {} bytes, exceeding the maximum allowed size of {} bytes",
        .path.display(), .size, .limit
    )]
    TooLarge {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    /// Document contains YAML tags that could denote host-language objects.
    #[error("refusing to use {}: unsafe YAML tag {:?}", .path.display(), .tag)]
    UnsafeYaml { path: PathBuf, tag: String },

    /// Document is not valid YAML or not the expected shape.
    #[error(
        "failed to parse {}{}: {}",
        .path.display(), format_location(.line, .column), .message
    )]
    ParseError {
        path: PathBuf,
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },

    /// Pod has several containers and none was selected.
    #[error(
        "pod {:?} has multiple containers. Use -c to specify one of: [{}]",
        .pod, .containers.join(", ")
    )]
    AmbiguousContainer { pod: String, containers: Vec<String> },

    /// Label selector does not fit the supported grammar.
    #[error("invalid label selector: {0}")]
    BadSelector(String),

    /// Registry files contradict each other or themselves.
    #[error("registry conflict: {0}")]
    ConfigConflict(String),

    /// Registry file exists but cannot be understood.
    #[error("corrupt registry file {}: {}", .path.display(), .message)]
    ConfigCorrupt { path: PathBuf, message: String },

    /// Underlying filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors that `list` treats as per-file skips rather than
    /// terminating the whole operation.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Error::PathEscape { .. }
                | Error::ParseError { .. }
                | Error::UnsafeYaml { .. }
                | Error::TooLarge { .. }
        )
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_location(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(l), Some(c)) => format!(" at line {l} column {c}"),
        (Some(l), None) => format!(" at line {l}"),
        _ => String::new(),
    }
}
