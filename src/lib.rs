// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

//! # must-oc
//!
//! Offline, read-only querying of Kubernetes/OpenShift must-gather
//! archives: list resources, describe them, and stream container logs as
//! if the archive were a live cluster.
//!
//! The interesting part is not the command surface but the archive model
//! underneath it: discovery of archive roots (including nested
//! sub-archives), resolution of resource types to the several filesystem
//! layouts producers use, deduplication across layouts and archives, and a
//! safe-read layer (path confinement, size-bounded parsing and streaming,
//! sensitive-field redaction) for trees that must be treated as untrusted.
//!
//! Resource types are data-driven: a persisted registry maps user tokens
//! (`deploy`, `po`, ...) to `(api_group, plural)` pairs and records which
//! plurals are cluster-scoped. `update-types` grows the registry from
//! filesystem evidence, strictly additively, so hand-edited aliases are
//! never lost.

pub mod archive;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logs;
pub mod output;
pub mod query;
pub mod reader;
pub mod record;
pub mod redact;
pub mod registry;
pub mod selector;

pub use error::{Error, Result};
pub use query::{Query, QueryEngine, Scope};
pub use record::ResourceRecord;
pub use redact::Redaction;
pub use registry::TypeRegistry;
