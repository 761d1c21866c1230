// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

//! The read pipeline: resolve candidate files, parse, deduplicate, filter,
//! redact.
//!
//! Per-file problems (escapes, parse errors, unsafe tags, oversized files)
//! are warnings during `list` and the operation continues; for `get` they
//! terminate the operation, matching how operators use the two commands.

use std::collections::HashSet;

use tracing::warn;

use crate::archive::{find_resource_files, ArchiveRoot};
use crate::config::Limits;
use crate::error::{Error, Result};
use crate::reader::load_records;
use crate::record::{Identity, ResourceRecord};
use crate::redact::{redact_record, Redaction};
use crate::selector::{self, Selector};

/// The namespace dimension of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Namespace(String),
    AllNamespaces,
    Cluster,
}

/// A resolved read query, produced by the front end via the Type Registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub group: String,
    pub plural: String,
    pub scope: Scope,
    pub name: Option<String>,
}

/// Executes read queries against a fixed set of archive roots.
pub struct QueryEngine<'a> {
    roots: &'a [ArchiveRoot],
    limits: Limits,
}

impl<'a> QueryEngine<'a> {
    pub fn new(roots: &'a [ArchiveRoot], limits: Limits) -> Self {
        Self { roots, limits }
    }

    /// All records matching the query and selector, deduplicated on
    /// `(namespace, kind, name)` keeping the first occurrence in resolver
    /// order, then redacted per `mode`.
    pub fn list(
        &self,
        query: &Query,
        selector: &Selector,
        mode: Redaction,
    ) -> Result<Vec<ResourceRecord>> {
        let files = find_resource_files(self.roots, query, false);

        let mut records: Vec<ResourceRecord> = Vec::new();
        for file in &files {
            match load_records(file, &self.limits) {
                Ok(loaded) => records.extend(loaded),
                Err(err) if err.is_per_file() => {
                    warn!(path = %file.display(), %err, "skipping file");
                }
                Err(err) => return Err(err),
            }
        }

        // Dedup before the selector so precedence decides which content
        // represents an identity, not the filter.
        let mut seen: HashSet<Identity> = HashSet::new();
        records.retain(|record| seen.insert(record.identity()));

        records.retain(|record| selector::matches(&record.labels(), selector));

        Ok(records
            .iter()
            .map(|record| redact_record(record, mode))
            .collect())
    }

    /// The single named record, or `NotFound`.
    pub fn get(&self, query: &Query, mode: Redaction) -> Result<ResourceRecord> {
        let name = query.name.as_deref().unwrap_or_default();
        debug_assert!(!name.is_empty(), "get requires a named query");

        let files = find_resource_files(self.roots, query, true);
        let Some(file) = files.first() else {
            return Err(Error::NotFound(not_found_message(query, name)));
        };

        let records = load_records(file, &self.limits)?;
        let record = records
            .into_iter()
            .find(|record| record.name() == name)
            .ok_or_else(|| Error::NotFound(not_found_message(query, name)))?;

        Ok(redact_record(&record, mode))
    }
}

fn not_found_message(query: &Query, name: &str) -> String {
    match &query.scope {
        Scope::Namespace(ns) => {
            format!("{} {:?} not found in namespace {:?}", query.plural, name, ns)
        }
        _ => format!("{} {:?} not found", query.plural, name),
    }
}
