// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

//! Size-bounded, safe YAML loading with list-file flattening.
//!
//! Files come from an untrusted archive, so three defenses run before any
//! document is used: the size ceiling is checked against file metadata
//! before the file is opened, parsing goes through `serde_yaml` (which never
//! instantiates host-language objects), and any YAML tag that survives the
//! parse is rejected outright since Kubernetes documents are tag-free.

use std::path::Path;

use serde_yaml::Value;

use crate::config::Limits;
use crate::error::{Error, Result};
use crate::record::ResourceRecord;

/// Load all records from one archive file.
///
/// A single document yields one record. A document whose `kind` ends in
/// `List` yields its `items`, with `kind` backfilled from the list kind
/// when missing. Empty files yield no records.
pub fn load_records(path: &Path, limits: &Limits) -> Result<Vec<ResourceRecord>> {
    check_file_size(path, limits)?;

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_yaml::from_str(&content).map_err(|err| parse_error(path, &err))?;
    reject_tags(path, &value)?;

    if value.is_null() {
        return Ok(Vec::new());
    }
    if !value.is_mapping() {
        return Err(Error::ParseError {
            path: path.to_path_buf(),
            line: None,
            column: None,
            message: format!("expected a YAML mapping, got {}", value_kind(&value)),
        });
    }

    let kind = value
        .get("kind")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    if let Some(item_kind) = kind.strip_suffix("List") {
        return flatten_list(path, value, item_kind);
    }

    Ok(vec![ResourceRecord::new(value)])
}

fn flatten_list(path: &Path, value: Value, item_kind: &str) -> Result<Vec<ResourceRecord>> {
    let items = match value.get("items") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Sequence(items)) => items.clone(),
        Some(other) => {
            return Err(Error::ParseError {
                path: path.to_path_buf(),
                line: None,
                column: None,
                message: format!("expected 'items' to be a sequence, got {}", value_kind(other)),
            })
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        let Value::Mapping(mut map) = item else {
            return Err(Error::ParseError {
                path: path.to_path_buf(),
                line: None,
                column: None,
                message: "expected list items to be mappings".to_string(),
            });
        };
        if !item_kind.is_empty() && map.get("kind").is_none() {
            map.insert(
                Value::String("kind".to_string()),
                Value::String(item_kind.to_string()),
            );
        }
        records.push(ResourceRecord::new(Value::Mapping(map)));
    }
    Ok(records)
}

/// Fail with [`Error::TooLarge`] before the file is ever opened.
pub fn check_file_size(path: &Path, limits: &Limits) -> Result<()> {
    let size = std::fs::metadata(path)?.len();
    if size > limits.max_yaml_bytes {
        return Err(Error::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: limits.max_yaml_bytes,
        });
    }
    Ok(())
}

/// Kubernetes documents never carry YAML tags; anything tagged is treated
/// as a potential host-object construction and refused.
fn reject_tags(path: &Path, value: &Value) -> Result<()> {
    match value {
        Value::Tagged(tagged) => Err(Error::UnsafeYaml {
            path: path.to_path_buf(),
            tag: tagged.tag.to_string(),
        }),
        Value::Sequence(items) => items.iter().try_for_each(|item| reject_tags(path, item)),
        Value::Mapping(map) => map.iter().try_for_each(|(key, val)| {
            reject_tags(path, key)?;
            reject_tags(path, val)
        }),
        _ => Ok(()),
    }
}

fn parse_error(path: &Path, err: &serde_yaml::Error) -> Error {
    let location = err.location();
    Error::ParseError {
        path: path.to_path_buf(),
        line: location.as_ref().map(|l| l.line()),
        column: location.as_ref().map(|l| l.column()),
        message: err.to_string(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
