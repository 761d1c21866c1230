// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

//! In-memory form of a parsed Kubernetes resource document.
//!
//! All kinds share one record shape: an owned YAML value tree plus typed
//! accessors for the metadata fields the pipeline cares about. Kind-specific
//! interpretation lives in the renderers, not here.

use std::collections::BTreeMap;

use serde_yaml::Value;

/// Deduplication identity: `(namespace, kind, name)`.
///
/// `namespace` is the empty string for cluster-scoped kinds.
pub type Identity = (String, String, String);

/// One parsed resource document.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRecord {
    value: Value,
}

impl ResourceRecord {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// The full value tree, for rendering and serialization.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn kind(&self) -> &str {
        self.top_level_str("kind")
    }

    pub fn api_version(&self) -> &str {
        self.top_level_str("apiVersion")
    }

    pub fn name(&self) -> &str {
        self.metadata_str("name")
    }

    pub fn namespace(&self) -> &str {
        self.metadata_str("namespace")
    }

    pub fn creation_timestamp(&self) -> &str {
        self.metadata_str("creationTimestamp")
    }

    /// `metadata.labels` as a string map; non-string entries are skipped.
    pub fn labels(&self) -> BTreeMap<String, String> {
        let mut labels = BTreeMap::new();
        if let Some(Value::Mapping(map)) = self.metadata().and_then(|m| m.get("labels")) {
            for (key, value) in map {
                if let (Value::String(k), Value::String(v)) = (key, value) {
                    labels.insert(k.clone(), v.clone());
                }
            }
        }
        labels
    }

    /// Identity key used by the deduplicator.
    pub fn identity(&self) -> Identity {
        (
            self.namespace().to_string(),
            self.kind().to_string(),
            self.name().to_string(),
        )
    }

    /// Navigate a dotted path of mapping keys, e.g. `status.phase`.
    pub fn pointer(&self, path: &[&str]) -> Option<&Value> {
        let mut current = &self.value;
        for segment in path {
            current = current.get(segment)?;
        }
        Some(current)
    }

    fn metadata(&self) -> Option<&Value> {
        self.value.get("metadata")
    }

    fn metadata_str(&self, key: &str) -> &str {
        self.metadata()
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    fn top_level_str(&self, key: &str) -> &str {
        self.value.get(key).and_then(Value::as_str).unwrap_or("")
    }
}
