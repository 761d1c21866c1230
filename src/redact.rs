// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

//! Sensitive-field redaction.
//!
//! Records leave the core redacted unless the caller opts out. Three rules
//! apply, in order: every value under a Secret's `data`/`stringData`, the
//! `kubectl.kubernetes.io/last-applied-configuration` annotation (it embeds
//! a full copy of the object, secrets included), and any mapping value at
//! any depth whose key matches a sensitive pattern.

use serde_yaml::Value;

use crate::record::ResourceRecord;

/// The literal substituted for every sensitive value.
pub const REDACTED: &str = "<REDACTED>";

/// Key substrings (checked against the lowercased key) that mark a value
/// as sensitive.
pub const SENSITIVE_KEY_PATTERNS: &[&str] = &[
    "password",
    "token",
    "secret",
    "api_key",
    "apikey",
    "private_key",
    "ssh_key",
    "certificate",
    "credentials",
];

const LAST_APPLIED_CONFIG_KEY: &str = "kubectl.kubernetes.io/last-applied-configuration";

/// Whether records should be redacted before leaving the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Redaction {
    #[default]
    Redacted,
    /// Caller opt-in (`--show-secrets`).
    Raw,
}

/// Return a redacted copy of `record`; the input is never mutated.
/// In [`Redaction::Raw`] mode the record passes through unchanged.
pub fn redact_record(record: &ResourceRecord, mode: Redaction) -> ResourceRecord {
    if mode == Redaction::Raw {
        return record.clone();
    }

    let mut value = record.value().clone();

    if record.kind() == "Secret" {
        redact_secret_data(&mut value);
    }
    redact_last_applied(&mut value);
    redact_sensitive_keys(&mut value);

    ResourceRecord::new(value)
}

fn key_is_sensitive(key: &str) -> bool {
    let lowered = key.to_lowercase();
    SENSITIVE_KEY_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}

fn redacted_value() -> Value {
    Value::String(REDACTED.to_string())
}

/// Replace every value under the top-level `data` and `stringData` maps.
fn redact_secret_data(value: &mut Value) {
    for field in ["data", "stringData"] {
        if let Some(Value::Mapping(map)) = value.get_mut(field) {
            for (_, entry) in map.iter_mut() {
                *entry = redacted_value();
            }
        }
    }
}

fn redact_last_applied(value: &mut Value) {
    let Some(annotations) = value
        .get_mut("metadata")
        .and_then(|m| m.get_mut("annotations"))
    else {
        return;
    };
    if let Value::Mapping(map) = annotations {
        let key = Value::String(LAST_APPLIED_CONFIG_KEY.to_string());
        if map.contains_key(&key) {
            map.insert(key, redacted_value());
        }
    }
}

/// Deep walk replacing values whose mapping key matches a sensitive pattern.
fn redact_sensitive_keys(value: &mut Value) {
    match value {
        Value::Mapping(map) => {
            for (key, entry) in map.iter_mut() {
                let sensitive = key.as_str().is_some_and(key_is_sensitive);
                if sensitive {
                    *entry = redacted_value();
                } else {
                    redact_sensitive_keys(entry);
                }
            }
        }
        Value::Sequence(items) => {
            for item in items.iter_mut() {
                redact_sensitive_keys(item);
            }
        }
        _ => {}
    }
}
