// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

//! `oc describe`-style key/value rendering of a single record.
//!
//! Keys at one level are aligned to a shared column; nested mappings indent
//! by two spaces; sequence items align under the first value. Nulls and
//! empty sequences render as `<none>`.

use serde_yaml::Value;

use crate::record::ResourceRecord;

pub fn render_describe(record: &ResourceRecord) -> String {
    match record.value() {
        Value::Mapping(map) => {
            let mut lines = Vec::new();
            render_mapping(map, 0, &mut lines);
            lines.join("\n")
        }
        other => scalar_text(other),
    }
}

fn render_mapping(map: &serde_yaml::Mapping, indent: usize, lines: &mut Vec<String>) {
    let prefix = " ".repeat(indent);

    // Align scalar values at this level: two spaces past the widest key.
    let value_column = map
        .iter()
        .filter(|(_, value)| is_scalar(value))
        .map(|(key, _)| key_text(key).len() + 1)
        .max()
        .unwrap_or(0)
        + 2;

    for (key, value) in map {
        let key = key_text(key);
        match value {
            Value::Mapping(nested) if !nested.is_empty() => {
                lines.push(format!("{prefix}{key}:"));
                render_mapping(nested, indent + 2, lines);
            }
            Value::Mapping(_) => lines.push(format!("{prefix}{key}:")),
            Value::Sequence(items) => render_sequence(&key, items, indent, lines),
            scalar => {
                let padding = " ".repeat(value_column.saturating_sub(key.len() + 1).max(2));
                lines.push(format!("{prefix}{key}:{padding}{}", scalar_text(scalar)));
            }
        }
    }
}

fn render_sequence(key: &str, items: &[Value], indent: usize, lines: &mut Vec<String>) {
    let prefix = " ".repeat(indent);
    if items.is_empty() {
        lines.push(format!("{prefix}{key}:  <none>"));
        return;
    }

    let align = " ".repeat(indent + key.len() + 3);
    let mut first = true;
    for item in items {
        match item {
            Value::Mapping(map) => {
                if first {
                    lines.push(format!("{prefix}{key}:"));
                }
                render_mapping(map, indent + 2, lines);
            }
            scalar => {
                if first {
                    lines.push(format!("{prefix}{key}:  {}", scalar_text(scalar)));
                } else {
                    lines.push(format!("{align}{}", scalar_text(scalar)));
                }
            }
        }
        first = false;
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Mapping(_) | Value::Sequence(_))
}

fn key_text(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => scalar_text(other),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => "<none>".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .unwrap_or_default()
            .trim_end()
            .to_string(),
    }
}
