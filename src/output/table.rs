// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

//! `oc get`-style tabular rendering.
//!
//! Pods get the familiar READY/STATUS/RESTARTS columns derived from
//! `status.containerStatuses`; every other kind falls back to NAME and AGE.

use chrono::{DateTime, Utc};
use comfy_table::{presets::NOTHING, Table};
use serde_yaml::Value;

use crate::record::ResourceRecord;

/// Render records as a left-aligned, two-space separated table with
/// upper-case headers.
pub fn render_table(records: &[ResourceRecord], with_namespace: bool) -> String {
    let is_pod = records.iter().all(|r| r.kind() == "Pod") && !records.is_empty();

    let mut headers: Vec<&str> = Vec::new();
    if with_namespace {
        headers.push("NAMESPACE");
    }
    if is_pod {
        headers.extend(["NAME", "READY", "STATUS", "RESTARTS", "AGE"]);
    } else {
        headers.extend(["NAME", "AGE"]);
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(headers);

    for record in records {
        let mut row: Vec<String> = Vec::new();
        if with_namespace {
            row.push(record.namespace().to_string());
        }
        row.push(record.name().to_string());
        if is_pod {
            row.push(pod_ready(record));
            row.push(pod_status(record));
            row.push(pod_restarts(record));
        }
        row.push(format_age(record.creation_timestamp()));
        table.add_row(row);
    }

    for column in table.column_iter_mut() {
        column.set_padding((0, 2));
    }

    table.to_string()
}

fn container_statuses(record: &ResourceRecord) -> Vec<Value> {
    match record.pointer(&["status", "containerStatuses"]) {
        Some(Value::Sequence(items)) => items.clone(),
        _ => Vec::new(),
    }
}

/// READY column: `ready/total` container counts.
fn pod_ready(record: &ResourceRecord) -> String {
    let statuses = container_statuses(record);
    let ready = statuses
        .iter()
        .filter(|ctr| ctr.get("ready").and_then(Value::as_bool).unwrap_or(false))
        .count();
    format!("{ready}/{}", statuses.len())
}

fn pod_status(record: &ResourceRecord) -> String {
    record
        .pointer(&["status", "phase"])
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string()
}

/// RESTARTS column: summed `restartCount` across containers.
fn pod_restarts(record: &ResourceRecord) -> String {
    let total: u64 = container_statuses(record)
        .iter()
        .filter_map(|ctr| ctr.get("restartCount").and_then(Value::as_u64))
        .sum();
    total.to_string()
}

/// Relative age in the largest whole unit (`5d`, `3h`, `2m`, `10s`);
/// `<unknown>` when the timestamp is absent or unparsable.
pub fn format_age(timestamp: &str) -> String {
    if timestamp.is_empty() {
        return "<unknown>".to_string();
    }
    let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) else {
        return "<unknown>".to_string();
    };

    let seconds = (Utc::now() - parsed.with_timezone(&Utc)).num_seconds().max(0);
    let days = seconds / 86_400;
    if days > 0 {
        return format!("{days}d");
    }
    let hours = seconds / 3_600;
    if hours > 0 {
        return format!("{hours}h");
    }
    let minutes = seconds / 60;
    if minutes > 0 {
        return format!("{minutes}m");
    }
    format!("{seconds}s")
}
