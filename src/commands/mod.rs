// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

//! Subcommand orchestration: each submodule wires the CLI surface to the
//! core pipeline and prints the result.

pub mod describe;
pub mod get;
pub mod logs;
pub mod update_types;

use anyhow::Result;

use crate::cli::{Args, Command};
use crate::redact::Redaction;

pub fn run(args: &Args) -> Result<()> {
    match &args.command {
        Command::Get {
            resource_type,
            name,
            namespace,
            all_namespaces,
            selector,
            output,
        } => get::run(
            args,
            resource_type,
            name.as_deref(),
            namespace.as_deref(),
            *all_namespaces,
            selector.as_deref(),
            output,
        ),
        Command::Describe {
            resource_type,
            name,
            namespace,
        } => describe::run(args, resource_type, name, namespace.as_deref()),
        Command::Logs {
            pod_name,
            namespace,
            container,
            previous,
        } => logs::run(args, pod_name, namespace, container.as_deref(), *previous),
        Command::UpdateTypes => update_types::run(args),
    }
}

fn redaction(args: &Args) -> Redaction {
    if args.show_secrets {
        Redaction::Raw
    } else {
        Redaction::Redacted
    }
}
