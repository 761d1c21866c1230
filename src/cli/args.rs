// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "must-oc")]
#[command(author, version, about = "oc-like read-only CLI for must-gather archives")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a must-gather directory (repeatable, defaults to the current directory)
    #[arg(short = 'd', long = "must-gather-dir", value_name = "DIR", global = true)]
    pub must_gather_dir: Vec<PathBuf>,

    /// Disable sensitive data redaction
    #[arg(long, global = true)]
    pub show_secrets: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Args {
    /// The archive directories to search; `-d` defaults to `.`.
    pub fn gather_dirs(&self) -> Vec<PathBuf> {
        if self.must_gather_dir.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.must_gather_dir.clone()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List resources
    Get {
        /// Resource type (e.g. pod, deployment)
        resource_type: String,

        /// Specific resource name
        name: Option<String>,

        /// Namespace
        #[arg(short, long)]
        namespace: Option<String>,

        /// All namespaces
        #[arg(short = 'A', long)]
        all_namespaces: bool,

        /// Label selector (e.g. app=web,tier!=cache)
        #[arg(short = 'l', long = "selector", value_name = "SELECTOR")]
        selector: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Show the full detail of one resource
    Describe {
        /// Resource type (e.g. pod, deployment)
        resource_type: String,

        /// Resource name
        name: String,

        /// Namespace
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Print container logs for a pod
    Logs {
        /// Pod name
        pod_name: String,

        /// Namespace
        #[arg(short, long)]
        namespace: String,

        /// Container name
        #[arg(short, long)]
        container: Option<String>,

        /// Read previous.log instead of current.log
        #[arg(long)]
        previous: bool,
    },

    /// Scan archives and grow the resource-type registry
    UpdateTypes,
}

#[derive(ValueEnum, Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}
