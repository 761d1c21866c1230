// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

use anyhow::Result;

use crate::archive::discover_roots;
use crate::cli::Args;
use crate::config;
use crate::registry::updater;
use crate::registry::{CLUSTER_SCOPED_FILE, RESOURCE_MAP_FILE};

pub fn run(args: &Args) -> Result<()> {
    let roots = discover_roots(&args.gather_dirs())?;
    let summary = updater::update_types(&config::config_dir()?, &roots)?;

    println!("Scanned {} root(s).", summary.roots_scanned);
    println!("Discovered {} resource type(s).", summary.discovered_kinds);
    println!(
        "Discovered {} cluster-scoped resource type(s).",
        summary.discovered_cluster_scoped
    );
    println!(
        "Added {} new resource type(s) to {RESOURCE_MAP_FILE}{}",
        summary.added_kinds.len(),
        name_list(&summary.added_kinds)
    );
    println!(
        "Added {} new cluster-scoped type(s) to {CLUSTER_SCOPED_FILE}{}",
        summary.added_cluster_scoped.len(),
        name_list(&summary.added_cluster_scoped)
    );
    if summary.total_added() == 0 {
        println!("No new types discovered -- config files are up to date.");
    }
    Ok(())
}

fn name_list(names: &[String]) -> String {
    if names.is_empty() {
        ".".to_string()
    } else {
        format!(": {}.", names.join(", "))
    }
}
