// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

use anyhow::{bail, Result};

use crate::archive::discover_roots;
use crate::cli::{Args, OutputFormat};
use crate::config::{self, Limits};
use crate::output::render_records;
use crate::query::{Query, QueryEngine, Scope};
use crate::registry::TypeRegistry;
use crate::selector;

#[allow(clippy::too_many_arguments)]
pub fn run(
    args: &Args,
    resource_type: &str,
    name: Option<&str>,
    namespace: Option<&str>,
    all_namespaces: bool,
    selector_str: Option<&str>,
    output: &OutputFormat,
) -> Result<()> {
    let registry = TypeRegistry::load(&config::config_dir()?)?;
    let (group, plural) = registry.resolve(resource_type)?;

    let scope = if registry.is_cluster_scoped(&plural) {
        Scope::Cluster
    } else if all_namespaces {
        Scope::AllNamespaces
    } else if let Some(ns) = namespace {
        Scope::Namespace(ns.to_string())
    } else {
        bail!("must specify -n <namespace> or -A");
    };

    let query = Query {
        group,
        plural,
        scope,
        name: name.map(String::from),
    };

    let roots = discover_roots(&args.gather_dirs())?;
    let engine = QueryEngine::new(&roots, Limits::from_env());
    let parsed_selector = selector::parse(selector_str.unwrap_or_default())?;
    let records = engine.list(&query, &parsed_selector, super::redaction(args))?;

    if records.is_empty() {
        match namespace {
            Some(ns) if !all_namespaces => println!("No resources found in namespace {ns}."),
            _ => println!("No resources found."),
        }
        return Ok(());
    }

    println!("{}", render_records(&records, output, all_namespaces));
    Ok(())
}
