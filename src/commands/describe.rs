// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

use anyhow::{bail, Result};

use crate::archive::discover_roots;
use crate::cli::Args;
use crate::config::{self, Limits};
use crate::output::render_describe;
use crate::query::{Query, QueryEngine, Scope};
use crate::registry::TypeRegistry;

pub fn run(args: &Args, resource_type: &str, name: &str, namespace: Option<&str>) -> Result<()> {
    let registry = TypeRegistry::load(&config::config_dir()?)?;
    let (group, plural) = registry.resolve(resource_type)?;

    let scope = if registry.is_cluster_scoped(&plural) {
        Scope::Cluster
    } else if let Some(ns) = namespace {
        Scope::Namespace(ns.to_string())
    } else {
        bail!("must specify -n <namespace> for describe");
    };

    let query = Query {
        group,
        plural,
        scope,
        name: Some(name.to_string()),
    };

    let roots = discover_roots(&args.gather_dirs())?;
    let engine = QueryEngine::new(&roots, Limits::from_env());
    let record = engine.get(&query, super::redaction(args))?;

    println!("{}", render_describe(&record));
    Ok(())
}
