// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

//! The persisted resource-type registry.
//!
//! Maps user-facing tokens (plurals and aliases, e.g. `deploy`, `po`) to
//! `(api_group, plural)` pairs and tracks which plurals are cluster-scoped.
//! The registry is data-driven: two YAML files in the config directory,
//! loaded once at startup and treated as immutable by readers. Only
//! `update-types` writes them back, strictly additively, so hand-edited
//! aliases survive every update.

pub mod updater;

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File holding the `plural -> {api_group, aliases}` mapping.
pub const RESOURCE_MAP_FILE: &str = "resource_map.yaml";

/// File holding the ordered sequence of cluster-scoped plurals.
pub const CLUSTER_SCOPED_FILE: &str = "cluster_scoped.yaml";

/// Plurals whose Kind does not follow from stripping a trailing `s`/`es`.
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("dnses", "DNS"),
    ("endpoints", "Endpoints"),
    ("ingresses", "Ingress"),
    ("networkpolicies", "NetworkPolicy"),
    ("podsecuritypolicies", "PodSecurityPolicy"),
    ("policies", "Policy"),
    ("proxies", "Proxy"),
    ("securitycontextconstraints", "SecurityContextConstraints"),
    ("statuses", "Status"),
];

/// One registry record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindEntry {
    pub api_group: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// The loaded registry.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    /// Plural -> entry, sorted so writes diff cleanly.
    kinds: BTreeMap<String, KindEntry>,
    /// Cluster-scoped plurals in file (append) order.
    cluster_scoped: Vec<String>,
    /// Token -> (api_group, plural) lookup over plurals and aliases.
    lookup: HashMap<String, (String, String)>,
}

impl TypeRegistry {
    /// Load both registry files from `dir`.
    ///
    /// Missing files are treated as empty (bootstrap). Malformed files fail
    /// with [`Error::ConfigCorrupt`]; alias collisions fail with
    /// [`Error::ConfigConflict`]; a cluster-scoped plural absent from the
    /// mapping fails with [`Error::ConfigCorrupt`].
    pub fn load(dir: &Path) -> Result<Self> {
        let kinds: BTreeMap<String, KindEntry> = load_registry_file(&dir.join(RESOURCE_MAP_FILE))?;
        let cluster_path = dir.join(CLUSTER_SCOPED_FILE);
        let cluster_scoped: Vec<String> = load_registry_file(&cluster_path)?;

        for plural in &cluster_scoped {
            if !kinds.contains_key(plural) {
                return Err(Error::ConfigCorrupt {
                    path: cluster_path,
                    message: format!(
                        "cluster-scoped plural {plural:?} is missing from {RESOURCE_MAP_FILE}"
                    ),
                });
            }
        }

        let lookup = build_lookup(&kinds)?;
        Ok(Self {
            kinds,
            cluster_scoped,
            lookup,
        })
    }

    /// Resolve a user token (plural or alias, case-insensitive) to its
    /// `(api_group, plural)` pair.
    pub fn resolve(&self, token: &str) -> Result<(String, String)> {
        self.lookup
            .get(&token.to_lowercase())
            .cloned()
            .ok_or_else(|| Error::UnknownKind(token.to_string()))
    }

    pub fn is_cluster_scoped(&self, plural: &str) -> bool {
        self.cluster_scoped.iter().any(|p| p == plural)
    }

    /// PascalCase Kind for a plural, for display and deduplication.
    ///
    /// Consults the irregular table first; otherwise applies a stripping
    /// heuristic which may be slightly wrong for unknown irregulars (a
    /// display-only defect).
    pub fn kind_of(&self, plural: &str) -> String {
        kind_from_plural(plural)
    }

    pub fn kinds(&self) -> &BTreeMap<String, KindEntry> {
        &self.kinds
    }

    pub fn cluster_scoped(&self) -> &[String] {
        &self.cluster_scoped
    }

    /// Insert a newly discovered kind with no aliases.
    ///
    /// Returns false (and changes nothing) when the plural is already
    /// registered or its token is taken by an alias; existing entries are
    /// never modified.
    pub fn insert_kind(&mut self, plural: &str, api_group: &str) -> bool {
        if self.kinds.contains_key(plural) || self.lookup.contains_key(plural) {
            return false;
        }
        self.kinds.insert(
            plural.to_string(),
            KindEntry {
                api_group: api_group.to_string(),
                aliases: Vec::new(),
            },
        );
        self.lookup.insert(
            plural.to_string(),
            (api_group.to_string(), plural.to_string()),
        );
        true
    }

    /// Append a plural to the cluster-scoped set if absent.
    pub fn insert_cluster_scoped(&mut self, plural: &str) -> bool {
        if self.is_cluster_scoped(plural) {
            return false;
        }
        self.cluster_scoped.push(plural.to_string());
        true
    }

    /// Persist both registry files into `dir` via write-then-rename.
    pub fn store(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;

        let map_header = format!(
            "# {RESOURCE_MAP_FILE}\n\
             # Maps resource plural names to API groups and user-facing aliases.\n\
             # Updated by: must-oc update-types -d <must-gather-dir>\n\
             # Manual edits are safe -- update-types only adds, never removes.\n\n"
        );
        let map_body = serde_yaml::to_string(&self.kinds).map_err(|err| Error::ConfigCorrupt {
            path: dir.join(RESOURCE_MAP_FILE),
            message: err.to_string(),
        })?;
        write_atomic(&dir.join(RESOURCE_MAP_FILE), &(map_header + &map_body))?;

        let cluster_header = format!(
            "# {CLUSTER_SCOPED_FILE}\n\
             # Resource types found under cluster-scoped-resources/ rather than namespaces/.\n\
             # Updated by: must-oc update-types -d <must-gather-dir>\n\
             # Manual edits are safe -- update-types only adds, never removes.\n\n"
        );
        let cluster_body =
            serde_yaml::to_string(&self.cluster_scoped).map_err(|err| Error::ConfigCorrupt {
                path: dir.join(CLUSTER_SCOPED_FILE),
                message: err.to_string(),
            })?;
        write_atomic(&dir.join(CLUSTER_SCOPED_FILE), &(cluster_header + &cluster_body))
    }
}

/// Read one registry file. Missing or empty (including comment-only) files
/// deserialize to the default; anything malformed is `ConfigCorrupt`.
fn load_registry_file<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(err) => return Err(err.into()),
    };
    let parsed: Option<T> =
        serde_yaml::from_str(&content).map_err(|err| Error::ConfigCorrupt {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    Ok(parsed.unwrap_or_default())
}

fn build_lookup(kinds: &BTreeMap<String, KindEntry>) -> Result<HashMap<String, (String, String)>> {
    let mut lookup: HashMap<String, (String, String)> = HashMap::new();

    for (plural, entry) in kinds {
        lookup.insert(plural.clone(), (entry.api_group.clone(), plural.clone()));
    }
    for (plural, entry) in kinds {
        for alias in &entry.aliases {
            let target = (entry.api_group.clone(), plural.clone());
            if let Some(existing) = lookup.get(alias) {
                if *existing != target {
                    return Err(Error::ConfigConflict(format!(
                        "alias {alias:?} of {plural:?} already resolves to {:?}",
                        existing.1
                    )));
                }
                continue;
            }
            lookup.insert(alias.clone(), target);
        }
    }
    Ok(lookup)
}

fn kind_from_plural(plural: &str) -> String {
    if let Some((_, kind)) = IRREGULAR_PLURALS.iter().find(|(p, _)| *p == plural) {
        return (*kind).to_string();
    }

    let singular = if let Some(stem) = plural.strip_suffix("ies") {
        format!("{stem}y")
    } else if ends_with_sibilant_es(plural) {
        plural[..plural.len() - 2].to_string()
    } else if let Some(stem) = plural.strip_suffix('s') {
        stem.to_string()
    } else {
        plural.to_string()
    };

    let mut chars = singular.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => plural.to_string(),
    }
}

fn ends_with_sibilant_es(plural: &str) -> bool {
    ["ses", "xes", "zes", "ches", "shes"]
        .iter()
        .any(|suffix| plural.ends_with(suffix))
}

/// Write-then-rename with 0o644 permissions; the temp file lives next to
/// the target so the rename stays on one filesystem and a crash can never
/// leave a truncated file in place.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension("yaml.tmp");

    let mut file = std::fs::File::create(&tmp)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    drop(file);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o644))?;
    }

    std::fs::rename(&tmp, path).map_err(|err| {
        let _ = std::fs::remove_file(&tmp);
        err.into()
    })
}
