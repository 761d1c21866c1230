// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

//! Configuration directory resolution and size limits.
//!
//! The registry files live in a per-user configuration directory:
//! `$MUST_OC_CONFIG_DIR` when set, otherwise the XDG config directory
//! (`~/.config/must-oc/`), otherwise `~/.must-oc/`.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Default ceiling for YAML files, checked before they are opened.
pub const MAX_YAML_BYTES: u64 = 100 * 1024 * 1024;

/// Default ceiling for streamed log output, before the truncation notice.
pub const MAX_LOG_BYTES: u64 = 100 * 1024 * 1024;

/// Size ceilings applied by the reader and the log streamer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_yaml_bytes: u64,
    pub max_log_bytes: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_yaml_bytes: MAX_YAML_BYTES,
            max_log_bytes: MAX_LOG_BYTES,
        }
    }
}

impl Limits {
    /// Build limits from the environment, falling back to the defaults.
    ///
    /// Recognizes `MUST_OC_MAX_YAML_BYTES` and `MUST_OC_MAX_LOG_BYTES`.
    /// Unparsable values are ignored rather than fatal.
    pub fn from_env() -> Self {
        Self {
            max_yaml_bytes: env_u64("MUST_OC_MAX_YAML_BYTES").unwrap_or(MAX_YAML_BYTES),
            max_log_bytes: env_u64("MUST_OC_MAX_LOG_BYTES").unwrap_or(MAX_LOG_BYTES),
        }
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok()?.parse().ok()
}

/// Resolve the configuration directory holding the registry files.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("MUST_OC_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }

    dirs::config_dir()
        .map(|p| p.join("must-oc"))
        .or_else(|| dirs::home_dir().map(|p| p.join(".must-oc")))
        .context("could not determine config directory")
}
