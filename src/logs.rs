// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

//! Line-oriented, size-bounded streaming of archived container logs.
//!
//! Must-gather stores logs at
//! `namespaces/<NS>/pods/<POD>/<CONTAINER>/<CONTAINER>/logs/{current,previous}.log`
//! (the doubled container segment is a quirk of the producer format). Bytes
//! are copied to the sink line by line without buffering the whole file;
//! once the byte budget is hit, a single truncation notice is emitted and
//! the stream stops.

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::archive::{validate_path, ArchiveRoot};
use crate::config::Limits;
use crate::error::{Error, Result};

/// Which log file of the container to stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogVariant {
    #[default]
    Current,
    Previous,
}

impl LogVariant {
    fn file_name(self) -> &'static str {
        match self {
            LogVariant::Current => "current.log",
            LogVariant::Previous => "previous.log",
        }
    }
}

/// A log request as produced by the front end.
#[derive(Debug, Clone)]
pub struct LogRequest {
    pub namespace: String,
    pub pod: String,
    /// `None` asks for auto-selection; ambiguity is an error.
    pub container: Option<String>,
    pub variant: LogVariant,
}

/// Resolve the request to a single validated log path and stream it.
pub fn stream_pod_log(
    roots: &[ArchiveRoot],
    request: &LogRequest,
    limits: &Limits,
    sink: &mut dyn Write,
) -> Result<()> {
    let (root, pod_dir) = find_pod_dir(roots, request)?;

    let container = match &request.container {
        Some(name) => {
            if !pod_dir.join(name).join(name).join("logs").is_dir() {
                return Err(Error::NotFound(format!(
                    "container {:?} not found in pod {:?}",
                    name, request.pod
                )));
            }
            name.clone()
        }
        None => select_sole_container(&pod_dir, &request.pod)?,
    };

    let log_path = pod_dir
        .join(&container)
        .join(&container)
        .join("logs")
        .join(request.variant.file_name());
    let validated = match validate_path(&log_path, root.path()) {
        Ok(path) => path,
        Err(Error::NotFound(_)) => {
            return Err(Error::NotFound(format!(
                "{} not found for container {:?} in pod {:?}",
                request.variant.file_name(),
                container,
                request.pod
            )))
        }
        Err(err) => return Err(err),
    };

    stream_log(&validated, limits.max_log_bytes, sink)
}

/// Containers present in a pod directory, sorted. An entry counts as a
/// container only when the doubled `<name>/<name>/logs/` layout exists.
pub fn list_containers(pod_dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(pod_dir) else {
        return Vec::new();
    };
    let mut containers: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| pod_dir.join(name).join(name).join("logs").is_dir())
        .collect();
    containers.sort();
    containers
}

fn find_pod_dir<'a>(
    roots: &'a [ArchiveRoot],
    request: &LogRequest,
) -> Result<(&'a ArchiveRoot, PathBuf)> {
    for root in roots {
        let pod_dir = root
            .path()
            .join("namespaces")
            .join(&request.namespace)
            .join("pods")
            .join(&request.pod);
        if pod_dir.is_dir() {
            return Ok((root, pod_dir));
        }
    }
    Err(Error::NotFound(format!(
        "pod {:?} not found in namespace {:?}",
        request.pod, request.namespace
    )))
}

fn select_sole_container(pod_dir: &Path, pod: &str) -> Result<String> {
    let mut containers = list_containers(pod_dir);
    match containers.len() {
        0 => Err(Error::NotFound(format!("no log files found for pod {pod:?}"))),
        1 => Ok(containers.remove(0)),
        _ => Err(Error::AmbiguousContainer {
            pod: pod.to_string(),
            containers,
        }),
    }
}

/// Copy `path` to `sink` line by line under a byte budget.
///
/// The emission loop has three states: streaming, truncated (the notice
/// line has been written, nothing further follows), and done. A final line
/// without a terminator is emitted as-is. Invalid UTF-8 passes through
/// untouched since lines are handled as raw bytes.
pub fn stream_log(path: &Path, max_bytes: u64, sink: &mut dyn Write) -> Result<()> {
    let file = std::fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut line: Vec<u8> = Vec::new();
    let mut emitted: u64 = 0;

    loop {
        line.clear();
        let read = reader.read_until(b'\n', &mut line)?;
        if read == 0 {
            return Ok(());
        }
        if emitted + read as u64 > max_bytes {
            writeln!(sink, "[Truncated: log exceeds {max_bytes} bytes]")?;
            return Ok(());
        }
        sink.write_all(&line)?;
        emitted += read as u64;
    }
}
