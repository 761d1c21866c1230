// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

use std::io::Write;

use anyhow::Result;

use crate::archive::discover_roots;
use crate::cli::Args;
use crate::config::Limits;
use crate::logs::{stream_pod_log, LogRequest, LogVariant};

pub fn run(
    args: &Args,
    pod_name: &str,
    namespace: &str,
    container: Option<&str>,
    previous: bool,
) -> Result<()> {
    let roots = discover_roots(&args.gather_dirs())?;

    let request = LogRequest {
        namespace: namespace.to_string(),
        pod: pod_name.to_string(),
        container: container.map(String::from),
        variant: if previous {
            LogVariant::Previous
        } else {
            LogVariant::Current
        },
    };

    let stdout = std::io::stdout();
    let mut sink = stdout.lock();
    stream_pod_log(&roots, &request, &Limits::from_env(), &mut sink)?;
    sink.flush()?;
    Ok(())
}
