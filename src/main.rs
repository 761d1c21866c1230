// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

use clap::Parser;

use must_oc::cli::Args;
use must_oc::commands;

fn main() {
    let args = Args::parse();

    // Warnings (skipped files, path escapes) always reach stderr; -v adds
    // debug detail. Tables, describe text, and logs own stdout.
    let filter = if args.verbose {
        "must_oc=debug"
    } else {
        "must_oc=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = commands::run(&args) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
