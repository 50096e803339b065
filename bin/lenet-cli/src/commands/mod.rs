// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and shared helpers.

pub mod checksum;
pub mod inspect;
pub mod run;

use anyhow::Context;
use lenet_model::ModelBundle;
use runtime::RuntimeConfig;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Installs the `tracing` subscriber. `RUST_LOG` wins over `-v`.
///
/// Logs go to stderr so the report on stdout stays machine-readable.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .init();
}

/// Reads the configuration file, or returns defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<RuntimeConfig> {
    match path {
        Some(p) => RuntimeConfig::from_file(p)
            .with_context(|| format!("failed to load config '{}'", p.display())),
        None => Ok(RuntimeConfig::default()),
    }
}

/// Loads the bundle in `dir`, or generates a synthetic one.
pub fn load_bundle(dir: Option<&Path>, images: usize, seed: u64) -> anyhow::Result<ModelBundle> {
    match dir {
        Some(d) => ModelBundle::load(d)
            .with_context(|| format!("failed to load bundle from '{}'", d.display())),
        None => {
            tracing::info!(images, seed, "Generating synthetic bundle");
            Ok(ModelBundle::synthetic(images, seed))
        }
    }
}

/// Prints a boxed title banner.
pub fn banner(title: &str) {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║{:^54}║", title);
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
}
