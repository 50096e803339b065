// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # lenet-rt
//!
//! Command-line interface for the quantized LeNet inference driver.
//!
//! ## Usage
//! ```bash
//! # Benchmark 16 synthetic images, conv2 on the accelerator
//! lenet-rt run --images 16 --conv2 hw
//!
//! # Benchmark a saved test set, machine-readable output
//! lenet-rt run --bundle ./bundles/mnist-int8 --json
//!
//! # Topology, buffer sizes and memory map
//! lenet-rt inspect
//!
//! # Tensor checksums of a bundle
//! lenet-rt checksum --bundle ./bundles/mnist-int8
//! ```

mod commands;

use clap::{Parser, Subcommand};
use runtime::ConvPath;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lenet-rt",
    about = "Quantized LeNet inference driver with DMA staging and conv offload",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file (CLI arguments override it).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the benchmark loop on the simulated SoC.
    Run {
        /// Directory holding model.safetensors (synthetic test set if omitted).
        #[arg(short, long)]
        bundle: Option<PathBuf>,

        /// Number of test images to classify.
        #[arg(short = 'n', long)]
        images: Option<usize>,

        /// Where conv1 runs: sw or hw.
        #[arg(long)]
        conv1: Option<ConvPath>,

        /// Where conv2 runs: sw or hw.
        #[arg(long)]
        conv2: Option<ConvPath>,

        /// Seed for the synthetic test set.
        #[arg(long)]
        seed: Option<u64>,

        /// Print only the totals, not the per-image lines.
        #[arg(short, long)]
        quiet: bool,

        /// Emit the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the network topology, buffer sizes and memory map.
    Inspect,

    /// Print checksums of every tensor in a bundle.
    Checksum {
        /// Directory holding model.safetensors (synthetic test set if omitted).
        #[arg(short, long)]
        bundle: Option<PathBuf>,

        /// Images in the synthetic test set.
        #[arg(short = 'n', long, default_value_t = 16)]
        images: usize,

        /// Seed for the synthetic test set.
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            bundle,
            images,
            conv1,
            conv2,
            seed,
            quiet,
            json,
        } => {
            let overrides = commands::run::Overrides {
                bundle,
                images,
                conv1,
                conv2,
                seed,
                quiet,
            };
            commands::run::execute(config, overrides, json)
        }
        Commands::Inspect => commands::inspect::execute(&config),
        Commands::Checksum {
            bundle,
            images,
            seed,
        } => commands::checksum::execute(bundle.or(config.bundle_path), images, seed),
    }
}
