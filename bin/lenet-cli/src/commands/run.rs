// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `lenet-rt run` command: benchmark the test set on the simulated SoC.
//!
//! Demonstrates the full type-state pipeline:
//! ```text
//! Driver<Idle> → stage → <Ready> → infer × N → finish → Handoff
//! ```

use lenet_model::topology::LABEL_CAPACITY;
use lenet_model::ModelBundle;
use runtime::{ConvPath, DiagnosticSink, RuntimeConfig, SimulatedRun, StringSink};
use std::path::PathBuf;

/// Command-line values that override the configuration file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub bundle: Option<PathBuf>,
    pub images: Option<usize>,
    pub conv1: Option<ConvPath>,
    pub conv2: Option<ConvPath>,
    pub seed: Option<u64>,
    pub quiet: bool,
}

impl Overrides {
    /// Whether the image count should follow the bundle: a bundle was named
    /// on the command line without `-n`.
    fn sizes_from_bundle(&self) -> bool {
        self.bundle.is_some() && self.images.is_none()
    }

    fn apply(self, mut config: RuntimeConfig) -> RuntimeConfig {
        if let Some(b) = self.bundle {
            config.bundle_path = Some(b);
        }
        if let Some(n) = self.images {
            config.num_images = n;
        }
        if let Some(p) = self.conv1 {
            config.conv1 = p;
        }
        if let Some(p) = self.conv2 {
            config.conv2 = p;
        }
        if let Some(s) = self.seed {
            config.synthetic_seed = s;
        }
        if self.quiet {
            config.emit_image_lines = false;
        }
        config
    }
}

/// Writes report lines straight to stdout, as a serial console would.
struct StdoutSink;

impl DiagnosticSink for StdoutSink {
    fn notice(&mut self, text: &str) {
        println!("   {text}");
    }
}

pub fn execute(config: RuntimeConfig, overrides: Overrides, json: bool) -> anyhow::Result<()> {
    let from_bundle = overrides.sizes_from_bundle();
    let mut config = overrides.apply(config);

    let bundle = super::load_bundle(
        config.bundle_path.as_deref(),
        config.num_images,
        config.synthetic_seed,
    )?;
    if from_bundle {
        config.num_images = images_to_run(&bundle);
        tracing::info!(images = config.num_images, "Image count taken from bundle");
    }
    config.validate()?;

    if json {
        let run = runtime::run_simulated(&config, &bundle, &mut StringSink::new())?;
        let out = serde_json::json!({
            "report": run.report,
            "stats": run.stats,
            "handoff": run.handoff,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    super::banner("lenet-rt · Benchmark Runner");

    println!("  Config:");
    match &config.bundle_path {
        Some(p) => println!("   Bundle:   {}", p.display()),
        None => println!("   Bundle:   synthetic (seed {})", config.synthetic_seed),
    }
    println!("   Images:   {}", config.num_images);
    println!("   conv1:    {}", config.conv1);
    println!("   conv2:    {}", config.conv2);
    println!();

    println!("  Report:");
    let run = runtime::run_simulated(&config, &bundle, &mut StdoutSink)?;
    println!();

    print_results(&run);
    Ok(())
}

/// Every image in `bundle`, up to the label capacity.
fn images_to_run(bundle: &ModelBundle) -> usize {
    bundle.num_images().min(LABEL_CAPACITY)
}

fn print_results(run: &SimulatedRun) {
    println!("  Results:");
    println!("   {}", run.report.summary());
    let missed: Vec<usize> = run.report.mispredicted().collect();
    if !missed.is_empty() {
        println!(
            "   Mispredicted: {:?}{}",
            &missed[..missed.len().min(10)],
            if missed.len() > 10 { " ..." } else { "" },
        );
    }
    println!();
    println!("  Devices:");
    println!("   {}", run.stats.summary());
    println!("   Handoff to 0x{:08x}", run.handoff.resume_address);
    println!();
}
