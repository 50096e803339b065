// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Example: Compare software and accelerator convolution paths.
//!
//! Runs the same synthetic test set on the simulated SoC with every
//! combination of conv paths and prints accuracy, cycle counts and device
//! traffic side by side.
//!
//! ```bash
//! cargo run -p runtime --example conv_path_comparison
//! ```

use lenet_model::ModelBundle;
use runtime::{run_simulated, ConvPath, RuntimeConfig, StringSink};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("warn").init();

    let num_images = 32;
    let bundle = ModelBundle::synthetic(num_images, 2025);

    let paths = [
        (ConvPath::Software, ConvPath::Software),
        (ConvPath::Hardware, ConvPath::Software),
        (ConvPath::Software, ConvPath::Hardware),
        (ConvPath::Hardware, ConvPath::Hardware),
    ];

    println!(
        "{:<10} {:<10} {:>8} {:>12} {:>12} {:>6} {:>10}",
        "conv1", "conv2", "Correct", "Cycles", "Cycles/img", "Jobs", "KB moved",
    );
    println!("{}", "-".repeat(74));

    for (conv1, conv2) in paths {
        let config = RuntimeConfig {
            num_images,
            conv1,
            conv2,
            emit_image_lines: false,
            ..Default::default()
        };
        let run = run_simulated(&config, &bundle, &mut StringSink::new())?;
        println!(
            "{:<10} {:<10} {:>5}/{:<2} {:>12} {:>12.0} {:>6} {:>10.1}",
            conv1,
            conv2,
            run.report.num_correct,
            run.report.num_images,
            run.report.total_cycles,
            run.report.mean_cycles(),
            run.stats.accelerator_jobs,
            run.stats.bytes_moved() as f64 / 1024.0,
        );
    }

    Ok(())
}
