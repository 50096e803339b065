// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `lenet-rt checksum` command: print the checksum of every bundle tensor.
//!
//! Checksums are wrapping sums of the sign-extended int8 values, matching
//! what firmware computes over the same data.

use std::path::PathBuf;

pub fn execute(bundle: Option<PathBuf>, images: usize, seed: u64) -> anyhow::Result<()> {
    let bundle = super::load_bundle(bundle.as_deref(), images, seed)?;

    super::banner("lenet-rt · Bundle Checksums");
    println!("  {:<14} {:>10} {:>10}  {:>10}", "Tensor", "Elements", "Checksum", "Hex");
    println!("  {}", "-".repeat(50));
    for c in bundle.checksums() {
        println!(
            "  {:<14} {:>10} {:>10}  {:08x}",
            c.name, c.len, c.checksum, c.checksum as u32,
        );
    }
    println!();
    println!("  {} test images", bundle.num_images());
    Ok(())
}
