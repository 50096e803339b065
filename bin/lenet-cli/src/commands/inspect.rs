// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `lenet-rt inspect` command: display topology, buffer sizes and the
//! external-memory layout.

use lenet_model::layout::label_bytes;
use lenet_model::topology::{
    self, CONV1_OFM_SIZE, CONV2_OFM_SIZE, IMG_SIZE, LABEL_CAPACITY, LAYERS, POOL1_OFM_SIZE,
    POOL2_OFM_SIZE, WT_CONV1_SIZE, WT_CONV2_SIZE, WT_FC_SIZE,
};
use runtime::{ExecutionPlan, RuntimeConfig};

pub fn execute(config: &RuntimeConfig) -> anyhow::Result<()> {
    super::banner("lenet-rt · Model Inspector");

    topology::validate_chain(&LAYERS)?;

    // ── Layers ─────────────────────────────────────────────────
    println!(
        "  {:<4} {:<6} {:<15} {:>9}    {:<9} {:<5} {:>8} {:>9}",
        "Idx", "Name", "Kind", "Input", "Output", "Out", "Weights", "MACs",
    );
    println!("  {}", "-".repeat(76));
    for (i, layer) in LAYERS.iter().enumerate() {
        println!(
            "  {:<4} {:<6} {:<15} {:>9} -> {:<9} {:<5} {:>6} B {:>9}",
            i,
            layer.name,
            layer.kind.as_str(),
            layer.input.to_string(),
            layer.output.to_string(),
            layer.output_dtype.as_str(),
            layer.weight_bytes,
            layer.macs,
        );
    }
    println!("  Total: {} MACs per image", topology::total_macs());
    println!();

    // ── Local buffers ──────────────────────────────────────────
    let buffers = [
        ("image", IMG_SIZE),
        ("conv1 weights", WT_CONV1_SIZE),
        ("conv2 weights", WT_CONV2_SIZE),
        ("fc weights", WT_FC_SIZE),
        ("conv1 ofm (i32)", CONV1_OFM_SIZE * 4),
        ("pool1 ofm", POOL1_OFM_SIZE),
        ("conv2 ofm (i32)", CONV2_OFM_SIZE * 4),
        ("pool2 ofm", POOL2_OFM_SIZE),
        ("labels", LABEL_CAPACITY * 2),
    ];
    println!("  Local buffers:");
    for (name, bytes) in buffers {
        println!("   {:<18} {:>6} B  ({} words)", name, bytes, bytes / 4);
    }
    let total: usize = buffers.iter().map(|(_, b)| b).sum();
    println!("   {:<18} {:>6} B", "total", total);
    println!();

    // ── External memory ────────────────────────────────────────
    let map = config.resolve_memory_map()?;
    print!("  {}", map.summary().replace('\n', "\n  "));
    println!();

    let plan = ExecutionPlan::from_config(config)?;
    println!("  {}", plan.summary());
    println!(
        "  Label staging: {} B for {} images",
        label_bytes(plan.num_images),
        plan.num_images
    );
    println!();

    Ok(())
}
