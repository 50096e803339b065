// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Compile-time topology of the network.
//!
//! Every buffer the driver owns is sized from these constants. Sizes that
//! cross the DMA engine are padded up to whole words with [`align4`]; the
//! const assertions below reject any edit that breaks the chain.

use crate::ModelError;
use quant_core::{align4, Conv3dParams, DType, FeatureShape};
use std::fmt;

// ── Input ────────────────────────────────────────────────────────────────────

pub const IMG_DIM: usize = 32;
pub const IMG_DEPTH: usize = 1;
pub const IMAGE_SHAPE: FeatureShape = FeatureShape::new(IMG_DIM, IMG_DEPTH);

// ── Layers ───────────────────────────────────────────────────────────────────

pub const WT_CONV1_DIM: usize = 5;
pub const CONV1_OFM_DEPTH: usize = 6;
pub const CONV1: Conv3dParams = Conv3dParams::new(IMAGE_SHAPE, WT_CONV1_DIM, CONV1_OFM_DEPTH);

pub const POOL_WINDOW: usize = 2;
pub const POOL1_SHAPE: FeatureShape = pooled(CONV1.ofm);

pub const WT_CONV2_DIM: usize = 5;
pub const CONV2_OFM_DEPTH: usize = 16;
pub const CONV2: Conv3dParams = Conv3dParams::new(POOL1_SHAPE, WT_CONV2_DIM, CONV2_OFM_DEPTH);

pub const POOL2_SHAPE: FeatureShape = pooled(CONV2.ofm);

pub const FC_INPUTS: usize = POOL2_SHAPE.num_elements();
pub const FC_DEPTH: usize = 10;
pub const NUM_CLASSES: usize = FC_DEPTH;

// ── Buffer sizes (elements) ──────────────────────────────────────────────────

pub const IMG_SIZE: usize = align4(IMAGE_SHAPE.size_bytes(DType::I8));
pub const WT_CONV1_SIZE: usize = align4(CONV1.weight_len());
pub const WT_CONV2_SIZE: usize = align4(CONV2.weight_len());
pub const WT_FC_SIZE: usize = align4(FC_INPUTS * FC_DEPTH);
pub const CONV1_OFM_SIZE: usize = CONV1.ofm.num_elements();
pub const POOL1_OFM_SIZE: usize = align4(POOL1_SHAPE.num_elements());
pub const CONV2_OFM_SIZE: usize = CONV2.ofm.num_elements();
pub const POOL2_OFM_SIZE: usize = align4(POOL2_SHAPE.num_elements());

/// Maximum number of test images a run can classify.
pub const LABEL_CAPACITY: usize = 128;

const fn pooled(shape: FeatureShape) -> FeatureShape {
    match shape.pooled(POOL_WINDOW) {
        Some(s) => s,
        None => panic!("pool window does not tile the feature map"),
    }
}

const _: () = {
    assert!(IMG_SIZE == 1024);
    assert!(WT_CONV1_SIZE == 152);
    assert!(CONV1_OFM_SIZE == 4704);
    assert!(CONV2_OFM_SIZE == 1600);
    assert!(FC_INPUTS == 400);
    // Pooled maps are consumed unpadded by the next layer.
    assert!(POOL1_OFM_SIZE == POOL1_SHAPE.num_elements());
    assert!(POOL2_OFM_SIZE == POOL2_SHAPE.num_elements());
    assert!(IMG_SIZE == IMAGE_SHAPE.num_elements());
    assert!(FC_DEPTH <= i8::MAX as usize);
};

// ── Layer table ──────────────────────────────────────────────────────────────

/// The computation a layer performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Conv,
    Pool,
    FullyConnected,
}

impl LayerKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Conv => "conv",
            LayerKind::Pool => "pool",
            LayerKind::FullyConnected => "fully_connected",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Static description of one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct LayerDef {
    pub name: &'static str,
    pub kind: LayerKind,
    pub input: FeatureShape,
    pub output: FeatureShape,
    /// Element type of the layer's raw output.
    pub output_dtype: DType,
    /// Word-padded weight bytes, zero for pooling.
    pub weight_bytes: usize,
    /// Multiply-accumulates per image.
    pub macs: usize,
}

impl LayerDef {
    /// Returns a one-line description for display.
    pub fn summary(&self) -> String {
        format!(
            "{:<6} {:<15} {:>9} -> {:<9} {:<3} weights {:>5} B, {:>7} MACs",
            self.name,
            self.kind.as_str(),
            self.input.to_string(),
            self.output.to_string(),
            self.output_dtype.as_str(),
            self.weight_bytes,
            self.macs,
        )
    }
}

/// The network, in execution order.
pub const LAYERS: [LayerDef; 5] = [
    LayerDef {
        name: "conv1",
        kind: LayerKind::Conv,
        input: CONV1.ifm,
        output: CONV1.ofm,
        output_dtype: DType::I32,
        weight_bytes: WT_CONV1_SIZE,
        macs: CONV1.macs(),
    },
    LayerDef {
        name: "pool1",
        kind: LayerKind::Pool,
        input: CONV1.ofm,
        output: POOL1_SHAPE,
        output_dtype: DType::I8,
        weight_bytes: 0,
        macs: 0,
    },
    LayerDef {
        name: "conv2",
        kind: LayerKind::Conv,
        input: CONV2.ifm,
        output: CONV2.ofm,
        output_dtype: DType::I32,
        weight_bytes: WT_CONV2_SIZE,
        macs: CONV2.macs(),
    },
    LayerDef {
        name: "pool2",
        kind: LayerKind::Pool,
        input: CONV2.ofm,
        output: POOL2_SHAPE,
        output_dtype: DType::I8,
        weight_bytes: 0,
        macs: 0,
    },
    LayerDef {
        name: "fc",
        kind: LayerKind::FullyConnected,
        input: POOL2_SHAPE,
        output: FeatureShape::vector(FC_DEPTH),
        output_dtype: DType::I32,
        weight_bytes: WT_FC_SIZE,
        macs: FC_INPUTS * FC_DEPTH,
    },
];

/// Checks that each layer consumes exactly what the previous one produced.
/// A fully-connected layer accepts any input with the right element count.
pub fn validate_chain(layers: &[LayerDef]) -> Result<(), ModelError> {
    for pair in layers.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let chained = match next.kind {
            LayerKind::FullyConnected => prev.output.num_elements() == next.input.num_elements(),
            _ => prev.output == next.input,
        };
        if !chained {
            return Err(ModelError::InvalidChain(format!(
                "'{}' produces {} but '{}' expects {}",
                prev.name, prev.output, next.name, next.input
            )));
        }
    }
    Ok(())
}

/// Total multiply-accumulates per image.
pub fn total_macs() -> usize {
    LAYERS.iter().map(|l| l.macs).sum()
}

/// Renders the layer table, one layer per line.
pub fn summary() -> String {
    let weights: usize = LAYERS.iter().map(|l| l.weight_bytes).sum();
    let mut out = format!(
        "LeNet: {} layers, {} weight bytes, {} MACs per image\n",
        LAYERS.len(),
        weights,
        total_macs()
    );
    for (i, layer) in LAYERS.iter().enumerate() {
        out.push_str(&format!("  [{i}] {}\n", layer.summary()));
    }
    out
}
