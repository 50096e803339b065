// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The per-image inference pipeline and the buffers it runs in.
//!
//! ```text
//!  image ─► conv1 ─► clamp ─► pool1 ─► conv2 ─► clamp ─► pool2 ─► fc ─► argmax
//!             │                          │
//!             └── Software: LayerKernels └── Hardware: accelerator + DMA
//! ```
//!
//! On the hardware path each conv first writes its local input (the staged
//! image, or pool1) out to the IFM scratch region. Both read the raw int32
//! result back from the OFM scratch region before clamping.

use crate::{ConvPath, ExternalLayout, LayerKernels};
use hw_port::{Conv3dJob, Platform};
use lenet_model::topology::{
    CONV1, CONV1_OFM_SIZE, CONV2, CONV2_OFM_SIZE, FC_DEPTH, IMG_SIZE, LABEL_CAPACITY,
    POOL1_OFM_SIZE, POOL2_OFM_SIZE, WT_CONV1_SIZE, WT_CONV2_SIZE, WT_FC_SIZE,
};
use quant_core::{argmax, I32Buffer, I8Buffer};
use tracing::debug;

// ── Workspace ────────────────────────────────────────────────────────────────

/// Every local buffer the driver uses, allocated once and reused in place.
///
/// All buffers are word aligned so the DMA engine can address them.
pub struct Workspace {
    pub(crate) conv1_weights: I8Buffer<WT_CONV1_SIZE>,
    pub(crate) conv2_weights: I8Buffer<WT_CONV2_SIZE>,
    pub(crate) fc_weights: I8Buffer<WT_FC_SIZE>,
    pub(crate) image: I8Buffer<IMG_SIZE>,
    pub(crate) conv1_ofm: I32Buffer<CONV1_OFM_SIZE>,
    pub(crate) pool1: I8Buffer<POOL1_OFM_SIZE>,
    pub(crate) conv2_ofm: I32Buffer<CONV2_OFM_SIZE>,
    pub(crate) pool2: I8Buffer<POOL2_OFM_SIZE>,
    pub(crate) scores: [i32; FC_DEPTH],
    pub(crate) ground_truth: I8Buffer<LABEL_CAPACITY>,
    pub(crate) predicted: I8Buffer<LABEL_CAPACITY>,
}

impl Workspace {
    /// Allocates a zeroed workspace on the heap.
    pub fn new() -> Box<Self> {
        Box::new(Self {
            conv1_weights: I8Buffer::zeroed(),
            conv2_weights: I8Buffer::zeroed(),
            fc_weights: I8Buffer::zeroed(),
            image: I8Buffer::zeroed(),
            conv1_ofm: I32Buffer::zeroed(),
            pool1: I8Buffer::zeroed(),
            conv2_ofm: I32Buffer::zeroed(),
            pool2: I8Buffer::zeroed(),
            scores: [0; FC_DEPTH],
            ground_truth: I8Buffer::zeroed(),
            predicted: I8Buffer::zeroed(),
        })
    }

    /// The image currently staged.
    pub fn image(&self) -> &[i8; IMG_SIZE] {
        &self.image
    }

    /// Mutable access to the staged image, for callers that stage pixels
    /// without the DMA engine.
    pub fn image_mut(&mut self) -> &mut [i8; IMG_SIZE] {
        &mut self.image
    }

    /// Clamped conv1 map of the last inference.
    pub fn conv1_ofm(&self) -> &[i32; CONV1_OFM_SIZE] {
        &self.conv1_ofm
    }

    pub fn pool1(&self) -> &[i8; POOL1_OFM_SIZE] {
        &self.pool1
    }

    /// Clamped conv2 map of the last inference.
    pub fn conv2_ofm(&self) -> &[i32; CONV2_OFM_SIZE] {
        &self.conv2_ofm
    }

    pub fn pool2(&self) -> &[i8; POOL2_OFM_SIZE] {
        &self.pool2
    }

    /// Class scores of the last inference.
    pub fn scores(&self) -> &[i32; FC_DEPTH] {
        &self.scores
    }

    pub fn conv1_weights(&self) -> &[i8; WT_CONV1_SIZE] {
        &self.conv1_weights
    }

    pub fn conv2_weights(&self) -> &[i8; WT_CONV2_SIZE] {
        &self.conv2_weights
    }

    pub fn fc_weights(&self) -> &[i8; WT_FC_SIZE] {
        &self.fc_weights
    }

    /// Ground-truth labels as staged from external memory.
    pub fn ground_truth(&self) -> &[i8; LABEL_CAPACITY] {
        &self.ground_truth
    }

    /// Predicted labels, one slot per image index.
    pub fn predicted(&self) -> &[i8; LABEL_CAPACITY] {
        &self.predicted
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = std::mem::size_of::<Self>();
        f.debug_struct("Workspace").field("size_bytes", &bytes).finish()
    }
}

// ── Pipeline ─────────────────────────────────────────────────────────────────

/// Runs the fixed layer sequence for one image.
#[derive(Debug)]
pub struct Pipeline<K> {
    kernels: K,
    conv1: ConvPath,
    conv2: ConvPath,
    layout: ExternalLayout,
}

impl<K: LayerKernels> Pipeline<K> {
    pub fn new(kernels: K, conv1: ConvPath, conv2: ConvPath, layout: ExternalLayout) -> Self {
        Self {
            kernels,
            conv1,
            conv2,
            layout,
        }
    }

    pub fn kernels(&self) -> &K {
        &self.kernels
    }

    /// Classifies the image staged in `ws`. Writes the label into
    /// `ws.predicted[image_index]` and returns it.
    ///
    /// # Panics
    /// Panics if `image_index` is not below the label capacity.
    pub fn infer<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        ws: &mut Workspace,
        image_index: usize,
    ) -> usize {
        // conv1
        match self.conv1 {
            ConvPath::Software => {
                self.kernels
                    .conv1(&ws.image, &ws.conv1_weights, &mut ws.conv1_ofm)
            }
            ConvPath::Hardware => {
                platform.write_external(ws.image.as_bytes(), self.layout.ifm_scratch);
                let job = Conv3dJob::new(
                    self.layout.ifm_scratch,
                    self.layout.conv1_weights,
                    self.layout.ofm_scratch,
                    &CONV1,
                );
                platform.offload_conv3d(&job);
                platform.read_external(self.layout.ofm_scratch, ws.conv1_ofm.as_bytes_mut());
            }
        }
        self.kernels.clamp(&mut ws.conv1_ofm[..]);
        self.kernels.pool1(&ws.conv1_ofm, &mut ws.pool1);

        // conv2
        match self.conv2 {
            ConvPath::Software => {
                self.kernels
                    .conv2(&ws.pool1, &ws.conv2_weights, &mut ws.conv2_ofm)
            }
            ConvPath::Hardware => {
                platform.write_external(ws.pool1.as_bytes(), self.layout.ifm_scratch);
                let job = Conv3dJob::new(
                    self.layout.ifm_scratch,
                    self.layout.conv2_weights,
                    self.layout.ofm_scratch,
                    &CONV2,
                );
                platform.offload_conv3d(&job);
                platform.read_external(self.layout.ofm_scratch, ws.conv2_ofm.as_bytes_mut());
            }
        }
        self.kernels.clamp(&mut ws.conv2_ofm[..]);
        self.kernels.pool2(&ws.conv2_ofm, &mut ws.pool2);

        self.kernels
            .fully_connected(&ws.pool2, &ws.fc_weights, &mut ws.scores);

        let label = argmax(&ws.scores);
        ws.predicted[image_index] = label as i8;
        debug!(image = image_index, label, scores = ?ws.scores, "Image classified");
        label
    }
}
