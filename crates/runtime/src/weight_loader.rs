// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Staging of weights, labels and images from external memory.
//!
//! Every artifact is pulled into its [`Workspace`] buffer with an inbound
//! DMA transfer. Lengths are whole words: weight buffers are already padded,
//! labels are staged as [`label_bytes`] bytes.

use crate::{ExternalLayout, Workspace};
use hw_port::DmaPort;
use lenet_model::layout::label_bytes;
use tracing::debug;

/// Moves model artifacts from their external regions into local buffers.
#[derive(Debug, Clone, Copy)]
pub struct WeightLoader {
    layout: ExternalLayout,
}

impl WeightLoader {
    pub fn new(layout: ExternalLayout) -> Self {
        Self { layout }
    }

    /// Stages conv1, conv2 and fc weights.
    pub fn load_weights<D: DmaPort + ?Sized>(&self, dma: &mut D, ws: &mut Workspace) {
        dma.read_external(self.layout.conv1_weights, ws.conv1_weights.as_bytes_mut());
        dma.read_external(self.layout.conv2_weights, ws.conv2_weights.as_bytes_mut());
        dma.read_external(self.layout.fc_weights, ws.fc_weights.as_bytes_mut());
        debug!(
            bytes = ws.conv1_weights.size_bytes()
                + ws.conv2_weights.size_bytes()
                + ws.fc_weights.size_bytes(),
            "Weights staged"
        );
    }

    /// Stages the ground-truth labels of the first `num_images` images.
    ///
    /// # Panics
    /// Panics if the label staging length exceeds the label buffer.
    pub fn load_labels<D: DmaPort + ?Sized>(
        &self,
        dma: &mut D,
        ws: &mut Workspace,
        num_images: usize,
    ) {
        let len = label_bytes(num_images);
        dma.read_external(self.layout.labels, &mut ws.ground_truth.as_bytes_mut()[..len]);
        debug!(images = num_images, bytes = len, "Labels staged");
    }

    /// Stages image `index` into the workspace image buffer.
    pub fn load_image<D: DmaPort + ?Sized>(&self, dma: &mut D, ws: &mut Workspace, index: usize) {
        dma.read_external(self.layout.image(index), ws.image.as_bytes_mut());
    }
}
