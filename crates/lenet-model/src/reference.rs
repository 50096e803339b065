// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Golden forward pass.
//!
//! A straightforward, allocating rendition of the network built from the
//! `quant-core` kernels. It labels synthetic data and serves as the oracle
//! the driver's output is compared against.

use crate::topology::{CONV1, CONV2, FC_DEPTH, POOL1_SHAPE, POOL2_SHAPE, POOL_WINDOW};
use quant_core::{argmax, clamp, conv3d, fully_connected, max_pool};

/// Every intermediate map of one forward pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activations {
    /// conv1 output after clamping.
    pub conv1: Vec<i32>,
    pub pool1: Vec<i8>,
    /// conv2 output after clamping.
    pub conv2: Vec<i32>,
    pub pool2: Vec<i8>,
    pub scores: [i32; FC_DEPTH],
}

impl Activations {
    /// The predicted class.
    pub fn label(&self) -> usize {
        argmax(&self.scores)
    }
}

/// Runs the network on one image.
///
/// # Panics
/// Panics if a weight slice is shorter than its layer requires or the image
/// has the wrong length.
pub fn forward(conv1_w: &[i8], conv2_w: &[i8], fc_w: &[i8], image: &[i8]) -> Activations {
    let mut conv1 = vec![0i32; CONV1.ofm.num_elements()];
    conv3d(&CONV1, image, conv1_w, &mut conv1);
    clamp(&mut conv1);

    let mut pool1 = vec![0i8; POOL1_SHAPE.num_elements()];
    max_pool(&conv1, CONV1.ofm, POOL_WINDOW, &mut pool1);

    let mut conv2 = vec![0i32; CONV2.ofm.num_elements()];
    conv3d(&CONV2, &pool1, conv2_w, &mut conv2);
    clamp(&mut conv2);

    let mut pool2 = vec![0i8; POOL2_SHAPE.num_elements()];
    max_pool(&conv2, CONV2.ofm, POOL_WINDOW, &mut pool2);

    let mut scores = [0i32; FC_DEPTH];
    fully_connected(&pool2, &fc_w[..pool2.len() * FC_DEPTH], &mut scores);

    Activations {
        conv1,
        pool1,
        conv2,
        pool2,
        scores,
    }
}
