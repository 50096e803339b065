// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Reference 3-D convolution (int8 × int8 → int32).
//!
//! ```text
//!   IFM  [C][D][D]  i8        weights [M][C][K][K]  i8
//!            \                   /
//!             valid, stride 1, no padding
//!                      |
//!   OFM  [M][O][O]  i32       O = D - K + 1
//! ```
//!
//! The accelerator implements the same arithmetic, so this kernel doubles as
//! its behavioural model.

use crate::FeatureShape;

/// Geometry of one convolution invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Conv3dParams {
    /// Input feature map shape.
    pub ifm: FeatureShape,
    /// Kernel width and height.
    pub weight_dim: usize,
    /// Output feature map shape.
    pub ofm: FeatureShape,
}

impl Conv3dParams {
    /// Builds parameters for a valid convolution producing `ofm_depth`
    /// channels. The output dimension is derived from the input and kernel.
    ///
    /// # Panics
    /// Panics (at compile time in const contexts) if the kernel is empty or
    /// larger than the input.
    pub const fn new(ifm: FeatureShape, weight_dim: usize, ofm_depth: usize) -> Self {
        match ifm.conv_output(weight_dim, ofm_depth) {
            Some(ofm) => Self {
                ifm,
                weight_dim,
                ofm,
            },
            None => panic!("convolution kernel does not fit the input"),
        }
    }

    /// Returns `true` when the output dimension matches a valid stride-1
    /// convolution of the input and every extent is non-zero.
    pub const fn is_consistent(&self) -> bool {
        self.ifm.depth > 0
            && self.ofm.depth > 0
            && self.weight_dim > 0
            && self.weight_dim <= self.ifm.dim
            && self.ofm.dim == self.ifm.dim - self.weight_dim + 1
    }

    /// Number of weights used (`M × C × K × K`), before word padding.
    pub const fn weight_len(&self) -> usize {
        self.ofm.depth * self.ifm.depth * self.weight_dim * self.weight_dim
    }

    /// Multiply-accumulate operations per invocation.
    pub const fn macs(&self) -> usize {
        self.ofm.num_elements() * self.ifm.depth * self.weight_dim * self.weight_dim
    }
}

/// Computes a valid, stride-1 convolution into `output`.
///
/// Accumulation wraps on overflow. `weights` may be longer than
/// [`Conv3dParams::weight_len`] to allow word padding; the tail is ignored.
///
/// # Panics
/// Panics if `params` is inconsistent or a slice length does not match it.
pub fn conv3d(params: &Conv3dParams, input: &[i8], weights: &[i8], output: &mut [i32]) {
    assert!(params.is_consistent(), "inconsistent conv3d geometry: {params:?}");
    assert_eq!(input.len(), params.ifm.num_elements(), "conv3d input length");
    assert!(weights.len() >= params.weight_len(), "conv3d weights too short");
    assert_eq!(output.len(), params.ofm.num_elements(), "conv3d output length");

    let d = params.ifm.dim;
    let k = params.weight_dim;
    let o = params.ofm.dim;
    let in_ch = params.ifm.depth;
    let plane = d * d;
    let kernel = k * k;

    for m in 0..params.ofm.depth {
        let filter = &weights[m * in_ch * kernel..(m + 1) * in_ch * kernel];
        let out_plane = &mut output[m * o * o..(m + 1) * o * o];
        for y in 0..o {
            for x in 0..o {
                let mut acc = 0i32;
                for c in 0..in_ch {
                    let ifm = &input[c * plane..(c + 1) * plane];
                    let w = &filter[c * kernel..(c + 1) * kernel];
                    for ky in 0..k {
                        let row = (y + ky) * d + x;
                        for kx in 0..k {
                            let prod = ifm[row + kx] as i32 * w[ky * k + kx] as i32;
                            acc = acc.wrapping_add(prod);
                        }
                    }
                }
                out_plane[y * o + x] = acc;
            }
        }
    }
}
