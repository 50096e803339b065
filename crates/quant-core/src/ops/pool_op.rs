// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! 2-D max pooling from clamped int32 maps to int8 maps.

use crate::{saturate_i8, FeatureShape};

/// Non-overlapping `window × window` max pooling, per channel.
///
/// `input` holds an int32 map of shape `ifm` (normally already clamped); the
/// per-window maximum is saturated to int8 into `output`, of shape
/// `ifm.pooled(window)`.
///
/// # Panics
/// Panics if `window` does not tile `ifm` or a slice length is wrong.
pub fn max_pool(input: &[i32], ifm: FeatureShape, window: usize, output: &mut [i8]) {
    let Some(ofm) = ifm.pooled(window) else {
        panic!("pool window {window} does not tile {ifm}");
    };
    assert_eq!(input.len(), ifm.num_elements(), "max_pool input length");
    assert_eq!(output.len(), ofm.num_elements(), "max_pool output length");

    let d = ifm.dim;
    let o = ofm.dim;
    for c in 0..ifm.depth {
        let src = &input[c * d * d..(c + 1) * d * d];
        let dst = &mut output[c * o * o..(c + 1) * o * o];
        for y in 0..o {
            for x in 0..o {
                let mut max = i32::MIN;
                for wy in 0..window {
                    let row = (y * window + wy) * d + x * window;
                    for &v in &src[row..row + window] {
                        max = max.max(v);
                    }
                }
                dst[y * o + x] = saturate_i8(max);
            }
        }
    }
}
