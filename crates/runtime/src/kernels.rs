// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Software layer kernels.
//!
//! [`LayerKernels`] is the seam between the pipeline and the arithmetic: the
//! pipeline owns ordering, staging and path selection, the kernels own the
//! per-layer math. Every buffer is a fixed-size array so a shape mismatch is
//! a compile error rather than a runtime check.

use lenet_model::topology::{
    CONV1, CONV1_OFM_SIZE, CONV2, CONV2_OFM_SIZE, FC_DEPTH, IMG_SIZE, POOL1_OFM_SIZE,
    POOL2_OFM_SIZE, POOL_WINDOW, WT_CONV1_SIZE, WT_CONV2_SIZE, WT_FC_SIZE,
};

/// The per-layer computations of the network.
pub trait LayerKernels {
    /// First convolution: image × conv1 weights → raw int32 map.
    fn conv1(
        &mut self,
        image: &[i8; IMG_SIZE],
        weights: &[i8; WT_CONV1_SIZE],
        ofm: &mut [i32; CONV1_OFM_SIZE],
    );

    /// Max-pools the clamped conv1 map.
    fn pool1(&mut self, ifm: &[i32; CONV1_OFM_SIZE], ofm: &mut [i8; POOL1_OFM_SIZE]);

    /// Second convolution: pool1 map × conv2 weights → raw int32 map.
    fn conv2(
        &mut self,
        ifm: &[i8; POOL1_OFM_SIZE],
        weights: &[i8; WT_CONV2_SIZE],
        ofm: &mut [i32; CONV2_OFM_SIZE],
    );

    /// Max-pools the clamped conv2 map.
    fn pool2(&mut self, ifm: &[i32; CONV2_OFM_SIZE], ofm: &mut [i8; POOL2_OFM_SIZE]);

    /// Projects the pool2 map onto one score per class.
    fn fully_connected(
        &mut self,
        ifm: &[i8; POOL2_OFM_SIZE],
        weights: &[i8; WT_FC_SIZE],
        scores: &mut [i32; FC_DEPTH],
    );

    /// Saturates a conv map to the int8 range in place.
    fn clamp(&mut self, values: &mut [i32]) {
        quant_core::clamp(values);
    }
}

impl<K: LayerKernels + ?Sized> LayerKernels for &mut K {
    fn conv1(
        &mut self,
        image: &[i8; IMG_SIZE],
        weights: &[i8; WT_CONV1_SIZE],
        ofm: &mut [i32; CONV1_OFM_SIZE],
    ) {
        (**self).conv1(image, weights, ofm)
    }

    fn pool1(&mut self, ifm: &[i32; CONV1_OFM_SIZE], ofm: &mut [i8; POOL1_OFM_SIZE]) {
        (**self).pool1(ifm, ofm)
    }

    fn conv2(
        &mut self,
        ifm: &[i8; POOL1_OFM_SIZE],
        weights: &[i8; WT_CONV2_SIZE],
        ofm: &mut [i32; CONV2_OFM_SIZE],
    ) {
        (**self).conv2(ifm, weights, ofm)
    }

    fn pool2(&mut self, ifm: &[i32; CONV2_OFM_SIZE], ofm: &mut [i8; POOL2_OFM_SIZE]) {
        (**self).pool2(ifm, ofm)
    }

    fn fully_connected(
        &mut self,
        ifm: &[i8; POOL2_OFM_SIZE],
        weights: &[i8; WT_FC_SIZE],
        scores: &mut [i32; FC_DEPTH],
    ) {
        (**self).fully_connected(ifm, weights, scores)
    }

    fn clamp(&mut self, values: &mut [i32]) {
        (**self).clamp(values)
    }
}

/// The `quant-core` reference kernels.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceKernels;

impl LayerKernels for ReferenceKernels {
    fn conv1(
        &mut self,
        image: &[i8; IMG_SIZE],
        weights: &[i8; WT_CONV1_SIZE],
        ofm: &mut [i32; CONV1_OFM_SIZE],
    ) {
        quant_core::conv3d(&CONV1, image, weights, ofm);
    }

    fn pool1(&mut self, ifm: &[i32; CONV1_OFM_SIZE], ofm: &mut [i8; POOL1_OFM_SIZE]) {
        quant_core::max_pool(ifm, CONV1.ofm, POOL_WINDOW, ofm);
    }

    fn conv2(
        &mut self,
        ifm: &[i8; POOL1_OFM_SIZE],
        weights: &[i8; WT_CONV2_SIZE],
        ofm: &mut [i32; CONV2_OFM_SIZE],
    ) {
        quant_core::conv3d(&CONV2, ifm, weights, ofm);
    }

    fn pool2(&mut self, ifm: &[i32; CONV2_OFM_SIZE], ofm: &mut [i8; POOL2_OFM_SIZE]) {
        quant_core::max_pool(ifm, CONV2.ofm, POOL_WINDOW, ofm);
    }

    fn fully_connected(
        &mut self,
        ifm: &[i8; POOL2_OFM_SIZE],
        weights: &[i8; WT_FC_SIZE],
        scores: &mut [i32; FC_DEPTH],
    ) {
        quant_core::fully_connected(ifm, weights, scores);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lenet_model::reference;

    #[test]
    fn test_reference_kernels_match_forward() {
        let image: [i8; IMG_SIZE] = std::array::from_fn(|i| (i % 7) as i8 - 3);
        let mut w1 = [0i8; WT_CONV1_SIZE];
        w1[..150].iter_mut().enumerate().for_each(|(i, w)| *w = (i % 5) as i8 - 2);
        let w2: [i8; WT_CONV2_SIZE] = std::array::from_fn(|i| (i % 3) as i8 - 1);
        let fc: [i8; WT_FC_SIZE] = std::array::from_fn(|i| (i % 11) as i8 - 5);

        let mut k = ReferenceKernels;
        let mut c1 = [0i32; CONV1_OFM_SIZE];
        let mut p1 = [0i8; POOL1_OFM_SIZE];
        let mut c2 = [0i32; CONV2_OFM_SIZE];
        let mut p2 = [0i8; POOL2_OFM_SIZE];
        let mut scores = [0i32; FC_DEPTH];
        k.conv1(&image, &w1, &mut c1);
        k.clamp(&mut c1);
        k.pool1(&c1, &mut p1);
        k.conv2(&p1, &w2, &mut c2);
        k.clamp(&mut c2);
        k.pool2(&c2, &mut p2);
        k.fully_connected(&p2, &fc, &mut scores);

        let golden = reference::forward(&w1[..150], &w2, &fc, &image);
        assert_eq!(&c1[..], &golden.conv1[..]);
        assert_eq!(&p2[..], &golden.pool2[..]);
        assert_eq!(scores, golden.scores);
    }

    #[test]
    fn test_default_clamp_saturates() {
        let mut v = [300, -300, 5];
        ReferenceKernels.clamp(&mut v);
        assert_eq!(v, [127, -128, 5]);
    }
}
