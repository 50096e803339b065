// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Feature-map shape descriptors.

use crate::DType;
use std::fmt;

/// Describes a square, multi-channel feature map (`dim × dim × depth`).
///
/// Data is stored channel-major: all `dim × dim` positions of channel 0,
/// then channel 1, and so on. All constructors are `const` so the fixed
/// topology can be expressed as compile-time constants.
///
/// # Examples
/// ```
/// use quant_core::{DType, FeatureShape};
/// let s = FeatureShape::new(28, 6);
/// assert_eq!(s.num_elements(), 4704);
/// assert_eq!(s.size_bytes(DType::I32), 18816);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FeatureShape {
    /// Spatial width and height.
    pub dim: usize,
    /// Number of channels.
    pub depth: usize,
}

impl FeatureShape {
    /// Creates a shape of `dim × dim × depth`.
    pub const fn new(dim: usize, depth: usize) -> Self {
        Self { dim, depth }
    }

    /// Creates a flat vector shape (`1 × 1 × len`), used for FC outputs.
    pub const fn vector(len: usize) -> Self {
        Self { dim: 1, depth: len }
    }

    /// Number of positions in a single channel.
    pub const fn plane(&self) -> usize {
        self.dim * self.dim
    }

    /// Returns the total number of elements.
    pub const fn num_elements(&self) -> usize {
        self.plane() * self.depth
    }

    /// Returns the memory footprint in bytes for the given element type.
    pub const fn size_bytes(&self, dtype: DType) -> usize {
        self.num_elements() * dtype.size_bytes()
    }

    /// Output shape of a valid, stride-1 convolution with a
    /// `kernel_dim × kernel_dim` window producing `out_depth` channels.
    ///
    /// Returns `None` if the kernel does not fit the input.
    pub const fn conv_output(&self, kernel_dim: usize, out_depth: usize) -> Option<Self> {
        if kernel_dim == 0 || kernel_dim > self.dim {
            return None;
        }
        Some(Self::new(self.dim - kernel_dim + 1, out_depth))
    }

    /// Output shape of a non-overlapping `window × window` pooling.
    ///
    /// Returns `None` if the window does not tile the input exactly.
    pub const fn pooled(&self, window: usize) -> Option<Self> {
        if window == 0 || self.dim % window != 0 {
            return None;
        }
        Some(Self::new(self.dim / window, self.depth))
    }
}

impl fmt::Display for FeatureShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.dim, self.dim, self.depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_elements() {
        let s = FeatureShape::new(14, 6);
        assert_eq!(s.plane(), 196);
        assert_eq!(s.num_elements(), 1176);
    }

    #[test]
    fn test_vector_shape() {
        let s = FeatureShape::vector(10);
        assert_eq!(s.num_elements(), 10);
        assert_eq!(s.size_bytes(DType::I32), 40);
    }

    #[test]
    fn test_conv_output() {
        let img = FeatureShape::new(32, 1);
        assert_eq!(img.conv_output(5, 6), Some(FeatureShape::new(28, 6)));
        assert_eq!(img.conv_output(33, 6), None);
        assert_eq!(img.conv_output(0, 6), None);
    }

    #[test]
    fn test_pooled() {
        let s = FeatureShape::new(28, 6);
        assert_eq!(s.pooled(2), Some(FeatureShape::new(14, 6)));
        assert_eq!(FeatureShape::new(5, 16).pooled(2), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", FeatureShape::new(10, 16)), "10x10x16");
    }
}
