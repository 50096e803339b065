// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # quant-core
//!
//! Fixed-point building blocks for the quantized LeNet driver.
//!
//! This crate provides:
//! - [`WordAligned`]: a word-aligned wrapper for fixed-size arrays, so every
//!   buffer the DMA engine touches starts on a 32-bit boundary.
//! - [`FeatureShape`]: square feature-map descriptors (`dim × dim × depth`).
//! - [`DType`]: the two element widths the pipeline moves between (i8, i32).
//! - Core operations: saturating clamp, checksums, argmax, and reference
//!   convolution / max-pool / fully-connected kernels.
//!
//! # Design Goals
//! - No heap allocation: every operation writes into a caller-owned slice.
//! - No floating point anywhere.
//! - Shape mismatches are programming errors and panic; only conversions from
//!   untrusted host data return [`TensorError`].

mod buffer;
mod dtype;
mod error;
mod ops;
mod shape;

pub use buffer::{align4, I32Buffer, I8Buffer, WordAligned, WORD_BYTES};
pub use dtype::DType;
pub use error::TensorError;
pub use ops::{
    argmax, checksum_i32, checksum_i8, clamp, conv3d, fully_connected, max_pool, saturate_i8,
    Conv3dParams, I8_MAX, I8_MIN,
};
pub use shape::FeatureShape;
