// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for buffer conversions.

/// Errors raised when host data is loaded into fixed-size buffers.
///
/// Kernel shape mismatches are not represented here: the topology is fixed
/// at build time, so those are asserted instead.
#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    /// The provided data does not match the buffer's element count.
    #[error("buffer size mismatch: expected {expected} elements, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },
}
