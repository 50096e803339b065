// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for bundle loading and layout.

use memory_map::MemoryMapError;

/// Errors that can occur while loading or placing a model bundle.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The bundle file could not be read or written.
    #[error("bundle I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The SafeTensors container is malformed.
    #[error("failed to load SafeTensors: {0}")]
    SafeTensors(String),

    /// A required tensor is absent from the bundle.
    #[error("tensor not found: {name}")]
    TensorNotFound { name: String },

    /// A tensor is stored with an element type other than int8.
    #[error("tensor '{name}' has dtype {dtype}, expected I8")]
    WrongDType { name: String, dtype: String },

    /// A tensor's shape does not match the fixed topology.
    #[error("tensor '{name}' has shape {actual:?}, expected {expected:?}")]
    WrongShape {
        name: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// The bundle holds more images than the driver can label.
    #[error("bundle holds {count} images, capacity is {capacity}")]
    TooManyImages { count: usize, capacity: usize },

    /// A ground-truth label is outside the class range.
    #[error("label {label} of image {index} is not a valid class")]
    InvalidLabel { index: usize, label: i8 },

    /// An artifact does not fit its external-memory region.
    #[error("{artifact} needs {needed} bytes, region holds {available}")]
    RegionTooSmall {
        artifact: &'static str,
        needed: usize,
        available: usize,
    },

    /// The layer table does not chain.
    #[error("invalid layer chain: {0}")]
    InvalidChain(String),

    /// The memory map is invalid.
    #[error(transparent)]
    Layout(#[from] MemoryMapError),
}
