// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the driver.
//!
//! Only host-side setup fails: configuration, bundle files and the memory
//! layout. Hardware operations either complete or spin forever.

/// Errors raised while configuring or preparing a run.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// More images were requested than the driver can label.
    #[error("{requested} images requested, capacity is {capacity}")]
    TooManyImages { requested: usize, capacity: usize },

    /// More images were requested than the bundle provides.
    #[error("{requested} images requested, bundle holds {available}")]
    BundleTooSmall { requested: usize, available: usize },

    /// The external-memory layout is invalid.
    #[error("memory map error: {0}")]
    MemoryMapError(#[from] memory_map::MemoryMapError),

    /// Bundle loading or placement failed.
    #[error("model error: {0}")]
    ModelError(#[from] lenet_model::ModelError),
}
