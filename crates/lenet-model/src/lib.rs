// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # lenet-model
//!
//! The fixed network the driver runs, and the data it runs on.
//!
//! # Key Components
//!
//! - [`topology`]: every layer shape and buffer size as a compile-time
//!   constant, plus the [`LAYERS`] table describing the chain.
//! - [`layout`]: the default external-memory map for the artifacts.
//! - [`ModelBundle`]: weights, labels and test images, loaded from a
//!   `model.safetensors` file or generated deterministically.
//! - [`reference`]: a golden forward pass used to label synthetic data and
//!   to cross-check the driver.
//!
//! # Network
//!
//! ```text
//!  image 32x32x1 (i8)
//!    │ conv 5x5, 6 filters      → 28x28x6  (i32) → clamp
//!    │ max-pool 2x2             → 14x14x6  (i8)
//!    │ conv 5x5, 16 filters     → 10x10x16 (i32) → clamp
//!    │ max-pool 2x2             → 5x5x16   (i8)
//!    │ fully connected 400 → 10 → scores   (i32)
//!    ▼ argmax                   → label
//! ```

mod bundle;
mod error;
pub mod layout;
pub mod reference;
pub mod topology;

pub use bundle::{ModelBundle, TensorChecksum, BUNDLE_FILE};
pub use error::ModelError;
pub use topology::{LayerDef, LayerKind, LAYERS};
