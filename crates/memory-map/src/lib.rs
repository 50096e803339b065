// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # memory-map
//!
//! Describes where every artifact lives in the external memory (DDR) that
//! the DMA engine and the accelerator address.
//!
//! # Key Components
//!
//! - [`ByteSize`]: human-readable sizes (`"16M"`, `"4K"`) for configuration.
//! - [`ExtAddr`]: a byte address in external memory, convertible to the
//!   word address the devices expect.
//! - [`Region`] / [`RegionKind`]: one contiguous, word-aligned span per
//!   artifact (weights, labels, images, accelerator scratch).
//! - [`MemoryMap`]: the full layout, validated before any hardware access.
//!
//! # Layout
//!
//! ```text
//!  0x0000_0000 ┌──────────────────┐
//!              │ conv1 weights    │
//!              ├──────────────────┤
//!              │ conv2 weights    │
//!              ├──────────────────┤
//!              │ fc weights       │
//!              ├──────────────────┤
//!              │ labels           │
//!              ├──────────────────┤
//!              │ test images      │  N × IMG_SIZE
//!              ├──────────────────┤
//!              │ accel IFM scratch│
//!              ├──────────────────┤
//!              │ accel OFM scratch│
//!  size        └──────────────────┘
//! ```
//!
//! # Example
//! ```
//! use memory_map::{ByteSize, MemoryMap, RegionKind};
//!
//! let map = MemoryMap::builder(ByteSize::parse("1M").unwrap())
//!     .region(RegionKind::Conv1Weights, 152)
//!     .region(RegionKind::Images, 4096)
//!     .build()
//!     .unwrap();
//! let images = map.region(RegionKind::Images).unwrap();
//! assert_eq!(images.base.words() * 4, images.base.get());
//! ```

mod addr;
mod error;
mod map;
mod region;
mod size;

pub use addr::ExtAddr;
pub use error::MemoryMapError;
pub use map::{MemoryMap, MemoryMapBuilder, DEFAULT_REGION_ALIGN};
pub use region::{Region, RegionKind};
pub use size::ByteSize;
