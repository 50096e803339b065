// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Named spans of external memory.

use crate::ExtAddr;
use std::fmt;

/// The artifact a [`Region`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    /// First convolution weights, int8.
    Conv1Weights,
    /// Second convolution weights, int8.
    Conv2Weights,
    /// Fully-connected weights, int8.
    FcWeights,
    /// Ground-truth labels, one int8 per image.
    Labels,
    /// Test images, one fixed-size slot per image.
    Images,
    /// Accelerator input feature-map scratch.
    IfmScratch,
    /// Accelerator output feature-map scratch (raw int32 accumulators).
    OfmScratch,
}

impl RegionKind {
    /// Every region kind, in canonical layout order.
    pub const ALL: [RegionKind; 7] = [
        RegionKind::Conv1Weights,
        RegionKind::Conv2Weights,
        RegionKind::FcWeights,
        RegionKind::Labels,
        RegionKind::Images,
        RegionKind::IfmScratch,
        RegionKind::OfmScratch,
    ];

    /// Returns the snake_case name used in configuration files.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RegionKind::Conv1Weights => "conv1_weights",
            RegionKind::Conv2Weights => "conv2_weights",
            RegionKind::FcWeights => "fc_weights",
            RegionKind::Labels => "labels",
            RegionKind::Images => "images",
            RegionKind::IfmScratch => "ifm_scratch",
            RegionKind::OfmScratch => "ofm_scratch",
        }
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A contiguous span `[base, base + len)` of external memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Region {
    pub kind: RegionKind,
    pub base: ExtAddr,
    /// Length in bytes.
    pub len: u32,
}

impl Region {
    pub const fn new(kind: RegionKind, base: ExtAddr, len: u32) -> Self {
        Self { kind, base, len }
    }

    /// One past the last byte. Computed in 64 bits so it cannot overflow.
    pub const fn end(&self) -> u64 {
        self.base.get() as u64 + self.len as u64
    }

    /// Returns `true` for a word-aligned base and a whole-word length.
    pub const fn is_word_aligned(&self) -> bool {
        self.base.is_word_aligned() && self.len % 4 == 0
    }

    /// Returns `true` if `addr` lies inside this region.
    pub const fn contains(&self, addr: ExtAddr) -> bool {
        addr.get() >= self.base.get() && (addr.get() as u64) < self.end()
    }

    /// Returns `true` if the two regions share at least one byte.
    pub const fn overlaps(&self, other: &Region) -> bool {
        self.len > 0
            && other.len > 0
            && (self.base.get() as u64) < other.end()
            && (other.base.get() as u64) < self.end()
    }

    /// Number of whole `slot_len`-byte slots that fit.
    pub const fn capacity(&self, slot_len: u32) -> u32 {
        if slot_len == 0 {
            0
        } else {
            self.len / slot_len
        }
    }

    /// Address of slot `index` when the region is an array of
    /// `slot_len`-byte records, or `None` if the slot does not fit.
    pub const fn slot(&self, index: u32, slot_len: u32) -> Option<ExtAddr> {
        if index >= self.capacity(slot_len) {
            return None;
        }
        self.base.checked_add(index * slot_len)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<14} {} .. 0x{:08x} ({} bytes)",
            self.kind.as_str(),
            self.base,
            self.end(),
            self.len
        )
    }
}
