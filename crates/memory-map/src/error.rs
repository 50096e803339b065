// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for external-memory layout handling.

use crate::RegionKind;

/// Errors raised while parsing sizes or validating a [`crate::MemoryMap`].
#[derive(Debug, thiserror::Error)]
pub enum MemoryMapError {
    /// A size string could not be parsed.
    #[error("invalid size '{0}': expected a number followed by an optional suffix (K, M, G)")]
    InvalidSize(String),

    /// A size is zero or does not fit the 32-bit address space.
    #[error("size out of range: {0}")]
    SizeOutOfRange(String),

    /// A region does not start on a word boundary, or its length is not a
    /// whole number of words.
    #[error("region {kind} is not word aligned (base 0x{base:08x}, len {len})")]
    Unaligned { kind: RegionKind, base: u32, len: u32 },

    /// A region extends past the end of external memory.
    #[error("region {kind} ends at 0x{end:08x}, beyond external memory size 0x{size:08x}")]
    OutOfBounds { kind: RegionKind, end: u64, size: u64 },

    /// Two regions share bytes.
    #[error("regions {first} and {second} overlap")]
    Overlap { first: RegionKind, second: RegionKind },

    /// The same region kind appears more than once.
    #[error("region {0} is defined more than once")]
    Duplicate(RegionKind),

    /// A required region is absent.
    #[error("region {0} is not defined")]
    MissingRegion(RegionKind),
}
