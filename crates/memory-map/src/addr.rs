// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Byte and word addressing of external memory.

use std::fmt;

/// A byte address in external memory.
///
/// The DMA engine and the accelerator take word addresses; [`ExtAddr::words`]
/// performs the `>> 2` conversion. Only word-aligned addresses may be handed
/// to a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ExtAddr(u32);

impl ExtAddr {
    /// The first byte of external memory.
    pub const ZERO: Self = Self(0);

    /// Wraps a byte address.
    pub const fn new(byte_addr: u32) -> Self {
        Self(byte_addr)
    }

    /// Returns the byte address.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the word address as written to device registers.
    ///
    /// # Panics
    /// Panics in debug builds if the address is not word aligned.
    pub const fn words(self) -> u32 {
        debug_assert!(self.is_word_aligned(), "word address of unaligned byte address");
        self.0 >> 2
    }

    /// Returns `true` if the address sits on a 32-bit boundary.
    pub const fn is_word_aligned(self) -> bool {
        self.0 & 3 == 0
    }

    /// Returns the address `bytes` further on, or `None` on overflow.
    pub const fn checked_add(self, bytes: u32) -> Option<Self> {
        match self.0.checked_add(bytes) {
            Some(a) => Some(Self(a)),
            None => None,
        }
    }

    /// Rounds up to the next multiple of `align` (a power of two).
    pub const fn align_up(self, align: u32) -> Option<Self> {
        match self.0.checked_add(align - 1) {
            Some(a) => Some(Self(a & !(align - 1))),
            None => None,
        }
    }
}

impl fmt::Display for ExtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}
