// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! DMA transfer engine.
//!
//! A transfer is a blocking bulk copy between external memory and a local
//! scratch buffer. Addresses and lengths are given to the engine in 32-bit
//! words:
//!
//! ```text
//!   DIR ← direction   SRC ← source   DST ← destination   LEN ← words
//!   START ← 1
//!   while DONE == 0 { spin }
//! ```
//!
//! There is no timeout, interrupt or cancellation, and at most one transfer
//! is in flight.

use crate::regs::{DMA_DIR, DMA_DONE, DMA_DST, DMA_LEN, DMA_SRC, DMA_START};
use crate::RegisterBlock;
use memory_map::ExtAddr;
use quant_core::WORD_BYTES;

/// Which way data flows relative to local memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u32)]
pub enum Direction {
    /// External memory → local scratch.
    Inbound = 0,
    /// Local scratch → external memory.
    Outbound = 1,
}

impl Direction {
    /// Value written to the DIR register.
    pub const fn bit(self) -> u32 {
        self as u32
    }

    /// Decodes a DIR register value; any non-zero value means outbound.
    pub const fn from_bit(bit: u32) -> Self {
        if bit == 0 {
            Direction::Inbound
        } else {
            Direction::Outbound
        }
    }
}

/// The local side of a transfer, carrying the direction in its mutability.
#[derive(Debug)]
pub enum LocalSpan<'a> {
    /// Destination of an inbound transfer.
    Inbound(&'a mut [u8]),
    /// Source of an outbound transfer.
    Outbound(&'a [u8]),
}

impl LocalSpan<'_> {
    pub fn direction(&self) -> Direction {
        match self {
            LocalSpan::Inbound(_) => Direction::Inbound,
            LocalSpan::Outbound(_) => Direction::Outbound,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            LocalSpan::Inbound(b) => b.len(),
            LocalSpan::Outbound(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Word address of the first local byte, as the engine sees it.
    pub fn word_addr(&self) -> u32 {
        let ptr = match self {
            LocalSpan::Inbound(b) => b.as_ptr(),
            LocalSpan::Outbound(b) => b.as_ptr(),
        };
        local_word_addr(ptr)
    }
}

/// Word address of a local pointer. Local memory sits in the low 4 GiB of
/// the processor address space, so the truncation is exact on target.
pub fn local_word_addr(ptr: *const u8) -> u32 {
    ((ptr as usize) >> 2) as u32
}

/// The four configuration words of one transfer, in engine units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferDescriptor {
    pub direction: Direction,
    /// Source word address.
    pub source: u32,
    /// Destination word address.
    pub destination: u32,
    /// Length in words.
    pub len_words: u32,
}

impl TransferDescriptor {
    /// Describes a transfer between `external` and `local`.
    ///
    /// # Panics
    /// Panics if either side is not word aligned or the span is not a whole
    /// number of words.
    pub fn new(external: ExtAddr, local: &LocalSpan<'_>) -> Self {
        assert!(
            external.is_word_aligned(),
            "DMA external address {external} is not word aligned"
        );
        assert!(
            local.len() % WORD_BYTES == 0,
            "DMA span of {} bytes is not a whole number of words",
            local.len()
        );
        let local_ptr = match local {
            LocalSpan::Inbound(b) => b.as_ptr(),
            LocalSpan::Outbound(b) => b.as_ptr(),
        };
        assert!(
            local_ptr as usize % WORD_BYTES == 0 || local.is_empty(),
            "DMA local buffer is not word aligned"
        );

        let ext = external.words();
        let loc = local.word_addr();
        let len_words = (local.len() / WORD_BYTES) as u32;
        match local.direction() {
            Direction::Inbound => Self {
                direction: Direction::Inbound,
                source: ext,
                destination: loc,
                len_words,
            },
            Direction::Outbound => Self {
                direction: Direction::Outbound,
                source: loc,
                destination: ext,
                len_words,
            },
        }
    }

    /// External-memory word address, whichever side it is on.
    pub const fn external_words(&self) -> u32 {
        match self.direction {
            Direction::Inbound => self.source,
            Direction::Outbound => self.destination,
        }
    }

    /// Local word address, whichever side it is on.
    pub const fn local_words(&self) -> u32 {
        match self.direction {
            Direction::Inbound => self.destination,
            Direction::Outbound => self.source,
        }
    }
}

/// Runs one transfer through the register protocol and blocks until the
/// engine reports completion. Returns the number of DONE polls.
pub fn program<R: RegisterBlock + ?Sized>(regs: &mut R, desc: &TransferDescriptor) -> u32 {
    regs.write(DMA_DIR, desc.direction.bit());
    regs.write(DMA_SRC, desc.source);
    regs.write(DMA_DST, desc.destination);
    regs.write(DMA_LEN, desc.len_words);
    regs.write(DMA_START, 1);

    let mut polls = 1;
    while regs.read(DMA_DONE) == 0 {
        std::hint::spin_loop();
        polls += 1;
    }
    polls
}

/// Capability to move data between external memory and local buffers.
///
/// Implementors provide [`DmaPort::execute`]; callers use the provided
/// helpers, which validate alignment and skip zero-length transfers.
pub trait DmaPort {
    /// Performs one non-empty, validated transfer. `local` is the buffer
    /// the descriptor's local address refers to.
    fn execute(&mut self, desc: &TransferDescriptor, local: LocalSpan<'_>);

    /// Blocking transfer between `external` and `local`. A zero-length span
    /// returns immediately without touching the engine.
    fn transfer(&mut self, external: ExtAddr, local: LocalSpan<'_>) {
        if local.is_empty() {
            return;
        }
        let desc = TransferDescriptor::new(external, &local);
        self.execute(&desc, local);
    }

    /// Copies `dst.len()` bytes from external memory into `dst`.
    fn read_external(&mut self, src: ExtAddr, dst: &mut [u8]) {
        self.transfer(src, LocalSpan::Inbound(dst));
    }

    /// Copies all of `src` out to external memory at `dst`.
    fn write_external(&mut self, src: &[u8], dst: ExtAddr) {
        self.transfer(dst, LocalSpan::Outbound(src));
    }
}

/// A DMA engine driven through a [`RegisterBlock`].
///
/// The engine itself reads and writes local memory at the descriptor's
/// addresses, so `execute` only programs registers.
#[derive(Debug)]
pub struct RegisterDma<R> {
    regs: R,
}

impl<R: RegisterBlock> RegisterDma<R> {
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    pub fn into_inner(self) -> R {
        self.regs
    }
}

impl<R: RegisterBlock> DmaPort for RegisterDma<R> {
    fn execute(&mut self, desc: &TransferDescriptor, _local: LocalSpan<'_>) {
        program(&mut self.regs, desc);
    }
}
