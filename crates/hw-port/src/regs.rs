// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Register offsets and default device base addresses.
//!
//! ```text
//! 0x8000_0000  cycle counter   RST, CYCLES
//! 0x8000_1000  DMA engine      DIR, SRC, DST, LEN, START, DONE
//! 0x8000_2000  conv3d accel    IFM, WT, OFM, dims, START, DONE
//! ```
//!
//! Offsets are byte offsets from the device base; every register is one
//! 32-bit word.

// ── Default bases ────────────────────────────────────────────────────────────

pub const COUNTER_BASE: usize = 0x8000_0000;
pub const DMA_BASE: usize = 0x8000_1000;
pub const XCEL_BASE: usize = 0x8000_2000;

// ── Cycle counter ────────────────────────────────────────────────────────────

/// Writing any value restarts the count from zero.
pub const COUNTER_RST: usize = 0x00;
/// Cycles since the last reset. Wraps at 2^32.
pub const COUNTER_CYCLES: usize = 0x04;

// ── DMA engine ───────────────────────────────────────────────────────────────

/// Transfer direction: 0 = external → local, 1 = local → external.
pub const DMA_DIR: usize = 0x00;
/// Source word address.
pub const DMA_SRC: usize = 0x04;
/// Destination word address.
pub const DMA_DST: usize = 0x08;
/// Length in words.
pub const DMA_LEN: usize = 0x0c;
/// Write 1 to start.
pub const DMA_START: usize = 0x10;
/// Non-zero once the transfer has completed.
pub const DMA_DONE: usize = 0x14;

// ── Convolution accelerator ──────────────────────────────────────────────────

/// Input feature map word address (external memory).
pub const XCEL_IFM_ADDR: usize = 0x00;
/// Weight word address (external memory).
pub const XCEL_WT_ADDR: usize = 0x04;
/// Output feature map word address (external memory).
pub const XCEL_OFM_ADDR: usize = 0x08;
pub const XCEL_IFM_DIM: usize = 0x0c;
pub const XCEL_IFM_DEPTH: usize = 0x10;
pub const XCEL_WT_DIM: usize = 0x14;
pub const XCEL_OFM_DIM: usize = 0x18;
pub const XCEL_OFM_DEPTH: usize = 0x1c;
/// Write 1 to start.
pub const XCEL_START: usize = 0x20;
/// Non-zero once the output map is fully written.
pub const XCEL_DONE: usize = 0x24;
