// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Free-running cycle counter.

use crate::regs::{COUNTER_CYCLES, COUNTER_RST};
use crate::RegisterBlock;

/// Capability to measure elapsed cycles.
pub trait CycleCounter {
    /// Restarts the count from zero.
    fn reset_cycles(&mut self);
    /// Cycles since the last reset, modulo 2^32.
    fn cycles(&mut self) -> u32;
}

/// A cycle counter behind a [`RegisterBlock`].
#[derive(Debug)]
pub struct RegisterCounter<R> {
    regs: R,
}

impl<R: RegisterBlock> RegisterCounter<R> {
    pub fn new(regs: R) -> Self {
        Self { regs }
    }
}

impl<R: RegisterBlock> CycleCounter for RegisterCounter<R> {
    fn reset_cycles(&mut self) {
        self.regs.write(COUNTER_RST, 0);
    }

    fn cycles(&mut self) -> u32 {
        self.regs.read(COUNTER_CYCLES)
    }
}
