// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Register access abstraction.

/// A block of 32-bit device registers addressed by byte offset.
///
/// Reads take `&mut self`: a status read may have side effects on the
/// device (and does in the simulator).
pub trait RegisterBlock {
    fn write(&mut self, offset: usize, value: u32);
    fn read(&mut self, offset: usize) -> u32;
}

impl<R: RegisterBlock + ?Sized> RegisterBlock for &mut R {
    fn write(&mut self, offset: usize, value: u32) {
        (**self).write(offset, value)
    }

    fn read(&mut self, offset: usize) -> u32 {
        (**self).read(offset)
    }
}

/// Memory-mapped registers accessed with volatile loads and stores.
#[derive(Debug)]
pub struct MmioRegisters {
    base: usize,
}

impl MmioRegisters {
    /// # Safety
    /// `base` must be the address of a mapped device register block that no
    /// other code accesses concurrently, and every offset used with it must
    /// name a valid 32-bit register.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    pub const fn base(&self) -> usize {
        self.base
    }
}

impl RegisterBlock for MmioRegisters {
    #[inline(always)]
    fn write(&mut self, offset: usize, value: u32) {
        // SAFETY: guaranteed by the contract of `MmioRegisters::new`.
        unsafe { ((self.base + offset) as *mut u32).write_volatile(value) }
    }

    #[inline(always)]
    fn read(&mut self, offset: usize) -> u32 {
        // SAFETY: guaranteed by the contract of `MmioRegisters::new`.
        unsafe { ((self.base + offset) as *const u32).read_volatile() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mmio_over_plain_memory() {
        let mut backing = [0u32; 4];
        let base = backing.as_mut_ptr() as usize;
        // SAFETY: `backing` outlives `regs` and is only touched through it.
        let mut regs = unsafe { MmioRegisters::new(base) };
        regs.write(0x08, 0xdead_beef);
        assert_eq!(regs.read(0x08), 0xdead_beef);
        assert_eq!(regs.read(0x00), 0);
        assert_eq!(regs.base(), base);
        drop(regs);
        assert_eq!(backing[2], 0xdead_beef);
    }
}
