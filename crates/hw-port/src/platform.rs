// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The complete hardware platform and the end-of-run handoff.

use crate::regs::{COUNTER_BASE, DMA_BASE, XCEL_BASE};
use crate::{
    AcceleratorPort, Conv3dJob, CycleCounter, DmaPort, LocalSpan, MmioRegisters,
    RegisterAccelerator, RegisterCounter, RegisterDma, TransferDescriptor,
};
use tracing::info;

/// Record of control leaving the driver.
///
/// On a bare-metal target control never comes back; a hosted platform
/// returns this so the caller can report where execution would resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Handoff {
    pub resume_address: u32,
}

/// Everything the driver needs from the hardware.
pub trait Platform: DmaPort + AcceleratorPort + CycleCounter {
    /// Hands control to `entry`. Called exactly once, after the report.
    fn resume_external(&mut self, entry: u32) -> Handoff;
}

/// Base addresses of the three devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeviceBases {
    pub counter: usize,
    pub dma: usize,
    pub accelerator: usize,
}

impl Default for DeviceBases {
    fn default() -> Self {
        Self {
            counter: COUNTER_BASE,
            dma: DMA_BASE,
            accelerator: XCEL_BASE,
        }
    }
}

/// The real SoC, reached through volatile MMIO.
#[derive(Debug)]
pub struct MmioPlatform {
    dma: RegisterDma<MmioRegisters>,
    accel: RegisterAccelerator<MmioRegisters>,
    counter: RegisterCounter<MmioRegisters>,
}

impl MmioPlatform {
    /// # Safety
    /// Each base must address the corresponding mapped device, and nothing
    /// else may drive those devices while the platform exists.
    pub unsafe fn new(bases: DeviceBases) -> Self {
        Self {
            dma: RegisterDma::new(MmioRegisters::new(bases.dma)),
            accel: RegisterAccelerator::new(MmioRegisters::new(bases.accelerator)),
            counter: RegisterCounter::new(MmioRegisters::new(bases.counter)),
        }
    }
}

impl DmaPort for MmioPlatform {
    fn execute(&mut self, desc: &TransferDescriptor, local: LocalSpan<'_>) {
        self.dma.execute(desc, local);
    }
}

impl AcceleratorPort for MmioPlatform {
    fn offload_conv3d(&mut self, job: &Conv3dJob) {
        self.accel.offload_conv3d(job);
    }
}

impl CycleCounter for MmioPlatform {
    fn reset_cycles(&mut self) {
        self.counter.reset_cycles();
    }

    fn cycles(&mut self) -> u32 {
        self.counter.cycles()
    }
}

impl Platform for MmioPlatform {
    fn resume_external(&mut self, entry: u32) -> Handoff {
        info!(entry = format_args!("0x{entry:08x}"), "Resuming external entry point");
        #[cfg(target_os = "none")]
        {
            // SAFETY: `entry` is the boot monitor's reset vector, which never
            // returns and does not rely on any driver state.
            let jump: extern "C" fn() -> ! = unsafe { core::mem::transmute(entry as usize) };
            jump()
        }
        #[cfg(not(target_os = "none"))]
        {
            Handoff {
                resume_address: entry,
            }
        }
    }
}
