// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # hw-port
//!
//! The driver's view of the hardware: a DMA engine that moves words between
//! external memory and local scratch, a fixed-function 3-D convolution
//! accelerator, and a free-running cycle counter. All three are reached
//! through memory-mapped registers and a start/poll-done handshake.
//!
//! # Layers
//!
//! ```text
//!   Platform  (DmaPort + AcceleratorPort + CycleCounter + resume_external)
//!      │
//!      ├── MmioPlatform ──► RegisterDma / RegisterAccelerator ──► MmioRegisters
//!      │                         │ dma::program / accel::program
//!      │                         ▼
//!      └── SimulatedSoc ──► same routines over in-memory register files
//! ```
//!
//! The register protocol lives in exactly one place ([`dma::program`],
//! [`accel::program`]); both backends run it against a [`RegisterBlock`].
//!
//! Hardware operations do not fail: they complete or the caller spins
//! forever. Contract violations (unaligned spans, unconfigured registers
//! in the simulator) panic.

pub mod accel;
pub mod counter;
pub mod dma;
mod platform;
pub mod regs;
mod registers;
pub mod sim;
mod stats;

#[cfg(test)]
mod mock;

pub use accel::{AcceleratorPort, Conv3dJob, RegisterAccelerator};
pub use counter::{CycleCounter, RegisterCounter};
pub use dma::{Direction, DmaPort, LocalSpan, RegisterDma, TransferDescriptor};
pub use platform::{DeviceBases, Handoff, MmioPlatform, Platform};
pub use registers::{MmioRegisters, RegisterBlock};
pub use sim::{SimConfig, SimulatedSoc};
pub use stats::TransferStats;
