// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! A simulated SoC for hosted runs and tests.
//!
//! External memory is a byte vector; the DMA engine and the accelerator
//! are register files driven by the same [`dma::program`] and
//! [`accel::program`] routines the MMIO backend uses. Writing START
//! performs the whole operation immediately; DONE then reads 0 for a
//! configurable number of polls before reading 1, and stays 1 until the
//! next START.
//!
//! A deterministic cost model advances the cycle counter:
//!
//! ```text
//!   register access        1 cycle
//!   DMA START              dma_setup_cycles + LEN words
//!   accelerator START      accel_setup_cycles + MACs / macs_per_cycle
//! ```

use crate::regs::{
    DMA_DIR, DMA_DONE, DMA_DST, DMA_LEN, DMA_SRC, DMA_START, XCEL_DONE, XCEL_IFM_ADDR,
    XCEL_IFM_DEPTH, XCEL_IFM_DIM, XCEL_OFM_ADDR, XCEL_OFM_DEPTH, XCEL_OFM_DIM, XCEL_START,
    XCEL_WT_ADDR, XCEL_WT_DIM,
};
use crate::{
    accel, dma, AcceleratorPort, Conv3dJob, CycleCounter, Direction, DmaPort, Handoff, LocalSpan,
    Platform, RegisterBlock, TransferDescriptor, TransferStats,
};
use quant_core::{conv3d, DType};
use std::ops::Range;
use tracing::{info, trace};

/// Latency and cost parameters of the simulated devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// DONE reads returning 0 after a DMA START.
    pub dma_latency_polls: u32,
    /// DONE reads returning 0 after an accelerator START.
    pub accel_latency_polls: u32,
    /// Fixed cycles charged per DMA transfer.
    pub dma_setup_cycles: u32,
    /// Fixed cycles charged per accelerator job.
    pub accel_setup_cycles: u32,
    /// Accelerator throughput. Zero is treated as one.
    pub macs_per_cycle: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dma_latency_polls: 2,
            accel_latency_polls: 16,
            dma_setup_cycles: 20,
            accel_setup_cycles: 40,
            macs_per_cycle: 32,
        }
    }
}

impl SimConfig {
    /// Devices that complete with no modelled latency or setup cost.
    pub fn instant() -> Self {
        Self {
            dma_latency_polls: 0,
            accel_latency_polls: 0,
            dma_setup_cycles: 0,
            accel_setup_cycles: 0,
            macs_per_cycle: 1,
        }
    }
}

const REG_SLOTS: usize = 16;

/// One device's registers plus its completion state.
#[derive(Debug, Default)]
struct RegisterFile {
    values: [u32; REG_SLOTS],
    written: u32,
    busy_polls: u32,
    done: bool,
}

impl RegisterFile {
    fn slot(offset: usize) -> usize {
        assert!(
            offset % 4 == 0 && offset / 4 < REG_SLOTS,
            "register offset 0x{offset:x} out of range"
        );
        offset / 4
    }

    fn store(&mut self, offset: usize, value: u32) {
        let i = Self::slot(offset);
        self.values[i] = value;
        self.written |= 1 << i;
    }

    fn load(&self, offset: usize) -> u32 {
        self.values[Self::slot(offset)]
    }

    fn require_configured(&self, device: &str, offsets: &[usize]) {
        for &offset in offsets {
            assert!(
                self.written & (1 << Self::slot(offset)) != 0,
                "{device} started with unconfigured register 0x{offset:02x}"
            );
        }
    }

    fn begin(&mut self, latency_polls: u32) {
        self.done = false;
        self.busy_polls = latency_polls;
    }

    fn poll_done(&mut self) -> u32 {
        if !self.done {
            if self.busy_polls > 0 {
                self.busy_polls -= 1;
                return 0;
            }
            self.done = true;
        }
        1
    }
}

/// Simulated external memory, DMA engine, accelerator and cycle counter.
#[derive(Debug)]
pub struct SimulatedSoc {
    config: SimConfig,
    external: Vec<u8>,
    dma: RegisterFile,
    accel: RegisterFile,
    cycles: u32,
    stats: TransferStats,
    handoff: Option<Handoff>,
}

impl SimulatedSoc {
    /// Creates a SoC with `external_size` bytes of zeroed external memory.
    pub fn new(config: SimConfig, external_size: usize) -> Self {
        Self::with_external(config, vec![0; external_size])
    }

    /// Creates a SoC whose external memory is `image`.
    pub fn with_external(config: SimConfig, image: Vec<u8>) -> Self {
        info!(
            external_bytes = image.len(),
            dma_latency = config.dma_latency_polls,
            accel_latency = config.accel_latency_polls,
            "Simulated SoC created"
        );
        Self {
            config,
            external: image,
            dma: RegisterFile::default(),
            accel: RegisterFile::default(),
            cycles: 0,
            stats: TransferStats::default(),
            handoff: None,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// External memory contents.
    pub fn external(&self) -> &[u8] {
        &self.external
    }

    /// Mutable external memory, for preloading artifacts.
    pub fn external_mut(&mut self) -> &mut [u8] {
        &mut self.external
    }

    /// Device activity so far.
    pub fn stats(&self) -> &TransferStats {
        &self.stats
    }

    /// Where control was handed, once [`Platform::resume_external`] ran.
    pub fn handoff(&self) -> Option<Handoff> {
        self.handoff
    }

    fn tick(&mut self, cycles: u32) {
        self.cycles = self.cycles.wrapping_add(cycles);
    }

    fn external_range(&self, word_addr: u32, len_bytes: usize, what: &str) -> Range<usize> {
        let start = word_addr as usize * 4;
        let end = start + len_bytes;
        assert!(
            end <= self.external.len(),
            "{what} 0x{start:08x}..0x{end:08x} lies beyond external memory of {} bytes",
            self.external.len()
        );
        start..end
    }
}

// ── DMA engine ───────────────────────────────────────────────────────────────

/// The DMA register file for the duration of one transfer, bound to the
/// local buffer the descriptor points at.
struct SimDmaBus<'s, 'a> {
    soc: &'s mut SimulatedSoc,
    local: LocalSpan<'a>,
}

impl SimDmaBus<'_, '_> {
    fn start(&mut self) {
        let regs = &self.soc.dma;
        regs.require_configured("DMA", &[DMA_DIR, DMA_SRC, DMA_DST, DMA_LEN]);
        let direction = Direction::from_bit(regs.load(DMA_DIR));
        let src = regs.load(DMA_SRC);
        let dst = regs.load(DMA_DST);
        let len_words = regs.load(DMA_LEN);
        let len_bytes = len_words as usize * 4;

        assert_eq!(
            direction,
            self.local.direction(),
            "DMA direction does not match the local buffer"
        );
        assert!(
            len_bytes <= self.local.len(),
            "DMA length of {len_bytes} bytes exceeds the local buffer of {}",
            self.local.len()
        );
        let local_words = self.local.word_addr();

        match &mut self.local {
            LocalSpan::Inbound(buf) => {
                assert_eq!(dst, local_words, "DMA destination is not the local buffer");
                let range = self.soc.external_range(src, len_bytes, "DMA read");
                buf[..len_bytes].copy_from_slice(&self.soc.external[range]);
                self.soc.stats.record_inbound(len_words);
            }
            LocalSpan::Outbound(buf) => {
                assert_eq!(src, local_words, "DMA source is not the local buffer");
                let range = self.soc.external_range(dst, len_bytes, "DMA write");
                self.soc.external[range].copy_from_slice(&buf[..len_bytes]);
                self.soc.stats.record_outbound(len_words);
            }
        }

        let cost = self.soc.config.dma_setup_cycles.wrapping_add(len_words);
        self.soc.tick(cost);
        let latency = self.soc.config.dma_latency_polls;
        self.soc.dma.begin(latency);
        trace!(?direction, src, dst, len_words, cost, "DMA transfer");
    }
}

impl RegisterBlock for SimDmaBus<'_, '_> {
    fn write(&mut self, offset: usize, value: u32) {
        self.soc.tick(1);
        self.soc.dma.store(offset, value);
        if offset == DMA_START && value != 0 {
            self.start();
        }
    }

    fn read(&mut self, offset: usize) -> u32 {
        self.soc.tick(1);
        if offset == DMA_DONE {
            self.soc.stats.record_poll();
            return self.soc.dma.poll_done();
        }
        self.soc.dma.load(offset)
    }
}

impl DmaPort for SimulatedSoc {
    fn execute(&mut self, desc: &TransferDescriptor, local: LocalSpan<'_>) {
        let mut bus = SimDmaBus { soc: self, local };
        dma::program(&mut bus, desc);
    }
}

// ── Accelerator ──────────────────────────────────────────────────────────────

struct SimAccelBus<'s> {
    soc: &'s mut SimulatedSoc,
}

impl SimAccelBus<'_> {
    fn start(&mut self) {
        let regs = &self.soc.accel;
        regs.require_configured(
            "accelerator",
            &[
                XCEL_IFM_ADDR,
                XCEL_WT_ADDR,
                XCEL_OFM_ADDR,
                XCEL_IFM_DIM,
                XCEL_IFM_DEPTH,
                XCEL_WT_DIM,
                XCEL_OFM_DIM,
                XCEL_OFM_DEPTH,
            ],
        );
        let job = Conv3dJob {
            ifm: regs.load(XCEL_IFM_ADDR),
            weights: regs.load(XCEL_WT_ADDR),
            ofm: regs.load(XCEL_OFM_ADDR),
            ifm_dim: regs.load(XCEL_IFM_DIM),
            ifm_depth: regs.load(XCEL_IFM_DEPTH),
            weight_dim: regs.load(XCEL_WT_DIM),
            ofm_dim: regs.load(XCEL_OFM_DIM),
            ofm_depth: regs.load(XCEL_OFM_DEPTH),
        };
        let params = job.params();
        assert!(
            params.is_consistent(),
            "accelerator started with inconsistent geometry {params:?}"
        );

        let ifm = self
            .soc
            .external_range(job.ifm, params.ifm.num_elements(), "accelerator IFM");
        let wt = self
            .soc
            .external_range(job.weights, params.weight_len(), "accelerator weights");
        let ofm = self
            .soc
            .external_range(job.ofm, params.ofm.size_bytes(DType::I32), "accelerator OFM");

        let mut out = vec![0i32; params.ofm.num_elements()];
        {
            let input: &[i8] = bytemuck::cast_slice(&self.soc.external[ifm]);
            let weights: &[i8] = bytemuck::cast_slice(&self.soc.external[wt]);
            conv3d(&params, input, weights, &mut out);
        }
        for (dst, v) in self.soc.external[ofm].chunks_exact_mut(4).zip(&out) {
            dst.copy_from_slice(&v.to_ne_bytes());
        }

        let macs = params.macs();
        self.soc.stats.record_job(macs);
        let per_cycle = self.soc.config.macs_per_cycle.max(1) as usize;
        let compute = u32::try_from(macs / per_cycle).unwrap_or(u32::MAX);
        let cost = self.soc.config.accel_setup_cycles.wrapping_add(compute);
        self.soc.tick(cost);
        let latency = self.soc.config.accel_latency_polls;
        self.soc.accel.begin(latency);
        trace!(
            ifm = job.ifm,
            weights = job.weights,
            ofm = job.ofm,
            macs,
            cost,
            "Accelerator conv3d"
        );
    }
}

impl RegisterBlock for SimAccelBus<'_> {
    fn write(&mut self, offset: usize, value: u32) {
        self.soc.tick(1);
        self.soc.accel.store(offset, value);
        if offset == XCEL_START && value != 0 {
            self.start();
        }
    }

    fn read(&mut self, offset: usize) -> u32 {
        self.soc.tick(1);
        if offset == XCEL_DONE {
            self.soc.stats.record_poll();
            return self.soc.accel.poll_done();
        }
        self.soc.accel.load(offset)
    }
}

impl AcceleratorPort for SimulatedSoc {
    fn offload_conv3d(&mut self, job: &Conv3dJob) {
        let mut bus = SimAccelBus { soc: self };
        accel::program(&mut bus, job);
    }
}

// ── Counter and handoff ──────────────────────────────────────────────────────

impl CycleCounter for SimulatedSoc {
    fn reset_cycles(&mut self) {
        self.cycles = 0;
    }

    fn cycles(&mut self) -> u32 {
        self.cycles
    }
}

impl Platform for SimulatedSoc {
    fn resume_external(&mut self, entry: u32) -> Handoff {
        info!(entry = format_args!("0x{entry:08x}"), "Simulated handoff");
        let handoff = Handoff {
            resume_address: entry,
        };
        self.handoff = Some(handoff);
        handoff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memory_map::ExtAddr;
    use quant_core::{Conv3dParams, FeatureShape, I32Buffer, I8Buffer};

    fn soc_with_pattern(config: SimConfig, size: usize) -> SimulatedSoc {
        let image: Vec<u8> = (0..size).map(|i| (i * 31 % 251) as u8).collect();
        SimulatedSoc::with_external(config, image)
    }

    #[test]
    fn test_full_size_inbound_transfer() {
        let mut soc = soc_with_pattern(SimConfig::default(), 0x4000);
        let mut buf: I8Buffer<1024> = I8Buffer::zeroed();
        soc.read_external(ExtAddr::new(0x1000), buf.as_bytes_mut());
        assert_eq!(buf.as_bytes(), &soc.external()[0x1000..0x1400]);
        assert_eq!(soc.stats().inbound_transfers, 1);
        assert_eq!(soc.stats().inbound_words, 256);
    }

    #[test]
    fn test_outbound_transfer() {
        let mut soc = SimulatedSoc::new(SimConfig::default(), 0x100);
        let mut buf: I8Buffer<8> = I8Buffer::zeroed();
        buf.copy_from(&[1, 2, 3, 4, -1, -2, -3, -4]).unwrap();
        soc.write_external(buf.as_bytes(), ExtAddr::new(0x40));
        assert_eq!(&soc.external()[0x40..0x48], buf.as_bytes());
        assert_eq!(soc.stats().outbound_words, 2);
    }

    #[test]
    fn test_zero_length_transfer_is_free() {
        let mut soc = soc_with_pattern(SimConfig::default(), 0x100);
        soc.reset_cycles();
        let mut empty: [u8; 0] = [];
        soc.read_external(ExtAddr::new(0x10), &mut empty);
        soc.write_external(&[], ExtAddr::new(0x10));
        assert_eq!(soc.cycles(), 0);
        assert_eq!(*soc.stats(), TransferStats::default());
    }

    #[test]
    fn test_poll_latency() {
        let config = SimConfig {
            dma_latency_polls: 3,
            ..SimConfig::instant()
        };
        let mut soc = SimulatedSoc::new(config, 0x100);
        let mut buf: I8Buffer<4> = I8Buffer::zeroed();
        soc.read_external(ExtAddr::ZERO, buf.as_bytes_mut());
        assert_eq!(soc.stats().poll_reads, 4);
    }

    #[test]
    fn test_dma_cycle_cost() {
        let config = SimConfig {
            dma_setup_cycles: 10,
            ..SimConfig::instant()
        };
        let mut soc = SimulatedSoc::new(config, 0x1000);
        let mut buf: I8Buffer<1024> = I8Buffer::zeroed();
        soc.reset_cycles();
        soc.read_external(ExtAddr::ZERO, buf.as_bytes_mut());
        // 5 register writes, 1 DONE read, setup, 256 words.
        assert_eq!(soc.cycles(), 5 + 1 + 10 + 256);
    }

    #[test]
    fn test_done_stays_set_until_next_start() {
        let mut soc = SimulatedSoc::new(SimConfig::instant(), 0x100);
        let mut buf: I8Buffer<4> = I8Buffer::zeroed();
        soc.read_external(ExtAddr::ZERO, buf.as_bytes_mut());
        assert_eq!(soc.dma.poll_done(), 1);
        assert_eq!(soc.dma.poll_done(), 1);
        soc.dma.begin(1);
        assert_eq!(soc.dma.poll_done(), 0);
        assert_eq!(soc.dma.poll_done(), 1);
    }

    #[test]
    #[should_panic(expected = "beyond external memory")]
    fn test_out_of_range_transfer_panics() {
        let mut soc = SimulatedSoc::new(SimConfig::instant(), 0x100);
        let mut buf: I8Buffer<8> = I8Buffer::zeroed();
        soc.read_external(ExtAddr::new(0xfc), buf.as_bytes_mut());
    }

    #[test]
    #[should_panic(expected = "unconfigured register")]
    fn test_start_with_unconfigured_registers_panics() {
        let mut soc = SimulatedSoc::new(SimConfig::instant(), 0x100);
        let mut bus = SimAccelBus { soc: &mut soc };
        bus.write(XCEL_IFM_ADDR, 0);
        bus.write(XCEL_START, 1);
    }

    #[test]
    fn test_accelerator_matches_software_conv() {
        let params = Conv3dParams::new(FeatureShape::new(14, 6), 5, 16);
        let ifm_len = params.ifm.num_elements();
        let wt_len = params.weight_len();
        let mut soc = SimulatedSoc::new(SimConfig::default(), 0x4000);
        let input: Vec<i8> = (0..ifm_len).map(|i| (i % 13) as i8 - 6).collect();
        let weights: Vec<i8> = (0..wt_len).map(|i| (i % 7) as i8 - 3).collect();
        soc.external_mut()[0..ifm_len].copy_from_slice(bytemuck::cast_slice(&input[..]));
        soc.external_mut()[0x1000..0x1000 + wt_len].copy_from_slice(bytemuck::cast_slice(&weights[..]));

        let job = Conv3dJob::new(ExtAddr::ZERO, ExtAddr::new(0x1000), ExtAddr::new(0x2000), &params);
        soc.offload_conv3d(&job);

        let mut hw: I32Buffer<1600> = I32Buffer::zeroed();
        soc.read_external(ExtAddr::new(0x2000), hw.as_bytes_mut());
        let mut sw = vec![0i32; 1600];
        conv3d(&params, &input, &weights, &mut sw);
        assert_eq!(&hw[..], &sw[..]);
        assert_eq!(soc.stats().accelerator_jobs, 1);
        assert_eq!(soc.stats().accelerator_macs, params.macs() as u64);
    }

    #[test]
    fn test_handoff_recorded() {
        let mut soc = SimulatedSoc::new(SimConfig::instant(), 4);
        assert_eq!(soc.handoff(), None);
        let h = soc.resume_external(0x4000_0000);
        assert_eq!(h.resume_address, 0x4000_0000);
        assert_eq!(soc.handoff(), Some(h));
    }

    #[test]
    fn test_config_serde_defaults() {
        let c: SimConfig = serde_json::from_str(r#"{"dma_latency_polls": 9}"#).unwrap();
        assert_eq!(c.dma_latency_polls, 9);
        assert_eq!(c.macs_per_cycle, SimConfig::default().macs_per_cycle);
    }
}
