// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fixed-function 3-D convolution accelerator.
//!
//! The accelerator reads its input feature map and weights from external
//! memory and writes raw int32 accumulators back to external memory. The
//! driver configures it with word addresses and dimensions, starts it, and
//! polls for completion.

use crate::regs::{
    XCEL_DONE, XCEL_IFM_ADDR, XCEL_IFM_DEPTH, XCEL_IFM_DIM, XCEL_OFM_ADDR, XCEL_OFM_DEPTH,
    XCEL_OFM_DIM, XCEL_START, XCEL_WT_ADDR, XCEL_WT_DIM,
};
use crate::RegisterBlock;
use memory_map::ExtAddr;
use quant_core::{Conv3dParams, FeatureShape};

/// Register contents for one offloaded convolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Conv3dJob {
    /// Input feature map word address.
    pub ifm: u32,
    /// Weight word address.
    pub weights: u32,
    /// Output feature map word address.
    pub ofm: u32,
    pub ifm_dim: u32,
    pub ifm_depth: u32,
    pub weight_dim: u32,
    pub ofm_dim: u32,
    pub ofm_depth: u32,
}

impl Conv3dJob {
    /// Builds a job from byte addresses and layer geometry.
    ///
    /// # Panics
    /// Panics if an address is not word aligned.
    pub fn new(ifm: ExtAddr, weights: ExtAddr, ofm: ExtAddr, params: &Conv3dParams) -> Self {
        for (name, addr) in [("ifm", ifm), ("weights", weights), ("ofm", ofm)] {
            assert!(
                addr.is_word_aligned(),
                "accelerator {name} address {addr} is not word aligned"
            );
        }
        Self {
            ifm: ifm.words(),
            weights: weights.words(),
            ofm: ofm.words(),
            ifm_dim: params.ifm.dim as u32,
            ifm_depth: params.ifm.depth as u32,
            weight_dim: params.weight_dim as u32,
            ofm_dim: params.ofm.dim as u32,
            ofm_depth: params.ofm.depth as u32,
        }
    }

    /// The layer geometry encoded in this job.
    pub const fn params(&self) -> Conv3dParams {
        Conv3dParams {
            ifm: FeatureShape::new(self.ifm_dim as usize, self.ifm_depth as usize),
            weight_dim: self.weight_dim as usize,
            ofm: FeatureShape::new(self.ofm_dim as usize, self.ofm_depth as usize),
        }
    }
}

/// Programs the accelerator and blocks until it reports completion.
/// Returns the number of DONE polls.
pub fn program<R: RegisterBlock + ?Sized>(regs: &mut R, job: &Conv3dJob) -> u32 {
    regs.write(XCEL_IFM_ADDR, job.ifm);
    regs.write(XCEL_WT_ADDR, job.weights);
    regs.write(XCEL_OFM_ADDR, job.ofm);
    regs.write(XCEL_OFM_DIM, job.ofm_dim);
    regs.write(XCEL_OFM_DEPTH, job.ofm_depth);
    regs.write(XCEL_WT_DIM, job.weight_dim);
    regs.write(XCEL_IFM_DIM, job.ifm_dim);
    regs.write(XCEL_IFM_DEPTH, job.ifm_depth);
    regs.write(XCEL_START, 1);

    let mut polls = 1;
    while regs.read(XCEL_DONE) == 0 {
        std::hint::spin_loop();
        polls += 1;
    }
    polls
}

/// Capability to run a convolution on the accelerator.
pub trait AcceleratorPort {
    /// Blocking: on return the output region holds the full int32 map.
    fn offload_conv3d(&mut self, job: &Conv3dJob);
}

/// An accelerator driven through a [`RegisterBlock`].
#[derive(Debug)]
pub struct RegisterAccelerator<R> {
    regs: R,
}

impl<R: RegisterBlock> RegisterAccelerator<R> {
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    pub fn into_inner(self) -> R {
        self.regs
    }
}

impl<R: RegisterBlock> AcceleratorPort for RegisterAccelerator<R> {
    fn offload_conv3d(&mut self, job: &Conv3dJob) {
        program(&mut self.regs, job);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Access, RecordingRegisters};

    fn conv2_job() -> Conv3dJob {
        let params = Conv3dParams::new(FeatureShape::new(14, 6), 5, 16);
        Conv3dJob::new(
            ExtAddr::new(0x1_0000),
            ExtAddr::new(0x1000),
            ExtAddr::new(0x2_0000),
            &params,
        )
    }

    #[test]
    fn test_job_uses_word_addresses() {
        let job = conv2_job();
        assert_eq!(job.ifm, 0x4000);
        assert_eq!(job.weights, 0x400);
        assert_eq!(job.ofm, 0x8000);
        assert_eq!((job.ofm_dim, job.ofm_depth), (10, 16));
        assert_eq!(job.params(), Conv3dParams::new(FeatureShape::new(14, 6), 5, 16));
    }

    #[test]
    fn test_program_write_order() {
        let mut accel = RegisterAccelerator::new(RecordingRegisters::new(XCEL_DONE, 3));
        accel.offload_conv3d(&conv2_job());
        let regs = accel.into_inner();
        assert_eq!(
            regs.writes(),
            vec![
                (XCEL_IFM_ADDR, 0x4000),
                (XCEL_WT_ADDR, 0x400),
                (XCEL_OFM_ADDR, 0x8000),
                (XCEL_OFM_DIM, 10),
                (XCEL_OFM_DEPTH, 16),
                (XCEL_WT_DIM, 5),
                (XCEL_IFM_DIM, 14),
                (XCEL_IFM_DEPTH, 6),
                (XCEL_START, 1),
            ]
        );
        assert_eq!(regs.reads(), 4);
        assert_eq!(regs.log.last(), Some(&Access::Read(XCEL_DONE)));
    }

    #[test]
    #[should_panic(expected = "not word aligned")]
    fn test_job_rejects_unaligned() {
        let params = Conv3dParams::new(FeatureShape::new(4, 1), 1, 1);
        Conv3dJob::new(ExtAddr::new(1), ExtAddr::ZERO, ExtAddr::ZERO, &params);
    }
}
