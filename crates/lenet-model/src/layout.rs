// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Default external-memory layout for the LeNet artifacts.

use crate::topology::{
    CONV1_OFM_SIZE, CONV2_OFM_SIZE, IMG_SIZE, LABEL_CAPACITY, POOL1_OFM_SIZE, WT_CONV1_SIZE,
    WT_CONV2_SIZE, WT_FC_SIZE,
};
use memory_map::{ByteSize, MemoryMap, MemoryMapError, RegionKind};
use quant_core::{align4, DType};

/// Boot monitor entry point control returns to after a run.
pub const RESUME_ADDRESS: u32 = 0x4000_0000;

/// Default external memory size.
pub const DEFAULT_EXTERNAL_SIZE: ByteSize = ByteSize::from_mb(1);

/// Minimum label transfer, in bytes.
pub const MIN_LABEL_BYTES: usize = 4;

/// Bytes staged from the label region for a run over `num_images`: at least
/// one word, rounded up to whole words.
pub const fn label_bytes(num_images: usize) -> usize {
    let n = if num_images < MIN_LABEL_BYTES {
        MIN_LABEL_BYTES
    } else {
        num_images
    };
    align4(n)
}

/// Region sizes of the default layout, in canonical order.
pub fn default_regions() -> [(RegionKind, u32); 7] {
    // The largest maps ever staged through the accelerator scratch regions:
    // pool1 (or the image) as input, conv1 as raw int32 output.
    let ifm_scratch = POOL1_OFM_SIZE.max(IMG_SIZE);
    let ofm_scratch = CONV1_OFM_SIZE.max(CONV2_OFM_SIZE) * DType::I32.size_bytes();
    [
        (RegionKind::Conv1Weights, WT_CONV1_SIZE as u32),
        (RegionKind::Conv2Weights, WT_CONV2_SIZE as u32),
        (RegionKind::FcWeights, WT_FC_SIZE as u32),
        (RegionKind::Labels, label_bytes(LABEL_CAPACITY) as u32),
        (RegionKind::Images, (LABEL_CAPACITY * IMG_SIZE) as u32),
        (RegionKind::IfmScratch, ifm_scratch as u32),
        (RegionKind::OfmScratch, ofm_scratch as u32),
    ]
}

/// Builds the default layout: every region packed on a 4 KiB boundary in
/// [`DEFAULT_EXTERNAL_SIZE`] bytes of external memory.
pub fn default_memory_map() -> Result<MemoryMap, MemoryMapError> {
    default_regions()
        .into_iter()
        .fold(
            MemoryMap::builder(DEFAULT_EXTERNAL_SIZE).resume_address(RESUME_ADDRESS),
            |b, (kind, len)| b.region(kind, len),
        )
        .build()
}

/// Smallest usable size of each region. The image region needs one slot;
/// how many images a run may use is checked against its real capacity.
pub fn minimum_regions() -> [(RegionKind, u32); 7] {
    default_regions().map(|(kind, len)| match kind {
        RegionKind::Images => (kind, IMG_SIZE as u32),
        _ => (kind, len),
    })
}

/// Checks that `map` is valid, contains every region, and that each region
/// meets its [`minimum_regions`] size.
pub fn check_memory_map(map: &MemoryMap) -> Result<(), crate::ModelError> {
    map.validate_complete(&RegionKind::ALL)?;
    for (kind, len) in minimum_regions() {
        let available = map.require(kind)?.len as usize;
        if available < len as usize {
            return Err(crate::ModelError::RegionTooSmall {
                artifact: kind.as_str(),
                needed: len as usize,
                available,
            });
        }
    }
    Ok(())
}
