// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Execution plan: where each conv runs and where each artifact lives.

use crate::{RuntimeConfig, RuntimeError};
use lenet_model::layout::check_memory_map;
use lenet_model::topology::{IMG_SIZE, LABEL_CAPACITY};
use memory_map::{ExtAddr, MemoryMap, Region, RegionKind};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Where a convolution layer executes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvPath {
    /// On the processor, through [`crate::LayerKernels`].
    #[default]
    #[serde(alias = "sw")]
    Software,
    /// On the convolution accelerator.
    #[serde(alias = "hw")]
    Hardware,
}

impl ConvPath {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConvPath::Software => "software",
            ConvPath::Hardware => "hardware",
        }
    }
}

impl fmt::Display for ConvPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ConvPath {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "software" | "sw" => Ok(ConvPath::Software),
            "hardware" | "hw" => Ok(ConvPath::Hardware),
            other => Err(RuntimeError::ConfigError(format!(
                "unknown conv path '{other}'; expected 'software' or 'hardware'"
            ))),
        }
    }
}

/// The external-memory addresses the driver uses, resolved from a
/// validated [`MemoryMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalLayout {
    pub conv1_weights: ExtAddr,
    pub conv2_weights: ExtAddr,
    pub fc_weights: ExtAddr,
    pub labels: ExtAddr,
    pub images: Region,
    pub ifm_scratch: ExtAddr,
    pub ofm_scratch: ExtAddr,
    pub resume_address: u32,
}

impl ExternalLayout {
    /// Resolves every region after checking the map can hold the artifacts.
    pub fn from_map(map: &MemoryMap) -> Result<Self, RuntimeError> {
        check_memory_map(map)?;
        let base = |kind| map.require(kind).map(|r| r.base);
        Ok(Self {
            conv1_weights: base(RegionKind::Conv1Weights)?,
            conv2_weights: base(RegionKind::Conv2Weights)?,
            fc_weights: base(RegionKind::FcWeights)?,
            labels: base(RegionKind::Labels)?,
            images: *map.require(RegionKind::Images)?,
            ifm_scratch: base(RegionKind::IfmScratch)?,
            ofm_scratch: base(RegionKind::OfmScratch)?,
            resume_address: map.resume_address,
        })
    }

    /// Number of images the image region holds.
    pub fn image_capacity(&self) -> usize {
        self.images.capacity(IMG_SIZE as u32) as usize
    }

    /// External address of image `index`.
    ///
    /// # Panics
    /// Panics if the image lies outside the image region; plans are checked
    /// against the capacity when built.
    pub fn image(&self, index: usize) -> ExtAddr {
        u32::try_from(index)
            .ok()
            .and_then(|i| self.images.slot(i, IMG_SIZE as u32))
            .expect("image index within the image region")
    }
}

/// Everything fixed before the first image runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub conv1: ConvPath,
    pub conv2: ConvPath,
    pub num_images: usize,
    pub emit_image_lines: bool,
    pub layout: ExternalLayout,
}

impl ExecutionPlan {
    /// Builds and checks a plan from configuration.
    ///
    /// # Errors
    /// Fails if the memory map is invalid or `num_images` exceeds either the
    /// label capacity or the image region.
    pub fn from_config(config: &RuntimeConfig) -> Result<Self, RuntimeError> {
        let map = config.resolve_memory_map()?;
        let layout = ExternalLayout::from_map(&map)?;
        let plan = Self {
            conv1: config.conv1,
            conv2: config.conv2,
            num_images: config.num_images,
            emit_image_lines: config.emit_image_lines,
            layout,
        };
        plan.validate()?;
        debug!("{}", plan.summary());
        Ok(plan)
    }

    /// Checks the image count against the label capacity and the number of
    /// slots in the image region.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        let capacity = LABEL_CAPACITY.min(self.layout.image_capacity());
        if self.num_images > capacity {
            return Err(RuntimeError::TooManyImages {
                requested: self.num_images,
                capacity,
            });
        }
        Ok(())
    }

    /// Returns `true` if any layer is offloaded.
    pub fn uses_accelerator(&self) -> bool {
        self.conv1 == ConvPath::Hardware || self.conv2 == ConvPath::Hardware
    }

    pub fn summary(&self) -> String {
        format!(
            "Plan: {} images, conv1 on {}, conv2 on {}, images at {}, resume at 0x{:08x}",
            self.num_images,
            self.conv1,
            self.conv2,
            self.layout.images.base,
            self.layout.resume_address,
        )
    }
}
