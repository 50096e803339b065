// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Runtime configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! num_images = 16
//! conv1 = "software"
//! conv2 = "hardware"
//! emit_image_lines = true
//! bundle_path = "./data/lenet"
//! synthetic_seed = 7
//!
//! [sim]
//! dma_latency_polls = 2
//! accel_latency_polls = 16
//! ```
//!
//! A `[memory_map]` table replaces the default external-memory layout; when
//! absent, [`lenet_model::layout::default_memory_map`] is used.

use crate::{ConvPath, ExecutionPlan, RuntimeError};
use hw_port::SimConfig;
use lenet_model::layout::default_memory_map;
use memory_map::MemoryMap;
use std::path::{Path, PathBuf};

/// Configuration for a benchmark run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RuntimeConfig {
    /// Number of test images to classify.
    #[serde(default = "default_num_images")]
    pub num_images: usize,
    /// Where the first convolution runs.
    #[serde(default)]
    pub conv1: ConvPath,
    /// Where the second convolution runs.
    #[serde(default)]
    pub conv2: ConvPath,
    /// Whether per-image report lines are emitted.
    #[serde(default = "default_true")]
    pub emit_image_lines: bool,
    /// Directory holding `model.safetensors`. `None` selects a synthetic bundle.
    #[serde(default)]
    pub bundle_path: Option<PathBuf>,
    /// Seed for the synthetic bundle.
    #[serde(default)]
    pub synthetic_seed: u64,
    /// External-memory layout override.
    #[serde(default)]
    pub memory_map: Option<MemoryMap>,
    /// Simulated device latencies and cost model.
    #[serde(default)]
    pub sim: SimConfig,
}

fn default_num_images() -> usize {
    16
}

fn default_true() -> bool {
    true
}

impl RuntimeConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, RuntimeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RuntimeError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, RuntimeError> {
        toml::from_str(toml_str)
            .map_err(|e| RuntimeError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, RuntimeError> {
        toml::to_string_pretty(self)
            .map_err(|e| RuntimeError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Returns the configured memory map, or the default layout.
    pub fn resolve_memory_map(&self) -> Result<MemoryMap, RuntimeError> {
        match &self.memory_map {
            Some(map) => Ok(map.clone()),
            None => Ok(default_memory_map()?),
        }
    }

    /// Checks the memory map and the image count by building the
    /// [`ExecutionPlan`] this configuration describes.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        ExecutionPlan::from_config(self).map(|_| ())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            num_images: default_num_images(),
            conv1: ConvPath::Software,
            conv2: ConvPath::Software,
            emit_image_lines: true,
            bundle_path: None,
            synthetic_seed: 0,
            memory_map: None,
            sim: SimConfig::default(),
        }
    }
}
