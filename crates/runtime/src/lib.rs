// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # runtime
//!
//! The driver that runs the quantized LeNet over a test set.
//!
//! The runtime takes:
//! - A [`Platform`](hw_port::Platform): DMA engine, accelerator, cycle
//!   counter and the end-of-run handoff.
//! - A [`LayerKernels`] implementation for the software layers.
//! - An [`ExecutionPlan`]: the conv path per layer and the resolved
//!   external-memory layout.
//!
//! and classifies images one at a time, staging data through the DMA
//! engine and timing each image with the cycle counter.
//!
//! # Type-State Pipeline
//! ```text
//! Driver<Idle> ──stage()──► Driver<Ready> ──finish()──► Handoff
//!                               │ infer(i) / benchmark loop
//! ```
//! Weights and labels are staged exactly once; `finish` consumes the driver
//! so control is handed back exactly once.
//!
//! # Per-image flow
//! ```text
//! reset counter → DMA image in → conv1 → clamp → pool1 → conv2 → clamp
//!   → pool2 → fc → argmax → read counter → compare with ground truth
//! ```
//! Each conv runs in software or on the accelerator, per [`ConvPath`].

mod benchmark;
mod config;
mod diagnostics;
mod engine;
mod error;
mod kernels;
mod metrics;
mod pipeline;
mod plan;
mod weight_loader;

pub use benchmark::{benchmark_images, run_benchmark, run_simulated, BenchmarkOutcome, SimulatedRun};
pub use config::RuntimeConfig;
pub use diagnostics::{DiagnosticSink, StringSink, TracingSink};
pub use engine::{Driver, DriverState, Idle, Ready};
pub use error::RuntimeError;
pub use kernels::{LayerKernels, ReferenceKernels};
pub use metrics::{BenchmarkReport, ImageRecord};
pub use pipeline::{Pipeline, Workspace};
pub use plan::{ConvPath, ExecutionPlan, ExternalLayout};
pub use weight_loader::WeightLoader;
