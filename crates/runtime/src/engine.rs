// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The driver with type-state enforced staging.
//!
//! ```text
//! Driver<Idle>
//!     │  .stage()        weights + labels, once
//!     ▼
//! Driver<Ready>
//!     │  .infer(i)       stage image i, run the pipeline (repeatable)
//!     │  .finish()       hand control to the resumption point, once
//!     ▼
//!   Handoff
//! ```
//!
//! Each state transition consumes the old value and returns a new one,
//! making invalid state sequences a compile error.

use crate::{ExecutionPlan, LayerKernels, Pipeline, ReferenceKernels, WeightLoader, Workspace};
use hw_port::{Handoff, Platform};
use lenet_model::topology::FC_DEPTH;
use std::marker::PhantomData;
use tracing::{debug, info};

// ── Type-state markers ───────────────────────────────────────────────────────

/// Driver is created; nothing has been staged.
#[derive(Debug)]
pub struct Idle;

/// Weights and labels are staged; images can be classified.
#[derive(Debug)]
pub struct Ready;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Idle {}
    impl Sealed for super::Ready {}
}

/// Sealed trait for driver states.
pub trait DriverState: sealed::Sealed + std::fmt::Debug {}
impl DriverState for Idle {}
impl DriverState for Ready {}

// ── Driver ───────────────────────────────────────────────────────────────────

/// Owns the platform, the workspace and the pipeline for one run.
///
/// `S` is a type-state marker: `infer` exists only on a staged driver, and
/// `finish` consumes it, so the handoff happens exactly once.
///
/// # Example
/// ```
/// use hw_port::{SimConfig, SimulatedSoc};
/// use lenet_model::{layout::default_memory_map, ModelBundle};
/// use runtime::{Driver, ExecutionPlan, ReferenceKernels, RuntimeConfig};
///
/// let config = RuntimeConfig { num_images: 2, ..Default::default() };
/// let plan = ExecutionPlan::from_config(&config).unwrap();
/// let bundle = ModelBundle::synthetic(2, 0);
/// let external = bundle.materialize(&default_memory_map().unwrap()).unwrap();
/// let soc = SimulatedSoc::with_external(SimConfig::instant(), external);
///
/// let mut driver = Driver::new(soc, ReferenceKernels, plan).stage();
/// let label = driver.infer(0);
/// assert!(label < 10);
/// let handoff = driver.finish();
/// assert_eq!(handoff.resume_address, 0x4000_0000);
/// ```
pub struct Driver<P: Platform, K: LayerKernels = ReferenceKernels, S: DriverState = Idle> {
    platform: P,
    pipeline: Pipeline<K>,
    loader: WeightLoader,
    workspace: Box<Workspace>,
    plan: ExecutionPlan,
    _state: PhantomData<S>,
}

impl<P: Platform, K: LayerKernels, S: DriverState> Driver<P, K, S> {
    pub fn plan(&self) -> &ExecutionPlan {
        &self.plan
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn kernels(&self) -> &K {
        self.pipeline.kernels()
    }

    fn into_state<T: DriverState>(self) -> Driver<P, K, T> {
        Driver {
            platform: self.platform,
            pipeline: self.pipeline,
            loader: self.loader,
            workspace: self.workspace,
            plan: self.plan,
            _state: PhantomData,
        }
    }
}

// ── Idle → Ready ─────────────────────────────────────────────────────────────

impl<P: Platform, K: LayerKernels> Driver<P, K, Idle> {
    /// Creates a driver over `platform`. The plan must already be validated
    /// (see [`ExecutionPlan::from_config`]).
    pub fn new(platform: P, kernels: K, plan: ExecutionPlan) -> Self {
        info!(
            conv1 = %plan.conv1,
            conv2 = %plan.conv2,
            images = plan.num_images,
            "Driver created"
        );
        Self {
            platform,
            pipeline: Pipeline::new(kernels, plan.conv1, plan.conv2, plan.layout),
            loader: WeightLoader::new(plan.layout),
            workspace: Workspace::new(),
            plan,
            _state: PhantomData,
        }
    }

    /// Stages all three weight tensors and the ground-truth labels.
    /// Transitions to the `Ready` state.
    pub fn stage(mut self) -> Driver<P, K, Ready> {
        self.loader.load_weights(&mut self.platform, &mut self.workspace);
        self.loader
            .load_labels(&mut self.platform, &mut self.workspace, self.plan.num_images);
        info!("Weights and labels staged");
        self.into_state()
    }
}

// ── Ready: classify ──────────────────────────────────────────────────────────

impl<P: Platform, K: LayerKernels> Driver<P, K, Ready> {
    /// Stages image `index` from its external slot.
    pub fn stage_image(&mut self, index: usize) {
        self.loader
            .load_image(&mut self.platform, &mut self.workspace, index);
    }

    /// Runs the pipeline on the currently staged image, recording the label
    /// at `index`.
    pub fn classify(&mut self, index: usize) -> usize {
        self.pipeline
            .infer(&mut self.platform, &mut self.workspace, index)
    }

    /// Stages image `index` and classifies it.
    pub fn infer(&mut self, index: usize) -> usize {
        self.stage_image(index);
        self.classify(index)
    }

    /// Class scores of the last inference.
    pub fn scores(&self) -> &[i32; FC_DEPTH] {
        self.workspace.scores()
    }

    /// Label predicted for image `index`.
    pub fn predicted(&self, index: usize) -> i8 {
        self.workspace.predicted()[index]
    }

    /// Staged ground-truth label of image `index`.
    pub fn ground_truth(&self, index: usize) -> i8 {
        self.workspace.ground_truth()[index]
    }

    /// Hands control to the configured resumption point and consumes the
    /// driver.
    pub fn finish(mut self) -> Handoff {
        let entry = self.plan.layout.resume_address;
        debug!(entry = format_args!("0x{entry:08x}"), "Handing off");
        self.platform.resume_external(entry)
    }
}

impl<P: Platform, K: LayerKernels, S: DriverState> std::fmt::Debug for Driver<P, K, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("state", &std::any::type_name::<S>())
            .field("conv1", &self.plan.conv1)
            .field("conv2", &self.plan.conv2)
            .field("num_images", &self.plan.num_images)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConvPath, RuntimeConfig};
    use hw_port::{SimConfig, SimulatedSoc};
    use lenet_model::layout::default_memory_map;
    use lenet_model::{reference, ModelBundle};

    fn driver(bundle: &ModelBundle, conv1: ConvPath, conv2: ConvPath) -> Driver<SimulatedSoc> {
        let config = RuntimeConfig {
            num_images: bundle.num_images(),
            conv1,
            conv2,
            ..Default::default()
        };
        let plan = ExecutionPlan::from_config(&config).unwrap();
        let external = bundle.materialize(&default_memory_map().unwrap()).unwrap();
        Driver::new(
            SimulatedSoc::with_external(SimConfig::default(), external),
            ReferenceKernels,
            plan,
        )
    }

    #[test]
    fn test_idle_to_ready() {
        let bundle = ModelBundle::synthetic(3, 5);
        let ready = driver(&bundle, ConvPath::Software, ConvPath::Software).stage();
        for i in 0..3 {
            assert_eq!(ready.ground_truth(i), bundle.labels[i]);
        }
        assert_eq!(ready.platform().stats().inbound_transfers, 4);
    }

    #[test]
    fn test_infer_matches_reference() {
        let bundle = ModelBundle::synthetic(4, 11);
        let mut ready = driver(&bundle, ConvPath::Software, ConvPath::Software).stage();
        for i in 0..4 {
            let golden = reference::forward(&bundle.conv1, &bundle.conv2, &bundle.fc, bundle.image(i));
            assert_eq!(ready.infer(i), golden.label());
            assert_eq!(*ready.scores(), golden.scores);
            assert_eq!(ready.predicted(i), golden.label() as i8);
        }
    }

    #[test]
    fn test_hardware_paths_match_software() {
        let bundle = ModelBundle::synthetic(3, 21);
        let mut sw = driver(&bundle, ConvPath::Software, ConvPath::Software).stage();
        let mut hw = driver(&bundle, ConvPath::Hardware, ConvPath::Hardware).stage();
        for i in 0..3 {
            assert_eq!(sw.infer(i), hw.infer(i));
            assert_eq!(sw.scores(), hw.scores());
            assert_eq!(sw.workspace().conv1_ofm(), hw.workspace().conv1_ofm());
            assert_eq!(sw.workspace().pool2(), hw.workspace().pool2());
        }
        assert_eq!(hw.platform().stats().accelerator_jobs, 6);
        assert_eq!(hw.platform().stats().outbound_transfers, 6);
        assert_eq!(sw.platform().stats().accelerator_jobs, 0);
    }

    #[test]
    fn test_classify_uses_staged_image_on_every_path() {
        let bundle = ModelBundle::synthetic(3, 17);
        let staged = reference::forward(&bundle.conv1, &bundle.conv2, &bundle.fc, bundle.image(1));
        for conv1 in [ConvPath::Software, ConvPath::Hardware] {
            let mut ready = driver(&bundle, conv1, ConvPath::Software).stage();
            ready.stage_image(1);
            assert_eq!(ready.classify(0), staged.label(), "conv1 on {conv1}");
            assert_eq!(*ready.scores(), staged.scores, "conv1 on {conv1}");
            assert_eq!(ready.predicted(0), staged.label() as i8);
        }
    }

    #[test]
    fn test_infer_twice_is_deterministic() {
        let bundle = ModelBundle::synthetic(2, 8);
        let mut ready = driver(&bundle, ConvPath::Software, ConvPath::Hardware).stage();
        let first = ready.infer(1);
        let scores = *ready.scores();
        let pool1 = *ready.workspace().pool1();
        assert_eq!(ready.infer(1), first);
        assert_eq!(*ready.scores(), scores);
        assert_eq!(*ready.workspace().pool1(), pool1);
    }

    #[test]
    fn test_finish_hands_off_once() {
        let bundle = ModelBundle::synthetic(1, 0);
        let mut ready = driver(&bundle, ConvPath::Software, ConvPath::Software).stage();
        ready.infer(0);
        let handoff = ready.finish();
        assert_eq!(handoff.resume_address, 0x4000_0000);
    }

    #[test]
    fn test_debug_format() {
        let bundle = ModelBundle::synthetic(1, 0);
        let d = driver(&bundle, ConvPath::Hardware, ConvPath::Software);
        let debug = format!("{d:?}");
        assert!(debug.contains("Driver"));
        assert!(debug.contains("Idle"));
        assert!(debug.contains("Hardware"));
    }
}
