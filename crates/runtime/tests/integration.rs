// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: end-to-end runs on the simulated SoC.
//!
//! These exercise the full flow from bundle materialisation → staging →
//! per-image inference → report → handoff, across all five library crates.

use hw_port::{SimConfig, SimulatedSoc};
use lenet_model::layout::default_memory_map;
use lenet_model::topology::{
    CONV1_OFM_SIZE, CONV2_OFM_SIZE, FC_DEPTH, IMG_SIZE, POOL1_OFM_SIZE, POOL2_OFM_SIZE,
    WT_CONV1_SIZE, WT_CONV2_SIZE, WT_FC_SIZE,
};
use lenet_model::{reference, ModelBundle};
use runtime::{
    run_benchmark, run_simulated, ConvPath, Driver, ExecutionPlan, LayerKernels,
    ReferenceKernels, RuntimeConfig, RuntimeError, StringSink,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Kernels that carry the first pixel of the image through to the score
/// vector: the predicted class is `image[0]` (mod 10). Records every call.
#[derive(Debug, Default)]
struct PassThroughKernels {
    calls: Vec<&'static str>,
}

impl LayerKernels for PassThroughKernels {
    fn conv1(
        &mut self,
        image: &[i8; IMG_SIZE],
        _weights: &[i8; WT_CONV1_SIZE],
        ofm: &mut [i32; CONV1_OFM_SIZE],
    ) {
        self.calls.push("conv1");
        ofm.fill(0);
        ofm[0] = i32::from(image[0]);
    }

    fn pool1(&mut self, ifm: &[i32; CONV1_OFM_SIZE], ofm: &mut [i8; POOL1_OFM_SIZE]) {
        self.calls.push("pool1");
        ofm.fill(0);
        ofm[0] = ifm[0] as i8;
    }

    fn conv2(
        &mut self,
        ifm: &[i8; POOL1_OFM_SIZE],
        _weights: &[i8; WT_CONV2_SIZE],
        ofm: &mut [i32; CONV2_OFM_SIZE],
    ) {
        self.calls.push("conv2");
        ofm.fill(0);
        ofm[0] = i32::from(ifm[0]);
    }

    fn pool2(&mut self, ifm: &[i32; CONV2_OFM_SIZE], ofm: &mut [i8; POOL2_OFM_SIZE]) {
        self.calls.push("pool2");
        ofm.fill(0);
        ofm[0] = ifm[0] as i8;
    }

    fn fully_connected(
        &mut self,
        ifm: &[i8; POOL2_OFM_SIZE],
        _weights: &[i8; WT_FC_SIZE],
        scores: &mut [i32; FC_DEPTH],
    ) {
        self.calls.push("fc");
        scores.fill(0);
        scores[ifm[0].rem_euclid(FC_DEPTH as i8) as usize] = 1;
    }

    fn clamp(&mut self, values: &mut [i32]) {
        self.calls.push("clamp");
        quant_core::clamp(values);
    }
}

/// Four images whose first pixels are 3, 1, 4, 1, labelled 3, 2, 4, 1.
fn stub_bundle() -> ModelBundle {
    let mut images = vec![0i8; 4 * IMG_SIZE];
    for (i, &p) in [3i8, 1, 4, 1].iter().enumerate() {
        images[i * IMG_SIZE] = p;
    }
    ModelBundle {
        conv1: vec![0; 150],
        conv2: vec![0; 2400],
        fc: vec![0; 4000],
        labels: vec![3, 2, 4, 1],
        images,
    }
}

fn config(num_images: usize, conv1: ConvPath, conv2: ConvPath) -> RuntimeConfig {
    RuntimeConfig {
        num_images,
        conv1,
        conv2,
        ..Default::default()
    }
}

fn soc_for(bundle: &ModelBundle) -> SimulatedSoc {
    let external = bundle.materialize(&default_memory_map().unwrap()).unwrap();
    SimulatedSoc::with_external(SimConfig::default(), external)
}

// ── Benchmark ────────────────────────────────────────────────────────────────

#[test]
fn test_stub_benchmark_counts_correct() {
    let bundle = stub_bundle();
    let plan = ExecutionPlan::from_config(&config(4, ConvPath::Software, ConvPath::Software))
        .unwrap();
    let driver = Driver::new(soc_for(&bundle), PassThroughKernels::default(), plan);

    let mut sink = StringSink::new();
    let outcome = run_benchmark(driver, &mut sink);

    assert_eq!(outcome.report.num_images, 4);
    assert_eq!(outcome.report.num_correct, 3);
    assert_eq!(outcome.report.mispredicted().collect::<Vec<_>>(), vec![1]);
    assert_eq!(outcome.handoff.resume_address, 0x4000_0000);

    let lines = sink.lines();
    assert!(lines.contains(&"Number of test images: 00000004".to_string()));
    assert!(lines.contains(&"Number of correct predictions: 00000003".to_string()));
    assert_eq!(lines.iter().filter(|l| *l == "Mispredicted!").count(), 1);
}

#[test]
fn test_stub_report_lines_for_mispredicted_image() {
    let bundle = stub_bundle();
    let plan = ExecutionPlan::from_config(&config(4, ConvPath::Software, ConvPath::Software))
        .unwrap();
    let mut sink = StringSink::new();
    run_benchmark(
        Driver::new(soc_for(&bundle), PassThroughKernels::default(), plan),
        &mut sink,
    );

    let lines = sink.lines();
    // Image 0 takes three lines, image 1 four.
    assert_eq!(
        &lines[3..7],
        &[
            ">>> Processing image: 00000001",
            "Prediction: 00000001",
            "Groundtruth: 00000002",
            "Mispredicted!",
        ]
    );
}

#[test]
fn test_layer_order() {
    let bundle = stub_bundle();
    let plan = ExecutionPlan::from_config(&config(1, ConvPath::Software, ConvPath::Software))
        .unwrap();
    let mut driver = Driver::new(soc_for(&bundle), PassThroughKernels::default(), plan).stage();
    assert_eq!(driver.infer(0), 3);
    assert_eq!(
        driver.kernels().calls,
        vec!["conv1", "clamp", "pool1", "conv2", "clamp", "pool2", "fc"]
    );
}

#[test]
fn test_hardware_conv_bypasses_kernels() {
    let bundle = ModelBundle::synthetic(1, 3);
    let plan = ExecutionPlan::from_config(&config(1, ConvPath::Hardware, ConvPath::Hardware))
        .unwrap();
    let mut driver = Driver::new(soc_for(&bundle), PassThroughKernels::default(), plan).stage();
    driver.infer(0);
    assert_eq!(
        driver.kernels().calls,
        vec!["clamp", "pool1", "clamp", "pool2", "fc"]
    );
    assert_eq!(driver.platform().stats().accelerator_jobs, 2);
}

// ── Correctness against the golden pass ──────────────────────────────────────

#[test]
fn test_all_paths_match_reference() {
    let bundle = ModelBundle::synthetic(6, 42);
    let paths = [
        (ConvPath::Software, ConvPath::Software),
        (ConvPath::Hardware, ConvPath::Software),
        (ConvPath::Software, ConvPath::Hardware),
        (ConvPath::Hardware, ConvPath::Hardware),
    ];
    for (conv1, conv2) in paths {
        let plan = ExecutionPlan::from_config(&config(6, conv1, conv2)).unwrap();
        let mut driver = Driver::new(soc_for(&bundle), ReferenceKernels, plan).stage();
        for i in 0..6 {
            let golden =
                reference::forward(&bundle.conv1, &bundle.conv2, &bundle.fc, bundle.image(i));
            assert_eq!(driver.infer(i), golden.label(), "{conv1}/{conv2} image {i}");
            assert_eq!(driver.scores(), &golden.scores);
        }
    }
}

#[test]
fn test_same_image_twice_is_identical() {
    let bundle = ModelBundle::synthetic(3, 17);
    let plan = ExecutionPlan::from_config(&config(3, ConvPath::Hardware, ConvPath::Software))
        .unwrap();
    let mut driver = Driver::new(soc_for(&bundle), ReferenceKernels, plan).stage();

    let first = driver.infer(2);
    let scores = *driver.scores();
    let conv2 = *driver.workspace().conv2_ofm();
    driver.infer(0);
    assert_eq!(driver.infer(2), first);
    assert_eq!(*driver.scores(), scores);
    assert_eq!(*driver.workspace().conv2_ofm(), conv2);
}

// ── Configuration and edge cases ─────────────────────────────────────────────

#[test]
fn test_config_file_drives_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lenet.toml");
    std::fs::write(
        &path,
        r#"
num_images = 5
conv2 = "hw"
emit_image_lines = false
synthetic_seed = 3

[sim]
accel_latency_polls = 4
"#,
    )
    .unwrap();

    let config = RuntimeConfig::from_file(&path).unwrap();
    assert_eq!(config.conv2, ConvPath::Hardware);
    let bundle = ModelBundle::synthetic(config.num_images, config.synthetic_seed);
    let mut sink = StringSink::new();
    let run = run_simulated(&config, &bundle, &mut sink).unwrap();

    assert_eq!(run.report.num_images, 5);
    assert_eq!(sink.lines().len(), 3);
    assert_eq!(run.stats.accelerator_jobs, 5);
    assert_eq!(run.stats.outbound_transfers, 5);
    assert!(run.stats.poll_reads >= 5 * 5);
}

#[test]
fn test_saved_bundle_runs_like_generated() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = ModelBundle::synthetic(4, 12);
    bundle.save(dir.path()).unwrap();
    let loaded = ModelBundle::load(dir.path()).unwrap();

    let config = config(4, ConvPath::Software, ConvPath::Software);
    let a = run_simulated(&config, &bundle, &mut StringSink::new()).unwrap();
    let b = run_simulated(&config, &loaded, &mut StringSink::new()).unwrap();
    assert_eq!(a.report.records, b.report.records);
    assert_eq!(a.report.total_cycles, b.report.total_cycles);
}

#[test]
fn test_too_many_images_rejected_before_hardware() {
    let bundle = ModelBundle::synthetic(1, 0);
    let err = run_simulated(&config(200, ConvPath::Software, ConvPath::Software), &bundle, &mut StringSink::new())
        .unwrap_err();
    assert!(matches!(err, RuntimeError::TooManyImages { requested: 200, capacity: 128 }));
}

#[test]
fn test_zero_images() {
    let bundle = ModelBundle::synthetic(0, 0);
    let mut sink = StringSink::new();
    let run = run_simulated(&config(0, ConvPath::Software, ConvPath::Software), &bundle, &mut sink)
        .unwrap();

    assert_eq!(run.report.num_images, 0);
    assert_eq!(run.report.total_cycles, 0);
    assert_eq!(
        sink.lines(),
        &[
            "Cycle Count: 00000000",
            "Number of test images: 00000000",
            "Number of correct predictions: 00000000",
        ]
    );
    // Weights plus one word of labels.
    assert_eq!(run.stats.inbound_transfers, 4);
    assert_eq!(run.handoff.resume_address, 0x4000_0000);
}
