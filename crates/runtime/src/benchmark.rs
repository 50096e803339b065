// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The benchmark loop and its report.
//!
//! ```text
//! stage weights + labels
//! for i in 0..num_images:
//!     ">>> Processing image: i"
//!     reset counter → stage image i → infer → total += counter
//!     "Prediction: p"  "Groundtruth: g"  ["Mispredicted!"]
//! "Cycle Count"  "Number of test images"  "Number of correct predictions"
//! hand off
//! ```

use crate::diagnostics::DiagnosticSink;
use crate::{
    BenchmarkReport, Driver, ExecutionPlan, ImageRecord, LayerKernels, Ready, ReferenceKernels,
    RuntimeConfig, RuntimeError,
};
use hw_port::{Handoff, Platform, SimulatedSoc, TransferStats};
use lenet_model::ModelBundle;
use std::time::Instant;
use tracing::{debug, info};

/// Report and handoff of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkOutcome {
    pub report: BenchmarkReport,
    pub handoff: Handoff,
}

/// A finished run on the simulated SoC, with device activity.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedRun {
    pub report: BenchmarkReport,
    pub handoff: Handoff,
    pub stats: TransferStats,
}

/// Classifies the plan's images on a staged driver, writing the report to
/// `sink`.
pub fn benchmark_images<P, K, D>(driver: &mut Driver<P, K, Ready>, sink: &mut D) -> BenchmarkReport
where
    P: Platform,
    K: LayerKernels,
    D: DiagnosticSink + ?Sized,
{
    let plan = *driver.plan();
    let lines = plan.emit_image_lines;
    let mut report = BenchmarkReport::new(plan.conv1, plan.conv2);
    let start = Instant::now();

    for index in 0..plan.num_images {
        if lines {
            sink.field(">>> Processing image", index as u64);
        }

        driver.platform_mut().reset_cycles();
        let predicted = driver.infer(index) as i8;
        let cycles = driver.platform_mut().cycles();

        let ground_truth = driver.ground_truth(index);
        let correct = predicted == ground_truth;
        if lines {
            sink.field("Prediction", u64::from(predicted as u8));
            sink.field("Groundtruth", u64::from(ground_truth as u8));
            if !correct {
                sink.notice("Mispredicted!");
            }
        }
        debug!(image = index, predicted, ground_truth, cycles, "Image done");
        report.record(ImageRecord {
            index,
            predicted,
            ground_truth,
            cycles,
            correct,
        });
    }

    report.finalise(start.elapsed());
    sink.field("Cycle Count", report.total_cycles);
    sink.field("Number of test images", report.num_images as u64);
    sink.field("Number of correct predictions", report.num_correct as u64);
    info!("{}", report.summary());
    report
}

/// Stages `driver`, runs the benchmark and hands off.
pub fn run_benchmark<P, K, D>(driver: Driver<P, K>, sink: &mut D) -> BenchmarkOutcome
where
    P: Platform,
    K: LayerKernels,
    D: DiagnosticSink + ?Sized,
{
    let mut ready = driver.stage();
    let report = benchmark_images(&mut ready, sink);
    let handoff = ready.finish();
    BenchmarkOutcome { report, handoff }
}

/// Runs the benchmark for `config` over `bundle` on a simulated SoC.
///
/// # Errors
/// Fails if the configuration is invalid or the bundle holds fewer images
/// than requested.
pub fn run_simulated<D: DiagnosticSink + ?Sized>(
    config: &RuntimeConfig,
    bundle: &ModelBundle,
    sink: &mut D,
) -> Result<SimulatedRun, RuntimeError> {
    let plan = ExecutionPlan::from_config(config)?;
    if plan.num_images > bundle.num_images() {
        return Err(RuntimeError::BundleTooSmall {
            requested: plan.num_images,
            available: bundle.num_images(),
        });
    }
    info!("{}", plan.summary());
    let external = bundle.materialize(&config.resolve_memory_map()?)?;
    let soc = SimulatedSoc::with_external(config.sim, external);

    let mut ready = Driver::new(soc, ReferenceKernels, plan).stage();
    let report = benchmark_images(&mut ready, sink);
    let stats = ready.platform().stats().clone();
    let handoff = ready.finish();
    info!("{}", stats.summary());

    Ok(SimulatedRun {
        report,
        handoff,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConvPath, StringSink};

    #[test]
    fn test_report_line_order() {
        let bundle = ModelBundle::synthetic(8, 2);
        let config = RuntimeConfig {
            num_images: 8,
            ..Default::default()
        };
        let mut sink = StringSink::new();
        let run = run_simulated(&config, &bundle, &mut sink).unwrap();

        let lines = sink.lines();
        assert_eq!(lines[0], ">>> Processing image: 00000000");
        assert!(lines[1].starts_with("Prediction: "));
        assert!(lines[2].starts_with("Groundtruth: "));
        let n = lines.len();
        assert_eq!(lines[n - 2], "Number of test images: 00000008");
        assert_eq!(
            lines[n - 1],
            format!("Number of correct predictions: {:08x}", run.report.num_correct)
        );
        assert_eq!(
            lines[n - 3],
            format!("Cycle Count: {:08x}", run.report.total_cycles)
        );
        let mispredicted = lines.iter().filter(|l| *l == "Mispredicted!").count();
        assert_eq!(mispredicted, 8 - run.report.num_correct);
    }

    #[test]
    fn test_synthetic_mislabels_every_eighth() {
        let bundle = ModelBundle::synthetic(16, 4);
        let config = RuntimeConfig {
            num_images: 16,
            ..Default::default()
        };
        let run = run_simulated(&config, &bundle, &mut StringSink::new()).unwrap();
        assert_eq!(run.report.num_correct, 14);
        assert_eq!(run.report.mispredicted().collect::<Vec<_>>(), vec![7, 15]);
        assert_eq!(run.handoff.resume_address, 0x4000_0000);
    }

    #[test]
    fn test_quiet_run_emits_totals_only() {
        let bundle = ModelBundle::synthetic(3, 0);
        let config = RuntimeConfig {
            num_images: 3,
            emit_image_lines: false,
            ..Default::default()
        };
        let mut sink = StringSink::new();
        run_simulated(&config, &bundle, &mut sink).unwrap();
        assert_eq!(sink.lines().len(), 3);
    }

    #[test]
    fn test_cycles_accumulate() {
        let bundle = ModelBundle::synthetic(2, 6);
        let config = RuntimeConfig {
            num_images: 2,
            conv1: ConvPath::Hardware,
            ..Default::default()
        };
        let run = run_simulated(&config, &bundle, &mut StringSink::new()).unwrap();
        let sum: u64 = run.report.records.iter().map(|r| u64::from(r.cycles)).sum();
        assert_eq!(run.report.total_cycles, sum);
        assert!(run.report.records.iter().all(|r| r.cycles > 0));
        assert_eq!(run.stats.accelerator_jobs, 2);
    }

    #[test]
    fn test_bundle_too_small() {
        let bundle = ModelBundle::synthetic(2, 0);
        let config = RuntimeConfig {
            num_images: 3,
            ..Default::default()
        };
        assert!(matches!(
            run_simulated(&config, &bundle, &mut StringSink::new()),
            Err(RuntimeError::BundleTooSmall { requested: 3, available: 2 })
        ));
    }
}
