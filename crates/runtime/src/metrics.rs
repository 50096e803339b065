// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmark metrics.
//!
//! [`BenchmarkReport`] collects per-image outcomes and cycle counts plus the
//! host wall time of the run. Serialisable to JSON for the CLI.

use crate::ConvPath;
use std::time::Duration;

/// Outcome of one classified image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImageRecord {
    pub index: usize,
    pub predicted: i8,
    pub ground_truth: i8,
    /// Cycle counter value read right after inference.
    pub cycles: u32,
    pub correct: bool,
}

/// Aggregate result of a benchmark run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkReport {
    pub records: Vec<ImageRecord>,
    /// Sum of per-image cycle counts.
    pub total_cycles: u64,
    pub num_images: usize,
    pub num_correct: usize,
    /// Host time for the whole loop.
    pub wall_time: Duration,
    pub conv1: ConvPath,
    pub conv2: ConvPath,
}

impl BenchmarkReport {
    /// Creates an empty report.
    pub fn new(conv1: ConvPath, conv2: ConvPath) -> Self {
        Self {
            records: Vec::new(),
            total_cycles: 0,
            num_images: 0,
            num_correct: 0,
            wall_time: Duration::ZERO,
            conv1,
            conv2,
        }
    }

    /// Records one image.
    pub fn record(&mut self, record: ImageRecord) {
        self.total_cycles += u64::from(record.cycles);
        self.num_images += 1;
        if record.correct {
            self.num_correct += 1;
        }
        self.records.push(record);
    }

    /// Sets the wall-clock time of the run.
    pub fn finalise(&mut self, wall_time: Duration) {
        self.wall_time = wall_time;
    }

    /// Fraction of images classified correctly; zero for an empty run.
    pub fn accuracy(&self) -> f64 {
        if self.num_images == 0 {
            return 0.0;
        }
        self.num_correct as f64 / self.num_images as f64
    }

    /// Mean cycles per image; zero for an empty run.
    pub fn mean_cycles(&self) -> f64 {
        if self.num_images == 0 {
            return 0.0;
        }
        self.total_cycles as f64 / self.num_images as f64
    }

    /// Indices of mispredicted images.
    pub fn mispredicted(&self) -> impl Iterator<Item = usize> + '_ {
        self.records.iter().filter(|r| !r.correct).map(|r| r.index)
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Benchmark: {}/{} correct ({:.1}%), {} cycles ({:.0} per image), \
             conv1 {}, conv2 {}, {:.2}ms host",
            self.num_correct,
            self.num_images,
            self.accuracy() * 100.0,
            self.total_cycles,
            self.mean_cycles(),
            self.conv1,
            self.conv2,
            self.wall_time.as_secs_f64() * 1000.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(index: usize, predicted: i8, ground_truth: i8, cycles: u32) -> ImageRecord {
        ImageRecord {
            index,
            predicted,
            ground_truth,
            cycles,
            correct: predicted == ground_truth,
        }
    }

    #[test]
    fn test_empty_report() {
        let r = BenchmarkReport::new(ConvPath::Software, ConvPath::Software);
        assert_eq!(r.accuracy(), 0.0);
        assert_eq!(r.mean_cycles(), 0.0);
        assert_eq!(r.num_images, 0);
    }

    #[test]
    fn test_record_and_accuracy() {
        let mut r = BenchmarkReport::new(ConvPath::Software, ConvPath::Hardware);
        r.record(rec(0, 3, 3, 100));
        r.record(rec(1, 2, 5, 300));
        r.record(rec(2, 1, 1, u32::MAX));
        r.finalise(Duration::from_millis(4));

        assert_eq!(r.num_images, 3);
        assert_eq!(r.num_correct, 2);
        assert_eq!(r.total_cycles, 400 + u64::from(u32::MAX));
        assert!((r.accuracy() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(r.mispredicted().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_summary_format() {
        let mut r = BenchmarkReport::new(ConvPath::Hardware, ConvPath::Software);
        r.record(rec(0, 1, 1, 50));
        let s = r.summary();
        assert!(s.contains("1/1 correct"));
        assert!(s.contains("conv1 hardware"));
        assert!(s.contains("50 cycles"));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut r = BenchmarkReport::new(ConvPath::Software, ConvPath::Software);
        r.record(rec(0, -1, 4, 7));
        let json = serde_json::to_string(&r).unwrap();
        let back: BenchmarkReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
