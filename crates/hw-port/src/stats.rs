// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Transfer statistics for profiling and diagnostics.
//!
//! [`TransferStats`] counts what the simulated devices did: how many
//! transfers ran in each direction, how many words they moved, how many
//! convolutions were offloaded, and how often the driver polled DONE.

/// Cumulative device activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransferStats {
    /// External → local transfers.
    pub inbound_transfers: u64,
    /// Words moved external → local.
    pub inbound_words: u64,
    /// Local → external transfers.
    pub outbound_transfers: u64,
    /// Words moved local → external.
    pub outbound_words: u64,
    /// Convolutions run on the accelerator.
    pub accelerator_jobs: u64,
    /// Multiply-accumulates performed by the accelerator.
    pub accelerator_macs: u64,
    /// DONE register reads, across both devices.
    pub poll_reads: u64,
}

impl TransferStats {
    /// Total transfers in both directions.
    pub fn total_transfers(&self) -> u64 {
        self.inbound_transfers + self.outbound_transfers
    }

    /// Total bytes moved by the DMA engine.
    pub fn bytes_moved(&self) -> u64 {
        (self.inbound_words + self.outbound_words) * 4
    }

    pub(crate) fn record_inbound(&mut self, words: u32) {
        self.inbound_transfers += 1;
        self.inbound_words += words as u64;
    }

    pub(crate) fn record_outbound(&mut self, words: u32) {
        self.outbound_transfers += 1;
        self.outbound_words += words as u64;
    }

    pub(crate) fn record_job(&mut self, macs: usize) {
        self.accelerator_jobs += 1;
        self.accelerator_macs += macs as u64;
    }

    pub(crate) fn record_poll(&mut self) {
        self.poll_reads += 1;
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        let kb = self.bytes_moved() as f64 / 1024.0;
        format!(
            "Transfers: {} total ({} in / {} words, {} out / {} words, {:.1} KB), \
             {} accelerator jobs ({} MACs), {} DONE polls",
            self.total_transfers(),
            self.inbound_transfers,
            self.inbound_words,
            self.outbound_transfers,
            self.outbound_words,
            kb,
            self.accelerator_jobs,
            self.accelerator_macs,
            self.poll_reads,
        )
    }
}
