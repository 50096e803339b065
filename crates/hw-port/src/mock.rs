// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Register-level test double that records every access.

use crate::RegisterBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    Write(usize, u32),
    Read(usize),
}

/// Records accesses; reads of `done_offset` return 0 `busy_reads` times,
/// then 1. Every other read returns 0.
pub(crate) struct RecordingRegisters {
    pub log: Vec<Access>,
    done_offset: usize,
    busy_reads: u32,
}

impl RecordingRegisters {
    pub fn new(done_offset: usize, busy_reads: u32) -> Self {
        Self {
            log: Vec::new(),
            done_offset,
            busy_reads,
        }
    }

    pub fn writes(&self) -> Vec<(usize, u32)> {
        self.log
            .iter()
            .filter_map(|a| match *a {
                Access::Write(o, v) => Some((o, v)),
                Access::Read(_) => None,
            })
            .collect()
    }

    pub fn reads(&self) -> usize {
        self.log
            .iter()
            .filter(|a| matches!(a, Access::Read(_)))
            .count()
    }
}

impl RegisterBlock for RecordingRegisters {
    fn write(&mut self, offset: usize, value: u32) {
        self.log.push(Access::Write(offset, value));
    }

    fn read(&mut self, offset: usize) -> u32 {
        self.log.push(Access::Read(offset));
        if offset != self.done_offset {
            return 0;
        }
        if self.busy_reads > 0 {
            self.busy_reads -= 1;
            0
        } else {
            1
        }
    }
}
