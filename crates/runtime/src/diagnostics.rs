// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Line-oriented report output.
//!
//! The benchmark loop writes its report through a [`DiagnosticSink`] rather
//! than the log, so the same lines can go to a UART, stdout or a test
//! buffer. Numbers are rendered as 8-digit lowercase hexadecimal.

use tracing::info;

/// Destination for report lines.
pub trait DiagnosticSink {
    /// Emits one line of free text.
    fn notice(&mut self, text: &str);

    /// Emits `label` followed by `value` in hexadecimal.
    fn field(&mut self, label: &str, value: u64) {
        self.notice(&format_field(label, value));
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn notice(&mut self, text: &str) {
        (**self).notice(text)
    }

    fn field(&mut self, label: &str, value: u64) {
        (**self).field(label, value)
    }
}

/// Renders a report field, e.g. `Prediction: 00000003`.
pub(crate) fn format_field(label: &str, value: u64) -> String {
    format!("{label}: {value:08x}")
}

/// Collects lines in memory.
#[derive(Debug, Clone, Default)]
pub struct StringSink {
    lines: Vec<String>,
}

impl StringSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All lines joined with `\r\n`, as a serial console would show them.
    pub fn transcript(&self) -> String {
        self.lines.join("\r\n")
    }
}

impl DiagnosticSink for StringSink {
    fn notice(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }
}

/// Forwards every line to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn notice(&mut self, text: &str) {
        info!(target: "lenet_report", "{text}");
    }
}
