// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Human-readable byte sizes.
//!
//! [`ByteSize`] is used for the external memory size in configuration files.
//! It (de)serialises as a string so TOML can say `external_size = "16M"`.

use crate::MemoryMapError;
use std::fmt;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

/// A byte count with suffix-aware parsing.
///
/// # Parsing
/// - `"16M"` or `"16MB"` → 16 × 1024² bytes
/// - `"4K"` or `"4KB"` → 4 × 1024 bytes
/// - `"1G"` or `"1GB"` → 1024³ bytes
/// - `"65536"` → raw byte count
///
/// # Examples
/// ```
/// use memory_map::ByteSize;
///
/// assert_eq!(ByteSize::parse("16M").unwrap().as_bytes(), 16 * 1024 * 1024);
/// assert_eq!(ByteSize::from_kb(4).to_string(), "4 KB");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ByteSize {
    bytes: u64,
}

impl ByteSize {
    /// Creates a size from a byte count.
    pub const fn from_bytes(bytes: u64) -> Self {
        Self { bytes }
    }

    /// Creates a size from kibibytes.
    pub const fn from_kb(kb: u64) -> Self {
        Self { bytes: kb * KIB }
    }

    /// Creates a size from mebibytes.
    pub const fn from_mb(mb: u64) -> Self {
        Self { bytes: mb * MIB }
    }

    /// Returns the size in bytes.
    pub const fn as_bytes(&self) -> u64 {
        self.bytes
    }

    /// Parses a human-readable size string. Case-insensitive.
    pub fn parse(s: &str) -> Result<Self, MemoryMapError> {
        let s = s.trim();
        let upper = s.to_uppercase();

        let (num_str, multiplier) = if let Some(n) = upper.strip_suffix("GB") {
            (n, GIB)
        } else if let Some(n) = upper.strip_suffix('G') {
            (n, GIB)
        } else if let Some(n) = upper.strip_suffix("MB") {
            (n, MIB)
        } else if let Some(n) = upper.strip_suffix('M') {
            (n, MIB)
        } else if let Some(n) = upper.strip_suffix("KB") {
            (n, KIB)
        } else if let Some(n) = upper.strip_suffix('K') {
            (n, KIB)
        } else if let Some(n) = upper.strip_suffix('B') {
            (n, 1)
        } else {
            (upper.as_str(), 1)
        };

        let value: u64 = num_str
            .trim()
            .parse()
            .map_err(|_| MemoryMapError::InvalidSize(s.to_string()))?;
        let bytes = value
            .checked_mul(multiplier)
            .ok_or_else(|| MemoryMapError::SizeOutOfRange(s.to_string()))?;
        if bytes == 0 {
            return Err(MemoryMapError::SizeOutOfRange(format!("'{s}' is zero")));
        }
        Ok(Self { bytes })
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.bytes;
        if b >= GIB && b % GIB == 0 {
            write!(f, "{} GB", b / GIB)
        } else if b >= MIB && b % MIB == 0 {
            write!(f, "{} MB", b / MIB)
        } else if b >= KIB && b % KIB == 0 {
            write!(f, "{} KB", b / KIB)
        } else {
            write!(f, "{b} B")
        }
    }
}

impl TryFrom<String> for ByteSize {
    type Error = MemoryMapError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ByteSize> for String {
    fn from(size: ByteSize) -> String {
        size.to_string()
    }
}
