// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Element widths used by the quantized pipeline.

/// Enumerates the numeric types a pipeline buffer can hold.
///
/// Weights, images and pooled maps are `I8`; convolution accumulators and
/// class scores are `I32`. The runtime uses `DType` to size DMA transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    /// 8-bit signed integer (quantized storage precision).
    I8,
    /// 32-bit signed integer (accumulation precision).
    I32,
}

impl DType {
    /// Returns the size of a single element in bytes.
    pub const fn size_bytes(self) -> usize {
        match self {
            DType::I8 => 1,
            DType::I32 => 4,
        }
    }

    /// Returns a human-readable label for this data type.
    pub fn as_str(self) -> &'static str {
        match self {
            DType::I8 => "i8",
            DType::I32 => "i32",
        }
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_bytes() {
        assert_eq!(DType::I8.size_bytes(), 1);
        assert_eq!(DType::I32.size_bytes(), 4);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&DType::I32).unwrap(), "\"i32\"");
        let back: DType = serde_json::from_str("\"i8\"").unwrap();
        assert_eq!(back, DType::I8);
    }
}
