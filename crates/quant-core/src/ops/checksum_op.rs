// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Buffer checksums for debug verification.
//!
//! Both sums wrap on overflow (two's complement), so any buffer length is
//! accepted and the result is reproducible across targets.

/// Wrapping sum of int32 values.
pub fn checksum_i32(values: &[i32]) -> i32 {
    values.iter().fold(0i32, |acc, &v| acc.wrapping_add(v))
}

/// Wrapping sum of int8 values, each sign-extended to int32 first.
pub fn checksum_i8(values: &[i8]) -> i32 {
    values.iter().fold(0i32, |acc, &v| acc.wrapping_add(v as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(checksum_i32(&[]), 0);
        assert_eq!(checksum_i8(&[]), 0);
    }

    #[test]
    fn test_i8_sign_extension() {
        // 0xff as a signed byte is -1, not 255.
        assert_eq!(checksum_i8(&[-1, -1, 2]), 0);
        assert_eq!(checksum_i8(&[-128, 127]), -1);
    }

    #[test]
    fn test_i32_wraps() {
        assert_eq!(checksum_i32(&[i32::MAX, 1]), i32::MIN);
        assert_eq!(checksum_i32(&[i32::MIN, -1]), i32::MAX);
    }

    #[test]
    fn test_i8_large_buffer() {
        let v = vec![127i8; 1024];
        assert_eq!(checksum_i8(&v), 127 * 1024);
    }
}
