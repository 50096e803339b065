// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Saturating int32 → int8 range clamp.

/// Lower bound of the int8 range, as an accumulator value.
pub const I8_MIN: i32 = i8::MIN as i32;
/// Upper bound of the int8 range, as an accumulator value.
pub const I8_MAX: i32 = i8::MAX as i32;

/// Saturates a single accumulator to the int8 range.
#[inline(always)]
pub const fn saturate_i8(v: i32) -> i8 {
    if v < I8_MIN {
        i8::MIN
    } else if v > I8_MAX {
        i8::MAX
    } else {
        v as i8
    }
}

/// Clamps every accumulator in place to `[-128, 127]`.
///
/// Idempotent: clamping an already-clamped map leaves it unchanged.
pub fn clamp(values: &mut [i32]) {
    for v in values.iter_mut() {
        *v = (*v).clamp(I8_MIN, I8_MAX);
    }
}
