// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fully-connected projection (int8 × int8 → int32).

/// Computes `output[j] = Σ_i input[i] · weights[j][i]` with wrapping
/// accumulation. Weights are laid out `[classes][inputs]`, so
/// `weights.len()` must be `output.len() × input.len()`.
///
/// # Panics
/// Panics if the weight length does not match.
pub fn fully_connected(input: &[i8], weights: &[i8], output: &mut [i32]) {
    assert_eq!(
        weights.len(),
        input.len() * output.len(),
        "fully_connected weight length"
    );
    if input.is_empty() {
        output.fill(0);
        return;
    }
    for (out, row) in output.iter_mut().zip(weights.chunks_exact(input.len())) {
        *out = row
            .iter()
            .zip(input)
            .fold(0i32, |acc, (&w, &x)| acc.wrapping_add(w as i32 * x as i32));
    }
}
