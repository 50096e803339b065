// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fixed-point layer operations.
//!
//! Every operation writes into a caller-owned output slice, so the
//! inference path never allocates. Operand lengths are fixed by the
//! topology; a mismatch is a programming error and panics.

mod argmax_op;
mod checksum_op;
mod clamp_op;
mod conv3d_op;
mod fc_op;
mod pool_op;

pub use argmax_op::argmax;
pub use checksum_op::{checksum_i32, checksum_i8};
pub use clamp_op::{clamp, saturate_i8, I8_MAX, I8_MIN};
pub use conv3d_op::{conv3d, Conv3dParams};
pub use fc_op::fully_connected;
pub use pool_op::max_pool;
