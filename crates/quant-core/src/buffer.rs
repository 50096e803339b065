// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Word-aligned fixed-size buffers.
//!
//! Every buffer the DMA engine reads or writes must start on a 32-bit
//! boundary and span a whole number of words: the engine only understands
//! word addresses and word lengths. [`WordAligned`] enforces the first
//! property through `repr(align(4))`; the topology constants enforce the
//! second via [`align4`].

use crate::TensorError;
use std::ops::{Deref, DerefMut};

/// Size of one DMA word in bytes.
pub const WORD_BYTES: usize = 4;

/// Rounds `n` up to the next multiple of [`WORD_BYTES`].
#[inline(always)]
pub const fn align4(n: usize) -> usize {
    (n + 3) & !3
}

/// A `#[repr(align(4))]` wrapper around a fixed-size array.
///
/// The inner value is public so callers can construct and destructure it.
/// Derefs to the wrapped array, so kernels can take `&[i8; N]` directly.
///
/// # Examples
/// ```
/// use quant_core::I8Buffer;
/// let mut img: I8Buffer<8> = I8Buffer::zeroed();
/// img[3] = -1;
/// assert_eq!(img.as_bytes()[3], 0xff);
/// assert_eq!(img.size_words(), 2);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(C, align(4))]
pub struct WordAligned<T>(pub T);

/// A word-aligned array of `N` int8 values.
pub type I8Buffer<const N: usize> = WordAligned<[i8; N]>;

/// A word-aligned array of `N` int32 values.
pub type I32Buffer<const N: usize> = WordAligned<[i32; N]>;

impl<T: bytemuck::Pod, const N: usize> WordAligned<[T; N]> {
    /// Creates a buffer filled with zeros.
    pub fn zeroed() -> Self {
        Self([T::zeroed(); N])
    }

    /// Number of elements.
    pub const fn len(&self) -> usize {
        N
    }

    /// Returns `true` for a zero-length buffer.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Returns the memory footprint in bytes.
    pub const fn size_bytes(&self) -> usize {
        N * std::mem::size_of::<T>()
    }

    /// Returns the footprint in DMA words, rounded down.
    pub const fn size_words(&self) -> usize {
        self.size_bytes() / WORD_BYTES
    }

    /// Returns the raw bytes backing this buffer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.0[..])
    }

    /// Returns the raw bytes backing this buffer, mutably.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.0[..])
    }

    /// Overwrites the whole buffer from a slice of exactly `N` values.
    pub fn copy_from(&mut self, values: &[T]) -> Result<(), TensorError> {
        if values.len() != N {
            return Err(TensorError::BufferSizeMismatch {
                expected: N,
                actual: values.len(),
            });
        }
        self.0.copy_from_slice(values);
        Ok(())
    }

    /// Overwrites the leading elements from `values`, zero-filling the rest.
    ///
    /// Used for weight tensors whose raw length was padded up to a word.
    pub fn copy_from_prefix(&mut self, values: &[T]) -> Result<(), TensorError> {
        if values.len() > N {
            return Err(TensorError::BufferSizeMismatch {
                expected: N,
                actual: values.len(),
            });
        }
        self.0[..values.len()].copy_from_slice(values);
        self.0[values.len()..].fill(T::zeroed());
        Ok(())
    }
}

impl<T> Deref for WordAligned<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for WordAligned<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: bytemuck::Pod, const N: usize> std::fmt::Debug for WordAligned<[T; N]> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordAligned")
            .field("elements", &N)
            .field("size_bytes", &self.size_bytes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align4() {
        assert_eq!(align4(0), 0);
        assert_eq!(align4(1), 4);
        assert_eq!(align4(150), 152);
        assert_eq!(align4(1024), 1024);
    }

    #[test]
    fn test_alignment() {
        let bufs: [I8Buffer<5>; 3] = [I8Buffer::zeroed(); 3];
        for b in &bufs {
            assert_eq!(b.as_bytes().as_ptr() as usize % WORD_BYTES, 0);
        }
    }

    #[test]
    fn test_i32_bytes_little_endian() {
        let mut b: I32Buffer<2> = I32Buffer::zeroed();
        b[0] = 1;
        b[1] = -1;
        assert_eq!(b.size_bytes(), 8);
        assert_eq!(b.size_words(), 2);
        assert_eq!(&b.as_bytes()[..4], &1i32.to_ne_bytes());
        assert_eq!(&b.as_bytes()[4..], &[0xff; 4]);
    }

    #[test]
    fn test_bytes_mut_writes_through() {
        let mut b: I8Buffer<4> = I8Buffer::zeroed();
        b.as_bytes_mut().copy_from_slice(&[0x80, 0x7f, 0x00, 0xff]);
        assert_eq!(*b, [-128, 127, 0, -1]);
    }

    #[test]
    fn test_copy_from() {
        let mut b: I8Buffer<3> = I8Buffer::zeroed();
        b.copy_from(&[1, 2, 3]).unwrap();
        assert_eq!(*b, [1, 2, 3]);
        assert!(matches!(
            b.copy_from(&[1, 2]),
            Err(TensorError::BufferSizeMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_copy_from_prefix_zero_fills() {
        let mut b: I8Buffer<4> = WordAligned([9; 4]);
        b.copy_from_prefix(&[1, 2]).unwrap();
        assert_eq!(*b, [1, 2, 0, 0]);
        assert!(b.copy_from_prefix(&[0; 5]).is_err());
    }

    #[test]
    fn test_debug_format() {
        let b: I32Buffer<10> = I32Buffer::zeroed();
        let s = format!("{b:?}");
        assert!(s.contains("elements: 10"));
        assert!(s.contains("size_bytes: 40"));
    }
}
