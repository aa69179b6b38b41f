//! Scratch buffer allocation for per-invocation working memory.
//!
//! The bilateral grid, the healing solver's coefficient arrays, and the
//! wavelet pyramid levels are all owned, fixed-size buffers that live for
//! exactly one call and are never resized. [`AlignedBuffer`] gives them a
//! single RAII-owned allocation instead of threading raw `Vec<f32>`s
//! through every function, and reports allocation failure as an
//! [`Error::AllocationFailed`] rather than aborting the process.

use crate::error::{Error, Result};

/// An owned, zero-initialized scratch buffer.
///
/// Backed by `Vec<T>`, which already satisfies `T`'s native alignment.
/// This crate has no use for over-aligned (e.g. 32-byte SIMD) allocations:
/// every consumer reads and writes through ordinary slice indexing, so the
/// type exists to centralize allocation-failure handling and to give
/// scratch buffers a descriptive name at call sites, not to control byte
/// alignment.
#[derive(Debug, Clone)]
pub struct AlignedBuffer<T> {
    data: Vec<T>,
}

impl<T: Clone + Default> AlignedBuffer<T> {
    /// Allocates a zero-initialized buffer of `len` elements.
    ///
    /// Returns [`Error::AllocationFailed`] if `len` would overflow the
    /// element size in bytes, matching the failure mode
    /// `dt_alloc_align`-style allocators report instead of aborting.
    pub fn zeroed(len: usize) -> Result<Self> {
        let elem_size = std::mem::size_of::<T>().max(1);
        if len.checked_mul(elem_size).is_none() {
            return Err(Error::allocation_failed(
                len.saturating_mul(elem_size),
                "requested length overflows buffer size in bytes",
            ));
        }
        Ok(Self {
            data: vec![T::default(); len],
        })
    }

    /// Number of elements in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrows the buffer's contents.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutably borrows the buffer's contents.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T> std::ops::Deref for AlignedBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T> std::ops::DerefMut for AlignedBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_buffer_is_zero() {
        let buf = AlignedBuffer::<f32>::zeroed(64).unwrap();
        assert_eq!(buf.len(), 64);
        assert!(buf.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn overflow_reports_allocation_failed() {
        let err = AlignedBuffer::<f64>::zeroed(usize::MAX / 4).unwrap_err();
        assert!(err.is_allocation_error());
    }

    #[test]
    fn deref_allows_slice_indexing() {
        let mut buf = AlignedBuffer::<f32>::zeroed(8).unwrap();
        buf[3] = 1.5;
        assert_eq!(buf[3], 1.5);
    }
}
