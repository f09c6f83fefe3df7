//! Kernels.
//!
//! [`scalar`] is the reference implementation for every operation kind.
//! [`vector`] runs the same kinds over whole lane-width chunks of any
//! [`ByteVector`] backend and reports how far it got, so the caller can finish
//! the remainder with the scalar kernel.

pub(crate) mod rules;
pub(crate) mod scalar;
pub(crate) mod vector;

use crate::simd::ByteVector;

/// One side of an element-wise operation: a sequence, or a byte repeated
/// across the whole window.
pub(crate) trait Lane: Copy {
    fn at(self, index: usize) -> u8;

    /// # Safety
    /// `index + V::LANES` must not exceed the length of a sequence lane, and
    /// the caller must run on a CPU supporting `V`.
    unsafe fn load<V: ByteVector>(self, index: usize) -> V;

    fn skip(self, count: usize) -> Self;
}

impl<'a> Lane for &'a [u8] {
    #[inline(always)]
    fn at(self, index: usize) -> u8 {
        self[index]
    }

    #[inline(always)]
    unsafe fn load<V: ByteVector>(self, index: usize) -> V {
        debug_assert!(index + V::LANES <= self.len());
        V::load(self.as_ptr().add(index))
    }

    #[inline(always)]
    fn skip(self, count: usize) -> Self {
        &self[count..]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Splat(pub u8);

impl Lane for Splat {
    #[inline(always)]
    fn at(self, _index: usize) -> u8 {
        self.0
    }

    #[inline(always)]
    unsafe fn load<V: ByteVector>(self, _index: usize) -> V {
        V::splat(self.0)
    }

    #[inline(always)]
    fn skip(self, _count: usize) -> Self {
        self
    }
}

// `consumed` leading elements were covered by lanes; a short-circuited
// result may stop before the aligned length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Chunked<T> {
    pub value: T,
    pub consumed: usize,
}

impl<T> Chunked<T> {
    #[inline(always)]
    pub fn new(value: T, consumed: usize) -> Self {
        Self { value, consumed }
    }
}

#[inline(always)]
pub(crate) fn aligned_len(len: usize, lanes: usize) -> usize {
    len - len % lanes
}
