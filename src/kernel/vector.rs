//! Chunked kernels generic over a [`ByteVector`] backend.
//!
//! These are `#[inline(always)]` so they compile into the `#[target_feature]`
//! entry points of each backend. They only cover whole chunks and report how
//! many elements they consumed; the caller handles the rest.

use super::rules::{BitwiseRule, CompareRule};
use super::{aligned_len, Chunked, Lane};
use crate::simd::ByteVector;

#[inline(always)]
pub(crate) unsafe fn all<V: ByteVector, R: CompareRule, A: Lane, B: Lane>(
    lhs: A,
    rhs: B,
    len: usize,
) -> Chunked<bool> {
    let end = aligned_len(len, V::LANES);
    let mut index = 0usize;
    while index < end {
        let mask = R::mask::<V>(lhs.load(index), rhs.load(index));
        index += V::LANES;
        if !mask.all_set() {
            return Chunked::new(false, index);
        }
    }
    Chunked::new(true, end)
}

#[inline(always)]
pub(crate) unsafe fn any<V: ByteVector, R: CompareRule, A: Lane, B: Lane>(
    lhs: A,
    rhs: B,
    len: usize,
) -> Chunked<bool> {
    let end = aligned_len(len, V::LANES);
    let mut index = 0usize;
    while index < end {
        let mask = R::mask::<V>(lhs.load(index), rhs.load(index));
        index += V::LANES;
        if mask.any_set() {
            return Chunked::new(true, index);
        }
    }
    Chunked::new(false, end)
}

#[inline(always)]
pub(crate) unsafe fn find<V: ByteVector, R: CompareRule, A: Lane, B: Lane>(
    lhs: A,
    rhs: B,
    len: usize,
) -> Chunked<Option<usize>> {
    let end = aligned_len(len, V::LANES);
    let mut index = 0usize;
    while index < end {
        let mask = R::mask::<V>(lhs.load(index), rhs.load(index));
        if let Some(lane) = mask.first_set() {
            return Chunked::new(Some(index + lane), index + V::LANES);
        }
        index += V::LANES;
    }
    Chunked::new(None, end)
}

#[inline(always)]
pub(crate) unsafe fn max<V: ByteVector>(data: &[u8]) -> Chunked<Option<u8>> {
    let end = aligned_len(data.len(), V::LANES);
    if end == 0 {
        return Chunked::new(None, 0);
    }
    let ptr = data.as_ptr();
    let mut acc = V::load(ptr);
    let mut index = V::LANES;
    while index < end {
        acc = acc.max(V::load(ptr.add(index)));
        index += V::LANES;
    }
    Chunked::new(Some(acc.max_lane()), end)
}

#[inline(always)]
pub(crate) unsafe fn min<V: ByteVector>(data: &[u8]) -> Chunked<Option<u8>> {
    let end = aligned_len(data.len(), V::LANES);
    if end == 0 {
        return Chunked::new(None, 0);
    }
    let ptr = data.as_ptr();
    let mut acc = V::load(ptr);
    let mut index = V::LANES;
    while index < end {
        acc = acc.min(V::load(ptr.add(index)));
        index += V::LANES;
    }
    Chunked::new(Some(acc.min_lane()), end)
}

#[inline(always)]
pub(crate) unsafe fn sum<V: ByteVector>(data: &[u8]) -> Chunked<u64> {
    let end = aligned_len(data.len(), V::LANES);
    let ptr = data.as_ptr();
    let mut total = 0u64;
    let mut index = 0usize;
    while index < end {
        total += V::load(ptr.add(index)).sum();
        index += V::LANES;
    }
    Chunked::new(total, end)
}

/// `out.len()` is the window; both lanes must cover it.
#[inline(always)]
pub(crate) unsafe fn map<V: ByteVector, R: BitwiseRule, A: Lane, B: Lane>(
    lhs: A,
    rhs: B,
    out: &mut [u8],
) -> usize {
    let end = aligned_len(out.len(), V::LANES);
    let dst = out.as_mut_ptr();
    let mut index = 0usize;
    while index < end {
        let value = R::apply_lanes::<V>(lhs.load(index), rhs.load(index));
        value.store(dst.add(index));
        index += V::LANES;
    }
    end
}

#[inline(always)]
pub(crate) unsafe fn map_in_place<V: ByteVector, R: BitwiseRule, B: Lane>(
    target: &mut [u8],
    rhs: B,
) -> usize {
    let end = aligned_len(target.len(), V::LANES);
    let ptr = target.as_mut_ptr();
    let mut index = 0usize;
    while index < end {
        let value = R::apply_lanes::<V>(V::load(ptr.add(index)), rhs.load(index));
        value.store(ptr.add(index));
        index += V::LANES;
    }
    end
}
