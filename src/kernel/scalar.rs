//! Reference kernels: one pass over the window, element by element.

use super::rules::{BitwiseRule, CompareRule};
use super::Lane;

#[inline]
pub(crate) fn all<R: CompareRule, A: Lane, B: Lane>(lhs: A, rhs: B, len: usize) -> bool {
    (0..len).all(|index| R::test(lhs.at(index), rhs.at(index)))
}

#[inline]
pub(crate) fn any<R: CompareRule, A: Lane, B: Lane>(lhs: A, rhs: B, len: usize) -> bool {
    (0..len).any(|index| R::test(lhs.at(index), rhs.at(index)))
}

#[inline]
pub(crate) fn find<R: CompareRule, A: Lane, B: Lane>(lhs: A, rhs: B, len: usize) -> Option<usize> {
    (0..len).position(|index| R::test(lhs.at(index), rhs.at(index)))
}

/// `None` only for an empty slice; the first element seeds the fold.
#[inline]
pub(crate) fn max(data: &[u8]) -> Option<u8> {
    data.iter().copied().reduce(u8::max)
}

#[inline]
pub(crate) fn min(data: &[u8]) -> Option<u8> {
    data.iter().copied().reduce(u8::min)
}

#[inline]
pub(crate) fn sum(data: &[u8]) -> u64 {
    data.iter().map(|&byte| u64::from(byte)).sum()
}

/// Write `R(lhs[i], rhs[i])` into every element of `out`.
#[inline]
pub(crate) fn map<R: BitwiseRule, A: Lane, B: Lane>(lhs: A, rhs: B, out: &mut [u8]) {
    for (index, slot) in out.iter_mut().enumerate() {
        *slot = R::apply(lhs.at(index), rhs.at(index));
    }
}

/// Replace every element of `target` with `R(target[i], rhs[i])`.
#[inline]
pub(crate) fn map_in_place<R: BitwiseRule, B: Lane>(target: &mut [u8], rhs: B) {
    for (index, slot) in target.iter_mut().enumerate() {
        *slot = R::apply(*slot, rhs.at(index));
    }
}
