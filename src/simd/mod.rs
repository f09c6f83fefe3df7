//! Vector backends and their runtime selection.
//!
//! Each backend implements [`ByteVector`] for one register width and
//! instantiates the generic kernels of [`crate::kernel::vector`] inside
//! `#[target_feature]` entry points. The functions at the bottom of this
//! module route a call to the entry points of one [`SimdLevel`].

use crate::kernel::rules::{BitwiseRule, CompareRule};
use crate::kernel::{Chunked, Lane};

/// A register of byte lanes.
///
/// Comparison results are lane masks: `0xFF` for true, `0x00` for false.
/// The mask queries (`all_set`, `any_set`, `first_set`) only look at the
/// high bit of each lane and expect such masks.
///
/// Every method is `unsafe` because it is only sound on a CPU that supports
/// the implementing backend.
pub(crate) trait ByteVector: Copy {
    const LANES: usize;

    unsafe fn splat(value: u8) -> Self;
    unsafe fn load(ptr: *const u8) -> Self;
    unsafe fn store(self, ptr: *mut u8);

    unsafe fn cmpeq(self, other: Self) -> Self;
    unsafe fn max(self, other: Self) -> Self;
    unsafe fn min(self, other: Self) -> Self;
    unsafe fn and(self, other: Self) -> Self;
    unsafe fn or(self, other: Self) -> Self;
    unsafe fn xor(self, other: Self) -> Self;
    /// Shift every lane by the same amount, `amount < 8`.
    unsafe fn shl(self, amount: u8) -> Self;
    unsafe fn shr(self, amount: u8) -> Self;

    unsafe fn all_set(self) -> bool;
    unsafe fn any_set(self) -> bool;
    unsafe fn first_set(self) -> Option<usize>;

    unsafe fn sum(self) -> u64;
    unsafe fn max_lane(self) -> u8;
    unsafe fn min_lane(self) -> u8;

    #[inline(always)]
    unsafe fn not(self) -> Self {
        self.xor(Self::splat(0xFF))
    }
}

/// Instantiate the vector kernels for one backend.
macro_rules! vector_entries {
    ($feature:literal, $vector:ty) => {
        use $crate::kernel::rules::{BitwiseRule, CompareRule};
        use $crate::kernel::{vector, Chunked, Lane};

        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn all<R: CompareRule, A: Lane, B: Lane>(
            lhs: A,
            rhs: B,
            len: usize,
        ) -> Chunked<bool> {
            vector::all::<$vector, R, A, B>(lhs, rhs, len)
        }

        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn any<R: CompareRule, A: Lane, B: Lane>(
            lhs: A,
            rhs: B,
            len: usize,
        ) -> Chunked<bool> {
            vector::any::<$vector, R, A, B>(lhs, rhs, len)
        }

        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn find<R: CompareRule, A: Lane, B: Lane>(
            lhs: A,
            rhs: B,
            len: usize,
        ) -> Chunked<Option<usize>> {
            vector::find::<$vector, R, A, B>(lhs, rhs, len)
        }

        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn max(data: &[u8]) -> Chunked<Option<u8>> {
            vector::max::<$vector>(data)
        }

        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn min(data: &[u8]) -> Chunked<Option<u8>> {
            vector::min::<$vector>(data)
        }

        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn sum(data: &[u8]) -> Chunked<u64> {
            vector::sum::<$vector>(data)
        }

        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn map<R: BitwiseRule, A: Lane, B: Lane>(
            lhs: A,
            rhs: B,
            out: &mut [u8],
        ) -> usize {
            vector::map::<$vector, R, A, B>(lhs, rhs, out)
        }

        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn map_in_place<R: BitwiseRule, B: Lane>(
            target: &mut [u8],
            rhs: B,
        ) -> usize {
            vector::map_in_place::<$vector, R, B>(target, rhs)
        }
    };
}

mod cpu;
pub mod dispatch;

#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(target_arch = "x86_64")]
mod x86;

pub use cpu::{capabilities, SimdCapabilities, SIMD_MAX_ENV};
pub use dispatch::{
    active_level, global_mode, resolve, supported_levels, SimdLevel, SimdMode, SIMD_MODE_ENV,
};

/// Call the entry point `$entry` of the backend for `$level`, or evaluate
/// `$fallback` when no backend is compiled in for it.
macro_rules! route {
    ($level:expr, $entry:ident $(::<$($generic:ty),+>)? ($($arg:expr),*), $fallback:expr) => {
        match $level {
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Avx2 => x86::avx2::$entry $(::<$($generic),+>)? ($($arg),*),
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Sse2 => x86::sse2::$entry $(::<$($generic),+>)? ($($arg),*),
            #[cfg(target_arch = "aarch64")]
            SimdLevel::Neon => neon::entries::$entry $(::<$($generic),+>)? ($($arg),*),
            _ => $fallback,
        }
    };
}

// The routed functions below share one contract.
//
// # Safety
// `level` must be supported by the running CPU (see `SimdLevel::supported`)
// and `len` must not exceed the length of any sequence lane. A level with no
// backend consumes nothing and leaves the whole window to the scalar kernel.

#[allow(unused_variables)]
pub(crate) unsafe fn all<R: CompareRule, A: Lane, B: Lane>(
    level: SimdLevel,
    lhs: A,
    rhs: B,
    len: usize,
) -> Chunked<bool> {
    route!(level, all::<R, A, B>(lhs, rhs, len), Chunked::new(true, 0))
}

#[allow(unused_variables)]
pub(crate) unsafe fn any<R: CompareRule, A: Lane, B: Lane>(
    level: SimdLevel,
    lhs: A,
    rhs: B,
    len: usize,
) -> Chunked<bool> {
    route!(level, any::<R, A, B>(lhs, rhs, len), Chunked::new(false, 0))
}

#[allow(unused_variables)]
pub(crate) unsafe fn find<R: CompareRule, A: Lane, B: Lane>(
    level: SimdLevel,
    lhs: A,
    rhs: B,
    len: usize,
) -> Chunked<Option<usize>> {
    route!(level, find::<R, A, B>(lhs, rhs, len), Chunked::new(None, 0))
}

#[allow(unused_variables)]
pub(crate) unsafe fn max(level: SimdLevel, data: &[u8]) -> Chunked<Option<u8>> {
    route!(level, max(data), Chunked::new(None, 0))
}

#[allow(unused_variables)]
pub(crate) unsafe fn min(level: SimdLevel, data: &[u8]) -> Chunked<Option<u8>> {
    route!(level, min(data), Chunked::new(None, 0))
}

#[allow(unused_variables)]
pub(crate) unsafe fn sum(level: SimdLevel, data: &[u8]) -> Chunked<u64> {
    route!(level, sum(data), Chunked::new(0, 0))
}

#[allow(unused_variables)]
pub(crate) unsafe fn map<R: BitwiseRule, A: Lane, B: Lane>(
    level: SimdLevel,
    lhs: A,
    rhs: B,
    out: &mut [u8],
) -> usize {
    route!(level, map::<R, A, B>(lhs, rhs, out), 0)
}

#[allow(unused_variables)]
pub(crate) unsafe fn map_in_place<R: BitwiseRule, B: Lane>(
    level: SimdLevel,
    target: &mut [u8],
    rhs: B,
) -> usize {
    route!(level, map_in_place::<R, B>(target, rhs), 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run `check` once per backend the running CPU supports.
    fn each_level(mut check: impl FnMut(SimdLevel)) {
        for level in supported_levels() {
            check(level);
        }
    }

    #[test]
    fn test_sum_matches_scalar_on_full_lanes() {
        each_level(|level| {
            let data: Vec<u8> = (0..=255u8).cycle().take(level.lanes() * 5).collect();
            let chunk = unsafe { sum(level, &data) };
            assert_eq!(chunk.consumed, data.len());
            let expected: u64 = data.iter().map(|&b| u64::from(b)).sum();
            assert_eq!(chunk.value, expected, "{}", level.label());
        });
    }

    #[test]
    fn test_max_min_leave_remainder() {
        each_level(|level| {
            let mut data = vec![7u8; level.lanes() * 2 + 3];
            data[level.lanes() + 1] = 200;
            data[3] = 1;
            let last = data.len() - 1;
            data[last] = 255;
            let high = unsafe { max(level, &data) };
            let low = unsafe { min(level, &data) };
            assert_eq!(high, Chunked::new(Some(200), level.lanes() * 2));
            assert_eq!(low, Chunked::new(Some(1), level.lanes() * 2));
        });
    }

    #[test]
    fn test_short_input_consumes_nothing() {
        each_level(|level| {
            let data = vec![9u8; level.lanes() - 1];
            assert_eq!(unsafe { max(level, &data) }, Chunked::new(None, 0));
            assert_eq!(unsafe { sum(level, &data) }, Chunked::new(0, 0));
        });
    }

    #[test]
    fn test_scalar_level_falls_back() {
        let data = [1u8; 64];
        assert_eq!(unsafe { sum(SimdLevel::Scalar, &data) }, Chunked::new(0, 0));
        assert_eq!(
            unsafe { all::<crate::kernel::rules::EqRule, _, _>(SimdLevel::Scalar, &data[..], &data[..], 64) },
            Chunked::new(true, 0)
        );
    }
}
