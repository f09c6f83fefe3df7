use std::arch::x86_64::*;

use super::ByteVector;

#[derive(Clone, Copy)]
pub(crate) struct Sse2(__m128i);

impl ByteVector for Sse2 {
    const LANES: usize = 16;

    #[inline(always)]
    unsafe fn splat(value: u8) -> Self {
        Sse2(_mm_set1_epi8(value as i8))
    }

    #[inline(always)]
    unsafe fn load(ptr: *const u8) -> Self {
        Sse2(_mm_loadu_si128(ptr as *const __m128i))
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut u8) {
        _mm_storeu_si128(ptr as *mut __m128i, self.0)
    }

    #[inline(always)]
    unsafe fn cmpeq(self, other: Self) -> Self {
        Sse2(_mm_cmpeq_epi8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn max(self, other: Self) -> Self {
        Sse2(_mm_max_epu8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn min(self, other: Self) -> Self {
        Sse2(_mm_min_epu8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn and(self, other: Self) -> Self {
        Sse2(_mm_and_si128(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
        Sse2(_mm_or_si128(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        Sse2(_mm_xor_si128(self.0, other.0))
    }

    // There is no byte shift; shift 16-bit lanes and clear the bits that
    // crossed into the neighbouring byte.
    #[inline(always)]
    unsafe fn shl(self, amount: u8) -> Self {
        let count = _mm_cvtsi32_si128(i32::from(amount));
        let keep = _mm_set1_epi8((0xFFu8 << amount) as i8);
        Sse2(_mm_and_si128(_mm_sll_epi16(self.0, count), keep))
    }

    #[inline(always)]
    unsafe fn shr(self, amount: u8) -> Self {
        let count = _mm_cvtsi32_si128(i32::from(amount));
        let keep = _mm_set1_epi8((0xFFu8 >> amount) as i8);
        Sse2(_mm_and_si128(_mm_srl_epi16(self.0, count), keep))
    }

    #[inline(always)]
    unsafe fn all_set(self) -> bool {
        _mm_movemask_epi8(self.0) == 0xFFFF
    }

    #[inline(always)]
    unsafe fn any_set(self) -> bool {
        _mm_movemask_epi8(self.0) != 0
    }

    #[inline(always)]
    unsafe fn first_set(self) -> Option<usize> {
        let bits = _mm_movemask_epi8(self.0) as u32;
        if bits == 0 {
            None
        } else {
            Some(bits.trailing_zeros() as usize)
        }
    }

    #[inline(always)]
    unsafe fn sum(self) -> u64 {
        let sad = _mm_sad_epu8(self.0, _mm_setzero_si128());
        let lo = _mm_cvtsi128_si64(sad) as u64;
        let hi = _mm_cvtsi128_si64(_mm_unpackhi_epi64(sad, sad)) as u64;
        lo + hi
    }

    #[inline(always)]
    unsafe fn max_lane(self) -> u8 {
        let mut buf = [0u8; 16];
        self.store(buf.as_mut_ptr());
        buf.iter().copied().fold(0, u8::max)
    }

    #[inline(always)]
    unsafe fn min_lane(self) -> u8 {
        let mut buf = [0u8; 16];
        self.store(buf.as_mut_ptr());
        buf.iter().copied().fold(u8::MAX, u8::min)
    }
}

#[derive(Clone, Copy)]
pub(crate) struct Avx2(__m256i);

impl ByteVector for Avx2 {
    const LANES: usize = 32;

    #[inline(always)]
    unsafe fn splat(value: u8) -> Self {
        Avx2(_mm256_set1_epi8(value as i8))
    }

    #[inline(always)]
    unsafe fn load(ptr: *const u8) -> Self {
        Avx2(_mm256_loadu_si256(ptr as *const __m256i))
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut u8) {
        _mm256_storeu_si256(ptr as *mut __m256i, self.0)
    }

    #[inline(always)]
    unsafe fn cmpeq(self, other: Self) -> Self {
        Avx2(_mm256_cmpeq_epi8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn max(self, other: Self) -> Self {
        Avx2(_mm256_max_epu8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn min(self, other: Self) -> Self {
        Avx2(_mm256_min_epu8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn and(self, other: Self) -> Self {
        Avx2(_mm256_and_si256(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
        Avx2(_mm256_or_si256(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        Avx2(_mm256_xor_si256(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn shl(self, amount: u8) -> Self {
        let count = _mm_cvtsi32_si128(i32::from(amount));
        let keep = _mm256_set1_epi8((0xFFu8 << amount) as i8);
        Avx2(_mm256_and_si256(_mm256_sll_epi16(self.0, count), keep))
    }

    #[inline(always)]
    unsafe fn shr(self, amount: u8) -> Self {
        let count = _mm_cvtsi32_si128(i32::from(amount));
        let keep = _mm256_set1_epi8((0xFFu8 >> amount) as i8);
        Avx2(_mm256_and_si256(_mm256_srl_epi16(self.0, count), keep))
    }

    #[inline(always)]
    unsafe fn all_set(self) -> bool {
        _mm256_movemask_epi8(self.0) == -1
    }

    #[inline(always)]
    unsafe fn any_set(self) -> bool {
        _mm256_movemask_epi8(self.0) != 0
    }

    #[inline(always)]
    unsafe fn first_set(self) -> Option<usize> {
        let bits = _mm256_movemask_epi8(self.0) as u32;
        if bits == 0 {
            None
        } else {
            Some(bits.trailing_zeros() as usize)
        }
    }

    #[inline(always)]
    unsafe fn sum(self) -> u64 {
        let sad = _mm256_sad_epu8(self.0, _mm256_setzero_si256());
        let mut parts = [0u64; 4];
        _mm256_storeu_si256(parts.as_mut_ptr() as *mut __m256i, sad);
        parts.iter().sum()
    }

    #[inline(always)]
    unsafe fn max_lane(self) -> u8 {
        let mut buf = [0u8; 32];
        self.store(buf.as_mut_ptr());
        buf.iter().copied().fold(0, u8::max)
    }

    #[inline(always)]
    unsafe fn min_lane(self) -> u8 {
        let mut buf = [0u8; 32];
        self.store(buf.as_mut_ptr());
        buf.iter().copied().fold(u8::MAX, u8::min)
    }
}

pub(crate) mod sse2 {
    vector_entries!("sse2", super::Sse2);
}

pub(crate) mod avx2 {
    vector_entries!("avx2", super::Avx2);
}
