use std::arch::aarch64::*;

use super::ByteVector;

#[derive(Clone, Copy)]
pub(crate) struct Neon(uint8x16_t);

impl ByteVector for Neon {
    const LANES: usize = 16;

    #[inline(always)]
    unsafe fn splat(value: u8) -> Self {
        Neon(vdupq_n_u8(value))
    }

    #[inline(always)]
    unsafe fn load(ptr: *const u8) -> Self {
        Neon(vld1q_u8(ptr))
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut u8) {
        vst1q_u8(ptr, self.0)
    }

    #[inline(always)]
    unsafe fn cmpeq(self, other: Self) -> Self {
        Neon(vceqq_u8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn max(self, other: Self) -> Self {
        Neon(vmaxq_u8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn min(self, other: Self) -> Self {
        Neon(vminq_u8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn and(self, other: Self) -> Self {
        Neon(vandq_u8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
        Neon(vorrq_u8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        Neon(veorq_u8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn shl(self, amount: u8) -> Self {
        Neon(vshlq_u8(self.0, vdupq_n_s8(amount as i8)))
    }

    // A negative count shifts right.
    #[inline(always)]
    unsafe fn shr(self, amount: u8) -> Self {
        Neon(vshlq_u8(self.0, vdupq_n_s8(-(amount as i8))))
    }

    #[inline(always)]
    unsafe fn all_set(self) -> bool {
        vminvq_u8(self.0) == 0xFF
    }

    #[inline(always)]
    unsafe fn any_set(self) -> bool {
        vmaxvq_u8(self.0) != 0
    }

    // Narrow every mask byte to a nibble; lane i lands in bits 4i..4i+4.
    #[inline(always)]
    unsafe fn first_set(self) -> Option<usize> {
        let narrowed = vshrn_n_u16::<4>(vreinterpretq_u16_u8(self.0));
        let bits = vget_lane_u64::<0>(vreinterpret_u64_u8(narrowed));
        if bits == 0 {
            None
        } else {
            Some((bits.trailing_zeros() / 4) as usize)
        }
    }

    #[inline(always)]
    unsafe fn sum(self) -> u64 {
        u64::from(vaddlvq_u8(self.0))
    }

    #[inline(always)]
    unsafe fn max_lane(self) -> u8 {
        vmaxvq_u8(self.0)
    }

    #[inline(always)]
    unsafe fn min_lane(self) -> u8 {
        vminvq_u8(self.0)
    }
}

pub(crate) mod entries {
    vector_entries!("neon", super::Neon);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_set_nibble_mask() {
        unsafe {
            let mut data = [0u8; 16];
            data[13] = 1;
            data[15] = 1;
            let mask = Neon::load(data.as_ptr()).cmpeq(Neon::splat(1));
            assert_eq!(mask.first_set(), Some(13));
            assert_eq!(Neon::splat(0).first_set(), None);
        }
    }

    #[test]
    fn test_shift_right_uses_negative_count() {
        unsafe {
            let mut buf = [0u8; 16];
            Neon::splat(0b1010_0000).shr(5).store(buf.as_mut_ptr());
            assert!(buf.iter().all(|&b| b == 0b101));
        }
    }

    #[test]
    fn test_sum_is_widened() {
        unsafe {
            assert_eq!(Neon::splat(255).sum(), 255 * 16);
        }
    }
}
