//! Element rules as zero-sized types, so every kernel is monomorphised per
//! rule and the hot loops carry no operator branch.

use std::marker::PhantomData;

use crate::registry::{BitOp, CompareOp};
use crate::simd::ByteVector;

pub(crate) trait CompareRule {
    const OP: CompareOp;

    #[inline(always)]
    fn test(lhs: u8, rhs: u8) -> bool {
        Self::OP.test(lhs, rhs)
    }

    /// Lane mask: `0xFF` where the rule holds, `0x00` elsewhere.
    ///
    /// # Safety
    /// The CPU must support `V`.
    unsafe fn mask<V: ByteVector>(lhs: V, rhs: V) -> V;
}

pub(crate) struct EqRule;
pub(crate) struct NeRule;
pub(crate) struct LtRule;
pub(crate) struct LeRule;
pub(crate) struct GtRule;
pub(crate) struct GeRule;

// Unsigned ordering is derived from max/min because SSE2 has no unsigned
// byte compare.
impl CompareRule for EqRule {
    const OP: CompareOp = CompareOp::Eq;

    #[inline(always)]
    unsafe fn mask<V: ByteVector>(lhs: V, rhs: V) -> V {
        lhs.cmpeq(rhs)
    }
}

impl CompareRule for NeRule {
    const OP: CompareOp = CompareOp::Ne;

    #[inline(always)]
    unsafe fn mask<V: ByteVector>(lhs: V, rhs: V) -> V {
        lhs.cmpeq(rhs).not()
    }
}

impl CompareRule for GeRule {
    const OP: CompareOp = CompareOp::Ge;

    #[inline(always)]
    unsafe fn mask<V: ByteVector>(lhs: V, rhs: V) -> V {
        lhs.max(rhs).cmpeq(lhs)
    }
}

impl CompareRule for LeRule {
    const OP: CompareOp = CompareOp::Le;

    #[inline(always)]
    unsafe fn mask<V: ByteVector>(lhs: V, rhs: V) -> V {
        lhs.min(rhs).cmpeq(lhs)
    }
}

impl CompareRule for GtRule {
    const OP: CompareOp = CompareOp::Gt;

    #[inline(always)]
    unsafe fn mask<V: ByteVector>(lhs: V, rhs: V) -> V {
        lhs.min(rhs).cmpeq(lhs).not()
    }
}

impl CompareRule for LtRule {
    const OP: CompareOp = CompareOp::Lt;

    #[inline(always)]
    unsafe fn mask<V: ByteVector>(lhs: V, rhs: V) -> V {
        lhs.max(rhs).cmpeq(lhs).not()
    }
}

pub(crate) trait BitwiseRule {
    fn apply(lhs: u8, rhs: u8) -> u8;

    /// # Safety
    /// The CPU must support `V`.
    unsafe fn apply_lanes<V: ByteVector>(lhs: V, rhs: V) -> V;
}

macro_rules! bitwise_rule {
    ($name:ident, $op:expr, |$lhs:ident, $rhs:ident| $lanes:expr) => {
        pub(crate) struct $name;

        impl BitwiseRule for $name {
            #[inline(always)]
            fn apply(lhs: u8, rhs: u8) -> u8 {
                $op.apply(lhs, rhs)
            }

            #[inline(always)]
            unsafe fn apply_lanes<V: ByteVector>($lhs: V, $rhs: V) -> V {
                $lanes
            }
        }
    };
}

bitwise_rule!(AndRule, BitOp::And, |lhs, rhs| lhs.and(rhs));
bitwise_rule!(OrRule, BitOp::Or, |lhs, rhs| lhs.or(rhs));
bitwise_rule!(XorRule, BitOp::Xor, |lhs, rhs| lhs.xor(rhs));
bitwise_rule!(ShlRule, BitOp::Shl, |lhs, rhs| shift_lanes(lhs, rhs, true));
bitwise_rule!(ShrRule, BitOp::Shr, |lhs, rhs| shift_lanes(lhs, rhs, false));
bitwise_rule!(NotRule, BitOp::Not, |lhs, _rhs| lhs.not());

/// `R` with its operands exchanged. Used when the sequence being written in
/// place is the right-hand operand, as in `lshift(1, data)`.
pub(crate) struct Swapped<R>(PhantomData<R>);

impl<R: BitwiseRule> BitwiseRule for Swapped<R> {
    #[inline(always)]
    fn apply(lhs: u8, rhs: u8) -> u8 {
        R::apply(rhs, lhs)
    }

    #[inline(always)]
    unsafe fn apply_lanes<V: ByteVector>(lhs: V, rhs: V) -> V {
        R::apply_lanes(rhs, lhs)
    }
}

/// Per-lane variable shift built from uniform shifts by 1, 2 and 4, each
/// blended in where the matching bit of the amount is set. Lanes whose
/// amount is 8 or more are cleared.
#[inline(always)]
unsafe fn shift_lanes<V: ByteVector>(value: V, amounts: V, left: bool) -> V {
    let mut acc = value;
    for step in [1u8, 2, 4] {
        let bit = V::splat(step);
        let select = amounts.and(bit).cmpeq(bit);
        let moved = if left { acc.shl(step) } else { acc.shr(step) };
        acc = acc.xor(acc.xor(moved).and(select));
    }
    let too_wide = amounts.max(V::splat(8)).cmpeq(amounts);
    acc.and(too_wide.not())
}

/// Run `$body` with `$rule` bound to the comparison rule type for `$op`.
macro_rules! with_compare_rule {
    ($op:expr, $rule:ident => $body:expr) => {
        match $op {
            $crate::registry::CompareOp::Eq => {
                type $rule = $crate::kernel::rules::EqRule;
                $body
            }
            $crate::registry::CompareOp::Ne => {
                type $rule = $crate::kernel::rules::NeRule;
                $body
            }
            $crate::registry::CompareOp::Lt => {
                type $rule = $crate::kernel::rules::LtRule;
                $body
            }
            $crate::registry::CompareOp::Le => {
                type $rule = $crate::kernel::rules::LeRule;
                $body
            }
            $crate::registry::CompareOp::Gt => {
                type $rule = $crate::kernel::rules::GtRule;
                $body
            }
            $crate::registry::CompareOp::Ge => {
                type $rule = $crate::kernel::rules::GeRule;
                $body
            }
        }
    };
}

macro_rules! with_bitwise_rule {
    ($op:expr, $rule:ident => $body:expr) => {
        match $op {
            $crate::registry::BitOp::And => {
                type $rule = $crate::kernel::rules::AndRule;
                $body
            }
            $crate::registry::BitOp::Or => {
                type $rule = $crate::kernel::rules::OrRule;
                $body
            }
            $crate::registry::BitOp::Xor => {
                type $rule = $crate::kernel::rules::XorRule;
                $body
            }
            $crate::registry::BitOp::Shl => {
                type $rule = $crate::kernel::rules::ShlRule;
                $body
            }
            $crate::registry::BitOp::Shr => {
                type $rule = $crate::kernel::rules::ShrRule;
                $body
            }
            $crate::registry::BitOp::Not => {
                type $rule = $crate::kernel::rules::NotRule;
                $body
            }
        }
    };
}

pub(crate) use with_bitwise_rule;
pub(crate) use with_compare_rule;
