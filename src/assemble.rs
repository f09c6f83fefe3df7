//! Result assembler.
//!
//! Runs the vector kernel over whole chunks when the plan asks for it, then
//! finishes the window with the scalar kernel and combines the two partial
//! results per operation kind.

use crate::kernel::rules::{BitwiseRule, CompareRule};
use crate::kernel::{scalar, Chunked, Lane};
use crate::planner::ExecutionPlan;
use crate::simd;

// Plans handed to these functions come from `planner`, which only picks
// levels the running CPU supports, and every lane covers `len`.

pub(crate) fn all<R: CompareRule, A: Lane, B: Lane>(
    plan: ExecutionPlan,
    lhs: A,
    rhs: B,
    len: usize,
) -> bool {
    let head = match plan {
        ExecutionPlan::Vector(level) => unsafe { simd::all::<R, A, B>(level, lhs, rhs, len) },
        ExecutionPlan::Scalar => Chunked::new(true, 0),
    };
    if !head.value {
        return false;
    }
    let done = head.consumed;
    scalar::all::<R, A, B>(lhs.skip(done), rhs.skip(done), len - done)
}

pub(crate) fn any<R: CompareRule, A: Lane, B: Lane>(
    plan: ExecutionPlan,
    lhs: A,
    rhs: B,
    len: usize,
) -> bool {
    let head = match plan {
        ExecutionPlan::Vector(level) => unsafe { simd::any::<R, A, B>(level, lhs, rhs, len) },
        ExecutionPlan::Scalar => Chunked::new(false, 0),
    };
    if head.value {
        return true;
    }
    let done = head.consumed;
    scalar::any::<R, A, B>(lhs.skip(done), rhs.skip(done), len - done)
}

/// Earliest matching index; a hit in the vector chunks wins.
pub(crate) fn find<R: CompareRule, A: Lane, B: Lane>(
    plan: ExecutionPlan,
    lhs: A,
    rhs: B,
    len: usize,
) -> Option<usize> {
    let head = match plan {
        ExecutionPlan::Vector(level) => unsafe { simd::find::<R, A, B>(level, lhs, rhs, len) },
        ExecutionPlan::Scalar => Chunked::new(None, 0),
    };
    if head.value.is_some() {
        return head.value;
    }
    let done = head.consumed;
    scalar::find::<R, A, B>(lhs.skip(done), rhs.skip(done), len - done).map(|index| index + done)
}

fn merge(head: Option<u8>, tail: Option<u8>, pick: fn(u8, u8) -> u8) -> Option<u8> {
    match (head, tail) {
        (Some(head), Some(tail)) => Some(pick(head, tail)),
        (head, tail) => head.or(tail),
    }
}

pub(crate) fn max(plan: ExecutionPlan, data: &[u8]) -> Option<u8> {
    let head = match plan {
        ExecutionPlan::Vector(level) => unsafe { simd::max(level, data) },
        ExecutionPlan::Scalar => Chunked::new(None, 0),
    };
    merge(head.value, scalar::max(&data[head.consumed..]), u8::max)
}

pub(crate) fn min(plan: ExecutionPlan, data: &[u8]) -> Option<u8> {
    let head = match plan {
        ExecutionPlan::Vector(level) => unsafe { simd::min(level, data) },
        ExecutionPlan::Scalar => Chunked::new(None, 0),
    };
    merge(head.value, scalar::min(&data[head.consumed..]), u8::min)
}

pub(crate) fn sum(plan: ExecutionPlan, data: &[u8]) -> u64 {
    let head = match plan {
        ExecutionPlan::Vector(level) => unsafe { simd::sum(level, data) },
        ExecutionPlan::Scalar => Chunked::new(0, 0),
    };
    head.value + scalar::sum(&data[head.consumed..])
}

pub(crate) fn map<R: BitwiseRule, A: Lane, B: Lane>(
    plan: ExecutionPlan,
    lhs: A,
    rhs: B,
    out: &mut [u8],
) {
    let done = match plan {
        ExecutionPlan::Vector(level) => unsafe { simd::map::<R, A, B>(level, lhs, rhs, out) },
        ExecutionPlan::Scalar => 0,
    };
    scalar::map::<R, A, B>(lhs.skip(done), rhs.skip(done), &mut out[done..]);
}

pub(crate) fn map_in_place<R: BitwiseRule, B: Lane>(plan: ExecutionPlan, target: &mut [u8], rhs: B) {
    let done = match plan {
        ExecutionPlan::Vector(level) => unsafe { simd::map_in_place::<R, B>(level, target, rhs) },
        ExecutionPlan::Scalar => 0,
    };
    scalar::map_in_place::<R, B>(&mut target[done..], rhs.skip(done));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::rules::{EqRule, GeRule, NeRule, NotRule, ShrRule, XorRule};
    use crate::kernel::Splat;

    fn plans() -> Vec<ExecutionPlan> {
        let mut plans = vec![ExecutionPlan::Scalar];
        plans.extend(simd::supported_levels().into_iter().map(ExecutionPlan::Vector));
        plans
    }

    fn ramp(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 7 + 3) as u8).collect()
    }

    #[test]
    fn test_match_in_remainder() {
        for plan in plans() {
            let mut data = vec![101u8; 96];
            data[94] = 100;
            assert!(any::<EqRule, _, _>(plan, &data[..], Splat(100), 96), "{plan}");
            assert_eq!(find::<EqRule, _, _>(plan, &data[..], Splat(100), 96), Some(94));
            assert!(!all::<NeRule, _, _>(plan, &data[..], Splat(100), 96));
        }
    }

    #[test]
    fn test_find_prefers_first_chunk() {
        for plan in plans() {
            let mut data = vec![0u8; 100];
            data[5] = 9;
            data[70] = 9;
            data[99] = 9;
            assert_eq!(find::<EqRule, _, _>(plan, &data[..], Splat(9), 100), Some(5));
            assert_eq!(find::<EqRule, _, _>(plan, &data[..], Splat(9), 5), None);
        }
    }

    #[test]
    fn test_folds_combine_head_and_tail() {
        for plan in plans() {
            let mut data = vec![50u8; 67];
            data[66] = 255;
            data[0] = 0;
            assert_eq!(max(plan, &data), Some(255));
            assert_eq!(min(plan, &data), Some(0));
            assert_eq!(sum(plan, &data), 50 * 65 + 255);
        }
    }

    #[test]
    fn test_two_sequence_predicates() {
        for plan in plans() {
            let lhs = ramp(77);
            let mut rhs = lhs.clone();
            assert!(all::<GeRule, _, _>(plan, &lhs[..], &rhs[..], 77));
            rhs[76] = 255;
            assert!(!all::<GeRule, _, _>(plan, &lhs[..], &rhs[..], 77));
            assert!(all::<GeRule, _, _>(plan, &lhs[..], &rhs[..], 76));
        }
    }

    #[test]
    fn test_maps_match_scalar() {
        let lhs = ramp(83);
        let amounts: Vec<u8> = (0..83).map(|i| (i % 11) as u8).collect();
        let mut expected = vec![0u8; 83];
        scalar::map::<ShrRule, _, _>(&lhs[..], &amounts[..], &mut expected);
        for plan in plans() {
            let mut out = vec![0u8; 83];
            map::<ShrRule, _, _>(plan, &lhs[..], &amounts[..], &mut out);
            assert_eq!(out, expected, "{plan}");

            let mut target = lhs.clone();
            map_in_place::<XorRule, _>(plan, &mut target, Splat(0xFF));
            map_in_place::<NotRule, _>(plan, &mut target, Splat(0));
            assert_eq!(target, lhs, "{plan}");
        }
    }
}
