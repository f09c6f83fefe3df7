use bytelanes::{
    find_index, invert, predicate_all, predicate_any, reduce_max, reduce_min, reduce_sum,
    transform, ByteSeq, CallOptions,
};
use proptest::prelude::*;

const COMPARE_TOKENS: [&str; 6] = ["==", "!=", "<", "<=", ">", ">="];
const BIT_TOKENS: [&str; 5] = ["and", "or", "xor", "lshift", "rshift"];

fn compare(token: &str, lhs: u8, rhs: u8) -> bool {
    match token {
        "==" => lhs == rhs,
        "!=" => lhs != rhs,
        "<" => lhs < rhs,
        "<=" => lhs <= rhs,
        ">" => lhs > rhs,
        _ => lhs >= rhs,
    }
}

fn bitwise(token: &str, lhs: u8, rhs: u8) -> u8 {
    match token {
        "and" => lhs & rhs,
        "or" => lhs | rhs,
        "xor" => lhs ^ rhs,
        "lshift" => lhs.checked_shl(u32::from(rhs)).unwrap_or(0),
        _ => lhs.checked_shr(u32::from(rhs)).unwrap_or(0),
    }
}

fn options(nosimd: bool) -> CallOptions {
    CallOptions::new().with_nosimd(nosimd)
}

/// Mostly short bytes around a pivot so matches are neither certain nor rare.
fn bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop_oneof![3 => 0u8..8, 1 => any::<u8>()], 0..max_len)
}

fn pair(max_len: usize) -> impl Strategy<Value = (Vec<u8>, Vec<u8>)> {
    bytes(max_len).prop_flat_map(|lhs| {
        let len = lhs.len();
        (Just(lhs), prop::collection::vec(prop_oneof![3 => 0u8..8, 1 => any::<u8>()], len))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_predicates_match_naive(
        data in bytes(200),
        value in 0u8..8,
        token in prop::sample::select(COMPARE_TOKENS.to_vec()),
        nosimd in any::<bool>(),
    ) {
        let all = data.iter().all(|&b| compare(token, b, value));
        prop_assert_eq!(predicate_all(token, &data, value, &options(nosimd)).unwrap(), all);
        let swapped = data.iter().all(|&b| compare(token, value, b));
        prop_assert_eq!(predicate_all(token, value, &data, &options(nosimd)).unwrap(), swapped);
        if !data.is_empty() {
            let any = data.iter().any(|&b| compare(token, b, value));
            prop_assert_eq!(predicate_any(token, &data, value, &options(nosimd)).unwrap(), any);
            let first = data.iter().position(|&b| compare(token, b, value));
            prop_assert_eq!(find_index(token, &data, value, &options(nosimd)).unwrap(), first);
        }
    }

    #[test]
    fn prop_two_sequence_predicates_match_naive(
        (lhs, rhs) in pair(200),
        token in prop::sample::select(COMPARE_TOKENS.to_vec()),
        nosimd in any::<bool>(),
    ) {
        let all = lhs.iter().zip(&rhs).all(|(&a, &b)| compare(token, a, b));
        prop_assert_eq!(predicate_all(token, &lhs, &rhs, &options(nosimd)).unwrap(), all);
        if !lhs.is_empty() {
            let first = lhs.iter().zip(&rhs).position(|(&a, &b)| compare(token, a, b));
            prop_assert_eq!(find_index(token, &lhs, &rhs, &options(nosimd)).unwrap(), first);
        }
    }

    #[test]
    fn prop_reductions_match_naive(data in prop::collection::vec(any::<u8>(), 1..300), nosimd in any::<bool>()) {
        let expected_sum: u64 = data.iter().map(|&b| u64::from(b)).sum();
        prop_assert_eq!(reduce_sum(&data, &options(nosimd)).unwrap(), expected_sum);
        prop_assert_eq!(reduce_max(&data, &options(nosimd)).unwrap(), *data.iter().max().unwrap());
        prop_assert_eq!(reduce_min(&data, &options(nosimd)).unwrap(), *data.iter().min().unwrap());
    }

    #[test]
    fn prop_transforms_match_naive(
        (lhs, rhs) in pair(150),
        value in 0u8..10,
        token in prop::sample::select(BIT_TOKENS.to_vec()),
    ) {
        let expected: Vec<u8> = lhs.iter().zip(&rhs).map(|(&a, &b)| bitwise(token, a, b)).collect();
        for nosimd in [false, true] {
            let mut out = vec![0u8; lhs.len()];
            transform(token, &lhs, &rhs, Some(ByteSeq::from(&mut out)), &options(nosimd)).unwrap();
            prop_assert_eq!(&out, &expected);

            let mut target = lhs.clone();
            transform(token, &mut target, value, None, &options(nosimd)).unwrap();
            let in_place: Vec<u8> = lhs.iter().map(|&a| bitwise(token, a, value)).collect();
            prop_assert_eq!(&target, &in_place);

            let mut target = rhs.clone();
            transform(token, value, &mut target, None, &options(nosimd)).unwrap();
            let swapped: Vec<u8> = rhs.iter().map(|&b| bitwise(token, value, b)).collect();
            prop_assert_eq!(&target, &swapped);
        }
    }

    #[test]
    fn prop_window_equals_truncation(
        (lhs, rhs, cut) in pair(200)
            .prop_filter("non-empty", |(lhs, _)| !lhs.is_empty())
            .prop_flat_map(|(lhs, rhs)| {
                let len = lhs.len();
                (Just(lhs), Just(rhs), 1..=len)
            }),
        token in prop::sample::select(COMPARE_TOKENS.to_vec()),
    ) {
        let limited = CallOptions::new().with_maxlen(cut);
        let (head_l, head_r) = (&lhs[..cut], &rhs[..cut]);
        let plain = CallOptions::new();
        prop_assert_eq!(
            predicate_all(token, &lhs, &rhs, &limited).unwrap(),
            predicate_all(token, head_l, head_r, &plain).unwrap()
        );
        prop_assert_eq!(
            predicate_any(token, &lhs, &rhs, &limited).unwrap(),
            predicate_any(token, head_l, head_r, &plain).unwrap()
        );
        prop_assert_eq!(
            find_index(token, &lhs, &rhs, &limited).unwrap(),
            find_index(token, head_l, head_r, &plain).unwrap()
        );
        prop_assert_eq!(reduce_sum(&lhs, &limited).unwrap(), reduce_sum(head_l, &plain).unwrap());
        prop_assert_eq!(reduce_max(&lhs, &limited).unwrap(), reduce_max(head_l, &plain).unwrap());
    }

    #[test]
    fn prop_short_circuit_ignores_suffix(
        prefix in bytes(100),
        suffix in bytes(100),
        nosimd in any::<bool>(),
    ) {
        let mut data = prefix.clone();
        data.push(200);
        data.extend_from_slice(&suffix);
        prop_assert!(predicate_any("==", &data, 200u8, &options(nosimd)).unwrap());
        prop_assert!(!predicate_all("!=", &data, 200u8, &options(nosimd)).unwrap());
    }

    #[test]
    fn prop_double_complement(data in prop::collection::vec(any::<u8>(), 0..300), nosimd in any::<bool>()) {
        let mut buf = data.clone();
        invert(&mut buf, None, &options(nosimd)).unwrap();
        invert(&mut buf, None, &options(nosimd)).unwrap();
        prop_assert_eq!(buf, data);
    }

    #[test]
    fn prop_out_of_range_always_rejected(
        data in bytes(50),
        value in prop_oneof![i64::MIN..0, 256i64..i64::MAX],
        token in prop::sample::select(COMPARE_TOKENS.to_vec()),
    ) {
        let err = predicate_any(token, &data, value, &CallOptions::new()).unwrap_err();
        prop_assert_eq!(err, bytelanes::Error::OperandDomainOverflow { value });
    }
}
