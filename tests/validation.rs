use bytelanes::{
    find_index, invoke, reduce_max, reduce_sum, transform, Arg, ByteSeq, CallOptions, Error,
    OptionValue,
};

#[test]
fn test_unknown_function() {
    let err = invoke("bmedian", vec![], &[]).unwrap_err();
    assert!(matches!(err, Error::UnknownOperator { .. }));
}

#[test]
fn test_arity_is_checked_first() {
    let err = invoke("bany", vec![Arg::Str("=="), Arg::Int(300)], &[]).unwrap_err();
    assert_eq!(
        err,
        Error::InvalidArity {
            function: "bany",
            expected: "3",
            found: 2
        }
    );
    let data = [1u8];
    let mut a = [0u8];
    let mut b = [0u8];
    let err = invoke(
        "xor",
        vec![
            Arg::Bytes(&data),
            Arg::Int(1),
            Arg::ByteArray(&mut a),
            Arg::ByteArray(&mut b),
        ],
        &[],
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidArity { found: 4, .. }));
}

#[test]
fn test_operand_type_before_range() {
    let err = invoke(
        "eq",
        vec![Arg::Unsupported("list".to_string()), Arg::Int(999)],
        &[],
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::UnsupportedOperandType {
            function: "eq",
            position: 0,
            found: "list".to_string()
        }
    );
}

#[test]
fn test_operator_must_be_text() {
    let data = [1u8];
    let err = invoke("ball", vec![Arg::Int(1), Arg::Bytes(&data), Arg::Int(1)], &[]).unwrap_err();
    assert!(matches!(err, Error::UnsupportedOperandType { position: 0, .. }));
}

#[test]
fn test_range_before_operator() {
    let data = [1u8];
    let err = invoke("ball", vec![Arg::Str("=>"), Arg::Bytes(&data), Arg::Int(-5)], &[])
        .unwrap_err();
    assert_eq!(err, Error::OperandDomainOverflow { value: -5 });
    let err = invoke("ball", vec![Arg::Str("=>"), Arg::Bytes(&data), Arg::Int(5)], &[])
        .unwrap_err();
    assert_eq!(
        err,
        Error::UnknownOperator {
            token: "=>".to_string()
        }
    );
}

#[test]
fn test_range_before_length() {
    let short = vec![1u8; 3];
    let err = find_index("==", &short, 1000i64, &CallOptions::new()).unwrap_err();
    assert_eq!(err, Error::OperandDomainOverflow { value: 1000 });
}

#[test]
fn test_empty_sequences() {
    let empty: Vec<u8> = Vec::new();
    for function in ["bmax", "bmin", "bsum"] {
        let err = invoke(function, vec![Arg::Bytes(&empty)], &[]).unwrap_err();
        assert!(matches!(err, Error::EmptySequence { .. }), "{function}");
    }
    let err = invoke("findindex", vec![Arg::Str("=="), Arg::Bytes(&empty), Arg::Int(0)], &[])
        .unwrap_err();
    assert_eq!(err, Error::EmptySequence { function: "findindex" });
    assert!(reduce_max(&empty, &CallOptions::new()).is_err());
    assert!(reduce_sum(&empty, &CallOptions::new()).is_err());
}

#[test]
fn test_immutable_destination() {
    let data = vec![1u8; 4];
    let out = vec![0u8; 4];
    let err = invoke("xor", vec![Arg::Bytes(&data), Arg::Int(1), Arg::Bytes(&out)], &[])
        .unwrap_err();
    assert_eq!(err, Error::ImmutableDestination { function: "xor" });
    let err = invoke("xor", vec![Arg::Bytes(&data), Arg::Int(1)], &[]).unwrap_err();
    assert_eq!(err, Error::ImmutableDestination { function: "xor" });
    let err = transform("^", 1u8, &data, None, &CallOptions::new()).unwrap_err();
    assert_eq!(err, Error::ImmutableDestination { function: "transform" });
}

#[test]
fn test_length_before_destination() {
    let lhs = vec![1u8; 4];
    let rhs = vec![1u8; 5];
    let out = vec![0u8; 4];
    let err = invoke(
        "and_",
        vec![Arg::Bytes(&lhs), Arg::Bytes(&rhs), Arg::Bytes(&out)],
        &[],
    )
    .unwrap_err();
    assert!(matches!(err, Error::SequenceLengthMismatch { .. }));
}

#[test]
fn test_unknown_transform_token() {
    let mut data = vec![1u8; 4];
    let err = transform("nand", &mut data, 1u8, None, &CallOptions::new()).unwrap_err();
    assert!(matches!(err, Error::UnknownOperator { .. }));
    assert_eq!(data, [1, 1, 1, 1]);
}

#[test]
fn test_options_are_checked_last() {
    let data = vec![1u8; 4];
    let err = invoke(
        "bsum",
        vec![Arg::Int(300)],
        &[("matherrors", OptionValue::Bool(true))],
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnsupportedOperandType { .. }));

    let err = invoke(
        "bsum",
        vec![Arg::Bytes(&data)],
        &[("matherrors", OptionValue::Bool(true))],
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::UnsupportedOption {
            name: "matherrors".to_string(),
            reason: "unknown keyword argument"
        }
    );

    let err = invoke(
        "bsum",
        vec![Arg::Bytes(&data)],
        &[("maxlen", OptionValue::Other("str".to_string()))],
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnsupportedOption { .. }));
}

#[test]
fn test_malformed_option_keeps_valid_maxlen() {
    let short = vec![1u8; 4];
    let long = vec![1u8; 6];
    let err = invoke(
        "eq",
        vec![Arg::Bytes(&short), Arg::Bytes(&long)],
        &[
            ("maxlen", OptionValue::Int(3)),
            ("nosimd", OptionValue::Other("str".to_string())),
        ],
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::UnsupportedOption {
            name: "nosimd".to_string(),
            reason: "nosimd must be a boolean"
        }
    );

    let source = vec![1u8; 8];
    let mut out = vec![0u8; 3];
    let err = invoke(
        "invert",
        vec![Arg::Bytes(&source), Arg::ByteArray(&mut out)],
        &[
            ("maxlen", OptionValue::Int(3)),
            ("nosimd", OptionValue::Other("str".to_string())),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnsupportedOption { ref name, .. } if name == "nosimd"));
    assert_eq!(out, [0, 0, 0]);
}

#[test]
fn test_no_write_on_failed_validation() {
    let mut target = vec![7u8; 20];
    let other = vec![1u8; 21];
    let err = transform(
        "|",
        &mut target,
        &other,
        None,
        &CallOptions::new(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::SequenceLengthMismatch { .. }));
    assert!(target.iter().all(|&b| b == 7));

    let source = vec![1u8; 20];
    let mut out = vec![9u8; 19];
    let err = transform(
        "|",
        &source,
        3u8,
        Some(ByteSeq::from(&mut out)),
        &CallOptions::new(),
    )
    .unwrap_err();
    assert_eq!(err, Error::SequenceLengthMismatch { expected: 20, found: 19 });
    assert!(out.iter().all(|&b| b == 9));
}
