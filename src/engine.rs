//! Public entry points.
//!
//! Every call is validated in full before anything runs, then planned,
//! executed, and assembled. The typed functions cover the operation kinds
//! directly; [`invoke`] serves host bindings that pass loosely typed
//! positional and keyword arguments by function name.

use tracing::{debug, trace};

use crate::assemble;
use crate::error::{Error, Result};
use crate::kernel::rules::{with_bitwise_rule, with_compare_rule, Swapped};
use crate::kernel::Splat;
use crate::operand::{Arg, ByteSeq, Operand, Outcome, NOT_FOUND};
use crate::options::{CallOptions, OptionValue};
use crate::planner::{self, ExecutionPlan};
use crate::registry::{
    self, Arity, BitOp, CompareOp, ElementRule, OperationDescriptor, OperationKind, RuleSource,
};
use crate::validate::{self, Binary, Output, Shape, Side, Signature, Transform};

/// Run `$body` with `$a` and `$b` bound to the kernel lanes for two sides.
macro_rules! with_sides {
    ($lhs:expr, $rhs:expr, |$a:ident, $b:ident| $body:expr) => {
        match ($lhs, $rhs) {
            (Side::Seq($a), Side::Seq($b)) => $body,
            (Side::Seq($a), Side::Byte(rhs)) => {
                let $b = Splat(rhs);
                $body
            }
            (Side::Byte(lhs), Side::Seq($b)) => {
                let $a = Splat(lhs);
                $body
            }
            (Side::Byte(lhs), Side::Byte(rhs)) => {
                let ($a, $b) = (Splat(lhs), Splat(rhs));
                $body
            }
        }
    };
}

fn rejected<T>(function: &'static str, result: Result<T>) -> Result<T> {
    result.map_err(|err| {
        debug!(function, kind = err.kind(), error = %err, "rejected call");
        err
    })
}

fn planned(function: &'static str, window: usize, options: &CallOptions) -> ExecutionPlan {
    let plan = planner::plan(window, options);
    trace!(function, window, plan = %plan, "executing");
    plan
}

fn run_all(function: &'static str, op: CompareOp, call: &Binary<'_>, options: &CallOptions) -> bool {
    let plan = planned(function, call.window, options);
    with_compare_rule!(op, R => with_sides!(call.lhs, call.rhs, |a, b| {
        assemble::all::<R, _, _>(plan, a, b, call.window)
    }))
}

fn run_any(function: &'static str, op: CompareOp, call: &Binary<'_>, options: &CallOptions) -> bool {
    let plan = planned(function, call.window, options);
    with_compare_rule!(op, R => with_sides!(call.lhs, call.rhs, |a, b| {
        assemble::any::<R, _, _>(plan, a, b, call.window)
    }))
}

fn run_find(
    function: &'static str,
    op: CompareOp,
    call: &Binary<'_>,
    options: &CallOptions,
) -> Option<usize> {
    let plan = planned(function, call.window, options);
    with_compare_rule!(op, R => with_sides!(call.lhs, call.rhs, |a, b| {
        assemble::find::<R, _, _>(plan, a, b, call.window)
    }))
}

fn run_transform(function: &'static str, op: BitOp, call: Transform<'_>, options: &CallOptions) {
    let plan = planned(function, call.window, options);
    match call.output {
        Output::Dest { lhs, rhs, out } => with_bitwise_rule!(op, R => with_sides!(lhs, rhs, |a, b| {
            assemble::map::<R, _, _>(plan, a, b, out)
        })),
        Output::First { target, rhs } => with_bitwise_rule!(op, R => match rhs {
            Side::Seq(rhs) => assemble::map_in_place::<R, _>(plan, target, rhs),
            Side::Byte(rhs) => assemble::map_in_place::<R, _>(plan, target, Splat(rhs)),
        }),
        Output::Second { lhs, target } => with_bitwise_rule!(op, R => {
            assemble::map_in_place::<Swapped<R>, _>(plan, target, Splat(lhs))
        }),
    }
}

fn run_reduce(
    function: &'static str,
    kind: OperationKind,
    data: &[u8],
    options: &CallOptions,
) -> Result<Outcome> {
    let plan = planned(function, data.len(), options);
    let empty = || Error::EmptySequence { function };
    match kind {
        OperationKind::ReduceMax => assemble::max(plan, data).map(Outcome::Byte).ok_or_else(empty),
        OperationKind::ReduceMin => assemble::min(plan, data).map(Outcome::Byte).ok_or_else(empty),
        _ => Ok(Outcome::Wide(assemble::sum(plan, data))),
    }
}

const fn typed(function: &'static str, shape: Shape, non_empty: bool) -> Signature {
    let offset = match shape {
        Shape::Unary => 0,
        _ => 1,
    };
    Signature {
        function,
        shape,
        offset,
        non_empty,
    }
}

const PREDICATE_ALL: Signature = typed("predicate_all", Shape::EitherSeq, false);
const PREDICATE_ANY: Signature = typed("predicate_any", Shape::EitherSeq, true);
const FIND_INDEX: Signature = typed("find_index", Shape::EitherSeq, true);
const REDUCE_MAX: Signature = typed("reduce_max", Shape::Unary, true);
const REDUCE_MIN: Signature = typed("reduce_min", Shape::Unary, true);
const REDUCE_SUM: Signature = typed("reduce_sum", Shape::Unary, true);
const TRANSFORM: Signature = typed("transform", Shape::EitherSeq, false);
const INVERT: Signature = typed("invert", Shape::Unary, false);

/// True when `lhs[i] <operator> rhs[i]` holds over the whole window.
///
/// Either side may be a single byte. An empty window is vacuously true.
///
/// ```
/// use bytelanes::{predicate_all, CallOptions};
///
/// let data = vec![3u8, 4, 5];
/// assert!(predicate_all(">", &data, 2u8, &CallOptions::new()).unwrap());
/// assert!(!predicate_all(">", 4u8, &data, &CallOptions::new()).unwrap());
/// ```
pub fn predicate_all<'a>(
    operator: &str,
    lhs: impl Into<Operand<'a>>,
    rhs: impl Into<Operand<'a>>,
    options: &CallOptions,
) -> Result<bool> {
    let sig = &PREDICATE_ALL;
    let (op, call) = rejected(
        sig.function,
        validate::binary(sig, lhs.into(), rhs.into(), || CompareOp::parse(operator), options),
    )?;
    Ok(run_all(sig.function, op, &call, options))
}

/// True when `lhs[i] <operator> rhs[i]` holds for at least one element.
/// The window must not be empty.
pub fn predicate_any<'a>(
    operator: &str,
    lhs: impl Into<Operand<'a>>,
    rhs: impl Into<Operand<'a>>,
    options: &CallOptions,
) -> Result<bool> {
    let sig = &PREDICATE_ANY;
    let (op, call) = rejected(
        sig.function,
        validate::binary(sig, lhs.into(), rhs.into(), || CompareOp::parse(operator), options),
    )?;
    Ok(run_any(sig.function, op, &call, options))
}

/// Index of the first element where `lhs[i] <operator> rhs[i]` holds.
pub fn find_index<'a>(
    operator: &str,
    lhs: impl Into<Operand<'a>>,
    rhs: impl Into<Operand<'a>>,
    options: &CallOptions,
) -> Result<Option<usize>> {
    let sig = &FIND_INDEX;
    let (op, call) = rejected(
        sig.function,
        validate::binary(sig, lhs.into(), rhs.into(), || CompareOp::parse(operator), options),
    )?;
    Ok(run_find(sig.function, op, &call, options))
}

fn window<'a>(
    sig: &Signature,
    data: impl Into<ByteSeq<'a>>,
    options: &CallOptions,
) -> Result<&'a [u8]> {
    rejected(
        sig.function,
        validate::unary(sig, Operand::Seq(data.into()), options),
    )
}

pub fn reduce_max<'a>(data: impl Into<ByteSeq<'a>>, options: &CallOptions) -> Result<u8> {
    let sig = &REDUCE_MAX;
    let data = window(sig, data, options)?;
    let plan = planned(sig.function, data.len(), options);
    assemble::max(plan, data).ok_or(Error::EmptySequence {
        function: sig.function,
    })
}

pub fn reduce_min<'a>(data: impl Into<ByteSeq<'a>>, options: &CallOptions) -> Result<u8> {
    let sig = &REDUCE_MIN;
    let data = window(sig, data, options)?;
    let plan = planned(sig.function, data.len(), options);
    assemble::min(plan, data).ok_or(Error::EmptySequence {
        function: sig.function,
    })
}

/// Sum of the window, widened so it cannot overflow.
pub fn reduce_sum<'a>(data: impl Into<ByteSeq<'a>>, options: &CallOptions) -> Result<u64> {
    let sig = &REDUCE_SUM;
    let data = window(sig, data, options)?;
    let plan = planned(sig.function, data.len(), options);
    Ok(assemble::sum(plan, data))
}

/// Apply a binary bitwise operator element-wise.
///
/// With `dest`, results go there and both operands are left untouched.
/// Without it, a sequence in first position is overwritten; with a byte in
/// first position the second operand is overwritten instead, still computing
/// `lhs <operator> rhs[i]`. Only the first window elements of the target are
/// written.
///
/// ```
/// use bytelanes::{transform, ByteSeq, CallOptions};
///
/// let lhs = [0b1111u8, 0b1010];
/// let rhs = [0b1010u8, 0b1111];
/// let mut out = [0u8; 2];
/// transform("and", &lhs[..], &rhs[..], Some(ByteSeq::from(&mut out[..])), &CallOptions::new())
///     .unwrap();
/// assert_eq!(out, [0b1010, 0b1010]);
/// ```
pub fn transform<'a>(
    operator: &str,
    lhs: impl Into<Operand<'a>>,
    rhs: impl Into<Operand<'a>>,
    dest: Option<ByteSeq<'a>>,
    options: &CallOptions,
) -> Result<()> {
    let sig = &TRANSFORM;
    let (op, call) = rejected(
        sig.function,
        validate::transform(
            sig,
            lhs.into(),
            rhs.into(),
            dest,
            || BitOp::parse(operator),
            options,
        ),
    )?;
    run_transform(sig.function, op, call, options);
    Ok(())
}

/// Bitwise complement, in place or into `dest`.
pub fn invert<'a>(
    data: impl Into<ByteSeq<'a>>,
    dest: Option<ByteSeq<'a>>,
    options: &CallOptions,
) -> Result<()> {
    let sig = &INVERT;
    let call = rejected(
        sig.function,
        validate::unary_transform(sig, Operand::Seq(data.into()), dest, options),
    )?;
    run_transform(sig.function, BitOp::Not, call, options);
    Ok(())
}

enum Prepared<'a> {
    Compare {
        kind: OperationKind,
        op: CompareOp,
        call: Binary<'a>,
    },
    Reduce {
        kind: OperationKind,
        data: &'a [u8],
    },
    Transform {
        op: BitOp,
        call: Transform<'a>,
    },
}

fn signature(descriptor: &OperationDescriptor) -> Signature {
    let shape = match (descriptor.arity, descriptor.takes_operator()) {
        (Arity::Unary, _) => Shape::Unary,
        (Arity::Binary, true) => Shape::SeqFirst,
        (Arity::Binary, false) => Shape::EitherSeq,
    };
    Signature {
        function: descriptor.name,
        shape,
        offset: usize::from(descriptor.takes_operator()),
        non_empty: descriptor.non_empty,
    }
}

fn compare_op(descriptor: &OperationDescriptor, token: Option<&str>) -> Result<CompareOp> {
    match (descriptor.rule, token) {
        (RuleSource::Fixed(ElementRule::Compare(op)), _) => Ok(op),
        (RuleSource::OperatorToken, Some(token)) => CompareOp::parse(token),
        (_, token) => Err(Error::unknown_operator(token.unwrap_or(descriptor.name))),
    }
}

fn bit_op(descriptor: &OperationDescriptor) -> Result<BitOp> {
    match descriptor.rule {
        RuleSource::Fixed(ElementRule::Bitwise(op)) => Ok(op),
        _ => Err(Error::unknown_operator(descriptor.name)),
    }
}

fn unsupported(function: &'static str, position: usize, arg: &Arg<'_>) -> Error {
    Error::UnsupportedOperandType {
        function,
        position,
        found: arg.type_name(),
    }
}

fn token_arg<'a>(function: &'static str, position: usize, arg: Arg<'a>) -> Result<&'a str> {
    match arg {
        Arg::Str(token) => Ok(token),
        other => Err(unsupported(function, position, &other)),
    }
}

fn operand_arg<'a>(function: &'static str, position: usize, arg: Arg<'a>) -> Result<Operand<'a>> {
    match arg {
        Arg::Bytes(data) => Ok(Operand::Seq(ByteSeq::Immutable(data))),
        Arg::ByteArray(data) => Ok(Operand::Seq(ByteSeq::Mutable(data))),
        Arg::Int(value) => Ok(Operand::Scalar(value)),
        other => Err(unsupported(function, position, &other)),
    }
}

fn dest_arg<'a>(function: &'static str, position: usize, arg: Arg<'a>) -> Result<ByteSeq<'a>> {
    match arg {
        Arg::Bytes(data) => Ok(ByteSeq::Immutable(data)),
        Arg::ByteArray(data) => Ok(ByteSeq::Mutable(data)),
        other => Err(unsupported(function, position, &other)),
    }
}

fn prepare<'a>(
    descriptor: &'static OperationDescriptor,
    args: Vec<Arg<'a>>,
    options: &CallOptions,
) -> Result<Prepared<'a>> {
    let function = descriptor.name;
    let found = args.len();
    let (min, max) = descriptor.positional_bounds();
    let arity = Error::InvalidArity {
        function,
        expected: descriptor.expected_positional(),
        found,
    };
    if found < min || found > max {
        return Err(arity);
    }

    let mut args = args.into_iter().enumerate();
    let mut take = move || args.next().ok_or_else(|| arity.clone());

    let token = if descriptor.takes_operator() {
        let (position, arg) = take()?;
        Some(token_arg(function, position, arg)?)
    } else {
        None
    };
    let (position, arg) = take()?;
    let first = operand_arg(function, position, arg)?;
    let second = match descriptor.arity {
        Arity::Binary => {
            let (position, arg) = take()?;
            Some(operand_arg(function, position, arg)?)
        }
        Arity::Unary => None,
    };
    let dest = match take().ok() {
        Some((position, arg)) => Some(dest_arg(function, position, arg)?),
        None => None,
    };

    let sig = signature(descriptor);
    match (descriptor.kind, second) {
        (OperationKind::Transform, Some(second)) => {
            let (op, call) =
                validate::transform(&sig, first, second, dest, || bit_op(descriptor), options)?;
            Ok(Prepared::Transform { op, call })
        }
        (OperationKind::Transform, None) => {
            let op = bit_op(descriptor)?;
            let call = validate::unary_transform(&sig, first, dest, options)?;
            Ok(Prepared::Transform { op, call })
        }
        (kind @ (OperationKind::ReduceMax | OperationKind::ReduceMin | OperationKind::ReduceSum), _) => {
            let data = validate::unary(&sig, first, options)?;
            Ok(Prepared::Reduce { kind, data })
        }
        (kind, Some(second)) => {
            let (op, call) =
                validate::binary(&sig, first, second, || compare_op(descriptor, token), options)?;
            Ok(Prepared::Compare { kind, op, call })
        }
        (_, None) => Err(Error::InvalidArity {
            function,
            expected: descriptor.expected_positional(),
            found,
        }),
    }
}

fn execute(function: &'static str, prepared: Prepared<'_>, options: &CallOptions) -> Result<Outcome> {
    match prepared {
        Prepared::Compare {
            kind: OperationKind::FindIndex,
            op,
            call,
        } => {
            let index = run_find(function, op, &call, options);
            Ok(Outcome::Index(index.map_or(NOT_FOUND, |index| index as i64)))
        }
        Prepared::Compare {
            kind: OperationKind::PredicateAny,
            op,
            call,
        } => Ok(Outcome::Bool(run_any(function, op, &call, options))),
        Prepared::Compare { op, call, .. } => Ok(Outcome::Bool(run_all(function, op, &call, options))),
        Prepared::Reduce { kind, data } => run_reduce(function, kind, data, options),
        Prepared::Transform { op, call } => {
            run_transform(function, op, call, options);
            Ok(Outcome::None)
        }
    }
}

/// Call a function of the family by name, the way a host binding would.
///
/// `args` are the positional arguments in order: the operator token for
/// `ball`, `bany` and `findindex`, then the data operands, then the optional
/// destination of a transform. `options` are keyword arguments; only
/// `maxlen` and `nosimd` are recognised. A malformed option is reported
/// only after every other check has passed.
///
/// ```
/// use bytelanes::{invoke, Arg, OptionValue, Outcome};
///
/// let data = [1u8, 2, 3, 2];
/// let found = invoke("findindex", vec![Arg::Str("=="), Arg::Bytes(&data), Arg::Int(2)], &[])
///     .unwrap();
/// assert_eq!(found, Outcome::Index(1));
///
/// let total = invoke("bsum", vec![Arg::Bytes(&data)], &[("maxlen", OptionValue::Int(2))])
///     .unwrap();
/// assert_eq!(total, Outcome::Wide(3));
/// ```
pub fn invoke<'a>(
    function: &str,
    args: Vec<Arg<'a>>,
    options: &[(&str, OptionValue)],
) -> Result<Outcome> {
    let descriptor = registry::descriptor(function).map_err(|err| {
        debug!(function, kind = err.kind(), "unknown function");
        err
    })?;
    let name = descriptor.name;
    let (options, malformed) =
        CallOptions::parse_lenient(options.iter().map(|(key, value)| (*key, value.clone())));
    let prepared = rejected(name, prepare(descriptor, args, &options))?;
    if let Some(err) = malformed {
        return rejected(name, Err(err));
    }
    execute(name, prepared, &options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd;

    #[test]
    fn test_every_plan_agrees() {
        let data: Vec<u8> = (0..200u32).map(|i| (i * 13 % 251) as u8).collect();
        let call = Binary {
            lhs: Side::Seq(&data),
            rhs: Side::Byte(200),
            window: data.len(),
        };
        let mut plans = vec![ExecutionPlan::Scalar];
        plans.extend(simd::supported_levels().into_iter().map(ExecutionPlan::Vector));
        let expected = data.iter().position(|&b| b > 200);
        for plan in plans {
            let found = with_compare_rule!(CompareOp::Gt, R => with_sides!(call.lhs, call.rhs, |a, b| {
                assemble::find::<R, _, _>(plan, a, b, call.window)
            }));
            assert_eq!(found, expected, "{plan}");
        }
    }

    #[test]
    fn test_signature_of_operator_functions() {
        let sig = signature(registry::descriptor("bany").unwrap());
        assert_eq!(sig.shape, Shape::SeqFirst);
        assert_eq!(sig.offset, 1);
        assert!(sig.non_empty);
        let sig = signature(registry::descriptor("lshift").unwrap());
        assert_eq!(sig.shape, Shape::EitherSeq);
        assert!(!sig.non_empty);
    }

    #[test]
    fn test_swapped_in_place_shift() {
        let mut amounts = vec![0u8, 1, 7, 8, 200];
        transform("<<", 1u8, &mut amounts, None, &CallOptions::new()).unwrap();
        assert_eq!(amounts, [1, 2, 128, 0, 0]);
    }

    #[test]
    fn test_invoke_options_reported_last() {
        let data = [1u8, 2];
        let err = invoke(
            "bmax",
            vec![Arg::Bytes(&data), Arg::Int(3)],
            &[("matherrors", OptionValue::Bool(true))],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArity { .. }));

        let err = invoke(
            "bmax",
            vec![Arg::Bytes(&data)],
            &[("matherrors", OptionValue::Bool(true))],
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedOption { .. }));
    }

    #[test]
    fn test_invoke_leaves_destination_alone_on_bad_option() {
        let data = [1u8, 2];
        let mut out = [9u8, 9];
        let err = invoke(
            "invert",
            vec![Arg::Bytes(&data), Arg::ByteArray(&mut out)],
            &[("nosimd", OptionValue::Other("str".to_string()))],
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedOption { .. }));
        assert_eq!(out, [9, 9]);
    }
}
