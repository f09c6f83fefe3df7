//! Parameter validation.
//!
//! Checks run in a fixed order so the first applicable error is the one
//! reported: operand shape, scalar range, operator, window, emptiness, then
//! destination. Host bindings check arity and argument types before calling
//! in here, and report malformed options last. Nothing is written until
//! every check has passed.

use crate::error::{Error, Result};
use crate::operand::{ByteSeq, Operand};
use crate::options::CallOptions;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side<'a> {
    Seq(&'a [u8]),
    Byte(u8),
}

/// Which operand combinations a function accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Shape {
    /// The first operand must be a sequence; the second may be either.
    SeqFirst,
    EitherSeq,
    Unary,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Signature {
    pub function: &'static str,
    pub shape: Shape,
    /// Position of the first data operand among the positional arguments.
    pub offset: usize,
    pub non_empty: bool,
}

#[derive(Debug)]
pub(crate) struct Binary<'a> {
    pub lhs: Side<'a>,
    pub rhs: Side<'a>,
    pub window: usize,
}

/// Where a transform writes. Every target slice is exactly one window long.
#[derive(Debug)]
pub(crate) enum Output<'a> {
    Dest {
        lhs: Side<'a>,
        rhs: Side<'a>,
        out: &'a mut [u8],
    },
    First { target: &'a mut [u8], rhs: Side<'a> },
    /// Overwrite the second operand; the scalar stays on the left.
    Second { lhs: u8, target: &'a mut [u8] },
}

#[derive(Debug)]
pub(crate) struct Transform<'a> {
    pub output: Output<'a>,
    pub window: usize,
}

enum Checked<'a> {
    Seq(ByteSeq<'a>),
    Byte(u8),
}

impl<'a> Checked<'a> {
    fn len(&self) -> Option<usize> {
        match self {
            Checked::Seq(seq) => Some(seq.len()),
            Checked::Byte(_) => None,
        }
    }

    fn into_side(self) -> Side<'a> {
        match self {
            Checked::Seq(seq) => Side::Seq(seq.into_shared()),
            Checked::Byte(value) => Side::Byte(value),
        }
    }
}

fn check_shape(sig: &Signature, lhs: &Operand<'_>, rhs: Option<&Operand<'_>>) -> Result<()> {
    let valid = match (sig.shape, rhs) {
        (Shape::SeqFirst, _) | (Shape::Unary, _) | (Shape::EitherSeq, None) => lhs.is_seq(),
        (Shape::EitherSeq, Some(rhs)) => lhs.is_seq() || rhs.is_seq(),
    };
    if valid {
        Ok(())
    } else {
        Err(Error::UnsupportedOperandType {
            function: sig.function,
            position: sig.offset,
            found: "int".to_string(),
        })
    }
}

fn check_range(operand: Operand<'_>) -> Result<Checked<'_>> {
    match operand {
        Operand::Seq(seq) => Ok(Checked::Seq(seq)),
        Operand::Scalar(value) => u8::try_from(value)
            .map(Checked::Byte)
            .map_err(|_| Error::OperandDomainOverflow { value }),
    }
}

/// Effective window for operands of the given lengths (`None` for scalars).
///
/// A positive `maxlen` no longer than the shortest sequence wins and
/// reconciles sequences of different length. Otherwise the sequences must
/// agree and the window is their common length.
pub(crate) fn resolve_window(
    lhs: Option<usize>,
    rhs: Option<usize>,
    options: &CallOptions,
) -> Result<usize> {
    let (shortest, mismatch) = match (lhs, rhs) {
        (Some(a), Some(b)) => (a.min(b), (a != b).then_some((a, b))),
        (Some(len), None) | (None, Some(len)) => (len, None),
        (None, None) => (0, None),
    };
    match options.effective_maxlen() {
        Some(maxlen) if maxlen <= shortest => Ok(maxlen),
        _ => match mismatch {
            Some((expected, found)) => Err(Error::SequenceLengthMismatch { expected, found }),
            None => Ok(shortest),
        },
    }
}

fn check_window(sig: &Signature, window: usize) -> Result<usize> {
    if sig.non_empty && window == 0 {
        Err(Error::EmptySequence {
            function: sig.function,
        })
    } else {
        Ok(window)
    }
}

fn writable<'a>(function: &'static str, seq: ByteSeq<'a>) -> Result<&'a mut [u8]> {
    seq.into_mutable()
        .ok_or(Error::ImmutableDestination { function })
}

fn resolve_output<'a>(
    function: &'static str,
    lhs: Checked<'a>,
    rhs: Checked<'a>,
    dest: Option<ByteSeq<'a>>,
    window: usize,
) -> Result<Output<'a>> {
    if let Some(dest) = dest {
        let out = writable(function, dest)?;
        if out.len() < window {
            return Err(Error::SequenceLengthMismatch {
                expected: window,
                found: out.len(),
            });
        }
        return Ok(Output::Dest {
            lhs: lhs.into_side(),
            rhs: rhs.into_side(),
            out: &mut out[..window],
        });
    }
    match (lhs, rhs) {
        (Checked::Seq(seq), rhs) => {
            let target = writable(function, seq)?;
            Ok(Output::First {
                target: &mut target[..window],
                rhs: rhs.into_side(),
            })
        }
        (Checked::Byte(lhs), Checked::Seq(seq)) => {
            let target = writable(function, seq)?;
            Ok(Output::Second {
                lhs,
                target: &mut target[..window],
            })
        }
        (Checked::Byte(_), Checked::Byte(_)) => Err(Error::UnsupportedOperandType {
            function,
            position: 0,
            found: "int".to_string(),
        }),
    }
}

/// Validate a predicate or search call. `operator` resolves the rule once
/// the operands are known to be well-formed.
pub(crate) fn binary<'a, T>(
    sig: &Signature,
    lhs: Operand<'a>,
    rhs: Operand<'a>,
    operator: impl FnOnce() -> Result<T>,
    options: &CallOptions,
) -> Result<(T, Binary<'a>)> {
    check_shape(sig, &lhs, Some(&rhs))?;
    let lhs = check_range(lhs)?;
    let rhs = check_range(rhs)?;
    let op = operator()?;
    let window = resolve_window(lhs.len(), rhs.len(), options)?;
    let window = check_window(sig, window)?;
    Ok((
        op,
        Binary {
            lhs: lhs.into_side(),
            rhs: rhs.into_side(),
            window,
        },
    ))
}

pub(crate) fn unary<'a>(
    sig: &Signature,
    data: Operand<'a>,
    options: &CallOptions,
) -> Result<&'a [u8]> {
    check_shape(sig, &data, None)?;
    let data = check_range(data)?;
    let window = resolve_window(data.len(), None, options)?;
    let window = check_window(sig, window)?;
    match data.into_side() {
        Side::Seq(data) => Ok(&data[..window]),
        Side::Byte(_) => Ok(&[]),
    }
}

pub(crate) fn transform<'a, T>(
    sig: &Signature,
    lhs: Operand<'a>,
    rhs: Operand<'a>,
    dest: Option<ByteSeq<'a>>,
    operator: impl FnOnce() -> Result<T>,
    options: &CallOptions,
) -> Result<(T, Transform<'a>)> {
    check_shape(sig, &lhs, Some(&rhs))?;
    let lhs = check_range(lhs)?;
    let rhs = check_range(rhs)?;
    let op = operator()?;
    let window = resolve_window(lhs.len(), rhs.len(), options)?;
    let window = check_window(sig, window)?;
    let output = resolve_output(sig.function, lhs, rhs, dest, window)?;
    Ok((op, Transform { output, window }))
}

/// Validate a unary transform. The complement ignores its second operand,
/// so a zero byte stands in for it.
pub(crate) fn unary_transform<'a>(
    sig: &Signature,
    data: Operand<'a>,
    dest: Option<ByteSeq<'a>>,
    options: &CallOptions,
) -> Result<Transform<'a>> {
    check_shape(sig, &data, None)?;
    let data = check_range(data)?;
    let window = resolve_window(data.len(), None, options)?;
    let window = check_window(sig, window)?;
    let output = resolve_output(sig.function, data, Checked::Byte(0), dest, window)?;
    Ok(Transform { output, window })
}
