//! Caller-owned operands.
//!
//! The engine only borrows these for the duration of a call.

use std::fmt;

/// A byte sequence borrowed from the caller.
///
/// Only the `Mutable` variant can be written, either as an explicit
/// destination or as the in-place target of a transform.
#[derive(Debug)]
pub enum ByteSeq<'a> {
    Immutable(&'a [u8]),
    Mutable(&'a mut [u8]),
}

impl<'a> ByteSeq<'a> {
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_mutable(&self) -> bool {
        matches!(self, ByteSeq::Mutable(_))
    }

    pub fn as_slice(&self) -> &[u8] {
        match self {
            ByteSeq::Immutable(data) => data,
            ByteSeq::Mutable(data) => data,
        }
    }

    /// Consume the sequence, yielding a shared view with the full borrow lifetime.
    pub(crate) fn into_shared(self) -> &'a [u8] {
        match self {
            ByteSeq::Immutable(data) => data,
            ByteSeq::Mutable(data) => data,
        }
    }

    pub(crate) fn into_mutable(self) -> Option<&'a mut [u8]> {
        match self {
            ByteSeq::Immutable(_) => None,
            ByteSeq::Mutable(data) => Some(data),
        }
    }
}

impl<'a> From<&'a [u8]> for ByteSeq<'a> {
    fn from(data: &'a [u8]) -> Self {
        ByteSeq::Immutable(data)
    }
}

impl<'a> From<&'a mut [u8]> for ByteSeq<'a> {
    fn from(data: &'a mut [u8]) -> Self {
        ByteSeq::Mutable(data)
    }
}

impl<'a> From<&'a Vec<u8>> for ByteSeq<'a> {
    fn from(data: &'a Vec<u8>) -> Self {
        ByteSeq::Immutable(data.as_slice())
    }
}

impl<'a> From<&'a mut Vec<u8>> for ByteSeq<'a> {
    fn from(data: &'a mut Vec<u8>) -> Self {
        ByteSeq::Mutable(data.as_mut_slice())
    }
}

/// One operand of a binary operation: a sequence or a single integer.
///
/// Integers are range-checked against `0..=255` during validation, so an
/// out-of-range value is representable here and rejected later.
#[derive(Debug)]
pub enum Operand<'a> {
    Seq(ByteSeq<'a>),
    Scalar(i64),
}

impl<'a> Operand<'a> {
    pub fn is_seq(&self) -> bool {
        matches!(self, Operand::Seq(_))
    }
}

impl<'a> From<ByteSeq<'a>> for Operand<'a> {
    fn from(seq: ByteSeq<'a>) -> Self {
        Operand::Seq(seq)
    }
}

impl<'a> From<&'a [u8]> for Operand<'a> {
    fn from(data: &'a [u8]) -> Self {
        Operand::Seq(ByteSeq::Immutable(data))
    }
}

impl<'a> From<&'a mut [u8]> for Operand<'a> {
    fn from(data: &'a mut [u8]) -> Self {
        Operand::Seq(ByteSeq::Mutable(data))
    }
}

impl<'a> From<&'a Vec<u8>> for Operand<'a> {
    fn from(data: &'a Vec<u8>) -> Self {
        Operand::Seq(ByteSeq::Immutable(data.as_slice()))
    }
}

impl<'a> From<&'a mut Vec<u8>> for Operand<'a> {
    fn from(data: &'a mut Vec<u8>) -> Self {
        Operand::Seq(ByteSeq::Mutable(data.as_mut_slice()))
    }
}

impl From<i64> for Operand<'_> {
    fn from(value: i64) -> Self {
        Operand::Scalar(value)
    }
}

impl From<u8> for Operand<'_> {
    fn from(value: u8) -> Self {
        Operand::Scalar(i64::from(value))
    }
}

/// A raw positional argument as a host binding sees it, before validation.
#[derive(Debug)]
pub enum Arg<'a> {
    /// A text argument; only valid as an operator token.
    Str(&'a str),
    Bytes(&'a [u8]),
    ByteArray(&'a mut [u8]),
    Int(i64),
    /// Anything else; carries the host type name for the error message.
    Unsupported(String),
}

impl Arg<'_> {
    pub(crate) fn type_name(&self) -> String {
        match self {
            Arg::Str(_) => "str".to_string(),
            Arg::Bytes(_) => "bytes".to_string(),
            Arg::ByteArray(_) => "bytearray".to_string(),
            Arg::Int(_) => "int".to_string(),
            Arg::Unsupported(name) => name.clone(),
        }
    }
}

/// The result of a dynamically invoked function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Bool(bool),
    Byte(u8),
    Wide(u64),
    /// Index of the first match, or [`NOT_FOUND`].
    Index(i64),
    None,
}

/// Index reported by `findindex` when no element matches.
pub const NOT_FOUND: i64 = -1;

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Bool(value) => write!(f, "{value}"),
            Outcome::Byte(value) => write!(f, "{value}"),
            Outcome::Wide(value) => write!(f, "{value}"),
            Outcome::Index(value) => write!(f, "{value}"),
            Outcome::None => f.write_str("None"),
        }
    }
}
