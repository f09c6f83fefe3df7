//! Error types for bytelanes
//!
//! Every error is a programming error on the caller's side and is reported
//! before any destination buffer has been written.

use thiserror::Error;

/// Result type alias for bytelanes operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for bytelanes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Wrong number of operands for the function
    #[error("{function}() takes {expected} positional arguments but {found} were given")]
    InvalidArity {
        function: &'static str,
        expected: &'static str,
        found: usize,
    },

    /// An operand is neither a byte sequence nor an integer, or the
    /// combination of sequences and integers is not valid for the function
    #[error("{function}(): unsupported operand at position {position}: {found}")]
    UnsupportedOperandType {
        function: &'static str,
        position: usize,
        found: String,
    },

    /// Integer operand outside 0..=255
    #[error("arithmetic overflow in parameter: {value} is outside 0..=255")]
    OperandDomainOverflow { value: i64 },

    /// Sequences differ in length and no maxlen reconciles them, or a
    /// destination is shorter than the operation window
    #[error("sequence length mismatch: expected {expected}, found {found}")]
    SequenceLengthMismatch { expected: usize, found: usize },

    /// Reduction or search over an empty window
    #[error("{function}(): sequence must not be empty")]
    EmptySequence { function: &'static str },

    /// An immutable sequence was given where output is written
    #[error("{function}(): output sequence must be mutable")]
    ImmutableDestination { function: &'static str },

    /// Unknown option name, or a known option with a value of the wrong type
    #[error("unsupported option `{name}`: {reason}")]
    UnsupportedOption { name: String, reason: &'static str },

    /// Operator token or function name not in the registry
    #[error("operator not valid for this function: `{token}`")]
    UnknownOperator { token: String },
}

impl Error {
    /// Short, stable name of the error kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidArity { .. } => "invalid_arity",
            Error::UnsupportedOperandType { .. } => "unsupported_operand_type",
            Error::OperandDomainOverflow { .. } => "operand_domain_overflow",
            Error::SequenceLengthMismatch { .. } => "sequence_length_mismatch",
            Error::EmptySequence { .. } => "empty_sequence",
            Error::ImmutableDestination { .. } => "immutable_destination",
            Error::UnsupportedOption { .. } => "unsupported_option",
            Error::UnknownOperator { .. } => "unknown_operator",
        }
    }

    pub(crate) fn unknown_operator(token: &str) -> Self {
        Error::UnknownOperator {
            token: token.to_string(),
        }
    }
}
