//! Operation registry.
//!
//! Function names and operator tokens are resolved here, once per call, into
//! closed enums. Nothing downstream of the registry compares strings.

use std::fmt;

use phf::phf_map;

use crate::error::{Error, Result};

/// Element comparison applied by predicates and `findindex`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn parse(token: &str) -> Result<Self> {
        COMPARE_TOKENS
            .get(token)
            .copied()
            .ok_or_else(|| Error::unknown_operator(token))
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    /// Reference semantics for one element pair.
    pub fn test(self, lhs: u8, rhs: u8) -> bool {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Element transform applied by the bitwise family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitOp {
    And,
    Or,
    Xor,
    Shl,
    Shr,
    /// Unary complement; the second operand is ignored.
    Not,
}

impl BitOp {
    /// Parse a binary transform token. `Not` has no token; it is reached
    /// only through `invert`.
    pub fn parse(token: &str) -> Result<Self> {
        BIT_TOKENS
            .get(token)
            .copied()
            .ok_or_else(|| Error::unknown_operator(token))
    }

    /// Reference semantics for one element pair.
    ///
    /// Shifts behave like a fixed-width 8-bit shift: bits pushed past the
    /// width are dropped and any amount of 8 or more yields zero.
    pub fn apply(self, lhs: u8, rhs: u8) -> u8 {
        match self {
            BitOp::And => lhs & rhs,
            BitOp::Or => lhs | rhs,
            BitOp::Xor => lhs ^ rhs,
            BitOp::Shl => lhs.checked_shl(u32::from(rhs)).unwrap_or(0),
            BitOp::Shr => lhs.checked_shr(u32::from(rhs)).unwrap_or(0),
            BitOp::Not => !lhs,
        }
    }
}

/// The per-element rule a descriptor applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementRule {
    Compare(CompareOp),
    Bitwise(BitOp),
    Max,
    Min,
    Add,
}

/// Where a descriptor gets its rule from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleSource {
    Fixed(ElementRule),
    /// The first argument is a comparison token (`ball`, `bany`, `findindex`).
    OperatorToken,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    PredicateAll,
    PredicateAny,
    ReduceMax,
    ReduceMin,
    ReduceSum,
    FindIndex,
    Transform,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Binary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultShape {
    Bool,
    Byte,
    Wide,
    Index,
    None,
}

/// Immutable description of one function in the family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub arity: Arity,
    pub kind: OperationKind,
    pub rule: RuleSource,
    /// Starting accumulator for folds that have one.
    pub identity: Option<u64>,
    pub result: ResultShape,
    /// Rejects an empty window with `EmptySequence`.
    pub non_empty: bool,
    /// Accepts an optional trailing destination sequence.
    pub has_destination: bool,
}

impl OperationDescriptor {
    const fn compare(name: &'static str, op: CompareOp) -> Self {
        Self {
            name,
            arity: Arity::Binary,
            kind: OperationKind::PredicateAll,
            rule: RuleSource::Fixed(ElementRule::Compare(op)),
            identity: None,
            result: ResultShape::Bool,
            non_empty: false,
            has_destination: false,
        }
    }

    const fn with_operator(name: &'static str, kind: OperationKind, result: ResultShape) -> Self {
        Self {
            name,
            arity: Arity::Binary,
            kind,
            rule: RuleSource::OperatorToken,
            identity: None,
            result,
            non_empty: true,
            has_destination: false,
        }
    }

    const fn reduce(
        name: &'static str,
        kind: OperationKind,
        rule: ElementRule,
        identity: Option<u64>,
        result: ResultShape,
    ) -> Self {
        Self {
            name,
            arity: Arity::Unary,
            kind,
            rule: RuleSource::Fixed(rule),
            identity,
            result,
            non_empty: true,
            has_destination: false,
        }
    }

    const fn transform(name: &'static str, op: BitOp) -> Self {
        let arity = match op {
            BitOp::Not => Arity::Unary,
            _ => Arity::Binary,
        };
        Self {
            name,
            arity,
            kind: OperationKind::Transform,
            rule: RuleSource::Fixed(ElementRule::Bitwise(op)),
            identity: None,
            result: ResultShape::None,
            non_empty: false,
            has_destination: true,
        }
    }

    pub fn takes_operator(&self) -> bool {
        matches!(self.rule, RuleSource::OperatorToken)
    }

    /// Number of data operands, not counting the operator or destination.
    pub fn operand_count(&self) -> usize {
        match self.arity {
            Arity::Unary => 1,
            Arity::Binary => 2,
        }
    }

    /// Positional argument bounds as a host sees them.
    pub fn positional_bounds(&self) -> (usize, usize) {
        let min = self.operand_count() + usize::from(self.takes_operator());
        let max = min + usize::from(self.has_destination);
        (min, max)
    }

    pub(crate) fn expected_positional(&self) -> &'static str {
        match self.positional_bounds() {
            (1, 1) => "1",
            (1, 2) => "1 or 2",
            (2, 2) => "2",
            (2, 3) => "2 or 3",
            (3, 3) => "3",
            _ => "a fixed number of",
        }
    }
}

static FUNCTIONS: phf::Map<&'static str, OperationDescriptor> = phf_map! {
    "eq" => OperationDescriptor::compare("eq", CompareOp::Eq),
    "ne" => OperationDescriptor::compare("ne", CompareOp::Ne),
    "lt" => OperationDescriptor::compare("lt", CompareOp::Lt),
    "le" => OperationDescriptor::compare("le", CompareOp::Le),
    "gt" => OperationDescriptor::compare("gt", CompareOp::Gt),
    "ge" => OperationDescriptor::compare("ge", CompareOp::Ge),
    "ball" => OperationDescriptor::with_operator("ball", OperationKind::PredicateAll, ResultShape::Bool),
    "bany" => OperationDescriptor::with_operator("bany", OperationKind::PredicateAny, ResultShape::Bool),
    "findindex" => OperationDescriptor::with_operator("findindex", OperationKind::FindIndex, ResultShape::Index),
    "bmax" => OperationDescriptor::reduce("bmax", OperationKind::ReduceMax, ElementRule::Max, None, ResultShape::Byte),
    "bmin" => OperationDescriptor::reduce("bmin", OperationKind::ReduceMin, ElementRule::Min, None, ResultShape::Byte),
    "bsum" => OperationDescriptor::reduce("bsum", OperationKind::ReduceSum, ElementRule::Add, Some(0), ResultShape::Wide),
    "and_" => OperationDescriptor::transform("and_", BitOp::And),
    "or_" => OperationDescriptor::transform("or_", BitOp::Or),
    "xor" => OperationDescriptor::transform("xor", BitOp::Xor),
    "lshift" => OperationDescriptor::transform("lshift", BitOp::Shl),
    "rshift" => OperationDescriptor::transform("rshift", BitOp::Shr),
    "invert" => OperationDescriptor::transform("invert", BitOp::Not),
};

static COMPARE_TOKENS: phf::Map<&'static str, CompareOp> = phf_map! {
    "==" => CompareOp::Eq,
    "!=" => CompareOp::Ne,
    "<" => CompareOp::Lt,
    "<=" => CompareOp::Le,
    ">" => CompareOp::Gt,
    ">=" => CompareOp::Ge,
};

static BIT_TOKENS: phf::Map<&'static str, BitOp> = phf_map! {
    "and" => BitOp::And,
    "&" => BitOp::And,
    "or" => BitOp::Or,
    "|" => BitOp::Or,
    "xor" => BitOp::Xor,
    "^" => BitOp::Xor,
    "lshift" => BitOp::Shl,
    "<<" => BitOp::Shl,
    "rshift" => BitOp::Shr,
    ">>" => BitOp::Shr,
};

/// Look up a function by name.
pub fn descriptor(name: &str) -> Result<&'static OperationDescriptor> {
    FUNCTIONS
        .get(name)
        .ok_or_else(|| Error::unknown_operator(name))
}

/// All registered function names, in no particular order.
pub fn function_names() -> impl Iterator<Item = &'static str> {
    FUNCTIONS.keys().copied()
}
