//! Per-call execution options.
//!
//! The option set is closed: `maxlen` and `nosimd`. Anything else a host
//! forwards is rejected, including `matherrors`, which belongs to sibling
//! numeric libraries and has no meaning for byte operations.

use crate::error::{Error, Result};

pub const OPTION_MAXLEN: &str = "maxlen";
pub const OPTION_NOSIMD: &str = "nosimd";

/// A keyword value as forwarded by a host binding.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Int(i64),
    Bool(bool),
    /// Any other host value; carries its type name.
    Other(String),
}

/// Options shared by every function in the family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Restrict the operation to a common prefix of this length. Zero, or a
    /// value not smaller than the operands, leaves the full length in effect.
    pub maxlen: Option<usize>,
    /// Force the scalar kernel.
    pub nosimd: bool,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_maxlen(mut self, maxlen: usize) -> Self {
        self.maxlen = Some(maxlen);
        self
    }

    pub fn with_nosimd(mut self, nosimd: bool) -> Self {
        self.nosimd = nosimd;
        self
    }

    /// The maxlen that actually restricts a window, if any.
    pub(crate) fn effective_maxlen(&self) -> Option<usize> {
        self.maxlen.filter(|&len| len > 0)
    }

    /// Parse keyword pairs from a host binding.
    ///
    /// A non-positive `maxlen` is accepted and ignored. `nosimd` accepts a
    /// boolean or an integer (non-zero is true).
    pub fn from_pairs<'k, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'k str, OptionValue)>,
    {
        match Self::parse_lenient(pairs) {
            (options, None) => Ok(options),
            (_, Some(err)) => Err(err),
        }
    }

    /// Parse every pair, keeping each well-formed option and the first
    /// error. Callers that must validate operands before reporting an
    /// option error still see a valid `maxlen` next to a malformed `nosimd`.
    pub(crate) fn parse_lenient<'k, I>(pairs: I) -> (Self, Option<Error>)
    where
        I: IntoIterator<Item = (&'k str, OptionValue)>,
    {
        let mut options = CallOptions::default();
        let mut first_error = None;
        let mut seen_maxlen = false;
        let mut seen_nosimd = false;
        for (name, value) in pairs {
            let parsed = match name {
                OPTION_MAXLEN if seen_maxlen => Err(duplicate(name)),
                OPTION_MAXLEN => {
                    seen_maxlen = true;
                    parse_maxlen(value).map(|maxlen| options.maxlen = maxlen)
                }
                OPTION_NOSIMD if seen_nosimd => Err(duplicate(name)),
                OPTION_NOSIMD => {
                    seen_nosimd = true;
                    parse_nosimd(value).map(|nosimd| options.nosimd = nosimd)
                }
                _ => Err(Error::UnsupportedOption {
                    name: name.to_string(),
                    reason: "unknown keyword argument",
                }),
            };
            if let Err(err) = parsed {
                first_error.get_or_insert(err);
            }
        }
        (options, first_error)
    }
}

fn parse_maxlen(value: OptionValue) -> Result<Option<usize>> {
    match value {
        OptionValue::Int(len) if len > 0 => Ok(Some(len as usize)),
        OptionValue::Int(_) => Ok(None),
        _ => Err(Error::UnsupportedOption {
            name: OPTION_MAXLEN.to_string(),
            reason: "maxlen must be an integer",
        }),
    }
}

fn parse_nosimd(value: OptionValue) -> Result<bool> {
    match value {
        OptionValue::Bool(flag) => Ok(flag),
        OptionValue::Int(flag) => Ok(flag != 0),
        OptionValue::Other(_) => Err(Error::UnsupportedOption {
            name: OPTION_NOSIMD.to_string(),
            reason: "nosimd must be a boolean",
        }),
    }
}

fn duplicate(name: &str) -> Error {
    Error::UnsupportedOption {
        name: name.to_string(),
        reason: "given more than once",
    }
}
