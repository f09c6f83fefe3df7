//! Python extension module.
//!
//! Each function takes `*args, **kwargs` and hands them to [`invoke`], so
//! the core validator owns every check and its ordering. `bytes` map to
//! immutable sequences, `bytearray` to mutable ones and `int` to scalars.

use pyo3::exceptions::{PyIndexError, PyOverflowError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyByteArray, PyBytes, PyDict, PyInt, PyString, PyTuple};
use pyo3::IntoPy;

use crate::error::Error;
use crate::operand::{Arg, Outcome};
use crate::options::OptionValue;
use crate::registry::{self, OperationDescriptor};
use crate::{invoke, simd};

impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        let message = err.to_string();
        match err {
            Error::OperandDomainOverflow { .. } => PyOverflowError::new_err(message),
            Error::EmptySequence { .. } => PyIndexError::new_err(message),
            Error::UnknownOperator { .. } => PyValueError::new_err(message),
            _ => PyTypeError::new_err(message),
        }
    }
}

/// Integers beyond `i64` still have to fail the byte range check, so they
/// saturate instead of raising a conversion error.
fn saturating_int(value: &Bound<'_, PyInt>) -> PyResult<i64> {
    match value.extract::<i64>() {
        Ok(value) => Ok(value),
        Err(_) if value.lt(0)? => Ok(i64::MIN),
        Err(_) => Ok(i64::MAX),
    }
}

fn type_name(item: &Bound<'_, PyAny>) -> String {
    item.get_type()
        .name()
        .map(|name| name.to_string())
        .unwrap_or_else(|_| "object".to_string())
}

/// Index of the positional argument the call may write, if any.
fn writer_index(descriptor: &OperationDescriptor, count: usize) -> Option<usize> {
    if !descriptor.has_destination {
        return None;
    }
    let (_, max) = descriptor.positional_bounds();
    if count == max {
        Some(count - 1)
    } else {
        Some(usize::from(descriptor.takes_operator()))
    }
}

/// Owned copies of every `bytearray` that appears more than once, except the
/// occurrence that may be written (or the first one when nothing is).
/// A Python object can then back at most one mutable slice.
fn shared_copies(descriptor: &OperationDescriptor, items: &[Bound<'_, PyAny>]) -> Vec<Option<Vec<u8>>> {
    let writer = writer_index(descriptor, items.len());
    let keeps_borrow = |index: usize| {
        let item = &items[index];
        match writer {
            Some(writer) if items[writer].is(item) => writer == index,
            _ => items.iter().position(|other| other.is(item)) == Some(index),
        }
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item.downcast::<PyByteArray>() {
            Ok(array) if !keeps_borrow(index) => Some(array.to_vec()),
            _ => None,
        })
        .collect()
}

fn to_arg<'a>(item: &'a Bound<'_, PyAny>, copy: Option<&'a [u8]>) -> PyResult<Arg<'a>> {
    if let Some(copy) = copy {
        return Ok(Arg::Bytes(copy));
    }
    if let Ok(bytes) = item.downcast::<PyBytes>() {
        return Ok(Arg::Bytes(bytes.as_bytes()));
    }
    if let Ok(array) = item.downcast::<PyByteArray>() {
        // SAFETY: no Python code runs while the call holds this slice, and
        // `shared_copies` guarantees no other argument views the same object.
        return Ok(Arg::ByteArray(unsafe { array.as_bytes_mut() }));
    }
    if let Ok(value) = item.downcast::<PyInt>() {
        return Ok(Arg::Int(saturating_int(value)?));
    }
    if let Ok(text) = item.downcast::<PyString>() {
        return Ok(Arg::Str(text.to_str()?));
    }
    Ok(Arg::Unsupported(type_name(item)))
}

fn keyword_options(kwargs: &Bound<'_, PyDict>) -> PyResult<Vec<(String, OptionValue)>> {
    let mut options = Vec::with_capacity(kwargs.len());
    for (key, value) in kwargs.iter() {
        let key: String = key.extract()?;
        let value = if value.is_instance_of::<PyBool>() {
            OptionValue::Bool(value.extract()?)
        } else if let Ok(int) = value.downcast::<PyInt>() {
            OptionValue::Int(saturating_int(int)?)
        } else {
            OptionValue::Other(type_name(&value))
        };
        options.push((key, value));
    }
    Ok(options)
}

fn call(
    py: Python<'_>,
    name: &str,
    args: &Bound<'_, PyTuple>,
    kwargs: Option<&Bound<'_, PyDict>>,
) -> PyResult<PyObject> {
    let descriptor = registry::descriptor(name)?;
    let items: Vec<Bound<'_, PyAny>> = args.iter().collect();
    let copies = shared_copies(descriptor, &items);
    let mut positional = Vec::with_capacity(items.len());
    for (item, copy) in items.iter().zip(&copies) {
        positional.push(to_arg(item, copy.as_deref())?);
    }
    let named = match kwargs {
        Some(kwargs) => keyword_options(kwargs)?,
        None => Vec::new(),
    };
    let options: Vec<(&str, OptionValue)> = named
        .iter()
        .map(|(key, value)| (key.as_str(), value.clone()))
        .collect();

    let outcome = invoke(name, positional, &options)?;
    Ok(match outcome {
        Outcome::Bool(value) => value.into_py(py),
        Outcome::Byte(value) => value.into_py(py),
        Outcome::Wide(value) => value.into_py(py),
        Outcome::Index(value) => value.into_py(py),
        Outcome::None => py.None(),
    })
}

macro_rules! byte_functions {
    ($($name:ident),+ $(,)?) => {
        $(
            #[pyfunction]
            #[pyo3(signature = (*args, **kwargs))]
            fn $name(
                py: Python<'_>,
                args: &Bound<'_, PyTuple>,
                kwargs: Option<&Bound<'_, PyDict>>,
            ) -> PyResult<PyObject> {
                call(py, stringify!($name), args, kwargs)
            }
        )+

        fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
            $(m.add_function(wrap_pyfunction!($name, m)?)?;)+
            Ok(())
        }
    };
}

byte_functions!(
    eq, ne, lt, le, gt, ge, ball, bany, findindex, bmax, bmin, bsum, and_, or_, xor, lshift,
    rshift, invert,
);

/// Name of the SIMD level in use, or `"scalar"`.
#[pyfunction]
fn simdsupport() -> &'static str {
    simd::active_level().label()
}

#[pymodule]
fn bytelanes(m: &Bound<'_, PyModule>) -> PyResult<()> {
    register(m)?;
    m.add_function(wrap_pyfunction!(simdsupport, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
