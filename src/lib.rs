//! Vectorised predicates, reductions, searches and bitwise transforms over
//! byte sequences.
//!
//! Every operation validates its arguments completely, then runs either the
//! scalar kernel or a SIMD kernel for the best instruction set the CPU
//! offers. The two always agree; `nosimd` and the `BYTELANES_SIMD`
//! environment variable only change speed.
//!
//! ```
//! use bytelanes::{predicate_any, reduce_sum, CallOptions};
//!
//! let data = vec![100u8; 96];
//! let options = CallOptions::new();
//! assert!(predicate_any("==", &data, 100u8, &options).unwrap());
//! assert!(!predicate_any("==", &data, 99u8, &options).unwrap());
//! assert_eq!(reduce_sum(&data, &options.with_maxlen(10)).unwrap(), 1000);
//! ```

mod assemble;
mod engine;
pub mod error;
mod kernel;
pub mod operand;
pub mod options;
pub mod planner;
#[cfg(feature = "python")]
mod python;
pub mod registry;
pub mod simd;
mod validate;

pub use engine::{
    find_index, invert, invoke, predicate_all, predicate_any, reduce_max, reduce_min, reduce_sum,
    transform,
};
pub use error::{Error, Result};
pub use operand::{Arg, ByteSeq, Operand, Outcome, NOT_FOUND};
pub use options::{CallOptions, OptionValue};
pub use planner::ExecutionPlan;
pub use registry::{BitOp, CompareOp};
