//! Execution planner: scalar kernel or vector kernel for one call.
//!
//! The choice only affects speed. Both kernels produce identical results.

use std::fmt;

use crate::options::CallOptions;
use crate::simd::{self, SimdLevel};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionPlan {
    Scalar,
    /// Whole chunks on the given backend, remainder on the scalar kernel.
    Vector(SimdLevel),
}

impl ExecutionPlan {
    pub fn is_vector(&self) -> bool {
        matches!(self, ExecutionPlan::Vector(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExecutionPlan::Scalar => "scalar",
            ExecutionPlan::Vector(level) => level.label(),
        }
    }
}

impl fmt::Display for ExecutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Plan a call over `window` elements on the running CPU.
pub fn plan(window: usize, options: &CallOptions) -> ExecutionPlan {
    select(simd::active_level(), window, options.nosimd)
}

/// `level` must be supported by the running CPU for the plan to be executed.
pub(crate) fn select(level: SimdLevel, window: usize, nosimd: bool) -> ExecutionPlan {
    if nosimd || level == SimdLevel::Scalar || window < level.lanes() {
        ExecutionPlan::Scalar
    } else {
        ExecutionPlan::Vector(level)
    }
}
