use std::env;
use std::sync::OnceLock;

use tracing::debug;

use super::SimdCapabilities;

/// Name of the environment variable that turns vector kernels off.
pub const SIMD_MODE_ENV: &str = "BYTELANES_SIMD";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimdMode {
    Auto,
    Disable,
}

impl SimdMode {
    pub fn is_disabled(self) -> bool {
        matches!(self, SimdMode::Disable)
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "0" | "false" | "off" | "disable" | "scalar" => SimdMode::Disable,
            _ => SimdMode::Auto,
        }
    }
}

/// Instruction set a vector kernel is compiled for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SimdLevel {
    Scalar,
    Sse2,
    Avx2,
    Neon,
}

impl SimdLevel {
    pub const fn label(self) -> &'static str {
        match self {
            SimdLevel::Scalar => "scalar",
            SimdLevel::Sse2 => "sse2",
            SimdLevel::Avx2 => "avx2",
            SimdLevel::Neon => "neon",
        }
    }

    /// Bytes processed per vector step.
    pub const fn lanes(self) -> usize {
        match self {
            SimdLevel::Scalar => 1,
            SimdLevel::Sse2 | SimdLevel::Neon => 16,
            SimdLevel::Avx2 => 32,
        }
    }

    pub fn supported(self, caps: &SimdCapabilities) -> bool {
        match self {
            SimdLevel::Scalar => true,
            SimdLevel::Sse2 => cfg!(target_arch = "x86_64") && caps.sse2,
            SimdLevel::Avx2 => cfg!(target_arch = "x86_64") && caps.avx2,
            SimdLevel::Neon => cfg!(target_arch = "aarch64") && caps.neon,
        }
    }
}

/// Vector levels compiled into this build, best first.
#[cfg(target_arch = "x86_64")]
const CANDIDATES: &[SimdLevel] = &[SimdLevel::Avx2, SimdLevel::Sse2];

#[cfg(target_arch = "aarch64")]
const CANDIDATES: &[SimdLevel] = &[SimdLevel::Neon];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const CANDIDATES: &[SimdLevel] = &[];

/// Pick the best level `caps` allows, or scalar when `mode` disables vectors.
pub fn resolve(mode: SimdMode, caps: &SimdCapabilities) -> SimdLevel {
    if mode.is_disabled() {
        return SimdLevel::Scalar;
    }
    CANDIDATES
        .iter()
        .copied()
        .find(|level| level.supported(caps))
        .unwrap_or(SimdLevel::Scalar)
}

/// Every vector level the running CPU can execute, best first.
pub fn supported_levels() -> Vec<SimdLevel> {
    let caps = super::capabilities();
    CANDIDATES
        .iter()
        .copied()
        .filter(|level| level.supported(caps))
        .collect()
}

static MODE: OnceLock<SimdMode> = OnceLock::new();
static ACTIVE: OnceLock<SimdLevel> = OnceLock::new();

pub fn global_mode() -> SimdMode {
    *MODE.get_or_init(|| match env::var(SIMD_MODE_ENV) {
        Ok(value) => SimdMode::parse(&value),
        Err(_) => SimdMode::Auto,
    })
}

/// Level every call uses unless it opts out with `nosimd`. Resolved once.
pub fn active_level() -> SimdLevel {
    *ACTIVE.get_or_init(|| {
        let level = resolve(global_mode(), super::capabilities());
        debug!(level = level.label(), "resolved simd level");
        level
    })
}
