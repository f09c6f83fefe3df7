use std::fmt;
use std::sync::OnceLock;

use tracing::debug;

/// Name of the environment variable capping the detected feature set.
pub const SIMD_MAX_ENV: &str = "BYTELANES_SIMD_MAX";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimdCapabilities {
    pub arch: &'static str,
    pub sse2: bool,
    pub avx2: bool,
    pub neon: bool,
    pub lane_width_bits: usize,
}

impl SimdCapabilities {
    pub fn feature_level(&self) -> &'static str {
        if self.avx2 {
            "avx2"
        } else if self.neon {
            "neon"
        } else if self.sse2 {
            "sse2"
        } else {
            "scalar"
        }
    }

    /// Drop every feature above `cap`. Unknown caps leave the set unchanged.
    pub fn capped(mut self, cap: &str) -> Self {
        match cap.trim().to_ascii_lowercase().as_str() {
            "scalar" | "none" => {
                self.sse2 = false;
                self.avx2 = false;
                self.neon = false;
            }
            "sse2" => {
                self.avx2 = false;
            }
            _ => {}
        }
        self.recompute_lane_width();
        self
    }

    fn recompute_lane_width(&mut self) {
        self.lane_width_bits = if self.avx2 {
            256
        } else if self.neon || self.sse2 {
            128
        } else {
            8
        };
    }
}

impl fmt::Display for SimdCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} (lane={}b)",
            self.arch,
            self.feature_level(),
            self.lane_width_bits
        )
    }
}

static CAPABILITIES: OnceLock<SimdCapabilities> = OnceLock::new();

/// Features of the running CPU, after the `BYTELANES_SIMD_MAX` cap.
pub fn capabilities() -> &'static SimdCapabilities {
    CAPABILITIES.get_or_init(|| {
        let caps = apply_env_overrides(detect());
        debug!(capabilities = %caps, "detected simd capabilities");
        caps
    })
}

fn apply_env_overrides(caps: SimdCapabilities) -> SimdCapabilities {
    match std::env::var(SIMD_MAX_ENV) {
        Ok(value) => caps.capped(&value),
        Err(_) => caps,
    }
}

#[cfg(target_arch = "x86_64")]
fn detect() -> SimdCapabilities {
    let mut caps = SimdCapabilities {
        arch: "x86_64",
        sse2: std::arch::is_x86_feature_detected!("sse2"),
        avx2: std::arch::is_x86_feature_detected!("avx2"),
        neon: false,
        lane_width_bits: 0,
    };
    caps.recompute_lane_width();
    caps
}

#[cfg(target_arch = "aarch64")]
fn detect() -> SimdCapabilities {
    let mut caps = SimdCapabilities {
        arch: "aarch64",
        sse2: false,
        avx2: false,
        neon: std::arch::is_aarch64_feature_detected!("neon"),
        lane_width_bits: 0,
    };
    caps.recompute_lane_width();
    caps
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn detect() -> SimdCapabilities {
    SimdCapabilities {
        arch: "generic",
        sse2: false,
        avx2: false,
        neon: false,
        lane_width_bits: 8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> SimdCapabilities {
        SimdCapabilities {
            arch: "x86_64",
            sse2: true,
            avx2: true,
            neon: false,
            lane_width_bits: 256,
        }
    }

    #[test]
    fn test_cap_to_sse2() {
        let caps = full().capped("SSE2");
        assert!(caps.sse2);
        assert!(!caps.avx2);
        assert_eq!(caps.lane_width_bits, 128);
        assert_eq!(caps.feature_level(), "sse2");
    }

    #[test]
    fn test_cap_to_scalar() {
        let caps = full().capped(" scalar ");
        assert_eq!(caps.feature_level(), "scalar");
        assert_eq!(caps.lane_width_bits, 8);
    }

    #[test]
    fn test_unknown_cap_is_ignored() {
        assert_eq!(full().capped("avx9000"), full());
    }

    #[test]
    fn test_display() {
        assert_eq!(full().to_string(), "x86_64:avx2 (lane=256b)");
    }
}
