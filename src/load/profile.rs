//! Per-visit load profile.

use std::time::Duration;

use rand::Rng;

use crate::config::LoadConfig;

/// One mebibyte.
pub const MIB: usize = 1024 * 1024;

/// The load drawn for a single visit. Never retained past the visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProfile {
    /// How long to spin the CPU.
    pub busy: Duration,
    /// Size of the transient memory block, in MiB.
    pub block_mib: usize,
}

impl LoadProfile {
    /// Draw a profile uniformly from the configured ranges (both inclusive).
    ///
    /// Panics if a range is empty; `validate_config` rejects those.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R, config: &LoadConfig) -> Self {
        let min = Duration::from_millis(config.min_busy_ms);
        let max = Duration::from_millis(config.max_busy_ms);

        Self {
            busy: rng.gen_range(min..=max),
            block_mib: rng.gen_range(config.min_block_mib..=config.max_block_mib),
        }
    }

    /// Block size in bytes, or `None` if it does not fit in `usize`.
    pub fn block_bytes(&self) -> Option<usize> {
        self.block_mib.checked_mul(MIB)
    }
}
