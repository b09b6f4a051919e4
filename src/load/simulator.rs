//! Synthetic CPU and memory load.
//!
//! Each call spins the calling thread for the drawn duration, then commits
//! and releases a block of memory. Both phases are synchronous; callers on an
//! async runtime must run them on a blocking thread.

use std::collections::TryReserveError;
use std::hint::black_box;
use std::time::{Duration, Instant};

use rand::Rng;
use thiserror::Error;

use crate::config::LoadConfig;
use crate::load::profile::{LoadProfile, MIB};

/// Byte written into every simulated allocation so its pages are committed.
const FILL: u8 = 0xA5;

/// Errors raised while simulating load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The memory block could not be reserved. `source` is `None` when the
    /// size in bytes overflows `usize`.
    #[error("failed to allocate {block_mib} MiB for load simulation")]
    Allocation {
        block_mib: usize,
        #[source]
        source: Option<TryReserveError>,
    },
}

/// What one invocation actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub profile: LoadProfile,
    /// Measured time spent spinning.
    pub busy: Duration,
    pub allocated_bytes: usize,
}

impl LoadReport {
    fn skipped() -> Self {
        Self {
            profile: LoadProfile {
                busy: Duration::ZERO,
                block_mib: 0,
            },
            busy: Duration::ZERO,
            allocated_bytes: 0,
        }
    }
}

/// Draws a [`LoadProfile`] per call and imposes it on the calling thread.
#[derive(Debug, Clone)]
pub struct LoadSimulator {
    config: LoadConfig,
}

impl LoadSimulator {
    pub fn new(config: LoadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Simulate one visit's load using the thread-local RNG.
    pub fn run(&self) -> Result<LoadReport, LoadError> {
        self.run_with(&mut rand::thread_rng())
    }

    /// Simulate one visit's load with a caller-supplied RNG.
    pub fn run_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<LoadReport, LoadError> {
        if !self.config.enabled {
            return Ok(LoadReport::skipped());
        }

        let profile = LoadProfile::draw(rng, &self.config);
        let busy = spin_for(profile.busy);
        let allocated_bytes = touch_block(profile.block_mib)?;

        Ok(LoadReport {
            profile,
            busy,
            allocated_bytes,
        })
    }
}

/// Busy-wait on the monotonic clock until `duration` has elapsed.
///
/// Never yields or sleeps. Returns the measured elapsed time.
pub fn spin_for(duration: Duration) -> Duration {
    let start = Instant::now();
    let mut spins: u64 = 0;
    while start.elapsed() < duration {
        spins = black_box(spins.wrapping_add(1));
    }
    start.elapsed()
}

/// Allocate `block_mib` MiB, write every byte, and drop the block before
/// returning. Returns the number of bytes written.
pub fn touch_block(block_mib: usize) -> Result<usize, LoadError> {
    let bytes = block_mib.checked_mul(MIB).ok_or(LoadError::Allocation {
        block_mib,
        source: None,
    })?;

    let mut block: Vec<u8> = Vec::new();
    block
        .try_reserve_exact(bytes)
        .map_err(|source| LoadError::Allocation {
            block_mib,
            source: Some(source),
        })?;
    block.resize(bytes, FILL);

    Ok(black_box(&block).len())
}
