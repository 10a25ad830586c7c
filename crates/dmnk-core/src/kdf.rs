//! Argon2id cost parameters
//!
//! Stored alongside every encrypted keystore record so a record stays
//! decryptable after the defaults change.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Upper bound on memory cost (KiB) accepted from a stored record: 256 MiB
pub const MAX_MEMORY_COST: u32 = 256 * 1024;

/// Upper bound on iterations accepted from a stored record
pub const MAX_ITERATIONS: u32 = 8;

/// Upper bound on lanes accepted from a stored record
pub const MAX_PARALLELISM: u32 = 16;

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KdfParams {
    /// Time cost (passes over memory)
    pub iterations: u32,
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl Default for KdfParams {
    /// Memory: 64 MiB (65536 KiB), Iterations: 3, Parallelism: 4
    fn default() -> Self {
        Self {
            iterations: 3,
            memory_cost: 65536,
            parallelism: 4,
        }
    }
}

impl KdfParams {
    /// Create parameters from explicit costs
    pub fn new(iterations: u32, memory_cost: u32, parallelism: u32) -> Self {
        Self {
            iterations,
            memory_cost,
            parallelism,
        }
    }

    /// Lighter profile for slow devices: 19 MiB, 2 iterations, 1 lane
    pub fn interactive() -> Self {
        Self::new(2, 19456, 1)
    }

    /// Check the costs are accepted by Argon2 and within the allowed bounds
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 || self.iterations > MAX_ITERATIONS {
            return Err(Error::Config(format!(
                "KDF iterations must be in 1..={}, got {}",
                MAX_ITERATIONS, self.iterations
            )));
        }
        if self.parallelism == 0 || self.parallelism > MAX_PARALLELISM {
            return Err(Error::Config(format!(
                "KDF parallelism must be in 1..={}, got {}",
                MAX_PARALLELISM, self.parallelism
            )));
        }
        // Argon2 needs at least 8 KiB per lane
        let min_memory = 8 * self.parallelism;
        if self.memory_cost < min_memory || self.memory_cost > MAX_MEMORY_COST {
            return Err(Error::Config(format!(
                "KDF memory cost must be in {}..={} KiB, got {}",
                min_memory, MAX_MEMORY_COST, self.memory_cost
            )));
        }
        Ok(())
    }
}
