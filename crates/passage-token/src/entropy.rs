//! Entropy source abstraction.
//!
//! Keys, token identifiers and fallback implicit assertions all draw from an
//! injected [`EntropySource`], so tests can swap in a seeded generator.

use crate::error::EntropyError;
use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng, TryRngCore};
use std::sync::Mutex;

/// Core trait for entropy providers.
pub trait EntropySource: Send + Sync + 'static {
    /// Fill a buffer with entropy bytes.
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), EntropyError>;

    /// Stable identifier for tracing and diagnostics.
    fn source_id(&self) -> &'static str;
}

/// OS-backed entropy source for production use.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), EntropyError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| EntropyError(e.to_string()))
    }

    fn source_id(&self) -> &'static str {
        "os"
    }
}

/// Deterministic entropy source for tests.
///
/// Not suitable for real keys: anyone who knows the seed knows every byte.
#[derive(Debug)]
pub struct SeededEntropy {
    rng: Mutex<StdRng>,
    seed: u64,
}

impl SeededEntropy {
    /// Create a deterministic entropy source from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            seed,
        }
    }

    /// The seed this source was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl EntropySource for SeededEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), EntropyError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| EntropyError("seeded entropy lock poisoned".to_string()))?;
        rng.fill_bytes(dest);
        Ok(())
    }

    fn source_id(&self) -> &'static str {
        "seeded"
    }
}
