//! Production randomness from the operating system CSPRNG.

use super::RandomByteSource;
use crate::error::KeyingError;

/// OS cryptographic RNG (getrandom). Truly random, not reproducible.
///
/// Stateless: any number of instances may be used concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRandom;

impl SystemRandom {
    /// Create a system RNG handle.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RandomByteSource for SystemRandom {
    fn next_bytes(&mut self, buffer: &mut [u8]) -> Result<(), KeyingError> {
        getrandom::fill(buffer)
            .map_err(|e| KeyingError::EntropyUnavailable { reason: e.to_string() })
    }
}
