//! Randomness sources for nonces, challenges and ephemeral secrets
//!
//! Protocol code depends on [`RandomByteSource`] only. Session configuration
//! decides which variant backs it:
//!
//! - [`SystemRandom`]: OS CSPRNG, used for every real session
//! - [`DeterministicRandom`]: byte-reproducible stream for replaying
//!   captured protocol traces in tests

pub mod deterministic;
pub mod system;

use serde::{Deserialize, Serialize};

pub use deterministic::DeterministicRandom;
pub use system::SystemRandom;

use crate::error::KeyingError;

/// Source of random bytes.
pub trait RandomByteSource {
    /// Fill `buffer` completely with random bytes.
    fn next_bytes(&mut self, buffer: &mut [u8]) -> Result<(), KeyingError>;

    /// Return `count` fresh random bytes suitable for seeding.
    ///
    /// Draws from the same state as [`next_bytes`](Self::next_bytes).
    fn generate_seed(&mut self, count: usize) -> Result<Vec<u8>, KeyingError> {
        let mut seed = vec![0u8; count];
        self.next_bytes(&mut seed)?;
        Ok(seed)
    }
}

/// Randomness selection owned by session configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomnessConfig {
    /// Replace the OS RNG with [`DeterministicRandom`]. Only for
    /// test/interop capture; never enable for real sessions.
    #[serde(default)]
    pub test_mode: bool,
}

/// The randomness variant selected for a session.
pub enum Randomness {
    /// OS CSPRNG
    System(SystemRandom),
    /// Reproducible test-mode stream
    Deterministic(DeterministicRandom),
}

impl Randomness {
    /// Build the source `config` asks for.
    ///
    /// # Errors
    ///
    /// - `AlgorithmUnavailable`: test mode requested but the deterministic
    ///   source could not be constructed
    pub fn from_config(config: &RandomnessConfig) -> Result<Self, KeyingError> {
        if config.test_mode {
            tracing::warn!("test mode: using deterministic randomness, output is predictable");
            Ok(Self::Deterministic(DeterministicRandom::new()?))
        } else {
            tracing::debug!("using system randomness");
            Ok(Self::System(SystemRandom::new()))
        }
    }

    /// Whether this is the reproducible test-mode variant.
    pub fn is_deterministic(&self) -> bool {
        matches!(self, Self::Deterministic(_))
    }
}

impl RandomByteSource for Randomness {
    fn next_bytes(&mut self, buffer: &mut [u8]) -> Result<(), KeyingError> {
        match self {
            Self::System(rng) => rng.next_bytes(buffer),
            Self::Deterministic(rng) => rng.next_bytes(buffer),
        }
    }

    fn generate_seed(&mut self, count: usize) -> Result<Vec<u8>, KeyingError> {
        match self {
            Self::System(rng) => rng.generate_seed(count),
            Self::Deterministic(rng) => rng.generate_seed(count),
        }
    }
}
