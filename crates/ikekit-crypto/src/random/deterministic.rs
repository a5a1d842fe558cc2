//! Deterministic stand-in for a secure RNG, for protocol replay in tests
//!
//! Every instance starts from the same compiled-in HMAC-SHA-256 key and seed
//! and advances by feeding its own prf+ output back in as the next seed:
//!
//! ```text
//! bytes_to_sign₀ = INITIAL_BYTES_TO_SIGN
//! outputₙ        = prf+(self, MAC_KEY, bytes_to_signₙ, countₙ)
//! bytes_to_signₙ₊₁ = outputₙ
//! ```
//!
//! # Security
//!
//! The output is fully predictable. This source MUST only be selected in
//! test/interop capture modes and never for production key generation.

use hmac::Hmac;
use sha2::Sha256;
use zeroize::Zeroize;

use super::RandomByteSource;
use crate::{
    error::KeyingError,
    prf::{ByteSigner, hmac_bytes, prf_plus},
};

type HmacSha256 = Hmac<Sha256>;

/// Fixed HMAC-SHA-256 key driving the expansion
pub(crate) const MAC_KEY: [u8; 32] = [
    0x5a, 0x3c, 0x91, 0x0e, 0xd4, 0x27, 0x6b, 0xf8, 0x13, 0xa0, 0x4e, 0xc2, 0x79, 0x85, 0x3d,
    0x1f, 0xe6, 0x52, 0x08, 0xbb, 0x94, 0x6d, 0x21, 0xcf, 0x37, 0x7a, 0xe0, 0x49, 0x16, 0xb3,
    0x8c, 0x65,
];

/// Initial bytes-to-sign buffer
pub(crate) const INITIAL_BYTES_TO_SIGN: [u8; 33] = [
    0x01, 0x9f, 0x24, 0x6e, 0xb7, 0x03, 0xd8, 0x51, 0xca, 0x3b, 0x70, 0xe5, 0x12, 0x8d, 0x46,
    0xf9, 0x2c, 0xa1, 0x67, 0x0b, 0xde, 0x35, 0x98, 0x4f, 0xe2, 0x1a, 0x7c, 0xb0, 0x53, 0x86,
    0x2f, 0xc4, 0x69,
];

/// Reproducible random byte source.
///
/// Two freshly constructed instances driven with the same sequence of
/// `next_bytes`/`generate_seed` calls (same byte counts) produce identical
/// output, element for element. Both operations share one state, so
/// interleaving them yields a single continuous stream.
///
/// Calls with different chunking are NOT interchangeable: each call
/// re-seeds the expansion with its own output, so `next_bytes(16)` followed
/// by `next_bytes(32)` agrees with a single `next_bytes(48)` only in the first
/// 16 bytes.
///
/// # Concurrency
///
/// Every draw mutates the internal buffer, so all mutating methods take
/// `&mut self`. Share it across threads only behind external
/// serialization (e.g. a `Mutex`), otherwise the sequence is no longer
/// reproducible.
pub struct DeterministicRandom {
    /// Current seed for the next expansion
    bytes_to_sign: Vec<u8>,
}

impl DeterministicRandom {
    /// Create a source in the fixed initial state.
    ///
    /// # Errors
    ///
    /// - `AlgorithmUnavailable`: HMAC-SHA-256 could not be keyed with the
    ///   fixed key. There is no fallback algorithm.
    pub fn new() -> Result<Self, KeyingError> {
        hmac_bytes::<HmacSha256>(&MAC_KEY, &[]).map_err(|_| {
            KeyingError::AlgorithmUnavailable { algorithm: "HmacSHA256".to_string() }
        })?;

        Ok(Self { bytes_to_sign: INITIAL_BYTES_TO_SIGN.to_vec() })
    }

    /// Ignored. The output sequence is fixed by construction; honoring a
    /// caller seed would break replay of recorded sessions.
    pub fn set_seed(&mut self, _seed: &[u8]) {}

    /// Ignored, see [`set_seed`](Self::set_seed).
    pub fn set_seed_u64(&mut self, _seed: u64) {}

    /// Expand `count` bytes from the current state and advance it.
    ///
    /// A zero-byte draw still advances: the next seed becomes empty.
    fn advance(&mut self, count: usize) -> Result<Vec<u8>, KeyingError> {
        let output = prf_plus(&*self, &MAC_KEY, &self.bytes_to_sign, count)?;

        self.bytes_to_sign.zeroize();
        self.bytes_to_sign.clone_from(&output);

        Ok(output)
    }
}

impl ByteSigner for DeterministicRandom {
    /// Signs with HMAC-SHA-256 directly; never re-enters the expander.
    fn sign(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>, KeyingError> {
        hmac_bytes::<HmacSha256>(key, data)
    }
}

impl RandomByteSource for DeterministicRandom {
    fn next_bytes(&mut self, buffer: &mut [u8]) -> Result<(), KeyingError> {
        let mut output = self.advance(buffer.len())?;
        buffer.copy_from_slice(&output);
        output.zeroize();
        Ok(())
    }

    fn generate_seed(&mut self, count: usize) -> Result<Vec<u8>, KeyingError> {
        self.advance(count)
    }
}

impl Drop for DeterministicRandom {
    fn drop(&mut self) {
        self.bytes_to_sign.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prf::{HmacSigner, PrfAlgorithm};

    fn next(source: &mut DeterministicRandom, count: usize) -> Vec<u8> {
        let mut buffer = vec![0u8; count];
        source.next_bytes(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn fresh_instances_agree() {
        let mut a = DeterministicRandom::new().unwrap();
        let mut b = DeterministicRandom::new().unwrap();

        assert_eq!(next(&mut a, 16), next(&mut b, 16));
        assert_eq!(next(&mut a, 32), next(&mut b, 32));
        assert_eq!(a.generate_seed(7).unwrap(), b.generate_seed(7).unwrap());
    }

    #[test]
    fn first_draw_is_prf_plus_of_initial_state() {
        let mut source = DeterministicRandom::new().unwrap();
        let signer = HmacSigner::new(PrfAlgorithm::HmacSha256);

        let expected = prf_plus(&signer, &MAC_KEY, &INITIAL_BYTES_TO_SIGN, 40).unwrap();
        assert_eq!(next(&mut source, 40), expected);
    }

    #[test]
    fn output_becomes_next_seed() {
        let mut source = DeterministicRandom::new().unwrap();
        let signer = HmacSigner::new(PrfAlgorithm::HmacSha256);

        let first = next(&mut source, 16);
        let second = next(&mut source, 32);

        let expected = prf_plus(&signer, &MAC_KEY, &first, 32).unwrap();
        assert_eq!(second, expected);
    }

    #[test]
    fn successive_draws_differ() {
        let mut source = DeterministicRandom::new().unwrap();
        let first = next(&mut source, 32);
        let second = next(&mut source, 32);

        assert_ne!(first, second, "state must advance between draws");
    }

    #[test]
    fn next_bytes_and_generate_seed_share_state() {
        let mut interleaved = DeterministicRandom::new().unwrap();
        let mut plain = DeterministicRandom::new().unwrap();

        let a = interleaved.generate_seed(20).unwrap();
        let b = next(&mut interleaved, 20);

        assert_eq!(a, next(&mut plain, 20));
        assert_eq!(b, plain.generate_seed(20).unwrap());
    }

    #[test]
    fn set_seed_is_ignored() {
        let mut seeded = DeterministicRandom::new().unwrap();
        let mut untouched = DeterministicRandom::new().unwrap();

        seeded.set_seed(b"caller supplied seed");
        let first = next(&mut seeded, 24);
        seeded.set_seed_u64(0xDEAD_BEEF);
        let second = next(&mut seeded, 24);

        assert_eq!(first, next(&mut untouched, 24));
        assert_eq!(second, next(&mut untouched, 24));
    }

    #[test]
    fn sign_is_plain_hmac_sha256() {
        let source = DeterministicRandom::new().unwrap();
        let signer = HmacSigner::new(PrfAlgorithm::HmacSha256);

        assert_eq!(
            source.sign(b"key", b"data").unwrap(),
            signer.sign(b"key", b"data").unwrap()
        );
    }
}
