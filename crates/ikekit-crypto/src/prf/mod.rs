//! Pseudorandom functions: the signing capability and its HMAC realisations
//!
//! # Architecture
//!
//! ```text
//! ByteSigner (sign(key, data) -> mac)
//!        │
//!        ├── HmacSigner (PRF_HMAC_SHA1 / SHA2_256 / SHA2_384 / SHA2_512)
//!        ├── DeterministicRandom (HMAC-SHA-256, test mode only)
//!        └── closures (capability injection)
//!        │
//!        ▼
//! prf+ → keying material of arbitrary length
//! ```

pub mod keystream;

use hmac::{Hmac, Mac, digest::KeyInit};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};

use crate::error::KeyingError;

pub use keystream::prf_plus;

/// Capability to "sign these bytes under this key".
///
/// The expander never depends on a concrete MAC. Implementations MUST be
/// deterministic for a given `(key, data)` pair; every reproducibility
/// guarantee upstream rests on this.
pub trait ByteSigner {
    /// MAC `data` under `key`.
    fn sign(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>, KeyingError>;
}

impl<F> ByteSigner for F
where
    F: Fn(&[u8], &[u8]) -> Result<Vec<u8>, KeyingError>,
{
    fn sign(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>, KeyingError> {
        self(key, data)
    }
}

/// IKEv2 PRF transforms backed by HMAC (RFC 7296 3.3.2, RFC 4868)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrfAlgorithm {
    /// `PRF_HMAC_SHA1`, transform id 2
    HmacSha1,
    /// `PRF_HMAC_SHA2_256`, transform id 5
    HmacSha256,
    /// `PRF_HMAC_SHA2_384`, transform id 6
    HmacSha384,
    /// `PRF_HMAC_SHA2_512`, transform id 7
    HmacSha512,
}

impl PrfAlgorithm {
    /// Look up a PRF by its IKEv2 transform id.
    ///
    /// # Errors
    ///
    /// - `AlgorithmUnavailable`: the id is unassigned or not HMAC based
    ///   (e.g. `PRF_AES128_XCBC`)
    pub fn from_transform_id(id: u16) -> Result<Self, KeyingError> {
        match id {
            2 => Ok(Self::HmacSha1),
            5 => Ok(Self::HmacSha256),
            6 => Ok(Self::HmacSha384),
            7 => Ok(Self::HmacSha512),
            other => Err(KeyingError::AlgorithmUnavailable { algorithm: format!("PRF({other})") }),
        }
    }

    /// IKEv2 transform id.
    pub fn transform_id(self) -> u16 {
        match self {
            Self::HmacSha1 => 2,
            Self::HmacSha256 => 5,
            Self::HmacSha384 => 6,
            Self::HmacSha512 => 7,
        }
    }

    /// Preferred key length. For HMAC PRFs this equals the output length,
    /// and it is the length of `SK_d`, `SK_pi` and `SK_pr`.
    pub fn key_len(self) -> usize {
        self.output_len()
    }

    /// MAC output length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            Self::HmacSha1 => 20,
            Self::HmacSha256 => 32,
            Self::HmacSha384 => 48,
            Self::HmacSha512 => 64,
        }
    }

    /// Conventional algorithm name, used in error messages and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::HmacSha1 => "HmacSHA1",
            Self::HmacSha256 => "HmacSHA256",
            Self::HmacSha384 => "HmacSHA384",
            Self::HmacSha512 => "HmacSHA512",
        }
    }
}

/// Production signer realising one of the HMAC PRF transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HmacSigner {
    algorithm: PrfAlgorithm,
}

impl HmacSigner {
    /// Create a signer for `algorithm`.
    pub fn new(algorithm: PrfAlgorithm) -> Self {
        Self { algorithm }
    }

    /// The PRF this signer computes.
    pub fn algorithm(&self) -> PrfAlgorithm {
        self.algorithm
    }
}

impl ByteSigner for HmacSigner {
    fn sign(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>, KeyingError> {
        match self.algorithm {
            PrfAlgorithm::HmacSha1 => hmac_bytes::<Hmac<Sha1>>(key, data),
            PrfAlgorithm::HmacSha256 => hmac_bytes::<Hmac<Sha256>>(key, data),
            PrfAlgorithm::HmacSha384 => hmac_bytes::<Hmac<Sha384>>(key, data),
            PrfAlgorithm::HmacSha512 => hmac_bytes::<Hmac<Sha512>>(key, data),
        }
    }
}

/// One-shot HMAC over `data`.
pub(crate) fn hmac_bytes<M>(key: &[u8], data: &[u8]) -> Result<Vec<u8>, KeyingError>
where
    M: Mac + KeyInit,
{
    let mut mac = <M as KeyInit>::new_from_slice(key)
        .map_err(|e| KeyingError::SigningFailed { reason: e.to_string() })?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}
