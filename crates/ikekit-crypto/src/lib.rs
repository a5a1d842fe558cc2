//! IKEv2 / EAP Keying Primitives
//!
//! Byte-oriented building blocks shared by the IKEv2 handshake and the EAP
//! methods running inside it. Everything here is synchronous and free of I/O.
//! Randomness is injected through [`RandomByteSource`] so whole protocol runs
//! can be replayed byte for byte.
//!
//! # Key Derivation
//!
//! A short secret is stretched with prf+ (RFC 7296 2.13) over any
//! [`ByteSigner`]. IKE and Child SA keys are slices of that stream.
//!
//! ```text
//! shared secret + context bytes
//!        │
//!        ▼
//! prf+ (ByteSigner: HMAC-SHA1 / SHA2-256 / SHA2-384 / SHA2-512)
//!        │
//!        ▼
//! SK_d | SK_ai | SK_ar | SK_ei | SK_er | SK_pi | SK_pr
//! ```
//!
//! # Randomness
//!
//! ```text
//! RandomnessConfig { test_mode }
//!        │
//!        ├── false → SystemRandom (getrandom)
//!        └── true  → DeterministicRandom
//!                        │
//!                        ▼
//!                  prf+ (self as HMAC-SHA-256 signer, fixed key, state)
//!                        │
//!                        ▼
//!                  output → returned bytes AND next state
//! ```
//!
//! # MS-CHAPv2
//!
//! 7-byte password-hash sections are expanded to 8-byte DES keys with odd
//! parity before `DesEncrypt()`.
//!
//! # Security
//!
//! - Derived keys and intermediate MAC blocks are zeroized when dropped
//! - Key material is never logged; only lengths and algorithm names are
//! - [`DeterministicRandom`] is predictable by construction and must never
//!   back a production session

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod ike;
pub mod mschap;
pub mod parity;
pub mod prf;
pub mod random;

pub use error::KeyingError;
pub use ike::{ChildSaKeys, IkeSaKeys, KeyLengths, generate_rekeyed_skeyseed, generate_skeyseed};
pub use mschap::{challenge_response, des_encrypt, generate_peer_challenge};
pub use parity::{add_parity_bits, is_odd_parity};
pub use prf::{ByteSigner, HmacSigner, PrfAlgorithm, prf_plus};
pub use random::{
    DeterministicRandom, RandomByteSource, Randomness, RandomnessConfig, SystemRandom,
};
