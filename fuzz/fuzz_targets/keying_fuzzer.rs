//! Fuzz target for prf+, the deterministic random source and DES parity
//!
//! # Strategy
//!
//! - Arbitrary keys and seeds (empty, small, large) under every HMAC PRF
//! - Output lengths crossing block boundaries
//! - Random sequences of deterministic draws, interleaved with `set_seed`
//! - Arbitrary-length parity inputs
//!
//! # Invariants
//!
//! - prf+ returns exactly the requested length and is deterministic
//! - Shorter prf+ output is a prefix of longer output
//! - Two deterministic sources agree draw for draw; `set_seed` is ignored
//! - Parity expansion accepts exactly 7 bytes and every output byte is odd

#![no_main]

use arbitrary::Arbitrary;
use ikekit_crypto::{
    add_parity_bits, is_odd_parity, prf_plus, DeterministicRandom, HmacSigner, KeyingError,
    PrfAlgorithm, RandomByteSource,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct KeyingScenario {
    /// PRF transform selector
    prf: PrfChoice,
    /// Key material (variable length)
    key: Vec<u8>,
    /// Data to sign
    seed: Vec<u8>,
    /// Requested prf+ length (clamped)
    output_len: u16,
    /// Deterministic source operations
    operations: Vec<RandomOperation>,
    /// Parity expansion input (any length)
    parity_input: Vec<u8>,
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum PrfChoice {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl PrfChoice {
    fn algorithm(self) -> PrfAlgorithm {
        match self {
            PrfChoice::Sha1 => PrfAlgorithm::HmacSha1,
            PrfChoice::Sha256 => PrfAlgorithm::HmacSha256,
            PrfChoice::Sha384 => PrfAlgorithm::HmacSha384,
            PrfChoice::Sha512 => PrfAlgorithm::HmacSha512,
        }
    }
}

#[derive(Debug, Clone, Arbitrary)]
enum RandomOperation {
    /// Draw bytes through `next_bytes`
    NextBytes { count: u8 },
    /// Draw bytes through `generate_seed`
    GenerateSeed { count: u8 },
    /// Attempt to reseed (must be ignored)
    SetSeed { seed: Vec<u8> },
    /// Attempt to reseed with an integer (must be ignored)
    SetSeedU64 { seed: u64 },
}

fuzz_target!(|scenario: KeyingScenario| {
    let signer = HmacSigner::new(scenario.prf.algorithm());
    let output_len = usize::from(scenario.output_len % 2048);

    // INVARIANT 1: prf+ output has the exact requested length
    let output = prf_plus(&signer, &scenario.key, &scenario.seed, output_len).unwrap();
    assert_eq!(output.len(), output_len, "prf+ must return the requested length");

    // INVARIANT 2: prf+ is deterministic
    let again = prf_plus(&signer, &scenario.key, &scenario.seed, output_len).unwrap();
    assert_eq!(output, again, "prf+ must be deterministic");

    // INVARIANT 3: prefix stability
    let half = prf_plus(&signer, &scenario.key, &scenario.seed, output_len / 2).unwrap();
    assert_eq!(half.as_slice(), &output[..output_len / 2], "shorter output must be a prefix");

    // INVARIANT 4: deterministic sources agree regardless of set_seed calls
    let mut perturbed = DeterministicRandom::new().unwrap();
    let mut reference = DeterministicRandom::new().unwrap();

    for op in scenario.operations.iter().take(64) {
        match op {
            RandomOperation::NextBytes { count } => {
                let mut a = vec![0u8; usize::from(*count)];
                let mut b = vec![0u8; usize::from(*count)];
                perturbed.next_bytes(&mut a).unwrap();
                reference.next_bytes(&mut b).unwrap();
                assert_eq!(a, b, "deterministic draws must agree");
            },
            RandomOperation::GenerateSeed { count } => {
                let a = perturbed.generate_seed(usize::from(*count)).unwrap();
                let b = reference.generate_seed(usize::from(*count)).unwrap();
                assert_eq!(a, b, "deterministic seeds must agree");
            },
            RandomOperation::SetSeed { seed } => perturbed.set_seed(seed),
            RandomOperation::SetSeedU64 { seed } => perturbed.set_seed_u64(*seed),
        }
    }

    // INVARIANT 5: parity expansion accepts exactly 7 bytes, output is odd
    match add_parity_bits(&scenario.parity_input) {
        Ok(block) => {
            assert_eq!(scenario.parity_input.len(), 7, "only 7-byte input may succeed");
            assert!(block.iter().all(|&b| is_odd_parity(b)), "every byte must have odd parity");
        },
        Err(KeyingError::InvalidArgument { .. }) => {
            assert_ne!(scenario.parity_input.len(), 7, "7-byte input must succeed");
        },
        Err(other) => panic!("unexpected parity error: {other}"),
    }
});
