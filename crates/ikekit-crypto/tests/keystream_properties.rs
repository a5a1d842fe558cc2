//! Property-based tests for prf+ and the deterministic random source
//!
//! These tests verify the fundamental invariants of key stream expansion:
//!
//! 1. **Length**: prf+ returns exactly the requested number of bytes
//! 2. **Determinism**: same signer, key, seed and length give the same bytes
//! 3. **Chaining**: every block's input is previous MAC | seed | counter
//! 4. **Reproducibility**: fresh deterministic sources agree call for call
//! 5. **Seed immunity**: `set_seed` never perturbs the deterministic stream

use std::cell::RefCell;

use ikekit_crypto::{
    ByteSigner, DeterministicRandom, HmacSigner, KeyingError, PrfAlgorithm, RandomByteSource,
    prf_plus,
};
use proptest::prelude::*;

const SHA256_BLOCK: usize = 32;

fn prf_strategy() -> impl Strategy<Value = PrfAlgorithm> {
    prop_oneof![
        Just(PrfAlgorithm::HmacSha1),
        Just(PrfAlgorithm::HmacSha256),
        Just(PrfAlgorithm::HmacSha384),
        Just(PrfAlgorithm::HmacSha512),
    ]
}

// Wraps a real signer and records every (key, data) pair it sees
struct Recorder {
    inner: HmacSigner,
    calls: RefCell<Vec<(Vec<u8>, Vec<u8>)>>,
}

impl ByteSigner for Recorder {
    fn sign(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>, KeyingError> {
        let mac = self.inner.sign(key, data)?;
        self.calls.borrow_mut().push((key.to_vec(), data.to_vec()));
        Ok(mac)
    }
}

fn draw(source: &mut DeterministicRandom, count: usize) -> Vec<u8> {
    let mut buffer = vec![0u8; count];
    source.next_bytes(&mut buffer).unwrap();
    buffer
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_prf_plus_length_exact(
        prf in prf_strategy(),
        key in prop::collection::vec(any::<u8>(), 0..64),
        seed in prop::collection::vec(any::<u8>(), 0..128),
        output_len in 0usize..600,
    ) {
        let output = prf_plus(&HmacSigner::new(prf), &key, &seed, output_len).unwrap();
        prop_assert_eq!(output.len(), output_len);
    }

    #[test]
    fn prop_prf_plus_deterministic(
        prf in prf_strategy(),
        key in prop::collection::vec(any::<u8>(), 0..64),
        seed in prop::collection::vec(any::<u8>(), 0..128),
        output_len in 0usize..300,
    ) {
        let signer = HmacSigner::new(prf);
        let first = prf_plus(&signer, &key, &seed, output_len).unwrap();
        let second = prf_plus(&signer, &key, &seed, output_len).unwrap();

        prop_assert_eq!(first, second);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_prf_plus_chains_blocks(
        key in prop::collection::vec(any::<u8>(), 1..64),
        seed in prop::collection::vec(any::<u8>(), 0..64),
        extra in 1usize..SHA256_BLOCK,
    ) {
        let recorder = Recorder {
            inner: HmacSigner::new(PrfAlgorithm::HmacSha256),
            calls: RefCell::new(Vec::new()),
        };

        // Two full blocks plus a partial third
        let output = prf_plus(&recorder, &key, &seed, 2 * SHA256_BLOCK + extra).unwrap();
        let calls = recorder.calls.borrow();
        prop_assert_eq!(calls.len(), 3);

        let mut first_input = seed.clone();
        first_input.push(0x01);
        prop_assert_eq!(&calls[0].0, &key);
        prop_assert_eq!(&calls[0].1, &first_input);

        let mut second_input = output[..SHA256_BLOCK].to_vec();
        second_input.extend_from_slice(&seed);
        second_input.push(0x02);
        prop_assert_eq!(&calls[1].1, &second_input);

        let mut third_input = output[SHA256_BLOCK..2 * SHA256_BLOCK].to_vec();
        third_input.extend_from_slice(&seed);
        third_input.push(0x03);
        prop_assert_eq!(&calls[2].1, &third_input);
    }

    #[test]
    fn prop_prf_plus_prefix_stable(
        prf in prf_strategy(),
        seed in prop::collection::vec(any::<u8>(), 0..64),
        short_len in 0usize..200,
        extra in 0usize..200,
    ) {
        let signer = HmacSigner::new(prf);
        let short = prf_plus(&signer, b"key", &seed, short_len).unwrap();
        let long = prf_plus(&signer, b"key", &seed, short_len + extra).unwrap();

        prop_assert_eq!(short.as_slice(), &long[..short_len]);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn prop_deterministic_sources_agree(
        counts in prop::collection::vec(0usize..100, 1..10),
        use_seed_call in prop::collection::vec(any::<bool>(), 10),
    ) {
        let mut a = DeterministicRandom::new().unwrap();
        let mut b = DeterministicRandom::new().unwrap();

        for (i, &count) in counts.iter().enumerate() {
            let from_a = if use_seed_call[i] {
                a.generate_seed(count).unwrap()
            } else {
                draw(&mut a, count)
            };
            let from_b = draw(&mut b, count);

            prop_assert_eq!(from_a, from_b, "draw {} of {} bytes diverged", i, count);
        }
    }

    #[test]
    fn prop_set_seed_is_noop(
        byte_seed in prop::collection::vec(any::<u8>(), 0..64),
        long_seed in any::<u64>(),
        first in 1usize..64,
        second in 1usize..64,
    ) {
        let mut seeded = DeterministicRandom::new().unwrap();
        let mut untouched = DeterministicRandom::new().unwrap();

        seeded.set_seed(&byte_seed);
        let seeded_first = draw(&mut seeded, first);
        seeded.set_seed_u64(long_seed);
        let seeded_second = draw(&mut seeded, second);

        prop_assert_eq!(seeded_first, draw(&mut untouched, first));
        prop_assert_eq!(seeded_second, draw(&mut untouched, second));
    }
}

#[test]
fn split_draws_agree_with_single_draw_only_up_to_first_boundary() {
    // Each draw re-seeds the expansion with its own output, so chunking
    // matters: 16 + 32 bytes and one 48-byte draw share the first 16 bytes
    // (prf+ prefix property) and nothing is guaranteed beyond that.
    let mut split = DeterministicRandom::new().unwrap();
    let mut single = DeterministicRandom::new().unwrap();

    let first = draw(&mut split, 16);
    let second = draw(&mut split, 32);
    let whole = draw(&mut single, 48);

    assert_eq!(first.as_slice(), &whole[..16]);
    assert_ne!(second.as_slice(), &whole[16..]);
}

#[test]
fn two_fresh_sources_yield_identical_16_then_32() {
    let mut a = DeterministicRandom::new().unwrap();
    let mut b = DeterministicRandom::new().unwrap();

    assert_eq!(draw(&mut a, 16), draw(&mut b, 16));
    assert_eq!(draw(&mut a, 32), draw(&mut b, 32));
}
