//! prf+ key stream expansion (RFC 7296 2.13)
//!
//! ```text
//! prf+ (K, S) = T1 | T2 | T3 | ...
//!
//! T1 = prf (K, S | 0x01)
//! T2 = prf (K, T1 | S | 0x02)
//! T3 = prf (K, T2 | S | 0x03)
//! ```
//!
//! The pad byte wraps from 0xFF back to 0x00 after 255 blocks. RFC 7296
//! leaves prf+ undefined past that point; this implementation keeps chaining
//! with the wrapped counter rather than failing, so callers that need more
//! than `255 * output_len` bytes get a well-defined but non-standard stream.

use zeroize::Zeroizing;

use super::ByteSigner;
use crate::error::KeyingError;

/// Expand `seed` under `key` into exactly `output_len` bytes of keying
/// material.
///
/// Each block feeds the previous MAC output, the seed and a one-byte counter
/// (starting at 1) into `signer`. The final block is truncated to the bytes
/// still needed. `output_len == 0` returns an empty vector without invoking
/// the signer.
///
/// Output is a pure function of `(key, seed, output_len)` whenever `signer`
/// is deterministic, and shorter requests are always a prefix of longer
/// ones.
///
/// # Errors
///
/// - `SigningFailed`: returned by `signer`, propagated unchanged, or raised
///   here if the signer produced an empty MAC (expansion could never
///   progress)
pub fn prf_plus<S>(
    signer: &S,
    key: &[u8],
    seed: &[u8],
    output_len: usize,
) -> Result<Vec<u8>, KeyingError>
where
    S: ByteSigner + ?Sized,
{
    // Every exit path, including a failed `sign`, clears the partial stream
    let mut output = Zeroizing::new(Vec::with_capacity(output_len));
    let mut previous_mac = Zeroizing::new(Vec::new());
    let mut input = Zeroizing::new(Vec::new());
    let mut pad_value: u8 = 1;
    let mut blocks = 0usize;

    while output.len() < output_len {
        input.clear();
        input.extend_from_slice(&previous_mac);
        input.extend_from_slice(seed);
        input.push(pad_value);

        let mac = signer.sign(key, &input)?;
        if mac.is_empty() {
            return Err(KeyingError::SigningFailed {
                reason: "signer produced an empty MAC".to_string(),
            });
        }
        previous_mac = Zeroizing::new(mac);

        let remaining = output_len - output.len();
        let take = remaining.min(previous_mac.len());
        output.extend_from_slice(&previous_mac[..take]);

        pad_value = pad_value.wrapping_add(1);
        blocks += 1;
    }

    tracing::trace!(output_len, blocks, "prf+ expansion complete");

    Ok(std::mem::take(&mut *output))
}
