//! IKEv2 keying material (RFC 7296 2.14, 2.17, 2.18)
//!
//! ```text
//! SKEYSEED = prf(Ni | Nr, g^ir)
//!        │
//!        ▼ prf+(SKEYSEED, Ni | Nr | SPIi | SPIr)
//! SK_d | SK_ai | SK_ar | SK_ei | SK_er | SK_pi | SK_pr
//!   │
//!   ▼ prf+(SK_d, [g^ir (CHILD_SA)] | Ni | Nr)
//! SK_ei | SK_ai | SK_er | SK_ar   (Child SA)
//! ```
//!
//! Rekeying an IKE SA replaces the first step with
//! `SKEYSEED = prf(SK_d (old), g^ir (new) | Ni | Nr)`.

use zeroize::{Zeroize, Zeroizing};

use crate::{
    error::KeyingError,
    prf::{ByteSigner, HmacSigner, PrfAlgorithm, prf_plus},
};

/// prf+ blocks available before the one-byte counter wraps
const MAX_PRF_PLUS_BLOCKS: usize = 255;

/// Negotiated encryption and integrity key lengths in bytes.
///
/// `integrity` is 0 for combined-mode (AEAD) ciphers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyLengths {
    /// Encryption key length (`SK_e*`)
    pub encryption: usize,
    /// Integrity key length (`SK_a*`)
    pub integrity: usize,
}

/// Compute SKEYSEED for a new IKE SA: `prf(Ni | Nr, g^ir)`.
pub fn generate_skeyseed(
    prf: PrfAlgorithm,
    nonce_init: &[u8],
    nonce_resp: &[u8],
    shared_key: &[u8],
) -> Result<Zeroizing<Vec<u8>>, KeyingError> {
    let key = Zeroizing::new([nonce_init, nonce_resp].concat());
    let skeyseed = HmacSigner::new(prf).sign(&key, shared_key)?;
    Ok(Zeroizing::new(skeyseed))
}

/// Compute SKEYSEED for a rekeyed IKE SA: `prf(SK_d (old), g^ir | Ni | Nr)`.
pub fn generate_rekeyed_skeyseed(
    prf: PrfAlgorithm,
    old_sk_d: &[u8],
    nonce_init: &[u8],
    nonce_resp: &[u8],
    shared_key: &[u8],
) -> Result<Zeroizing<Vec<u8>>, KeyingError> {
    let data = Zeroizing::new([shared_key, nonce_init, nonce_resp].concat());
    let skeyseed = HmacSigner::new(prf).sign(old_sk_d, &data)?;
    Ok(Zeroizing::new(skeyseed))
}

/// The seven IKE SA secrets, zeroized on drop.
pub struct IkeSaKeys {
    sk_d: Vec<u8>,
    sk_ai: Vec<u8>,
    sk_ar: Vec<u8>,
    sk_ei: Vec<u8>,
    sk_er: Vec<u8>,
    sk_pi: Vec<u8>,
    sk_pr: Vec<u8>,
}

impl IkeSaKeys {
    /// Expand SKEYSEED into the IKE SA keys.
    ///
    /// `SK_d`, `SK_pi` and `SK_pr` take the PRF's key length; the others
    /// take the negotiated `lengths`. SPIs are encoded as 8-byte big-endian.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument`: the keys need more than `255 * prf.output_len()`
    ///   bytes of keying material
    pub fn derive(
        prf: PrfAlgorithm,
        skeyseed: &[u8],
        nonce_init: &[u8],
        nonce_resp: &[u8],
        spi_init: u64,
        spi_resp: u64,
        lengths: KeyLengths,
    ) -> Result<Self, KeyingError> {
        let mut seed = Vec::with_capacity(nonce_init.len() + nonce_resp.len() + 16);
        seed.extend_from_slice(nonce_init);
        seed.extend_from_slice(nonce_resp);
        seed.extend_from_slice(&spi_init.to_be_bytes());
        seed.extend_from_slice(&spi_resp.to_be_bytes());

        let prf_key_len = prf.key_len();
        let keymat_len = checked_keymat_len(
            prf,
            &[(3, prf_key_len), (2, lengths.integrity), (2, lengths.encryption)],
        )?;
        let keymat = Zeroizing::new(prf_plus(&HmacSigner::new(prf), skeyseed, &seed, keymat_len)?);

        tracing::debug!(
            prf = prf.name(),
            keymat_len,
            encryption = lengths.encryption,
            integrity = lengths.integrity,
            "derived IKE SA keying material"
        );

        let mut split = KeyMatSplitter::new(&keymat);
        Ok(Self {
            sk_d: split.take(prf_key_len),
            sk_ai: split.take(lengths.integrity),
            sk_ar: split.take(lengths.integrity),
            sk_ei: split.take(lengths.encryption),
            sk_er: split.take(lengths.encryption),
            sk_pi: split.take(prf_key_len),
            sk_pr: split.take(prf_key_len),
        })
    }

    /// Key for deriving Child SA keying material.
    pub fn sk_d(&self) -> &[u8] {
        &self.sk_d
    }

    /// Initiator integrity key.
    pub fn sk_ai(&self) -> &[u8] {
        &self.sk_ai
    }

    /// Responder integrity key.
    pub fn sk_ar(&self) -> &[u8] {
        &self.sk_ar
    }

    /// Initiator encryption key.
    pub fn sk_ei(&self) -> &[u8] {
        &self.sk_ei
    }

    /// Responder encryption key.
    pub fn sk_er(&self) -> &[u8] {
        &self.sk_er
    }

    /// Initiator AUTH payload key.
    pub fn sk_pi(&self) -> &[u8] {
        &self.sk_pi
    }

    /// Responder AUTH payload key.
    pub fn sk_pr(&self) -> &[u8] {
        &self.sk_pr
    }
}

impl Drop for IkeSaKeys {
    fn drop(&mut self) {
        self.sk_d.zeroize();
        self.sk_ai.zeroize();
        self.sk_ar.zeroize();
        self.sk_ei.zeroize();
        self.sk_er.zeroize();
        self.sk_pi.zeroize();
        self.sk_pr.zeroize();
    }
}

/// Child SA keys, zeroized on drop.
pub struct ChildSaKeys {
    sk_ei: Vec<u8>,
    sk_ai: Vec<u8>,
    sk_er: Vec<u8>,
    sk_ar: Vec<u8>,
}

impl ChildSaKeys {
    /// Expand `SK_d` into Child SA keys.
    ///
    /// `shared_key` is the fresh `g^ir` from an optional CHILD_SA key
    /// exchange, or empty. Keys carrying initiator-to-responder traffic come
    /// first, and within each direction the encryption key precedes the
    /// integrity key.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument`: the keys need more than `255 * prf.output_len()`
    ///   bytes of keying material
    pub fn derive(
        prf: PrfAlgorithm,
        sk_d: &[u8],
        shared_key: &[u8],
        nonce_init: &[u8],
        nonce_resp: &[u8],
        lengths: KeyLengths,
    ) -> Result<Self, KeyingError> {
        let seed = Zeroizing::new([shared_key, nonce_init, nonce_resp].concat());
        let keymat_len =
            checked_keymat_len(prf, &[(2, lengths.encryption), (2, lengths.integrity)])?;
        let keymat = Zeroizing::new(prf_plus(&HmacSigner::new(prf), sk_d, &seed, keymat_len)?);

        tracing::debug!(
            prf = prf.name(),
            keymat_len,
            pfs = !shared_key.is_empty(),
            "derived Child SA keying material"
        );

        let mut split = KeyMatSplitter::new(&keymat);
        Ok(Self {
            sk_ei: split.take(lengths.encryption),
            sk_ai: split.take(lengths.integrity),
            sk_er: split.take(lengths.encryption),
            sk_ar: split.take(lengths.integrity),
        })
    }

    /// Initiator-to-responder encryption key.
    pub fn sk_ei(&self) -> &[u8] {
        &self.sk_ei
    }

    /// Initiator-to-responder integrity key.
    pub fn sk_ai(&self) -> &[u8] {
        &self.sk_ai
    }

    /// Responder-to-initiator encryption key.
    pub fn sk_er(&self) -> &[u8] {
        &self.sk_er
    }

    /// Responder-to-initiator integrity key.
    pub fn sk_ar(&self) -> &[u8] {
        &self.sk_ar
    }
}

impl Drop for ChildSaKeys {
    fn drop(&mut self) {
        self.sk_ei.zeroize();
        self.sk_ai.zeroize();
        self.sk_er.zeroize();
        self.sk_ar.zeroize();
    }
}

/// Total keying material for `(count, len)` key groups.
///
/// prf+ is only defined for 255 blocks, so requests beyond
/// `255 * prf.output_len()` bytes are rejected along with lengths that
/// overflow.
fn checked_keymat_len(prf: PrfAlgorithm, parts: &[(usize, usize)]) -> Result<usize, KeyingError> {
    let total = parts
        .iter()
        .try_fold(0usize, |acc, &(count, len)| {
            count.checked_mul(len).and_then(|bytes| acc.checked_add(bytes))
        })
        .ok_or_else(|| KeyingError::invalid_argument("key lengths overflow"))?;

    let limit = MAX_PRF_PLUS_BLOCKS * prf.output_len();
    if total > limit {
        return Err(KeyingError::invalid_argument(format!(
            "{total} bytes of keying material exceeds the {} prf+ limit of {limit} bytes",
            prf.name()
        )));
    }

    Ok(total)
}

/// Sequential reader over keying material sized exactly for its consumers.
struct KeyMatSplitter<'a> {
    keymat: &'a [u8],
    offset: usize,
}

impl<'a> KeyMatSplitter<'a> {
    fn new(keymat: &'a [u8]) -> Self {
        Self { keymat, offset: 0 }
    }

    fn take(&mut self, len: usize) -> Vec<u8> {
        let end = self.offset + len;
        let key = self.keymat[self.offset..end].to_vec();
        self.offset = end;
        key
    }
}
