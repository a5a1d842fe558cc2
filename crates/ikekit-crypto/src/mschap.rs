//! MS-CHAPv2 DES primitives (RFC 2759 8.5, 8.6)

use des::{
    Des,
    cipher::{BlockEncrypt, KeyInit, generic_array::GenericArray},
};
use zeroize::Zeroize;

use crate::{
    error::KeyingError,
    parity::{KEY_SECTION_LEN, add_parity_bits},
    random::RandomByteSource,
};

/// Peer challenge length
pub const PEER_CHALLENGE_LEN: usize = 16;

/// NT password hash length (MD4 output)
pub const PASSWORD_HASH_LEN: usize = 16;

/// Challenge response length: three DES blocks
pub const CHALLENGE_RESPONSE_LEN: usize = 24;

/// Password hash zero-padded to three 7-byte key sections
const Z_PASSWORD_HASH_LEN: usize = 21;

/// `DesEncrypt()`: encrypt one 8-byte block with a 7-byte key section.
///
/// The key is expanded to a DES key with odd parity before use.
///
/// # Errors
///
/// - `InvalidArgument`: `key` is not exactly 7 bytes
pub fn des_encrypt(clear: &[u8; 8], key: &[u8]) -> Result<[u8; 8], KeyingError> {
    if key.len() != KEY_SECTION_LEN {
        return Err(KeyingError::invalid_argument(
            "DES key must be 7 bytes before parity bits are added",
        ));
    }

    let mut des_key = add_parity_bits(key)?;
    let cipher = Des::new(GenericArray::from_slice(&des_key));
    des_key.zeroize();

    let mut block = GenericArray::clone_from_slice(clear);
    cipher.encrypt_block(&mut block);

    let mut cipher_text = [0u8; 8];
    cipher_text.copy_from_slice(&block);
    Ok(cipher_text)
}

/// `ChallengeResponse()`: 24-byte response to an 8-byte challenge hash.
pub fn challenge_response(
    challenge: &[u8; 8],
    password_hash: &[u8; PASSWORD_HASH_LEN],
) -> Result<[u8; CHALLENGE_RESPONSE_LEN], KeyingError> {
    let mut z_password_hash = [0u8; Z_PASSWORD_HASH_LEN];
    z_password_hash[..PASSWORD_HASH_LEN].copy_from_slice(password_hash);

    let mut response = [0u8; CHALLENGE_RESPONSE_LEN];
    for (section, out) in
        z_password_hash.chunks_exact(KEY_SECTION_LEN).zip(response.chunks_exact_mut(8))
    {
        out.copy_from_slice(&des_encrypt(challenge, section)?);
    }

    z_password_hash.zeroize();
    Ok(response)
}

/// Draw a fresh peer challenge from `rng`.
pub fn generate_peer_challenge<R>(rng: &mut R) -> Result<[u8; PEER_CHALLENGE_LEN], KeyingError>
where
    R: RandomByteSource + ?Sized,
{
    let mut challenge = [0u8; PEER_CHALLENGE_LEN];
    rng.next_bytes(&mut challenge)?;
    Ok(challenge)
}
