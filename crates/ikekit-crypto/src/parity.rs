//! DES odd-parity expansion of 7-byte MS-CHAPv2 key sections
//!
//! The 56 key bits are spread over 8 bytes, 7 bits each in bits 7..1, and
//! bit 0 of every byte is set so the byte has an odd number of 1 bits:
//!
//! ```text
//! input:  k0 k1 k2 ... k55            (56 bits, big-endian)
//! output: [k0..k6 p] [k7..k13 p] ... [k49..k55 p]
//! ```

use crate::error::KeyingError;

/// Length of a key section before parity expansion
pub const KEY_SECTION_LEN: usize = 7;

/// Length of a DES key block after parity expansion
pub const PARITY_BLOCK_LEN: usize = 8;

/// Expand 7 key bytes into an 8-byte DES key with odd parity.
///
/// Bytes are filled from the last to the first, each taking the next 7 bits
/// of the key from the least significant end. Downstream consumers depend on
/// this exact bit order.
///
/// # Errors
///
/// - `InvalidArgument`: `input` is not exactly 7 bytes
pub fn add_parity_bits(input: &[u8]) -> Result<[u8; PARITY_BLOCK_LEN], KeyingError> {
    if input.len() != KEY_SECTION_LEN {
        return Err(KeyingError::invalid_argument(format!(
            "input must be {KEY_SECTION_LEN} bytes, got {}",
            input.len()
        )));
    }

    // 56-bit key, shifted left to leave bit 0 free for the first parity bit
    let mut bits = input.iter().fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte)) << 1;

    let mut output = [0u8; PARITY_BLOCK_LEN];
    for slot in output.iter_mut().rev() {
        let data = (bits as u8) & 0xFE;
        *slot = data | odd_parity_bit(data);
        bits >>= 7;
    }

    Ok(output)
}

/// Whether `byte` has an odd number of set bits.
pub fn is_odd_parity(byte: u8) -> bool {
    byte.count_ones() & 1 == 1
}

/// Parity bit that makes the 7 data bits (bits 7..1) of `data` odd.
fn odd_parity_bit(data: u8) -> u8 {
    u8::from(data.count_ones() & 1 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_key_sets_every_parity_bit() {
        let block = add_parity_bits(&[0u8; 7]).unwrap();
        assert_eq!(block, [0x01; 8]);
    }

    #[test]
    fn all_ones_key_needs_no_parity_bits() {
        // Seven data bits already odd
        let block = add_parity_bits(&[0xFF; 7]).unwrap();
        assert_eq!(block, [0xFE; 8]);
    }

    #[test]
    fn most_significant_bit_lands_in_first_byte() {
        let block = add_parity_bits(&[0x80, 0, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(block, [0x80, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01]);
    }

    #[test]
    fn least_significant_bit_lands_in_last_byte() {
        let block = add_parity_bits(&[0, 0, 0, 0, 0, 0, 0x01]).unwrap();
        assert_eq!(block, [0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x02]);
    }

    #[test]
    fn bits_straddle_byte_boundaries() {
        // Bit 7 of the last input byte is the 8th least significant key bit,
        // so it becomes bit 1 of the second-to-last output byte
        let block = add_parity_bits(&[0, 0, 0, 0, 0, 0, 0x80]).unwrap();
        assert_eq!(block, [0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x02, 0x01]);
    }

    #[test]
    fn every_output_byte_has_odd_parity() {
        let block = add_parity_bits(&[0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE]).unwrap();
        for byte in block {
            assert!(is_odd_parity(byte), "{byte:#04x} has even parity");
        }
    }

    #[test]
    fn rejects_six_bytes() {
        let result = add_parity_bits(&[0u8; 6]);
        assert!(matches!(result, Err(KeyingError::InvalidArgument { .. })));
    }

    #[test]
    fn rejects_eight_bytes() {
        let result = add_parity_bits(&[0u8; 8]);
        assert!(matches!(result, Err(KeyingError::InvalidArgument { .. })));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(add_parity_bits(&[]).is_err());
    }
}
