//! # abicodec-primitives
//!
//! Fixed-size values shared by the ABI codec: 20-byte addresses, 32-byte
//! hashes/topics and the 32-byte [`Word`] every ABI value is aligned to.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod hash;

pub use address::{Address, AddressError};
pub use hash::{HashError, H256};

// Re-export primitive-types for the big integers used throughout the codec
pub use primitive_types::{U256, U512};

/// Size of an ABI word in bytes
pub const WORD_SIZE: usize = 32;

/// One 32-byte ABI word
pub type Word = [u8; WORD_SIZE];

/// Big-endian word holding `value`
pub fn u256_to_word(value: &U256) -> Word {
    let mut word = [0u8; WORD_SIZE];
    value.to_big_endian(&mut word);
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u256_to_word() {
        let word = u256_to_word(&U256::from(0x1234u64));
        assert_eq!(word[30], 0x12);
        assert_eq!(word[31], 0x34);
        assert!(word[..30].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_u256_max_word() {
        assert_eq!(u256_to_word(&U256::MAX), [0xffu8; 32]);
    }
}
